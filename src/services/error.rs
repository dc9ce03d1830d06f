use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::services::dispatcher::Action;
use crate::services::resolver::Pid;
use crate::services::shell::Severity;

/// Everything that can stop a single Suspend/Resume click.
///
/// None of these are retried; the shell turns each one into a status line.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Please enter a PID or process name.")]
    EmptyInput,

    #[error("PsTools folder is not configured. Use Settings → Select tools folder.")]
    NotConfigured,

    #[error("Failed to find process with name '{name}'.")]
    NotFound { name: String },

    #[error("Failed to run {}: {source}", .path.display())]
    ListerLaunch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Process listing for '{name}' failed (exit code {}).", display_code(.code))]
    ListerFailed { name: String, code: Option<i32> },

    #[error("Failed to {} process with PID '{pid}'.", .action.verb())]
    Execute {
        action: Action,
        pid: Pid,
        code: Option<i32>,
    },

    #[error("Failed to {} process with PID '{pid}': {source}", .action.verb())]
    ExecuteLaunch {
        action: Action,
        pid: Pid,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    pub fn severity(&self) -> Severity {
        match self {
            ActionError::EmptyInput | ActionError::NotConfigured => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}
