use std::fmt;
use std::path::PathBuf;

use crate::services::error::ActionError;
use crate::services::resolver::Pid;
use crate::services::runner::CommandRunner;
use crate::services::tools::{tool_path, SUSPEND_TOOL};

/// pssuspend flag that resumes instead of suspending.
const RESUME_FLAG: &str = "-r";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Suspend,
    Resume,
}

impl Action {
    pub fn verb(self) -> &'static str {
        match self {
            Action::Suspend => "suspend",
            Action::Resume => "resume",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Action::Suspend => "suspended",
            Action::Resume => "resumed",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Runs pssuspend for an already resolved PID.
pub struct ActionDispatcher<'a> {
    tools_dir: Option<PathBuf>,
    runner: &'a dyn CommandRunner,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(tools_dir: Option<PathBuf>, runner: &'a dyn CommandRunner) -> Self {
        Self { tools_dir, runner }
    }

    pub fn suspend(&self, pid: &Pid) -> Result<Pid, ActionError> {
        self.dispatch(Action::Suspend, pid)
    }

    pub fn resume(&self, pid: &Pid) -> Result<Pid, ActionError> {
        self.dispatch(Action::Resume, pid)
    }

    pub fn dispatch(&self, action: Action, pid: &Pid) -> Result<Pid, ActionError> {
        let dir = self.tools_dir.as_deref().ok_or(ActionError::NotConfigured)?;
        let suspender = tool_path(dir, SUSPEND_TOOL);

        let mut args = Vec::with_capacity(2);
        if action == Action::Resume {
            args.push(RESUME_FLAG);
        }
        args.push(pid.as_str());

        let output = self.runner.run(&suspender, &args).map_err(|source| {
            tracing::error!(%action, %pid, error = %source, "could not launch {}", SUSPEND_TOOL);
            ActionError::ExecuteLaunch { action, pid: pid.clone(), source }
        })?;

        if !output.success() {
            tracing::warn!(%action, %pid, code = ?output.code, "{} reported failure", SUSPEND_TOOL);
            return Err(ActionError::Execute {
                action,
                pid: pid.clone(),
                code: output.code,
            });
        }

        tracing::info!(%action, %pid, "process {}", action.past_tense());
        Ok(pid.clone())
    }
}
