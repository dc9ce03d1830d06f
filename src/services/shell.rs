//! Window-independent half of the presentation shell.
//!
//! `main.rs` forwards every button to [`ShellController`] and paints the
//! returned [`StatusReport`]; nothing here knows about Slint.

use std::path::PathBuf;

use crate::services::dispatcher::{Action, ActionDispatcher};
use crate::services::error::ActionError;
use crate::services::resolver::{Pid, ProcessResolver};
use crate::services::runner::CommandRunner;
use crate::services::settings::{Config, SettingsService};
use crate::services::tools::{FolderPicker, ToolsLocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One line of feedback for the status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub message: String,
    pub severity: Severity,
}

impl StatusReport {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self { message: message.into(), severity }
    }

    fn completed(action: Action, pid: &Pid) -> Self {
        Self::new(
            Severity::Success,
            format!("Process with PID '{}' {} successfully.", pid, action.past_tense()),
        )
    }
}

impl From<ActionError> for StatusReport {
    fn from(err: ActionError) -> Self {
        Self::new(err.severity(), err.to_string())
    }
}

/// Leaves `AwaitingSetup` once and never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    AwaitingSetup,
    Idle,
}

pub struct ShellController {
    settings: SettingsService,
    config: Config,
    locator: ToolsLocator,
    runner: Box<dyn CommandRunner>,
    state: ShellState,
}

impl ShellController {
    pub fn new(
        settings: SettingsService,
        config: Config,
        locator: ToolsLocator,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let state = if locator.configured_dir(&config).is_some() {
            ShellState::Idle
        } else {
            ShellState::AwaitingSetup
        };
        tracing::info!(?state, "shell started");
        Self { settings, config, locator, runner, state }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn tools_dir(&self) -> Option<PathBuf> {
        self.locator.configured_dir(&self.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// First-run "choose folder". Idle afterwards even if the user cancelled.
    pub fn complete_setup(&mut self, picker: &dyn FolderPicker) -> StatusReport {
        if self.state == ShellState::Idle {
            return self.tools_report();
        }
        let result = self
            .locator
            .resolve_tools_directory(&mut self.config, &self.settings, picker);
        self.state = ShellState::Idle;

        match result {
            Ok(Some(dir)) => Self::folder_selected(dir),
            Ok(None) => ActionError::NotConfigured.into(),
            Err(e) => {
                tracing::error!(error = %e, "could not save config");
                StatusReport::new(Severity::Error, format!("Failed to save config: {e}"))
            }
        }
    }

    /// First-run "continue without": idle with no tools folder.
    pub fn skip_setup(&mut self) -> StatusReport {
        self.state = ShellState::Idle;
        tracing::info!("setup skipped, running unconfigured");
        self.tools_report()
    }

    /// Settings menu entry. A cancel keeps whatever was configured before.
    pub fn select_tools_folder(&mut self, picker: &dyn FolderPicker) -> StatusReport {
        match self
            .locator
            .choose_tools_directory(&mut self.config, &self.settings, picker)
        {
            Ok(Some(dir)) => {
                self.state = ShellState::Idle;
                Self::folder_selected(dir)
            }
            Ok(None) => StatusReport::new(Severity::Info, "Tools folder unchanged."),
            Err(e) => {
                tracing::error!(error = %e, "could not save config");
                StatusReport::new(Severity::Error, format!("Failed to save config: {e}"))
            }
        }
    }

    /// Resolve then suspend/resume. Every failure comes back as a report.
    pub fn run_action(&self, action: Action, input: &str) -> StatusReport {
        if input.trim().is_empty() {
            return ActionError::EmptyInput.into();
        }

        let tools_dir = self.tools_dir();
        let runner = self.runner.as_ref();

        let outcome = ProcessResolver::new(tools_dir.clone(), runner)
            .resolve_identifier(input)
            .and_then(|pid| ActionDispatcher::new(tools_dir, runner).dispatch(action, &pid));

        match outcome {
            Ok(pid) => StatusReport::completed(action, &pid),
            Err(e) => {
                tracing::warn!(%action, input, error = %e, "action failed");
                e.into()
            }
        }
    }

    fn tools_report(&self) -> StatusReport {
        match self.tools_dir() {
            Some(dir) => StatusReport::new(
                Severity::Info,
                format!("Using PsTools from {}.", dir.display()),
            ),
            None => ActionError::NotConfigured.into(),
        }
    }

    fn folder_selected(dir: PathBuf) -> StatusReport {
        StatusReport::new(
            Severity::Success,
            format!("PsTools folder set to {}.", dir.display()),
        )
    }
}
