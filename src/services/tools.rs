use std::env;
use std::path::{Path, PathBuf};

use crate::services::settings::{Config, SettingsError, SettingsService};

pub const LISTER_TOOL: &str = "pslist.exe";
pub const SUSPEND_TOOL: &str = "pssuspend.exe";

/// Directory name looked up next to the executable when nothing is configured.
pub const BUNDLED_DIR: &str = "pstools";

pub const PICK_FOLDER_TITLE: &str = "Select the PsTools folder";

/// Asks the user for a directory. `None` means the dialog was cancelled.
pub trait FolderPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;
}

/// No existence check: a missing binary shows up as a launch failure.
pub fn tool_path(directory: &Path, tool_name: &str) -> PathBuf {
    directory.join(tool_name)
}

/// `pstools/` beside the running executable, if it holds the lister.
pub fn bundled_tools_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    bundled_tools_dir_for(&exe)
}

fn bundled_tools_dir_for(exe: &Path) -> Option<PathBuf> {
    let dir = exe.parent()?.join(BUNDLED_DIR);
    tool_path(&dir, LISTER_TOOL).is_file().then_some(dir)
}

/// Chooses the tools directory: user setting first, bundled copy second.
pub struct ToolsLocator {
    bundled: Option<PathBuf>,
}

impl ToolsLocator {
    pub fn new() -> Self {
        Self { bundled: bundled_tools_dir() }
    }

    pub fn with_bundled(bundled: Option<PathBuf>) -> Self {
        Self { bundled }
    }

    pub fn configured_dir(&self, config: &Config) -> Option<PathBuf> {
        config.pstools_path().or_else(|| self.bundled.clone())
    }

    /// Returns the known directory, or asks for one and persists the answer.
    ///
    /// A cancelled dialog leaves the config untouched and returns `Ok(None)`.
    pub fn resolve_tools_directory(
        &self,
        config: &mut Config,
        settings: &SettingsService,
        picker: &dyn FolderPicker,
    ) -> Result<Option<PathBuf>, SettingsError> {
        if let Some(dir) = self.configured_dir(config) {
            return Ok(Some(dir));
        }
        self.choose_tools_directory(config, settings, picker)
    }

    /// Always shows the chooser. Used by the settings menu.
    pub fn choose_tools_directory(
        &self,
        config: &mut Config,
        settings: &SettingsService,
        picker: &dyn FolderPicker,
    ) -> Result<Option<PathBuf>, SettingsError> {
        let Some(dir) = picker.pick_folder(PICK_FOLDER_TITLE) else {
            tracing::info!("tools folder selection cancelled");
            return Ok(None);
        };

        if !tool_path(&dir, SUSPEND_TOOL).is_file() {
            tracing::warn!(dir = %dir.display(), "chosen folder has no {}", SUSPEND_TOOL);
        }

        config.set_pstools_path(&dir);
        settings.save(config)?;
        tracing::info!(dir = %dir.display(), "tools folder configured");
        Ok(Some(dir))
    }
}

impl Default for ToolsLocator {
    fn default() -> Self {
        Self::new()
    }
}
