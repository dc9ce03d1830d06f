//! Native dialogs and the browser.
//!
//! Windows gets the shell folder chooser and `MessageBoxW`; other hosts shell
//! out to `zenity` and `xdg-open`.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::services::tools::FolderPicker;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

/// Where Sysinternals publishes the PsTools archive.
pub const PSTOOLS_DOWNLOAD_URL: &str = "https://learn.microsoft.com/sysinternals/downloads/pstools";

/// The platform folder chooser.
pub struct NativeFolderPicker {
    /// Usually the Downloads folder, where the PsTools zip ends up.
    start_dir: Option<PathBuf>,
}

impl NativeFolderPicker {
    pub fn new() -> Self {
        Self { start_dir: dirs::download_dir() }
    }
}

impl Default for NativeFolderPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderPicker for NativeFolderPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        tracing::debug!(start = ?self.start_dir, "opening folder chooser");
        let picked = pick_folder_native(title, self.start_dir.as_deref());
        tracing::debug!(?picked, "folder chooser closed");
        picked
    }
}

#[cfg(windows)]
fn pick_folder_native(title: &str, _start: Option<&Path>) -> Option<PathBuf> {
    use windows::core::HSTRING;
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoTaskMemFree, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{
        FileOpenDialog, IFileOpenDialog, FOS_FORCEFILESYSTEM, FOS_PICKFOLDERS, SIGDN_FILESYSPATH,
    };

    unsafe {
        // winit normally initialised COM on this thread already
        let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);

        let dialog: IFileOpenDialog =
            CoCreateInstance(&FileOpenDialog, None, CLSCTX_INPROC_SERVER).ok()?;
        let options = dialog.GetOptions().ok()?;
        dialog
            .SetOptions(options | FOS_PICKFOLDERS | FOS_FORCEFILESYSTEM)
            .ok()?;
        let _ = dialog.SetTitle(&HSTRING::from(title));

        // Err(ERROR_CANCELLED) when the user closes the dialog
        dialog.Show(None).ok()?;

        let item = dialog.GetResult().ok()?;
        let raw = item.GetDisplayName(SIGDN_FILESYSPATH).ok()?;
        let path = raw.to_string().ok();
        CoTaskMemFree(Some(raw.0 as *const _));
        path.map(PathBuf::from)
    }
}

#[cfg(not(windows))]
fn pick_folder_native(title: &str, start: Option<&Path>) -> Option<PathBuf> {
    let mut command = Command::new("zenity");
    command.args(["--file-selection", "--directory", "--title", title]);
    if let Some(start) = start {
        command.arg(format!("--filename={}/", start.display()));
    }

    let output = match command.output() {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(error = %e, "zenity is not available, cannot choose a folder");
            return None;
        }
    };
    if !output.status.success() {
        return None;
    }

    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Opens `url` in the default browser without waiting for it.
pub fn open_url(url: &str) -> io::Result<()> {
    tracing::info!(url, "opening browser");

    #[cfg(windows)]
    {
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        Command::new("explorer.exe")
            .arg(url)
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()?;
    }

    #[cfg(not(windows))]
    {
        Command::new("xdg-open").arg(url).spawn()?;
    }

    Ok(())
}

/// Blocking error box for failures that happen before the window exists.
pub fn show_fatal_error(title: &str, message: &str) {
    tracing::error!(title, message, "fatal error");

    #[cfg(windows)]
    {
        use windows::core::HSTRING;
        use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

        unsafe {
            MessageBoxW(None, &HSTRING::from(message), &HSTRING::from(title), MB_OK | MB_ICONERROR);
        }
    }

    #[cfg(not(windows))]
    {
        let _ = Command::new("zenity")
            .args(["--error", "--title", title, "--text", message])
            .status();
    }
}
