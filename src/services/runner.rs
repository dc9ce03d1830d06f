use std::io;
use std::path::Path;
use std::process::Command;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// What we keep from a finished tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external tool to completion and captures its stdout.
///
/// An `Err` means the tool never started; a started tool that fails comes back
/// as `Ok` with a non-zero code.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[&str]) -> io::Result<CommandOutput>;
}

/// Blocking `std::process` runner used by the app.
#[derive(Debug, Clone, Copy)]
pub struct SystemRunner {
    /// Launch with `CREATE_NO_WINDOW` so PsTools does not flash a console.
    /// Only meaningful on Windows.
    pub hide_console: bool,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self { hide_console: true }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> io::Result<CommandOutput> {
        let mut command = Command::new(program);
        command.args(args);

        #[cfg(windows)]
        if self.hide_console {
            command.creation_flags(CREATE_NO_WINDOW);
        }

        tracing::debug!(program = %program.display(), ?args, "running tool");
        let output = command.output()?;
        let code = output.status.code();
        tracing::debug!(program = %program.display(), ?code, "tool exited");

        Ok(CommandOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
