use std::fmt;
use std::path::PathBuf;

use crate::services::error::ActionError;
use crate::services::runner::CommandRunner;
use crate::services::tools::{tool_path, LISTER_TOOL};

/// First token of the pslist header row; data rows follow it.
pub const HEADER_MARKER: &str = "Name";

/// A process identifier as PsTools prints and accepts it: ASCII digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pid(String);

impl Pid {
    pub fn parse(s: &str) -> Option<Self> {
        is_identifier(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Finds the PID of the first row named exactly `name` below the header.
///
/// Rows before the header are ignored. Names are compared whole, so `note`
/// does not match a `notepad` row.
pub fn find_pid_in_listing(listing: &str, name: &str) -> Option<Pid> {
    listing
        .lines()
        .skip_while(|line| line.split_whitespace().next() != Some(HEADER_MARKER))
        .skip(1)
        .find_map(|line| {
            let mut tokens = line.split_whitespace();
            if tokens.next()? != name {
                return None;
            }
            tokens.next().and_then(Pid::parse)
        })
}

/// Turns user input into a PID, asking pslist when the input is a name.
pub struct ProcessResolver<'a> {
    tools_dir: Option<PathBuf>,
    runner: &'a dyn CommandRunner,
}

impl<'a> ProcessResolver<'a> {
    pub fn new(tools_dir: Option<PathBuf>, runner: &'a dyn CommandRunner) -> Self {
        Self { tools_dir, runner }
    }

    pub fn resolve_identifier(&self, input: &str) -> Result<Pid, ActionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ActionError::EmptyInput);
        }
        if let Some(pid) = Pid::parse(input) {
            return Ok(pid);
        }

        let dir = self.tools_dir.as_deref().ok_or(ActionError::NotConfigured)?;
        let lister = tool_path(dir, LISTER_TOOL);

        let output = self
            .runner
            .run(&lister, &["-t", input])
            .map_err(|source| ActionError::ListerLaunch { path: lister.clone(), source })?;
        if !output.success() {
            return Err(ActionError::ListerFailed {
                name: input.to_string(),
                code: output.code,
            });
        }

        let pid = find_pid_in_listing(&output.stdout, input).ok_or_else(|| ActionError::NotFound {
            name: input.to_string(),
        })?;
        tracing::info!(name = input, %pid, "resolved process name");
        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakeRunner, LISTING};
    use std::path::Path;

    fn resolver(runner: &FakeRunner) -> ProcessResolver<'_> {
        ProcessResolver::new(Some(PathBuf::from("tools")), runner)
    }

    #[test]
    fn test_numeric_input_is_returned_without_listing() {
        // Arrange
        let runner = FakeRunner::new();

        // Act
        let pid = resolver(&runner).resolve_identifier("4821").expect("numeric");

        // Assert
        assert_eq!(pid.as_str(), "4821");
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_numeric_input_resolves_even_when_unconfigured() {
        let runner = FakeRunner::new();
        let resolver = ProcessResolver::new(None, &runner);

        assert_eq!(resolver.resolve_identifier(" 77 ").expect("numeric").as_str(), "77");
    }

    #[test]
    fn test_name_invokes_lister_once_with_filter() {
        // Arrange
        let runner = FakeRunner::new().reply(0, LISTING);

        // Act
        let pid = resolver(&runner).resolve_identifier("notepad").expect("found");

        // Assert
        assert_eq!(pid.as_str(), "4821");
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, Path::new("tools").join("pslist.exe"));
        assert_eq!(calls[0].args, vec!["-t", "notepad"]);
    }

    #[test]
    fn test_prefix_of_a_name_is_not_a_match() {
        let runner = FakeRunner::new().reply(0, LISTING);

        let result = resolver(&runner).resolve_identifier("note");

        assert!(matches!(result, Err(ActionError::NotFound { ref name }) if name == "note"));
    }

    #[test]
    fn test_lister_failure_is_distinct_from_not_found() {
        let runner = FakeRunner::new().reply(-1, "");

        let result = resolver(&runner).resolve_identifier("notepad");

        assert!(matches!(result, Err(ActionError::ListerFailed { code: Some(-1), .. })));
    }

    #[test]
    fn test_missing_lister_is_a_launch_error() {
        let runner = FakeRunner::new().fail_launch();

        let result = resolver(&runner).resolve_identifier("notepad");

        assert!(matches!(result, Err(ActionError::ListerLaunch { .. })));
    }

    #[test]
    fn test_name_without_tools_dir_is_not_configured() {
        let runner = FakeRunner::new();
        let resolver = ProcessResolver::new(None, &runner);

        let result = resolver.resolve_identifier("notepad");

        assert!(matches!(result, Err(ActionError::NotConfigured)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_empty_input_is_rejected_without_listing() {
        let runner = FakeRunner::new();

        let result = resolver(&runner).resolve_identifier("   ");

        assert!(matches!(result, Err(ActionError::EmptyInput)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_rows_above_the_header_are_ignored() {
        let listing = "notepad 1\nName Pid Pri\nnotepad 2\n";
        assert_eq!(find_pid_in_listing(listing, "notepad"), Pid::parse("2"));
    }

    #[test]
    fn test_listing_without_header_finds_nothing() {
        let listing = "notepad 4821 8 7\n";
        assert_eq!(find_pid_in_listing(listing, "notepad"), None);
    }

    #[test]
    fn test_first_matching_row_wins() {
        let listing = "Name Pid\nchrome 100\n  chrome 200\n";
        assert_eq!(find_pid_in_listing(listing, "chrome"), Pid::parse("100"));
    }

    #[test]
    fn test_row_without_numeric_pid_is_not_found() {
        let listing = "Name Pid\nnotepad\n";
        assert_eq!(find_pid_in_listing(listing, "notepad"), None);
        let listing = "Name Pid\nnotepad running\n";
        assert_eq!(find_pid_in_listing(listing, "notepad"), None);
    }

    #[test]
    fn test_pid_parse_rejects_non_digits() {
        assert!(Pid::parse("").is_none());
        assert!(Pid::parse("-5").is_none());
        assert!(Pid::parse("12a").is_none());
        assert!(Pid::parse("٣").is_none());
    }
}
