//! Recording fakes for the subprocess and dialog seams.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::services::runner::{CommandOutput, CommandRunner};
use crate::services::tools::FolderPicker;

/// One recorded invocation: program path plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: PathBuf,
    pub args: Vec<String>,
}

enum Reply {
    Output(CommandOutput),
    LaunchError,
}

/// Replays queued replies in order and records every call.
///
/// Clones share the same queue and call log, so a test can keep a handle
/// after boxing one into the code under test.
#[derive(Clone, Default)]
pub struct FakeRunner {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, code: i32, stdout: &str) -> Self {
        self.replies.borrow_mut().push_back(Reply::Output(CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
        }));
        self
    }

    pub fn fail_launch(self) -> Self {
        self.replies.borrow_mut().push_back(Reply::LaunchError);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[&str]) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(Call {
            program: program.to_path_buf(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::LaunchError) | None => {
                Err(io::Error::new(io::ErrorKind::NotFound, "program not found"))
            }
        }
    }
}

/// Folder chooser that returns a fixed answer and counts how often it was shown.
pub struct FakePicker {
    answer: Option<PathBuf>,
    shown: RefCell<usize>,
}

impl FakePicker {
    pub fn choosing(path: impl Into<PathBuf>) -> Self {
        Self { answer: Some(path.into()), shown: RefCell::new(0) }
    }

    pub fn cancelling() -> Self {
        Self { answer: None, shown: RefCell::new(0) }
    }

    pub fn times_shown(&self) -> usize {
        *self.shown.borrow()
    }
}

impl FolderPicker for FakePicker {
    fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
        *self.shown.borrow_mut() += 1;
        self.answer.clone()
    }
}

/// Typical `pslist -t` output.
pub const LISTING: &str = "\
PsList v1.4 - Sysinternals PsList
Copyright (C) 2000-2016 Mark Russinovich
Sysinternals - www.sysinternals.com

Process information for DESKTOP:

Name                             Pid Pri Thd  Hnd      VM      WS    Priv
explorer                        5120   8  98 3562 2147483647  185324  96512
  notepad                       4821   8   7  245 2147483647   18204   3316
notepadplus                     7002   8   9  301 2147483647   25000   5120
";
