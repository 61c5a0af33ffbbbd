// error.rs

use nix::unistd::Pid;
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("input line is not valid UTF-8")]
    MalformedInput,
    #[error("empty command")]
    EmptyCommand,
    #[error("malformed history reference `{0}`")]
    MalformedReference(String),
    #[error("history is empty")]
    HistoryEmpty,
    #[error("no such history entry: {0}")]
    NoSuchEntry(u64),
    #[error("argument contains a NUL byte")]
    NulByte(#[from] std::ffi::NulError),
    #[error("failed to create process: {0}")]
    Spawn(#[source] nix::Error),
    #[error("failed to set signal disposition: {0}")]
    Signal(#[source] nix::Error),
    #[error("failed to wait for process {pid}: {source}")]
    Wait { pid: Pid, source: nix::Error },
    #[error("failed to read input: {0}")]
    Input(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Input-side failures end the session; everything else is reported and the
    /// loop moves on to the next line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Input(_) | ShellError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
