// errors.rs
//
// The engine itself has no recoverable error type: its only failure mode is
// an assertion on a structural invariant, which is a bug, not a runtime
// error. Everything recoverable -- bad settings, unreadable trace lines,
// I/O failures -- belongs to the shell that surrounds the engine.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ShellError {
    Io(std::io::Error),

    /// A trace line didn't parse: neither 5 fields (non-branch) nor 7
    /// (branch).
    Trace { line: usize, text: String },

    InvalidSettings(String),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Io(err) => write!(f, "I/O error: {}", err),
            ShellError::Trace { line, text } => {
                write!(f, "unreadable trace line {}: '{}'", line, text)
            },
            ShellError::InvalidSettings(msg) => write!(f, "invalid processor settings: {}", msg),
        }
    }
}

impl Error for ShellError {}

impl From<std::io::Error> for ShellError {
    fn from(error: std::io::Error) -> Self {
        ShellError::Io(error)
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(error: serde_json::Error) -> Self {
        ShellError::InvalidSettings(error.to_string())
    }
}
