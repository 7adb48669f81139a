//! Error types

use std::fmt;

/// Errors raised around tokenization: lookups, driver checks and mode construction.
///
/// Tokenizing itself never fails. Malformed markup degrades into styled spans.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeError {
    UnknownMode(String),
    UnknownMime(String),
    /// A mode returned without consuming anything on a non-empty line.
    NoProgress {
        line: usize,
        column: usize,
        mode: &'static str,
    },
    InvalidPattern {
        pattern: String,
        message: String,
    },
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::UnknownMode(name) => write!(f, "Mode '{}' not found", name),
            ModeError::UnknownMime(mime) => write!(f, "No mode registered for MIME type '{}'", mime),
            ModeError::NoProgress { line, column, mode } => write!(
                f,
                "Mode '{}' failed to advance the stream at line {}, column {}",
                mode, line, column
            ),
            ModeError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid script type pattern '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for ModeError {}
