//! Error types for timing log parsing
//!
//! Two failure classes are fatal for a parse: the log could not be read, or a
//! matched timestamp could not be converted to milliseconds.

use std::path::PathBuf;
use thiserror::Error;

/// A timestamp field that matched the pattern but could not be converted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field} field {value:?} is not a valid number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} value {value} is out of range (max {max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("{field} field {value:?} has more than two digits")]
    TooManyDigits { field: &'static str, value: String },

    #[error("duration {hours}:{minutes}:{seconds} plus {millis}ms overflows")]
    Overflow {
        hours: u64,
        minutes: u64,
        seconds: u64,
        millis: u64,
    },

    #[error("total for {function:?} overflows: {total}ms + {added}ms")]
    TotalOverflow {
        function: String,
        total: u64,
        added: u64,
    },
}

/// Errors that abort a timing log parse
#[derive(Error, Debug)]
pub enum TimingError {
    #[error("Failed to open timing log {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed timestamp on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: FieldError,
    },
}

/// Result type for timing log operations
pub type Result<T> = std::result::Result<T, TimingError>;
