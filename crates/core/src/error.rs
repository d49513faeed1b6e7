//! Error types for distweight

use thiserror::Error;

/// Main error type for distweight operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown distance function: {0:?} (expected \"Haversine\" or \"Vincenty\")")]
    UnknownDistanceFunction(String),

    #[error("Unknown distance transform: {0:?} (expected \"level\" or \"log\")")]
    UnknownTransform(String),

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Missing column: {0:?}")]
    MissingColumn(String),

    #[error("Invalid value {value:?} in column {column:?} at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Vincenty inverse formula failed to converge after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for errors caused by bad caller input (names, lengths, parameters).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::UnknownDistanceFunction(_)
                | Error::UnknownTransform(_)
                | Error::LengthMismatch { .. }
                | Error::EmptyInput(_)
                | Error::InvalidParameter { .. }
                | Error::MissingColumn(_)
                | Error::InvalidValue { .. }
        )
    }

    /// Shorthand for a [`Error::LengthMismatch`] check.
    pub fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(Error::LengthMismatch {
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Result type alias for distweight operations
pub type Result<T> = std::result::Result<T, Error>;
