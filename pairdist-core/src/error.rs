//! Error handling for the alignment engines
//!
//! Self-comparison, truncation, cache misses and empty sequences are ordinary
//! control flow and never produce an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Sequence index {index} out of range for {count} sequences")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Matrix fill cancelled after {completed} of {total} cells")]
    Cancelled { completed: usize, total: usize },

    #[error("Display surface error: {0}")]
    Surface(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AlignError {
    pub fn out_of_range(index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { index, count }
    }

    pub fn surface<S: Into<String>>(message: S) -> Self {
        Self::Surface(message.into())
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }
}

pub type AlignResult<T> = Result<T, AlignError>;

/// Check that `index` addresses one of `count` sequences.
pub fn check_index(index: usize, count: usize) -> AlignResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(AlignError::out_of_range(index, count))
    }
}
