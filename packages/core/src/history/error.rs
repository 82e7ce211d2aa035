//! History-specific error types

use thiserror::Error;

/// Errors that can occur during connection history operations
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The history file path could not be determined
    #[error("Could not determine history file path")]
    InvalidPath,

    /// Failed to load the history file
    #[error("Failed to load history file: {0}")]
    LoadFailed(String),

    /// Failed to save the history file
    #[error("Failed to save history file: {0}")]
    SaveFailed(String),

    /// No history entry for the identifier
    #[error("No connection history for: {0}")]
    NotFound(String),

    /// Caller-supplied value fails a format constraint
    #[error("Invalid value: {0}")]
    Validation(String),
}
