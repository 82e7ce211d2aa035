//! Host-specific error types
//!
//! Errors that can occur while reading or rewriting the SSH config file.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during SSH config operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Filesystem failure while reading or writing the config
    #[error("SSH config I/O failed: {0}")]
    Io(String),

    /// No block declares the requested host name
    #[error("Host not found: {0}")]
    NotFound(String),

    /// A host block is structurally malformed
    ///
    /// Recovered per block during parsing; only surfaced by the block parser itself.
    #[error("Malformed host block at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The rewrite would leave the config file empty
    #[error("Refusing to write an empty SSH config to {}", .0.display())]
    EmptyResult(PathBuf),

    /// Host already declared by another block
    #[error("Host already exists: {0}")]
    AlreadyExists(String),

    /// Caller-supplied host values are invalid
    #[error("Invalid host configuration: {0}")]
    Validation(String),
}

impl ConfigError {
    pub(crate) fn io(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        ConfigError::Io(format!("Failed to {action} {}: {err}", path.display()))
    }
}
