//! Error types for CLI operations.

use thiserror::Error;

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// API server error.
    #[error("API server error: {0}")]
    Api(String),

    /// Chat storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] parley_core::Error),

    /// Command execution error.
    #[error("Command execution error: {0}")]
    Command(String),

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
