//! Error types for the rategate crate.

use thiserror::Error;

/// Main error type for gate operations.
#[derive(Error, Debug)]
pub enum RateGateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gate operations.
pub type Result<T> = std::result::Result<T, RateGateError>;
