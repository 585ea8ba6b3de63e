//! Error types for openlms.

use thiserror::Error;

/// Common error type for openlms.
#[derive(Error, Debug)]
pub enum LmsError {
    /// Database error.
    ///
    /// Wraps errors from the underlying store; sqlx errors convert
    /// automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Outbound mail delivery failed.
    #[error("mail error: {0}")]
    Mail(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for LmsError {
    fn from(e: sqlx::Error) -> Self {
        LmsError::Database(e.to_string())
    }
}

/// Result type alias for openlms operations.
pub type Result<T> = std::result::Result<T, LmsError>;
