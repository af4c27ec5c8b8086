//! Error types for the schedule overrides Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving override requests.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unusable request input
    #[error("{0}")]
    Validation(String),

    /// Admin header absent or mismatched
    #[error("Unauthorized")]
    Unauthorized,

    /// No admin secret configured for this deployment
    #[error("Admin key not configured")]
    NotConfigured,

    /// HTTP method outside GET/POST/DELETE/OPTIONS
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Blob store error
    #[error("Store error: {0}")]
    Store(String),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Unauthorized => 401,
            Error::MethodNotAllowed => 405,
            _ => 500,
        }
    }
}
