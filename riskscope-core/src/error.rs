//! Error types for riskscope-core

use thiserror::Error;

/// Main error type for the riskscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Document store error
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Form field failed validation; blocks submission
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Upstream service unreachable, non-2xx, or returned a malformed payload
    #[error("{service} service error: {message}")]
    Upstream { service: String, message: String },
}

impl Error {
    /// Validation error for a named form field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Upstream error for a named collaborator service.
    pub fn upstream(service: &str, message: impl Into<String>) -> Self {
        Error::Upstream {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for riskscope-core
pub type Result<T> = std::result::Result<T, Error>;
