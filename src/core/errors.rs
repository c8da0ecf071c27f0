//! Custom error types for API client operations

use thiserror::Error;

/// Client-side errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// A submitted string element had an unsupported shape
    #[error("invalid input string: {message}")]
    InvalidInput {
        /// Description of the offending element
        message: String,
    },

    /// A response was missing a field this client expected
    #[error("response is missing the `{field}` field")]
    ResponseShape {
        /// Name of the absent field
        field: &'static str,
    },

    /// The remote service answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body text, if any
        message: String,
    },

    /// Transport-level failure from the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper for anyhow errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Internal(err.to_string())
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
