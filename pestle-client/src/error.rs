//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Error envelope returned by the inventory API
    #[error("API error {code}: {message}")]
    Api {
        code: String,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Response did not match the expected schema
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Payload failed client-side validation; nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Transport-level failures are the only ones reads may retry.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
