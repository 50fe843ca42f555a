//! Search API client error types.

use std::sync::Arc;

use svgl_core::Error;

/// Errors from the SVGL API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Invalid search term.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-success HTTP response.
    #[error("HTTP error: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(Arc::new(err)) }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidQuery(msg) | ApiError::InvalidUrl(msg) => Error::InvalidInput(msg),
            ApiError::HttpStatus { status, reason } => Error::HttpStatus { status, reason },
            ApiError::Timeout => Error::Network("request timeout".to_string()),
            ApiError::Network(e) => Error::Network(e.to_string()),
            ApiError::Parse(msg) => Error::Parse(msg),
        }
    }
}
