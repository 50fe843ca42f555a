//! Unified error types for svgl.
//!
//! Every failure inside the query pipeline is expressed as one of these
//! variants. None of them is fatal: the orchestrator turns top-level errors
//! into a single explanatory result entry, drops items on asset errors and
//! turns cancellation into an empty result set.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the svgl pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unknown variant name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Transport failure talking to the search API.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// The search API answered with a non-success status.
    #[error("HTTP_STATUS: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Too many search calls in the trailing minute.
    #[error("RATE_LIMITED: too many searches, try again later")]
    RateLimitExceeded,

    /// Search API response could not be decoded.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Fetching or deriving the assets of a single item failed.
    #[error("ASSET_FETCH_ERROR: item {item_id}: {reason}")]
    AssetFetch { item_id: u64, reason: String },

    /// Request was superseded by a newer query or canceled by the host.
    #[error("CANCELED")]
    Canceled,

    /// No cached asset for the requested item.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Local filesystem operation failed.
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error represents cancellation rather than a failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled)
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Network(msg) => (-32008, msg.clone()),
            Error::HttpStatus { status, reason } => (-32008, format!("HTTP {status} {reason}")),
            Error::RateLimitExceeded => (-32010, "Too many searches, try again later".to_string()),
            Error::Parse(msg) => (-32000, msg.clone()),
            Error::AssetFetch { .. } => (-32007, err.to_string()),
            Error::Canceled => (-32800, "Request canceled".to_string()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::Io(e) => (-32002, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
