//! Cluster Error Taxonomy
//!
//! Every failure the coordination protocol can surface to a caller. Validation
//! variants describe caller bugs and map to 4xx responses; they are never retried.
//! `DeliveryExhausted` is produced by the sidecar and is normally logged and
//! swallowed by the sender.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid node role: {0:?}")]
    InvalidRole(String),

    #[error("Invalid range format: {0:?} (expected \"X-Y\")")]
    InvalidRangeFormat(String),

    #[error("Range not set")]
    RangeNotSet,

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Count mismatch: declared {declared}, carried {actual} words")]
    CountMismatch { declared: usize, actual: usize },

    #[error("Delivery to {target} failed after {attempts} attempt(s)")]
    DeliveryExhausted { target: String, attempts: u32 },

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;

impl ClusterError {
    /// HTTP status used when this error is reported to a remote caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField(_)
            | Self::InvalidRole(_)
            | Self::InvalidRangeFormat(_)
            | Self::RangeNotSet
            | Self::InvalidRange(_)
            | Self::CountMismatch { .. }
            | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::DeliveryExhausted { .. } => StatusCode::BAD_GATEWAY,
            Self::Serialization(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for errors caused by the request itself rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
