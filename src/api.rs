//! Shared HTTP reply envelope.
//!
//! Every handler answers either `{"status": "..."}` or `{"error": "..."}` unless the
//! operation returns data of its own. Request bodies are decoded through
//! [`decode`] so that a malformed payload yields the same structured error as any
//! other rejection instead of axum's plain-text default.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ClusterError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiReply {
    Status { status: String },
    Error { error: String },
}

impl ApiReply {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            status: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

pub fn reply_ok(message: impl Into<String>) -> (StatusCode, Json<ApiReply>) {
    (StatusCode::OK, Json(ApiReply::status(message)))
}

pub fn reply_err(err: &ClusterError) -> (StatusCode, Json<ApiReply>) {
    if err.is_caller_error() {
        tracing::warn!("Rejected request: {}", err);
    } else {
        tracing::error!("Request failed: {}", err);
    }
    (err.status_code(), Json(ApiReply::error(err.to_string())))
}

/// Unwraps an optional JSON extraction into a typed payload or a `MalformedRequest`.
pub fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ClusterError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ClusterError::MalformedRequest(rejection.body_text()))
}
