//! Point-to-point JSON delivery.
//!
//! The sidecar only needs "POST this JSON to that URL and tell me whether it
//! arrived". Any HTTP response counts as arrival; only connection, timeout and
//! body-read failures are transport errors.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// A response that made it back from the target, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    /// Decoded JSON body, or `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Reply, TransportError>;
}

/// `reqwest`-backed transport with a per-request timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Reply, TransportError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        // A body that fails mid-read is a broken delivery, not a reply.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Ok(Reply { status, body })
    }
}
