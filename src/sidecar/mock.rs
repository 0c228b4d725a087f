//! In-process transports for unit tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::mpsc;

use super::transport::{Reply, Transport, TransportError};

/// Records every delivery and answers `200 {"status": "ok"}`. Built with
/// [`RecordingTransport::failing`] it fails every attempt instead; built with
/// [`RecordingTransport::answering`] it replies with another status.
pub struct RecordingTransport {
    fail: bool,
    status: u16,
    attempts: AtomicU32,
    sent: Mutex<Vec<(String, Value)>>,
    notify: Option<mpsc::UnboundedSender<(String, Value)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            fail: false,
            status: 200,
            attempts: AtomicU32::new(0),
            sent: Mutex::new(Vec::new()),
            notify: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn answering(status: u16) -> Self {
        Self {
            status,
            ..Self::new()
        }
    }

    /// Transport that also streams each successful delivery to the returned receiver.
    pub fn with_channel() -> (Self, mpsc::UnboundedReceiver<(String, Value)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            notify: Some(tx),
            ..Self::new()
        };
        (transport, rx)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, url: &str) -> Vec<Value> {
        self.sent()
            .into_iter()
            .filter(|(target, _)| target == url)
            .map(|(_, body)| body)
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Reply, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TransportError(format!("connection refused: {}", url)));
        }

        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        if let Some(tx) = &self.notify {
            let _ = tx.send((url.to_string(), payload.clone()));
        }

        let body = if (200..300).contains(&self.status) {
            json!({"status": "ok"})
        } else {
            json!({"error": "rejected"})
        };
        Ok(Reply {
            status: self.status,
            body,
        })
    }
}
