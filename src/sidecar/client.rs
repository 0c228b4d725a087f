use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::policy::RetryPolicy;
use super::transport::{HttpTransport, Reply, Transport};
use crate::error::{ClusterError, Result};

/// Outbound delivery with bounded retry. Cheap to clone; holds no state of its own.
#[derive(Clone)]
pub struct Sidecar {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Sidecar {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Sidecar over plain HTTP, as used by every node binary.
    pub fn http(policy: RetryPolicy, request_timeout: Duration) -> Self {
        Self::new(Arc::new(HttpTransport::new(request_timeout)), policy)
    }

    /// Sends `payload` to `target` using the sidecar's default policy.
    pub async fn send<T>(&self, target: &str, payload: &T) -> Result<Reply>
    where
        T: Serialize + ?Sized,
    {
        self.send_with(target, payload, self.policy).await
    }

    /// Attempts delivery up to `policy.max_retries` times, sleeping `policy.backoff`
    /// between failed attempts. Returns the first reply received, or
    /// `DeliveryExhausted` once the attempts run out.
    pub async fn send_with<T>(&self, target: &str, payload: &T, policy: RetryPolicy) -> Result<Reply>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_value(payload)?;

        for attempt in 0..policy.max_retries {
            tracing::debug!("Sending to {} (attempt {}): {}", target, attempt + 1, body);

            match self.transport.post_json(target, &body).await {
                Ok(reply) => {
                    tracing::debug!("Response from {}: {}", target, reply.status);
                    return Ok(reply);
                }
                Err(e) => {
                    tracing::warn!("Attempt {} to {} failed: {}", attempt + 1, target, e);
                    if policy.should_retry(attempt) {
                        tokio::time::sleep(policy.backoff).await;
                    }
                }
            }
        }

        tracing::error!("All {} attempts failed for {}", policy.max_retries, target);
        Err(ClusterError::DeliveryExhausted {
            target: target.to_string(),
            attempts: policy.max_retries,
        })
    }

    /// Fire-and-forget variant: delivers from a background task and logs the outcome.
    pub fn spawn_send<T>(&self, target: String, payload: T) -> JoinHandle<()>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let sidecar = self.clone();
        tokio::spawn(async move {
            match sidecar.send(&target, &payload).await {
                Ok(reply) if !reply.is_success() => {
                    tracing::warn!("{} answered {}: {}", target, reply.status, reply.body);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Dropped message: {}", e);
                }
            }
        })
    }
}
