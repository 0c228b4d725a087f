use std::sync::Arc;
use tokio::sync::RwLock;

use super::protocol::Verdict;
use super::rules::validate;
use crate::aggregator::protocol::ENDPOINT_LEARN;
use crate::error::{ClusterError, Result};
use crate::membership::types::{MembershipSnapshot, endpoint_url};
use crate::shard::PartialResult;
use crate::sidecar::Sidecar;

pub struct Validator {
    peers: RwLock<MembershipSnapshot>,
    sidecar: Sidecar,
}

impl Validator {
    pub fn new(sidecar: Sidecar) -> Arc<Self> {
        Arc::new(Self {
            peers: RwLock::new(MembershipSnapshot::default()),
            sidecar,
        })
    }

    pub async fn update_membership(&self, snapshot: MembershipSnapshot) {
        tracing::info!("Updated nodes: learner {:?}", snapshot.learner);
        *self.peers.write().await = snapshot;
    }

    pub async fn learner(&self) -> Option<String> {
        self.peers.read().await.learner.clone()
    }

    /// Validates `partial` and forwards it unchanged to the learner.
    ///
    /// Validation failures are returned to the caller. An unreachable learner is
    /// not an error for the caller: the loss is logged and reported in the verdict.
    pub async fn accept(&self, partial: PartialResult) -> Result<Verdict> {
        tracing::debug!(
            "Received partial for {} ({} words)",
            partial.range,
            partial.count
        );
        validate(&partial)?;

        let Some(learner) = self.learner().await else {
            tracing::warn!("No learner registered, result for {} not forwarded", partial.range);
            return Ok(Verdict::NoAggregator);
        };

        match self
            .sidecar
            .send(&endpoint_url(&learner, ENDPOINT_LEARN), &partial)
            .await
        {
            Ok(reply) if !reply.is_success() => {
                tracing::warn!(
                    "Learner {} refused result for {} ({}): {}",
                    learner,
                    partial.range,
                    reply.status,
                    reply.body
                );
                Ok(Verdict::Refused {
                    status: reply.status,
                })
            }
            Ok(_) => {
                tracing::debug!("Forwarded result for {} to learner {}", partial.range, learner);
                Ok(Verdict::Forwarded)
            }
            Err(ClusterError::DeliveryExhausted { target, attempts }) => {
                tracing::warn!(
                    "Dropped result for {}: {} unreachable after {} attempt(s)",
                    partial.range,
                    target,
                    attempts
                );
                Ok(Verdict::Undelivered)
            }
            Err(e) => Err(e),
        }
    }
}
