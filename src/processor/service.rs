use dashmap::DashMap;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::protocol::ProcessorState;
use super::tokenizer::{decode_lossy, tokens_in_range};
use crate::aggregator::protocol::ENDPOINT_RESET as AGGREGATOR_RESET;
use crate::error::{ClusterError, Result};
use crate::membership::types::{MembershipSnapshot, endpoint_url};
use crate::shard::{KeyRange, PartialResult};
use crate::sidecar::Sidecar;
use crate::validator::protocol::ENDPOINT_ACCEPT;

/// How many validators each cumulative result is sent to.
pub const VALIDATOR_FANOUT: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
struct RangeAssignment {
    range: Option<KeyRange>,
    version: Option<u64>,
}

/// Shard processor: filters lines down to its assigned range and keeps a running
/// result per range.
///
/// Cumulative results are keyed by the range that was current when the words were
/// counted. After a reassignment, words gathered under the old range stay there
/// until the next reset.
pub struct ShardProcessor {
    assignment: RwLock<RangeAssignment>,
    partials: DashMap<KeyRange, PartialResult>,
    peers: RwLock<MembershipSnapshot>,
    sidecar: Sidecar,
}

impl ShardProcessor {
    pub fn new(sidecar: Sidecar, initial_range: Option<KeyRange>) -> Arc<Self> {
        if let Some(range) = initial_range {
            tracing::info!("Shard processor starting with range {}", range);
        }

        Arc::new(Self {
            assignment: RwLock::new(RangeAssignment {
                range: initial_range,
                version: None,
            }),
            partials: DashMap::new(),
            peers: RwLock::new(MembershipSnapshot::default()),
            sidecar,
        })
    }

    /// Parses and installs a new range. Accumulated results are left untouched.
    pub async fn set_range(&self, raw: &str, version: Option<u64>) -> Result<KeyRange> {
        tracing::info!("Attempting to set range: {}", raw);
        let range: KeyRange = raw.parse()?;

        let mut assignment = self.assignment.write().await;
        if let (Some(new), Some(current)) = (version, assignment.version)
            && new < current
        {
            tracing::warn!("Range {} arrives with older version {} < {}", range, new, current);
        }
        assignment.range = Some(range);
        assignment.version = version.or(assignment.version);

        tracing::info!("Set range: {}", range);
        Ok(range)
    }

    pub async fn range(&self) -> Option<KeyRange> {
        self.assignment.read().await.range
    }

    pub async fn update_membership(&self, snapshot: MembershipSnapshot) {
        tracing::info!(
            "Updated nodes: {} validator(s), learner {:?}",
            snapshot.validators.len(),
            snapshot.learner
        );
        *self.peers.write().await = snapshot;
    }

    /// Tokenizes `text`, adds in-range words to the running result for the current
    /// range, and sends the whole cumulative result to the validators in the
    /// background.
    pub async fn process_line(&self, text: &str) -> Result<PartialResult> {
        let range = self.range().await.ok_or(ClusterError::RangeNotSet)?;

        let matched = tokens_in_range(text, &range);
        tracing::debug!("Matched words for {}: {:?}", range, matched);

        let cumulative = {
            let mut entry = self
                .partials
                .entry(range)
                .or_insert_with(|| PartialResult::empty(range));
            entry.extend(matched);
            entry.clone()
        };

        self.forward_to_validators(&cumulative).await;
        Ok(cumulative)
    }

    /// Replaces all cumulative state with the result of processing `lines`.
    ///
    /// Clears local state, asks the aggregator to reset (best effort), then
    /// processes each non-blank line and stops at the first failure.
    pub async fn bulk_ingest<I, S>(&self, lines: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reset();
        self.reset_aggregator().await;

        let mut processed = 0;
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            self.process_line(line).await?;
            processed += 1;
        }

        Ok(processed)
    }

    /// Bulk-ingests a raw upload, one line per newline.
    pub async fn ingest_bytes(&self, bytes: &[u8]) -> Result<usize> {
        let text = decode_lossy(bytes);
        self.bulk_ingest(text.lines()).await
    }

    pub fn reset(&self) {
        self.partials.clear();
        tracing::info!("Cleared cumulative results");
    }

    pub async fn state(&self) -> ProcessorState {
        let assignment = *self.assignment.read().await;
        let mut partials: Vec<PartialResult> = self
            .partials
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        partials.sort_by_key(|p| p.range);

        ProcessorState {
            range: assignment.range,
            version: assignment.version,
            partials,
        }
    }

    async fn forward_to_validators(&self, partial: &PartialResult) {
        let validators = self.peers.read().await.validator_targets(VALIDATOR_FANOUT);
        if validators.is_empty() {
            tracing::info!("No validators registered");
            return;
        }

        for address in validators {
            tracing::debug!("Sending {} words for {} to {}", partial.count, partial.range, address);
            self.sidecar
                .spawn_send(endpoint_url(&address, ENDPOINT_ACCEPT), partial.clone());
        }
    }

    async fn reset_aggregator(&self) {
        let Some(learner) = self.peers.read().await.learner.clone() else {
            tracing::warn!("No learner registered, skipping reset");
            return;
        };

        match self
            .sidecar
            .send(&endpoint_url(&learner, AGGREGATOR_RESET), &json!({}))
            .await
        {
            Ok(_) => tracing::info!("Sent reset request to learner: {}", learner),
            Err(e) => tracing::warn!("Failed to reset learner: {}", e),
        }
    }
}
