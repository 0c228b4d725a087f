use std::sync::Arc;
use tokio::sync::RwLock;

use super::protocol::ReportResponse;
use super::report::AggregatedReport;
use crate::shard::PartialResult;

#[derive(Default)]
pub struct Aggregator {
    report: RwLock<AggregatedReport>,
}

impl Aggregator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn merge(&self, partial: &PartialResult) -> usize {
        let added = self.report.write().await.merge(partial);
        tracing::debug!(
            "Merged result for {}: {} of {} word(s) new",
            partial.range,
            added,
            partial.count
        );
        added
    }

    pub async fn reset(&self) {
        self.report.write().await.clear();
        tracing::info!("Cleared aggregated results");
    }

    pub async fn report(&self) -> ReportResponse {
        ReportResponse {
            results: self.report.read().await.rows(),
        }
    }
}
