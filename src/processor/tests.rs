//! Shard Processor Tests
//!
//! ## Test Scopes
//! - **Tokenizer**: Word boundaries, case folding, range filtering, lossy decoding.
//! - **Processing**: Cumulative accumulation, range errors, fan-out to validators.
//! - **Bulk ingest**: State replacement, aggregator reset, first-error stop.

#[cfg(test)]
mod tests {
    use crate::error::ClusterError;
    use crate::membership::types::MembershipSnapshot;
    use crate::processor::service::ShardProcessor;
    use crate::processor::tokenizer::{decode_lossy, tokenize, tokens_in_range};
    use crate::shard::{KeyRange, PartialResult};
    use crate::sidecar::mock::RecordingTransport;
    use crate::sidecar::{RetryPolicy, Sidecar};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn range(raw: &str) -> KeyRange {
        raw.parse().unwrap()
    }

    fn snapshot(validators: &[&str], learner: Option<&str>) -> MembershipSnapshot {
        MembershipSnapshot {
            shard_processors: vec![],
            validators: validators.iter().map(|v| v.to_string()).collect(),
            learner: learner.map(str::to_string),
            version: 1,
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(5))
    }

    /// Processor whose deliveries all succeed and are not inspected.
    fn quiet_processor(initial: Option<&str>) -> Arc<ShardProcessor> {
        let sidecar = Sidecar::new(Arc::new(RecordingTransport::new()), policy());
        ShardProcessor::new(sidecar, initial.map(range))
    }

    fn processor_on(
        transport: &Arc<RecordingTransport>,
        initial: Option<&str>,
    ) -> Arc<ShardProcessor> {
        ShardProcessor::new(Sidecar::new(transport.clone(), policy()), initial.map(range))
    }

    async fn next_delivery(rx: &mut UnboundedReceiver<(String, Value)>) -> (String, Value) {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("delivery should arrive")
            .expect("channel open")
    }

    // ============================================================
    // TOKENIZER TESTS
    // ============================================================

    #[test]
    fn test_tokenize_lowercases_and_keeps_order() {
        assert_eq!(tokenize("The Quick Fox"), vec!["the", "quick", "fox"]);
    }

    #[test]
    fn test_tokenize_splits_on_any_non_letter() {
        assert_eq!(
            tokenize("don't stop-me now, abc123def!"),
            vec!["don", "t", "stop", "me", "now", "abc", "def"]
        );
    }

    #[test]
    fn test_tokenize_keeps_duplicates_and_short_words() {
        assert_eq!(tokenize("a fox A FOX"), vec!["a", "fox", "a", "fox"]);
    }

    #[test]
    fn test_tokenize_blank_text() {
        assert!(tokenize("   \t 123 ...").is_empty());
    }

    #[test]
    fn test_tokens_in_range_filters_by_first_letter() {
        let words = tokens_in_range("The Quick brown Fox jumps", &range("A-M"));

        assert_eq!(words, vec!["brown", "fox", "jumps"]);
    }

    #[test]
    fn test_inverted_range_filters_everything() {
        assert!(tokens_in_range("The Quick Fox", &range("Z-A")).is_empty());
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        let bytes = b"fox\xff\xfe jumps\nover";

        assert_eq!(decode_lossy(bytes), "fox jumps\nover");
    }

    // ============================================================
    // PROCESS LINE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_process_line_without_range_fails() {
        let processor = quiet_processor(None);

        let result = processor.process_line("The Quick Fox").await;

        assert!(matches!(result, Err(ClusterError::RangeNotSet)));
    }

    #[tokio::test]
    async fn test_set_range_rejects_malformed_input() {
        let processor = quiet_processor(None);

        let result = processor.set_range("A to M", None).await;

        assert!(matches!(result, Err(ClusterError::InvalidRangeFormat(_))));
        assert_eq!(processor.range().await, None);
    }

    #[tokio::test]
    async fn test_process_line_accumulates_across_calls() {
        // ARRANGE
        let processor = quiet_processor(None);
        processor.set_range("A-M", Some(2)).await.unwrap();

        // ACT
        let first = processor.process_line("The Quick Fox").await.unwrap();
        let second = processor.process_line("fox again").await.unwrap();

        // ASSERT
        assert_eq!(first, PartialResult::from_words(range("A-M"), vec!["fox".to_string()]));
        assert_eq!(second.words, vec!["fox", "fox", "again"]);
        assert_eq!(second.count, 3);
        assert!(second.is_consistent());

        let state = processor.state().await;
        assert_eq!(state.version, Some(2));
        assert_eq!(state.partials, vec![second]);
    }

    #[tokio::test]
    async fn test_inverted_range_is_accepted_and_matches_nothing() {
        let processor = quiet_processor(None);

        processor.set_range("Z-A", None).await.unwrap();
        let partial = processor.process_line("The Quick Fox").await.unwrap();

        assert_eq!(partial.count, 0);
        assert!(partial.words.is_empty());
    }

    #[tokio::test]
    async fn test_cumulative_result_is_sent_to_first_two_validators() {
        // ARRANGE
        let (transport, mut rx) = RecordingTransport::with_channel();
        let processor = ShardProcessor::new(Sidecar::new(Arc::new(transport), policy()), None);
        processor.set_range("N-Z", None).await.unwrap();
        processor
            .update_membership(snapshot(&["http://v1", "http://v2", "http://v3"], None))
            .await;

        // ACT
        processor.process_line("The Quick Fox").await.unwrap();

        // ASSERT
        let mut targets = vec![next_delivery(&mut rx).await, next_delivery(&mut rx).await];
        targets.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(targets[0].0, "http://v1/accept");
        assert_eq!(targets[1].0, "http://v2/accept");
        for (_, body) in &targets {
            let partial: PartialResult = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(partial.range, range("N-Z"));
            assert_eq!(partial.words, vec!["the", "quick"]);
        }
        assert!(
            tokio::time::timeout(Duration::from_millis(100), rx.recv())
                .await
                .is_err(),
            "third validator must not be addressed"
        );
    }

    #[tokio::test]
    async fn test_unreachable_validator_does_not_fail_line() {
        let transport = Arc::new(RecordingTransport::failing());
        let processor = processor_on(&transport, Some("A-Z"));
        processor.update_membership(snapshot(&["http://down"], None)).await;

        let result = processor.process_line("fox").await;

        assert!(result.is_ok());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(transport.attempts(), 3);
    }

    #[tokio::test]
    async fn test_reassignment_keeps_old_range_results() {
        let processor = quiet_processor(Some("A-Z"));

        processor.process_line("apple zebra").await.unwrap();
        processor.set_range("A-M", None).await.unwrap();
        processor.process_line("apple zebra").await.unwrap();

        let state = processor.state().await;
        assert_eq!(state.partials.len(), 2);
        assert_eq!(state.partials[0].range, range("A-M"));
        assert_eq!(state.partials[0].words, vec!["apple"]);
        assert_eq!(state.partials[1].range, range("A-Z"));
        assert_eq!(state.partials[1].words, vec!["apple", "zebra"]);
    }

    // ============================================================
    // BULK INGEST TESTS
    // ============================================================

    #[tokio::test]
    async fn test_bulk_ingest_resets_state_and_aggregator() {
        // ARRANGE
        let transport = Arc::new(RecordingTransport::new());
        let processor = processor_on(&transport, Some("A-Z"));
        processor
            .update_membership(snapshot(&[], Some("http://learner")))
            .await;
        processor.process_line("stale words").await.unwrap();

        // ACT
        let processed = processor
            .bulk_ingest(["The Quick Fox", "", "   ", "jumps"])
            .await
            .unwrap();

        // ASSERT
        assert_eq!(processed, 2);
        assert_eq!(transport.sent_to("http://learner/reset").len(), 1);
        let state = processor.state().await;
        assert_eq!(state.partials.len(), 1);
        assert_eq!(state.partials[0].words, vec!["the", "quick", "fox", "jumps"]);
    }

    #[tokio::test]
    async fn test_bulk_ingest_stops_at_first_error() {
        let transport = Arc::new(RecordingTransport::new());
        let processor = processor_on(&transport, None);

        let result = processor.bulk_ingest(["one", "two"]).await;

        assert!(matches!(result, Err(ClusterError::RangeNotSet)));
        assert!(processor.state().await.partials.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_ingest_without_learner_still_processes() {
        let transport = Arc::new(RecordingTransport::new());
        let processor = processor_on(&transport, Some("A-M"));

        let processed = processor.bulk_ingest(["apple", "mango"]).await.unwrap();

        assert_eq!(processed, 2);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_bytes_with_invalid_utf8() {
        let processor = quiet_processor(Some("A-Z"));

        let processed = processor
            .ingest_bytes(b"fox\xff jumps\r\n\r\nover \xc3\x28dog\n")
            .await
            .unwrap();

        assert_eq!(processed, 2);
        let state = processor.state().await;
        assert_eq!(state.partials[0].words, vec!["fox", "jumps", "over", "dog"]);
    }

    #[tokio::test]
    async fn test_reset_clears_cumulative_results() {
        let processor = quiet_processor(Some("A-Z"));
        processor.process_line("fox").await.unwrap();

        processor.reset();
        let partial = processor.process_line("fox").await.unwrap();

        assert_eq!(partial.count, 1);
    }
}
