//! Aggregator Tests
//!
//! ## Test Scopes
//! - **Report**: Bucketing, deduplication, ordering, empty words.
//! - **Service**: Idempotent and order-independent merges, reset.

#[cfg(test)]
mod tests {
    use crate::aggregator::protocol::ReportRow;
    use crate::aggregator::report::AggregatedReport;
    use crate::aggregator::service::Aggregator;
    use crate::shard::{KeyRange, PartialResult};

    fn partial(range: &str, words: &[&str]) -> PartialResult {
        PartialResult::from_words(
            range.parse::<KeyRange>().unwrap(),
            words.iter().map(|w| w.to_string()).collect(),
        )
    }

    fn row(letter: char, words: &[&str]) -> ReportRow {
        ReportRow {
            letter,
            count: words.len(),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    // ============================================================
    // REPORT TESTS
    // ============================================================

    #[test]
    fn test_merge_buckets_by_first_letter() {
        let mut report = AggregatedReport::new();

        let added = report.merge(&partial("A-Z", &["fox", "the", "quick", "fast"]));

        assert_eq!(added, 4);
        assert_eq!(
            report.rows(),
            vec![
                row('f', &["fox", "fast"]),
                row('q', &["quick"]),
                row('t', &["the"]),
            ]
        );
    }

    #[test]
    fn test_duplicate_word_counted_once() {
        let mut report = AggregatedReport::new();

        report.merge(&partial("A-M", &["fox"]));
        let added = report.merge(&partial("A-M", &["fox", "fox"]));

        assert_eq!(added, 0);
        assert_eq!(report.bucket('f').unwrap().count(), 1);
        assert_eq!(report.bucket('f').unwrap().words(), ["fox"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive_but_bucket_is_not() {
        let mut report = AggregatedReport::new();

        report.merge(&partial("A-Z", &["Fox", "fox"]));

        assert_eq!(report.rows(), vec![row('f', &["Fox", "fox"])]);
    }

    #[test]
    fn test_empty_words_are_skipped() {
        let mut report = AggregatedReport::new();

        assert!(!report.record(""));
        assert!(report.is_empty());
    }

    #[test]
    fn test_clear_removes_all_buckets() {
        let mut report = AggregatedReport::new();
        report.merge(&partial("A-Z", &["apple", "zebra"]));

        report.clear();

        assert!(report.is_empty());
        assert!(report.rows().is_empty());
    }

    // ============================================================
    // SERVICE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let aggregator = Aggregator::new();
        let message = partial("N-Z", &["the", "quick"]);

        aggregator.merge(&message).await;
        let once = aggregator.report().await;
        aggregator.merge(&message).await;
        aggregator.merge(&message).await;

        assert_eq!(aggregator.report().await, once);
    }

    #[tokio::test]
    async fn test_merge_is_order_independent() {
        let first = Aggregator::new();
        let second = Aggregator::new();
        let a = partial("A-M", &["fox", "apple"]);
        let b = partial("N-Z", &["the", "quick", "zebra"]);

        first.merge(&a).await;
        first.merge(&b).await;
        second.merge(&b).await;
        second.merge(&a).await;

        assert_eq!(first.report().await, second.report().await);
    }

    #[tokio::test]
    async fn test_cumulative_resends_do_not_inflate_counts() {
        // ARRANGE
        let aggregator = Aggregator::new();

        // ACT
        aggregator.merge(&partial("A-M", &["fox"])).await;
        aggregator.merge(&partial("A-M", &["fox", "fox"])).await;
        aggregator.merge(&partial("A-M", &["fox", "fox", "apple"])).await;

        // ASSERT
        let report = aggregator.report().await;
        assert_eq!(report.results, vec![row('a', &["apple"]), row('f', &["fox"])]);
    }

    #[tokio::test]
    async fn test_reset_then_merge_starts_fresh() {
        let aggregator = Aggregator::new();
        aggregator.merge(&partial("A-M", &["fox"])).await;

        aggregator.reset().await;
        aggregator.merge(&partial("N-Z", &["the"])).await;

        assert_eq!(aggregator.report().await.results, vec![row('t', &["the"])]);
    }

    #[test]
    fn test_report_serializes_letters_as_strings() {
        let mut report = AggregatedReport::new();
        report.merge(&partial("A-Z", &["fox"]));

        let json = serde_json::to_value(report.rows()).unwrap();

        assert_eq!(json, serde_json::json!([{"letter": "f", "count": 1, "words": ["fox"]}]));
    }
}
