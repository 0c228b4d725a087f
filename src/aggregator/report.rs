use std::collections::{BTreeMap, HashSet};

use super::protocol::ReportRow;
use crate::shard::PartialResult;

/// Distinct words sharing a first letter, in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct LetterBucket {
    words: Vec<String>,
    seen: HashSet<String>,
}

impl LetterBucket {
    fn insert(&mut self, word: &str) -> bool {
        if self.seen.contains(word) {
            return false;
        }
        self.seen.insert(word.to_string());
        self.words.push(word.to_string());
        true
    }

    pub fn count(&self) -> usize {
        self.words.len()
    }

    #[cfg(test)]
    pub(crate) fn words(&self) -> &[String] {
        &self.words
    }
}

/// Merged, deduplicated view of every partial result received.
///
/// Buckets are keyed by the lowercase first character of each word. Words are
/// compared exactly as stored, so `Fox` and `fox` land in the same bucket as two
/// entries.
#[derive(Debug, Clone, Default)]
pub struct AggregatedReport {
    buckets: BTreeMap<char, LetterBucket>,
}

impl AggregatedReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds every word of `partial` into the report. Returns how many words were new.
    pub fn merge(&mut self, partial: &PartialResult) -> usize {
        partial
            .words
            .iter()
            .filter(|word| self.record(word))
            .count()
    }

    /// Adds a single word if it has not been seen. Empty words are ignored.
    pub fn record(&mut self, word: &str) -> bool {
        let Some(first) = word.chars().next() else {
            return false;
        };

        let letter = first.to_lowercase().next().unwrap_or(first);
        self.buckets.entry(letter).or_default().insert(word)
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    #[cfg(test)]
    pub(crate) fn bucket(&self, letter: char) -> Option<&LetterBucket> {
        self.buckets.get(&letter)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets sorted by letter.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.buckets
            .iter()
            .map(|(letter, bucket)| ReportRow {
                letter: *letter,
                count: bucket.count(),
                words: bucket.words.clone(),
            })
            .collect()
    }
}
