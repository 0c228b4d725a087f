use serde::{Deserialize, Serialize};

use super::range::KeyRange;

/// Words a shard processor matched for one key range, with their count.
///
/// `count` must equal `words.len()`; the constructors and [`PartialResult::extend`]
/// keep that true, and validators check it on anything that arrives over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialResult {
    #[serde(alias = "letter_range")]
    pub range: KeyRange,
    pub count: usize,
    #[serde(default)]
    pub words: Vec<String>,
}

impl PartialResult {
    pub fn empty(range: KeyRange) -> Self {
        Self {
            range,
            count: 0,
            words: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_words(range: KeyRange, words: Vec<String>) -> Self {
        Self {
            range,
            count: words.len(),
            words,
        }
    }

    pub fn extend<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = String>,
    {
        for word in words {
            self.words.push(word);
            self.count += 1;
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.count == self.words.len()
    }
}
