use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClusterError, Result};

/// Number of symbols in the key domain (`A..=Z`).
pub const ALPHABET_LEN: usize = 26;

/// Returns the uppercase letter at `index` in the key domain.
///
/// Callers guarantee `index < ALPHABET_LEN`.
pub fn letter_at(index: usize) -> char {
    debug_assert!(index < ALPHABET_LEN);
    (b'A' + index as u8) as char
}

/// Inclusive, case-insensitive slice of the alphabet, e.g. `A-M`.
///
/// Both bounds are stored uppercase. A range whose `start` lies after its `end`
/// can be constructed (the processor accepts it as an assignment) but contains
/// no letter at all; validators reject it as malformed.
///
/// On the wire a range is always the string `"X-Y"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyRange {
    start: char,
    end: char,
}

impl KeyRange {
    pub fn new(start: char, end: char) -> Result<Self> {
        if !start.is_ascii_alphabetic() || !end.is_ascii_alphabetic() {
            return Err(ClusterError::InvalidRangeFormat(format!("{}-{}", start, end)));
        }
        Ok(Self {
            start: start.to_ascii_uppercase(),
            end: end.to_ascii_uppercase(),
        })
    }

    /// Range spanning alphabet positions `start..=end`.
    pub(crate) fn from_indices(start: usize, end: usize) -> Self {
        Self {
            start: letter_at(start),
            end: letter_at(end),
        }
    }

    pub fn full() -> Self {
        Self::from_indices(0, ALPHABET_LEN - 1)
    }

    pub fn start(&self) -> char {
        self.start
    }

    pub fn end(&self) -> char {
        self.end
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains_letter(&self, letter: char) -> bool {
        if !letter.is_ascii_alphabetic() {
            return false;
        }
        let letter = letter.to_ascii_uppercase();
        self.start <= letter && letter <= self.end
    }

    /// Whether the first character of `word` falls inside the range.
    /// An empty word has no first character and is never contained.
    pub fn contains_word(&self, word: &str) -> bool {
        word.chars()
            .next()
            .is_some_and(|first| self.contains_letter(first))
    }

    #[cfg(test)]
    pub(crate) fn letters(&self) -> impl Iterator<Item = char> {
        self.start..=self.end
    }

    /// Number of letters covered; zero for an inverted range.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        if self.is_well_formed() {
            (self.end as usize) - (self.start as usize) + 1
        } else {
            0
        }
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn overlaps(&self, other: &KeyRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start <= other.end
            && other.start <= self.end
    }
}

impl FromStr for KeyRange {
    type Err = ClusterError;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || ClusterError::InvalidRangeFormat(raw.to_string());

        let (start, end) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let start = single_char(start).ok_or_else(invalid)?;
        let end = single_char(end).ok_or_else(invalid)?;

        KeyRange::new(start, end).map_err(|_| invalid())
    }
}

fn single_char(side: &str) -> Option<char> {
    let mut chars = side.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl TryFrom<String> for KeyRange {
    type Error = ClusterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<KeyRange> for String {
    fn from(range: KeyRange) -> Self {
        range.to_string()
    }
}
