use regex::Regex;
use std::sync::LazyLock;

use crate::shard::KeyRange;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+").expect("word pattern is a valid regex"));

/// Splits `text` into maximal runs of ASCII letters, lowercased, in order of
/// appearance. Duplicates are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(&text.to_ascii_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokens of `text` whose first letter falls inside `range`.
pub fn tokens_in_range(text: &str, range: &KeyRange) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|word| range.contains_word(word))
        .collect()
}

/// Decodes an upload as UTF-8, silently dropping bytes that are not valid UTF-8.
pub fn decode_lossy(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
