use crate::error::{ClusterError, Result};
use crate::shard::PartialResult;

/// Checks a partial result before it may reach the aggregator.
///
/// 1. The range must not be inverted.
/// 2. Every word must start with a letter inside the range.
/// 3. `count` must equal the number of words carried.
pub fn validate(partial: &PartialResult) -> Result<()> {
    let range = partial.range;

    if !range.is_well_formed() {
        return Err(ClusterError::InvalidRange(format!(
            "range {} starts after it ends",
            range
        )));
    }

    if let Some(word) = partial.words.iter().find(|w| !range.contains_word(w)) {
        return Err(ClusterError::InvalidRange(format!(
            "word {:?} is outside range {}",
            word, range
        )));
    }

    if !partial.is_consistent() {
        return Err(ClusterError::CountMismatch {
            declared: partial.count,
            actual: partial.words.len(),
        });
    }

    Ok(())
}
