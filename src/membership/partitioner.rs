use super::types::Assignment;
use crate::shard::{ALPHABET_LEN, KeyRange};

/// Letters per block when the alphabet is split across `processors` workers.
pub fn block_size(processors: usize) -> usize {
    ALPHABET_LEN.div_ceil(processors.max(1))
}

/// Splits the alphabet into contiguous blocks of `ceil(26 / n)` letters, one per
/// processor in order. The final block may be shorter, and any processor whose
/// block would start past `Z` gets `None`.
pub fn partition(processors: usize) -> Vec<Option<KeyRange>> {
    if processors == 0 {
        return Vec::new();
    }

    let size = block_size(processors);
    (0..processors)
        .map(|i| {
            let start = i * size;
            if start >= ALPHABET_LEN {
                return None;
            }
            let end = (start + size - 1).min(ALPHABET_LEN - 1);
            Some(KeyRange::from_indices(start, end))
        })
        .collect()
}

/// Pairs each processor address (registration order) with its block.
pub fn assign_ranges(addresses: &[String]) -> Vec<Assignment> {
    addresses
        .iter()
        .zip(partition(addresses.len()))
        .map(|(address, range)| Assignment {
            address: address.clone(),
            range,
        })
        .collect()
}
