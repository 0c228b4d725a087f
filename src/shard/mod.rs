//! Key Space Types
//!
//! The vocabulary shared by every role: the 26-letter key domain, the inclusive
//! [`KeyRange`] a shard processor owns, and the [`PartialResult`] it produces.

pub mod partial;
pub mod range;

pub use partial::PartialResult;
pub use range::{ALPHABET_LEN, KeyRange};
