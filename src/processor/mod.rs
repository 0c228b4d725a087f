//! Shard Processor Module
//!
//! Owns one key range at a time. Each incoming line is tokenized, reduced to the
//! words whose first letter lies in the range, and folded into a cumulative
//! [`PartialResult`](crate::shard::PartialResult). After every line the *whole*
//! cumulative result, not the delta, goes to up to two validators, so a lost or
//! reordered message is repaired by the next one.
//!
//! ## Submodules
//! - **`tokenizer`**: Word splitting, range filtering, lossy upload decoding.
//! - **`service`**: The stateful processor.
//! - **`handlers`**: Axum routes for lines, uploads, range pushes and membership.
//! - **`protocol`**: Endpoints and DTOs.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod tokenizer;

#[cfg(test)]
mod tests;
