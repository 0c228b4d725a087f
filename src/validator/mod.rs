//! Validator Module
//!
//! Stateless gatekeeper between shard processors and the aggregator. Every
//! incoming [`PartialResult`](crate::shard::PartialResult) is checked for internal
//! consistency and, if it passes, forwarded unchanged to the current learner.
//! Rejected results are reported to the caller and dropped; nothing is retried.

pub mod handlers;
pub mod protocol;
pub mod rules;
pub mod service;
