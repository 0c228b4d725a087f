//! Validator Network Protocol

use serde::{Deserialize, Serialize};

/// Partial result submitted by a shard processor.
pub const ENDPOINT_ACCEPT: &str = "/accept";

/// What happened to a partial result that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The learner acknowledged the forward.
    Forwarded,
    /// The learner answered, but with a non-success status.
    Refused { status: u16 },
    /// The learner could not be reached after every attempt.
    Undelivered,
    /// No learner has registered yet.
    NoAggregator,
}

impl Verdict {
    pub fn describe(&self) -> &'static str {
        match self {
            Verdict::Forwarded => "Accepted",
            Verdict::Refused { .. } => "Accepted (aggregator refused the result)",
            Verdict::Undelivered => "Accepted (aggregator unreachable)",
            Verdict::NoAggregator => "Accepted (no aggregator registered)",
        }
    }
}
