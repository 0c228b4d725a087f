use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClusterError;
use crate::shard::KeyRange;

/// Worker roles the coordinator tracks.
///
/// The legacy role labels (`proposer`, `acceptor`, `learner`) are accepted as
/// aliases; they carry no consensus semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ShardProcessor,
    Validator,
    Aggregator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ShardProcessor => "shard_processor",
            Role::Validator => "validator",
            Role::Aggregator => "aggregator",
        }
    }
}

impl FromStr for Role {
    type Err = ClusterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "shard_processor" | "proposer" => Ok(Role::ShardProcessor),
            "validator" | "acceptor" => Ok(Role::Validator),
            "aggregator" | "learner" => Ok(Role::Aggregator),
            _ => Err(ClusterError::InvalidRole(raw.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered worker, identified by `(role, address)`.
///
/// `address` is the worker's base URL, e.g. `http://127.0.0.1:5002`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub role: Role,
    pub address: String,
}

impl Endpoint {
    pub fn new(role: Role, address: impl Into<String>) -> Self {
        Self {
            role,
            address: address.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        endpoint_url(&self.address, path)
    }
}

/// Joins a base address and an API path without doubling the slash.
pub fn endpoint_url(address: &str, path: &str) -> String {
    format!("{}{}", address.trim_end_matches('/'), path)
}

/// Copy of the membership set as pushed to every worker.
///
/// Workers only ever hold this snapshot, never the coordinator's registry, so a
/// registration arriving mid-broadcast cannot change a peer list in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSnapshot {
    #[serde(default)]
    pub shard_processors: Vec<String>,
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub learner: Option<String>,
    /// Assignment version the snapshot was taken at.
    #[serde(default)]
    pub version: u64,
}

impl MembershipSnapshot {
    /// The first `limit` validators in registration order.
    pub fn validator_targets(&self, limit: usize) -> Vec<String> {
        self.validators.iter().take(limit).cloned().collect()
    }
}

/// Range pushed to one shard processor. `None` means the processor fell past the
/// end of the alphabet and owns nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub address: String,
    pub range: Option<KeyRange>,
}
