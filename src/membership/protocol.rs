//! Coordinator Network Protocol
//!
//! Endpoints served by the coordinator, the membership push every worker
//! accepts, and the DTOs that travel with them.

use serde::{Deserialize, Serialize};

use super::types::{Assignment, MembershipSnapshot};

// --- API Endpoints ---

/// Coordinator: workers announce themselves here.
pub const ENDPOINT_REGISTER: &str = "/register";
/// Coordinator: current membership and assignments.
pub const ENDPOINT_MEMBERSHIP: &str = "/membership";
/// Coordinator: read a text file and push its lines to every shard processor.
pub const ENDPOINT_START: &str = "/start";
/// Every worker: receives the membership snapshot broadcast.
pub const ENDPOINT_NODES: &str = "/nodes";
/// Shard processor: receives its range assignment.
pub const ENDPOINT_SET_RANGE: &str = "/set_range";

pub const DEFAULT_DOCUMENT: &str = "sample.txt";

// --- Data Transfer Objects ---

/// Registration payload. Both fields are optional on the wire so that a missing
/// one can be reported as `MissingField` rather than a decode failure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, alias = "type")]
    pub role: Option<String>,
    #[serde(default, alias = "url")]
    pub address: Option<String>,
}

/// Range push to a shard processor. `range` stays a string here: the processor
/// parses it and answers `InvalidRangeFormat` itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetRangeRequest {
    pub range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(default = "default_document")]
    pub filename: String,
}

fn default_document() -> String {
    DEFAULT_DOCUMENT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub membership: MembershipSnapshot,
    pub assignments: Vec<Assignment>,
}
