//! Shard Processor Network Protocol

use serde::{Deserialize, Serialize};

use crate::shard::{KeyRange, PartialResult};

/// One line of text to tokenize.
pub const ENDPOINT_LINE: &str = "/line";
/// Raw file body; replaces all cumulative state.
pub const ENDPOINT_UPLOAD: &str = "/upload";
/// Clears cumulative state.
pub const ENDPOINT_RESET: &str = "/reset";
/// Current range, assignment version and cumulative results.
pub const ENDPOINT_STATE: &str = "/state";

#[derive(Debug, Serialize, Deserialize)]
pub struct LineRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineResponse {
    pub status: String,
    pub partial: PartialResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorState {
    pub range: Option<KeyRange>,
    pub version: Option<u64>,
    pub partials: Vec<PartialResult>,
}
