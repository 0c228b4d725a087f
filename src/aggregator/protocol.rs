//! Aggregator Network Protocol

use serde::{Deserialize, Serialize};

/// Validated partial result forwarded by a validator.
pub const ENDPOINT_LEARN: &str = "/learn";
/// Current merged report.
pub const ENDPOINT_RESULTS: &str = "/results";
/// Clears every bucket.
pub const ENDPOINT_RESET: &str = "/reset";

/// One bucket of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub letter: char,
    pub count: usize,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub results: Vec<ReportRow>,
}
