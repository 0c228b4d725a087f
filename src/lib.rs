//! Letter Cluster Library
//!
//! A small coordination protocol for counting words across a cluster. The key
//! domain is the alphabet; each shard processor owns a contiguous slice of it,
//! validators gate partial results, and a single aggregator merges them into the
//! final report. The binary (`main.rs`) runs one role per process.
//!
//! ## Architecture Modules
//!
//! - **`membership`**: The coordinator. Registers workers, partitions the alphabet
//!   across shard processors, and broadcasts ranges and membership.
//! - **`processor`**: Shard processors. Tokenize lines, keep cumulative results for
//!   their range, and fan them out to validators.
//! - **`validator`**: Consistency checks on partial results before they reach the
//!   aggregator.
//! - **`aggregator`**: The learner. Merges validated results into a deduplicated
//!   per-letter report.
//! - **`sidecar`**: Bounded-retry outbound delivery used by every role.
//! - **`shard`**: Key ranges and partial results shared by all roles.
//! - **`config`**, **`api`**, **`error`**: Node configuration, the HTTP reply
//!   envelope and the error taxonomy.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod membership;
pub mod processor;
pub mod shard;
pub mod sidecar;
pub mod validator;
