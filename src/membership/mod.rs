//! Membership & Partitioning Module
//!
//! The coordinator side of the cluster: it records which workers exist, splits the
//! alphabet across shard processors, and pushes both facts to every worker.
//!
//! ## Core Mechanisms
//! - **Registration**: Workers announce `(role, address)`. List roles are idempotent;
//!   the learner (aggregator) slot is replaced on every registration.
//! - **Partitioning**: After every registration the alphabet is re-split from scratch
//!   into `ceil(26 / n)`-letter blocks in registration order. Nothing is rebalanced
//!   incrementally, and processors keep results accumulated under a stale range.
//! - **Broadcast**: Ranges go to `/set_range`, the membership snapshot to `/nodes`
//!   of every worker, all through the delivery sidecar.
//!
//! There is no heartbeat: a worker stays registered until it is replaced.

pub mod handlers;
pub mod partitioner;
pub mod protocol;
pub mod registry;
pub mod service;
pub mod types;
