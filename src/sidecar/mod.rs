//! Delivery Sidecar
//!
//! Every role sends its outbound messages through a [`Sidecar`]: a thin wrapper
//! around a [`Transport`] that retries failed deliveries a bounded number of
//! times with a fixed pause, then reports `DeliveryExhausted` instead of blocking.
//!
//! Sends are awaited by the caller. Callers that must not stall (a shard processor
//! fanning results out to validators, the coordinator broadcasting membership)
//! issue them from spawned tasks.

pub mod client;
pub mod policy;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use client::Sidecar;
pub use policy::RetryPolicy;
pub use transport::{HttpTransport, Reply, Transport, TransportError};
