//! Outbound HTTP plumbing shared by every networked stage
//!
//! - `rate_gate` - host-scoped sliding-window call budget
//! - `backoff` - exponential delay schedule for transient failures
//! - `client` - authenticated JSON requests with bounded retries
//! - `error` - failure taxonomy surfaced to the stages

pub mod backoff;
pub mod client;
pub mod error;
pub mod rate_gate;

pub use backoff::ExponentialBackoff;
pub use client::{RetryPolicy, TransportClient};
pub use error::ApiError;
pub use rate_gate::{RateGate, RateWindow};
