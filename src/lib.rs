//! # compflow
//!
//! Harvests ranked-ladder match records from a rate-limited upstream service
//! and ranks recurring team compositions into a single published document.
//!
//! ## Architecture
//!
//! ```text
//! SeedDiscovery (ladder tiers, paged divisions)
//!     ↓
//! IdentityResolver (ladder reference → stable identity)
//!     ↓
//! MatchCollector (id listing + dedup → bounded-concurrency detail fetch → queue filter)
//!     ↓
//! Aggregator (canonical composition key → additive counters → minSample gate → rank)
//!     ↓
//! Publisher (temp file → atomic rename, never clobbers with an empty result)
//! ```
//!
//! Every networked stage talks to the upstream through [`riot::LadderApi`],
//! whose production implementation routes each call through
//! [`transport::TransportClient`] and its host-scoped [`transport::RateGate`].

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod harvest;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod riot;
pub mod transport;

pub use aggregate::{aggregate, Aggregator, CompositionKey, RankedComposition};
pub use config::{ConfigError, HarvestConfig};
pub use pipeline::{Harvester, HarvestError, RunReport, Stage};
pub use publish::{OutputDocument, PublishOutcome, Publisher};
