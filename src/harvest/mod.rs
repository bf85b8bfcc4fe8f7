//! Networked harvest stages
//!
//! - `seeds` - ladder walk producing deduplicated candidate players
//! - `identity` - ladder reference → stable identity
//! - `matches` - match-id listing, global dedup, bounded detail fetch, queue filter
//!
//! Every per-item failure inside these stages is logged and turned into
//! omission of that item; no single bad seed, identity, or match fails a run.

pub mod identity;
pub mod matches;
pub mod seeds;

#[cfg(test)]
pub(crate) mod mock;

pub use identity::IdentityResolver;
pub use matches::{CollectionStats, MatchCollector};
pub use seeds::SeedDiscovery;
