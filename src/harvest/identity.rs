//! Ladder reference → stable identity
//!
//! A stale or removed ladder entry (`NotFound`) is an expected absence; any
//! other failure is logged as a warning. Either way the seed is omitted.

use crate::model::{Identity, Seed};
use crate::riot::LadderApi;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

pub struct IdentityResolver<'a> {
    api: &'a dyn LadderApi,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(api: &'a dyn LadderApi) -> Self {
        Self { api }
    }

    /// `None` when the identity cannot be resolved
    pub async fn resolve(&self, seed: &Seed) -> Option<Identity> {
        match self.api.summoner(&seed.external_id).await {
            Ok(identity) => Some(identity),
            Err(e) if e.is_not_found() => {
                log::debug!("Seed {} no longer resolves: {}", seed.external_id, e);
                None
            }
            Err(e) => {
                log::warn!("⚠️  Failed to resolve seed {}: {}", seed.external_id, e);
                None
            }
        }
    }

    /// Resolve every seed with at most `concurrency` lookups in flight.
    /// The result is deduplicated; its order carries no meaning.
    pub async fn resolve_all(&self, seeds: &[Seed], concurrency: usize) -> Vec<Identity> {
        let resolved: Vec<Option<Identity>> = stream::iter(seeds)
            .map(|seed| self.resolve(seed))
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut seen = HashSet::new();
        let identities: Vec<Identity> = resolved
            .into_iter()
            .flatten()
            .filter(|identity| seen.insert(identity.clone()))
            .collect();

        log::info!(
            "🪪 Resolved {} unique identities from {} seeds",
            identities.len(),
            seeds.len()
        );
        identities
    }
}
