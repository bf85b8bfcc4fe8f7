//! Match collection: id listing, global dedup, bounded detail fetch
//!
//! 1. List up to `per_identity` recent match ids for every identity, folding
//!    them into one shared set (the same match shows up for several players).
//! 2. Fetch every unique id once, with at most `concurrency` requests in
//!    flight. The pool sits on top of the rate gate: it caps how much work is
//!    queued against the gate, the gate caps how fast it is admitted.
//! 3. Keep only records whose queue id is allowed. The listing endpoint's
//!    queue filter is unreliable across record age, so the filter is applied
//!    here, after the fetch, and never as a request parameter.

use crate::model::{Identity, MatchId, MatchRecord};
use crate::riot::LadderApi;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

/// Per-run counters for the collection stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Ids returned by all listing calls, duplicates included
    pub listed_ids: usize,
    pub unique_ids: usize,
    pub failed_listings: usize,
    pub fetched: usize,
    pub failed_fetches: usize,
    pub filtered_out: usize,
    pub kept: usize,
}

pub struct MatchCollector<'a> {
    api: &'a dyn LadderApi,
    allowed_queues: &'a [u32],
    concurrency: usize,
}

impl<'a> MatchCollector<'a> {
    pub fn new(api: &'a dyn LadderApi, allowed_queues: &'a [u32], concurrency: usize) -> Self {
        Self {
            api,
            allowed_queues,
            concurrency: concurrency.max(1),
        }
    }

    /// Well-formed records in an allowed queue
    pub async fn collect(&self, identities: &[Identity], per_identity: u32) -> Vec<MatchRecord> {
        self.collect_with_stats(identities, per_identity).await.0
    }

    pub async fn collect_with_stats(
        &self,
        identities: &[Identity],
        per_identity: u32,
    ) -> (Vec<MatchRecord>, CollectionStats) {
        let mut stats = CollectionStats::default();

        let ids = self.list_match_ids(identities, per_identity, &mut stats).await;
        let records = self.fetch_records(&ids, &mut stats).await;

        log::info!(
            "🎮 Match collection: {} listed, {} unique, {} fetched, {} failed, {} wrong queue, {} kept",
            stats.listed_ids,
            stats.unique_ids,
            stats.fetched,
            stats.failed_fetches,
            stats.filtered_out,
            stats.kept
        );

        (records, stats)
    }

    /// Unique match ids across all identities, in first-seen order
    async fn list_match_ids(
        &self,
        identities: &[Identity],
        per_identity: u32,
        stats: &mut CollectionStats,
    ) -> Vec<MatchId> {
        let mut listings = stream::iter(identities)
            .map(|identity| async move {
                (identity, self.api.match_ids(identity, per_identity).await)
            })
            .buffer_unordered(self.concurrency);

        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        while let Some((identity, listing)) = listings.next().await {
            match listing {
                Ok(ids) => {
                    stats.listed_ids += ids.len();
                    for id in ids {
                        if seen.insert(id.clone()) {
                            unique.push(id);
                        }
                    }
                }
                Err(e) => {
                    stats.failed_listings += 1;
                    log::warn!("⚠️  Match listing failed for {}: {}", identity, e);
                }
            }
        }

        stats.unique_ids = unique.len();
        unique
    }

    async fn fetch_records(&self, ids: &[MatchId], stats: &mut CollectionStats) -> Vec<MatchRecord> {
        let mut fetches = stream::iter(ids)
            .map(|id| async move { (id, self.api.match_detail(id).await) })
            .buffer_unordered(self.concurrency);

        let mut records = Vec::new();

        while let Some((id, result)) = fetches.next().await {
            match result {
                Ok(record) => {
                    stats.fetched += 1;
                    if self.is_allowed(record.queue_id) {
                        records.push(record);
                    } else {
                        stats.filtered_out += 1;
                        log::debug!("Dropping {}: queue {} not allowed", id, record.queue_id);
                    }
                }
                Err(e) => {
                    stats.failed_fetches += 1;
                    log::warn!("⚠️  Dropping match {}: {}", id, e);
                }
            }
        }

        stats.kept = records.len();
        records
    }

    fn is_allowed(&self, queue_id: u32) -> bool {
        self.allowed_queues.contains(&queue_id)
    }
}
