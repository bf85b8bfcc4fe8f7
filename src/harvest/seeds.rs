//! Ladder walk producing candidate players
//!
//! Apex tiers are read whole (highest first, league points descending),
//! then each paged tier is walked division by division, page by page.
//! Stop conditions, checked in order:
//! 1. enough unique seeds collected
//! 2. an empty page (division exhausted, move to the next one)
//! 3. the per-division page cap
//!
//! A failed tier or page is logged and skipped; partial results are fine.

use crate::model::{ApexTier, Division, LadderEntry, Seed, Tier};
use crate::riot::LadderApi;
use std::collections::HashSet;

pub struct SeedDiscovery<'a> {
    api: &'a dyn LadderApi,
    paged_tiers: &'a [Tier],
    max_pages_per_division: u32,
}

impl<'a> SeedDiscovery<'a> {
    pub fn new(api: &'a dyn LadderApi, paged_tiers: &'a [Tier], max_pages_per_division: u32) -> Self {
        Self {
            api,
            paged_tiers,
            max_pages_per_division,
        }
    }

    /// Up to `target` seeds, deduplicated by external id, best tiers first
    pub async fn discover(&self, target: usize) -> Vec<Seed> {
        let mut seeds = SeedSet::new(target);

        for tier in ApexTier::all() {
            if seeds.is_full() {
                break;
            }

            match self.api.apex_league(tier).await {
                Ok(mut entries) => {
                    entries.sort_by(|a, b| b.league_points.cmp(&a.league_points));
                    let added = seeds.extend(entries);
                    log::info!("🏆 {}: {} new seeds (total {})", tier.as_str(), added, seeds.len());
                }
                Err(e) => {
                    log::warn!("⚠️  Skipping tier {}: {}", tier.as_str(), e);
                }
            }
        }

        'tiers: for &tier in self.paged_tiers {
            for division in Division::all() {
                for page in 1..=self.max_pages_per_division {
                    if seeds.is_full() {
                        break 'tiers;
                    }

                    match self.api.league_page(tier, division, page).await {
                        Ok(entries) if entries.is_empty() => {
                            log::debug!(
                                "{} {} exhausted at page {}",
                                tier.as_str(),
                                division.as_str(),
                                page
                            );
                            break;
                        }
                        Ok(entries) => {
                            let added = seeds.extend(entries);
                            log::debug!(
                                "{} {} page {}: {} new seeds (total {})",
                                tier.as_str(),
                                division.as_str(),
                                page,
                                added,
                                seeds.len()
                            );
                        }
                        Err(e) => {
                            log::warn!(
                                "⚠️  Skipping {} {} from page {}: {}",
                                tier.as_str(),
                                division.as_str(),
                                page,
                                e
                            );
                            break;
                        }
                    }

                    if page == self.max_pages_per_division {
                        log::debug!(
                            "{} {} hit the page cap ({})",
                            tier.as_str(),
                            division.as_str(),
                            page
                        );
                    }
                }
            }
        }

        log::info!("🌱 Seed discovery finished: {} seeds (target {})", seeds.len(), target);
        seeds.into_seeds()
    }
}

/// Ordered, deduplicated seed accumulator capped at a target size
struct SeedSet {
    seen: HashSet<String>,
    seeds: Vec<Seed>,
    target: usize,
}

impl SeedSet {
    fn new(target: usize) -> Self {
        Self {
            seen: HashSet::new(),
            seeds: Vec::new(),
            target,
        }
    }

    fn len(&self) -> usize {
        self.seeds.len()
    }

    fn is_full(&self) -> bool {
        self.seeds.len() >= self.target
    }

    /// Returns how many new seeds were added
    fn extend(&mut self, entries: Vec<LadderEntry>) -> usize {
        let before = self.seeds.len();
        for entry in entries {
            if self.is_full() {
                break;
            }
            if self.seen.insert(entry.external_id.clone()) {
                self.seeds.push(Seed::from(entry));
            }
        }
        self.seeds.len() - before
    }

    fn into_seeds(self) -> Vec<Seed> {
        self.seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::mock::{entry, MockLadder};

    fn ids(seeds: &[Seed]) -> Vec<&str> {
        seeds.iter().map(|s| s.external_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_apex_tiers_first_sorted_by_points() {
        let mut api = MockLadder::default();
        api.apex.insert(ApexTier::Challenger, vec![entry("c-low", 900), entry("c-high", 1500)]);
        api.apex.insert(ApexTier::Grandmaster, vec![entry("g1", 600)]);
        api.pages.insert((Tier::Diamond, Division::I, 1), vec![entry("d1", 50)]);

        let tiers = [Tier::Diamond];
        let seeds = SeedDiscovery::new(&api, &tiers, 3).discover(10).await;

        assert_eq!(ids(&seeds), vec!["c-high", "c-low", "g1", "d1"]);
    }

    #[tokio::test]
    async fn test_stops_at_target() {
        let mut api = MockLadder::default();
        api.apex.insert(
            ApexTier::Challenger,
            (0..10).map(|i| entry(&format!("c{}", i), 1000 - i)).collect(),
        );
        api.apex.insert(ApexTier::Grandmaster, vec![entry("g1", 500)]);

        let tiers = [Tier::Diamond];
        let seeds = SeedDiscovery::new(&api, &tiers, 3).discover(4).await;

        assert_eq!(ids(&seeds), vec!["c0", "c1", "c2", "c3"]);
        assert!(api.page_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deduplicates_across_tiers_and_pages() {
        let mut api = MockLadder::default();
        api.apex.insert(ApexTier::Master, vec![entry("p1", 10), entry("p2", 5)]);
        api.pages.insert((Tier::Diamond, Division::I, 1), vec![entry("p2", 0), entry("p3", 0)]);
        api.pages.insert((Tier::Diamond, Division::I, 2), vec![entry("p1", 0), entry("p3", 0)]);

        let tiers = [Tier::Diamond];
        let seeds = SeedDiscovery::new(&api, &tiers, 5).discover(100).await;

        assert_eq!(ids(&seeds), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_empty_page_moves_to_next_division() {
        let mut api = MockLadder::default();
        api.pages.insert((Tier::Diamond, Division::I, 1), vec![entry("a", 0)]);
        // page 2 of Diamond I is empty
        api.pages.insert((Tier::Diamond, Division::I, 3), vec![entry("never", 0)]);
        api.pages.insert((Tier::Diamond, Division::II, 1), vec![entry("b", 0)]);

        let tiers = [Tier::Diamond];
        let seeds = SeedDiscovery::new(&api, &tiers, 5).discover(100).await;

        assert_eq!(ids(&seeds), vec!["a", "b"]);
        let calls = api.page_calls.lock().unwrap();
        assert!(!calls.contains(&(Tier::Diamond, Division::I, 3)));
        assert!(calls.contains(&(Tier::Diamond, Division::II, 2)));
    }

    #[tokio::test]
    async fn test_page_cap_bounds_pagination() {
        let mut api = MockLadder::default();
        for page in 1..=10 {
            api.pages.insert(
                (Tier::Emerald, Division::I, page),
                vec![entry(&format!("e{}", page), 0)],
            );
        }

        let tiers = [Tier::Emerald];
        let seeds = SeedDiscovery::new(&api, &tiers, 2).discover(100).await;

        assert_eq!(ids(&seeds), vec!["e1", "e2"]);
        let calls = api.page_calls.lock().unwrap();
        let division_one: Vec<_> = calls.iter().filter(|c| c.1 == Division::I).collect();
        assert_eq!(division_one.len(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_skipped() {
        let mut api = MockLadder::default();
        api.failing_apex.insert(ApexTier::Challenger);
        api.apex.insert(ApexTier::Grandmaster, vec![entry("g1", 100)]);
        api.failing_pages.insert((Tier::Diamond, Division::I, 1));
        api.pages.insert((Tier::Diamond, Division::I, 2), vec![entry("skipped", 0)]);
        api.pages.insert((Tier::Diamond, Division::II, 1), vec![entry("d2", 0)]);

        let tiers = [Tier::Diamond];
        let seeds = SeedDiscovery::new(&api, &tiers, 5).discover(100).await;

        assert_eq!(ids(&seeds), vec!["g1", "d2"]);
    }

    #[tokio::test]
    async fn test_zero_target_makes_no_calls() {
        let api = MockLadder::default();
        let tiers = [Tier::Diamond];
        let seeds = SeedDiscovery::new(&api, &tiers, 5).discover(0).await;

        assert!(seeds.is_empty());
        assert!(api.page_calls.lock().unwrap().is_empty());
    }
}
