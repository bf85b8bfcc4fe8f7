//! Per-roster accumulation over validated match records
//!
//! All counters are additive, so the fold is independent of record order.

use super::key::{normalize_unit_id, CompositionKey};
use super::rank::{rank_compositions, RankedComposition};
use crate::model::{MatchRecord, Participant};
use std::collections::HashMap;

/// Item loadouts larger than this are too specific to be useful
pub const MAX_ITEM_SET_SIZE: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitStats {
    pub plays: u64,
    pub star_sum: u64,
    /// Sorted item list → number of times fielded together
    pub item_sets: HashMap<Vec<String>, u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositionAggregate {
    pub key: CompositionKey,
    pub games: u64,
    pub sum_placement: u64,
    pub top4_count: u64,
    pub win_count: u64,
    pub per_unit: HashMap<String, UnitStats>,
}

impl CompositionAggregate {
    pub fn new(key: CompositionKey) -> Self {
        Self {
            key,
            games: 0,
            sum_placement: 0,
            top4_count: 0,
            win_count: 0,
            per_unit: HashMap::new(),
        }
    }

    pub fn record(&mut self, participant: &Participant) {
        self.games += 1;
        self.sum_placement += u64::from(participant.placement);
        if participant.placement <= 4 {
            self.top4_count += 1;
        }
        if participant.placement == 1 {
            self.win_count += 1;
        }

        // a unit fielded twice in one roster counts once, at its best star level
        let mut fielded: HashMap<String, (u8, Vec<String>)> = HashMap::new();
        for unit in &participant.units {
            let id = normalize_unit_id(&unit.character_id);
            let better = fielded
                .get(&id)
                .map_or(true, |(stars, _)| unit.star_level > *stars);
            if better {
                fielded.insert(id, (unit.star_level, unit.items.clone()));
            }
        }

        for (id, (stars, mut items)) in fielded {
            let stats = self.per_unit.entry(id).or_default();
            stats.plays += 1;
            stats.star_sum += u64::from(stars);

            if (1..=MAX_ITEM_SET_SIZE).contains(&items.len()) {
                items.sort();
                *stats.item_sets.entry(items).or_insert(0) += 1;
            }
        }
    }

    /// Mean placement; ranking compares the integer sums instead
    pub fn avg_place(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.sum_placement as f64 / self.games as f64
    }
}

/// Composition map built up one participant at a time
#[derive(Debug, Default)]
pub struct Aggregator {
    compositions: HashMap<CompositionKey, CompositionAggregate>,
    participants_processed: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: &MatchRecord) {
        for participant in &record.participants {
            self.add_participant(participant);
        }
    }

    pub fn add_participant(&mut self, participant: &Participant) {
        let key = CompositionKey::from_units(&participant.units);
        self.compositions
            .entry(key.clone())
            .or_insert_with(|| CompositionAggregate::new(key))
            .record(participant);
        self.participants_processed += 1;
    }

    pub fn participants_processed(&self) -> u64 {
        self.participants_processed
    }

    /// Sum of `games` over every composition, before any sample filter
    pub fn total_games(&self) -> u64 {
        self.compositions.values().map(|c| c.games).sum()
    }

    pub fn composition_count(&self) -> usize {
        self.compositions.len()
    }

    pub fn get(&self, key: &CompositionKey) -> Option<&CompositionAggregate> {
        self.compositions.get(key)
    }

    /// Drop compositions below `min_sample` games, rank best first, keep `top_n`
    pub fn rank(&self, min_sample: u64, top_n: usize) -> Vec<RankedComposition> {
        let eligible: Vec<&CompositionAggregate> = self
            .compositions
            .values()
            .filter(|c| c.games >= min_sample)
            .collect();

        log::debug!(
            "{} of {} compositions reach {} games",
            eligible.len(),
            self.compositions.len(),
            min_sample
        );

        rank_compositions(eligible, top_n)
    }
}

/// Fold `records` and return the ranked, filtered compositions
pub fn aggregate(records: &[MatchRecord], min_sample: u64, top_n: usize) -> Vec<RankedComposition> {
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.add_record(record);
    }

    let ranked = aggregator.rank(min_sample, top_n);
    log::info!(
        "📊 Aggregated {} participants into {} compositions, {} ranked",
        aggregator.participants_processed(),
        aggregator.composition_count(),
        ranked.len()
    );
    ranked
}
