//! Ranking and derived per-composition fields
//!
//! Order: ascending average placement, then descending games, then key.
//! Averages are compared as cross-multiplied integer sums so two
//! compositions with the same mean never compare unequal through float error.

use super::aggregator::{CompositionAggregate, UnitStats};
use super::key::CompositionKey;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Item loadouts published per unit
pub const TOP_ITEM_SETS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedComposition {
    pub key: CompositionKey,
    pub label: String,
    pub units: Vec<String>,
    pub games: u64,
    pub avg_place: f64,
    pub top4_rate: f64,
    pub win_rate: f64,
    pub unit_stats: Vec<UnitSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub unit: String,
    pub pick_rate: f64,
    pub avg_stars: f64,
    pub top_items: Vec<ItemSetCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSetCount {
    pub items: Vec<String>,
    pub count: u64,
}

/// Best first by average placement
pub fn compare(a: &CompositionAggregate, b: &CompositionAggregate) -> Ordering {
    let lhs = u128::from(a.sum_placement) * u128::from(b.games);
    let rhs = u128::from(b.sum_placement) * u128::from(a.games);

    lhs.cmp(&rhs)
        .then_with(|| b.games.cmp(&a.games))
        .then_with(|| a.key.cmp(&b.key))
}

pub(crate) fn rank_compositions(
    mut eligible: Vec<&CompositionAggregate>,
    top_n: usize,
) -> Vec<RankedComposition> {
    // unitless rosters count toward games but are never published
    eligible.retain(|c| c.games > 0 && !c.key.is_empty());
    eligible.sort_by(|a, b| compare(a, b));

    eligible.into_iter().take(top_n).map(summarize).collect()
}

fn summarize(comp: &CompositionAggregate) -> RankedComposition {
    let games = comp.games as f64;

    let mut unit_stats: Vec<UnitSummary> = comp
        .per_unit
        .iter()
        .map(|(unit, stats)| summarize_unit(unit, stats, games))
        .collect();
    unit_stats.sort_by(|a, b| {
        b.pick_rate
            .total_cmp(&a.pick_rate)
            .then_with(|| a.unit.cmp(&b.unit))
    });

    RankedComposition {
        key: comp.key.clone(),
        label: comp.key.label(),
        units: comp.key.unit_ids().into_iter().map(str::to_string).collect(),
        games: comp.games,
        avg_place: comp.avg_place(),
        top4_rate: comp.top4_count as f64 / games,
        win_rate: comp.win_count as f64 / games,
        unit_stats,
    }
}

fn summarize_unit(unit: &str, stats: &UnitStats, games: f64) -> UnitSummary {
    let avg_stars = if stats.plays == 0 {
        0.0
    } else {
        stats.star_sum as f64 / stats.plays as f64
    };

    UnitSummary {
        unit: unit.to_string(),
        pick_rate: stats.plays as f64 / games,
        avg_stars,
        top_items: top_item_sets(stats),
    }
}

/// Most frequent loadouts; ties go to the lexicographically smaller set
fn top_item_sets(stats: &UnitStats) -> Vec<ItemSetCount> {
    let mut sets: Vec<(&Vec<String>, u64)> =
        stats.item_sets.iter().map(|(items, count)| (items, *count)).collect();
    sets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    sets.into_iter()
        .take(TOP_ITEM_SETS)
        .map(|(items, count)| ItemSetCount {
            items: items.clone(),
            count,
        })
        .collect()
}
