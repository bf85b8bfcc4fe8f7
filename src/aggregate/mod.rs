//! Composition statistics: canonical keys, accumulation, ranking

pub mod aggregator;
pub mod key;
pub mod rank;

pub use aggregator::{aggregate, Aggregator, CompositionAggregate, UnitStats};
pub use key::{display_label, normalize_unit_id, CompositionKey};
pub use rank::{ItemSetCount, RankedComposition, UnitSummary};
