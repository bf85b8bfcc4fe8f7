//! Canonical roster identity and its cosmetic display form

use crate::model::Unit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const SEPARATOR: &str = "|";

/// Order- and case-independent identifier for a roster: the sorted, unique,
/// normalized unit ids joined by `|`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositionKey(String);

impl CompositionKey {
    pub fn from_units(units: &[Unit]) -> Self {
        Self::from_ids(units.iter().map(|u| u.character_id.as_str()))
    }

    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: BTreeSet<String> = ids
            .into_iter()
            .map(normalize_unit_id)
            .filter(|id| !id.is_empty())
            .collect();

        let joined = unique.into_iter().collect::<Vec<_>>().join(SEPARATOR);
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for a roster with no units
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalized unit ids in key order
    pub fn unit_ids(&self) -> Vec<&str> {
        if self.0.is_empty() {
            return Vec::new();
        }
        self.0.split(SEPARATOR).collect()
    }

    pub fn label(&self) -> String {
        display_label(&self.unit_ids())
    }
}

impl fmt::Display for CompositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, lowercased unit id
pub fn normalize_unit_id(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Human-readable roster name, e.g. `tft13_jinx|tft13_vi` → `Jinx / Vi`
pub fn display_label(unit_ids: &[&str]) -> String {
    unit_ids
        .iter()
        .map(|id| capitalize(strip_set_prefix(id)))
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Drop a leading `tft<digits>_` set tag, if present
fn strip_set_prefix(id: &str) -> &str {
    let lower = id.to_ascii_lowercase();
    let Some(rest) = lower.strip_prefix("tft") else {
        return id;
    };

    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || rest.as_bytes().get(digits) != Some(&b'_') {
        return id;
    }

    // "tft" + digits + "_" are all ASCII, so the byte offset is safe
    let stripped = &id[3 + digits + 1..];
    if stripped.is_empty() {
        id
    } else {
        stripped
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
