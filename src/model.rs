//! Domain records flowing through the harvest pipeline.
//!
//! Upstream payloads are validated into these types at the client boundary
//! (see [`crate::riot::schema`]), so every stage past the client can assume
//! well-formed values.

use std::fmt;

/// Unpaged top ladder tiers, queried highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApexTier {
    Challenger,
    Grandmaster,
    Master,
}

impl ApexTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApexTier::Challenger => "challenger",
            ApexTier::Grandmaster => "grandmaster",
            ApexTier::Master => "master",
        }
    }

    /// Highest tier first.
    pub fn all() -> [ApexTier; 3] {
        [ApexTier::Challenger, ApexTier::Grandmaster, ApexTier::Master]
    }
}

/// Paged ladder tiers below the apex tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Diamond,
    Emerald,
    Platinum,
    Gold,
    Silver,
    Bronze,
    Iron,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Diamond => "DIAMOND",
            Tier::Emerald => "EMERALD",
            Tier::Platinum => "PLATINUM",
            Tier::Gold => "GOLD",
            Tier::Silver => "SILVER",
            Tier::Bronze => "BRONZE",
            Tier::Iron => "IRON",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DIAMOND" => Some(Tier::Diamond),
            "EMERALD" => Some(Tier::Emerald),
            "PLATINUM" => Some(Tier::Platinum),
            "GOLD" => Some(Tier::Gold),
            "SILVER" => Some(Tier::Silver),
            "BRONZE" => Some(Tier::Bronze),
            "IRON" => Some(Tier::Iron),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Division {
    I,
    II,
    III,
    IV,
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Division::I => "I",
            Division::II => "II",
            Division::III => "III",
            Division::IV => "IV",
        }
    }

    /// Highest division first.
    pub fn all() -> [Division; 4] {
        [Division::I, Division::II, Division::III, Division::IV]
    }
}

/// One row of a ladder listing, as returned by either tier endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderEntry {
    pub external_id: String,
    pub display_name: Option<String>,
    pub league_points: i64,
}

/// A candidate player reference found on the ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub external_id: String,
    pub display_name: Option<String>,
}

impl From<LadderEntry> for Seed {
    fn from(entry: LadderEntry) -> Self {
        Self {
            external_id: entry.external_id,
            display_name: entry.display_name,
        }
    }
}

/// Stable, service-wide player identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of one completed match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fetched, validated match. Discarded after aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub queue_id: u32,
    pub game_version: Option<String>,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// Final placement, 1 (best) to 8.
    pub placement: u8,
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub character_id: String,
    pub star_level: u8,
    pub items: Vec<String>,
}

impl Unit {
    pub fn new(character_id: impl Into<String>, star_level: u8) -> Self {
        Self {
            character_id: character_id.into(),
            star_level,
            items: Vec::new(),
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parsing_is_case_insensitive() {
        assert_eq!(Tier::from_str("diamond"), Some(Tier::Diamond));
        assert_eq!(Tier::from_str(" Emerald "), Some(Tier::Emerald));
        assert_eq!(Tier::from_str("CHALLENGER"), None);
    }

    #[test]
    fn test_apex_tiers_highest_first() {
        let tiers = ApexTier::all();
        assert_eq!(tiers[0], ApexTier::Challenger);
        assert_eq!(tiers[2].as_str(), "master");
    }

    #[test]
    fn test_seed_from_ladder_entry() {
        let entry = LadderEntry {
            external_id: "sid-1".to_string(),
            display_name: Some("Player".to_string()),
            league_points: 1200,
        };
        let seed = Seed::from(entry);
        assert_eq!(seed.external_id, "sid-1");
        assert_eq!(seed.display_name.as_deref(), Some("Player"));
    }
}
