//! Wire schemas for ladder service payloads
//!
//! One explicit shape per endpoint. Anything that does not deserialize
//! into these types, or fails the checks in the `into_*` conversions, is
//! reported as a malformed response by the client.

use crate::model::{Identity, LadderEntry, MatchId, MatchRecord, Participant, Unit};
use serde::{Deserialize, Serialize};

/// Apex tier listing (`/tft/league/v1/{challenger|grandmaster|master}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueListDto {
    pub entries: Vec<LeagueItemDto>,
}

/// Single ladder row, shared by apex listings and paged entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueItemDto {
    #[serde(rename = "summonerId")]
    pub summoner_id: String,
    #[serde(rename = "summonerName", default)]
    pub summoner_name: Option<String>,
    #[serde(rename = "leaguePoints", default)]
    pub league_points: i64,
}

impl LeagueItemDto {
    /// Rows without a usable id are dropped
    pub fn into_entry(self) -> Option<LadderEntry> {
        let external_id = self.summoner_id.trim().to_string();
        if external_id.is_empty() {
            return None;
        }

        Some(LadderEntry {
            external_id,
            display_name: self.summoner_name.filter(|name| !name.trim().is_empty()),
            league_points: self.league_points,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummonerDto {
    pub puuid: String,
}

impl SummonerDto {
    pub fn into_identity(self) -> Result<Identity, String> {
        let puuid = self.puuid.trim();
        if puuid.is_empty() {
            return Err("empty puuid".to_string());
        }
        Ok(Identity::new(puuid))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadataDto,
    pub info: MatchInfoDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMetadataDto {
    pub match_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfoDto {
    pub queue_id: u32,
    #[serde(default)]
    pub game_version: Option<String>,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub placement: i64,
    #[serde(default)]
    pub units: Vec<UnitDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDto {
    pub character_id: String,
    /// Star level
    pub tier: u8,
    #[serde(rename = "itemNames", default)]
    pub item_names: Vec<String>,
}

impl MatchDto {
    /// Validate into a [`MatchRecord`]; the error names the first violation
    pub fn into_record(self) -> Result<MatchRecord, String> {
        let participants = self
            .info
            .participants
            .into_iter()
            .enumerate()
            .map(|(idx, p)| p.into_participant().map_err(|e| format!("participant {}: {}", idx, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MatchRecord {
            match_id: MatchId::new(self.metadata.match_id),
            queue_id: self.info.queue_id,
            game_version: self.info.game_version,
            participants,
        })
    }
}

impl ParticipantDto {
    fn into_participant(self) -> Result<Participant, String> {
        if !(1..=8).contains(&self.placement) {
            return Err(format!("placement {} outside 1..=8", self.placement));
        }

        let units = self
            .units
            .into_iter()
            .map(UnitDto::into_unit)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Participant {
            placement: self.placement as u8,
            units,
        })
    }
}

impl UnitDto {
    fn into_unit(self) -> Result<Unit, String> {
        if self.character_id.trim().is_empty() {
            return Err("unit with blank character_id".to_string());
        }

        Ok(Unit {
            character_id: self.character_id,
            star_level: self.tier,
            items: self.item_names,
        })
    }
}
