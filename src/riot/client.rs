//! Ladder service client
//!
//! ## Endpoints
//!
//! Platform host (`https://{platform}.api.riotgames.com`):
//! - `/tft/league/v1/{challenger|grandmaster|master}`
//! - `/tft/league/v1/entries/{TIER}/{DIVISION}?queue=RANKED_TFT&page={n}`
//! - `/tft/summoner/v1/summoners/{summonerId}`
//!
//! Regional host (`https://{region}.api.riotgames.com`):
//! - `/tft/match/v1/matches/by-puuid/{puuid}/ids?count={n}`
//! - `/tft/match/v1/matches/{matchId}`
//!
//! The match-id listing is deliberately requested without a queue filter;
//! queue filtering happens after the detail fetch.

use super::schema::{LeagueItemDto, LeagueListDto, MatchDto, SummonerDto};
use super::LadderApi;
use crate::model::{ApexTier, Division, Identity, LadderEntry, MatchId, MatchRecord, Tier};
use crate::transport::{ApiError, TransportClient};
use async_trait::async_trait;

pub struct RiotClient {
    transport: TransportClient,
    platform_base: String,
    region_base: String,
}

impl RiotClient {
    pub fn new(transport: TransportClient, platform: &str, region: &str) -> Self {
        Self::with_base_urls(
            transport,
            format!("https://{}.api.riotgames.com", platform),
            format!("https://{}.api.riotgames.com", region),
        )
    }

    /// Point the client at explicit hosts (e.g. a local test server)
    pub fn with_base_urls(
        transport: TransportClient,
        platform_base: impl Into<String>,
        region_base: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            platform_base: platform_base.into().trim_end_matches('/').to_string(),
            region_base: region_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn platform_url(&self, path: &str) -> String {
        format!("{}{}", self.platform_base, path)
    }

    fn region_url(&self, path: &str) -> String {
        format!("{}{}", self.region_base, path)
    }
}

fn malformed(url: &str, reason: String) -> ApiError {
    ApiError::MalformedResponse {
        url: url.to_string(),
        reason,
    }
}

#[async_trait]
impl LadderApi for RiotClient {
    async fn apex_league(&self, tier: ApexTier) -> Result<Vec<LadderEntry>, ApiError> {
        let url = self.platform_url(&format!("/tft/league/v1/{}", tier.as_str()));
        let list: LeagueListDto = self.transport.get_json(&url).await?;

        Ok(list
            .entries
            .into_iter()
            .filter_map(LeagueItemDto::into_entry)
            .collect())
    }

    async fn league_page(
        &self,
        tier: Tier,
        division: Division,
        page: u32,
    ) -> Result<Vec<LadderEntry>, ApiError> {
        let url = self.platform_url(&format!(
            "/tft/league/v1/entries/{}/{}?queue=RANKED_TFT&page={}",
            tier.as_str(),
            division.as_str(),
            page
        ));
        let rows: Vec<LeagueItemDto> = self.transport.get_json(&url).await?;

        Ok(rows.into_iter().filter_map(LeagueItemDto::into_entry).collect())
    }

    async fn summoner(&self, external_id: &str) -> Result<Identity, ApiError> {
        let url = self.platform_url(&format!("/tft/summoner/v1/summoners/{}", external_id));
        let summoner: SummonerDto = self.transport.get_json(&url).await?;

        summoner.into_identity().map_err(|reason| malformed(&url, reason))
    }

    async fn match_ids(&self, identity: &Identity, count: u32) -> Result<Vec<MatchId>, ApiError> {
        let url = self.region_url(&format!(
            "/tft/match/v1/matches/by-puuid/{}/ids?count={}",
            identity.as_str(),
            count
        ));
        let ids: Vec<String> = self.transport.get_json(&url).await?;

        Ok(ids
            .into_iter()
            .filter(|id| !id.trim().is_empty())
            .map(MatchId::new)
            .collect())
    }

    async fn match_detail(&self, match_id: &MatchId) -> Result<MatchRecord, ApiError> {
        let url = self.region_url(&format!("/tft/match/v1/matches/{}", match_id.as_str()));
        let dto: MatchDto = self.transport.get_json(&url).await?;

        dto.into_record().map_err(|reason| malformed(&url, reason))
    }
}
