//! In-memory ladder used by the stage tests

use crate::model::{
    ApexTier, Division, Identity, LadderEntry, MatchId, MatchRecord, Participant, Tier, Unit,
};
use crate::riot::LadderApi;
use crate::transport::ApiError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct MockLadder {
    pub apex: HashMap<ApexTier, Vec<LadderEntry>>,
    pub failing_apex: HashSet<ApexTier>,
    pub pages: HashMap<(Tier, Division, u32), Vec<LadderEntry>>,
    pub failing_pages: HashSet<(Tier, Division, u32)>,
    /// external id → puuid; anything absent is NotFound
    pub summoners: HashMap<String, String>,
    pub failing_summoners: HashSet<String>,
    /// puuid → match ids
    pub match_lists: HashMap<String, Vec<String>>,
    pub failing_lists: HashSet<String>,
    pub matches: HashMap<String, MatchRecord>,
    pub malformed_matches: HashSet<String>,
    pub fetch_delay: Option<Duration>,

    pub page_calls: Mutex<Vec<(Tier, Division, u32)>>,
    pub detail_calls: Mutex<HashMap<String, usize>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

fn server_error(url: &str) -> ApiError {
    ApiError::TransientServerError {
        url: url.to_string(),
        status: 503,
        attempts: 5,
    }
}

fn not_found(url: &str) -> ApiError {
    ApiError::NotFound {
        url: url.to_string(),
    }
}

impl MockLadder {
    pub fn detail_calls_for(&self, id: &str) -> usize {
        self.detail_calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub fn total_detail_calls(&self) -> usize {
        self.detail_calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl LadderApi for MockLadder {
    async fn apex_league(&self, tier: ApexTier) -> Result<Vec<LadderEntry>, ApiError> {
        if self.failing_apex.contains(&tier) {
            return Err(server_error(tier.as_str()));
        }
        Ok(self.apex.get(&tier).cloned().unwrap_or_default())
    }

    async fn league_page(
        &self,
        tier: Tier,
        division: Division,
        page: u32,
    ) -> Result<Vec<LadderEntry>, ApiError> {
        self.page_calls.lock().unwrap().push((tier, division, page));
        if self.failing_pages.contains(&(tier, division, page)) {
            return Err(server_error(tier.as_str()));
        }
        Ok(self
            .pages
            .get(&(tier, division, page))
            .cloned()
            .unwrap_or_default())
    }

    async fn summoner(&self, external_id: &str) -> Result<Identity, ApiError> {
        if self.failing_summoners.contains(external_id) {
            return Err(server_error(external_id));
        }
        self.summoners
            .get(external_id)
            .map(Identity::new)
            .ok_or_else(|| not_found(external_id))
    }

    async fn match_ids(&self, identity: &Identity, count: u32) -> Result<Vec<MatchId>, ApiError> {
        if self.failing_lists.contains(identity.as_str()) {
            return Err(server_error(identity.as_str()));
        }
        Ok(self
            .match_lists
            .get(identity.as_str())
            .map(|ids| {
                ids.iter()
                    .take(count as usize)
                    .map(MatchId::new)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn match_detail(&self, match_id: &MatchId) -> Result<MatchRecord, ApiError> {
        *self
            .detail_calls
            .lock()
            .unwrap()
            .entry(match_id.to_string())
            .or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.malformed_matches.contains(match_id.as_str()) {
            return Err(ApiError::MalformedResponse {
                url: match_id.to_string(),
                reason: "placement 0 outside 1..=8".to_string(),
            });
        }
        self.matches
            .get(match_id.as_str())
            .cloned()
            .ok_or_else(|| not_found(match_id.as_str()))
    }
}

pub(crate) fn entry(id: &str, league_points: i64) -> LadderEntry {
    LadderEntry {
        external_id: id.to_string(),
        display_name: None,
        league_points,
    }
}

pub(crate) fn participant(placement: u8, units: &[&str]) -> Participant {
    Participant {
        placement,
        units: units.iter().map(|id| Unit::new(*id, 1)).collect(),
    }
}

pub(crate) fn record(id: &str, queue_id: u32, participants: Vec<Participant>) -> MatchRecord {
    MatchRecord {
        match_id: MatchId::new(id),
        queue_id,
        game_version: None,
        participants,
    }
}
