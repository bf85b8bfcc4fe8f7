//! Ladder service integration
//!
//! [`LadderApi`] is the seam every networked stage depends on. The
//! production implementation is [`RiotClient`], which routes each call
//! through the shared transport and validates payloads against the wire
//! schemas in [`schema`].

pub mod client;
pub mod schema;

pub use client::RiotClient;

use crate::model::{ApexTier, Division, Identity, LadderEntry, MatchId, MatchRecord, Tier};
use crate::transport::ApiError;
use async_trait::async_trait;

/// Upstream ladder operations used by the harvest stages
#[async_trait]
pub trait LadderApi: Send + Sync {
    /// All entries of an unpaged top tier
    async fn apex_league(&self, tier: ApexTier) -> Result<Vec<LadderEntry>, ApiError>;

    /// One page (1-based) of a paged tier/division
    async fn league_page(
        &self,
        tier: Tier,
        division: Division,
        page: u32,
    ) -> Result<Vec<LadderEntry>, ApiError>;

    /// Stable identity behind a ladder reference
    async fn summoner(&self, external_id: &str) -> Result<Identity, ApiError>;

    /// Up to `count` most recent match ids for an identity
    async fn match_ids(&self, identity: &Identity, count: u32) -> Result<Vec<MatchId>, ApiError>;

    /// Full, validated match record
    async fn match_detail(&self, match_id: &MatchId) -> Result<MatchRecord, ApiError>;
}
