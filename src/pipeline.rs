//! End-to-end harvest run
//!
//! Stages run strictly forward:
//! seeds → identities → match records → ranked compositions → published document.
//!
//! Per-item failures are absorbed inside each stage. A stage that produces
//! nothing at all means the upstream is down (or misconfigured), so the run
//! aborts with [`HarvestError::NoUsableData`] and nothing is published.

use crate::aggregate::aggregate;
use crate::catalog::{resolve_content_version, ContentCatalog, DataDragonCatalog};
use crate::config::{ConfigError, HarvestConfig};
use crate::harvest::{IdentityResolver, MatchCollector, SeedDiscovery};
use crate::publish::{OutputDocument, PublishError, PublishOutcome, Publisher, RunMeta};
use crate::riot::{LadderApi, RiotClient};
use crate::transport::{RateGate, TransportClient};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Seeds,
    Identities,
    Matches,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Seeds => "seed discovery",
            Stage::Identities => "identity resolution",
            Stage::Matches => "match collection",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{stage} produced no usable data")]
    NoUsableData { stage: Stage },

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl HarvestError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            HarvestError::Config(_) => 2,
            _ => 1,
        }
    }
}

/// Per-stage counts for one completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub seeds: usize,
    pub identities: usize,
    pub listed_ids: usize,
    pub unique_ids: usize,
    pub fetched: usize,
    pub kept: usize,
    pub comps: usize,
    pub patch: String,
    pub outcome: PublishOutcome,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seeds={} identities={} ids={}/{} fetched={} kept={} comps={} patch={} outcome={:?}",
            self.seeds,
            self.identities,
            self.unique_ids,
            self.listed_ids,
            self.fetched,
            self.kept,
            self.comps,
            self.patch,
            self.outcome
        )
    }
}

pub struct Harvester {
    config: HarvestConfig,
    api: Box<dyn LadderApi>,
    catalog: Box<dyn ContentCatalog>,
    publisher: Publisher,
}

impl Harvester {
    pub fn new(
        config: HarvestConfig,
        api: Box<dyn LadderApi>,
        catalog: Box<dyn ContentCatalog>,
    ) -> Self {
        let publisher = Publisher::new(config.output_path.clone());
        Self {
            config,
            api,
            catalog,
            publisher,
        }
    }

    /// Production wiring: one rate gate shared by the ladder and catalog
    /// clients; only the ladder client carries the credential.
    pub fn from_config(config: HarvestConfig) -> Result<Self, HarvestError> {
        config.validate()?;

        let gate = Arc::new(RateGate::new(config.rate_windows()).with_jitter(config.rate_jitter));

        let ladder_transport = TransportClient::new(
            Arc::clone(&gate),
            config.retry_policy(),
            config.request_timeout,
            Some(config.api_key.clone()),
        )?;
        let catalog_transport = TransportClient::new(
            gate,
            config.retry_policy(),
            config.request_timeout,
            None,
        )?;

        let api = RiotClient::new(ladder_transport, &config.platform, &config.region);
        let catalog = DataDragonCatalog::new(catalog_transport, config.catalog_versions_url.clone());

        Ok(Self::new(config, Box::new(api), Box::new(catalog)))
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunReport, HarvestError> {
        let config = &self.config;
        let api = self.api.as_ref();

        log::info!(
            "🚀 Harvest starting: platform={} region={} queues={:?}",
            config.platform,
            config.region,
            config.queue_ids
        );

        let seeds = SeedDiscovery::new(api, &config.paged_tiers, config.max_pages_per_division)
            .discover(config.seed_target)
            .await;
        if seeds.is_empty() {
            return Err(HarvestError::NoUsableData { stage: Stage::Seeds });
        }

        let identities = IdentityResolver::new(api)
            .resolve_all(&seeds, config.fetch_concurrency)
            .await;
        if identities.is_empty() {
            return Err(HarvestError::NoUsableData {
                stage: Stage::Identities,
            });
        }

        let (records, stats) = MatchCollector::new(api, &config.queue_ids, config.fetch_concurrency)
            .collect_with_stats(&identities, config.matches_per_player)
            .await;
        if records.is_empty() {
            return Err(HarvestError::NoUsableData {
                stage: Stage::Matches,
            });
        }

        let comps = aggregate(&records, config.min_sample, config.top_n);
        let patch = resolve_content_version(self.catalog.as_ref()).await;

        let meta = RunMeta {
            generated_at: Utc::now(),
            platform: config.platform.clone(),
            region: config.region.clone(),
            queue_filter: config.queue_ids.clone(),
            sample_match_count: records.len(),
            patch: patch.clone(),
            seed_count: seeds.len(),
            identity_count: identities.len(),
        };
        let comp_count = comps.len();
        let outcome = self.publisher.publish(&OutputDocument::new(meta, comps))?;

        Ok(RunReport {
            seeds: seeds.len(),
            identities: identities.len(),
            listed_ids: stats.listed_ids,
            unique_ids: stats.unique_ids,
            fetched: stats.fetched,
            kept: stats.kept,
            comps: comp_count,
            patch,
            outcome,
        })
    }
}
