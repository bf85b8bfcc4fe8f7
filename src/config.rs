//! Harvester configuration from environment variables
//!
//! Everything the run needs is read once at startup. A missing credential or
//! an invalid target is fatal here, before any network call is made.

use crate::model::Tier;
use crate::transport::{RateWindow, RetryPolicy};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_VERSIONS_URL: &str = "https://ddragon.leagueoflegends.com/api/versions.json";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Configuration for a single harvest run
#[derive(Clone)]
pub struct HarvestConfig {
    /// Credential sent with every ladder request
    pub api_key: String,

    /// Platform routing value for ladder and identity endpoints (e.g. `na1`)
    pub platform: String,

    /// Regional routing value for match endpoints (e.g. `americas`)
    pub region: String,

    pub seed_target: usize,
    pub matches_per_player: u32,
    pub min_sample: u64,
    pub top_n: usize,

    /// Queue ids retained after match fetch
    pub queue_ids: Vec<u32>,

    /// Maximum in-flight requests per fan-out stage
    pub fetch_concurrency: usize,

    pub max_pages_per_division: u32,
    pub paged_tiers: Vec<Tier>,

    pub rate_per_second: usize,
    pub rate_per_two_minutes: usize,
    pub rate_jitter: Duration,

    pub retry_max_attempts: u32,
    pub retry_default_delay: Duration,
    pub request_timeout: Duration,

    pub output_path: PathBuf,
    pub catalog_versions_url: String,
}

impl HarvestConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `RIOT_API_KEY` (required)
    /// - `TFT_PLATFORM` (default: na1)
    /// - `TFT_REGION` (default: derived from platform)
    /// - `SEED_TARGET` (default: 200)
    /// - `MATCHES_PER_PLAYER` (default: 20)
    /// - `MIN_SAMPLE` (default: 10)
    /// - `TOP_N` (default: 50)
    /// - `QUEUE_IDS` (default: 1100)
    /// - `FETCH_CONCURRENCY` (default: 6)
    /// - `MAX_PAGES_PER_DIVISION` (default: 5)
    /// - `LADDER_PAGED_TIERS` (default: DIAMOND,EMERALD)
    /// - `RATE_LIMIT_PER_SECOND` (default: 20)
    /// - `RATE_LIMIT_PER_TWO_MINUTES` (default: 100)
    /// - `RATE_JITTER_MS` (default: 25)
    /// - `RETRY_MAX_ATTEMPTS` (default: 5)
    /// - `RETRY_DEFAULT_DELAY_MS` (default: 1000)
    /// - `REQUEST_TIMEOUT_SECS` (default: 10)
    /// - `OUTPUT_PATH` (default: data/comps.json)
    /// - `CATALOG_VERSIONS_URL` (default: Data Dragon versions endpoint)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("RIOT_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingVariable("RIOT_API_KEY".to_string()))?;

        let platform = lookup("TFT_PLATFORM")
            .map(|p| p.trim().to_lowercase())
            .unwrap_or_else(|| "na1".to_string());

        let derived_region = region_for_platform(&platform).ok_or_else(|| {
            ConfigError::InvalidValue(format!("TFT_PLATFORM '{}' is not a known platform", platform))
        })?;

        let region = match lookup("TFT_REGION") {
            Some(region) => {
                let region = region.trim().to_lowercase();
                if !REGIONS.contains(&region.as_str()) {
                    return Err(ConfigError::InvalidValue(format!(
                        "TFT_REGION must be one of {:?}, got '{}'",
                        REGIONS, region
                    )));
                }
                region
            }
            None => derived_region.to_string(),
        };

        let queue_ids = match lookup("QUEUE_IDS") {
            Some(raw) => parse_list(&raw, "QUEUE_IDS", |s| s.parse::<u32>().ok())?,
            None => vec![1100],
        };

        let paged_tiers = match lookup("LADDER_PAGED_TIERS") {
            Some(raw) => parse_list(&raw, "LADDER_PAGED_TIERS", Tier::from_str)?,
            None => vec![Tier::Diamond, Tier::Emerald],
        };

        let config = Self {
            api_key,
            platform,
            region,
            seed_target: parse_var(&lookup, "SEED_TARGET", 200)?,
            matches_per_player: parse_var(&lookup, "MATCHES_PER_PLAYER", 20)?,
            min_sample: parse_var(&lookup, "MIN_SAMPLE", 10)?,
            top_n: parse_var(&lookup, "TOP_N", 50)?,
            queue_ids,
            fetch_concurrency: parse_var(&lookup, "FETCH_CONCURRENCY", 6)?,
            max_pages_per_division: parse_var(&lookup, "MAX_PAGES_PER_DIVISION", 5)?,
            paged_tiers,
            rate_per_second: parse_var(&lookup, "RATE_LIMIT_PER_SECOND", 20)?,
            rate_per_two_minutes: parse_var(&lookup, "RATE_LIMIT_PER_TWO_MINUTES", 100)?,
            rate_jitter: Duration::from_millis(parse_var(&lookup, "RATE_JITTER_MS", 25)?),
            retry_max_attempts: parse_var(&lookup, "RETRY_MAX_ATTEMPTS", 5)?,
            retry_default_delay: Duration::from_millis(parse_var(
                &lookup,
                "RETRY_DEFAULT_DELAY_MS",
                1_000,
            )?),
            request_timeout: Duration::from_secs(parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 10)?),
            output_path: lookup("OUTPUT_PATH")
                .unwrap_or_else(|| "data/comps.json".to_string())
                .into(),
            catalog_versions_url: lookup("CATALOG_VERSIONS_URL")
                .unwrap_or_else(|| DEFAULT_VERSIONS_URL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let at_least_one = [
            ("SEED_TARGET", self.seed_target),
            ("MATCHES_PER_PLAYER", self.matches_per_player as usize),
            ("TOP_N", self.top_n),
            ("FETCH_CONCURRENCY", self.fetch_concurrency),
            ("MAX_PAGES_PER_DIVISION", self.max_pages_per_division as usize),
            ("RATE_LIMIT_PER_SECOND", self.rate_per_second),
            ("RATE_LIMIT_PER_TWO_MINUTES", self.rate_per_two_minutes),
            ("RETRY_MAX_ATTEMPTS", self.retry_max_attempts as usize),
            ("REQUEST_TIMEOUT_SECS", self.request_timeout.as_secs() as usize),
        ];

        for (name, value) in at_least_one {
            if value == 0 {
                return Err(ConfigError::InvalidValue(format!("{} must be at least 1", name)));
            }
        }

        if self.queue_ids.is_empty() {
            return Err(ConfigError::InvalidValue("QUEUE_IDS cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Short and long call-budget windows shared by every host
    pub fn rate_windows(&self) -> Vec<RateWindow> {
        vec![
            RateWindow::new(self.rate_per_second, Duration::from_secs(1)),
            RateWindow::new(self.rate_per_two_minutes, Duration::from_secs(120)),
        ]
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            default_retry_after: self.retry_default_delay,
            ..RetryPolicy::default()
        }
    }

    /// `--output <path>` overrides `OUTPUT_PATH`
    pub fn parse_output_from_args(args: &[String]) -> Option<PathBuf> {
        let idx = args.iter().position(|arg| arg == "--output")?;
        args.get(idx + 1).map(PathBuf::from)
    }
}

impl fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("api_key", &"<redacted>")
            .field("platform", &self.platform)
            .field("region", &self.region)
            .field("seed_target", &self.seed_target)
            .field("matches_per_player", &self.matches_per_player)
            .field("min_sample", &self.min_sample)
            .field("top_n", &self.top_n)
            .field("queue_ids", &self.queue_ids)
            .field("fetch_concurrency", &self.fetch_concurrency)
            .field("max_pages_per_division", &self.max_pages_per_division)
            .field("paged_tiers", &self.paged_tiers)
            .field("rate_per_second", &self.rate_per_second)
            .field("rate_per_two_minutes", &self.rate_per_two_minutes)
            .field("output_path", &self.output_path)
            .finish_non_exhaustive()
    }
}

const REGIONS: [&str; 4] = ["americas", "europe", "asia", "sea"];

/// Regional routing value serving match data for a platform
pub fn region_for_platform(platform: &str) -> Option<&'static str> {
    match platform {
        "na1" | "br1" | "la1" | "la2" => Some("americas"),
        "euw1" | "eun1" | "tr1" | "ru" | "me1" => Some("europe"),
        "kr" | "jp1" => Some("asia"),
        "oc1" | "ph2" | "sg2" | "th2" | "tw2" | "vn2" => Some("sea"),
        _ => None,
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(format!("{} could not be parsed from '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

fn parse_list<T>(
    raw: &str,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            parse(item).ok_or_else(|| {
                ConfigError::InvalidValue(format!("{} contains invalid entry '{}'", name, item))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<HarvestConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HarvestConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[("RIOT_API_KEY", "RGAPI-test")]).unwrap();

        assert_eq!(config.platform, "na1");
        assert_eq!(config.region, "americas");
        assert_eq!(config.seed_target, 200);
        assert_eq!(config.matches_per_player, 20);
        assert_eq!(config.min_sample, 10);
        assert_eq!(config.top_n, 50);
        assert_eq!(config.queue_ids, vec![1100]);
        assert_eq!(config.fetch_concurrency, 6);
        assert_eq!(config.paged_tiers, vec![Tier::Diamond, Tier::Emerald]);
        assert_eq!(config.output_path, PathBuf::from("data/comps.json"));
        assert_eq!(config.catalog_versions_url, DEFAULT_VERSIONS_URL);
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::MissingVariable("RIOT_API_KEY".to_string())
        );
        assert_eq!(
            config_from(&[("RIOT_API_KEY", "   ")]).unwrap_err(),
            ConfigError::MissingVariable("RIOT_API_KEY".to_string())
        );
    }

    #[test]
    fn test_custom_config() {
        let config = config_from(&[
            ("RIOT_API_KEY", "RGAPI-test"),
            ("TFT_PLATFORM", "EUW1"),
            ("SEED_TARGET", "50"),
            ("QUEUE_IDS", "1100, 1160"),
            ("LADDER_PAGED_TIERS", "platinum,gold"),
            ("FETCH_CONCURRENCY", "4"),
        ])
        .unwrap();

        assert_eq!(config.platform, "euw1");
        assert_eq!(config.region, "europe");
        assert_eq!(config.seed_target, 50);
        assert_eq!(config.queue_ids, vec![1100, 1160]);
        assert_eq!(config.paged_tiers, vec![Tier::Platinum, Tier::Gold]);
        assert_eq!(config.fetch_concurrency, 4);
    }

    #[test]
    fn test_invalid_target_rejected() {
        let err = config_from(&[("RIOT_API_KEY", "k"), ("TFT_PLATFORM", "mars1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = config_from(&[("RIOT_API_KEY", "k"), ("TFT_REGION", "moon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_unparseable_and_zero_values_rejected() {
        let err = config_from(&[("RIOT_API_KEY", "k"), ("SEED_TARGET", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = config_from(&[("RIOT_API_KEY", "k"), ("FETCH_CONCURRENCY", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = config_from(&[("RIOT_API_KEY", "k"), ("QUEUE_IDS", "1100,ranked")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let err = config_from(&[("RIOT_API_KEY", "k"), ("REQUEST_TIMEOUT_SECS", "0")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS must be at least 1".to_string())
        );
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = config_from(&[("RIOT_API_KEY", "RGAPI-secret")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("RGAPI-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_output_override_from_args() {
        let args: Vec<String> = ["compflow", "--output", "/tmp/out.json"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            HarvestConfig::parse_output_from_args(&args),
            Some(PathBuf::from("/tmp/out.json"))
        );
        assert_eq!(HarvestConfig::parse_output_from_args(&args[..1]), None);
    }

    #[test]
    fn test_rate_windows() {
        let config = config_from(&[("RIOT_API_KEY", "k")]).unwrap();
        let windows = config.rate_windows();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].limit, 20);
        assert_eq!(windows[1].period, Duration::from_secs(120));
    }
}
