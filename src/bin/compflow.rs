//! compflow - Ladder Composition Harvester
//!
//! Walks the ranked ladder, collects recent matches for the discovered
//! players, and publishes the best-performing team compositions as JSON.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin compflow
//! cargo run --release --bin compflow -- --output /srv/www/comps.json
//! ```
//!
//! ## Environment Variables
//!
//! - RIOT_API_KEY - Ladder service credential (required)
//! - TFT_PLATFORM - Platform routing value (default: na1)
//! - TFT_REGION - Regional routing value (default: derived from platform)
//! - SEED_TARGET / MATCHES_PER_PLAYER / MIN_SAMPLE / TOP_N / QUEUE_IDS
//! - FETCH_CONCURRENCY - In-flight request bound per stage (default: 6)
//! - OUTPUT_PATH - Published artifact (default: data/comps.json)
//! - RUST_LOG - Logging level (optional, default: info)
//!
//! ## Exit Status
//!
//! - 0 - run finished (including a skipped publish of an empty result)
//! - 1 - a stage produced no usable data, or publishing failed
//! - 2 - configuration error

use compflow::{HarvestConfig, HarvestError, Harvester};
use dotenv::dotenv;
use std::env;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("🚀 compflow v{}", env!("CARGO_PKG_VERSION"));

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), HarvestError> {
    let mut config = HarvestConfig::from_env()?;

    let args: Vec<String> = env::args().collect();
    if let Some(path) = HarvestConfig::parse_output_from_args(&args) {
        config.output_path = path;
    }

    log::info!("📋 Configuration:");
    log::info!("   ├─ Platform: {} (region {})", config.platform, config.region);
    log::info!("   ├─ Seed target: {}", config.seed_target);
    log::info!("   ├─ Matches per player: {}", config.matches_per_player);
    log::info!("   ├─ Queues: {:?}", config.queue_ids);
    log::info!("   ├─ Min sample / top N: {} / {}", config.min_sample, config.top_n);
    log::info!(
        "   ├─ Rate windows: {}/1s, {}/120s",
        config.rate_per_second,
        config.rate_per_two_minutes
    );
    log::info!("   ├─ Fetch concurrency: {}", config.fetch_concurrency);
    log::info!("   └─ Output: {}", config.output_path.display());

    let harvester = Harvester::from_config(config)?;
    let report = harvester.run().await?;

    log::info!("✅ Harvest complete: {}", report);
    Ok(())
}
