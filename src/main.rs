//! # Tech Trends
//!
//! Collects trending content from three public sources and writes a single
//! JSON snapshot for a static dashboard to read.
//!
//! ## Sources
//!
//! - Qiita articles via the items search API, ranked by likes
//! - Zenn articles via the RSS feed, in feed order
//! - GitHub repositories via the search API, ranked by stars
//!
//! ## Usage
//!
//! ```sh
//! tech_trends                      # writes data/trends.json
//! tech_trends -o public/trends.json -c trends.yaml
//! ```
//!
//! ## Architecture
//!
//! One sequential pass:
//! 1. **Fetching**: one request per source, each bounded by a timeout
//! 2. **Normalizing**: project upstream fields, apply defaults, keep the top 5
//! 3. **Output**: merge with a UTC timestamp and overwrite the snapshot file
//!
//! A failing source only empties its own list. The process exits non-zero
//! only when the snapshot cannot be written.

use clap::Parser;
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod models;
mod outputs;
mod snapshot;
mod sources;
mod utils;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("Starting data collection");

    let args = Cli::parse();
    let config = Config::from_cli(&args).inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    if let Err(e) = snapshot::run(&config).await {
        error!(
            path = %config.output_path.display(),
            error = %e,
            "Failed to write trends snapshot"
        );
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        millis = elapsed.as_millis() as u64,
        "Execution complete"
    );
    Ok(())
}
