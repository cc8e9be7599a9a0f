//! Snapshot assembly: fetch every source, merge, persist.
//!
//! Sources are fetched one after another. A failed source contributes an
//! empty list, so building a [`Snapshot`] itself cannot fail; only writing it
//! can.

use crate::config::Config;
use crate::models::{Metadata, Snapshot, Trends};
use crate::outputs::json::write_snapshot;
use crate::sources::{self, github, qiita, zenn};
use crate::utils::utc_now_iso8601;
use std::error::Error;
use tracing::{info, instrument};

/// Fetch all three sources and merge them with a generation timestamp.
#[instrument(level = "info", skip_all)]
pub async fn build_snapshot(client: &reqwest::Client, config: &Config) -> Snapshot {
    let qiita = qiita::fetch_trends(client, &config.qiita).await;
    let zenn = zenn::fetch_trends(client, &config.zenn).await;
    let github = github::fetch_trends(client, &config.github).await;

    let failed_sources = [qiita.cause(), zenn.cause(), github.cause()]
        .iter()
        .filter(|cause| cause.is_some())
        .count();

    let trends = Trends {
        qiita: qiita.into_records(),
        zenn: zenn.into_records(),
        github: github.into_records(),
    };
    info!(
        qiita_count = trends.qiita.len(),
        zenn_count = trends.zenn.len(),
        github_count = trends.github.len(),
        failed_sources,
        "Collected trends"
    );

    Snapshot {
        metadata: Metadata {
            last_updated: utc_now_iso8601(),
        },
        trends,
    }
}

/// Run one full collection cycle and write the snapshot to
/// [`Config::output_path`].
///
/// # Errors
///
/// Fails only if the HTTP client cannot be built or the output cannot be
/// written.
#[instrument(level = "info", skip_all, fields(output = %config.output_path.display()))]
pub async fn run(config: &Config) -> Result<Snapshot, Box<dyn Error>> {
    let client = sources::build_client(config)?;
    let snapshot = build_snapshot(&client, config).await;

    write_snapshot(&snapshot, &config.output_path).await?;
    info!(path = %config.output_path.display(), "Data successfully saved");
    Ok(snapshot)
}
