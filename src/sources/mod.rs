//! Trend sources and the shared pieces every fetcher uses.
//!
//! Each source module follows the same single-request pattern:
//!
//! 1. **Request**: one GET against a fixed endpoint with fixed query parameters
//! 2. **Parse**: JSON or RSS body into upstream structs
//! 3. **Project**: map upstream fields onto the record type, applying defaults
//! 4. **Truncate**: keep at most [`TREND_LIMIT`] records
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Ordering |
//! |--------|--------|--------|----------|
//! | Qiita | [`qiita`] | REST items search (JSON array) | sorted by likes, descending |
//! | Zenn | [`zenn`] | RSS 2.0 feed | feed order |
//! | GitHub | [`github`] | repository search (JSON object) | upstream star order |
//!
//! # Failure Handling
//!
//! Every module exports `fetch_trends(client, config) -> FetchOutcome<_>`.
//! Network errors, non-2xx statuses and unparseable bodies never escape a
//! fetcher; they are logged once and reported as [`FetchOutcome::Failed`].

use crate::config::Config;
use std::error::Error;
use tracing::{error, info};

pub mod github;
pub mod qiita;
pub mod zenn;

/// Maximum number of records any source contributes to a snapshot.
pub const TREND_LIMIT: usize = 5;

/// Result of one fetcher run.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The request succeeded and produced these records (possibly none).
    Fetched(Vec<T>),
    /// The request or parse failed. The cause has already been logged.
    Failed { cause: String },
}

impl<T> FetchOutcome<T> {
    /// Convert a fetch result into an outcome, logging the failure cause.
    pub fn from_result(source: &'static str, result: Result<Vec<T>, Box<dyn Error>>) -> Self {
        match result {
            Ok(records) => {
                info!(source, count = records.len(), "Fetched trends");
                FetchOutcome::Fetched(records)
            }
            Err(e) => {
                error!(source, error = %e, "Failed to fetch trends; using an empty list");
                FetchOutcome::Failed {
                    cause: e.to_string(),
                }
            }
        }
    }

    /// The logged failure cause, if the fetch failed.
    pub fn cause(&self) -> Option<&str> {
        match self {
            FetchOutcome::Fetched(_) => None,
            FetchOutcome::Failed { cause } => Some(cause.as_str()),
        }
    }

    /// The fetched records, or an empty list for a failed fetch.
    pub fn into_records(self) -> Vec<T> {
        match self {
            FetchOutcome::Fetched(records) => records,
            FetchOutcome::Failed { .. } => Vec::new(),
        }
    }
}

/// Build the HTTP client shared by all fetchers for one run.
///
/// The client carries the configured `User-Agent` and per-request timeout.
pub fn build_client(config: &Config) -> Result<reqwest::Client, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

/// Replace a missing or `null` string with `default`.
pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}
