//! Qiita trending articles.
//!
//! Queries the [Qiita items API](https://qiita.com/api/v2/docs) for recent
//! articles above a stock threshold, then ranks them by likes.
//!
//! # Request
//!
//! ```text
//! GET https://qiita.com/api/v2/items?page=1&per_page=10&query=created:>2024-01-01 stocks:>50
//! ```

use super::{FetchOutcome, TREND_LIMIT, or_default};
use crate::config::QiitaConfig;
use crate::models::QiitaTrend;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use serde::Deserialize;
use std::cmp::Reverse;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

const PER_PAGE: u32 = 10;
const MAX_TAGS: usize = 3;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QiitaItem {
    title: Option<String>,
    url: Option<String>,
    likes_count: Option<u64>,
    user: Option<QiitaUser>,
    tags: Option<Vec<QiitaTag>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QiitaUser {
    id: Option<String>,
    profile_image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QiitaTag {
    name: Option<String>,
}

/// Fetch the top Qiita articles.
///
/// Never fails: any error is logged and reported as [`FetchOutcome::Failed`].
#[instrument(level = "info", skip_all, fields(endpoint = %config.endpoint))]
pub async fn fetch_trends(client: &reqwest::Client, config: &QiitaConfig) -> FetchOutcome<QiitaTrend> {
    info!("Fetching Qiita trends");
    FetchOutcome::from_result("qiita", request_trends(client, config).await)
}

async fn request_trends(
    client: &reqwest::Client,
    config: &QiitaConfig,
) -> Result<Vec<QiitaTrend>, Box<dyn Error>> {
    let per_page = PER_PAGE.to_string();
    let query = config.query();
    let body = client
        .get(&config.endpoint)
        .query(&[("page", "1"), ("per_page", per_page.as_str()), ("query", query.as_str())])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = body.len(), "Received Qiita response");

    let items: Vec<QiitaItem> = serde_json::from_str(&body).inspect_err(|e| {
        warn!(error = %e, body = %truncate_for_log(&body, 300), "Qiita returned unexpected JSON");
    })?;
    Ok(rank(items.into_iter().map(project).collect()))
}

fn project(item: QiitaItem) -> QiitaTrend {
    let user = item.user.unwrap_or_default();
    let tags = item
        .tags
        .unwrap_or_default()
        .into_iter()
        .take(MAX_TAGS)
        .filter_map(|tag| tag.name)
        .collect();

    QiitaTrend {
        title: or_default(item.title, ""),
        url: or_default(item.url, ""),
        likes: item.likes_count.unwrap_or(0),
        author: or_default(user.id, "Unknown"),
        avatar_url: or_default(user.profile_image_url, ""),
        tags,
    }
}

/// Order by likes, most first, keeping upstream order among ties, and keep
/// the top [`TREND_LIMIT`].
fn rank(trends: Vec<QiitaTrend>) -> Vec<QiitaTrend> {
    trends
        .into_iter()
        .sorted_by_key(|trend| Reverse(trend.likes))
        .take(TREND_LIMIT)
        .collect()
}
