//! GitHub trending repositories.
//!
//! Uses the [repository search API](https://docs.github.com/rest/search/search#search-repositories)
//! sorted by stars. GitHub already orders and pages the results, so the only
//! local step is projection.

use super::{FetchOutcome, TREND_LIMIT, or_default};
use crate::config::GitHubConfig;
use crate::models::GitHubTrend;
use crate::utils::truncate_for_log;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    items: Option<Vec<Repository>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Repository {
    full_name: Option<String>,
    description: Option<String>,
    html_url: Option<String>,
    stargazers_count: Option<u64>,
    language: Option<String>,
    owner: Option<Owner>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Owner {
    avatar_url: Option<String>,
}

/// Fetch the most starred recent repositories.
///
/// Never fails: any error is logged and reported as [`FetchOutcome::Failed`].
#[instrument(level = "info", skip_all, fields(endpoint = %config.endpoint))]
pub async fn fetch_trends(client: &reqwest::Client, config: &GitHubConfig) -> FetchOutcome<GitHubTrend> {
    info!("Fetching GitHub trends");
    FetchOutcome::from_result("github", request_trends(client, config).await)
}

async fn request_trends(
    client: &reqwest::Client,
    config: &GitHubConfig,
) -> Result<Vec<GitHubTrend>, Box<dyn Error>> {
    let per_page = TREND_LIMIT.to_string();
    let query = config.query();
    let body = client
        .get(&config.endpoint)
        .header(ACCEPT, ACCEPT_V3)
        .query(&[
            ("q", query.as_str()),
            ("sort", "stars"),
            ("order", "desc"),
            ("per_page", per_page.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = body.len(), "Received GitHub response");

    let response: SearchResponse = serde_json::from_str(&body).inspect_err(|e| {
        warn!(error = %e, body = %truncate_for_log(&body, 300), "GitHub returned unexpected JSON");
    })?;

    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .take(TREND_LIMIT)
        .map(project)
        .collect())
}

fn project(repo: Repository) -> GitHubTrend {
    GitHubTrend {
        name: or_default(repo.full_name, ""),
        description: or_default(repo.description, ""),
        url: or_default(repo.html_url, ""),
        stars: repo.stargazers_count.unwrap_or(0),
        language: or_default(repo.language, "Unknown"),
        owner_avatar: or_default(repo.owner.and_then(|owner| owner.avatar_url), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config_for(base: &str) -> GitHubConfig {
        GitHubConfig {
            endpoint: format!("{base}/search/repositories"),
            ..GitHubConfig::default()
        }
    }

    #[test]
    fn test_project_full_repository() {
        let repo: Repository = serde_json::from_value(json!({
            "full_name": "tokio-rs/tokio",
            "description": "A runtime for writing reliable asynchronous applications",
            "html_url": "https://github.com/tokio-rs/tokio",
            "stargazers_count": 27000,
            "language": "Rust",
            "owner": { "avatar_url": "https://avatars.githubusercontent.com/u/20248544" }
        }))
        .unwrap();

        let trend = project(repo);
        assert_eq!(trend.name, "tokio-rs/tokio");
        assert_eq!(trend.stars, 27000);
        assert_eq!(trend.language, "Rust");
        assert_eq!(trend.owner_avatar, "https://avatars.githubusercontent.com/u/20248544");
    }

    #[test]
    fn test_project_null_fields_use_defaults() {
        let repo: Repository = serde_json::from_value(json!({
            "full_name": "someone/docs",
            "description": null,
            "language": null
        }))
        .unwrap();

        let trend = project(repo);
        assert_eq!(trend.description, "");
        assert_eq!(trend.language, "Unknown");
        assert_eq!(trend.stars, 0);
        assert_eq!(trend.owner_avatar, "");
    }

    #[tokio::test]
    async fn test_fetch_trends_sends_search_parameters() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/search/repositories".to_string()))
            .match_header("accept", ACCEPT_V3)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "created:>2024-01-01 stars:>500".into()),
                Matcher::UrlEncoded("sort".into(), "stars".into()),
                Matcher::UrlEncoded("order".into(), "desc".into()),
                Matcher::UrlEncoded("per_page".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total_count": 1,
                    "items": [{ "full_name": "a/b", "stargazers_count": 900 }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let records = fetch_trends(&reqwest::Client::new(), &config_for(&server.url()))
            .await
            .into_records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a/b");
        assert_eq!(records[0].language, "Unknown");
    }

    #[tokio::test]
    async fn test_fetch_trends_caps_oversized_page() {
        let mut server = Server::new_async().await;
        let items: Vec<_> = (0..30)
            .map(|i| json!({ "full_name": format!("o/r{i}"), "stargazers_count": 1000 - i }))
            .collect();
        let _m = server
            .mock("GET", Matcher::Regex("^/search/repositories".to_string()))
            .with_status(200)
            .with_body(json!({ "items": items }).to_string())
            .create_async()
            .await;

        let records = fetch_trends(&reqwest::Client::new(), &config_for(&server.url()))
            .await
            .into_records();

        assert_eq!(records.len(), TREND_LIMIT);
        assert_eq!(records[0].name, "o/r0");
    }

    #[tokio::test]
    async fn test_fetch_trends_missing_items_is_empty_success() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/search/repositories".to_string()))
            .with_status(200)
            .with_body(r#"{"total_count": 0}"#)
            .create_async()
            .await;

        let outcome = fetch_trends(&reqwest::Client::new(), &config_for(&server.url())).await;
        assert!(outcome.cause().is_none());
        assert!(outcome.into_records().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_trends_rate_limited_is_empty() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", Matcher::Regex("^/search/repositories".to_string()))
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let outcome = fetch_trends(&reqwest::Client::new(), &config_for(&server.url())).await;
        assert!(outcome.cause().is_some());
    }
}
