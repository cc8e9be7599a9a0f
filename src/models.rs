//! Data models for normalized trend records and the snapshot document.
//!
//! This module defines the core data structures written to disk:
//! - [`QiitaTrend`], [`ZennTrend`], [`GitHubTrend`]: one normalized entry per
//!   trending article or repository
//! - [`Snapshot`]: the merged document produced by one run
//!
//! Field names match the keys of `trends.json` exactly, so the structs
//! serialize without any renames.

use serde::{Deserialize, Serialize};

/// A trending Qiita article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QiitaTrend {
    pub title: String,
    pub url: String,
    /// `likes_count` as reported by the Qiita API.
    pub likes: u64,
    /// The author's Qiita user id, `"Unknown"` when absent.
    pub author: String,
    pub avatar_url: String,
    /// At most three tag names, in upstream order.
    pub tags: Vec<String>,
}

/// A trending Zenn article taken from the RSS feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ZennTrend {
    pub title: String,
    pub url: String,
    /// `dc:creator` of the feed item, `"Zenn User"` when absent.
    pub author: String,
    /// The raw `pubDate` text. Not parsed.
    pub date: String,
    /// The `url` attribute of the item's `enclosure`.
    pub image_url: String,
}

/// A trending GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GitHubTrend {
    /// Repository name in `owner/repo` form.
    pub name: String,
    pub description: String,
    pub url: String,
    pub stars: u64,
    /// Primary language, `"Unknown"` when GitHub reports none.
    pub language: String,
    pub owner_avatar: String,
}

/// The document written once per run.
///
/// # JSON Layout
///
/// ```text
/// {
///   "metadata": { "last_updated": "2025-05-06T12:00:00.000000Z" },
///   "trends": { "qiita": [...], "zenn": [...], "github": [...] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Snapshot {
    pub metadata: Metadata,
    pub trends: Trends,
}

/// Snapshot metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metadata {
    /// Generation time, ISO-8601 UTC with a literal `Z` suffix.
    pub last_updated: String,
}

/// Per-source trend lists, each holding at most five records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Trends {
    pub qiita: Vec<QiitaTrend>,
    pub zenn: Vec<ZennTrend>,
    pub github: Vec<GitHubTrend>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serialization_keys() {
        let snapshot = Snapshot {
            metadata: Metadata {
                last_updated: "2025-05-06T12:00:00.000000Z".to_string(),
            },
            trends: Trends {
                qiita: vec![QiitaTrend {
                    title: "Rustで始める".to_string(),
                    url: "https://qiita.com/a/items/1".to_string(),
                    likes: 120,
                    author: "alice".to_string(),
                    avatar_url: String::new(),
                    tags: vec!["Rust".to_string()],
                }],
                zenn: vec![],
                github: vec![],
            },
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value["metadata"]["last_updated"],
            "2025-05-06T12:00:00.000000Z"
        );
        assert_eq!(value["trends"]["qiita"][0]["likes"], 120);
        assert_eq!(value["trends"]["qiita"][0]["avatar_url"], "");
        assert!(value["trends"]["zenn"].as_array().unwrap().is_empty());
        assert!(value["trends"]["github"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_github_trend_deserialization() {
        let json = r#"{
            "name": "rust-lang/rust",
            "description": "",
            "url": "https://github.com/rust-lang/rust",
            "stars": 100000,
            "language": "Rust",
            "owner_avatar": "https://avatars.githubusercontent.com/u/5430905"
        }"#;

        let trend: GitHubTrend = serde_json::from_str(json).unwrap();
        assert_eq!(trend.name, "rust-lang/rust");
        assert_eq!(trend.stars, 100000);
        assert!(trend.description.is_empty());
    }

    #[test]
    fn test_trends_default_is_empty() {
        let trends = Trends::default();
        assert!(trends.qiita.is_empty());
        assert!(trends.zenn.is_empty());
        assert!(trends.github.is_empty());
    }
}
