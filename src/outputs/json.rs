//! JSON output for the dashboard snapshot.
//!
//! The file is pretty-printed with two-space indentation and keeps non-ASCII
//! text (Japanese titles, author names) as literal UTF-8.

use crate::models::Snapshot;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Snapshot`] to `path`, replacing any previous file.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written. These are the only fatal failures of a run.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Err(e) = ensure_parent_dir(path).await {
        error!(error = %e, "Failed to create output directory");
        return Err(e);
    }

    fs::write(path, json).await?;
    info!("Wrote trends snapshot");
    Ok(())
}

/// Read a snapshot back from disk.
#[cfg(test)]
pub async fn read_snapshot(path: &Path) -> Result<Snapshot, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GitHubTrend, Metadata, QiitaTrend, Trends, ZennTrend};

    fn sample() -> Snapshot {
        Snapshot {
            metadata: Metadata {
                last_updated: "2025-05-06T12:00:00.123456Z".to_string(),
            },
            trends: Trends {
                qiita: vec![QiitaTrend {
                    title: "型で守るRust".to_string(),
                    url: "https://qiita.com/alice/items/1".to_string(),
                    likes: 321,
                    author: "alice".to_string(),
                    avatar_url: "https://example.com/alice.png".to_string(),
                    tags: vec!["Rust".to_string(), "型".to_string()],
                }],
                zenn: vec![ZennTrend {
                    title: "非同期入門".to_string(),
                    url: "https://zenn.dev/bob/articles/async".to_string(),
                    author: "Zenn User".to_string(),
                    date: "Tue, 06 May 2025 12:00:00 GMT".to_string(),
                    image_url: String::new(),
                }],
                github: vec![GitHubTrend {
                    name: "a/b".to_string(),
                    description: String::new(),
                    url: "https://github.com/a/b".to_string(),
                    stars: 1200,
                    language: "Unknown".to_string(),
                    owner_avatar: String::new(),
                }],
            },
        }
    }

    #[tokio::test]
    async fn test_write_then_read_reproduces_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("data/trends.json");
        let snapshot = sample();

        write_snapshot(&snapshot, &path).await.unwrap();
        let restored = read_snapshot(&path).await.unwrap();

        assert_eq!(restored, snapshot);
    }

    #[tokio::test]
    async fn test_output_is_indented_and_keeps_non_ascii() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trends.json");

        write_snapshot(&sample(), &path).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();

        assert!(raw.contains("型で守るRust"));
        assert!(!raw.contains("\\u"));
        assert!(raw.starts_with("{\n  \"metadata\": {\n    \"last_updated\""));
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trends.json");
        std::fs::write(&path, "stale content that is longer than nothing").unwrap();

        let mut snapshot = sample();
        snapshot.trends = Trends::default();
        write_snapshot(&snapshot, &path).await.unwrap();

        assert_eq!(read_snapshot(&path).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_unwritable_parent_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let result = write_snapshot(&sample(), &blocker.join("trends.json")).await;
        assert!(result.is_err());
    }
}
