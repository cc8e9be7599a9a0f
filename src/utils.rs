//! Utility functions for timestamps, log-safe string truncation, and file
//! system preparation.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Format a UTC instant as ISO-8601 with microseconds and a literal `Z`.
///
/// # Examples
///
/// ```ignore
/// // 2025-05-06T12:30:00.000042Z
/// let ts = iso8601_utc(Utc.with_ymd_and_hms(2025, 5, 6, 12, 30, 0).unwrap());
/// ```
pub fn iso8601_utc(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// The current time, formatted by [`iso8601_utc`].
pub fn utc_now_iso8601() -> String {
    iso8601_utc(Utc::now())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes on a character boundary, with
/// an ellipsis and the number of dropped bytes appended. Upstream bodies are
/// frequently Japanese, so the cut never splits a multi-byte character.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create the parent directory of `path` if it does not exist yet.
///
/// An already existing directory is not an error. A bare file name has no
/// parent to create.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).await?;
            debug!(dir = %dir.display(), "Output directory ready");
        }
        _ => {}
    }
    Ok(())
}
