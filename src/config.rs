//! Runtime configuration.
//!
//! A [`Config`] is built once at startup and passed by reference to the
//! snapshot driver and every fetcher. Values come from three layers, highest
//! precedence first:
//!
//! 1. Command-line flags ([`crate::cli::Cli`])
//! 2. An optional YAML file (`--config`)
//! 3. Built-in defaults ([`Config::default`])
//!
//! # YAML Example
//!
//! ```yaml
//! output_path: public/data/trends.json
//! timeout_secs: 5
//! qiita:
//!   created_after: "2025-01-01"
//!   min_stocks: 100
//! github:
//!   min_stars: 1000
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_OUTPUT_PATH: &str = "data/trends.json";
pub const DEFAULT_USER_AGENT: &str = "GitHubTrendDashboard/1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CREATED_AFTER: &str = "2024-01-01";

/// Top-level configuration shared by the driver and the fetchers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the snapshot is written. Parent directories are created.
    pub output_path: PathBuf,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Timeout applied to each request.
    pub timeout_secs: u64,
    pub qiita: QiitaConfig,
    pub zenn: ZennConfig,
    pub github: GitHubConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            qiita: QiitaConfig::default(),
            zenn: ZennConfig::default(),
            github: GitHubConfig::default(),
        }
    }
}

/// Qiita items search settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QiitaConfig {
    pub endpoint: String,
    /// Only articles created after this date (`YYYY-MM-DD`).
    pub created_after: String,
    /// Minimum stock count.
    pub min_stocks: u64,
}

impl Default for QiitaConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://qiita.com/api/v2/items".to_string(),
            created_after: DEFAULT_CREATED_AFTER.to_string(),
            min_stocks: 50,
        }
    }
}

impl QiitaConfig {
    /// Qiita search query, e.g. `created:>2024-01-01 stocks:>50`.
    pub fn query(&self) -> String {
        format!("created:>{} stocks:>{}", self.created_after, self.min_stocks)
    }
}

/// Zenn feed settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ZennConfig {
    pub feed_url: String,
}

impl Default for ZennConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://zenn.dev/feed".to_string(),
        }
    }
}

/// GitHub repository search settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub endpoint: String,
    /// Only repositories created after this date (`YYYY-MM-DD`).
    pub created_after: String,
    pub min_stars: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.github.com/search/repositories".to_string(),
            created_after: DEFAULT_CREATED_AFTER.to_string(),
            min_stars: 500,
        }
    }
}

impl GitHubConfig {
    /// GitHub search qualifier string, e.g. `created:>2024-01-01 stars:>500`.
    pub fn query(&self) -> String {
        format!("created:>{} stars:>{}", self.created_after, self.min_stars)
    }
}

impl Config {
    /// Build the effective configuration from CLI arguments.
    ///
    /// Reads the YAML file named by `--config` when present, then applies the
    /// remaining flags on top and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// any endpoint is not an absolute URL.
    #[instrument(level = "info", skip_all)]
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn Error>> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(output) = &cli.output {
            config.output_path = output.clone();
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            config.timeout_secs = timeout_secs;
        }

        config.validate()?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// Load a YAML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&raw)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Check that every endpoint parses as an absolute URL.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        for (source, endpoint) in [
            ("qiita", &self.qiita.endpoint),
            ("zenn", &self.zenn.feed_url),
            ("github", &self.github.endpoint),
        ] {
            Url::parse(endpoint)
                .map_err(|e| format!("invalid {source} endpoint {endpoint:?}: {e}"))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
