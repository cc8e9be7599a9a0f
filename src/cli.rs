//! Command-line interface definitions for tech_trends.
//!
//! Every flag is optional: running the binary with no arguments performs one
//! full fetch-and-write cycle with the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the tech_trends application.
///
/// Flags override values loaded from the optional YAML config file, which in
/// turn override the built-in defaults.
///
/// # Examples
///
/// ```sh
/// # Write data/trends.json with defaults
/// tech_trends
///
/// # Custom output path and a config file
/// tech_trends -o ./public/data/trends.json -c ./trends.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON snapshot to write [default: data/trends.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
