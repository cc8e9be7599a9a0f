//! Output generation for the trend snapshot.
//!
//! # Submodules
//!
//! - [`json`]: Writes a [`crate::models::Snapshot`] to the configured path
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── trends.json   # overwritten on every run
//! ```

pub mod json;
