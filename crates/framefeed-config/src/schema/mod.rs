//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_runtime;
mod schema_target;

pub use schema_runtime::*;
pub use schema_target::*;

/// Root directory for framefeed state (`~/.framefeed`).
pub fn framefeed_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".framefeed"))
        .unwrap_or_else(|| PathBuf::from(".framefeed"))
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub target: TargetProfile,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
