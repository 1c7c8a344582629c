//! Runtime configuration types (browser, store, timing, ingest, logging).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::framefeed_dir;

/// Browser connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Run Chrome headless when we launch it ourselves.
    #[serde(default)]
    pub headless: bool,

    /// Persistent profile directory so the target site's login survives.
    #[serde(default)]
    pub profile_dir: Option<PathBuf>,
}

fn default_debug_port() -> u16 {
    9222
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            profile_dir: None,
        }
    }
}

/// Shared key-value store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store file. Defaults to `~/.framefeed/store.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| framefeed_dir().join("store.json"))
    }
}

/// Every wall-clock wait used by the import agent and finalizer, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Wait after a page load before touching the form.
    #[serde(default = "default_initial_settle")]
    pub initial_settle_ms: u64,

    /// Wait after the synthetic file selection before the negative prompt / generate steps.
    #[serde(default = "default_upload_settle")]
    pub upload_settle_ms: u64,

    /// Wait after clicking the negative-prompt toggle for its field to render.
    #[serde(default = "default_negative_reveal")]
    pub negative_reveal_ms: u64,

    /// Wait after clicking generate before advancing the queue.
    #[serde(default = "default_post_generate")]
    pub post_generate_ms: u64,

    /// Wait before clicking the "new upload" control and reloading for the next item.
    #[serde(default = "default_before_next")]
    pub before_next_ms: u64,

    /// Offsets (from the first attempt) at which the prompt field lookup is retried.
    #[serde(default = "default_prompt_retry")]
    pub prompt_retry_ms: Vec<u64>,

    /// Interval between in-progress indicator polls.
    #[serde(default = "default_progress_poll")]
    pub progress_poll_ms: u64,

    /// Maximum number of in-progress polls; unset polls forever.
    #[serde(default)]
    pub progress_max_polls: Option<u32>,

    /// Wait between the finalizer's navigation steps.
    #[serde(default = "default_finalize_step")]
    pub finalize_step_ms: u64,

    /// Wait between positional asset clicks.
    #[serde(default = "default_item_click")]
    pub item_click_ms: u64,

    /// Wait around the download menu interactions.
    #[serde(default = "default_menu_step")]
    pub menu_step_ms: u64,
}

fn default_initial_settle() -> u64 {
    3000
}

fn default_upload_settle() -> u64 {
    4000
}

fn default_negative_reveal() -> u64 {
    1000
}

fn default_post_generate() -> u64 {
    2000
}

fn default_before_next() -> u64 {
    2000
}

fn default_prompt_retry() -> Vec<u64> {
    vec![0, 1000, 2000, 4000]
}

fn default_progress_poll() -> u64 {
    5000
}

fn default_finalize_step() -> u64 {
    2000
}

fn default_item_click() -> u64 {
    500
}

fn default_menu_step() -> u64 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_settle_ms: default_initial_settle(),
            upload_settle_ms: default_upload_settle(),
            negative_reveal_ms: default_negative_reveal(),
            post_generate_ms: default_post_generate(),
            before_next_ms: default_before_next(),
            prompt_retry_ms: default_prompt_retry(),
            progress_poll_ms: default_progress_poll(),
            progress_max_polls: None,
            finalize_step_ms: default_finalize_step(),
            item_click_ms: default_item_click(),
            menu_step_ms: default_menu_step(),
        }
    }
}

impl TimingConfig {
    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }

    pub fn upload_settle(&self) -> Duration {
        Duration::from_millis(self.upload_settle_ms)
    }

    pub fn negative_reveal(&self) -> Duration {
        Duration::from_millis(self.negative_reveal_ms)
    }

    pub fn post_generate(&self) -> Duration {
        Duration::from_millis(self.post_generate_ms)
    }

    pub fn before_next(&self) -> Duration {
        Duration::from_millis(self.before_next_ms)
    }

    pub fn prompt_retry(&self) -> Vec<Duration> {
        self.prompt_retry_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    pub fn progress_poll(&self) -> Duration {
        Duration::from_millis(self.progress_poll_ms)
    }

    pub fn finalize_step(&self) -> Duration {
        Duration::from_millis(self.finalize_step_ms)
    }

    pub fn item_click(&self) -> Duration {
        Duration::from_millis(self.item_click_ms)
    }

    pub fn menu_step(&self) -> Duration {
        Duration::from_millis(self.menu_step_ms)
    }

    /// All waits set to zero. Useful for tests driving a fake page.
    pub fn immediate() -> Self {
        Self {
            initial_settle_ms: 0,
            upload_settle_ms: 0,
            negative_reveal_ms: 0,
            post_generate_ms: 0,
            before_next_ms: 0,
            prompt_retry_ms: vec![0],
            progress_poll_ms: 1,
            progress_max_polls: None,
            finalize_step_ms: 0,
            item_click_ms: 0,
            menu_step_ms: 0,
        }
    }
}

/// Archive ingestion and conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// JPEG re-encode quality (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Negative prompt applied to every item that does not carry its own.
    #[serde(default)]
    pub negative_prompt: String,
}

fn default_jpeg_quality() -> u8 {
    95
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            negative_prompt: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. Defaults to `~/.framefeed/logs`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| framefeed_dir().join("logs"))
    }
}
