//! Browser manager type definitions and configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::cdp::CdpError;

/// Browser manager errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No open tab matches {0}")]
    TabNotFound(String),

    #[error("Browser action failed: {0}")]
    ActionFailed(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::ChromeNotAvailable(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::SessionClosed => BrowserError::NotConnected,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

/// Browser configuration.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Profile directory for persistent login state.
    pub profile_dir: Option<PathBuf>,
    /// Whether to run Chrome in headless mode.
    pub headless: bool,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            profile_dir: None,
            headless: false,
        }
    }
}

impl BrowserManagerConfig {
    /// Get the profile directory, defaulting to `~/.framefeed/browser-profile`.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".framefeed")
                .join("browser-profile")
        })
    }

    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}
