//! BrowserManager core: connection and Chrome process management.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::CdpClient;

const LAUNCH_POLL: Duration = Duration::from_millis(200);
const LAUNCH_ATTEMPTS: u32 = 30;

/// Manages the browser connection.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    /// Chrome process handle (if we launched it).
    chrome_process: RwLock<Option<Child>>,
}

impl BrowserManager {
    /// Create a new browser manager.
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome_process: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Check if Chrome is already listening on the debug port.
    async fn is_chrome_running(&self) -> bool {
        reqwest::get(&format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    /// Launch Chrome with remote debugging enabled.
    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = Self::find_chrome().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.config.get_profile_dir();

        if let Err(e) = tokio::fs::create_dir_all(&profile_dir).await {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    /// Connect to the browser, launching it if necessary.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        if !self.is_chrome_running().await {
            info!("Chrome not running on port {}, launching...", self.config.debug_port);

            let child = self.launch_chrome().await?;
            *self.chrome_process.write().await = Some(child);

            let mut ready = false;
            for _ in 0..LAUNCH_ATTEMPTS {
                tokio::time::sleep(LAUNCH_POLL).await;
                if self.is_chrome_running().await {
                    ready = true;
                    break;
                }
            }

            if !ready {
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }
        } else {
            info!("Chrome already running on port {}", self.config.debug_port);
        }

        let client = CdpClient::connect(&self.config.endpoint()).await?;
        info!("Connected to {} at {}", client.browser(), self.config.endpoint());
        *self.client.write().await = Some(Arc::new(client));

        Ok(())
    }

    /// Get the CDP client, connecting first if needed.
    pub(super) async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.connect().await?;
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Drop the browser connection.
    pub async fn close(&self) -> Result<(), BrowserError> {
        let _ = self.client.write().await.take();
        info!("Browser connection closed");
        Ok(())
    }

    /// Shutdown Chrome if we launched it.
    pub async fn shutdown_chrome(&self) -> Result<(), BrowserError> {
        self.close().await?;
        if let Some(mut child) = self.chrome_process.write().await.take() {
            info!("Shutting down Chrome...");
            let _ = child.kill().await;
        }
        Ok(())
    }
}
