//! Navigation operations for CDP page session.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const LOAD_POLL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Wait until `document.readyState` reports the DOM is usable.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            // The old document can answer once more right after a reload.
            tokio::time::sleep(LOAD_POLL).await;

            match self.evaluate("document.readyState").await {
                Ok(state) if matches!(state.as_str(), Some("complete" | "interactive")) => {
                    return Ok(());
                }
                Ok(_) => {}
                // Execution context swapped out mid-navigation
                Err(CdpError::Protocol { .. }) | Err(CdpError::JavaScript(_)) => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() > LOAD_TIMEOUT {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }
        }
    }

    /// Reload the page and wait for it to load.
    pub async fn reload(&self) -> Result<(), CdpError> {
        self.call("Page.reload", None).await?;
        self.wait_for_load().await?;
        debug!("Reloaded target {}", self.target_id());
        Ok(())
    }
}
