//! BrowserManager tab management.

use std::sync::Arc;

use tracing::{debug, info};

use super::{BrowserError, BrowserManager};
use crate::cdp::PageSession;

impl BrowserManager {
    /// Open a new tab on `url`.
    pub async fn open_tab(&self, url: &str) -> Result<Arc<PageSession>, BrowserError> {
        let client = self.client().await?;
        let session = client.new_page(Some(url)).await?;
        session.wait_for_load().await?;

        info!("Opened tab {} on {}", session.target_id(), url);
        Ok(Arc::new(session))
    }

    /// Attach to the first open tab whose URL starts with `url_prefix`.
    pub async fn attach_tab(&self, url_prefix: &str) -> Result<Arc<PageSession>, BrowserError> {
        let client = self.client().await?;
        let pages = client.list_pages().await?;

        let target = pages
            .iter()
            .filter(|p| p.is_page())
            .find(|p| p.url.starts_with(url_prefix))
            .ok_or_else(|| BrowserError::TabNotFound(url_prefix.to_string()))?;

        debug!("Attaching to tab {} ({})", target.id, target.url);
        let session = client.attach_page(&target.id).await?;

        info!("Attached to tab {} on {}", session.target_id(), target.url);
        Ok(Arc::new(session))
    }

    /// Attach to a matching tab, or open one on `url` when none exists.
    pub async fn attach_or_open(&self, url: &str) -> Result<Arc<PageSession>, BrowserError> {
        match self.attach_tab(url).await {
            Ok(session) => Ok(session),
            Err(BrowserError::TabNotFound(_)) => self.open_tab(url).await,
            Err(e) => Err(e),
        }
    }
}
