//! Input operations for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Insert text at the focused element, as an IME commit would.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Inserted {} characters", text.chars().count());
        Ok(())
    }
}
