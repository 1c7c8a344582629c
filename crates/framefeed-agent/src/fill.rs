//! Redundant text entry for framework-bound editable fields.

use framefeed_browser::{ElementHandle, Page, SyntheticEvent};
use serde::Serialize;
use tracing::{debug, warn};

/// Which fill techniques took effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub cleared: bool,
    pub inserted: bool,
    pub replaced: bool,
    pub events_dispatched: usize,
}

impl FillReport {
    /// At least one technique put the text into the field.
    pub fn succeeded(&self) -> bool {
        self.inserted || self.replaced
    }
}

/// Put `text` into `element` using every technique available.
///
/// Runs focus + clear, caret insertion, wholesale replacement and then the
/// synthetic event sequence. A failing technique is logged and the rest
/// still run.
pub async fn fill_text(page: &dyn Page, element: &ElementHandle, text: &str) -> FillReport {
    let mut report = FillReport::default();

    match page.focus(element).await {
        Ok(()) => match page.set_text_content(element, "").await {
            Ok(()) => report.cleared = true,
            Err(e) => warn!("Clearing {} failed: {}", element, e),
        },
        Err(e) => warn!("Focusing {} failed: {}", element, e),
    }

    match page.insert_text(element, text).await {
        Ok(()) => report.inserted = true,
        Err(e) => warn!("Inserting text into {} failed: {}", element, e),
    }

    match page.set_text_content(element, text).await {
        Ok(()) => report.replaced = true,
        Err(e) => warn!("Setting text of {} failed: {}", element, e),
    }

    for event in SyntheticEvent::AFTER_FILL {
        match page.dispatch_event(element, event).await {
            Ok(()) => report.events_dispatched += 1,
            Err(e) => warn!("Dispatching {} on {} failed: {}", event.name(), element, e),
        }
    }

    debug!("Filled {}: {:?}", element, report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use framefeed_browser::testing::{FakeAction, FakeElement, FakePage};

    #[tokio::test]
    async fn test_all_techniques_run_in_order() {
        let page = FakePage::new();
        page.add(FakeElement::new("prompt").matching(".prompt-input").text("stale"));
        let field = ElementHandle::new("prompt");

        let report = fill_text(&page, &field, "a red fox").await;

        assert!(report.succeeded());
        assert!(report.cleared);
        assert_eq!(report.events_dispatched, 4);
        assert_eq!(page.text_of("prompt").as_deref(), Some("a red fox"));

        let actions = page.actions();
        assert_eq!(actions[0], FakeAction::Focus("prompt".into()));
        assert_eq!(actions[1], FakeAction::SetText("prompt".into(), String::new()));
        assert_eq!(
            actions[2],
            FakeAction::InsertText("prompt".into(), "a red fox".into())
        );
        assert_eq!(
            actions[3],
            FakeAction::SetText("prompt".into(), "a red fox".into())
        );
        assert_eq!(
            actions[7],
            FakeAction::Event("prompt".into(), SyntheticEvent::KeyUp)
        );
    }

    #[tokio::test]
    async fn test_failures_are_reported_not_raised() {
        let page = FakePage::new();
        page.add(FakeElement::new("prompt").matching(".prompt-input"))
            .fail_actions_on("prompt");

        let report = fill_text(&page, &ElementHandle::new("prompt"), "text").await;

        assert_eq!(report, FillReport::default());
        assert!(!report.succeeded());
    }
}
