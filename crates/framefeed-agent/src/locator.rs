//! Resolving ranked locator cascades against a [`Page`].

use async_trait::async_trait;
use framefeed_browser::{ElementHandle, Page, PageError};
use framefeed_config::{Locator, LocatorCascade};
use tracing::{debug, error, warn};

/// Outcome of resolving a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// `strategy` is the index of the locator that matched.
    Found {
        element: ElementHandle,
        strategy: usize,
    },
    NotFound,
}

impl Located {
    pub fn is_found(&self) -> bool {
        matches!(self, Located::Found { .. })
    }

    pub fn into_element(self) -> Option<ElementHandle> {
        match self {
            Located::Found { element, .. } => Some(element),
            Located::NotFound => None,
        }
    }
}

/// Run a single strategy.
pub async fn locate(page: &dyn Page, locator: &Locator) -> Result<Option<ElementHandle>, PageError> {
    match locator {
        Locator::Css { selector } => page.query(selector).await,

        Locator::CssWithText { selector, text } => {
            for element in page.query_all(selector).await? {
                if page.text_content(&element).await?.contains(text.as_str()) {
                    return Ok(Some(element));
                }
            }
            Ok(None)
        }

        Locator::Within { ancestor, selector } => match page.query(ancestor).await? {
            Some(parent) => page.query_within(&parent, selector).await,
            None => Ok(None),
        },

        Locator::Closest {
            selector,
            ancestor,
            text,
        } => {
            for element in page.query_all(selector).await? {
                if let Some(text) = text {
                    if !page.text_content(&element).await?.contains(text.as_str()) {
                        continue;
                    }
                }
                if let Some(found) = page.closest(&element, ancestor).await? {
                    return Ok(Some(found));
                }
            }
            Ok(None)
        }
    }
}

/// Try each strategy of a cascade in rank order.
#[async_trait]
pub trait Resolve {
    async fn resolve(&self, page: &dyn Page) -> Located;
}

#[async_trait]
impl Resolve for LocatorCascade {
    async fn resolve(&self, page: &dyn Page) -> Located {
        for (strategy, locator) in self.strategies.iter().enumerate() {
            match locate(page, locator).await {
                Ok(Some(element)) => {
                    debug!("Found {} with strategy {}", self.name, strategy);
                    return Located::Found { element, strategy };
                }
                Ok(None) => {}
                Err(e) => warn!("Lookup for {} (strategy {}) failed: {}", self.name, strategy, e),
            }
        }
        debug!("No strategy found {}", self.name);
        Located::NotFound
    }
}

/// Resolve `cascade` and click the match. Failures are logged.
pub async fn click_located(page: &dyn Page, cascade: &LocatorCascade) -> bool {
    let Some(element) = cascade.resolve(page).await.into_element() else {
        error!("Could not find {}", cascade.name);
        return false;
    };
    match page.click(&element).await {
        Ok(()) => {
            debug!("Clicked {}", cascade.name);
            true
        }
        Err(e) => {
            error!("Clicking {} failed: {}", cascade.name, e);
            false
        }
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
