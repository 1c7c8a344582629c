//! Element-level page surface used by the import agent.
//!
//! Every lookup can come back empty and every action can fail; callers are
//! expected to log and carry on rather than abort.

use async_trait::async_trait;
use thiserror::Error;

use crate::cdp::CdpError;

/// Opaque reference to an element, valid until the next reload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Events dispatched to nudge framework bindings after a programmatic edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticEvent {
    Input,
    Change,
    KeyDown,
    KeyUp,
}

impl SyntheticEvent {
    /// Sequence fired after filling a text field.
    pub const AFTER_FILL: [SyntheticEvent; 4] = [
        SyntheticEvent::Input,
        SyntheticEvent::Change,
        SyntheticEvent::KeyDown,
        SyntheticEvent::KeyUp,
    ];

    /// DOM event type name.
    pub fn name(&self) -> &'static str {
        match self {
            SyntheticEvent::Input => "input",
            SyntheticEvent::Change => "change",
            SyntheticEvent::KeyDown => "keydown",
            SyntheticEvent::KeyUp => "keyup",
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, SyntheticEvent::KeyDown | SyntheticEvent::KeyUp)
    }
}

/// A file handed to an `<input type="file">` as if the user picked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Page operation errors.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Cdp(#[from] CdpError),

    /// The handle no longer refers to a live element.
    #[error("Stale element handle: {0}")]
    StaleElement(String),

    /// In-page script failed or returned something unexpected.
    #[error("Script failed: {0}")]
    Script(String),
}

/// The page the agent drives.
#[async_trait]
pub trait Page: Send + Sync {
    /// First element matching `selector`.
    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, PageError>;

    /// Every element matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError>;

    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, PageError>;

    /// First descendant of `element` matching `selector`.
    async fn query_within(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementHandle>, PageError>;

    /// Nearest inclusive ancestor of `element` matching `selector`.
    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementHandle>, PageError>;

    async fn text_content(&self, element: &ElementHandle) -> Result<String, PageError>;

    /// True when the element looks disabled (attribute, ARIA or class).
    async fn is_disabled(&self, element: &ElementHandle) -> Result<bool, PageError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError>;

    async fn focus(&self, element: &ElementHandle) -> Result<(), PageError>;

    /// Replace the element's content wholesale.
    async fn set_text_content(&self, element: &ElementHandle, text: &str) -> Result<(), PageError>;

    /// Focus the element and insert `text` at the caret, as typing would.
    async fn insert_text(&self, element: &ElementHandle, text: &str) -> Result<(), PageError>;

    async fn dispatch_event(
        &self,
        element: &ElementHandle,
        event: SyntheticEvent,
    ) -> Result<(), PageError>;

    /// Set a synthetic file selection on a file input and fire `change`.
    async fn attach_file(&self, element: &ElementHandle, file: &FileUpload) -> Result<(), PageError>;

    /// Reload and wait for the new document.
    async fn reload(&self) -> Result<(), PageError>;
}
