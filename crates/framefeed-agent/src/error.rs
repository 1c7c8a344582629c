//! Agent error types.

use framefeed_browser::PageError;
use framefeed_queue::QueueError;
use thiserror::Error;

/// Failures that stop the agent for this page load.
///
/// Missing elements are not errors; they are logged and the affected step
/// is skipped. Only store failures and a broken page surface here.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Page error: {0}")]
    Page(#[from] PageError),
}

pub type AgentResult<T> = Result<T, AgentError>;
