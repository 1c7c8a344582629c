//! # framefeed agent
//!
//! Page-driven import of a committed batch.
//!
//! - [`ImportAgent`]: one work item per page load, resumed from the
//!   persisted continuation
//! - [`CompletionDetector`]: waits for rendering to finish, then selects
//!   and downloads the results
//! - [`BatchRunner`]: loops the agent across reloads until the batch ends
//! - [`wait_until`] / [`retry_on_schedule`]: polling with explicit outcomes
//! - [`Resolve`]: ranked locator cascades against a [`Page`](framefeed_browser::Page)

pub mod agent;
pub mod completion;
pub mod error;
pub mod fill;
pub mod locator;
pub mod runner;
pub mod wait;

#[cfg(test)]
mod test_support;

pub use agent::{AgentState, ImportAgent, ItemReport, ResumeOutcome};
pub use completion::{CompletionDetector, FinalizeReport};
pub use error::{AgentError, AgentResult};
pub use fill::{FillReport, fill_text};
pub use locator::{Located, Resolve, click_located, locate};
pub use runner::{BatchRunner, RunSummary};
pub use wait::{WaitOutcome, retry_on_schedule, wait_until};
