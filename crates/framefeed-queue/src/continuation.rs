//! Continuation record handed from one page load to the next.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::WorkItem;

/// What the next page load should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    /// Submit `work_item` to the target form.
    Import,
    /// Queue exhausted; wait for rendering and download the results.
    Finalize,
}

/// The persisted baton read by the agent on every page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub next_step: NextStep,
    #[serde(default)]
    pub work_item: Option<WorkItem>,
    pub batch_id: Uuid,
}

impl Continuation {
    pub fn import(item: WorkItem, batch_id: Uuid) -> Self {
        Self {
            next_step: NextStep::Import,
            work_item: Some(item),
            batch_id,
        }
    }

    pub fn finalize(batch_id: Uuid) -> Self {
        Self {
            next_step: NextStep::Finalize,
            work_item: None,
            batch_id,
        }
    }
}

/// Result of [`WorkQueue::advance`](crate::WorkQueue::advance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The head of the queue is now current.
    Next(WorkItem),
    /// Nothing left; the finalize baton has been written.
    Exhausted,
}
