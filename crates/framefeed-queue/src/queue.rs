//! Durable FIFO with a single in-flight "current" slot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::continuation::{Advance, Continuation, NextStep};
use crate::error::QueueError;
use crate::item::{ImagePayload, WorkItem};
use crate::keys;
use crate::session::BatchSession;
use crate::store::KvStore;

/// Item as it sits in the store, before its image is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredItem {
    image: String,
    description: String,
    #[serde(default)]
    negative_description: String,
}

impl From<&WorkItem> for StoredItem {
    fn from(item: &WorkItem) -> Self {
        Self {
            image: item.image.to_data_url(),
            description: item.description.clone(),
            negative_description: item.negative_description.clone(),
        }
    }
}

impl TryFrom<StoredItem> for WorkItem {
    type Error = QueueError;

    fn try_from(stored: StoredItem) -> Result<Self, Self::Error> {
        Ok(WorkItem {
            image: ImagePayload::from_data_url(&stored.image)?,
            description: stored.description,
            negative_description: stored.negative_description,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredContinuation {
    next_step: NextStep,
    #[serde(default)]
    work_item: Option<StoredItem>,
    batch_id: Uuid,
}

/// Point-in-time view of the queue for status reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub batch_id: Option<Uuid>,
    pub total_expected: Option<u64>,
    pub remaining: u64,
    pub next_step: Option<NextStep>,
    pub current_description: Option<String>,
    pub committed_at: Option<DateTime<Utc>>,
}

impl QueueSnapshot {
    pub fn is_idle(&self) -> bool {
        self.next_step.is_none()
    }
}

/// Persistent work queue over a shared [`KvStore`].
///
/// Only one process should mutate the queue at a time; the store offers no
/// transactions across calls.
pub struct WorkQueue {
    store: Arc<dyn KvStore>,
}

impl WorkQueue {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Start a new batch, replacing any previous one.
    ///
    /// `items[0]` becomes current, the rest are queued and the total is
    /// frozen at `items.len()`.
    pub async fn commit(&self, items: Vec<WorkItem>) -> Result<BatchSession, QueueError> {
        let Some((first, rest)) = items.split_first() else {
            return Err(QueueError::EmptyBatch);
        };

        let session = BatchSession::new(items.len() as u64);
        let current = StoredContinuation {
            next_step: NextStep::Import,
            work_item: Some(StoredItem::from(first)),
            batch_id: session.batch_id,
        };
        let pending: Vec<StoredItem> = rest.iter().map(StoredItem::from).collect();

        self.store.remove(&keys::ALL).await?;

        let mut entries = HashMap::new();
        entries.insert(keys::CURRENT.to_string(), serde_json::to_value(&current)?);
        entries.insert(keys::PENDING_QUEUE.to_string(), serde_json::to_value(&pending)?);
        entries.insert(
            keys::TOTAL_EXPECTED.to_string(),
            Value::from(session.total_expected),
        );
        entries.insert(
            keys::BATCH_ID.to_string(),
            Value::String(session.batch_id.to_string()),
        );
        entries.insert(
            keys::COMMITTED_AT.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        self.store.set(entries).await?;

        info!(
            "Committed batch {} with {} item(s)",
            session.batch_id, session.total_expected
        );
        Ok(session)
    }

    /// Finish the current item: promote the queue head, or write the
    /// finalize baton when nothing is left.
    ///
    /// Queued entries whose image no longer validates are dropped.
    pub async fn advance(&self) -> Result<Advance, QueueError> {
        let values = self
            .store
            .get(&[keys::PENDING_QUEUE, keys::BATCH_ID])
            .await?;
        let batch_id = parse_batch_id(values.get(keys::BATCH_ID))?
            .ok_or(QueueError::NoActiveBatch)?;
        let mut pending: Vec<StoredItem> = match values.get(keys::PENDING_QUEUE) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };

        while !pending.is_empty() {
            let head = pending.remove(0);
            let item = match WorkItem::try_from(head.clone()) {
                Ok(item) => item,
                Err(e) => {
                    error!("Dropping queued item '{}': {}", head.description, e);
                    continue;
                }
            };

            let current = StoredContinuation {
                next_step: NextStep::Import,
                work_item: Some(head),
                batch_id,
            };
            let mut entries = HashMap::new();
            entries.insert(keys::CURRENT.to_string(), serde_json::to_value(&current)?);
            entries.insert(keys::PENDING_QUEUE.to_string(), serde_json::to_value(&pending)?);
            self.store.set(entries).await?;

            debug!("Advanced batch {}, {} item(s) left", batch_id, pending.len());
            return Ok(Advance::Next(item));
        }

        let current = StoredContinuation {
            next_step: NextStep::Finalize,
            work_item: None,
            batch_id,
        };
        let mut entries = HashMap::new();
        entries.insert(keys::CURRENT.to_string(), serde_json::to_value(&current)?);
        self.store.set(entries).await?;
        self.store.remove(&[keys::PENDING_QUEUE]).await?;

        info!("Batch {} exhausted", batch_id);
        Ok(Advance::Exhausted)
    }

    /// Number of queued items, excluding current.
    pub async fn peek_remaining_count(&self) -> Result<u64, QueueError> {
        let values = self.store.get(&[keys::PENDING_QUEUE]).await?;
        Ok(match values.get(keys::PENDING_QUEUE) {
            Some(Value::Array(items)) => items.len() as u64,
            Some(_) => {
                return Err(QueueError::Storage(format!(
                    "{} is not an array",
                    keys::PENDING_QUEUE
                )));
            }
            None => 0,
        })
    }

    /// The baton for this page load, or `None` when idle.
    pub async fn continuation(&self) -> Result<Option<Continuation>, QueueError> {
        let Some(stored) = self.stored_continuation().await? else {
            return Ok(None);
        };

        let work_item = stored.work_item.map(WorkItem::try_from).transpose()?;
        Ok(Some(Continuation {
            next_step: stored.next_step,
            work_item,
            batch_id: stored.batch_id,
        }))
    }

    /// The in-flight item, if any.
    pub async fn current(&self) -> Result<Option<WorkItem>, QueueError> {
        Ok(self.continuation().await?.and_then(|c| c.work_item))
    }

    pub async fn total_expected(&self) -> Result<Option<u64>, QueueError> {
        let values = self.store.get(&[keys::TOTAL_EXPECTED]).await?;
        Ok(values.get(keys::TOTAL_EXPECTED).and_then(Value::as_u64))
    }

    pub async fn batch_id(&self) -> Result<Option<Uuid>, QueueError> {
        let values = self.store.get(&[keys::BATCH_ID]).await?;
        parse_batch_id(values.get(keys::BATCH_ID))
    }

    /// Destroy the batch.
    pub async fn clear(&self) -> Result<(), QueueError> {
        self.store.remove(&keys::ALL).await?;
        info!("Cleared work queue");
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<QueueSnapshot, QueueError> {
        let current = self.stored_continuation().await?;
        let committed_at = self
            .store
            .get(&[keys::COMMITTED_AT])
            .await?
            .get(keys::COMMITTED_AT)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(QueueSnapshot {
            batch_id: self.batch_id().await?,
            total_expected: self.total_expected().await?,
            remaining: self.peek_remaining_count().await?,
            next_step: current.as_ref().map(|c| c.next_step),
            current_description: current
                .and_then(|c| c.work_item)
                .map(|item| item.description),
            committed_at,
        })
    }

    async fn stored_continuation(&self) -> Result<Option<StoredContinuation>, QueueError> {
        let values = self.store.get(&[keys::CURRENT]).await?;
        match values.get(keys::CURRENT) {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }
}

fn parse_batch_id(value: Option<&Value>) -> Result<Option<Uuid>, QueueError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|e| QueueError::Storage(format!("Invalid batch id '{}': {}", s, e))),
        Some(other) => Err(QueueError::Storage(format!("Invalid batch id {}", other))),
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
