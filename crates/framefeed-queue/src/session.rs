//! Batch identity and progress.

use uuid::Uuid;

/// A batch's identity and how far the agent has got through it.
///
/// `processed_count` lives only in the agent's memory and is rebuilt from
/// the queue length after every page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSession {
    pub batch_id: Uuid,
    pub total_expected: u64,
    pub processed_count: u64,
}

impl BatchSession {
    pub fn new(total_expected: u64) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            total_expected,
            processed_count: 0,
        }
    }

    /// Rebuild the session on a page load that holds a current item.
    ///
    /// Everything not queued and not current has been processed.
    pub fn recover(batch_id: Uuid, total_expected: u64, remaining: u64) -> Self {
        Self {
            batch_id,
            total_expected,
            processed_count: total_expected.saturating_sub(remaining).saturating_sub(1),
        }
    }

    pub fn record_processed(&mut self) {
        self.processed_count += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.processed_count >= self.total_expected
    }

    /// `processed + remaining - total`. Zero when nothing was lost or double counted.
    pub fn drift(&self, remaining: u64) -> i64 {
        (self.processed_count + remaining) as i64 - self.total_expected as i64
    }
}
