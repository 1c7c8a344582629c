//! Fixed names under which the queue lives in the shared store.

/// Continuation record for the item in flight (or the finalize baton).
pub const CURRENT: &str = "framefeed.current";

/// Items still waiting, head first. Excludes the current item.
pub const PENDING_QUEUE: &str = "framefeed.pending_queue";

/// Item count frozen at commit time.
pub const TOTAL_EXPECTED: &str = "framefeed.total_expected";

/// Identity of the committed batch.
pub const BATCH_ID: &str = "framefeed.batch_id";

/// RFC 3339 timestamp of the commit.
pub const COMMITTED_AT: &str = "framefeed.committed_at";

/// Every key owned by the queue.
pub const ALL: [&str; 5] = [CURRENT, PENDING_QUEUE, TOTAL_EXPECTED, BATCH_ID, COMMITTED_AT];
