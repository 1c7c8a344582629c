//! # framefeed queue
//!
//! Durable FIFO of work items shared between the controlling CLI and the
//! automation runner.
//!
//! ## Features
//!
//! - Work items carrying a validated image payload
//! - Pluggable key-value store (in-memory or JSON file)
//! - One in-flight "current" item plus a persisted continuation record
//! - Batch identity with processed-count tracking

pub mod continuation;
pub mod error;
pub mod item;
pub mod keys;
pub mod queue;
pub mod session;
pub mod store;

pub use continuation::{Advance, Continuation, NextStep};
pub use error::QueueError;
pub use item::{ImagePayload, MediaType, WorkItem};
pub use queue::{QueueSnapshot, WorkQueue};
pub use session::BatchSession;
pub use store::{FileKvStore, KvStore, MemoryKvStore};
