//! Queue errors.

use thiserror::Error;

/// Queue error types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// A batch must contain at least one item.
    #[error("Cannot commit an empty batch")]
    EmptyBatch,

    /// The store holds no committed batch.
    #[error("No active batch")]
    NoActiveBatch,

    /// Image media type outside the supported set.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Image payload that is not a base64 data URL.
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    /// Backing store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored value has the wrong shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
