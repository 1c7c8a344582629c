//! Ingestion errors.

use thiserror::Error;

/// Ingestion error types.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The archive could not be opened or read.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File name does not declare a supported image type.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Image bytes could not be decoded.
    #[error("Failed to decode {name}: {message}")]
    Decode { name: String, message: String },

    /// Image could not be re-encoded.
    #[error("Failed to encode {name}: {message}")]
    Encode { name: String, message: String },

    /// Nothing survived ingestion and conversion.
    #[error("Nothing to import")]
    NothingToImport,
}
