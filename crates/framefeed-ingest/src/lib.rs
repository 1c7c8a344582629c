//! # framefeed ingest
//!
//! Turns a ZIP bundle of keyframe images and prompt text files into
//! validated [`WorkItem`](framefeed_queue::WorkItem)s.
//!
//! 1. [`ArchiveIngestor`] classifies entries, sorts images by their numeric
//!    name and splits text files into prompt lines.
//! 2. [`ConversionStage`] re-encodes each paired image, one at a time,
//!    skipping anything that fails to decode.

pub mod archive;
pub mod convert;
pub mod error;
pub mod naming;
pub mod prompt;

pub use archive::{ArchiveImage, ArchiveIngestor, Candidate, IngestedArchive};
pub use convert::{ConversionReport, ConversionStage, SkippedCandidate};
pub use error::IngestError;
pub use naming::{compare_image_names, numeric_key};
pub use prompt::PromptLine;
