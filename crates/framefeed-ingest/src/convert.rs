//! Sequential image re-encoding.

use std::io::Cursor;

use framefeed_queue::{ImagePayload, MediaType, WorkItem};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, warn};

use crate::archive::Candidate;
use crate::error::IngestError;

/// A candidate that produced no work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

/// Output of [`ConversionStage::convert_all`].
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub items: Vec<WorkItem>,
    pub skipped: Vec<SkippedCandidate>,
}

impl ConversionReport {
    /// The converted items, or [`IngestError::NothingToImport`] when none survived.
    pub fn into_items(self) -> Result<Vec<WorkItem>, IngestError> {
        if self.items.is_empty() {
            return Err(IngestError::NothingToImport);
        }
        Ok(self.items)
    }
}

/// Re-encodes archive images into queue-ready payloads.
#[derive(Debug, Clone)]
pub struct ConversionStage {
    jpeg_quality: u8,
}

impl Default for ConversionStage {
    fn default() -> Self {
        Self { jpeg_quality: 95 }
    }
}

impl ConversionStage {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Decode one candidate and re-encode it at its natural size as the
    /// type its file name declares.
    pub fn convert(
        &self,
        candidate: &Candidate,
        shared_negative: &str,
    ) -> Result<WorkItem, IngestError> {
        let media_type = MediaType::from_filename(&candidate.name)
            .ok_or_else(|| IngestError::UnsupportedFormat(candidate.name.clone()))?;

        let decoded = image::load_from_memory(&candidate.data).map_err(|e| IngestError::Decode {
            name: candidate.name.clone(),
            message: e.to_string(),
        })?;

        let data = self
            .encode(&decoded, media_type)
            .map_err(|e| IngestError::Encode {
                name: candidate.name.clone(),
                message: e.to_string(),
            })?;

        debug!(
            "Converted {} ({}x{}) to {} bytes of {}",
            candidate.name,
            decoded.width(),
            decoded.height(),
            data.len(),
            media_type
        );

        let negative = candidate.prompt.negative_or(shared_negative);
        Ok(
            WorkItem::new(ImagePayload::new(media_type, data), &candidate.prompt.prompt)
                .with_negative(negative),
        )
    }

    /// Convert candidates strictly one after another, skipping failures.
    pub fn convert_all(&self, candidates: &[Candidate], shared_negative: &str) -> ConversionReport {
        let mut report = ConversionReport::default();

        for candidate in candidates {
            match self.convert(candidate, shared_negative) {
                Ok(item) => report.items.push(item),
                Err(e) => {
                    warn!("Skipping image {} ({}): {}", candidate.index + 1, candidate.name, e);
                    report.skipped.push(SkippedCandidate {
                        index: candidate.index,
                        name: candidate.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Converted {} of {} image(s)",
            report.items.len(),
            candidates.len()
        );
        report
    }

    fn encode(&self, image: &DynamicImage, media_type: MediaType) -> image::ImageResult<Vec<u8>> {
        let mut buffer = Vec::new();
        match media_type {
            MediaType::Jpeg => {
                let mut encoder = JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality);
                encoder.encode_image(&image.to_rgb8())?;
            }
            MediaType::Png => {
                image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
            }
        }
        Ok(buffer)
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
