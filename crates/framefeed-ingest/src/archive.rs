//! ZIP archive ingestion.

use std::io::{Cursor, Read};
use std::path::Path;

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::IngestError;
use crate::naming::{EntryKind, compare_image_names, numeric_key};
use crate::prompt::PromptLine;

/// Resource-fork entries added by macOS archivers.
const MACOS_METADATA_DIR: &str = "__MACOSX/";

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// An image entry read from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveImage {
    pub name: String,
    pub data: Vec<u8>,
}

/// One image paired with its description, ready for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position in the sorted image list.
    pub index: usize,
    pub name: String,
    pub data: Vec<u8>,
    pub prompt: PromptLine,
}

/// Sorted images and descriptions extracted from one archive.
#[derive(Debug, Clone, Default)]
pub struct IngestedArchive {
    pub images: Vec<ArchiveImage>,
    pub descriptions: Vec<String>,
}

impl IngestedArchive {
    pub fn is_mismatched(&self) -> bool {
        self.images.len() != self.descriptions.len()
    }

    /// Pair `images[i]` with `descriptions[i]` from `start_index` up to the
    /// shorter of the two lists.
    pub fn pairs(&self, start_index: usize) -> Vec<Candidate> {
        if self.is_mismatched() {
            warn!(
                "Number of images ({}) does not match number of descriptions ({}); pairing the first {}",
                self.images.len(),
                self.descriptions.len(),
                self.images.len().min(self.descriptions.len())
            );
        }

        self.images
            .iter()
            .zip(&self.descriptions)
            .enumerate()
            .skip(start_index)
            .map(|(index, (image, description))| Candidate {
                index,
                name: image.name.clone(),
                data: image.data.clone(),
                prompt: PromptLine::parse(description),
            })
            .collect()
    }
}

/// Reads a ZIP bundle of images and prompt text files.
pub struct ArchiveIngestor;

impl ArchiveIngestor {
    /// Classify, read and order every entry of the archive.
    pub fn ingest(bytes: &[u8]) -> Result<IngestedArchive, IngestError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut images = Vec::new();
        let mut descriptions = Vec::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();

            if entry.is_dir() || name.starts_with(MACOS_METADATA_DIR) {
                continue;
            }

            match EntryKind::classify(&name) {
                EntryKind::Image => {
                    let mut data = Vec::with_capacity(prealloc_hint(entry.size()));
                    entry.read_to_end(&mut data)?;
                    images.push(ArchiveImage { name, data });
                }
                EntryKind::Text => {
                    let mut raw = Vec::new();
                    entry.read_to_end(&mut raw)?;
                    let before = descriptions.len();
                    descriptions.extend(split_lines(&String::from_utf8_lossy(&raw)));
                    debug!("{}: {} description(s)", name, descriptions.len() - before);
                }
                EntryKind::Other => debug!("Ignoring archive entry {}", name),
            }
        }

        images.sort_by(|a, b| compare_image_names(&a.name, &b.name));

        for image in &images {
            debug!("Image {} (key {:?})", image.name, numeric_key(&image.name));
        }
        info!(
            "Ingested {} image(s) and {} description(s)",
            images.len(),
            descriptions.len()
        );

        Ok(IngestedArchive {
            images,
            descriptions,
        })
    }

    /// Read and ingest an archive from disk.
    pub async fn ingest_file(path: impl AsRef<Path>) -> Result<IngestedArchive, IngestError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Self::ingest(&bytes)
    }
}

/// Non-empty trimmed lines, accepting `\n` and `\r\n`.
/// Entry sizes come from the archive itself and may be forged.
fn prealloc_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}

fn split_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
