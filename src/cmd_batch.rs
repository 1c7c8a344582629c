//! Batch subcommand handlers: inspect, commit, status, clear.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use framefeed_config::Config;
use framefeed_ingest::{ArchiveIngestor, ConversionStage};
use framefeed_queue::{BatchSession, FileKvStore, WorkQueue};

/// Store file from `--store`, falling back to the config.
pub(crate) fn store_path(flag: Option<&Path>, config: &Config) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => config.store.resolved_path(),
    }
}

pub(crate) async fn open_queue(path: &Path) -> Result<Arc<WorkQueue>, Box<dyn std::error::Error>> {
    let store = FileKvStore::new(path).await?;
    Ok(Arc::new(WorkQueue::new(Arc::new(store))))
}

/// Print what an archive would produce without converting anything.
pub(crate) async fn inspect(
    archive: &Path,
    start_index: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let ingested = ArchiveIngestor::ingest_file(archive).await?;

    println!("Archive:      {}", archive.display());
    println!("Images:       {}", ingested.images.len());
    println!("Descriptions: {}", ingested.descriptions.len());
    if ingested.is_mismatched() {
        println!(
            "Warning: counts differ, only the first {} pair(s) line up",
            ingested.images.len().min(ingested.descriptions.len())
        );
    }
    println!();

    println!("{:<6} {:<30} {}", "#", "IMAGE", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for candidate in ingested.pairs(start_index) {
        let negative = match &candidate.prompt.negative {
            Some(negative) => format!("  [negative: {}]", negative),
            None => String::new(),
        };
        println!(
            "{:<6} {:<30} {}{}",
            candidate.index + 1,
            candidate.name,
            candidate.prompt.prompt,
            negative
        );
    }

    Ok(())
}

/// Ingest, convert and commit an archive as the new batch.
pub(crate) async fn commit(
    config: &Config,
    queue: &WorkQueue,
    archive: &Path,
    negative: Option<&str>,
    start_index: usize,
) -> Result<BatchSession, Box<dyn std::error::Error>> {
    let ingested = ArchiveIngestor::ingest_file(archive).await?;
    let candidates = ingested.pairs(start_index);
    info!(
        "Read {} image(s) and {} description(s) from {}, {} candidate(s) from index {}",
        ingested.images.len(),
        ingested.descriptions.len(),
        archive.display(),
        candidates.len(),
        start_index
    );

    let shared_negative = negative.unwrap_or(config.ingest.negative_prompt.as_str());
    let stage = ConversionStage::new(config.ingest.jpeg_quality);
    let report = stage.convert_all(&candidates, shared_negative);

    for skipped in &report.skipped {
        println!(
            "Skipped image {} ({}): {}",
            skipped.index + 1,
            skipped.name,
            skipped.reason
        );
    }

    let items = match report.into_items() {
        Ok(items) => items,
        Err(e) => {
            eprintln!(
                "Nothing to import: no image in {} could be converted",
                archive.display()
            );
            return Err(e.into());
        }
    };
    let previous = queue.snapshot().await?;
    if !previous.is_idle() {
        warn!(
            "Replacing unfinished batch with {} item(s) left",
            previous.remaining
        );
    }

    let session = queue.commit(items).await?;
    println!(
        "Committed batch {} with {} item(s)",
        session.batch_id, session.total_expected
    );
    Ok(session)
}

/// Show the current batch.
pub(crate) async fn status(queue: &WorkQueue, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = queue.snapshot().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let Some(batch_id) = snapshot.batch_id else {
        println!("No batch in progress.");
        return Ok(());
    };

    println!("Batch:       {}", batch_id);
    if let Some(committed_at) = snapshot.committed_at {
        println!("Committed:   {}", committed_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(total) = snapshot.total_expected {
        println!("Total:       {}", total);
    }
    println!("Queued:      {}", snapshot.remaining);
    match snapshot.next_step {
        Some(step) => println!("Next step:   {:?}", step),
        None => println!("Next step:   none"),
    }
    if let Some(description) = snapshot.current_description {
        println!("Current:     {}", description);
    }

    Ok(())
}

pub(crate) async fn clear(queue: &WorkQueue) -> Result<(), Box<dyn std::error::Error>> {
    queue.clear().await?;
    println!("Cleared batch.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_flag_wins() {
        let config = Config::default();
        let path = store_path(Some(Path::new("/tmp/x.json")), &config);
        assert_eq!(path, PathBuf::from("/tmp/x.json"));
        assert!(store_path(None, &config).ends_with("store.json"));
    }

    #[tokio::test]
    async fn test_status_and_clear_on_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let queue = open_queue(&dir.path().join("store.json")).await.unwrap();

        status(&queue, "table").await.unwrap();
        status(&queue, "json").await.unwrap();
        clear(&queue).await.unwrap();
        assert!(queue.snapshot().await.unwrap().is_idle());
    }

    #[tokio::test]
    async fn test_commit_rejects_non_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("frames.zip");
        std::fs::write(&archive, b"not a zip").unwrap();
        let queue = open_queue(&dir.path().join("store.json")).await.unwrap();

        let result = commit(&Config::default(), &queue, &archive, None, 0).await;
        assert!(result.is_err());
        assert!(queue.snapshot().await.unwrap().is_idle());
    }
}
