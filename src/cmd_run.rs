//! Run subcommand: drive the committed batch in a Chrome tab.

use std::sync::Arc;

use tracing::{info, warn};

use framefeed_agent::{BatchRunner, RunSummary};
use framefeed_browser::{BrowserManager, BrowserManagerConfig, CdpPage, Page};
use framefeed_config::Config;
use framefeed_queue::WorkQueue;

pub(crate) fn browser_config(config: &Config) -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: config.browser.debug_port,
        profile_dir: config.browser.profile_dir.clone(),
        headless: config.browser.headless,
    }
}

/// Open (or attach to) the target tab and run the batch until it finishes.
///
/// Chrome is left running so downloads started by the finalizer can
/// complete.
pub(crate) async fn run(
    config: &Config,
    queue: Arc<WorkQueue>,
    attach: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if queue.snapshot().await?.is_idle() {
        println!("No batch in progress. Commit an archive first.");
        return Ok(());
    }

    let manager = BrowserManager::new(browser_config(config));
    let url = config.target.url.as_str();
    let session = if attach {
        manager.attach_or_open(url).await?
    } else {
        manager.open_tab(url).await?
    };
    let page: Arc<dyn Page> = Arc::new(CdpPage::new(session));

    info!("Driving batch on {}", url);
    let runner = BatchRunner::new(
        page,
        queue,
        config.target.clone(),
        config.timing.clone(),
    );

    tokio::select! {
        result = runner.run() => print_summary(&result?),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, the batch resumes from the current item on the next run");
        }
    }

    manager.close().await?;
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Page loads:  {}", summary.page_loads);
    println!("Submitted:   {}", summary.submitted());
    println!("Abandoned:   {}", summary.abandoned());

    let Some(finalize) = &summary.finalize else {
        println!("Batch not finished.");
        return;
    };

    println!(
        "Selected:    {} (missing: {})",
        finalize.items_selected.len(),
        if finalize.items_missing.is_empty() {
            "none".to_string()
        } else {
            finalize
                .items_missing
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    );
    if finalize.download_option {
        println!("Download requested.");
    } else {
        println!("Download was not requested; finish it by hand in the asset library.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_from_config() {
        let mut config = Config::default();
        config.browser.debug_port = 9333;
        config.browser.headless = true;

        let browser = browser_config(&config);
        assert_eq!(browser.debug_port, 9333);
        assert!(browser.headless);
        assert_eq!(browser.endpoint(), "http://localhost:9333");
    }
}
