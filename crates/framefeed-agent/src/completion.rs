//! Completion detection and bulk download once the queue is exhausted.

use framefeed_browser::Page;
use framefeed_config::{TargetProfile, TimingConfig};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::locator::click_located;
use crate::wait::{WaitOutcome, wait_until};

/// What the finalizer managed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinalizeReport {
    /// Progress indicators were seen to clear before downloading.
    pub progress_cleared: bool,
    pub progress_polls: u32,
    pub assets_opened: bool,
    pub selection_mode: bool,
    /// 1-based asset positions that were clicked.
    pub items_selected: Vec<u64>,
    /// 1-based asset positions that could not be found.
    pub items_missing: Vec<u64>,
    pub download_menu: bool,
    pub download_option: bool,
}

impl FinalizeReport {
    /// Every control was found and every expected item selected.
    pub fn is_complete(&self) -> bool {
        self.progress_cleared
            && self.assets_opened
            && self.selection_mode
            && self.items_missing.is_empty()
            && self.download_menu
            && self.download_option
    }
}

/// Waits for the target to finish rendering, then selects and downloads
/// every result of the batch.
pub struct CompletionDetector<'a> {
    page: &'a dyn Page,
    profile: &'a TargetProfile,
    timing: &'a TimingConfig,
}

impl<'a> CompletionDetector<'a> {
    pub fn new(page: &'a dyn Page, profile: &'a TargetProfile, timing: &'a TimingConfig) -> Self {
        Self {
            page,
            profile,
            timing,
        }
    }

    /// Run the whole finalize sequence for a batch of `total_expected` items.
    ///
    /// Missing controls are logged and the sequence carries on, so the
    /// report may show fewer selected items than expected.
    pub async fn run(&self, total_expected: u64) -> FinalizeReport {
        let mut report = FinalizeReport::default();

        info!("All items submitted, waiting for generation to finish");
        match self.wait_for_idle().await {
            WaitOutcome::Ready { attempts, .. } => {
                report.progress_cleared = true;
                report.progress_polls = attempts;
                info!("Generation finished after {} poll(s)", attempts);
            }
            WaitOutcome::TimedOut { attempts } => {
                report.progress_polls = attempts;
                warn!(
                    "Progress indicators still present after {} poll(s), downloading anyway",
                    attempts
                );
            }
        }

        report.assets_opened = click_located(self.page, &self.profile.assets_button).await;
        sleep(self.timing.finalize_step()).await;

        report.selection_mode = click_located(self.page, &self.profile.selection_mode).await;
        sleep(self.timing.finalize_step()).await;

        info!("Selecting {} item(s)", total_expected);
        for index in 1..=total_expected {
            if self.select_item(index).await {
                report.items_selected.push(index);
            } else {
                report.items_missing.push(index);
            }
            sleep(self.timing.item_click()).await;
        }

        sleep(self.timing.menu_step()).await;
        report.download_menu = click_located(self.page, &self.profile.download_menu).await;
        sleep(self.timing.menu_step()).await;
        report.download_option = click_located(self.page, &self.profile.download_option).await;

        if report.is_complete() {
            info!(
                "Download requested for {} item(s)",
                report.items_selected.len()
            );
        } else {
            warn!(
                "Finalize incomplete: {} of {} item(s) selected, download {}",
                report.items_selected.len(),
                total_expected,
                if report.download_option {
                    "requested"
                } else {
                    "not requested"
                }
            );
        }
        report
    }

    async fn wait_for_idle(&self) -> WaitOutcome<()> {
        let selector = self.profile.progress_indicator.as_str();
        wait_until(
            self.timing.progress_poll(),
            self.timing.progress_max_polls,
            || async move {
                match self.page.count(selector).await {
                    Ok(0) => Some(()),
                    Ok(n) => {
                        debug!("{} item(s) still generating", n);
                        None
                    }
                    Err(e) => {
                        warn!("Progress check failed: {}", e);
                        None
                    }
                }
            },
        )
        .await
    }

    async fn select_item(&self, index: u64) -> bool {
        let selector = self.profile.asset_item_selector(index);
        match self.page.query(&selector).await {
            Ok(Some(item)) => match self.page.click(&item).await {
                Ok(()) => {
                    debug!("Selected item {}", index);
                    true
                }
                Err(e) => {
                    warn!("Clicking item {} failed: {}", index, e);
                    false
                }
            },
            Ok(None) => {
                warn!("Could not find item {}", index);
                false
            }
            Err(e) => {
                warn!("Lookup for item {} failed: {}", index, e);
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
