//! The import agent: submits one work item per page load.
//!
//! Every page load calls [`ImportAgent::resume`], which reads the persisted
//! continuation and either submits the current item, finalizes the batch,
//! or does nothing. Submitting ends by advancing the queue and reloading the
//! page, so the next load picks up the next item.

use std::sync::Arc;

use framefeed_browser::{ElementHandle, FileUpload, Page};
use framefeed_config::{TargetProfile, TimingConfig};
use framefeed_queue::{
    Advance, BatchSession, Continuation, NextStep, QueueError, WorkItem, WorkQueue,
};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::completion::{CompletionDetector, FinalizeReport};
use crate::error::AgentResult;
use crate::fill::{FillReport, fill_text};
use crate::locator::{Resolve, click_located};
use crate::wait::{WaitOutcome, retry_on_schedule};

/// Steps of a single item's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Init,
    LocatingInput,
    SubmittingImage,
    /// Runs alongside `SubmittingImage`.
    FillingText,
    FillingNegative,
    TriggeringGenerate,
    Advancing,
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AgentState::Init => "init",
            AgentState::LocatingInput => "locating input",
            AgentState::SubmittingImage => "submitting image",
            AgentState::FillingText => "filling prompt",
            AgentState::FillingNegative => "filling negative prompt",
            AgentState::TriggeringGenerate => "triggering generate",
            AgentState::Advancing => "advancing",
        };
        f.write_str(name)
    }
}

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub description: String,
    /// States visited, in order.
    pub states: Vec<AgentState>,
    pub image_attached: bool,
    /// `None` when the prompt field was never filled.
    pub prompt: Option<FillReport>,
    /// `None` when the item has no negative prompt or it could not be filled.
    pub negative: Option<FillReport>,
    pub generate_clicked: bool,
    pub generate_was_disabled: bool,
    /// Skipped without being submitted.
    pub abandoned: bool,
}

impl ItemReport {
    fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            states: Vec::new(),
            image_attached: false,
            prompt: None,
            negative: None,
            generate_clicked: false,
            generate_was_disabled: false,
            abandoned: false,
        }
    }

    fn enter(&mut self, state: AgentState) {
        debug!("Agent state: {}", state);
        self.states.push(state);
    }

    /// Image attached and generate clicked.
    pub fn submitted(&self) -> bool {
        !self.abandoned && self.image_attached && self.generate_clicked
    }
}

/// Result of one [`ImportAgent::resume`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// No batch in the store.
    Idle,
    /// An item was handled and the page reloaded for the next one.
    Reloaded { report: ItemReport },
    /// The batch is done and the queue cleared. `report` is the last item
    /// when it was handled in this same page load.
    Finished {
        report: Option<ItemReport>,
        finalize: FinalizeReport,
    },
}

/// Drives the target page through one work item per page load.
pub struct ImportAgent {
    page: Arc<dyn Page>,
    queue: Arc<WorkQueue>,
    profile: TargetProfile,
    timing: TimingConfig,
}

impl ImportAgent {
    pub fn new(
        page: Arc<dyn Page>,
        queue: Arc<WorkQueue>,
        profile: TargetProfile,
        timing: TimingConfig,
    ) -> Self {
        Self {
            page,
            queue,
            profile,
            timing,
        }
    }

    pub fn page(&self) -> &Arc<dyn Page> {
        &self.page
    }

    pub fn queue(&self) -> &Arc<WorkQueue> {
        &self.queue
    }

    /// Entry point for every page load.
    pub async fn resume(&self) -> AgentResult<ResumeOutcome> {
        let continuation = match self.queue.continuation().await {
            Ok(Some(continuation)) => continuation,
            Ok(None) => {
                info!("No batch in progress");
                return Ok(ResumeOutcome::Idle);
            }
            Err(e @ (QueueError::UnsupportedFormat(_) | QueueError::InvalidPayload(_))) => {
                return self.abandon_corrupt(e).await;
            }
            Err(e) => return Err(e.into()),
        };

        let Continuation {
            next_step,
            work_item,
            batch_id,
        } = continuation;

        match (next_step, work_item) {
            (NextStep::Finalize, _) => {
                let total = self.queue.total_expected().await?.unwrap_or(0);
                info!("Resuming finalize for batch {}", batch_id);
                let finalize = self.finalize(total).await?;
                Ok(ResumeOutcome::Finished {
                    report: None,
                    finalize,
                })
            }
            (NextStep::Import, Some(item)) => {
                let session = self.recover_session(batch_id).await?;
                self.import(item, session).await
            }
            (NextStep::Import, None) => {
                warn!("Import step for batch {} has no item, skipping", batch_id);
                let session = self.recover_session(batch_id).await?;
                let mut report = ItemReport::new("");
                report.abandoned = true;
                report.enter(AgentState::Advancing);
                self.advance(session, report).await
            }
        }
    }

    async fn recover_session(&self, batch_id: Uuid) -> AgentResult<BatchSession> {
        let total = self.queue.total_expected().await?.unwrap_or(0);
        let remaining = self.queue.peek_remaining_count().await?;
        Ok(BatchSession::recover(batch_id, total, remaining))
    }

    async fn abandon_corrupt(&self, e: QueueError) -> AgentResult<ResumeOutcome> {
        error!("Current item is unreadable, abandoning it: {}", e);
        let batch_id = self.queue.batch_id().await?.ok_or(QueueError::NoActiveBatch)?;
        let session = self.recover_session(batch_id).await?;
        let mut report = ItemReport::new("");
        report.abandoned = true;
        report.enter(AgentState::Advancing);
        self.advance(session, report).await
    }

    async fn import(&self, item: WorkItem, session: BatchSession) -> AgentResult<ResumeOutcome> {
        let mut report = ItemReport::new(item.description.clone());
        info!(
            "Importing item {}/{} of batch {}: {}",
            session.processed_count + 1,
            session.total_expected,
            session.batch_id,
            preview(&item.description)
        );

        report.enter(AgentState::Init);
        sleep(self.timing.initial_settle()).await;

        report.enter(AgentState::LocatingInput);
        let Some(input) = self.profile.file_input.resolve(self.page.as_ref()).await.into_element()
        else {
            error!("Could not find {}, abandoning item", self.profile.file_input.name);
            report.abandoned = true;
            report.enter(AgentState::Advancing);
            return self.advance(session, report).await;
        };

        report.enter(AgentState::SubmittingImage);
        let upload = FileUpload {
            name: format!("imported-image.{}", item.image.media_type().extension()),
            media_type: item.image.media_type().mime().to_string(),
            data: item.image.data().to_vec(),
        };
        report.enter(AgentState::FillingText);
        let (attached, prompt) = tokio::join!(
            self.attach(&input, &upload),
            self.fill_prompt(&item.description)
        );
        report.image_attached = attached;
        report.prompt = prompt;
        sleep(self.timing.upload_settle()).await;

        if item.has_negative() {
            report.enter(AgentState::FillingNegative);
            report.negative = self.fill_negative(&item.negative_description).await;
        }

        report.enter(AgentState::TriggeringGenerate);
        self.generate(&mut report).await;
        sleep(self.timing.post_generate()).await;

        report.enter(AgentState::Advancing);
        self.advance(session, report).await
    }

    async fn attach(&self, input: &ElementHandle, upload: &FileUpload) -> bool {
        match self.page.attach_file(input, upload).await {
            Ok(()) => {
                info!("Image upload initiated ({} bytes)", upload.data.len());
                true
            }
            Err(e) => {
                error!("Attaching image failed: {}", e);
                false
            }
        }
    }

    /// Retry the prompt field on the configured schedule until a fill
    /// takes. The field often renders after the upload starts.
    async fn fill_prompt(&self, description: &str) -> Option<FillReport> {
        let page = self.page.as_ref();
        let cascade = &self.profile.prompt_field;
        let outcome = retry_on_schedule(&self.timing.prompt_retry(), || async move {
            let field = cascade.resolve(page).await.into_element()?;
            let report = fill_text(page, &field, description).await;
            report.succeeded().then_some(report)
        })
        .await;

        match outcome {
            WaitOutcome::Ready { value, attempts } => {
                debug!("Filled {} on attempt {}", cascade.name, attempts);
                Some(value)
            }
            WaitOutcome::TimedOut { attempts } => {
                error!("Could not fill {} after {} attempt(s)", cascade.name, attempts);
                None
            }
        }
    }

    async fn fill_negative(&self, text: &str) -> Option<FillReport> {
        if !click_located(self.page.as_ref(), &self.profile.negative_toggle).await {
            return None;
        }
        sleep(self.timing.negative_reveal()).await;

        let field = self
            .profile
            .negative_field
            .resolve(self.page.as_ref())
            .await
            .into_element();
        let Some(field) = field else {
            error!("Could not find {}", self.profile.negative_field.name);
            return None;
        };
        Some(fill_text(self.page.as_ref(), &field, text).await)
    }

    async fn generate(&self, report: &mut ItemReport) {
        let cascade = &self.profile.generate_button;
        let Some(button) = cascade.resolve(self.page.as_ref()).await.into_element() else {
            error!("Could not find {}", cascade.name);
            return;
        };

        match self.page.is_disabled(&button).await {
            Ok(true) => {
                warn!("{} looks disabled, clicking anyway", cascade.name);
                report.generate_was_disabled = true;
            }
            Ok(false) => {}
            Err(e) => debug!("Could not read state of {}: {}", cascade.name, e),
        }

        match self.page.click(&button).await {
            Ok(()) => {
                info!("Clicked {}", cascade.name);
                report.generate_clicked = true;
            }
            Err(e) => error!("Clicking {} failed: {}", cascade.name, e),
        }
    }

    /// Promote the next item and reload, or finalize in place when the
    /// queue is exhausted.
    async fn advance(
        &self,
        mut session: BatchSession,
        report: ItemReport,
    ) -> AgentResult<ResumeOutcome> {
        session.record_processed();
        info!(
            "Finished item {}/{}{}",
            session.processed_count,
            session.total_expected,
            if report.abandoned { " (abandoned)" } else { "" }
        );

        match self.queue.advance().await? {
            Advance::Next(next) => {
                let remaining = self.queue.peek_remaining_count().await?;
                let drift = session.drift(remaining + 1);
                if drift != 0 {
                    warn!(
                        "Batch {} counts are off by {} ({} processed, {} outstanding, {} expected)",
                        session.batch_id,
                        drift,
                        session.processed_count,
                        remaining + 1,
                        session.total_expected
                    );
                }
                debug!(
                    "Next: {} ({} queued after it)",
                    preview(&next.description),
                    remaining
                );

                sleep(self.timing.before_next()).await;
                if let Some(cascade) = &self.profile.new_upload {
                    click_located(self.page.as_ref(), cascade).await;
                }
                self.page.reload().await?;
                Ok(ResumeOutcome::Reloaded { report })
            }
            Advance::Exhausted => {
                let finalize = self.finalize(session.total_expected).await?;
                Ok(ResumeOutcome::Finished {
                    report: Some(report),
                    finalize,
                })
            }
        }
    }

    /// Run the completion detector, then destroy the batch.
    ///
    /// The finalize continuation stays in the store until the download has
    /// been requested, so a reload during the wait resumes here.
    async fn finalize(&self, total_expected: u64) -> AgentResult<FinalizeReport> {
        let report = CompletionDetector::new(self.page.as_ref(), &self.profile, &self.timing)
            .run(total_expected)
            .await;
        self.queue.clear().await?;
        Ok(report)
    }
}

/// First 50 characters, for logs.
fn preview(text: &str) -> String {
    const LIMIT: usize = 50;
    match text.char_indices().nth(LIMIT) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
