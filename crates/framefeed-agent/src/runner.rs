//! Drives a batch across page loads until it finishes.

use std::sync::Arc;

use framefeed_browser::Page;
use framefeed_config::{TargetProfile, TimingConfig};
use framefeed_queue::WorkQueue;
use serde::Serialize;
use tracing::info;

use crate::agent::{ImportAgent, ItemReport, ResumeOutcome};
use crate::completion::FinalizeReport;
use crate::error::AgentResult;

/// Everything that happened during [`BatchRunner::run`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of `resume()` calls, one per page load.
    pub page_loads: u32,
    pub items: Vec<ItemReport>,
    /// `None` when the run ended idle without finalizing.
    pub finalize: Option<FinalizeReport>,
}

impl RunSummary {
    pub fn submitted(&self) -> usize {
        self.items.iter().filter(|r| r.submitted()).count()
    }

    pub fn abandoned(&self) -> usize {
        self.items.iter().filter(|r| r.abandoned).count()
    }

    pub fn is_finished(&self) -> bool {
        self.finalize.is_some()
    }
}

/// Calls [`ImportAgent::resume`] after every reload the agent triggers.
pub struct BatchRunner {
    agent: ImportAgent,
}

impl BatchRunner {
    pub fn new(
        page: Arc<dyn Page>,
        queue: Arc<WorkQueue>,
        profile: TargetProfile,
        timing: TimingConfig,
    ) -> Self {
        Self {
            agent: ImportAgent::new(page, queue, profile, timing),
        }
    }

    pub fn agent(&self) -> &ImportAgent {
        &self.agent
    }

    pub async fn run(&self) -> AgentResult<RunSummary> {
        let mut summary = RunSummary::default();

        loop {
            summary.page_loads += 1;
            match self.agent.resume().await? {
                ResumeOutcome::Idle => break,
                ResumeOutcome::Reloaded { report } => summary.items.push(report),
                ResumeOutcome::Finished { report, finalize } => {
                    summary.items.extend(report);
                    summary.finalize = Some(finalize);
                    break;
                }
            }
        }

        info!(
            "Run ended after {} page load(s): {} submitted, {} abandoned",
            summary.page_loads,
            summary.submitted(),
            summary.abandoned()
        );
        Ok(summary)
    }
}
