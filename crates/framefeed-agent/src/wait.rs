//! Polling primitives that tell "found after N tries" apart from "gave up".

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Result of a bounded wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    Ready { value: T, attempts: u32 },
    TimedOut { attempts: u32 },
}

impl<T> WaitOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaitOutcome::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            WaitOutcome::Ready { attempts, .. } | WaitOutcome::TimedOut { attempts } => *attempts,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            WaitOutcome::Ready { value, .. } => Some(value),
            WaitOutcome::TimedOut { .. } => None,
        }
    }
}

/// Probe now, then every `interval`, until `probe` yields a value.
///
/// `max_attempts = None` polls forever. `Some(0)` still probes once.
pub async fn wait_until<T, F, Fut>(
    interval: Duration,
    max_attempts: Option<u32>,
    mut probe: F,
) -> WaitOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if let Some(value) = probe().await {
            return WaitOutcome::Ready { value, attempts };
        }
        if max_attempts.is_some_and(|max| attempts >= max) {
            return WaitOutcome::TimedOut { attempts };
        }
        tokio::time::sleep(interval).await;
    }
}

/// Probe at each offset from the start of the call, stopping at the first
/// success. Offsets are cumulative: `[0, 1s, 2s, 4s]` tries four times
/// within four seconds. An empty schedule probes once, immediately.
pub async fn retry_on_schedule<T, F, Fut>(offsets: &[Duration], mut probe: F) -> WaitOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let offsets = if offsets.is_empty() {
        &[Duration::ZERO][..]
    } else {
        offsets
    };

    let start = Instant::now();
    let mut attempts = 0u32;
    for offset in offsets {
        tokio::time::sleep_until(start + *offset).await;
        attempts += 1;
        if let Some(value) = probe().await {
            return WaitOutcome::Ready { value, attempts };
        }
    }
    WaitOutcome::TimedOut { attempts }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
