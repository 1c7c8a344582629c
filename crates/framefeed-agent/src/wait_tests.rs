use super::*;

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};

fn counter() -> Arc<AtomicU32> {
    Arc::new(AtomicU32::new(0))
}

#[tokio::test(start_paused = true)]
async fn test_ready_on_first_probe() {
    let outcome = wait_until(Duration::from_secs(5), Some(3), || async { Some(7) }).await;
    assert_eq!(outcome, WaitOutcome::Ready { value: 7, attempts: 1 });
}

#[tokio::test(start_paused = true)]
async fn test_ready_after_several_polls() {
    let calls = counter();
    let start = Instant::now();

    let outcome = wait_until(Duration::from_secs(5), None, || {
        let calls = calls.clone();
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            (n == 3).then_some(n)
        }
    })
    .await;

    assert_eq!(outcome.attempts(), 3);
    assert_eq!(outcome.into_value(), Some(3));
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_times_out_at_max_attempts() {
    let calls = counter();
    let outcome: WaitOutcome<()> = wait_until(Duration::from_millis(100), Some(4), || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            None
        }
    })
    .await;

    assert!(!outcome.is_ready());
    assert_eq!(outcome, WaitOutcome::TimedOut { attempts: 4 });
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_zero_max_attempts_probes_once() {
    let outcome: WaitOutcome<()> = wait_until(Duration::from_secs(1), Some(0), || async { None }).await;
    assert_eq!(outcome, WaitOutcome::TimedOut { attempts: 1 });
}

#[tokio::test(start_paused = true)]
async fn test_schedule_offsets_are_cumulative() {
    let start = Instant::now();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let outcome: WaitOutcome<()> = retry_on_schedule(
        &[
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4),
        ],
        || {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(start.elapsed());
                None
            }
        },
    )
    .await;

    assert_eq!(outcome.attempts(), 4);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_schedule_stops_at_first_success() {
    let calls = counter();
    let outcome = retry_on_schedule(
        &[Duration::ZERO, Duration::from_secs(1), Duration::from_secs(2)],
        || {
            let calls = calls.clone();
            async move { (calls.fetch_add(1, Ordering::SeqCst) == 1).then_some("field") }
        },
    )
    .await;

    assert_eq!(outcome, WaitOutcome::Ready { value: "field", attempts: 2 });
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_schedule_probes_once() {
    let calls = counter();
    let outcome: WaitOutcome<()> = retry_on_schedule(&[], || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            None
        }
    })
    .await;
    assert_eq!(outcome.attempts(), 1);
}
