use super::*;

use std::collections::HashMap;
use std::time::Duration;

use framefeed_browser::testing::{FakeAction, FakeElement, FakePage};
use framefeed_queue::{KvStore, MemoryKvStore, keys};
use serde_json::json;
use tokio::time::Instant;

use crate::test_support::{add_library, form_page, item, memory_queue, profile};

fn agent(page: &Arc<FakePage>, queue: &Arc<WorkQueue>, timing: TimingConfig) -> ImportAgent {
    ImportAgent::new(page.clone(), queue.clone(), profile(), timing)
}

fn full_page(assets: u64) -> Arc<FakePage> {
    let page = form_page();
    add_library(&page, assets);
    Arc::new(page)
}

#[tokio::test]
async fn test_idle_without_batch() {
    let page = full_page(0);
    let queue = memory_queue();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    assert_eq!(outcome, ResumeOutcome::Idle);
    assert!(page.actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_single_item_submits_then_finalizes_in_place() {
    let page = full_page(1);
    let queue = memory_queue();
    queue.commit(vec![item("a misty harbour")]).await.unwrap();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    let ResumeOutcome::Finished {
        report: Some(report),
        finalize,
    } = outcome
    else {
        panic!("expected finish");
    };
    assert_eq!(
        report.states,
        vec![
            AgentState::Init,
            AgentState::LocatingInput,
            AgentState::SubmittingImage,
            AgentState::FillingText,
            AgentState::TriggeringGenerate,
            AgentState::Advancing,
        ]
    );
    assert!(report.submitted());
    assert!(report.prompt.as_ref().is_some_and(FillReport::succeeded));
    assert_eq!(report.negative, None);
    assert!(finalize.is_complete());

    let upload = page.attached("file").unwrap();
    assert_eq!(upload.name, "imported-image.png");
    assert_eq!(upload.media_type, "image/png");
    assert_eq!(page.text_of("prompt").as_deref(), Some("a misty harbour"));

    assert_eq!(page.reloads(), 0);
    assert!(queue.snapshot().await.unwrap().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_more_items_reload_after_new_upload_click() {
    let page = full_page(0);
    let queue = memory_queue();
    queue.commit(vec![item("first"), item("second")]).await.unwrap();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    assert!(matches!(outcome, ResumeOutcome::Reloaded { .. }));
    let actions = page.actions();
    let n = actions.len();
    assert_eq!(actions[n - 2], FakeAction::Click("new-upload".into()));
    assert_eq!(actions[n - 1], FakeAction::Reload);

    assert_eq!(queue.current().await.unwrap().unwrap().description, "second");
    assert_eq!(queue.peek_remaining_count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_negative_prompt_revealed_and_filled() {
    let page = full_page(1);
    let queue = memory_queue();
    queue
        .commit(vec![item("city at night").with_negative("blurry, text")])
        .await
        .unwrap();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    let ResumeOutcome::Finished { report: Some(report), .. } = outcome else {
        panic!("expected finish");
    };
    assert!(report.states.contains(&AgentState::FillingNegative));
    assert!(report.negative.as_ref().is_some_and(FillReport::succeeded));
    assert_eq!(page.text_of("negative").as_deref(), Some("blurry, text"));

    let clicks = page.clicks();
    let toggle = clicks.iter().position(|c| c == "negative-toggle").unwrap();
    let generate = clicks.iter().position(|c| c == "generate").unwrap();
    assert!(toggle < generate);
}

#[tokio::test(start_paused = true)]
async fn test_missing_negative_toggle_still_generates() {
    let page = Arc::new(FakePage::new());
    page.add(FakeElement::new("file").matching("input[type=file]"))
        .add(FakeElement::new("prompt").matching(".prompt-input"))
        .add(FakeElement::new("generate").matching("button").text("Generate"));
    let queue = memory_queue();
    queue
        .commit(vec![item("x").with_negative("y"), item("z")])
        .await
        .unwrap();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    let ResumeOutcome::Reloaded { report } = outcome else {
        panic!("expected reload");
    };
    assert_eq!(report.negative, None);
    assert!(report.generate_clicked);
}

#[tokio::test(start_paused = true)]
async fn test_missing_file_input_abandons_item_and_advances() {
    let page = Arc::new(FakePage::new());
    page.add(FakeElement::new("generate").matching("button").text("Generate"));
    let queue = memory_queue();
    queue.commit(vec![item("first"), item("second")]).await.unwrap();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    let ResumeOutcome::Reloaded { report } = outcome else {
        panic!("expected reload");
    };
    assert!(report.abandoned);
    assert!(!report.submitted());
    assert_eq!(
        report.states,
        vec![AgentState::Init, AgentState::LocatingInput, AgentState::Advancing]
    );
    assert!(page.clicks().is_empty());
    assert_eq!(queue.current().await.unwrap().unwrap().description, "second");
}

#[tokio::test(start_paused = true)]
async fn test_disabled_generate_is_clicked_anyway() {
    let page = Arc::new(FakePage::new());
    page.add(FakeElement::new("file").matching("input[type=file]"))
        .add(FakeElement::new("prompt").matching(".prompt-input"))
        .add(
            FakeElement::new("generate")
                .matching("button")
                .text("Generate")
                .disabled(),
        );
    add_library(&page, 1);
    let queue = memory_queue();
    queue.commit(vec![item("x")]).await.unwrap();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    let ResumeOutcome::Finished { report: Some(report), .. } = outcome else {
        panic!("expected finish");
    };
    assert!(report.generate_was_disabled);
    assert!(report.generate_clicked);
    assert!(page.clicks().contains(&"generate".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_prompt_retries_overlap_upload() {
    let page = Arc::new(FakePage::new());
    page.add(FakeElement::new("file").matching("input[type=file]"))
        .add(FakeElement::new("generate").matching("button").text("Generate"))
        .add(FakeElement::new("new-upload").matching(".new-upload"));
    let queue = memory_queue();
    queue.commit(vec![item("x"), item("y")]).await.unwrap();
    let start = Instant::now();

    let outcome = agent(&page, &queue, TimingConfig::default()).resume().await.unwrap();

    let ResumeOutcome::Reloaded { report } = outcome else {
        panic!("expected reload");
    };
    assert!(report.image_attached);
    assert_eq!(report.prompt, None);
    assert!(report.generate_clicked);

    // 3s settle, 4s of prompt retries alongside the upload, 4s upload
    // settle, 2s after generate, 2s before the next item.
    assert_eq!(start.elapsed(), Duration::from_secs(3 + 4 + 4 + 2 + 2));
}

#[tokio::test(start_paused = true)]
async fn test_default_timing_for_last_item() {
    let page = full_page(1);
    let queue = memory_queue();
    queue
        .commit(vec![item("x").with_negative("y")])
        .await
        .unwrap();
    let start = Instant::now();

    agent(&page, &queue, TimingConfig::default()).resume().await.unwrap();

    // Item: 3s + 4s + 1s + 2s. Finalize: 2s + 2s + 500ms + 1s + 1s.
    assert_eq!(start.elapsed(), Duration::from_millis(10_000 + 6_500));
}

#[tokio::test(start_paused = true)]
async fn test_resumes_interrupted_finalize() {
    let page = full_page(2);
    let queue = memory_queue();
    queue.commit(vec![item("a"), item("b")]).await.unwrap();
    queue.advance().await.unwrap();
    queue.advance().await.unwrap();

    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    let ResumeOutcome::Finished { report, finalize } = outcome else {
        panic!("expected finish");
    };
    assert_eq!(report, None);
    assert_eq!(finalize.items_selected, vec![1, 2]);
    assert!(page.attached("file").is_none());
    assert!(queue.snapshot().await.unwrap().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_unreadable_current_item_is_abandoned() {
    let store = Arc::new(MemoryKvStore::new());
    let queue = Arc::new(WorkQueue::new(store.clone()));
    queue.commit(vec![item("first"), item("second")]).await.unwrap();
    let batch_id = queue.batch_id().await.unwrap().unwrap();

    let mut entries = HashMap::new();
    entries.insert(
        keys::CURRENT.to_string(),
        json!({
            "next_step": "import",
            "work_item": {"image": "data:image/gif;base64,R0lG", "description": "first"},
            "batch_id": batch_id,
        }),
    );
    store.set(entries).await.unwrap();

    let page = full_page(0);
    let outcome = agent(&page, &queue, TimingConfig::immediate()).resume().await.unwrap();

    let ResumeOutcome::Reloaded { report } = outcome else {
        panic!("expected reload");
    };
    assert!(report.abandoned);
    assert!(page.attached("file").is_none());
    assert_eq!(queue.current().await.unwrap().unwrap().description, "second");
}

#[test]
fn test_preview_truncates_on_char_boundary() {
    assert_eq!(preview("short"), "short");
    let long = "é".repeat(60);
    assert_eq!(preview(&long), format!("{}...", "é".repeat(50)));
}
