//! Fixtures shared by the agent's unit tests.

use std::sync::Arc;

use framefeed_browser::testing::{FakeElement, FakePage};
use framefeed_config::{Locator, LocatorCascade, TargetProfile};
use framefeed_queue::{ImagePayload, MediaType, MemoryKvStore, WorkItem, WorkQueue};

/// A target layout with short selectors the fake page can answer.
pub fn profile() -> TargetProfile {
    TargetProfile {
        url: "https://target.test/new".to_string(),
        file_input: LocatorCascade::new("file input", vec![Locator::css("input[type=file]")]),
        prompt_field: LocatorCascade::new("prompt field", vec![Locator::css(".prompt-input")]),
        negative_toggle: LocatorCascade::new(
            "negative prompt toggle",
            vec![Locator::css(".negative-toggle")],
        ),
        negative_field: LocatorCascade::new(
            "negative prompt field",
            vec![Locator::css(".negative-input")],
        ),
        generate_button: LocatorCascade::new(
            "generate button",
            vec![Locator::css_with_text("button", "Generate")],
        ),
        new_upload: Some(LocatorCascade::new(
            "new upload button",
            vec![Locator::css(".new-upload")],
        )),
        assets_button: LocatorCascade::new(
            "assets button",
            vec![Locator::css_with_text("button", "Assets")],
        ),
        selection_mode: LocatorCascade::new("selection mode", vec![Locator::css(".select-mode")]),
        download_menu: LocatorCascade::new("download menu", vec![Locator::css(".download-menu")]),
        download_option: LocatorCascade::new(
            "download without watermark",
            vec![Locator::css_with_text("li.menu-item", "Download without Watermark")],
        ),
        progress_indicator: ".progress-box".to_string(),
        asset_item: ".asset:nth-child({index})".to_string(),
    }
}

/// Form controls of the import page.
pub fn form_page() -> FakePage {
    let page = FakePage::new();
    page.add(FakeElement::new("file").matching("input[type=file]"))
        .add(FakeElement::new("prompt").matching(".prompt-input"))
        .add(
            FakeElement::new("negative-toggle")
                .matching(".negative-toggle")
                .reveals("negative"),
        )
        .add(FakeElement::new("negative").matching(".negative-input").hidden())
        .add(FakeElement::new("generate").matching("button").text("Generate"))
        .add(FakeElement::new("new-upload").matching(".new-upload"));
    page
}

/// Asset library controls plus `assets` result tiles.
pub fn add_library(page: &FakePage, assets: u64) {
    page.add(FakeElement::new("assets").matching("button").text("Assets"))
        .add(FakeElement::new("select-mode").matching(".select-mode"))
        .add(
            FakeElement::new("download-menu")
                .matching(".download-menu")
                .reveals("download-option"),
        )
        .add(
            FakeElement::new("download-option")
                .matching("li.menu-item")
                .text("Download without Watermark")
                .hidden(),
        );
    for index in 1..=assets {
        page.add(
            FakeElement::new(format!("asset-{}", index))
                .matching(format!(".asset:nth-child({})", index)),
        );
    }
}

pub fn item(description: &str) -> WorkItem {
    WorkItem::new(
        ImagePayload::new(MediaType::Png, vec![0x89, b'P', b'N', b'G']),
        description,
    )
}

pub fn memory_queue() -> Arc<WorkQueue> {
    Arc::new(WorkQueue::new(Arc::new(MemoryKvStore::new())))
}
