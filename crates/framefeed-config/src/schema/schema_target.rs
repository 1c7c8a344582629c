//! Target application profile: the page URL and the ranked locator
//! cascades used to find each control.

use serde::{Deserialize, Serialize};

/// A single element lookup strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Locator {
    /// First element matching a CSS selector.
    Css { selector: String },

    /// First element matching `selector` whose text content contains `text`.
    CssWithText { selector: String, text: String },

    /// First `selector` match inside the first `ancestor` match.
    Within { ancestor: String, selector: String },

    /// First `selector` match (optionally filtered by text), climbed to its
    /// nearest enclosing `ancestor`.
    Closest {
        selector: String,
        ancestor: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
        }
    }

    pub fn css_with_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::CssWithText {
            selector: selector.into(),
            text: text.into(),
        }
    }

    pub fn within(ancestor: impl Into<String>, selector: impl Into<String>) -> Self {
        Locator::Within {
            ancestor: ancestor.into(),
            selector: selector.into(),
        }
    }

    pub fn closest(selector: impl Into<String>, ancestor: impl Into<String>) -> Self {
        Locator::Closest {
            selector: selector.into(),
            ancestor: ancestor.into(),
            text: None,
        }
    }

    pub fn closest_with_text(
        selector: impl Into<String>,
        ancestor: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Locator::Closest {
            selector: selector.into(),
            ancestor: ancestor.into(),
            text: Some(text.into()),
        }
    }
}

/// Ordered list of strategies tried until one finds an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorCascade {
    /// Human-readable control name, used in logs.
    pub name: String,

    #[serde(default)]
    pub strategies: Vec<Locator>,
}

impl LocatorCascade {
    pub fn new(name: impl Into<String>, strategies: Vec<Locator>) -> Self {
        Self {
            name: name.into(),
            strategies,
        }
    }
}

/// Everything the agent knows about the target page layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// Page opened for each batch; reloaded between items.
    pub url: String,

    pub file_input: LocatorCascade,
    pub prompt_field: LocatorCascade,
    pub negative_toggle: LocatorCascade,
    pub negative_field: LocatorCascade,
    pub generate_button: LocatorCascade,
    /// Clicked before reloading for the next item. Optional.
    pub new_upload: Option<LocatorCascade>,

    pub assets_button: LocatorCascade,
    pub selection_mode: LocatorCascade,
    pub download_menu: LocatorCascade,
    pub download_option: LocatorCascade,

    /// Selector whose matches mean generation is still running.
    pub progress_indicator: String,
    /// Positional selector for the i-th asset; `{index}` is 1-based.
    pub asset_item: String,
}

const PANEL: &str = "#main-container > div > div:nth-child(1) > div.designer-container.theme-video \
                     > div.designer-component.property-panel > div.property-content \
                     > div.panel-box > div > div:nth-child(5)";

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            url: "https://app.klingai.com/global/image-to-video/frame-mode/new".to_string(),
            file_input: LocatorCascade::new(
                "file input",
                vec![
                    Locator::css(r#".el-upload__input[type="file"]"#),
                    Locator::css(r#"input[type="file"]"#),
                ],
            ),
            prompt_field: LocatorCascade::new(
                "prompt field",
                vec![
                    Locator::css(r#".prompt-input[contenteditable="true"]"#),
                    Locator::css(".prompt-input"),
                    Locator::within(".prompt", r#"[contenteditable="true"]"#),
                    Locator::css(r#"[contenteditable="true"]"#),
                ],
            ),
            negative_toggle: LocatorCascade::new(
                "negative prompt toggle",
                vec![Locator::css(format!("{} > div > div > a", PANEL))],
            ),
            negative_field: LocatorCascade::new(
                "negative prompt field",
                vec![Locator::css(format!(
                    "{} > div.content > div > div.prompt-wrap > div > div.prompt-input",
                    PANEL
                ))],
            ),
            generate_button: LocatorCascade::new(
                "generate button",
                vec![
                    Locator::css("button.generic-button.green.big[data-v-10b25476][data-v-502bcbfb]"),
                    Locator::css_with_text(".generic-button.green.big", "Generate"),
                    Locator::closest_with_text(".inner", "button", "Generate"),
                    Locator::css_with_text("button", "Generate"),
                ],
            ),
            new_upload: Some(LocatorCascade::new(
                "new upload button",
                vec![
                    Locator::closest(r##"a.el-tooltip__trigger svg[xlink\:href="#icon-upload"]"##, "a"),
                    Locator::css("a[data-v-053dc2b0].el-tooltip__trigger"),
                ],
            )),
            assets_button: LocatorCascade::new(
                "assets button",
                vec![
                    Locator::css(
                        "button.generic-button.secondary.medium[data-v-10b25476][data-v-b4600797]",
                    ),
                    Locator::css_with_text("button", "Assets"),
                    Locator::closest(r##"svg use[xlink\:href="#icon-folder"]"##, "button"),
                ],
            ),
            selection_mode: LocatorCascade::new(
                "selection mode button",
                vec![Locator::css(
                    "#main-material-container > div.header-bar > div:nth-child(2) > button:nth-child(1)",
                )],
            ),
            download_menu: LocatorCascade::new(
                "download menu",
                vec![Locator::css(
                    "#main-material-container > div.header-bar > div:nth-child(2) > div.el-dropdown",
                )],
            ),
            download_option: LocatorCascade::new(
                "download without watermark",
                vec![Locator::css_with_text(
                    "li.el-dropdown-menu__item",
                    "Download without Watermark",
                )],
            ),
            progress_indicator: ".progress-box.vertical-center".to_string(),
            asset_item: "#main-material-container > div.container > div > div:nth-child({index}) > div"
                .to_string(),
        }
    }
}

impl TargetProfile {
    /// Positional selector for the 1-based asset index.
    pub fn asset_item_selector(&self, index: u64) -> String {
        self.asset_item.replace("{index}", &index.to_string())
    }

    /// All required cascades, for validation.
    pub fn required_cascades(&self) -> Vec<&LocatorCascade> {
        vec![
            &self.file_input,
            &self.prompt_field,
            &self.negative_toggle,
            &self.negative_field,
            &self.generate_button,
            &self.assets_button,
            &self.selection_mode,
            &self.download_menu,
            &self.download_option,
        ]
    }
}
