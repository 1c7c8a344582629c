//! Scripted in-memory [`Page`] for tests.
//!
//! Elements are declared up front with the selectors they answer to. There
//! is no CSS engine: a selector matches an element only if it was listed
//! verbatim. Every action is recorded so tests can assert on the sequence
//! the agent produced.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::cdp::CdpError;
use crate::page::{ElementHandle, FileUpload, Page, PageError, SyntheticEvent};

/// One element of the fake document.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    id: String,
    selectors: Vec<String>,
    text: String,
    disabled: bool,
    parent: Option<String>,
    hidden: bool,
    reveals: Vec<String>,
}

impl FakeElement {
    /// `id` doubles as the element handle.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn matching(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn inside(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Not found by any lookup until something reveals it.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Clicking this element unhides `id`.
    pub fn reveals(mut self, id: impl Into<String>) -> Self {
        self.reveals.push(id.into());
        self
    }
}

/// Something the page was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeAction {
    Click(String),
    Focus(String),
    SetText(String, String),
    InsertText(String, String),
    Event(String, SyntheticEvent),
    AttachFile(String, String),
    Reload,
}

#[derive(Default)]
struct FakeState {
    elements: Vec<FakeElement>,
    counts: HashMap<String, VecDeque<usize>>,
    failing: HashSet<String>,
    misses: HashMap<String, usize>,
    failing_actions: HashSet<String>,
    attached: HashMap<String, FileUpload>,
    actions: Vec<FakeAction>,
    count_calls: usize,
}

impl FakeState {
    fn visible(&self) -> impl Iterator<Item = &FakeElement> {
        self.elements.iter().filter(|e| !e.hidden)
    }

    fn element(&self, handle: &ElementHandle) -> Result<&FakeElement, PageError> {
        self.elements
            .iter()
            .find(|e| e.id == handle.as_str())
            .ok_or_else(|| PageError::StaleElement(handle.to_string()))
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> Result<&mut FakeElement, PageError> {
        self.elements
            .iter_mut()
            .find(|e| e.id == handle.as_str())
            .ok_or_else(|| PageError::StaleElement(handle.to_string()))
    }

    fn check_selector(&self, selector: &str) -> Result<(), PageError> {
        if self.failing.contains(selector) {
            return Err(PageError::Script(format!("lookup failed: {}", selector)));
        }
        Ok(())
    }

    fn check_action(&self, handle: &ElementHandle) -> Result<(), PageError> {
        if self.failing_actions.contains(handle.as_str()) {
            return Err(PageError::Cdp(CdpError::JavaScript(format!(
                "action on {} failed",
                handle
            ))));
        }
        Ok(())
    }

    fn is_descendant(&self, element: &FakeElement, ancestor: &str) -> bool {
        let mut parent = element.parent.as_deref();
        while let Some(id) = parent {
            if id == ancestor {
                return true;
            }
            parent = self
                .elements
                .iter()
                .find(|e| e.id == id)
                .and_then(|e| e.parent.as_deref());
        }
        false
    }
}

/// In-memory page driven entirely by its script.
#[derive(Default)]
pub struct FakePage {
    state: Mutex<FakeState>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, element: FakeElement) -> &Self {
        self.state.lock().elements.push(element);
        self
    }

    /// Script the values [`Page::count`] returns for `selector`, one per
    /// call. The last value repeats.
    pub fn script_count(&self, selector: impl Into<String>, counts: Vec<usize>) -> &Self {
        self.state
            .lock()
            .counts
            .insert(selector.into(), counts.into());
        self
    }

    /// Lookups with `selector` return an error.
    pub fn fail_selector(&self, selector: impl Into<String>) -> &Self {
        self.state.lock().failing.insert(selector.into());
        self
    }

    /// The next `times` lookups with `selector` find nothing.
    pub fn miss_selector(&self, selector: impl Into<String>, times: usize) -> &Self {
        self.state.lock().misses.insert(selector.into(), times);
        self
    }

    /// Actions on element `id` return an error.
    pub fn fail_actions_on(&self, id: impl Into<String>) -> &Self {
        self.state.lock().failing_actions.insert(id.into());
        self
    }

    pub fn actions(&self) -> Vec<FakeAction> {
        self.state.lock().actions.clone()
    }

    /// Ids of clicked elements, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.state
            .lock()
            .actions
            .iter()
            .filter_map(|a| match a {
                FakeAction::Click(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn reloads(&self) -> usize {
        self.state
            .lock()
            .actions
            .iter()
            .filter(|a| matches!(a, FakeAction::Reload))
            .count()
    }

    /// Number of [`Page::count`] calls so far.
    pub fn count_calls(&self) -> usize {
        self.state.lock().count_calls
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.text.clone())
    }

    pub fn attached(&self, id: &str) -> Option<FileUpload> {
        self.state.lock().attached.get(id).cloned()
    }
}

#[async_trait]
impl Page for FakePage {
    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        let mut state = self.state.lock();
        state.check_selector(selector)?;
        if let Some(misses) = state.misses.get_mut(selector) {
            if *misses > 0 {
                *misses -= 1;
                return Ok(Vec::new());
            }
        }
        Ok(state
            .visible()
            .filter(|e| e.selectors.iter().any(|s| s == selector))
            .map(|e| ElementHandle::new(e.id.clone()))
            .collect())
    }

    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        let mut state = self.state.lock();
        state.count_calls += 1;
        state.check_selector(selector)?;

        if let Some(script) = state.counts.get_mut(selector) {
            let value = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().copied()
            };
            return Ok(value.unwrap_or(0));
        }

        Ok(state
            .visible()
            .filter(|e| e.selectors.iter().any(|s| s == selector))
            .count())
    }

    async fn query_within(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        let state = self.state.lock();
        state.check_selector(selector)?;
        state.element(element)?;
        Ok(state
            .visible()
            .filter(|e| e.selectors.iter().any(|s| s == selector))
            .find(|e| state.is_descendant(e, element.as_str()))
            .map(|e| ElementHandle::new(e.id.clone())))
    }

    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        let state = self.state.lock();
        state.check_selector(selector)?;
        let mut current = Some(state.element(element)?);
        while let Some(e) = current {
            if e.selectors.iter().any(|s| s == selector) {
                return Ok(Some(ElementHandle::new(e.id.clone())));
            }
            current = e
                .parent
                .as_deref()
                .and_then(|id| state.elements.iter().find(|p| p.id == id));
        }
        Ok(None)
    }

    async fn text_content(&self, element: &ElementHandle) -> Result<String, PageError> {
        Ok(self.state.lock().element(element)?.text.clone())
    }

    async fn is_disabled(&self, element: &ElementHandle) -> Result<bool, PageError> {
        Ok(self.state.lock().element(element)?.disabled)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.check_action(element)?;
        let reveals = state.element(element)?.reveals.clone();
        for id in reveals {
            if let Some(target) = state.elements.iter_mut().find(|e| e.id == id) {
                target.hidden = false;
            }
        }
        state.actions.push(FakeAction::Click(element.to_string()));
        Ok(())
    }

    async fn focus(&self, element: &ElementHandle) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.check_action(element)?;
        state.element(element)?;
        state.actions.push(FakeAction::Focus(element.to_string()));
        Ok(())
    }

    async fn set_text_content(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.check_action(element)?;
        state.element_mut(element)?.text = text.to_string();
        state
            .actions
            .push(FakeAction::SetText(element.to_string(), text.to_string()));
        Ok(())
    }

    async fn insert_text(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.check_action(element)?;
        state.element_mut(element)?.text.push_str(text);
        state
            .actions
            .push(FakeAction::InsertText(element.to_string(), text.to_string()));
        Ok(())
    }

    async fn dispatch_event(
        &self,
        element: &ElementHandle,
        event: SyntheticEvent,
    ) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.check_action(element)?;
        state.element(element)?;
        state
            .actions
            .push(FakeAction::Event(element.to_string(), event));
        Ok(())
    }

    async fn attach_file(&self, element: &ElementHandle, file: &FileUpload) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.check_action(element)?;
        state.element(element)?;
        state
            .attached
            .insert(element.to_string(), file.clone());
        state
            .actions
            .push(FakeAction::AttachFile(element.to_string(), file.name.clone()));
        Ok(())
    }

    async fn reload(&self) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.attached.clear();
        state.actions.push(FakeAction::Reload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: &str) -> ElementHandle {
        ElementHandle::new(id)
    }

    #[tokio::test]
    async fn test_query_matches_listed_selectors_only() {
        let page = FakePage::new();
        page.add(FakeElement::new("a").matching("button"))
            .add(FakeElement::new("b").matching("button").matching(".primary"));

        assert_eq!(page.query(".primary").await.unwrap(), Some(handle("b")));
        assert_eq!(page.query_all("button").await.unwrap().len(), 2);
        assert_eq!(page.query("div").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hidden_until_revealed() {
        let page = FakePage::new();
        page.add(FakeElement::new("toggle").matching("a").reveals("field"))
            .add(FakeElement::new("field").matching(".field").hidden());

        assert_eq!(page.query(".field").await.unwrap(), None);
        page.click(&handle("toggle")).await.unwrap();
        assert_eq!(page.query(".field").await.unwrap(), Some(handle("field")));
    }

    #[tokio::test]
    async fn test_closest_and_within() {
        let page = FakePage::new();
        page.add(FakeElement::new("btn").matching("button"))
            .add(FakeElement::new("inner").matching(".inner").inside("btn"));

        assert_eq!(
            page.closest(&handle("inner"), "button").await.unwrap(),
            Some(handle("btn"))
        );
        assert_eq!(
            page.query_within(&handle("btn"), ".inner").await.unwrap(),
            Some(handle("inner"))
        );
        assert_eq!(page.query_within(&handle("inner"), "button").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scripted_count_repeats_last() {
        let page = FakePage::new();
        page.script_count(".progress", vec![2, 0]);

        assert_eq!(page.count(".progress").await.unwrap(), 2);
        assert_eq!(page.count(".progress").await.unwrap(), 0);
        assert_eq!(page.count(".progress").await.unwrap(), 0);
        assert_eq!(page.count_calls(), 3);
    }

    #[tokio::test]
    async fn test_missed_lookups_recover() {
        let page = FakePage::new();
        page.add(FakeElement::new("file").matching("input")).miss_selector("input", 1);

        assert_eq!(page.query("input").await.unwrap(), None);
        assert_eq!(page.query("input").await.unwrap(), Some(handle("file")));
    }

    #[tokio::test]
    async fn test_failures_and_unknown_handles() {
        let page = FakePage::new();
        page.add(FakeElement::new("x").matching("x"))
            .fail_selector("bad")
            .fail_actions_on("x");

        assert!(page.query("bad").await.is_err());
        assert!(page.click(&handle("x")).await.is_err());
        assert!(matches!(
            page.text_content(&handle("gone")).await,
            Err(PageError::StaleElement(_))
        ));
    }

    #[tokio::test]
    async fn test_text_edits_and_log() {
        let page = FakePage::new();
        page.add(FakeElement::new("field").matching(".field").text("old"));
        let field = handle("field");

        page.set_text_content(&field, "").await.unwrap();
        page.insert_text(&field, "new").await.unwrap();
        page.reload().await.unwrap();

        assert_eq!(page.text_of("field").as_deref(), Some("new"));
        assert_eq!(page.reloads(), 1);
        assert_eq!(page.actions().len(), 3);
    }
}
