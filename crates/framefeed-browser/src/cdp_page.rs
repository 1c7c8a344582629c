//! [`Page`] over a CDP page session.
//!
//! Element handles are Runtime remote object ids. Selectors, text and file
//! bytes are passed as call arguments so nothing is ever spliced into
//! script source.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::trace;

use crate::cdp::{CdpError, PageSession, PropertyDescriptor, RemoteObject};
use crate::page::{ElementHandle, FileUpload, Page, PageError, SyntheticEvent};

mod scripts {
    pub const QUERY: &str = "function(s) { return this.querySelector(s); }";
    pub const QUERY_ALL: &str = "function(s) { return Array.from(this.querySelectorAll(s)); }";
    pub const COUNT: &str = "function(s) { return this.querySelectorAll(s).length; }";
    pub const CLOSEST: &str = "function(s) { return this.closest(s); }";
    pub const TEXT: &str = "function() { return this.textContent || ''; }";
    pub const IS_DISABLED: &str = r#"function() {
        return !!(this.disabled
            || this.getAttribute('aria-disabled') === 'true'
            || this.classList.contains('is-disabled')
            || this.classList.contains('disabled'));
    }"#;
    pub const CLICK: &str = "function() { this.click(); }";
    pub const FOCUS: &str = "function() { this.focus(); }";
    pub const SET_TEXT: &str = "function(t) { this.textContent = t; }";
    pub const DISPATCH: &str = r#"function(type, keyboard) {
        const ev = keyboard
            ? new KeyboardEvent(type, { bubbles: true, cancelable: true })
            : new Event(type, { bubbles: true });
        this.dispatchEvent(ev);
    }"#;
    pub const ATTACH_FILE: &str = r#"function(name, mime, b64) {
        const bin = atob(b64);
        const bytes = new Uint8Array(bin.length);
        for (let i = 0; i < bin.length; i++) bytes[i] = bin.charCodeAt(i);
        const dt = new DataTransfer();
        dt.items.add(new File([bytes], name, { type: mime }));
        this.files = dt.files;
        this.dispatchEvent(new Event('change', { bubbles: true }));
        return this.files.length;
    }"#;
}

/// Array elements of a `Runtime.getProperties` result, in index order.
fn indexed_elements(properties: Vec<PropertyDescriptor>) -> Vec<ElementHandle> {
    let mut indexed: Vec<(usize, ElementHandle)> = properties
        .into_iter()
        .filter_map(|p| {
            let index = p.name.parse::<usize>().ok()?;
            let id = p.value.as_ref()?.node_id()?.to_string();
            Some((index, ElementHandle::new(id)))
        })
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, handle)| handle).collect()
}

fn element_of(object: RemoteObject) -> Option<ElementHandle> {
    object.node_id().map(ElementHandle::new)
}

/// Drives one tab through its CDP session.
pub struct CdpPage {
    session: Arc<PageSession>,
}

impl CdpPage {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<PageSession> {
        &self.session
    }

    fn stale_or(element: &ElementHandle, e: CdpError) -> PageError {
        if e.is_stale_object() {
            PageError::StaleElement(element.to_string())
        } else {
            PageError::Cdp(e)
        }
    }

    async fn release(&self, object_id: &str) {
        if let Err(e) = self.session.release_object(object_id).await {
            trace!("Failed to release {}: {}", object_id, e);
        }
    }

    /// Run `function` with `this` bound to `document`.
    async fn on_document(&self, function: &str, args: Vec<Value>) -> Result<Value, PageError> {
        let document = self.document().await?;
        let result = self.session.call_function_on(&document, function, args).await;
        self.release(&document).await;
        Ok(result?)
    }

    async fn document_handle(
        &self,
        function: &str,
        args: Vec<Value>,
    ) -> Result<RemoteObject, PageError> {
        let document = self.document().await?;
        let result = self
            .session
            .call_function_handle(&document, function, args)
            .await;
        self.release(&document).await;
        Ok(result?)
    }

    async fn document(&self) -> Result<String, PageError> {
        let object = self.session.evaluate_handle("document").await?;
        object
            .object_id
            .ok_or_else(|| PageError::Script("document has no object id".to_string()))
    }

    async fn on_element(
        &self,
        element: &ElementHandle,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, PageError> {
        self.session
            .call_function_on(element.as_str(), function, args)
            .await
            .map_err(|e| Self::stale_or(element, e))
    }

    async fn element_handle(
        &self,
        element: &ElementHandle,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Option<ElementHandle>, PageError> {
        let object = self
            .session
            .call_function_handle(element.as_str(), function, args)
            .await
            .map_err(|e| Self::stale_or(element, e))?;
        Ok(element_of(object))
    }
}

#[async_trait]
impl Page for CdpPage {
    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        let object = self.document_handle(scripts::QUERY, vec![json!(selector)]).await?;
        Ok(element_of(object))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        let array = self
            .document_handle(scripts::QUERY_ALL, vec![json!(selector)])
            .await?;
        let Some(array_id) = array.object_id else {
            return Ok(Vec::new());
        };

        let properties = self.session.get_properties(&array_id).await;
        self.release(&array_id).await;
        Ok(indexed_elements(properties?))
    }

    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        let value = self.on_document(scripts::COUNT, vec![json!(selector)]).await?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| PageError::Script(format!("count returned {}", value)))
    }

    async fn query_within(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        self.element_handle(element, scripts::QUERY, vec![json!(selector)])
            .await
    }

    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        self.element_handle(element, scripts::CLOSEST, vec![json!(selector)])
            .await
    }

    async fn text_content(&self, element: &ElementHandle) -> Result<String, PageError> {
        let value = self.on_element(element, scripts::TEXT, Vec::new()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn is_disabled(&self, element: &ElementHandle) -> Result<bool, PageError> {
        let value = self.on_element(element, scripts::IS_DISABLED, Vec::new()).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), PageError> {
        self.on_element(element, scripts::CLICK, Vec::new()).await?;
        Ok(())
    }

    async fn focus(&self, element: &ElementHandle) -> Result<(), PageError> {
        self.on_element(element, scripts::FOCUS, Vec::new()).await?;
        Ok(())
    }

    async fn set_text_content(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        self.on_element(element, scripts::SET_TEXT, vec![json!(text)])
            .await?;
        Ok(())
    }

    async fn insert_text(&self, element: &ElementHandle, text: &str) -> Result<(), PageError> {
        self.focus(element).await?;
        self.session.insert_text(text).await?;
        Ok(())
    }

    async fn dispatch_event(
        &self,
        element: &ElementHandle,
        event: SyntheticEvent,
    ) -> Result<(), PageError> {
        self.on_element(
            element,
            scripts::DISPATCH,
            vec![json!(event.name()), json!(event.is_keyboard())],
        )
        .await?;
        Ok(())
    }

    async fn attach_file(&self, element: &ElementHandle, file: &FileUpload) -> Result<(), PageError> {
        let attached = self
            .on_element(
                element,
                scripts::ATTACH_FILE,
                vec![
                    json!(file.name),
                    json!(file.media_type),
                    json!(STANDARD.encode(&file.data)),
                ],
            )
            .await?;

        if attached.as_u64() != Some(1) {
            return Err(PageError::Script(format!(
                "file input holds {} file(s) after attaching {}",
                attached, file.name
            )));
        }
        Ok(())
    }

    async fn reload(&self) -> Result<(), PageError> {
        self.session.reload().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(name: &str, object: Option<Value>) -> PropertyDescriptor {
        serde_json::from_value(json!({
            "name": name,
            "value": object,
            "enumerable": true,
        }))
        .unwrap()
    }

    fn node(id: &str) -> Option<Value> {
        Some(json!({"type": "object", "subtype": "node", "objectId": id}))
    }

    #[test]
    fn test_indexed_elements_orders_by_index() {
        let props = vec![
            property("1", node("b")),
            property("length", Some(json!({"type": "number", "value": 3}))),
            property("10", node("c")),
            property("0", node("a")),
            property("__proto__", Some(json!({"type": "object", "objectId": "proto"}))),
        ];

        let handles = indexed_elements(props);
        let ids: Vec<&str> = handles.iter().map(|h| h.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_indexed_elements_skips_null_entries() {
        let props = vec![
            property("0", Some(json!({"type": "object", "subtype": "null"}))),
            property("1", None),
            property("2", node("x")),
        ];
        let handles = indexed_elements(props);
        assert_eq!(handles, vec![ElementHandle::new("x")]);
    }

    #[test]
    fn test_element_of_null_result() {
        let null: RemoteObject =
            serde_json::from_value(json!({"type": "object", "subtype": "null"})).unwrap();
        assert!(element_of(null).is_none());
    }

    #[test]
    fn test_scripts_take_arguments() {
        for script in [scripts::QUERY, scripts::QUERY_ALL, scripts::COUNT, scripts::CLOSEST] {
            assert!(script.starts_with("function(s)"));
        }
        assert!(scripts::ATTACH_FILE.contains("DataTransfer"));
    }
}
