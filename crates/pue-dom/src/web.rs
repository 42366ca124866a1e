#![forbid(unsafe_code)]

//! Browser backend over `web-sys`.
//!
//! # Listener bookkeeping
//!
//! The DOM identifies a listener by the JS function it was registered with,
//! so every `(target, event, listener)` triple gets exactly one
//! [`Closure`], kept in a thread-local registry. Detaching only calls
//! `removeEventListener`; the closure stays in the registry and is reused by
//! the next attach. Closures are never freed: a listener may be detached
//! from inside its own callback, and bindings have no teardown anyway.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{EventTarget, HtmlElement, HtmlInputElement};

use crate::element::{Document, Element};
use crate::event::{EventType, Listener};

struct Registered {
    target: EventTarget,
    event: EventType,
    listener: usize,
    closure: Closure<dyn Fn()>,
    attached: bool,
}

thread_local! {
    static REGISTRY: RefCell<Vec<Registered>> = const { RefCell::new(Vec::new()) };
}

fn attach(target: &EventTarget, event: EventType, listener: &Listener) {
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let id = listener.id();
        let index = match registry
            .iter()
            .position(|r| r.listener == id && r.event == event && r.target == *target)
        {
            Some(index) => index,
            None => {
                let callback = listener.clone();
                registry.push(Registered {
                    target: target.clone(),
                    event,
                    listener: id,
                    closure: Closure::new(move || callback.call()),
                    attached: false,
                });
                registry.len() - 1
            }
        };

        let entry = &mut registry[index];
        if entry.attached {
            return;
        }
        match target
            .add_event_listener_with_callback(event.as_str(), entry.closure.as_ref().unchecked_ref())
        {
            Ok(()) => entry.attached = true,
            Err(err) => {
                tracing::warn!(message = "web.listen_failed", event = event.as_str(), error = ?err);
            }
        }
    });
}

fn detach(target: &EventTarget, event: EventType, listener: &Listener) {
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let id = listener.id();
        let Some(entry) = registry
            .iter_mut()
            .find(|r| r.attached && r.listener == id && r.event == event && r.target == *target)
        else {
            return;
        };
        match target.remove_event_listener_with_callback(
            event.as_str(),
            entry.closure.as_ref().unchecked_ref(),
        ) {
            Ok(()) => entry.attached = false,
            Err(err) => {
                tracing::warn!(message = "web.unlisten_failed", event = event.as_str(), error = ?err);
            }
        }
    });
}

/// A live DOM element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebElement {
    element: web_sys::Element,
}

impl WebElement {
    #[must_use]
    pub fn new(element: web_sys::Element) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn as_element(&self) -> &web_sys::Element {
        &self.element
    }

    fn input(&self) -> Option<&HtmlInputElement> {
        self.element.dyn_ref::<HtmlInputElement>()
    }
}

impl From<web_sys::Element> for WebElement {
    fn from(element: web_sys::Element) -> Self {
        Self::new(element)
    }
}

impl Element for WebElement {
    fn tag_name(&self) -> String {
        self.element.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn text_content(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn value(&self) -> String {
        self.input().map(HtmlInputElement::value).unwrap_or_default()
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.input() {
            input.set_value(value);
        }
    }

    fn checked(&self) -> bool {
        self.input().is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.input() {
            input.set_checked(checked);
        }
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(html) = self.element.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().set_property(property, value) {
            tracing::warn!(message = "web.style_failed", property, error = ?err);
        }
    }

    fn add_listener(&self, event: EventType, listener: &Listener) {
        attach(self.element.as_ref(), event, listener);
    }

    fn remove_listener(&self, event: EventType, listener: &Listener) {
        detach(self.element.as_ref(), event, listener);
    }
}

/// The page's document.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The document of the current window, if there is one.
    #[must_use]
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    #[must_use]
    pub fn as_document(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn find(&self, selector: &str) -> Option<WebElement> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(WebElement::new),
            Err(err) => {
                tracing::warn!(message = "document.find", selector, error = ?err);
                None
            }
        }
    }

    fn find_all(&self, selector: &str) -> Vec<WebElement> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(message = "document.find_all", selector, error = ?err);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement::new)
            .collect()
    }
}

/// Run `listener` when the page's DOM has been parsed.
pub fn on_load(listener: &Listener) {
    if let Some(window) = web_sys::window() {
        attach(window.as_ref(), EventType::DomContentLoaded, listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::refs::Refs;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    fn make(doc: &WebDocument, tag: &str, attrs: &[(&str, &str)]) -> WebElement {
        let raw = doc.as_document().create_element(tag).expect("create element");
        for (name, value) in attrs {
            raw.set_attribute(name, value).expect("set attribute");
        }
        doc.as_document()
            .body()
            .expect("body")
            .append_child(&raw)
            .expect("append");
        WebElement::new(raw)
    }

    #[wasm_bindgen_test]
    fn text_content_follows_cell() {
        let doc = WebDocument::current().expect("document");
        let h1 = make(&doc, "h1", &[]);
        let counter = Model::default().text_content(Some(&h1), 1i32);
        assert_eq!(h1.text_content(), "1");
        counter.set(2);
        assert_eq!(h1.text_content(), "2");
    }

    #[wasm_bindgen_test]
    fn value_binds_inputs() {
        let doc = WebDocument::current().expect("document");
        let field = make(&doc, "input", &[("type", "text")]);
        let text = Model::default().value(Some(&field), "hi");
        assert_eq!(field.value(), "hi");
        text.set("yo".to_string());
        assert_eq!(field.value(), "yo");

        let boxed = make(&doc, "input", &[("type", "checkbox")]);
        let check = Model::default().value(Some(&boxed), false);
        check.set(true);
        assert!(boxed.checked());
    }

    #[wasm_bindgen_test]
    fn refs_from_live_document() {
        let doc = WebDocument::current().expect("document");
        make(&doc, "span", &[("ref", "web-ref-test")]);
        let refs = Refs::collect(&doc);
        assert!(refs.get("web-ref-test").is_some());
    }
}
