#![forbid(unsafe_code)]

//! In-memory DOM for tests, demos and non-browser hosts.
//!
//! A [`HeadlessDocument`] is a flat list of [`HeadlessElement`]s in insertion
//! order; there is no tree. It implements the same [`Element`] and
//! [`Document`] traits as the browser backend, and adds user-input
//! simulation ([`type_text`](HeadlessElement::type_text),
//! [`click`](HeadlessElement::click)) plus listener bookkeeping for
//! assertions.
//!
//! # Selectors
//!
//! [`Selector`] understands one compound selector: an optional tag (or `*`)
//! followed by any number of `#id`, `.class`, `[attr]` and `[attr=value]`
//! parts (value optionally quoted). Combinators and selector lists are
//! rejected with [`DomError::InvalidSelector`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::element::{Document, Element, ElementKind};
use crate::error::{DomError, Result};
use crate::event::{EventType, Listener};

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectorPart {
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    parts: Vec<SelectorPart>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &str) -> (&str, &str) {
    let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    rest.split_at(end)
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || DomError::invalid_selector(input);
        let source = input.trim();
        if source.is_empty() {
            return Err(invalid());
        }

        let mut rest = source;
        let tag = if let Some(after) = rest.strip_prefix('*') {
            rest = after;
            None
        } else {
            let (ident, after) = take_ident(rest);
            rest = after;
            (!ident.is_empty()).then(|| ident.to_ascii_lowercase())
        };

        let mut parts = Vec::new();
        while let Some(marker) = rest.chars().next() {
            rest = &rest[marker.len_utf8()..];
            match marker {
                '#' | '.' => {
                    let (ident, after) = take_ident(rest);
                    if ident.is_empty() {
                        return Err(invalid());
                    }
                    rest = after;
                    parts.push(if marker == '#' {
                        SelectorPart::Id(ident.to_owned())
                    } else {
                        SelectorPart::Class(ident.to_owned())
                    });
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(invalid)?;
                    let body = &rest[..close];
                    rest = &rest[close + 1..];
                    let (name, value) = match body.split_once('=') {
                        Some((name, value)) => (name.trim(), Some(unquote(value).to_owned())),
                        None => (body.trim(), None),
                    };
                    if name.is_empty() || !name.chars().all(is_ident_char) {
                        return Err(invalid());
                    }
                    parts.push(SelectorPart::Attribute {
                        name: name.to_ascii_lowercase(),
                        value,
                    });
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self { tag, parts })
    }

    /// Whether `element` satisfies every part of the selector.
    #[must_use]
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        if let Some(tag) = &self.tag
            && !element.tag_name().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        self.parts.iter().all(|part| match part {
            SelectorPart::Id(id) => element.attribute("id").as_deref() == Some(id.as_str()),
            SelectorPart::Class(class) => element
                .attribute("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
            SelectorPart::Attribute { name, value } => match (element.attribute(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
                (None, _) => false,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// HeadlessElement
// ---------------------------------------------------------------------------

/// Listener bookkeeping for one event type on one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Listeners currently attached.
    pub attached: usize,
    /// `add_listener` calls that attached something.
    pub added: usize,
    /// `remove_listener` calls that detached something.
    pub removed: usize,
}

#[derive(Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    html: String,
    value: String,
    checked: bool,
    style: BTreeMap<String, String>,
    listeners: Vec<(EventType, Listener)>,
    stats: BTreeMap<EventType, ListenerStats>,
}

/// An in-memory element. Clones share the node.
#[derive(Clone)]
pub struct HeadlessElement {
    node: Rc<RefCell<Node>>,
}

impl fmt::Debug for HeadlessElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("HeadlessElement")
            .field("tag", &node.tag)
            .field("attributes", &node.attributes)
            .field("listeners", &node.listeners.len())
            .finish()
    }
}

impl PartialEq for HeadlessElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for HeadlessElement {}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2f;", "/")
        .replace("&amp;", "&")
}

impl HeadlessElement {
    /// A detached element with the given tag.
    pub fn new(tag: &str) -> Self {
        Self {
            node: Rc::new(RefCell::new(Node {
                tag: tag.to_ascii_lowercase(),
                ..Node::default()
            })),
        }
    }

    /// `<input type="{kind}">`.
    pub fn input(kind: &str) -> Self {
        Self::new("input").with_attribute("type", kind)
    }

    #[must_use]
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text_content(text);
        self
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut node = self.node.borrow_mut();
        node.attributes
            .insert(name.to_ascii_lowercase(), value.to_owned());
        if name.eq_ignore_ascii_case("value") {
            node.value = value.to_owned();
        } else if name.eq_ignore_ascii_case("checked") {
            node.checked = true;
        }
    }

    /// Inline style property, if set.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.node.borrow().style.get(property).cloned()
    }

    /// Invoke every listener attached for `event`, in attachment order.
    ///
    /// Listeners run against a snapshot, so they may attach or detach
    /// listeners (including themselves) without affecting this dispatch.
    pub fn dispatch(&self, event: EventType) {
        let listeners: Vec<Listener> = self
            .node
            .borrow()
            .listeners
            .iter()
            .filter(|(kind, _)| *kind == event)
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener.call();
        }
    }

    /// Simulate a user replacing the field's text: sets `value`, then fires
    /// `input`.
    pub fn type_text(&self, text: &str) {
        self.node.borrow_mut().value = text.to_owned();
        self.dispatch(EventType::Input);
    }

    /// Simulate a user click. Checkboxes toggle `checked` first and then
    /// fire `click`, `input` and `change`; other elements only fire `click`.
    pub fn click(&self) {
        if self.kind() == ElementKind::Checkbox {
            {
                let mut node = self.node.borrow_mut();
                node.checked = !node.checked;
            }
            self.dispatch(EventType::Click);
            self.dispatch(EventType::Input);
            self.dispatch(EventType::Change);
        } else {
            self.dispatch(EventType::Click);
        }
    }

    /// Listeners currently attached for `event`.
    #[must_use]
    pub fn listener_count(&self, event: EventType) -> usize {
        self.listener_stats(event).attached
    }

    #[must_use]
    pub fn listener_stats(&self, event: EventType) -> ListenerStats {
        self.node
            .borrow()
            .stats
            .get(&event)
            .copied()
            .unwrap_or_default()
    }
}

impl Element for HeadlessElement {
    fn tag_name(&self) -> String {
        self.node.borrow().tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.node
            .borrow()
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn text_content(&self) -> String {
        self.node.borrow().text.clone()
    }

    fn set_text_content(&self, text: &str) {
        let mut node = self.node.borrow_mut();
        node.text = text.to_owned();
        node.html = v_htmlescape::escape(text).to_string();
    }

    fn inner_html(&self) -> String {
        self.node.borrow().html.clone()
    }

    fn set_inner_html(&self, html: &str) {
        let mut node = self.node.borrow_mut();
        node.html = html.to_owned();
        node.text = strip_tags(html);
    }

    fn value(&self) -> String {
        self.node.borrow().value.clone()
    }

    fn set_value(&self, value: &str) {
        self.node.borrow_mut().value = value.to_owned();
    }

    fn checked(&self) -> bool {
        self.node.borrow().checked
    }

    fn set_checked(&self, checked: bool) {
        self.node.borrow_mut().checked = checked;
    }

    fn set_style(&self, property: &str, value: &str) {
        self.node
            .borrow_mut()
            .style
            .insert(property.to_owned(), value.to_owned());
    }

    fn add_listener(&self, event: EventType, listener: &Listener) {
        let mut node = self.node.borrow_mut();
        if node
            .listeners
            .iter()
            .any(|(kind, existing)| *kind == event && existing.same(listener))
        {
            return;
        }
        node.listeners.push((event, listener.clone()));
        let stats = node.stats.entry(event).or_default();
        stats.attached += 1;
        stats.added += 1;
    }

    fn remove_listener(&self, event: EventType, listener: &Listener) {
        let mut node = self.node.borrow_mut();
        let Some(pos) = node
            .listeners
            .iter()
            .position(|(kind, existing)| *kind == event && existing.same(listener))
        else {
            return;
        };
        node.listeners.remove(pos);
        let stats = node.stats.entry(event).or_default();
        stats.attached -= 1;
        stats.removed += 1;
    }
}

// ---------------------------------------------------------------------------
// HeadlessDocument
// ---------------------------------------------------------------------------

/// A flat, ordered collection of elements. Clones share the document.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    elements: Rc<RefCell<Vec<HeadlessElement>>>,
}

impl HeadlessDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element` and return a handle to it.
    pub fn append(&self, element: HeadlessElement) -> HeadlessElement {
        self.elements.borrow_mut().push(element.clone());
        element
    }

    /// Create and append an element with the given tag.
    pub fn create_element(&self, tag: &str) -> HeadlessElement {
        self.append(HeadlessElement::new(tag))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Like [`Document::find`], but reports unsupported selectors.
    pub fn try_find(&self, selector: &str) -> Result<Option<HeadlessElement>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .elements
            .borrow()
            .iter()
            .find(|element| selector.matches(*element))
            .cloned())
    }

    /// Like [`Document::find_all`], but reports unsupported selectors.
    pub fn try_find_all(&self, selector: &str) -> Result<Vec<HeadlessElement>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .elements
            .borrow()
            .iter()
            .filter(|element| selector.matches(*element))
            .cloned()
            .collect())
    }
}

impl Document for HeadlessDocument {
    type Element = HeadlessElement;

    fn find(&self, selector: &str) -> Option<HeadlessElement> {
        self.try_find(selector).unwrap_or_else(|err| {
            tracing::warn!(message = "document.find", error = %err);
            None
        })
    }

    fn find_all(&self, selector: &str) -> Vec<HeadlessElement> {
        self.try_find_all(selector).unwrap_or_else(|err| {
            tracing::warn!(message = "document.find_all", error = %err);
            Vec::new()
        })
    }
}
