#![forbid(unsafe_code)]

//! The element surface the binder needs, independent of any DOM backend.

use crate::event::{EventType, Listener};

/// How the `value` binder treats an element.
///
/// Classification uses the lowercase tag name and the `type` attribute, the
/// same inputs a browser uses to pick an `<input>`'s behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<input type="checkbox">`: synced through `checked`.
    Checkbox,
    /// `<input>` with no type, `type="text"` or `type="password"`: synced
    /// through `value`.
    TextLike,
    /// Anything else; the `value` binder leaves it alone.
    Unsupported,
}

impl ElementKind {
    #[must_use]
    pub fn classify(tag_name: &str, input_type: Option<&str>) -> Self {
        if !tag_name.eq_ignore_ascii_case("input") {
            return Self::Unsupported;
        }
        match input_type.map(str::trim) {
            None | Some("") => Self::TextLike,
            Some(kind) if kind.eq_ignore_ascii_case("text") => Self::TextLike,
            Some(kind) if kind.eq_ignore_ascii_case("password") => Self::TextLike,
            Some(kind) if kind.eq_ignore_ascii_case("checkbox") => Self::Checkbox,
            Some(_) => Self::Unsupported,
        }
    }
}

/// A DOM element handle.
///
/// Handles are cheap to clone and all clones address the same node, so every
/// method takes `&self`. Properties an element does not have read as empty
/// (or `false`) and ignore writes.
pub trait Element: Clone + 'static {
    /// Lowercase tag name (`"input"`, `"h1"`).
    fn tag_name(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    fn text_content(&self) -> String;

    fn set_text_content(&self, text: &str);

    fn inner_html(&self) -> String;

    /// Replace the element's markup. The string is inserted verbatim.
    fn set_inner_html(&self, html: &str);

    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    fn checked(&self) -> bool;

    fn set_checked(&self, checked: bool);

    fn set_style(&self, property: &str, value: &str);

    /// Register `listener`. Registering a listener that is already attached
    /// for `event` is a no-op.
    fn add_listener(&self, event: EventType, listener: &Listener);

    /// Detach `listener` if attached for `event`.
    fn remove_listener(&self, event: EventType, listener: &Listener);

    fn kind(&self) -> ElementKind {
        ElementKind::classify(&self.tag_name(), self.attribute("type").as_deref())
    }
}

/// Element lookup by CSS selector.
pub trait Document {
    type Element: Element;

    /// First element matching `selector`, if any.
    fn find(&self, selector: &str) -> Option<Self::Element>;

    /// Every element matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Vec<Self::Element>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_inputs() {
        assert_eq!(ElementKind::classify("input", None), ElementKind::TextLike);
        assert_eq!(
            ElementKind::classify("INPUT", Some("Password")),
            ElementKind::TextLike
        );
        assert_eq!(
            ElementKind::classify("input", Some("checkbox")),
            ElementKind::Checkbox
        );
        assert_eq!(
            ElementKind::classify("input", Some("range")),
            ElementKind::Unsupported
        );
    }

    #[test]
    fn classify_non_inputs() {
        assert_eq!(
            ElementKind::classify("textarea", None),
            ElementKind::Unsupported
        );
        assert_eq!(
            ElementKind::classify("div", Some("checkbox")),
            ElementKind::Unsupported
        );
    }
}
