#![forbid(unsafe_code)]

//! Cell-to-element binding.
//!
//! [`Model`] wires a [`Cell`] to one element property:
//!
//! | binder           | direction     | element property                  |
//! |------------------|---------------|-----------------------------------|
//! | `text_content`   | cell → DOM    | `textContent`                     |
//! | `inner_html`     | cell → DOM    | `innerHTML` (not sanitized)       |
//! | `value`          | cell ↔ DOM    | `checked` or `value`, by kind     |
//!
//! Every binder accepts an existing cell or a raw value (wrapped in a new
//! cell) and returns the cell it bound, so callers that passed a raw value
//! can still write to it.
//!
//! # Invariants
//!
//! 1. After any cell write returns, a bound element shows the cell's value.
//! 2. After a user edit, the cell holds the parsed edit, unless parsing
//!    failed, in which case the cell is unchanged.
//! 3. A text input never has more than one binder listener attached per
//!    binding, however many times the cell changes.
//!
//! # Failure Modes
//!
//! - **No element**: nothing is bound; the cell is still returned.
//! - **Element kind the `value` binder does not handle**: nothing is bound.
//! - **Unparsable user edit**: logged at `warn`, cell left alone.
//! - **Runaway write cycle from a user edit**: logged at `warn`, the edit
//!   stops at the cell's depth limit.
//!
//! Bindings have no teardown. A binding keeps its element and cell alive
//! for as long as the element's listeners are reachable.

use std::env;

use pue_core::{Cell, ReactiveConfig, WatchOptions, watch};

use crate::bindable::{Bindable, IntoCell};
use crate::element::{Element, ElementKind};
use crate::error::Result;
use crate::event::{EventType, Listener, listen};

/// Environment variable overriding [`ModelConfig::relisten_on_change`].
pub const RELISTEN_ON_CHANGE_ENV: &str = "PUE_RELISTEN_ON_CHANGE";

/// Binder behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    /// Re-install a text input's `input` listener on every cell change
    /// (detach, then attach the same listener). When `false`, the listener
    /// is attached once at bind time.
    /// Default: true.
    pub relisten_on_change: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            relisten_on_change: true,
        }
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ModelConfig {
    #[must_use]
    pub fn with_relisten_on_change(mut self, relisten: bool) -> Self {
        self.relisten_on_change = relisten;
        self
    }

    /// Defaults overridden by `PUE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `PUE_*`
    /// keys. Unparsable values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(val) = lookup(RELISTEN_ON_CHANGE_ENV)
            && let Some(relisten) = parse_flag(&val)
        {
            config.relisten_on_change = relisten;
        }
        config
    }
}

/// The DOM binder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Model {
    config: ModelConfig,
    reactive: ReactiveConfig,
}

impl Model {
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            reactive: ReactiveConfig::default(),
        }
    }

    /// Config for cells the binder creates from raw values.
    #[must_use]
    pub fn with_reactive_config(mut self, reactive: ReactiveConfig) -> Self {
        self.reactive = reactive;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Keep `element.textContent` equal to the cell's text, starting now.
    pub fn text_content<E: Element, T: Bindable>(
        &self,
        element: Option<&E>,
        source: impl IntoCell<T>,
    ) -> Cell<T> {
        let cell = source.into_cell(&self.reactive);
        if let Some(element) = element {
            bind_one_way(element, &cell, "textContent", |el: &E, text: &str| {
                el.set_text_content(text);
            });
        }
        cell
    }

    /// Keep `element.innerHTML` equal to the cell's text, starting now.
    ///
    /// The text is inserted as markup, unescaped. Never bind a cell that can
    /// hold untrusted input.
    pub fn inner_html<E: Element, T: Bindable>(
        &self,
        element: Option<&E>,
        source: impl IntoCell<T>,
    ) -> Cell<T> {
        let cell = source.into_cell(&self.reactive);
        if let Some(element) = element {
            bind_one_way(element, &cell, "innerHTML", |el: &E, text: &str| {
                el.set_inner_html(text);
            });
        }
        cell
    }

    /// Two-way bind a form control.
    ///
    /// - checkbox: `checked` follows the cell's truthiness immediately; a
    ///   `change` event writes `T::from_checked` back.
    /// - text or password input: `value` shows the cell's text immediately;
    ///   an `input` event parses the field back into the cell.
    /// - anything else: no binding.
    pub fn value<E: Element, T: Bindable>(
        &self,
        element: Option<&E>,
        source: impl IntoCell<T>,
    ) -> Cell<T> {
        let cell = source.into_cell(&self.reactive);
        let Some(element) = element else {
            return cell;
        };
        match element.kind() {
            ElementKind::Checkbox => bind_checkbox(element, &cell),
            ElementKind::TextLike => bind_text_input(element, &cell, self.config),
            ElementKind::Unsupported => {
                tracing::debug!(
                    message = "model.unsupported",
                    tag = %element.tag_name(),
                    input_type = %element.attribute("type").unwrap_or_default()
                );
            }
        }
        cell
    }
}

fn bind_one_way<E: Element, T: Bindable>(
    element: &E,
    cell: &Cell<T>,
    property: &'static str,
    write: fn(&E, &str),
) {
    let target = element.clone();
    let source = cell.downgrade();
    watch(
        &[cell],
        move || {
            if let Some(cell) = source.upgrade() {
                write(&target, &cell.with(Bindable::to_text));
            }
        },
        WatchOptions::immediate(),
    );
    tracing::debug!(message = "model.bind", property, tag = %element.tag_name());
}

fn bind_checkbox<E: Element, T: Bindable>(element: &E, cell: &Cell<T>) {
    let listener = {
        let (el, cell) = (element.clone(), cell.clone());
        Listener::new(move || {
            if let Err(err) = cell.try_set(T::from_checked(el.checked())) {
                tracing::warn!(message = "model.edit_rejected", error = %err);
            }
        })
    };
    listen(std::slice::from_ref(element), EventType::Change, &listener);

    element.set_checked(cell.with(Bindable::is_truthy));
    let target = element.clone();
    let source = cell.downgrade();
    watch(
        &[cell],
        move || {
            if let Some(cell) = source.upgrade() {
                target.set_checked(cell.with(Bindable::is_truthy));
            }
        },
        WatchOptions::default(),
    );
    tracing::debug!(message = "model.bind", property = "checked", tag = %element.tag_name());
}

fn bind_text_input<E: Element, T: Bindable>(element: &E, cell: &Cell<T>, config: ModelConfig) {
    let listener = {
        let (el, cell) = (element.clone(), cell.clone());
        Listener::new(move || {
            let text = el.value();
            if let Err(err) = apply_user_edit(&cell, &text) {
                tracing::warn!(message = "model.parse_failed", input = %text, error = %err);
            }
        })
    };

    element.set_value(&cell.with(Bindable::to_text));
    listen(std::slice::from_ref(element), EventType::Input, &listener);

    let target = element.clone();
    let source = cell.downgrade();
    let relisten = config.relisten_on_change;
    watch(
        &[cell],
        move || {
            let Some(cell) = source.upgrade() else {
                return;
            };
            target.set_value(&cell.with(Bindable::to_text));
            if relisten {
                listen(std::slice::from_ref(&target), EventType::Input, &listener);
                tracing::trace!(message = "model.listen", listener = listener.id());
            }
        },
        WatchOptions::default(),
    );
    tracing::debug!(
        message = "model.bind",
        property = "value",
        tag = %element.tag_name(),
        relisten
    );
}

/// Parse `text` and store it. Returns whether the cell changed.
fn apply_user_edit<T: Bindable>(cell: &Cell<T>, text: &str) -> Result<bool> {
    let value = T::from_text(text)?;
    Ok(cell.try_set(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessElement;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    fn model() -> Model {
        Model::default()
    }

    // ── textContent / innerHTML ──────────────────────────────────────

    #[test]
    fn text_content_shows_initial_and_live_value() {
        let h1 = HeadlessElement::new("h1");
        let counter = model().text_content(Some(&h1), 0i32);
        assert_eq!(h1.text_content(), "0");

        counter.set(1);
        assert_eq!(h1.text_content(), "1");
        counter.update(|n| *n += 41);
        assert_eq!(h1.text_content(), "42");
    }

    #[test]
    fn text_content_binds_existing_cell() {
        let p = HeadlessElement::new("p");
        let name = Cell::new(String::from("Ada"));
        let bound = model().text_content(Some(&p), &name);
        assert!(bound.ptr_eq(&name));

        name.set(String::from("Grace"));
        assert_eq!(p.text_content(), "Grace");
    }

    #[test]
    fn text_content_escapes_markup() {
        let p = HeadlessElement::new("p");
        model().text_content(Some(&p), "<b>hi</b>");
        assert_eq!(p.text_content(), "<b>hi</b>");
        assert!(p.inner_html().starts_with("&lt;b&gt;hi&lt;"));
    }

    #[test]
    fn inner_html_inserts_markup_verbatim() {
        let div = HeadlessElement::new("div");
        let html = model().inner_html(Some(&div), "<em>x</em>");
        assert_eq!(div.inner_html(), "<em>x</em>");
        assert_eq!(div.text_content(), "x");

        html.set(String::from("<strong>y</strong>"));
        assert_eq!(div.inner_html(), "<strong>y</strong>");
    }

    #[test]
    fn computed_can_be_bound() {
        let h1 = HeadlessElement::new("h1");
        let n = Cell::new(2i32);
        let r = n.clone();
        let doubled = pue_core::computed(move || r.get() * 2, &[&n]);
        model().text_content(Some(&h1), &doubled);
        assert_eq!(h1.text_content(), "4");

        n.set(5);
        assert_eq!(h1.text_content(), "10");
    }

    #[test]
    fn bound_computed_outlives_its_handle() {
        let h1 = HeadlessElement::new("h1");
        let n = Cell::new(2i32);
        {
            let r = n.clone();
            let doubled = pue_core::computed(move || r.get() * 2, &[&n]);
            model().text_content(Some(&h1), &doubled);
        }
        assert_eq!(h1.text_content(), "4");

        n.set(5);
        assert_eq!(h1.text_content(), "10");
    }

    #[test]
    fn missing_element_still_returns_cell() {
        let cell = model().text_content(None::<&HeadlessElement>, 7i32);
        assert_eq!(cell.get(), 7);
        assert_eq!(cell.observer_count(), 0);
        let cell = model().value(None::<&HeadlessElement>, true);
        assert!(cell.get());
    }

    #[test]
    fn redundant_bindings_all_update() {
        let h1 = HeadlessElement::new("h1");
        let cell = Cell::new(0i32);
        for _ in 0..3 {
            model().text_content(Some(&h1), &cell);
        }
        assert_eq!(cell.observer_count(), 3);
        cell.set(9);
        assert_eq!(h1.text_content(), "9");
    }

    // ── checkbox ──────────────────────────────────────────────────────

    #[test]
    fn checkbox_syncs_immediately() {
        let boxed = HeadlessElement::input("checkbox");
        model().value(Some(&boxed), true);
        assert!(boxed.checked());

        let off = HeadlessElement::input("checkbox").with_attribute("checked", "");
        model().value(Some(&off), 0u8);
        assert!(!off.checked());
    }

    #[test]
    fn checkbox_two_way_sync() {
        let boxed = HeadlessElement::input("checkbox");
        let check = model().value(Some(&boxed), false);
        assert_eq!(boxed.listener_count(EventType::Change), 1);

        check.set(true);
        assert!(boxed.checked());

        boxed.click();
        assert!(!check.get());
        boxed.click();
        assert!(check.get());
    }

    #[test]
    fn checkbox_writes_numeric_cells() {
        let boxed = HeadlessElement::input("checkbox");
        let flag = model().value(Some(&boxed), 0i32);
        boxed.click();
        assert_eq!(flag.get(), 1);

        flag.set(0);
        assert!(!boxed.checked());
    }

    #[test]
    fn checkbox_feeds_text_binding() {
        let boxed = HeadlessElement::input("checkbox");
        let label = HeadlessElement::new("span");
        let check = model().value(Some(&boxed), false);
        model().text_content(Some(&label), &check);

        boxed.click();
        assert_eq!(label.text_content(), "true");
    }

    // ── text / password ───────────────────────────────────────────────

    #[test]
    fn text_input_shows_initial_value() {
        let field = HeadlessElement::input("text");
        model().value(Some(&field), "hello");
        assert_eq!(field.value(), "hello");
        assert_eq!(field.listener_count(EventType::Input), 1);
    }

    #[test]
    fn text_input_two_way_sync() {
        let field = HeadlessElement::input("text");
        let name = model().value(Some(&field), String::new());

        name.set(String::from("Ada"));
        assert_eq!(field.value(), "Ada");

        field.type_text("Grace");
        assert_eq!(name.get(), "Grace");
    }

    #[test]
    fn password_and_untyped_inputs_are_text_like() {
        for field in [HeadlessElement::input("password"), HeadlessElement::new("input")] {
            let secret = model().value(Some(&field), "s3cret");
            field.type_text("hunter2");
            assert_eq!(secret.get(), "hunter2");
        }
    }

    #[test]
    fn text_input_parses_numbers() {
        let field = HeadlessElement::input("text");
        let age = model().value(Some(&field), 36u32);
        assert_eq!(field.value(), "36");

        field.type_text("37");
        assert_eq!(age.get(), 37);

        field.type_text("3x");
        assert_eq!(age.get(), 37);
        assert_eq!(field.value(), "3x");
    }

    #[test]
    fn relisten_never_stacks_listeners() {
        let field = HeadlessElement::input("text");
        let text = model().value(Some(&field), String::new());
        for word in ["a", "b", "c"] {
            text.set(word.to_string());
        }
        field.type_text("d");

        let stats = field.listener_stats(EventType::Input);
        assert_eq!(stats.attached, 1);
        // One attach at bind time plus one re-attach per change.
        assert_eq!(stats.added, 5);
        assert_eq!(stats.removed, 4);
        assert_eq!(text.get(), "d");
    }

    #[test]
    fn relisten_disabled_attaches_once() {
        let field = HeadlessElement::input("text");
        let text = Model::new(ModelConfig::default().with_relisten_on_change(false))
            .value(Some(&field), String::new());
        for word in ["a", "b", "c"] {
            text.set(word.to_string());
        }
        field.type_text("d");

        let stats = field.listener_stats(EventType::Input);
        assert_eq!(stats.attached, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.removed, 0);
        assert_eq!(text.get(), "d");
    }

    #[test]
    fn two_fields_share_one_cell() {
        let a = HeadlessElement::input("text");
        let b = HeadlessElement::input("text");
        let shared = Cell::new(String::from("x"));
        model().value(Some(&a), &shared);
        model().value(Some(&b), &shared);

        a.type_text("typed");
        assert_eq!(b.value(), "typed");
        assert_eq!(shared.get(), "typed");
    }

    // ── unsupported ───────────────────────────────────────────────────

    #[test]
    fn unsupported_elements_are_left_alone() {
        for el in [
            HeadlessElement::new("textarea"),
            HeadlessElement::new("div"),
            HeadlessElement::input("range"),
        ] {
            let cell = model().value(Some(&el), String::from("v"));
            assert_eq!(el.value(), "");
            assert_eq!(el.listener_count(EventType::Input), 0);
            assert_eq!(el.listener_count(EventType::Change), 0);
            assert_eq!(cell.observer_count(), 0);
        }
    }

    // ── config ────────────────────────────────────────────────────────

    #[test]
    fn config_from_lookup() {
        let off = ModelConfig::from_lookup(|key| {
            (key == RELISTEN_ON_CHANGE_ENV).then(|| "false".to_string())
        });
        assert!(!off.relisten_on_change);

        let garbage = ModelConfig::from_lookup(|_| Some("sometimes".to_string()));
        assert_eq!(garbage, ModelConfig::default());
    }

    #[test]
    fn parse_flag_forms() {
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(""), None);
    }

    // ── tracing ───────────────────────────────────────────────────────

    #[derive(Default)]
    struct ModelTraceState {
        messages: Vec<String>,
    }

    struct ModelTraceCapture {
        state: Arc<Mutex<ModelTraceState>>,
    }

    impl<S> Layer<S> for ModelTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Msg {
                message: Option<String>,
            }
            impl tracing::field::Visit for Msg {
                fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                    if field.name() == "message" {
                        self.message = Some(value.to_string());
                    }
                }

                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                    }
                }
            }
            let mut msg = Msg { message: None };
            event.record(&mut msg);
            if let Some(message) = msg.message {
                self.state
                    .lock()
                    .expect("model trace lock")
                    .messages
                    .push(message);
            }
        }
    }

    #[test]
    fn binder_events_emitted() {
        let state = Arc::new(Mutex::new(ModelTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(ModelTraceCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);

        let field = HeadlessElement::input("number");
        model().value(Some(&field), 1i32);
        let field = HeadlessElement::input("text");
        let n = model().value(Some(&field), 1i32);
        n.set(2);
        field.type_text("nope");

        let snapshot = state.lock().expect("model trace lock");
        for expected in [
            "model.unsupported",
            "model.bind",
            "model.listen",
            "model.parse_failed",
        ] {
            assert!(
                snapshot.messages.iter().any(|m| m == expected),
                "expected {expected} in {:?}",
                snapshot.messages
            );
        }
    }
}
