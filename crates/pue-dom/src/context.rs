#![forbid(unsafe_code)]

//! Application context.
//!
//! [`Pue`] bundles the configuration every cell and binding of one page
//! should share. Build it once at startup and pass it (or clones of it)
//! to whatever sets up bindings.

use pue_core::{Cell, Computed, ReactiveConfig, WatchOptions, Watchable, watch};

use crate::element::Document;
use crate::model::{Model, ModelConfig};
use crate::refs::{REF_ATTRIBUTE, Refs};

/// Configuration for a [`Pue`] context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PueConfig {
    pub reactive: ReactiveConfig,
    pub model: ModelConfig,
}

impl PueConfig {
    #[must_use]
    pub fn with_reactive(mut self, reactive: ReactiveConfig) -> Self {
        self.reactive = reactive;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Defaults overridden by `PUE_MAX_NOTIFY_DEPTH` and
    /// `PUE_RELISTEN_ON_CHANGE`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            reactive: ReactiveConfig::from_env(),
            model: ModelConfig::from_env(),
        }
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            reactive: ReactiveConfig::from_lookup(&lookup),
            model: ModelConfig::from_lookup(&lookup),
        }
    }
}

/// Shared entry point for cells, watchers and bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pue {
    config: PueConfig,
    model: Model,
}

impl Pue {
    #[must_use]
    pub fn new(config: PueConfig) -> Self {
        tracing::info!(
            message = "pue.init",
            max_notify_depth = config.reactive.max_notify_depth,
            relisten_on_change = config.model.relisten_on_change
        );
        Self {
            config,
            model: Model::new(config.model).with_reactive_config(config.reactive),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(PueConfig::from_env())
    }

    #[must_use]
    pub fn config(&self) -> &PueConfig {
        &self.config
    }

    /// A new cell governed by this context's reactive config.
    #[must_use]
    pub fn cell<T: Clone + PartialEq + 'static>(&self, value: T) -> Cell<T> {
        Cell::with_config(value, &self.config.reactive)
    }

    /// See [`pue_core::watch`].
    pub fn watch(
        &self,
        sources: &[&dyn Watchable],
        effect: impl Fn() + 'static,
        options: WatchOptions,
    ) {
        watch(sources, effect, options);
    }

    /// See [`pue_core::computed`].
    pub fn computed<T: Clone + PartialEq + 'static>(
        &self,
        derive: impl Fn() -> T + 'static,
        sources: &[&dyn Watchable],
    ) -> Computed<T> {
        Computed::with_config(derive, sources, &self.config.reactive)
    }

    /// The DOM binder.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Every `ref`-named element in `document`.
    pub fn collect_refs<D: Document>(&self, document: &D) -> Refs<D::Element> {
        Refs::collect(document)
    }

    /// The first element in `document` whose `ref` attribute is `name`.
    pub fn find_ref<D: Document>(&self, document: &D, name: &str) -> Option<D::Element> {
        document.find(&format!("[{REF_ATTRIBUTE}=\"{name}\"]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::headless::{HeadlessDocument, HeadlessElement};
    use std::rc::Rc;

    #[test]
    fn config_from_lookup_reads_both_layers() {
        let config = PueConfig::from_lookup(|key| match key {
            "PUE_MAX_NOTIFY_DEPTH" => Some("3".to_string()),
            "PUE_RELISTEN_ON_CHANGE" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.reactive.max_notify_depth, 3);
        assert!(!config.model.relisten_on_change);
    }

    #[test]
    fn cells_inherit_depth_limit() {
        let pue = Pue::new(
            PueConfig::default().with_reactive(ReactiveConfig::default().with_max_notify_depth(2)),
        );
        let n = pue.cell(0u32);
        let r = n.clone();
        n.add_observer(move |v| {
            let _ = r.try_set(v + 1);
        });
        assert_eq!(
            n.try_set(1),
            Ok(true),
            "outer write succeeds; the nested chain stops at the limit"
        );
        assert_eq!(n.get(), 2);
    }

    #[test]
    fn computed_and_watch_through_context() {
        let pue = Pue::default();
        let a = pue.cell(1i32);
        let b = pue.cell(2i32);
        let (ra, rb) = (a.clone(), b.clone());
        let sum = pue.computed(move || ra.get() + rb.get(), &[&a, &b]);

        let seen = Rc::new(std::cell::Cell::new(0));
        let (out, reader) = (Rc::clone(&seen), sum.clone());
        pue.watch(
            &[&sum],
            move || out.set(reader.get()),
            WatchOptions::immediate(),
        );
        assert_eq!(seen.get(), 3);

        a.set(10);
        assert_eq!(seen.get(), 12);
    }

    #[test]
    fn model_uses_context_config() {
        let pue = Pue::new(
            PueConfig::default().with_model(ModelConfig::default().with_relisten_on_change(false)),
        );
        assert!(!pue.model().config().relisten_on_change);
    }

    #[test]
    fn refs_and_lookup() {
        let doc = HeadlessDocument::new();
        doc.append(HeadlessElement::new("h1").with_attribute("ref", "counter"));
        let pue = Pue::default();

        assert_eq!(pue.collect_refs(&doc).len(), 1);
        let h1 = pue.find_ref(&doc, "counter").expect("counter ref");
        pue.model().text_content(Some(&h1), 5u8);
        assert_eq!(h1.text_content(), "5");
        assert!(pue.find_ref(&doc, "nope").is_none());
    }
}
