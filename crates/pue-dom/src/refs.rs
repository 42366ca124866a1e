#![forbid(unsafe_code)]

//! Named element registry built from `ref="name"` attributes.

use std::collections::BTreeMap;

use crate::element::{Document, Element};

/// Attribute that names an element in the registry.
pub const REF_ATTRIBUTE: &str = "ref";

/// Elements keyed by their `ref` attribute.
#[derive(Debug, Clone)]
pub struct Refs<E> {
    by_name: BTreeMap<String, E>,
}

impl<E> Default for Refs<E> {
    fn default() -> Self {
        Self {
            by_name: BTreeMap::new(),
        }
    }
}

impl<E: Element> Refs<E> {
    /// Scan `document` for `[ref]` elements. When two elements share a
    /// name, the later one in document order wins.
    pub fn collect<D: Document<Element = E>>(document: &D) -> Self {
        let mut refs = Self::default();
        for element in document.find_all("[ref]") {
            if let Some(name) = element.attribute(REF_ATTRIBUTE) {
                refs.insert(name, element);
            }
        }
        tracing::debug!(message = "refs.collect", count = refs.len());
        refs
    }

    /// Register `element` under `name`, returning the element it replaced.
    pub fn insert(&mut self, name: impl Into<String>, element: E) -> Option<E> {
        self.by_name.insert(name.into(), element)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&E> {
        self.by_name.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}
