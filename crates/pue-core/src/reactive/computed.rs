#![forbid(unsafe_code)]

//! Derived values that re-evaluate eagerly when a source changes.
//!
//! # Design
//!
//! [`Computed<T>`] is a read-only view over a [`Cell<T>`]. The derive
//! function runs once at construction for the initial value, then once per
//! change notification of **each** source, writing its result into the cell.
//! The cell's own equality check means dependents of a computed value only
//! hear about results that actually differ.
//!
//! # Invariants
//!
//! 1. After any source write returns, `get()` equals `derive()` evaluated
//!    over the current source values.
//! 2. The derive function runs exactly once per source change event. Two
//!    source writes mean two evaluations, even inside one logical update.
//! 3. Only the derive function writes the underlying cell.
//!
//! # Failure Modes
//!
//! - **Derive function panics**: propagates out of the source's `set()`
//!   (or out of `computed()` during the first evaluation). The computed value
//!   keeps its previous result.
//! - **Computed dropped**: each source observer holds the derived cell, so
//!   dropping every `Computed` handle does not stop updates. The derived
//!   cell, and anything bound to it, lives as long as its sources.

use std::rc::Rc;

use super::cell::Cell;
use super::watch::{WatchOptions, Watchable, watch};
use crate::config::ReactiveConfig;

/// A value derived from one or more reactive sources.
///
/// Cloning a `Computed` creates a new handle to the **same** derived cell.
pub struct Computed<T> {
    cell: Cell<T>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Computed").field(&self.cell).finish()
    }
}

impl<T: Clone + PartialEq + 'static> Computed<T> {
    /// Evaluate `derive` now and again after every change of any of
    /// `sources`.
    pub fn new(derive: impl Fn() -> T + 'static, sources: &[&dyn Watchable]) -> Self {
        Self::with_config(derive, sources, &ReactiveConfig::default())
    }

    /// Like [`new`](Self::new), with the derived cell governed by `config`.
    pub fn with_config(
        derive: impl Fn() -> T + 'static,
        sources: &[&dyn Watchable],
        config: &ReactiveConfig,
    ) -> Self {
        let derive: Rc<dyn Fn() -> T> = Rc::new(derive);
        let cell = Cell::with_config(derive(), config);
        cell.retain(Rc::new(Rc::clone(&derive)));

        for source in sources {
            let target = cell.clone();
            let derive = Rc::downgrade(&derive);
            watch(
                &[*source],
                move || {
                    if let Some(derive) = derive.upgrade() {
                        target.set(derive());
                    }
                },
                WatchOptions::default(),
            );
        }

        Self { cell }
    }

    /// Current derived value.
    #[must_use]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    /// Access the current derived value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }

    /// Number of times the derived value actually changed.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    /// The underlying cell, for attaching observers or binding to the DOM.
    /// Writing to it directly breaks invariant 3.
    #[must_use]
    pub fn cell(&self) -> &Cell<T> {
        &self.cell
    }
}

impl<T: Clone + PartialEq + 'static> Watchable for Computed<T> {
    fn add_effect(&self, effect: Rc<dyn Fn()>) {
        self.cell.add_effect(effect);
    }
}

/// Build a [`Computed`] from `derive` and its `sources`.
pub fn computed<T: Clone + PartialEq + 'static>(
    derive: impl Fn() -> T + 'static,
    sources: &[&dyn Watchable],
) -> Computed<T> {
    Computed::new(derive, sources)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
