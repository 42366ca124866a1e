#![forbid(unsafe_code)]

//! Attach one effect to a set of cells.
//!
//! ```ignore
//! let first = Cell::new("Ada".to_string());
//! let visits = Cell::new(0u32);
//!
//! watch(
//!     &[&first, &visits],
//!     move || println!("changed"),
//!     WatchOptions::immediate(),
//! );
//! ```

use std::rc::Rc;

use super::cell::Cell;

/// A reactive source an effect can be attached to.
///
/// Object safe, so a single `watch` call can span cells of different value
/// types.
pub trait Watchable {
    /// Run `effect` after every change of this source.
    fn add_effect(&self, effect: Rc<dyn Fn()>);
}

impl<T: Clone + PartialEq + 'static> Watchable for Cell<T> {
    fn add_effect(&self, effect: Rc<dyn Fn()>) {
        self.add_observer(move |_| effect());
    }
}

/// Options for [`watch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOptions {
    /// Run the effect once, synchronously, right after registration.
    pub execute: bool,
}

impl WatchOptions {
    /// Options with `execute` set.
    #[must_use]
    pub const fn immediate() -> Self {
        Self { execute: true }
    }
}

/// Register `effect` on every source, in order.
///
/// With `options.execute` the effect also runs once before `watch`
/// returns. An empty `sources` slice does nothing at all: the effect is
/// neither stored nor run.
pub fn watch(sources: &[&dyn Watchable], effect: impl Fn() + 'static, options: WatchOptions) {
    if sources.is_empty() {
        tracing::trace!(message = "watch.no_sources");
        return;
    }
    let effect: Rc<dyn Fn()> = Rc::new(effect);
    for source in sources {
        source.add_effect(Rc::clone(&effect));
    }
    tracing::trace!(
        message = "watch.attach",
        sources = sources.len(),
        execute = options.execute
    );
    if options.execute {
        effect();
    }
}
