#![forbid(unsafe_code)]

//! pue public facade crate.
//!
//! Reactive cells ([`Cell`], [`watch`], [`computed`]) and, with the default
//! `dom` feature, the DOM binder that keeps elements in sync with them.
//!
//! ```
//! use pue::prelude::*;
//!
//! let pue = Pue::default();
//! let h1 = HeadlessElement::new("h1");
//! let counter = pue.model().text_content(Some(&h1), 0u32);
//! counter.update(|n| *n += 1);
//! assert_eq!(h1.text_content(), "1");
//! ```

pub use pue_core as core;
#[cfg(feature = "dom")]
pub use pue_dom as dom;

pub use pue_core::{
    Cell, Computed, ReactiveConfig, ReactiveError, WatchOptions, Watchable, WeakCell, computed,
    watch,
};
#[cfg(feature = "dom")]
pub use pue_dom::{Model, ModelConfig, Pue, PueConfig};

pub mod prelude {
    pub use pue_core::{Cell, Computed, WatchOptions, Watchable, computed, watch};

    #[cfg(feature = "dom")]
    pub use pue_dom::{
        Bindable, Document, Element, ElementKind, EventType, HeadlessDocument, HeadlessElement,
        Listener, Model, Pue, PueConfig, Refs, listen,
    };
    #[cfg(all(feature = "dom", target_arch = "wasm32"))]
    pub use pue_dom::{WebDocument, WebElement, on_load};
}
