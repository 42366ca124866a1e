#![forbid(unsafe_code)]

//! DOM binding for pue cells.
//!
//! - [`element`]: the [`Element`]/[`Document`] traits every backend
//!   implements, and [`ElementKind`].
//! - [`event`]: [`EventType`], identity-compared [`Listener`]s and the
//!   idempotent [`listen`] helper, plus one `on_*` shorthand per
//!   interaction event.
//! - [`model`]: the binder ([`Model`]).
//! - [`headless`]: an in-memory backend for tests and native hosts.
//! - `web` (wasm32 only): the browser backend.

pub mod bindable;
pub mod context;
pub mod element;
pub mod error;
pub mod event;
pub mod headless;
pub mod model;
pub mod refs;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bindable::{Bindable, IntoCell};
pub use context::{Pue, PueConfig};
pub use element::{Document, Element, ElementKind};
pub use error::{DomError, Result};
pub use event::{EventType, Listener, listen, style};
pub use headless::{HeadlessDocument, HeadlessElement, ListenerStats, Selector};
pub use model::{Model, ModelConfig};
pub use refs::Refs;
#[cfg(target_arch = "wasm32")]
pub use web::{WebDocument, WebElement, on_load};
