#![forbid(unsafe_code)]

//! Core: reactive cells, change watchers, and derived values.
//!
//! Everything here is single-threaded (`Rc<RefCell<..>>`) and synchronous:
//! a write runs every dependent observer to completion before it returns.
//! DOM wiring lives in `pue-dom`.

pub mod config;
pub mod error;
pub mod reactive;

pub use config::ReactiveConfig;
pub use error::{ReactiveError, Result};
pub use reactive::{Cell, Computed, WatchOptions, Watchable, WeakCell, computed, watch};
