#![forbid(unsafe_code)]

//! Reactive primitives for pue.
//!
//! - [`Cell`]: a shared value holder that intercepts writes and fans the new
//!   value out to its observers.
//! - [`watch`]: attaches one zero-argument effect to any number of cells,
//!   optionally running it once right away.
//! - [`Computed`]: a cell whose value is re-derived from its sources every
//!   time one of them changes.
//!
//! # Architecture
//!
//! `Cell<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Observers are stored as `Rc` callbacks and live as long as the cell; there
//! is no unsubscribe. The cell borrow is released before observers run, so an
//! observer may read or write any cell, including the one notifying it.
//!
//! `Computed<T>` owns its derive function through its own cell. Each source
//! observer holds the derived cell, so a derived value lives as long as its
//! sources even when no `Computed` handle is left.
//!
//! # Invariants
//!
//! 1. Writing a value equal to the current one is a no-op (no version bump,
//!    no notifications).
//! 2. A changing write notifies every observer, in registration order, before
//!    it returns.
//! 3. Notifications are never batched: N source writes mean N recomputations
//!    of each dependent `Computed`.
//! 4. Nested writes to one cell are bounded by
//!    [`ReactiveConfig::max_notify_depth`](crate::ReactiveConfig).

pub mod cell;
pub mod computed;
pub mod watch;

pub use cell::{Cell, WeakCell};
pub use computed::{Computed, computed};
pub use watch::{WatchOptions, Watchable, watch};
