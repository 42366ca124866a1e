#![forbid(unsafe_code)]

//! Write-intercepting value holder.
//!
//! # Failure Modes
//!
//! - **Observer panics**: the panic propagates out of `set()`. Observers
//!   after the panicking one are not called for that write; the stored value
//!   has already changed.
//! - **Cyclic writes**: an observer chain that keeps changing the cell it is
//!   reacting to is cut off at `max_notify_depth` nested writes.
//!   `try_set()` reports it, `set()` panics.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::ReactiveConfig;
use crate::error::{ReactiveError, Result};

type Observer<T> = Rc<dyn Fn(&T)>;

struct CellInner<T> {
    value: T,
    observers: Vec<Observer<T>>,
    /// Bumped once per value-changing write.
    version: u64,
    /// Number of fan-outs of this cell currently on the stack.
    depth: usize,
    max_depth: usize,
    /// Values owned on behalf of the cell (a derived cell's compute function).
    retained: Vec<Rc<dyn Any>>,
}

/// A shared, observable value.
///
/// Cloning a `Cell` creates a new handle to the **same** value and observer
/// list. Two independently created cells are always distinct subscription
/// targets, even when they hold equal values.
pub struct Cell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
}

/// Non-owning handle to a [`Cell`].
pub struct WeakCell<T> {
    inner: Weak<RefCell<CellInner<T>>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Clone for WeakCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Cell")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl<T> fmt::Debug for WeakCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakCell")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for Cell<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> WeakCell<T> {
    /// Recover a strong handle if the cell is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Cell<T>> {
        self.inner.upgrade().map(|inner| Cell { inner })
    }
}

/// Decrements the fan-out depth when a notification pass ends, including
/// when an observer unwinds.
struct DepthGuard<'a, T> {
    inner: &'a RefCell<CellInner<T>>,
}

impl<T> Drop for DepthGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.depth = inner.depth.saturating_sub(1);
        }
    }
}

impl<T: Clone + PartialEq + 'static> Cell<T> {
    /// Create a cell with the default [`ReactiveConfig`].
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_config(value, &ReactiveConfig::default())
    }

    /// Create a cell governed by `config`.
    #[must_use]
    pub fn with_config(value: T, config: &ReactiveConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellInner {
                value,
                observers: Vec::new(),
                version: 0,
                depth: 0,
                max_depth: config.max_notify_depth.max(1),
                retained: Vec::new(),
            })),
        }
    }

    /// Current value (cloned).
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if `f` writes to this same cell (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store `value` and notify every observer if it differs from the
    /// current value.
    ///
    /// # Panics
    ///
    /// Panics with [`ReactiveError::NotifyDepthExceeded`] when observers keep
    /// re-writing this cell past the configured depth.
    pub fn set(&self, value: T) {
        if let Err(err) = self.try_set(value) {
            panic!("{err}");
        }
    }

    /// Like [`set`](Self::set), but reports a runaway write cycle instead of
    /// panicking. Returns whether the value changed.
    pub fn try_set(&self, value: T) -> Result<bool> {
        let (observers, value) = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return Ok(false);
            }
            if inner.depth >= inner.max_depth {
                tracing::error!(
                    message = "cell.depth_exceeded",
                    depth = inner.depth,
                    limit = inner.max_depth
                );
                return Err(ReactiveError::NotifyDepthExceeded {
                    depth: inner.depth,
                    limit: inner.max_depth,
                });
            }
            inner.value = value.clone();
            inner.version += 1;
            inner.depth += 1;
            tracing::trace!(
                message = "cell.write",
                version = inner.version,
                observers = inner.observers.len(),
                depth = inner.depth
            );
            (inner.observers.clone(), value)
        };

        let _guard = DepthGuard { inner: &self.inner };
        for observer in &observers {
            observer(&value);
        }
        Ok(true)
    }

    /// Modify the value in place, then notify as [`set`](Self::set) would.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Append an observer. No deduplication: adding the same logic twice
    /// runs it twice per change. Observers added while this cell is
    /// notifying are first called on the next change.
    pub fn add_observer(&self, observer: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().observers.push(Rc::new(observer));
    }

    /// Number of attached observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Non-owning handle, used by observers that must not keep the cell
    /// alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakCell<T> {
        WeakCell {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Keep `value` alive for as long as this cell is.
    pub(crate) fn retain(&self, value: Rc<dyn Any>) {
        self.inner.borrow_mut().retained.push(value);
    }
}
