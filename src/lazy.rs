// rill - Suspended computation cell
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A one-shot lazily evaluated cell with a shared, memoized result.
//!
//! `Lazy<T>` is the suspension primitive underneath [`Stream`]: before the
//! first force it holds a zero-argument computation; after the first force
//! it holds the computed value and the computation is never run again. All
//! clones of a `Lazy` share the same cell, so a result forced through one
//! holder is visible to every other holder.
//!
//! [`Stream`]: crate::stream::Stream

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::ser::{Error as _, Serialize, Serializer};

use crate::error::Error;

/// A lazily evaluated value with at-most-once evaluation.
pub struct Lazy<T> {
    /// The internal state (pending thunk or realized result)
    state: Rc<RefCell<LazyState<T>>>,
}

/// Internal state of a suspended cell
enum LazyState<T> {
    /// Not yet evaluated - contains a zero-arg computation
    Pending(Rc<dyn Fn() -> T>),
    /// Already evaluated - contains the result
    Realized(T),
}

impl<T> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Lazy {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> Lazy<T> {
    /// Create a new suspended cell from a zero-argument computation.
    ///
    /// The computation is a `Fn` rather than a `FnOnce`: a force that
    /// panics leaves the cell pending, and a later force runs the
    /// computation again. Failure is never memoized.
    pub fn new(thunk: impl Fn() -> T + 'static) -> Self {
        Lazy {
            state: Rc::new(RefCell::new(LazyState::Pending(Rc::new(thunk)))),
        }
    }

    /// Create an already-realized cell.
    ///
    /// Used by eager constructors to pre-resolve tails while keeping the
    /// external suspended-tail contract uniform.
    pub fn ready(value: T) -> Self {
        Lazy {
            state: Rc::new(RefCell::new(LazyState::Realized(value))),
        }
    }

    /// Check whether the cell has been realized.
    pub fn is_realized(&self) -> bool {
        matches!(*self.state.borrow(), LazyState::Realized(_))
    }

    /// Tear down the cell, returning the realized value if this handle was
    /// the sole owner. Used by `Stream`'s iterative drop.
    pub(crate) fn take_realized(self) -> Option<T> {
        match Rc::try_unwrap(self.state) {
            Ok(cell) => match cell.into_inner() {
                LazyState::Realized(value) => Some(value),
                LazyState::Pending(_) => None,
            },
            Err(_) => None,
        }
    }
}

impl<T: Clone> Lazy<T> {
    /// Peek at the cached value without forcing.
    pub fn get(&self) -> Option<T> {
        match &*self.state.borrow() {
            LazyState::Pending(_) => None,
            LazyState::Realized(value) => Some(value.clone()),
        }
    }

    /// Force the cell: return the cached value, or run the computation and
    /// cache its result.
    ///
    /// The borrow is released while the computation runs, so the
    /// computation may itself force this cell (corecursive definitions).
    /// If it does, the re-entrant force wins: the value it published is
    /// kept and returned, and the outer result is discarded.
    pub fn force(&self) -> T {
        let thunk = match &*self.state.borrow() {
            LazyState::Realized(value) => return value.clone(),
            LazyState::Pending(thunk) => Rc::clone(thunk),
        };

        let value = thunk();

        let mut state = self.state.borrow_mut();
        match &*state {
            LazyState::Realized(cached) => cached.clone(),
            LazyState::Pending(_) => {
                *state = LazyState::Realized(value.clone());
                value
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Lazy<T> {
    /// Renders the cache state: `Lazy(?)` when pending. This is a
    /// deliberate side-channel read for debugging, not a pure projection
    /// of the value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            LazyState::Pending(_) => write!(f, "Lazy(?)"),
            LazyState::Realized(value) => write!(f, "Lazy({})", value),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            LazyState::Pending(_) => write!(f, "Lazy(?)"),
            LazyState::Realized(value) => write!(f, "Lazy({:?})", value),
        }
    }
}

impl<T> Serialize for Lazy<T> {
    /// A suspended cell never enters a payload: serializing the thunk
    /// would silently capture whatever enclosing state it closes over.
    /// Finite streams are persisted through [`crate::persist::encode`],
    /// which forces them down to plain element values first.
    fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Err(S::Error::custom(
            Error::UnsupportedDirectSerialization { what: "Lazy" }.to_string(),
        ))
    }
}
