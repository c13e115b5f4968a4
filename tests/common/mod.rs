// rill - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for rill integration tests.
//!
//! # Available Helpers
//!
//! - [`counter`] - A shared invocation counter for observing how often a
//!   generator or supplier actually runs
//! - [`counting_supplier`] - A supplier that returns 0, 1, 2, ... and
//!   records each invocation in a [`counter`]

use std::cell::Cell;
use std::rc::Rc;

/// A shared invocation counter.
#[allow(dead_code)]
pub fn counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

/// A supplier yielding 0, 1, 2, ...; every invocation bumps `count`.
///
/// Used to verify at-most-once forcing: the counter must advance exactly
/// once per stream position, no matter how many derived views traverse
/// the same nodes.
#[allow(dead_code)]
pub fn counting_supplier(count: &Rc<Cell<usize>>) -> impl FnMut() -> usize + 'static {
    let count = Rc::clone(count);
    move || {
        let next = count.get();
        count.set(next + 1);
        next
    }
}
