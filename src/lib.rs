// rill - Lazy persistent sequences and memoizing combinators
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # rill
//!
//! Lazy persistent sequences ([`Stream`]) and a memoizing function
//! combinator ([`Memo`]), built around one discipline: compute once,
//! cache forever.
//!
//! A [`Stream`] is an immutable cons list whose tail is a suspended
//! computation ([`Lazy`]). Forcing a tail runs it at most once; the
//! cached result is shared by every derived stream, so infinite
//! sequences - generated by a successor function, a supplier, a
//! constant, or a corecursive reference to the stream under construction
//! - cost only what the caller actually consumes.
//!
//! ```
//! use rill::stream::Stream;
//!
//! let naturals = Stream::iterate(0i64, |n| n + 1);
//! assert_eq!(naturals.take(5).to_vec(), [0, 1, 2, 3, 4]);
//!
//! let fib = Stream::of([1i64, 1])
//!     .append_self(|s| s.zip(&s.tail().unwrap()).map(|(a, b)| a + b));
//! assert_eq!(fib.get(9), Some(55));
//! ```
//!
//! A [`Memo`] wraps a function with a cache keyed by the full argument
//! value, evaluating the function at most once per distinct argument.
//! Recurrences route self-calls through their own memoized handle:
//!
//! ```
//! use rill::memo::Memo;
//!
//! let fib = Memo::recursive(|fib, n: &u32| -> u128 {
//!     if *n < 2 { *n as u128 } else { fib.call(n - 1) + fib.call(n - 2) }
//! });
//! assert_eq!(fib.call(90), 2_880_067_194_370_816_120);
//! ```

pub mod error;
pub mod lazy;
pub mod memo;
pub mod persist;
pub mod stream;

pub use error::{Error, Result};
pub use lazy::Lazy;
pub use memo::{Memo, Memoize};
pub use stream::{Stream, get_print_length, set_print_length};
