// rill - Memoizing function combinator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Memoization: wrap a pure function with a cache from argument value to
//! result, guaranteeing at-most-one evaluation per distinct argument.
//!
//! The cache key is the full argument value - a tuple for arities above
//! one - compared by value equality. There is no partial memoization:
//! the whole call is the unit of caching, and currying does not get an
//! independent cache per stage. `Option` arguments are ordinary keys, so
//! an absent argument is cacheable like any other value.
//!
//! Recursive definitions are expressed with open recursion: the wrapped
//! function receives the memoized handle and routes self-calls through
//! it, which is how top-down dynamic programming avoids repeating
//! subcomputations.
//!
//! # Reference Cycle Limitation
//!
//! If a memoized function returns a value that captures a clone of its
//! own `Memo` handle, a reference cycle forms through the cache and the
//! wrapper is never deallocated. Most memoized functions return plain
//! values (numbers, strings, collections), so this rarely matters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

type RecFn<A, R> = Rc<dyn Fn(&Memo<A, R>, &A) -> R>;

/// A memoizing wrapper around a function.
///
/// Clones share the underlying cache: a result computed through one
/// handle is returned by every other handle without re-invoking the
/// wrapped function.
pub struct Memo<A, R> {
    /// The wrapped function, given access to the memoized handle for
    /// recursive self-calls
    func: RecFn<A, R>,
    /// Cache: argument value -> result
    cache: Rc<RefCell<HashMap<A, R>>>,
}

impl<A, R> Clone for Memo<A, R> {
    fn clone(&self) -> Self {
        Memo {
            func: Rc::clone(&self.func),
            cache: Rc::clone(&self.cache),
        }
    }
}

impl<A: Eq + Hash + Clone, R: Clone> Memo<A, R> {
    /// Wrap a plain function.
    pub fn new(f: impl Fn(&A) -> R + 'static) -> Self {
        Memo::recursive(move |_, args| f(args))
    }

    /// Wrap a recurrence: `f` receives the memoized handle so that
    /// self-calls hit the cache.
    ///
    /// The recurrence must consume strictly "smaller" arguments on the
    /// recursive path, exactly as an unwrapped recursive function must.
    pub fn recursive(f: impl Fn(&Memo<A, R>, &A) -> R + 'static) -> Self {
        Memo {
            func: Rc::new(f),
            cache: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Apply the wrapped function, evaluating it at most once per
    /// distinct argument value.
    pub fn call(&self, args: A) -> R {
        if let Some(cached) = self.cache.borrow().get(&args) {
            return cached.clone();
        }

        let result = (self.func)(self, &args);

        // Insert-if-absent: a recursive call may have published this key
        // while the computation ran. The first value wins, even if the
        // wrapped function is impure.
        self.cache
            .borrow_mut()
            .entry(args)
            .or_insert(result)
            .clone()
    }

    /// Peek at a cached result without invoking the function.
    pub fn cached(&self, args: &A) -> Option<R> {
        self.cache.borrow().get(args).cloned()
    }

    /// Number of cached argument values.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// True if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

impl<A, R> PartialEq for Memo<A, R> {
    /// Wrappers are equal if they share the same cache.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl<A, R> Eq for Memo<A, R> {}

impl<A, R> fmt::Debug for Memo<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Memo({} cached)", self.cache.borrow().len())
    }
}

/// Turn a function value into its memoizing form, idempotently.
///
/// On a plain closure `memoized()` builds a fresh [`Memo`]; on a `Memo`
/// it returns the same wrapper (same cache), so wrapping twice never
/// stacks a second cache. `is_memoized()` distinguishes the two without
/// consuming the value.
pub trait Memoize<A, R> {
    /// The memoizing form of this function value.
    fn memoized(self) -> Memo<A, R>;

    /// True if this value already caches its results.
    fn is_memoized(&self) -> bool;
}

impl<A, R, F> Memoize<A, R> for F
where
    A: Eq + Hash + Clone,
    R: Clone,
    F: Fn(&A) -> R + 'static,
{
    fn memoized(self) -> Memo<A, R> {
        Memo::new(self)
    }

    fn is_memoized(&self) -> bool {
        false
    }
}

impl<A: Eq + Hash + Clone, R: Clone> Memoize<A, R> for Memo<A, R> {
    fn memoized(self) -> Memo<A, R> {
        self
    }

    fn is_memoized(&self) -> bool {
        true
    }
}
