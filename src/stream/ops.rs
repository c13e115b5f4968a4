// rill - Derived stream operations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Derived views and folds over streams.
//!
//! Lazy operations (`map`, `filter`, `zip`, `take`, ...) build new nodes
//! whose tails force the source on demand; they share the source's nodes
//! and caches rather than copying elements. Eager operations
//! (`fold_left`, `reduce`, `rev`, ...) force the source as far as they
//! consume it and are only meaningful on finite streams unless bounded
//! by an earlier `take`-style view.

use std::cell::RefCell;
use std::fmt::{self, Write as _};
use std::rc::Rc;

use im::Vector;

use super::Stream;
use crate::error::{Error, Result};

impl<T: Clone + 'static> Stream<T> {
    // ========================================================================
    // Lazy views
    // ========================================================================

    /// Apply `f` to every element, lazily.
    pub fn map<U: Clone + 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Stream<U> {
        self.map_rc(Rc::new(f))
    }

    fn map_rc<U: Clone + 'static>(&self, f: Rc<dyn Fn(&T) -> U>) -> Stream<U> {
        match self.parts() {
            None => Stream::empty(),
            Some((head, tail)) => {
                let mapped = f(head);
                let tail = tail.clone();
                Stream::cons(mapped, move || tail.force().map_rc(Rc::clone(&f)))
            }
        }
    }

    /// Expand every element into a stream and flatten, lazily. Stays lazy
    /// on infinite sources as long as expansions are demanded one at a
    /// time.
    pub fn flat_map<U: Clone + 'static>(
        &self,
        f: impl Fn(&T) -> Stream<U> + 'static,
    ) -> Stream<U> {
        self.flat_map_rc(Rc::new(f))
    }

    fn flat_map_rc<U: Clone + 'static>(&self, f: Rc<dyn Fn(&T) -> Stream<U>>) -> Stream<U> {
        match self.parts() {
            None => Stream::empty(),
            Some((head, tail)) => {
                let expanded = f(head);
                let tail = tail.clone();
                expanded.concat_with(Rc::new(move || {
                    tail.force().flat_map_rc(Rc::clone(&f))
                }))
            }
        }
    }

    /// Keep elements satisfying `pred`, lazily. Construction advances the
    /// source to the first match; an infinite source with no matching
    /// element diverges.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        self.filter_rc(Rc::new(pred))
    }

    fn filter_rc(&self, pred: Rc<dyn Fn(&T) -> bool>) -> Stream<T> {
        let mut current = self.clone();
        loop {
            let next = match current.parts() {
                None => return Stream::empty(),
                Some((head, tail)) => {
                    if pred(head) {
                        let head = head.clone();
                        let tail = tail.clone();
                        let pred = Rc::clone(&pred);
                        return Stream::cons(head, move || {
                            tail.force().filter_rc(Rc::clone(&pred))
                        });
                    }
                    tail.force()
                }
            };
            current = next;
        }
    }

    /// Pair elements positionally with `other`, stopping at the shorter.
    pub fn zip<U: Clone + 'static>(&self, other: &Stream<U>) -> Stream<(T, U)> {
        match (self.parts(), other.parts()) {
            (Some((h1, t1)), Some((h2, t2))) => {
                let head = (h1.clone(), h2.clone());
                let (t1, t2) = (t1.clone(), t2.clone());
                Stream::cons(head, move || t1.force().zip(&t2.force()))
            }
            _ => Stream::empty(),
        }
    }

    /// Combine elements positionally with `other` through `f`, stopping
    /// at the shorter.
    pub fn zip_with<U: Clone + 'static, V: Clone + 'static>(
        &self,
        other: &Stream<U>,
        f: impl Fn(&T, &U) -> V + 'static,
    ) -> Stream<V> {
        self.zip(other).map(move |(a, b)| f(a, b))
    }

    /// At most the first `n` elements, lazily.
    pub fn take(&self, n: usize) -> Stream<T> {
        if n == 0 {
            return Stream::empty();
        }
        match self.parts() {
            None => Stream::empty(),
            Some((head, tail)) => {
                let head = head.clone();
                let tail = tail.clone();
                Stream::cons(head, move || {
                    // taking nothing further must not force the source
                    if n == 1 {
                        Stream::empty()
                    } else {
                        tail.force().take(n - 1)
                    }
                })
            }
        }
    }

    /// The longest prefix whose elements satisfy `pred`, lazily.
    pub fn take_while(&self, pred: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        self.take_while_rc(Rc::new(pred))
    }

    fn take_while_rc(&self, pred: Rc<dyn Fn(&T) -> bool>) -> Stream<T> {
        match self.parts() {
            None => Stream::empty(),
            Some((head, tail)) => {
                if !pred(head) {
                    return Stream::empty();
                }
                let head = head.clone();
                let tail = tail.clone();
                Stream::cons(head, move || tail.force().take_while_rc(Rc::clone(&pred)))
            }
        }
    }

    /// Elements before the first one satisfying `pred`, lazily.
    pub fn take_until(&self, pred: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        self.take_while(move |t| !pred(t))
    }

    /// Everything after the first `n` elements. Forces `n` tails.
    pub fn drop(&self, n: usize) -> Stream<T> {
        let mut current = self.clone();
        for _ in 0..n {
            match current.uncons() {
                None => return Stream::empty(),
                Some((_, tail)) => current = tail,
            }
        }
        current
    }

    /// Everything from the first element not satisfying `pred` on.
    pub fn drop_while(&self, pred: impl Fn(&T) -> bool) -> Stream<T> {
        let mut current = self.clone();
        loop {
            let next = match current.parts() {
                None => return Stream::empty(),
                Some((head, tail)) => {
                    if !pred(head) {
                        return current.clone();
                    }
                    tail.force()
                }
            };
            current = next;
        }
    }

    /// Everything but the last `n` elements, lazily: the last `n` seen
    /// are buffered, and an element is emitted only once `n` successors
    /// are known to exist. Composes after a terminating view such as
    /// `take_until` even though the source length is unknown up front.
    pub fn drop_right(&self, n: usize) -> Stream<T> {
        if n == 0 {
            return self.clone();
        }
        Self::drop_right_step(self.clone(), Vector::new(), n)
    }

    fn drop_right_step(source: Stream<T>, window: Vector<T>, n: usize) -> Stream<T> {
        let mut source = source;
        let mut window = window;
        while window.len() < n {
            match source.uncons() {
                None => return Stream::empty(),
                Some((head, tail)) => {
                    window.push_back(head);
                    source = tail;
                }
            }
        }
        match source.uncons() {
            // Exactly n elements buffered and nothing follows: all dropped
            None => Stream::empty(),
            Some((head, tail)) => {
                window.push_back(head);
                let front = window
                    .pop_front()
                    .expect("drop_right window is non-empty for n >= 1");
                Stream::cons(front, move || {
                    Self::drop_right_step(tail.clone(), window.clone(), n)
                })
            }
        }
    }

    /// Concatenate `other` after this stream, lazily.
    pub fn concat(&self, other: Stream<T>) -> Stream<T> {
        self.concat_with(Rc::new(move || other.clone()))
    }

    /// Append a single element after this stream, lazily.
    pub fn append(&self, value: T) -> Stream<T> {
        self.concat_with(Rc::new(move || Stream::of([value.clone()])))
    }

    /// Concatenate a lazily-computed continuation after this stream. The
    /// continuation runs only when the last node's tail is forced.
    pub(crate) fn concat_with(&self, rest: Rc<dyn Fn() -> Stream<T>>) -> Stream<T> {
        match self.parts() {
            None => rest(),
            Some((head, tail)) => {
                let head = head.clone();
                let tail = tail.clone();
                Stream::cons(head, move || {
                    tail.force().concat_with(Rc::clone(&rest))
                })
            }
        }
    }

    /// Repeat a finite stream forever. An empty source stays empty rather
    /// than looping over nothing.
    pub fn cycle(&self) -> Stream<T> {
        if self.is_empty() {
            return Stream::empty();
        }
        let source = self.clone();
        self.concat_with(Rc::new(move || source.cycle()))
    }

    /// Inspect the first element, if any, and return the stream
    /// unchanged.
    pub fn peek(&self, action: impl FnOnce(&T)) -> Stream<T> {
        if let Some((head, _)) = self.parts() {
            action(head);
        }
        self.clone()
    }

    // ========================================================================
    // Corecursive extension
    // ========================================================================

    /// Extend this stream with a view of itself: the result `S` satisfies
    /// `S = self ++ f(S)`, where `f` receives the not-yet-complete result
    /// and may consume only elements positioned strictly before the one
    /// it is currently producing. `f` is invoked once, when the original
    /// prefix is first exhausted; nothing of `f(S)` is forced before
    /// then. An empty stream is returned unchanged, since there is no
    /// element for the self-reference to start from.
    ///
    /// ```
    /// use rill::stream::Stream;
    ///
    /// let fib = Stream::of([1i64, 1]).append_self(|s| {
    ///     s.zip(&s.tail().unwrap()).map(|(a, b)| a + b)
    /// });
    /// assert_eq!(fib.take(10).to_vec(), [1, 1, 2, 3, 5, 8, 13, 21, 34, 55]);
    /// ```
    ///
    /// # Reference Cycle Limitation
    ///
    /// The result's final prefix node closes over a handle to the result
    /// itself, which forms an `Rc` cycle once forced. A corecursive
    /// stream built this way is reclaimed at process exit, not when the
    /// last reference goes away. This is a known limitation.
    pub fn append_self(&self, f: impl Fn(&Stream<T>) -> Stream<T> + 'static) -> Stream<T> {
        if self.is_empty() {
            return Stream::empty();
        }
        let cell: Rc<RefCell<Option<Stream<T>>>> = Rc::new(RefCell::new(None));
        let result = Self::append_self_rebuild(self.clone(), Rc::clone(&cell), Rc::new(f));
        *cell.borrow_mut() = Some(result.clone());
        result
    }

    fn append_self_rebuild(
        prefix: Stream<T>,
        cell: Rc<RefCell<Option<Stream<T>>>>,
        f: Rc<dyn Fn(&Stream<T>) -> Stream<T>>,
    ) -> Stream<T> {
        match prefix.parts() {
            None => Self::append_self_extend(&cell, &f),
            Some((head, tail)) => {
                let head = head.clone();
                let tail = tail.clone();
                Stream::cons(head, move || {
                    let next = tail.force();
                    if next.is_empty() {
                        Self::append_self_extend(&cell, &f)
                    } else {
                        Self::append_self_rebuild(next, Rc::clone(&cell), Rc::clone(&f))
                    }
                })
            }
        }
    }

    fn append_self_extend(
        cell: &Rc<RefCell<Option<Stream<T>>>>,
        f: &Rc<dyn Fn(&Stream<T>) -> Stream<T>>,
    ) -> Stream<T> {
        let whole = cell
            .borrow()
            .clone()
            .expect("append_self cell is filled before any tail can be forced");
        f(&whole)
    }

    // ========================================================================
    // Searches
    // ========================================================================

    /// True if every element of `prefix` matches this stream positionally
    /// from the start.
    pub fn starts_with(&self, prefix: &Stream<T>) -> bool
    where
        T: PartialEq,
    {
        let mut a = self.clone();
        let mut b = prefix.clone();
        loop {
            let (next_a, next_b) = match (a.parts(), b.parts()) {
                (_, None) => return true,
                (None, Some(_)) => return false,
                (Some((ha, ta)), Some((hb, tb))) => {
                    if ha != hb {
                        return false;
                    }
                    (ta.force(), tb.force())
                }
            };
            a = next_a;
            b = next_b;
        }
    }

    /// True if a contiguous run equal to `slice` appears anywhere in this
    /// stream. Terminates on an infinite stream whenever a match exists
    /// at a finite offset; diverges if none does.
    pub fn contains_slice(&self, slice: &Stream<T>) -> bool
    where
        T: PartialEq,
    {
        if slice.is_empty() {
            return true;
        }
        let mut current = self.clone();
        loop {
            if current.starts_with(slice) {
                return true;
            }
            match current.uncons() {
                None => return false,
                Some((_, tail)) => current = tail,
            }
        }
    }

    /// First element satisfying `pred`, forcing until found.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.iter().find(|t| pred(t))
    }

    /// True if every element satisfies `pred`. Forces the whole stream
    /// unless a counterexample appears.
    pub fn for_all(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.iter().all(|t| pred(&t))
    }

    /// True if some element satisfies `pred`.
    pub fn exists(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.iter().any(|t| pred(&t))
    }

    // ========================================================================
    // Eager folds
    // ========================================================================

    /// Fold the stream from the left with an initial accumulator.
    pub fn fold_left<B>(&self, init: B, mut op: impl FnMut(B, T) -> B) -> B {
        let mut acc = init;
        for item in self.iter() {
            acc = op(acc, item);
        }
        acc
    }

    /// Fold the stream from the left using the first element as the
    /// initial accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::EmptySequence`] if the stream is empty.
    pub fn reduce(&self, mut op: impl FnMut(T, T) -> T) -> Result<T> {
        let mut iter = self.iter();
        let mut acc = match iter.next() {
            None => return Err(Error::empty("reduce")),
            Some(first) => first,
        };
        for item in iter {
            acc = op(acc, item);
        }
        Ok(acc)
    }

    /// The stream reversed. Eager; finite streams only.
    pub fn rev(&self) -> Stream<T> {
        let mut out = Stream::empty();
        for item in self.iter() {
            out = out.prepended(item);
        }
        out
    }

    /// Render every element separated by `sep`, forcing the whole
    /// stream.
    pub fn join(&self, sep: &str) -> String
    where
        T: fmt::Display,
    {
        let mut out = String::new();
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            let _ = write!(out, "{}", item);
        }
        out
    }
}
