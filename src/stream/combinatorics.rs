// rill - Subset and permutation enumeration
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Combinatorial derivations: k-element subsets, the full powerset in
//! ascending-size order, and permutations by sequential selection.
//!
//! All three produce streams of streams lazily; only the walk the caller
//! consumes is materialized. The sources themselves must be finite.

use std::rc::Rc;

use im::Vector;

use super::Stream;

impl<T: Clone + 'static> Stream<T> {
    /// The size-`k` subsets, in increasing-index order: subsets keeping
    /// the first element come before subsets skipping it.
    ///
    /// `combinations(0)` is a single empty subset; `k >= 1` on an empty
    /// stream yields no subsets at all. The latter is deliberately
    /// asymmetric with [`powerset`], which gives the empty stream one
    /// entry (its empty subset).
    ///
    /// [`powerset`]: Stream::powerset
    pub fn combinations(&self, k: usize) -> Stream<Stream<T>> {
        if k == 0 {
            return Stream::of([Stream::empty()]);
        }
        match self.parts() {
            None => Stream::empty(),
            Some((head, tail)) => {
                let tail = tail.clone();
                let keep_head = {
                    let head = head.clone();
                    tail.force()
                        .combinations(k - 1)
                        .map(move |rest| rest.prepended(head.clone()))
                };
                keep_head.concat_with(Rc::new(move || tail.force().combinations(k)))
            }
        }
    }

    /// Every subset, ordered by ascending size and in increasing-index
    /// order within a size. The powerset of the empty stream is a single
    /// empty subset. Forces the source to count it.
    pub fn powerset(&self) -> Stream<Stream<T>> {
        let n = self.length();
        let source = self.clone();
        Stream::of(0..=n).flat_map(move |k| source.combinations(*k))
    }

    /// Every ordering of the elements, by sequential selection without
    /// replacement from the remaining elements: all orderings starting
    /// with the first element come first, then those starting with the
    /// second, and so on. Duplicate elements are selected once per
    /// position, not once per occurrence.
    ///
    /// The empty stream has no permutations - asymmetric with
    /// [`powerset`], which has exactly one entry for it.
    ///
    /// [`powerset`]: Stream::powerset
    pub fn permutations(&self) -> Stream<Stream<T>>
    where
        T: PartialEq,
    {
        if self.is_empty() {
            return Stream::empty();
        }
        Self::permute(self.iter().collect())
    }

    fn permute(items: Vector<T>) -> Stream<Stream<T>>
    where
        T: PartialEq,
    {
        if items.len() <= 1 {
            return Stream::of([Stream::of(items)]);
        }
        let mut seen: Vec<T> = Vec::new();
        let mut result = Stream::empty();
        for (index, item) in items.iter().enumerate() {
            if seen.iter().any(|s| s == item) {
                continue;
            }
            seen.push(item.clone());
            let mut remaining = items.clone();
            remaining.remove(index);
            let selected = item.clone();
            result = result.concat_with(Rc::new(move || {
                Self::permute(remaining.clone()).map({
                    let selected = selected.clone();
                    move |rest| rest.prepended(selected.clone())
                })
            }));
        }
        result
    }
}
