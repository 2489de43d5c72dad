use core::fmt;

use crate::{
    error::{Result, check_index, check_range},
    ops::Operation,
    traits::forward_capabilities,
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(feature = "profiler")]
use crate::stats::Stats;
#[cfg(feature = "profiler")]
use rangefold_stats::profile_scope;

/// A pair of [Fenwick trees][1] answering range queries for any associative operator.
///
/// The classic Fenwick tree only answers prefix queries, and range queries only for
/// invertible operators. This structure keeps two mirrored trees instead:
///
/// - `forward[i]` aggregates the range ending at `i` whose length is the lowest set bit of
///   `i + 1`, that is `[i & (i + 1), i]`.
/// - `counter[i]` aggregates the range starting at `i + 1` with the same bit structure seen
///   from the other end, that is `[i + 1, i | (i + 1)]` clipped to the sequence.
///
/// A query greedily peels aggregates off the right end with `forward` as long as they stay
/// inside the range, and otherwise off the left end with `counter`. Both trees together hold
/// every element exactly once as a single-element node: even indices in `forward`, odd
/// indices in `counter`, so no separate copy of the sequence is kept.
///
/// Build uses `O(n log n)` combines, queries `O(log n)`. Updates recompute each of the
/// `O(log n)` nodes covering the index from its sub-aggregates, `O(log² n)` combines in total.
///
/// # Example
///
/// ```
/// use rangefold::{ops::Min, FenwickTree};
///
/// let mut tree = FenwickTree::new(vec![12, 4, 6, -5, 2, 90], Min);
/// assert_eq!(tree.query(0, 5), Ok(-5));
/// assert_eq!(tree.query(4, 5), Ok(2));
///
/// tree.update(3, 7).unwrap();
/// assert_eq!(tree.value_at(3), Ok(&7));
/// assert_eq!(tree.query(0, 5), Ok(2));
/// ```
///
/// [1]: https://en.wikipedia.org/wiki/Fenwick_tree
pub struct FenwickTree<T, O> {
    forward: Vec<T>,
    counter: Vec<T>,
    op: O,
    #[cfg(feature = "profiler")]
    stats: Stats,
}

/// First index covered by `forward[i]`
#[inline(always)]
fn forward_start(i: usize) -> usize {
    i & (i + 1)
}

/// Next `forward` node whose range also covers `i`
#[inline(always)]
fn forward_parent(i: usize) -> usize {
    i | (i + 1)
}

impl<T, O> FenwickTree<T, O> {
    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }
    /// Returns `true` if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
    /// Returns the element at `index`. Uses `O(1)` time.
    #[inline]
    pub fn value_at(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        Ok(self.leaf(index))
    }
    /// Iterates over the elements in index order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).map(move |i| self.leaf(i))
    }
    /// The operator this tree was built with
    #[inline]
    pub fn operation(&self) -> &O {
        &self.op
    }
    /// Latency sketches of this tree
    #[cfg(feature = "profiler")]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Even indices live in `forward[i]`, odd ones in `counter[i - 1]`.
    #[inline(always)]
    fn leaf(&self, index: usize) -> &T {
        if index & 1 == 0 {
            &self.forward[index]
        } else {
            &self.counter[index ^ 1]
        }
    }
}

impl<T: Clone, O: Operation<T>> FenwickTree<T, O> {
    /// Builds both trees bottom-up. Uses `O(n log n)` time.
    pub fn new(values: Vec<T>, op: O) -> Self {
        #[cfg(feature = "profiler")]
        let stats = Stats::default();
        let n = values.len();
        let (forward, counter) = {
            #[cfg(feature = "profiler")]
            profile_scope!(&stats.build);

            let mut counter: Vec<T> = values.iter().skip(1).cloned().collect();
            let mut forward = values;

            // nodes with `level` trailing ones sit at offset 2^level - 1 with stride 2^(level + 1)
            let mut level = 1;
            while (1usize << level) <= n {
                let mut j = (1 << level) - 1;
                while j < n {
                    for k in 0..level {
                        forward[j] = op.combine(&forward[j ^ (1 << k)], &forward[j]);
                    }
                    j += 1 << (level + 1);
                }
                level += 1;
            }

            let m = counter.len();
            let mut level = 1;
            while (1usize << level) <= m {
                let mut j = (1 << level) - 1;
                while j < m {
                    for k in 0..level {
                        let child = j + (1 << k);
                        if child >= m {
                            break;
                        }
                        counter[j] = op.combine(&counter[j], &counter[child]);
                    }
                    j += 1 << (level + 1);
                }
                level += 1;
            }
            (forward, counter)
        };
        log::debug!("built FenwickTree with {n} elements");
        Self {
            forward,
            counter,
            op,
            #[cfg(feature = "profiler")]
            stats,
        }
    }

    /// Replaces the element at `index` and recomputes every node covering it.
    ///
    /// Walks `forward` upwards and `counter` downwards, `O(log² n)` combines.
    pub fn update(&mut self, index: usize, value: T) -> Result<()> {
        let n = self.len();
        check_index(index, n)?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.update);
        log::trace!("FenwickTree update at {index}");

        if index & 1 == 0 {
            self.forward[index] = value;
        } else {
            self.counter[index ^ 1] = value;
        }

        let mut i = index;
        while i < n {
            if i & 1 == 1 {
                self.refresh_forward(i);
            }
            i = forward_parent(i);
        }

        let mut end = index;
        while end > 0 {
            let j = end - 1;
            if j & 1 == 1 {
                self.refresh_counter(j);
            }
            end = forward_start(j);
        }
        Ok(())
    }

    /// Folds `[left, right]` by shrinking the uncovered range `[lo, hi)` from both ends.
    ///
    /// Right-end pieces are prepended to `tail` and left-end pieces appended to `head`, so the
    /// result is combined in index order. Uses `O(log n)` time.
    pub fn query(&self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, self.len())?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.query);

        let mut head: Option<T> = None;
        let mut tail: Option<T> = None;
        let mut lo = left;
        let mut hi = right + 1;
        while lo < hi {
            let r = hi - 1;
            let start = forward_start(r);
            if start >= lo {
                // prefer the right end while its node stays inside the range
                tail = Some(match tail {
                    None => self.forward[r].clone(),
                    Some(acc) => self.op.combine_right(&self.forward[r], acc),
                });
                hi = start;
            } else {
                // lo > start >= 0, and counter[lo - 1] ends no later than r
                let l = lo - 1;
                head = Some(match head {
                    None => self.counter[l].clone(),
                    Some(acc) => self.op.combine_left(acc, &self.counter[l]),
                });
                lo = forward_parent(l) + 1;
            }
        }
        match (head, tail) {
            (Some(h), Some(t)) => Ok(self.op.combine_left(h, &t)),
            (Some(v), None) | (None, Some(v)) => Ok(v),
            (None, None) => unreachable!("a non-empty range covers at least one node"),
        }
    }

    /// `forward[j] = forward[j ^ 2^(t-1)] * ... * forward[j ^ 1] * a[j]` for odd `j`
    fn refresh_forward(&mut self, j: usize) {
        let mut acc = self.counter[j ^ 1].clone();
        for k in 0..j.trailing_ones() {
            acc = self.op.combine_right(&self.forward[j ^ (1 << k)], acc);
        }
        self.forward[j] = acc;
    }

    /// `counter[j] = a[j + 1] * counter[j + 1] * counter[j + 2] * ...` for odd `j`
    fn refresh_counter(&mut self, j: usize) {
        let mut acc = self.forward[j + 1].clone();
        for k in 0..j.trailing_ones() {
            let child = j + (1 << k);
            if child >= self.counter.len() {
                break;
            }
            acc = self.op.combine_left(acc, &self.counter[child]);
        }
        self.counter[j] = acc;
    }
}

forward_capabilities!(FenwickTree, read, write, query);

impl<T: Clone, O: Clone> Clone for FenwickTree<T, O> {
    fn clone(&self) -> Self {
        Self {
            forward: self.forward.clone(),
            counter: self.counter.clone(),
            op: self.op.clone(),
            #[cfg(feature = "profiler")]
            stats: self.stats.clone(),
        }
    }
}

impl<T: fmt::Debug, O> fmt::Debug for FenwickTree<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("FenwickTree")
            .field(&self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<T, O: Default> Default for FenwickTree<T, O> {
    fn default() -> Self {
        Self {
            forward: Vec::new(),
            counter: Vec::new(),
            op: O::default(),
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
        }
    }
}
