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

/// This data structure allows range queries and single element modification.
///
/// This tree allocates `2n * size_of::<T>()` bytes of memory.
///
/// A segment tree is a binary tree where each node contains the combination of its children
/// under the operation. The tree is stored in a flat buffer: leaves occupy slots `n..2n` and
/// slot `i` for `1 <= i < n` holds `combine(slot[2i], slot[2i + 1])`. Slot `0` is unused.
///
/// The operation does not have to be commutative: queries keep a left and a right accumulator
/// and join them at the end, so partial aggregates are always combined in index order.
///
/// The layout is inspired by [this blog post](https://codeforces.com/blog/entry/18051).
pub struct SegmentTree<T, O> {
    buf: Vec<T>,
    n: usize,
    op: O,
    #[cfg(feature = "profiler")]
    stats: Stats,
}

impl<T, O> SegmentTree<T, O> {
    /// The number of elements stored in this segment tree. Uses `O(1)` time.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }
    /// Returns `true` if the tree holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
    /// Returns the element at `index`. Uses `O(1)` time.
    #[inline]
    pub fn value_at(&self, index: usize) -> Result<&T> {
        check_index(index, self.n)?;
        Ok(&self.buf[self.n + index])
    }
    /// View the values in this segment tree using a slice. Uses `O(1)` time.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buf[self.n..]
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
}

impl<T: Clone, O: Operation<T>> SegmentTree<T, O> {
    /// Builds a tree from the given values. Uses `O(len)` time.
    pub fn new(values: Vec<T>, op: O) -> Self {
        #[cfg(feature = "profiler")]
        let stats = Stats::default();
        let n = values.len();
        let buf = {
            #[cfg(feature = "profiler")]
            profile_scope!(&stats.build);

            // the first half only reserves room for the inner nodes
            let mut buf = Vec::with_capacity(2 * n);
            buf.extend(values.iter().cloned());
            buf.extend(values);
            for i in (1..n).rev() {
                buf[i] = op.combine(&buf[i << 1], &buf[i << 1 | 1]);
            }
            buf
        };
        log::debug!("built SegmentTree with {n} leaves");
        Self {
            buf,
            n,
            op,
            #[cfg(feature = "profiler")]
            stats,
        }
    }

    /// Set the value at the specified index. Uses `O(log(len))` time.
    pub fn update(&mut self, index: usize, value: T) -> Result<()> {
        check_index(index, self.n)?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.update);
        log::trace!("SegmentTree update at {index}");

        let mut p = index + self.n;
        self.buf[p] = value;
        while p > 1 {
            p >>= 1;
            self.buf[p] = self.op.combine(&self.buf[p << 1], &self.buf[p << 1 | 1]);
        }
        Ok(())
    }

    /// Computes `a[left] * a[left + 1] * ... * a[right]`.
    ///
    /// Clones at most twice and uses `O(log(len))` time.
    pub fn query(&self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, self.n)?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.query);

        let mut resl: Option<T> = None;
        let mut resr: Option<T> = None;
        let mut l = left + self.n;
        let mut r = right + self.n + 1;
        while l < r {
            if l & 1 == 1 {
                resl = Some(match resl {
                    None => self.buf[l].clone(),
                    Some(acc) => self.op.combine_left(acc, &self.buf[l]),
                });
                l += 1;
            }
            if r & 1 == 1 {
                r -= 1;
                resr = Some(match resr {
                    None => self.buf[r].clone(),
                    Some(acc) => self.op.combine_right(&self.buf[r], acc),
                });
            }
            l >>= 1;
            r >>= 1;
        }
        match (resl, resr) {
            (Some(l), Some(r)) => Ok(self.op.combine_left(l, &r)),
            (Some(v), None) | (None, Some(v)) => Ok(v),
            (None, None) => unreachable!("a non-empty range covers at least one node"),
        }
    }
}

forward_capabilities!(SegmentTree, read, write, query);

impl<T: Clone, O: Clone> Clone for SegmentTree<T, O> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            n: self.n,
            op: self.op.clone(),
            #[cfg(feature = "profiler")]
            stats: self.stats.clone(),
        }
    }
}

impl<T: fmt::Debug, O> fmt::Debug for SegmentTree<T, O> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SegmentTree({:?})", self.as_slice())
    }
}

impl<T, O: Default> Default for SegmentTree<T, O> {
    #[inline]
    fn default() -> Self {
        Self {
            buf: Vec::new(),
            n: 0,
            op: Default::default(),
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
        }
    }
}
