use core::num::NonZeroUsize;

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

/// Configuration for a [SqrtDecomposition]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SqrtConf {
    /// Elements per block, `floor(sqrt(n))` if not set
    pub block_size: Option<NonZeroUsize>,
}

impl SqrtConf {
    /// Configures a fixed block size
    pub fn with_block_size(mut self, size: NonZeroUsize) -> Self {
        self.block_size = Some(size);
        self
    }
}

/// Splits the sequence into contiguous blocks and keeps one aggregate per block.
///
/// A query folds the partial blocks at both ends element by element and the whole blocks in
/// between by their aggregates. With the default block size of `floor(sqrt(n))` both updates and
/// queries take `O(sqrt(n))` time. The last block may be shorter than the others.
///
/// # Example
///
/// ```
/// use core::num::NonZeroUsize;
/// use rangefold::{ops::Add, SqrtConf, SqrtDecomposition};
///
/// let conf = SqrtConf::default().with_block_size(NonZeroUsize::new(2).unwrap());
/// let mut blocks = SqrtDecomposition::with_conf(vec![1, 2, 3, 4, 5], Add, conf);
/// assert_eq!(blocks.block_count(), 3);
/// assert_eq!(blocks.query(1, 4), Ok(14));
///
/// blocks.update(4, 10).unwrap();
/// assert_eq!(blocks.query(1, 4), Ok(19));
/// ```
#[derive(Clone, Debug)]
pub struct SqrtDecomposition<T, O> {
    values: Vec<T>,
    /// `blocks[b]` folds `values[b * block_size..(b + 1) * block_size]`
    blocks: Vec<T>,
    block_size: usize,
    op: O,
    #[cfg(feature = "profiler")]
    stats: Stats,
}

impl<T, O> SqrtDecomposition<T, O> {
    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }
    /// Returns `true` if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Returns the element at `index`
    #[inline]
    pub fn value_at(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        Ok(&self.values[index])
    }
    /// View the current sequence
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
    /// Elements per block
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }
    /// Number of blocks, including a shorter last one
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
    /// The operator this structure was built with
    #[inline]
    pub fn operation(&self) -> &O {
        &self.op
    }
    /// Latency sketches of this structure
    #[cfg(feature = "profiler")]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

/// Left-to-right fold of a non-empty slice
#[inline]
fn fold<T: Clone, O: Operation<T>>(op: &O, values: &[T]) -> T {
    values[1..]
        .iter()
        .fold(values[0].clone(), |acc, v| op.combine_left(acc, v))
}

impl<T: Clone, O: Operation<T>> SqrtDecomposition<T, O> {
    /// Builds with a block size of `floor(sqrt(n))`. Uses `O(n)` time.
    pub fn new(values: Vec<T>, op: O) -> Self {
        Self::with_conf(values, op, SqrtConf::default())
    }

    /// Builds with the given configuration. Uses `O(n)` time.
    pub fn with_conf(values: Vec<T>, op: O, conf: SqrtConf) -> Self {
        #[cfg(feature = "profiler")]
        let stats = Stats::default();
        let n = values.len();
        let block_size = conf
            .block_size
            .map_or_else(|| n.isqrt().max(1), NonZeroUsize::get);
        let blocks = {
            #[cfg(feature = "profiler")]
            profile_scope!(&stats.build);

            values
                .chunks(block_size)
                .map(|block| fold(&op, block))
                .collect::<Vec<_>>()
        };
        log::debug!(
            "built SqrtDecomposition with {n} elements in {} blocks of {block_size}",
            blocks.len()
        );
        Self {
            values,
            blocks,
            block_size,
            op,
            #[cfg(feature = "profiler")]
            stats,
        }
    }

    /// Replaces the element at `index` and refolds its block. Uses `O(block_size)` time.
    pub fn update(&mut self, index: usize, value: T) -> Result<()> {
        check_index(index, self.len())?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.update);
        log::trace!("SqrtDecomposition update at {index}");

        self.values[index] = value;
        let block = index / self.block_size;
        let start = block * self.block_size;
        let end = (start + self.block_size).min(self.values.len());
        self.blocks[block] = fold(&self.op, &self.values[start..end]);
        Ok(())
    }

    /// Folds `[left, right]` as head elements, whole blocks, then tail elements.
    pub fn query(&self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, self.len())?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.query);

        let first = left / self.block_size;
        let last = right / self.block_size;
        if first == last {
            return Ok(fold(&self.op, &self.values[left..=right]));
        }
        let head_end = (first + 1) * self.block_size;
        let mut acc = fold(&self.op, &self.values[left..head_end]);
        for block in &self.blocks[first + 1..last] {
            acc = self.op.combine_left(acc, block);
        }
        for v in &self.values[last * self.block_size..=right] {
            acc = self.op.combine_left(acc, v);
        }
        Ok(acc)
    }
}

forward_capabilities!(SqrtDecomposition, read, write, query);

impl<T, O: Default> Default for SqrtDecomposition<T, O> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            blocks: Vec::new(),
            block_size: 1,
            op: O::default(),
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
        }
    }
}
