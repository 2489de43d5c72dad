use crate::{
    error::{Result, check_index, check_range},
    ops::Idempotent,
    traits::forward_capabilities,
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(feature = "profiler")]
use crate::stats::Stats;
#[cfg(feature = "profiler")]
use rangefold_stats::profile_scope;

/// An immutable table answering range queries in `O(1)` time.
///
/// For every start index `i` and every power `2^k <= n` the table stores the aggregate of the
/// window `[i, i + 2^k - 1]`. A query over `[l, r]` combines the two windows of length
/// `2^floor(log2(r - l + 1))` starting at `l` and ending at `r`. Those windows overlap, which
/// is only harmless when the operator is [idempotent](Idempotent). The bound is enforced on
/// construction; use [AssumeIdempotent](crate::ops::AssumeIdempotent) to admit a closure.
///
/// Build takes `O(n log n)` time and space. There is no update.
///
/// # Example
///
/// ```
/// use rangefold::{ops::Min, SparseTable};
///
/// let table = SparseTable::new(vec![12, 4, 6, -5, 2, 90], Min);
/// assert_eq!(table.query(0, 2), Ok(4));
/// assert_eq!(table.query(0, 5), Ok(-5));
/// ```
#[derive(Clone, Debug)]
pub struct SparseTable<T, O> {
    /// `table[k][i]` is the aggregate of `[i, i + 2^k - 1]`
    table: Vec<Vec<T>>,
    /// `floor_log[len]` is `floor(log2(len))` for `1 <= len <= n`
    floor_log: Vec<usize>,
    op: O,
    #[cfg(feature = "profiler")]
    stats: Stats,
}

impl<T, O> SparseTable<T, O> {
    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.table.first().map_or(0, Vec::len)
    }
    /// Returns `true` if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Returns the element at `index`
    #[inline]
    pub fn value_at(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        Ok(&self.table[0][index])
    }
    /// View the original sequence
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.table.first().map(Vec::as_slice).unwrap_or_default()
    }
    /// Number of precomputed window levels, `floor(log2(n)) + 1` for a non-empty table
    #[inline]
    pub fn levels(&self) -> usize {
        self.table.len()
    }
    /// The operator this table was built with
    #[inline]
    pub fn operation(&self) -> &O {
        &self.op
    }
    /// Latency sketches of this table
    #[cfg(feature = "profiler")]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

impl<T: Clone, O: Idempotent<T>> SparseTable<T, O> {
    /// Builds the table. Uses `O(n log n)` time and space.
    pub fn new(values: Vec<T>, op: O) -> Self {
        #[cfg(feature = "profiler")]
        let stats = Stats::default();
        let n = values.len();
        let (table, floor_log) = {
            #[cfg(feature = "profiler")]
            profile_scope!(&stats.build);

            let mut floor_log = Vec::with_capacity(n + 1);
            floor_log.push(0);
            for len in 1..=n {
                floor_log.push(if len == 1 { 0 } else { floor_log[len / 2] + 1 });
            }

            let mut table = Vec::new();
            if n > 0 {
                table.push(values);
                for k in 1..=floor_log[n] {
                    let half = 1 << (k - 1);
                    let prev: &Vec<T> = &table[k - 1];
                    let level: Vec<T> = (0..=n - (1 << k))
                        .map(|i| op.combine(&prev[i], &prev[i + half]))
                        .collect();
                    table.push(level);
                }
            }
            (table, floor_log)
        };
        log::debug!(
            "built SparseTable with {n} elements over {} levels",
            table.len()
        );
        Self {
            table,
            floor_log,
            op,
            #[cfg(feature = "profiler")]
            stats,
        }
    }

    /// Combines `[left, right]` from two overlapping power-of-two windows. Uses `O(1)` time.
    pub fn query(&self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, self.len())?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.query);

        let len = right - left + 1;
        let k = self.floor_log[len];
        let window = &self.table[k];
        if 1 << k == len {
            Ok(window[left].clone())
        } else {
            Ok(self.op.combine(&window[left], &window[right + 1 - (1 << k)]))
        }
    }
}

forward_capabilities!(SparseTable, read);

impl<T: Clone, O: Idempotent<T>> crate::RangeQuery<T> for SparseTable<T, O> {
    #[inline]
    fn query(&self, left: usize, right: usize) -> Result<T> {
        SparseTable::query(self, left, right)
    }
}

impl<T, O: Default> Default for SparseTable<T, O> {
    fn default() -> Self {
        Self {
            table: Vec::new(),
            floor_log: Vec::new(),
            op: O::default(),
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error, LinearScan,
        ops::{Add, AssumeIdempotent, Max, Min, Or},
    };

    #[test]
    fn min_scenario() {
        let table = SparseTable::new(vec![12, 4, 6, -5, 2, 90], Min);
        assert_eq!(table.query(0, 5), Ok(-5));
        assert_eq!(table.query(0, 2), Ok(4));
        assert_eq!(table.query(4, 5), Ok(2));
        assert_eq!(table.value_at(3), Ok(&-5));
    }

    #[test]
    fn max_scenario() {
        let table = SparseTable::new(vec![89, 12, 17, 4, 9], Max);
        assert_eq!(table.query(1, 3), Ok(17));
    }

    #[test]
    fn levels_and_log() {
        let table = SparseTable::new((0..9u8).collect(), Or);
        assert_eq!(table.levels(), 4);
        assert_eq!(table.floor_log[1..], [0, 1, 1, 2, 2, 2, 2, 3, 3]);
        assert_eq!(table.table[3], [0b0111, 0b1111]);
        assert_eq!(table.query(3, 8), Ok(0b1111));

        let single = SparseTable::new(vec![5], Min);
        assert_eq!(single.levels(), 1);
        assert_eq!(single.query(0, 0), Ok(5));
    }

    #[test]
    fn idempotent_operators_match_scan() {
        let mut rng = fastrand::Rng::with_seed(42);
        for n in 1..70usize {
            let values: Vec<i32> = (0..n).map(|_| rng.i32(-1000..=1000)).collect();
            let table = SparseTable::new(values.clone(), Max);
            let scan = LinearScan::new(values, Max);
            for l in 0..n {
                for r in l..n {
                    assert_eq!(table.query(l, r), scan.query(l, r), "n: {n} l: {l} r: {r}");
                }
            }
        }
    }

    #[test]
    fn non_idempotent_operator_diverges() {
        let values = vec![1i64, 2, 3, 4, 5];
        let table = SparseTable::new(values.clone(), AssumeIdempotent(Add));
        let scan = LinearScan::new(values, Add);

        // power-of-two lengths are covered by a single window
        assert_eq!(table.query(0, 3), scan.query(0, 3));
        assert_eq!(table.query(2, 3), scan.query(2, 3));
        // other lengths count the overlap twice
        assert_eq!(scan.query(0, 2), Ok(6));
        assert_eq!(table.query(0, 2), Ok(8));
        assert_ne!(table.query(0, 4), scan.query(0, 4));
    }

    #[test]
    fn rejects_bad_input() {
        let empty: SparseTable<i32, Min> = SparseTable::default();
        assert!(empty.is_empty());
        assert_eq!(empty.levels(), 0);
        assert_eq!(empty.query(0, 0), Err(Error::Empty));

        let built_empty = SparseTable::new(Vec::<i32>::new(), Min);
        assert_eq!(built_empty.value_at(0), Err(Error::Empty));

        let table = SparseTable::new(vec![1, 2], Min);
        assert!(table.query(1, 0).unwrap_err().is_invalid_range());
        assert!(table.value_at(2).unwrap_err().is_out_of_bounds());
    }
}
