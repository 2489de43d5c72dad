use core::fmt::Debug;

use crate::{
    Length, LinearScan, RangeQuery, Update, ValueAt,
    error::Result,
    ops::Operation,
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Runs a structure side by side with a [LinearScan] over the same sequence.
///
/// Every read, update and query is applied to both, and in debug builds the results are
/// asserted to be equal. This surfaces operators that break the contract of the structure, such
/// as a non-associative closure, or a non-idempotent one admitted into a
/// [SparseTable](crate::SparseTable). Release builds still keep the shadow in sync but skip the
/// comparison.
///
/// # Example
///
/// ```
/// use rangefold::{ops::Min, Checked, FenwickTree, RangeQuery, Update};
///
/// let mut tree = Checked::new(vec![12, 4, 6, -5, 2, 90], Min, FenwickTree::new);
/// tree.update(3, 7).unwrap();
/// assert_eq!(tree.query(0, 5), Ok(2));
/// ```
#[derive(Clone, Debug)]
pub struct Checked<S, T, O> {
    inner: S,
    shadow: LinearScan<T, O>,
}

impl<S, T: Clone, O: Operation<T> + Clone> Checked<S, T, O> {
    /// Builds the wrapped structure with `build` and a shadow from the same values
    pub fn new(values: Vec<T>, op: O, build: impl FnOnce(Vec<T>, O) -> S) -> Self {
        let shadow = LinearScan::new(values.clone(), op.clone());
        Self {
            inner: build(values, op),
            shadow,
        }
    }
}

impl<S, T, O> Checked<S, T, O>
where
    S: ValueAt<T>,
    T: Clone,
    O: Operation<T>,
{
    /// Wraps an existing structure, copying its current sequence into the shadow
    pub fn wrap(inner: S, op: O) -> Self {
        let shadow = LinearScan::new(inner.to_vec(), op);
        Self { inner, shadow }
    }
}

impl<S, T, O> Checked<S, T, O> {
    /// The wrapped structure
    pub fn inner(&self) -> &S {
        &self.inner
    }
    /// The linear scan kept in sync with the wrapped structure
    pub fn shadow(&self) -> &LinearScan<T, O> {
        &self.shadow
    }
    /// Drops the shadow and returns the wrapped structure
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Length, T, O> Length for Checked<S, T, O> {
    fn len(&self) -> usize {
        debug_assert_eq!(self.inner.len(), self.shadow.len());
        self.inner.len()
    }
}

impl<S, T, O> ValueAt<T> for Checked<S, T, O>
where
    S: ValueAt<T>,
    T: PartialEq + Debug,
{
    fn value_at(&self, index: usize) -> Result<&T> {
        let value = self.inner.value_at(index);
        debug_assert_eq!(value, self.shadow.value_at(index), "value_at({index})");
        value
    }
}

impl<S, T, O> Update<T> for Checked<S, T, O>
where
    S: Update<T>,
    T: Clone + Debug,
    O: Operation<T>,
{
    fn update(&mut self, index: usize, value: T) -> Result<()> {
        let expected = self.shadow.update(index, value.clone());
        let res = self.inner.update(index, value);
        debug_assert_eq!(res, expected, "update({index})");
        res
    }
}

impl<S, T, O> RangeQuery<T> for Checked<S, T, O>
where
    S: RangeQuery<T>,
    T: Clone + PartialEq + Debug,
    O: Operation<T>,
{
    fn query(&self, left: usize, right: usize) -> Result<T> {
        let res = self.inner.query(left, right);
        debug_assert_eq!(res, self.shadow.query(left, right), "query({left}, {right})");
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error, FenwickTree, SegmentTree, SparseTable, SqrtDecomposition, Treap, TreapConf,
        ops::{Add, AssumeIdempotent, Max},
    };

    fn exercise<S>(mut checked: Checked<S, i64, Add>, rng: &mut fastrand::Rng)
    where
        S: Length + ValueAt<i64> + Update<i64> + RangeQuery<i64>,
    {
        let n = checked.len();
        for _ in 0..200 {
            let index = rng.usize(0..n);
            checked.update(index, rng.i64(-1000..=1000)).unwrap();
            let l = rng.usize(0..n);
            let r = rng.usize(l..n);
            assert!(checked.query(l, r).is_ok());
            assert!(checked.value_at(index).is_ok());
        }
        assert_eq!(checked.inner().to_vec(), checked.shadow().as_slice());
        assert!(checked.query(0, n).unwrap_err().is_invalid_range());
    }

    #[test]
    fn mutable_structures_agree() {
        let mut rng = fastrand::Rng::with_seed(99);
        let values: Vec<i64> = (0..73).map(|_| rng.i64(-1000..=1000)).collect();
        exercise(Checked::new(values.clone(), Add, SegmentTree::new), &mut rng);
        exercise(Checked::new(values.clone(), Add, FenwickTree::new), &mut rng);
        exercise(Checked::new(values.clone(), Add, SqrtDecomposition::new), &mut rng);
        exercise(Checked::new(values.clone(), Add, LinearScan::new), &mut rng);
        let treap = Treap::with_conf(values, Add, TreapConf::default().with_seed(4));
        exercise(Checked::wrap(treap, Add), &mut rng);
    }

    #[test]
    fn errors_are_forwarded() {
        let mut checked = Checked::new(Vec::<i64>::new(), Add, SegmentTree::new);
        assert_eq!(checked.query(0, 0), Err(Error::Empty));
        assert_eq!(checked.update(0, 1), Err(Error::Empty));
        assert!(checked.into_inner().is_empty());
    }

    #[test]
    fn idempotent_table_passes() {
        let checked = Checked::new(vec![3, 9, 1, 4, 7], Max, SparseTable::new);
        assert_eq!(checked.query(0, 4), Ok(9));
        assert_eq!(checked.query(2, 4), Ok(7));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "query(0, 2)")]
    fn catches_non_idempotent_table() {
        let op = AssumeIdempotent(Add);
        let checked = Checked::new(vec![1i64, 2, 3, 4, 5], op, SparseTable::new);
        let _ = checked.query(0, 2);
    }
}
