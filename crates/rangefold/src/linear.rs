use crate::{
    error::{Result, check_index, check_range},
    ops::Operation,
    traits::forward_capabilities,
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Stores the sequence verbatim and folds every query element by element.
///
/// Queries take `O(right - left)` time and updates `O(1)`. This is the ground truth the other
/// structures are tested against, see also [Checked](crate::Checked).
///
/// # Example
///
/// ```
/// use rangefold::{ops::Max, LinearScan};
///
/// let scan = LinearScan::new(vec![89, 12, 17, 4, 9], Max);
/// assert_eq!(scan.query(1, 3), Ok(17));
/// ```
#[derive(Clone, Debug)]
pub struct LinearScan<T, O> {
    values: Vec<T>,
    op: O,
}

impl<T, O: Default> Default for LinearScan<T, O> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            op: O::default(),
        }
    }
}

impl<T, O> LinearScan<T, O> {
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
    /// The operator this structure was built with
    #[inline]
    pub fn operation(&self) -> &O {
        &self.op
    }
}

impl<T: Clone, O: Operation<T>> LinearScan<T, O> {
    /// Takes ownership of `values`. Uses `O(1)` time.
    pub fn new(values: Vec<T>, op: O) -> Self {
        log::debug!("built LinearScan with {} elements", values.len());
        Self { values, op }
    }
    /// Replaces the element at `index`. Uses `O(1)` time.
    pub fn update(&mut self, index: usize, value: T) -> Result<()> {
        check_index(index, self.len())?;
        log::trace!("LinearScan update at {index}");
        self.values[index] = value;
        Ok(())
    }
    /// Folds `[left, right]` from left to right. Uses `O(right - left)` time.
    pub fn query(&self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, self.len())?;
        let first = self.values[left].clone();
        Ok(self.values[left + 1..=right]
            .iter()
            .fold(first, |acc, v| self.op.combine_left(acc, v)))
    }
}

forward_capabilities!(LinearScan, read, write, query);
