use crate::error::Result;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Structures that know how many elements they hold
pub trait Length {
    /// Current number of elements
    fn len(&self) -> usize;

    /// Returns `true` if the structure holds no elements
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Structures that can read back a single element
pub trait ValueAt<T>: Length {
    /// Returns the element at `index`.
    ///
    /// Fails with [Error::Empty](crate::Error::Empty) on an empty structure and with
    /// [Error::IndexOutOfBounds](crate::Error::IndexOutOfBounds) when `index >= len`.
    fn value_at(&self, index: usize) -> Result<&T>;

    /// Reconstructs the current sequence in index order
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        (0..self.len())
            .filter_map(|i| self.value_at(i).ok().cloned())
            .collect()
    }
}

/// Structures that support replacing a single element
pub trait Update<T> {
    /// Replaces the element at `index` with `value` and restores every aggregate that covers it.
    fn update(&mut self, index: usize, value: T) -> Result<()>;
}

/// Structures that answer range-fold queries
pub trait RangeQuery<T> {
    /// Returns `combine(seq[left], combine(seq[left + 1], ..., seq[right]))` evaluated from
    /// left to right over the inclusive range `[left, right]`.
    ///
    /// Fails with [Error::Empty](crate::Error::Empty) on an empty structure and with
    /// [Error::InvalidRange](crate::Error::InvalidRange) when `left > right` or
    /// `right >= len`.
    fn query(&self, left: usize, right: usize) -> Result<T>;
}

/// Implements the capability traits by forwarding to inherent methods of the same name.
macro_rules! forward_capabilities {
    ($name:ident, read) => {
        impl<T, O> $crate::Length for $name<T, O> {
            #[inline]
            fn len(&self) -> usize {
                $name::len(self)
            }
        }
        impl<T, O> $crate::ValueAt<T> for $name<T, O> {
            #[inline]
            fn value_at(&self, index: usize) -> $crate::Result<&T> {
                $name::value_at(self, index)
            }
        }
    };
    ($name:ident, read, query) => {
        forward_capabilities!($name, read);
        impl<T: Clone, O: $crate::Operation<T>> $crate::RangeQuery<T> for $name<T, O> {
            #[inline]
            fn query(&self, left: usize, right: usize) -> $crate::Result<T> {
                $name::query(self, left, right)
            }
        }
    };
    ($name:ident, read, write, query) => {
        forward_capabilities!($name, read, query);
        impl<T: Clone, O: $crate::Operation<T>> $crate::Update<T> for $name<T, O> {
            #[inline]
            fn update(&mut self, index: usize, value: T) -> $crate::Result<()> {
                $name::update(self, index, value)
            }
        }
    };
}

pub(crate) use forward_capabilities;
