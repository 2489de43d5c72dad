//! Combine operators accepted by every structure.
//!
//! A structure is bound to its operator at construction time. The operator is any type
//! implementing [`Operation`]: one of the predefined unit structs in this module, a closure
//! `Fn(&T, &T) -> T`, or a user-defined strategy object.
//!
//! The marker trait [`Idempotent`] gates the [`SparseTable`](crate::SparseTable), whose
//! constant-time query combines two overlapping windows and is therefore only correct when
//! `combine(a, a) == a`.

/// An associative operator over `T`.
///
/// `combine` must be [associative][1], that is `combine(combine(a, b), c) ==
/// combine(a, combine(b, c))`. It does not have to be commutative: every structure folds
/// its elements strictly from left to right. No identity element or inverse is required.
///
/// Associativity cannot be checked at runtime. A non-associative operator silently produces
/// wrong answers, see [`Checked`](crate::Checked) for cross-checking in debug builds.
///
/// Closures implement this trait directly:
///
/// ```
/// use rangefold::{LinearScan, RangeQuery};
///
/// let concat = |a: &String, b: &String| format!("{a}{b}");
/// let words: Vec<String> = ["ab", "cd", "ef"].iter().map(|s| s.to_string()).collect();
/// let scan = LinearScan::new(words, concat);
/// assert_eq!(scan.query(1, 2).unwrap(), "cdef");
/// ```
///
/// [1]: https://en.wikipedia.org/wiki/Associative_property
pub trait Operation<T> {
    /// Combines two adjacent aggregates, `a` covering the range to the left of `b`.
    fn combine(&self, a: &T, b: &T) -> T;

    /// Must return the same as `combine`. Exists so owned accumulators can be reused.
    #[inline]
    fn combine_left(&self, a: T, b: &T) -> T {
        self.combine(&a, b)
    }

    /// Must return the same as `combine`. Exists so owned accumulators can be reused.
    #[inline]
    fn combine_right(&self, a: &T, b: T) -> T {
        self.combine(a, &b)
    }
}

/// Marker trait for operators where `combine(a, a) == a` for every `a`.
///
/// Examples are minimum, maximum, bitwise and, bitwise or, and gcd. Sum is not idempotent.
pub trait Idempotent<T>: Operation<T> {}

impl<T, F> Operation<T> for F
where
    F: Fn(&T, &T) -> T,
{
    #[inline]
    fn combine(&self, a: &T, b: &T) -> T {
        self(a, b)
    }
}

/// Wraps an operator the caller asserts to be idempotent.
///
/// Closures cannot implement [`Idempotent`] themselves, so this wrapper is how an arbitrary
/// operator is admitted into a [`SparseTable`](crate::SparseTable). Wrapping a non-idempotent
/// operator yields wrong answers for ranges whose length is not a power of two.
///
/// ```
/// use rangefold::{ops::AssumeIdempotent, RangeQuery, SparseTable};
///
/// let gcd = |a: &u64, b: &u64| {
///     let (mut a, mut b) = (*a, *b);
///     while b != 0 {
///         (a, b) = (b, a % b);
///     }
///     a
/// };
/// let table = SparseTable::new(vec![12, 18, 24, 36], AssumeIdempotent(gcd));
/// assert_eq!(table.query(0, 3), Ok(6));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AssumeIdempotent<O>(pub O);

impl<T, O: Operation<T>> Operation<T> for AssumeIdempotent<O> {
    #[inline]
    fn combine(&self, a: &T, b: &T) -> T {
        self.0.combine(a, b)
    }
    #[inline]
    fn combine_left(&self, a: T, b: &T) -> T {
        self.0.combine_left(a, b)
    }
    #[inline]
    fn combine_right(&self, a: &T, b: T) -> T {
        self.0.combine_right(a, b)
    }
}

impl<T, O: Operation<T>> Idempotent<T> for AssumeIdempotent<O> {}

/// Each aggregate is the sum of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Add;
/// Each aggregate is the product of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Mul;
/// Each aggregate is the bitwise and of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct And;
/// Each aggregate is the bitwise or of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Or;
/// Each aggregate is the bitwise xor of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Xor;
/// Each aggregate is the minimum of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Min;
/// Each aggregate is the maximum of the range it represents.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Max;

macro_rules! impl_operation_infix {
    ($op:ty, $ty:ty, $combineop:tt, $doc:expr) => {
        impl Operation<$ty> for $op {
            #[doc = $doc]
            #[inline]
            fn combine(&self, a: &$ty, b: &$ty) -> $ty {
                *a $combineop *b
            }
        }
    };
}

macro_rules! impl_operation_prefix {
    ($op:ty, $ty:ty, $combinef:expr, $doc:expr) => {
        impl Operation<$ty> for $op {
            #[doc = $doc]
            #[inline]
            fn combine(&self, a: &$ty, b: &$ty) -> $ty {
                $combinef(*a, *b)
            }
        }
    };
}

macro_rules! impl_integer {
    ($($ty:tt)*) => {$(
        impl_operation_infix!(Add, $ty, +, "Returns the sum.");
        impl_operation_infix!(Mul, $ty, *, "Returns the product.");
        impl_operation_infix!(Xor, $ty, ^, "Returns the bitwise exclusive or.");

        impl_operation_infix!(And, $ty, &, "Returns the bitwise and.");
        impl Idempotent<$ty> for And {}
        impl_operation_infix!(Or, $ty, |, "Returns the bitwise or.");
        impl Idempotent<$ty> for Or {}

        impl_operation_prefix!(Min, $ty, core::cmp::min, "Returns the minimum.");
        impl Idempotent<$ty> for Min {}
        impl_operation_prefix!(Max, $ty, core::cmp::max, "Returns the maximum.");
        impl Idempotent<$ty> for Max {}
    )*};
}

macro_rules! impl_float {
    ($($ty:tt)*) => {$(
        impl_operation_prefix!(Min, $ty, <$ty>::min, "Returns the minimum, ignoring NaN.");
        impl Idempotent<$ty> for Min {}
        impl_operation_prefix!(Max, $ty, <$ty>::max, "Returns the maximum, ignoring NaN.");
        impl Idempotent<$ty> for Max {}
    )*};
}

impl_integer!(u8 u16 u32 u64 u128 usize i8 i16 i32 i64 i128 isize);
impl_float!(f32 f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<T: Clone, O: Operation<T>>(op: &O, values: &[T]) -> T {
        let mut iter = values.iter();
        let first = iter.next().cloned().unwrap();
        iter.fold(first, |acc, v| op.combine_left(acc, v))
    }

    #[test]
    fn predefined_operators() {
        let values = [12i64, 4, 6, -5, 2, 90];
        assert_eq!(fold(&Min, &values), -5);
        assert_eq!(fold(&Max, &values), 90);
        assert_eq!(fold(&Add, &values), 109);
        assert_eq!(fold(&Mul, &[2u32, 3, 4]), 24);
        assert_eq!(fold(&And, &[0b1110u8, 0b0111]), 0b0110);
        assert_eq!(fold(&Or, &[0b1000u8, 0b0001]), 0b1001);
        assert_eq!(fold(&Xor, &[0b1100u8, 0b1010]), 0b0110);
        assert_eq!(fold(&Min, &[1.5f64, -0.5, 3.0]), -0.5);
    }

    #[test]
    fn closures_are_operations() {
        let affine = |f: &(i64, i64), g: &(i64, i64)| (f.0 * g.0, f.1 * g.0 + g.1);
        let (f, g): ((i64, i64), (i64, i64)) = ((2, 1), (3, 4));
        assert_eq!(affine.combine(&f, &g), (6, 7));
        assert_eq!(affine.combine_left(f, &g), (6, 7));
        assert_eq!(affine.combine_right(&f, g), (6, 7));
    }

    #[test]
    fn assume_idempotent_forwards() {
        let op = AssumeIdempotent(|a: &u32, b: &u32| a.max(b).to_owned());
        assert_eq!(op.combine(&3u32, &9), 9);
        assert_eq!(AssumeIdempotent(Min).combine(&3i32, &9), 3);
    }
}
