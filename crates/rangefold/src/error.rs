use core::{fmt, fmt::Display};

/// Result alias used by every fallible operation in this crate
pub type Result<T> = core::result::Result<T, Error>;

/// Error variants that may arise when indexing or querying a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The structure holds no elements
    Empty,
    /// The index is not below the length of the structure
    IndexOutOfBounds {
        /// The rejected index
        index: usize,
        /// Length of the structure
        len: usize,
    },
    /// The range is reversed or reaches past the end of the structure
    InvalidRange {
        /// Inclusive left bound
        left: usize,
        /// Inclusive right bound
        right: usize,
        /// Length of the structure
        len: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty => write!(f, "structure is empty"),
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Error::InvalidRange { left, right, len } => {
                write!(f, "invalid range [{left}, {right}] for length {len}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Error {
    /// Returns `true` if the error represents [Error::Empty]
    pub fn is_empty(&self) -> bool {
        matches!(self, Error::Empty)
    }
    /// Returns `true` if the error represents [Error::IndexOutOfBounds]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Error::IndexOutOfBounds { .. })
    }
    /// Returns `true` if the error represents [Error::InvalidRange]
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Error::InvalidRange { .. })
    }
}

#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if len == 0 {
        Err(Error::Empty)
    } else if index >= len {
        Err(Error::IndexOutOfBounds { index, len })
    } else {
        Ok(())
    }
}

#[inline]
pub(crate) fn check_range(left: usize, right: usize, len: usize) -> Result<()> {
    if len == 0 {
        Err(Error::Empty)
    } else if left > right || right >= len {
        Err(Error::InvalidRange { left, right, len })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_takes_precedence() {
        assert_eq!(check_index(3, 0), Err(Error::Empty));
        assert_eq!(check_range(0, 0, 0), Err(Error::Empty));
    }

    #[test]
    fn bounds() {
        assert!(check_index(2, 3).is_ok());
        let err = check_index(3, 3).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err, Error::IndexOutOfBounds { index: 3, len: 3 });

        assert!(check_range(1, 1, 3).is_ok());
        assert!(check_range(2, 1, 3).unwrap_err().is_invalid_range());
        assert!(check_range(0, 3, 3).unwrap_err().is_invalid_range());
    }

    #[cfg(feature = "std")]
    #[test]
    fn display() {
        use std::string::ToString;
        assert_eq!(Error::Empty.to_string(), "structure is empty");
        assert_eq!(
            Error::InvalidRange {
                left: 4,
                right: 2,
                len: 5
            }
            .to_string(),
            "invalid range [4, 2] for length 5"
        );
    }
}
