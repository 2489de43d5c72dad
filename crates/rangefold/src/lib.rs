//! rangefold is a family of interchangeable data structures answering range-fold queries
//! over a sequence under a caller-supplied associative operator.
//!
//! Every structure is built from an owned sequence and an [Operation] and answers
//! `query(left, right)`, the left-to-right fold of `combine` over the inclusive range
//! `[left, right]`. The structures trade build, update and query cost differently:
//!
//! | Structure             | Build        | Update         | Query          | Operator            |
//! |-----------------------|--------------|----------------|----------------|---------------------|
//! | [LinearScan]          | O(n)         | O(1)           | O(r - l)       | associative         |
//! | [SparseTable]         | O(n log n)   | -              | O(1)           | associative + [idempotent](ops::Idempotent) |
//! | [SegmentTree]         | O(n)         | O(log n)       | O(log n)       | associative         |
//! | [FenwickTree]         | O(n log n)   | O(log² n)      | O(log n)       | associative         |
//! | [SqrtDecomposition]   | O(n)         | O(√n)          | O(√n)          | associative         |
//! | [Treap]               | O(n)         | O(log n) exp.  | O(log n) exp.  | associative         |
//!
//! Operators need not be commutative, nor have an identity or an inverse.
//!
//! # Example
//!
//! ```
//! use rangefold::{ops::Min, RangeQuery, SegmentTree, Update};
//!
//! let mut tree = SegmentTree::new(vec![12, 4, 6, -5, 2, 90], Min);
//! assert_eq!(tree.query(0, 5), Ok(-5));
//! tree.update(3, 7).unwrap();
//! assert_eq!(tree.query(0, 5), Ok(2));
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(nonstandard_style, missing_docs)]
#![forbid(unsafe_code)]

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Debug-build cross-checking against a linear scan
pub mod checked;
/// Error type and bounds checks shared by every structure
pub mod error;
/// Dual bit-indexed tree
pub mod fenwick;
/// Linear scan baseline
pub mod linear;
/// Combine operators
pub mod ops;
/// Iterative segment tree
pub mod segment_tree;
/// Static sparse table
pub mod sparse_table;
/// Square-root decomposition
pub mod sqrt;
/// Implicit-key treap
pub mod treap;

mod traits;

#[cfg(feature = "profiler")]
mod stats;

pub use checked::Checked;
pub use error::{Error, Result};
pub use fenwick::FenwickTree;
pub use linear::LinearScan;
pub use ops::Operation;
pub use segment_tree::SegmentTree;
pub use sparse_table::SparseTable;
pub use sqrt::{SqrtConf, SqrtDecomposition};
pub use traits::{Length, RangeQuery, Update, ValueAt};
pub use treap::{Treap, TreapConf};

#[cfg(feature = "profiler")]
pub use stats::Stats;
