#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rangefold::{
    FenwickTree, LinearScan, SegmentTree, SparseTable, SqrtDecomposition, Treap, TreapConf,
    ops::{Max, Operation},
};

/// Composition of affine maps over wrapping `u32`, associative but not commutative
#[derive(Clone, Copy)]
struct Affine;

impl Operation<(u32, u32)> for Affine {
    fn combine(&self, f: &(u32, u32), g: &(u32, u32)) -> (u32, u32) {
        (
            f.0.wrapping_mul(g.0),
            f.1.wrapping_mul(g.0).wrapping_add(g.1),
        )
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Update(usize, (u32, u32)),
    Query(usize, usize),
}

#[derive(Debug, Arbitrary)]
struct Input {
    seed: u64,
    values: Vec<(u32, u32)>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let Input { seed, values, ops } = input;

    let maxima: Vec<u32> = values.iter().map(|v| v.0).collect();
    let table = SparseTable::new(maxima.clone(), Max);
    let max_scan = LinearScan::new(maxima, Max);

    let mut scan = LinearScan::new(values.clone(), Affine);
    let mut segment = SegmentTree::new(values.clone(), Affine);
    let mut fenwick = FenwickTree::new(values.clone(), Affine);
    let mut blocks = SqrtDecomposition::new(values.clone(), Affine);
    let mut treap = Treap::with_conf(values, Affine, TreapConf::default().with_seed(seed));

    for op in ops {
        match op {
            Op::Update(index, value) => {
                let expected = scan.update(index, value);
                assert_eq!(segment.update(index, value), expected);
                assert_eq!(fenwick.update(index, value), expected);
                assert_eq!(blocks.update(index, value), expected);
                assert_eq!(treap.update(index, value), expected);
            }
            Op::Query(left, right) => {
                let expected = scan.query(left, right);
                assert_eq!(segment.query(left, right), expected);
                assert_eq!(fenwick.query(left, right), expected);
                assert_eq!(blocks.query(left, right), expected);
                assert_eq!(treap.query(left, right), expected);
                assert_eq!(table.query(left, right), max_scan.query(left, right));
            }
        }
    }
});
