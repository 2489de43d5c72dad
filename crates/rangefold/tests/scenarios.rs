use rangefold::{
    FenwickTree, LinearScan, RangeQuery, SegmentTree, SparseTable, SqrtDecomposition, Treap,
    Update, ValueAt,
    ops::{Max, Min},
};

fn min_scenario<S>(mut s: S)
where
    S: RangeQuery<i32> + Update<i32> + ValueAt<i32>,
{
    assert_eq!(s.query(0, 5), Ok(-5));
    assert_eq!(s.query(0, 2), Ok(4));
    assert_eq!(s.query(4, 5), Ok(2));
    assert_eq!(s.query(3, 3), Ok(-5));

    s.update(3, 7).unwrap();
    assert_eq!(s.value_at(3), Ok(&7));
    assert_eq!(s.query(0, 5), Ok(2));
    assert_eq!(s.to_vec(), [12, 4, 6, 7, 2, 90]);

    assert!(s.query(0, 6).unwrap_err().is_invalid_range());
    assert!(s.query(4, 3).unwrap_err().is_invalid_range());
    assert!(s.value_at(6).unwrap_err().is_out_of_bounds());
    assert!(s.update(6, 0).unwrap_err().is_out_of_bounds());
}

#[test]
fn min_scenario_every_mutable_structure() {
    let values = vec![12, 4, 6, -5, 2, 90];
    min_scenario(LinearScan::new(values.clone(), Min));
    min_scenario(SegmentTree::new(values.clone(), Min));
    min_scenario(FenwickTree::new(values.clone(), Min));
    min_scenario(SqrtDecomposition::new(values.clone(), Min));
    min_scenario(Treap::new(values, Min));
}

#[test]
fn max_scenario_every_structure() {
    let values = vec![89, 12, 17, 4, 9];
    assert_eq!(LinearScan::new(values.clone(), Max).query(1, 3), Ok(17));
    assert_eq!(SparseTable::new(values.clone(), Max).query(1, 3), Ok(17));
    assert_eq!(SegmentTree::new(values.clone(), Max).query(1, 3), Ok(17));
    assert_eq!(FenwickTree::new(values.clone(), Max).query(1, 3), Ok(17));
    assert_eq!(SqrtDecomposition::new(values.clone(), Max).query(1, 3), Ok(17));
    assert_eq!(Treap::new(values, Max).query(1, 3), Ok(17));
}

#[test]
fn single_element() {
    let table = SparseTable::new(vec![42], Min);
    assert_eq!(table.query(0, 0), Ok(42));
    let mut tree = FenwickTree::new(vec![42], Min);
    tree.update(0, -1).unwrap();
    assert_eq!(tree.query(0, 0), Ok(-1));
    let mut treap = Treap::new(vec![42], Min);
    treap.update(0, 3).unwrap();
    assert_eq!(treap.query(0, 0), Ok(3));
}

#[test]
fn empty_structures_report_empty() {
    let scan = LinearScan::new(Vec::<i32>::new(), Min);
    let tree = SegmentTree::new(Vec::<i32>::new(), Min);
    let fenwick = FenwickTree::new(Vec::<i32>::new(), Min);
    let blocks = SqrtDecomposition::new(Vec::<i32>::new(), Min);
    let treap = Treap::new(Vec::<i32>::new(), Min);
    let table = SparseTable::new(Vec::<i32>::new(), Min);
    for err in [
        scan.query(0, 0),
        tree.query(0, 0),
        fenwick.query(0, 0),
        blocks.query(0, 0),
        treap.query(0, 0),
        table.query(0, 0),
    ] {
        assert!(err.unwrap_err().is_empty());
    }
    assert!(treap.value_at(0).unwrap_err().is_empty());
}
