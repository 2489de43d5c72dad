use core::{cmp::Ordering, fmt};

use smallvec::SmallVec;

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

mod conf;

pub use conf::TreapConf;

/// Inline capacity of the root-to-node path recorded by updates
const PATH_INLINE: usize = 64;

type Path = SmallVec<[usize; PATH_INLINE]>;

#[derive(Clone, Debug)]
struct Node<T> {
    priority: u64,
    value: T,
    /// `left.agg * value * right.agg`
    agg: T,
    /// Number of nodes in this subtree
    size: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// A randomized binary tree keyed implicitly by in-order position.
///
/// Every node carries a random priority and the tree is a min-heap on priorities, which keeps
/// the expected depth logarithmic. Nodes also track their subtree size, from which positions
/// are derived, and the aggregate of their subtree in index order.
///
/// Nodes live in an arena and refer to their children by index. Every traversal is iterative,
/// so a degenerate shape costs time but never stack.
///
/// Priorities come from a [fastrand::Rng]. Pass a seed through [TreapConf] or a generator
/// through [Treap::with_rng] to get a reproducible shape.
///
/// # Example
///
/// ```
/// use rangefold::{ops::Min, Treap, TreapConf};
///
/// let conf = TreapConf::default().with_seed(42);
/// let mut treap = Treap::with_conf(vec![12, 4, 6, -5, 2, 90], Min, conf);
/// assert_eq!(treap.query(0, 5), Ok(-5));
///
/// treap.update(3, 7).unwrap();
/// assert_eq!(treap.query(0, 5), Ok(2));
/// ```
pub struct Treap<T, O> {
    nodes: Vec<Node<T>>,
    root: Option<usize>,
    op: O,
    #[cfg(feature = "profiler")]
    stats: Stats,
}

impl<T, O> Treap<T, O> {
    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.size(self.root)
    }
    /// Returns `true` if there are no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
    /// Returns the element at `index`. Uses `O(log n)` expected time.
    pub fn value_at(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        let mut cur = self.root;
        let mut i = index;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            let left = self.size(node.left);
            match i.cmp(&left) {
                Ordering::Less => cur = node.left,
                Ordering::Equal => return Ok(&node.value),
                Ordering::Greater => {
                    i -= left + 1;
                    cur = node.right;
                }
            }
        }
        unreachable!("subtree sizes cover every checked index")
    }
    /// Iterates over the elements in index order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
            cur: self.root,
        }
    }
    /// Number of nodes on the longest root-to-leaf path, `0` for an empty tree
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|l| (l, depth + 1)));
            stack.extend(node.right.map(|r| (r, depth + 1)));
        }
        max
    }
    /// The operator this tree was built with
    #[inline]
    pub fn operation(&self) -> &O {
        &self.op
    }
    /// Latency sketches of this tree
    #[cfg(feature = "profiler")]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[inline(always)]
    fn size(&self, node: Option<usize>) -> usize {
        node.map_or(0, |id| self.nodes[id].size)
    }
}

/// Recomputes size and aggregate of `id` from its children
#[inline]
fn pull<T: Clone, O: Operation<T>>(nodes: &mut [Node<T>], op: &O, id: usize) {
    let node = &nodes[id];
    let mut agg = node.value.clone();
    let mut size = 1;
    if let Some(l) = node.left {
        agg = op.combine_right(&nodes[l].agg, agg);
        size += nodes[l].size;
    }
    if let Some(r) = node.right {
        agg = op.combine_left(agg, &nodes[r].agg);
        size += nodes[r].size;
    }
    nodes[id].agg = agg;
    nodes[id].size = size;
}

#[cfg(feature = "std")]
impl<T: Clone, O: Operation<T>> Treap<T, O> {
    /// Builds a tree with priorities from a fresh unpredictable generator
    pub fn new(values: Vec<T>, op: O) -> Self {
        Self::with_conf(values, op, TreapConf::default())
    }
}

impl<T: Clone, O: Operation<T>> Treap<T, O> {
    /// Builds a tree with priorities drawn as configured
    pub fn with_conf(values: Vec<T>, op: O, conf: TreapConf) -> Self {
        Self::with_rng(values, op, conf.rng())
    }

    /// Builds a tree in `O(n)` expected time, drawing one priority per element from `rng`.
    ///
    /// The right spine of the tree built so far is kept on a stack. Each new element pops the
    /// spine nodes with a larger priority, adopts them as its left subtree and becomes the new
    /// end of the spine. The remaining spine is linked up at the end.
    pub fn with_rng(values: Vec<T>, op: O, mut rng: fastrand::Rng) -> Self {
        #[cfg(feature = "profiler")]
        let stats = Stats::default();
        let n = values.len();
        let (nodes, root) = {
            #[cfg(feature = "profiler")]
            profile_scope!(&stats.build);

            let mut nodes: Vec<Node<T>> = Vec::with_capacity(n);
            let mut spine: Vec<usize> = Vec::new();
            for value in values {
                let id = nodes.len();
                let priority = rng.u64(..);
                nodes.push(Node {
                    priority,
                    agg: value.clone(),
                    value,
                    size: 1,
                    left: None,
                    right: None,
                });

                let mut adopted = None;
                while let Some(&top) = spine.last() {
                    if nodes[top].priority <= priority {
                        break;
                    }
                    spine.pop();
                    nodes[top].right = adopted;
                    pull(&mut nodes, &op, top);
                    adopted = Some(top);
                }
                nodes[id].left = adopted;
                spine.push(id);
            }

            let mut root = None;
            while let Some(top) = spine.pop() {
                nodes[top].right = root;
                pull(&mut nodes, &op, top);
                root = Some(top);
            }
            (nodes, root)
        };
        let tree = Self {
            nodes,
            root,
            op,
            #[cfg(feature = "profiler")]
            stats,
        };
        log::debug!("built Treap with {n} elements and depth {}", tree.depth());
        tree
    }

    /// Replaces the element at `index` and recomputes the aggregates on its root path.
    ///
    /// The tree shape does not change. Uses `O(log n)` expected time.
    pub fn update(&mut self, index: usize, value: T) -> Result<()> {
        check_index(index, self.len())?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.update);
        log::trace!("Treap update at {index}");

        let mut path = Path::new();
        let mut cur = self.root;
        let mut i = index;
        while let Some(id) = cur {
            path.push(id);
            let node = &self.nodes[id];
            let left = self.size(node.left);
            match i.cmp(&left) {
                Ordering::Less => cur = node.left,
                Ordering::Equal => break,
                Ordering::Greater => {
                    i -= left + 1;
                    cur = node.right;
                }
            }
        }
        let Some(target) = cur else {
            unreachable!("subtree sizes cover every checked index");
        };
        self.nodes[target].value = value;
        for &id in path.iter().rev() {
            pull(&mut self.nodes, &self.op, id);
        }
        Ok(())
    }

    /// Folds `[left, right]` in `O(log n)` expected time.
    ///
    /// Descends to the highest node inside the range. From there the range is that node's value
    /// plus a suffix of its left subtree and a prefix of its right subtree, each assembled from
    /// whole-subtree aggregates along a single path.
    pub fn query(&self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, self.len())?;
        #[cfg(feature = "profiler")]
        profile_scope!(&self.stats.query);

        // `offset` is the index of the first element in the subtree of `cur`
        let mut cur = self.root;
        let mut offset = 0;
        let (split, pos) = loop {
            let Some(id) = cur else {
                unreachable!("a checked range always has a highest node inside it");
            };
            let node = &self.nodes[id];
            let pos = offset + self.size(node.left);
            if right < pos {
                cur = node.left;
            } else if left > pos {
                offset = pos + 1;
                cur = node.right;
            } else {
                break (node, pos);
            }
        };
        if left == offset && right + 1 == offset + split.size {
            return Ok(split.agg.clone());
        }

        // suffix `[left, pos - 1]` of the left subtree, prepended while walking left
        let mut head: Option<T> = None;
        let mut cur = split.left;
        let mut start = offset;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            let at = start + self.size(node.left);
            if left <= at {
                let piece = match node.right {
                    Some(r) => self.op.combine(&node.value, &self.nodes[r].agg),
                    None => node.value.clone(),
                };
                head = Some(match head {
                    None => piece,
                    Some(acc) => self.op.combine_left(piece, &acc),
                });
                if left == at {
                    break;
                }
                cur = node.left;
            } else {
                start = at + 1;
                cur = node.right;
            }
        }

        // prefix `[pos + 1, right]` of the right subtree, appended while walking right
        let mut tail: Option<T> = None;
        let mut cur = split.right;
        let mut start = pos + 1;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            let at = start + self.size(node.left);
            if right >= at {
                let piece = match node.left {
                    Some(l) => self.op.combine(&self.nodes[l].agg, &node.value),
                    None => node.value.clone(),
                };
                tail = Some(match tail {
                    None => piece,
                    Some(acc) => self.op.combine_left(acc, &piece),
                });
                if right == at {
                    break;
                }
                start = at + 1;
                cur = node.right;
            } else {
                cur = node.left;
            }
        }

        let mid = match head {
            Some(head) => self.op.combine_left(head, &split.value),
            None => split.value.clone(),
        };
        Ok(match tail {
            Some(tail) => self.op.combine_left(mid, &tail),
            None => mid,
        })
    }
}

forward_capabilities!(Treap, read, write, query);

/// In-order iterator over the elements of a [Treap]
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    stack: Vec<usize>,
    cur: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.cur {
            self.stack.push(id);
            self.cur = self.nodes[id].left;
        }
        let id = self.stack.pop()?;
        self.cur = self.nodes[id].right;
        Some(&self.nodes[id].value)
    }
}

impl<T: Clone, O: Clone> Clone for Treap<T, O> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            op: self.op.clone(),
            #[cfg(feature = "profiler")]
            stats: self.stats.clone(),
        }
    }
}

impl<T: fmt::Debug, O> fmt::Debug for Treap<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Treap")
            .field(&self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<T, O: Default> Default for Treap<T, O> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
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
        Error,
        ops::{Add, Max, Min},
    };

    fn concat(a: &Vec<u32>, b: &Vec<u32>) -> Vec<u32> {
        let mut res = a.clone();
        res.extend_from_slice(b);
        res
    }

    fn seeded<T: Clone, O: Operation<T>>(values: Vec<T>, op: O, seed: u64) -> Treap<T, O> {
        Treap::with_conf(values, op, TreapConf::default().with_seed(seed))
    }

    /// Walks every node and checks heap order, sizes and in-order aggregates.
    fn assert_invariants(treap: &Treap<Vec<u32>, fn(&Vec<u32>, &Vec<u32>) -> Vec<u32>>) {
        let mut stack: Vec<(usize, usize)> = treap.root.map(|id| (id, 0)).into_iter().collect();
        while let Some((id, offset)) = stack.pop() {
            let node = &treap.nodes[id];
            let left = treap.size(node.left);
            assert_eq!(node.size, left + 1 + treap.size(node.right));
            let expected: Vec<u32> = (offset as u32..(offset + node.size) as u32).collect();
            assert_eq!(node.agg, expected);
            for child in [node.left, node.right].into_iter().flatten() {
                assert!(treap.nodes[child].priority >= node.priority);
            }
            stack.extend(node.left.map(|l| (l, offset)));
            stack.extend(node.right.map(|r| (r, offset + left + 1)));
        }
    }

    #[test]
    fn min_scenario() {
        let mut treap = seeded(vec![12, 4, 6, -5, 2, 90], Min, 1);
        assert_eq!(treap.query(0, 5), Ok(-5));
        assert_eq!(treap.query(0, 2), Ok(4));
        assert_eq!(treap.query(4, 5), Ok(2));
        treap.update(3, 7).unwrap();
        assert_eq!(treap.value_at(3), Ok(&7));
        assert_eq!(treap.query(0, 5), Ok(2));
    }

    #[test]
    fn max_scenario() {
        let treap = Treap::new(vec![89, 12, 17, 4, 9], Max);
        assert_eq!(treap.query(1, 3), Ok(17));
    }

    #[test]
    fn build_invariants() {
        let op: fn(&Vec<u32>, &Vec<u32>) -> Vec<u32> = concat;
        for seed in 0..20 {
            for n in [1u32, 2, 3, 10, 64, 100] {
                let treap = seeded((0..n).map(|i| vec![i]).collect(), op, seed);
                assert_eq!(treap.len(), n as usize);
                assert_invariants(&treap);
            }
        }
    }

    #[test]
    fn query_non_commutative() {
        for n in 1..40u32 {
            let values: Vec<Vec<u32>> = (0..n).map(|i| vec![i]).collect();
            let treap = seeded(values, concat, u64::from(n));
            for l in 0..n as usize {
                for r in l..n as usize {
                    let expected: Vec<u32> = (l as u32..=r as u32).collect();
                    assert_eq!(treap.query(l, r), Ok(expected), "n: {n} l: {l} r: {r}");
                }
            }
        }
    }

    #[test]
    fn update_matches_rebuild() {
        let mut rng = fastrand::Rng::with_seed(5);
        for n in 1..50usize {
            let mut values: Vec<i64> = (0..n).map(|_| rng.i64(-1000..=1000)).collect();
            let mut treap = seeded(values.clone(), Add, 77);
            for _ in 0..n {
                let index = rng.usize(0..n);
                let value = rng.i64(-1000..=1000);
                treap.update(index, value).unwrap();
                values[index] = value;
                // same seed, same shape
                let rebuilt = seeded(values.clone(), Add, 77);
                let aggs = |t: &Treap<i64, Add>| t.nodes.iter().map(|n| n.agg).collect::<Vec<_>>();
                assert_eq!(aggs(&treap), aggs(&rebuilt));
            }
        }
    }

    #[test]
    fn same_seed_same_shape() {
        let a = seeded((0..200).collect::<Vec<u32>>(), Max, 3);
        let b = seeded((0..200).collect::<Vec<u32>>(), Max, 3);
        assert_eq!(a.root, b.root);
        assert!(
            a.nodes
                .iter()
                .zip(&b.nodes)
                .all(|(x, y)| x.priority == y.priority && x.left == y.left && x.right == y.right)
        );

        let rng = fastrand::Rng::with_seed(3);
        let c = Treap::with_rng((0..200).collect::<Vec<u32>>(), Max, rng);
        assert_eq!(a.root, c.root);
    }

    #[test]
    fn depth_is_logarithmic() {
        let treap = seeded((0..1000).collect::<Vec<u64>>(), Add, 2024);
        let depth = treap.depth();
        assert!(depth >= 10, "depth: {depth}");
        assert!(depth <= 50, "depth: {depth}");

        let single = seeded(vec![1], Add, 0);
        assert_eq!(single.depth(), 1);
        assert_eq!(Treap::<u64, Add>::default().depth(), 0);
    }

    #[test]
    fn iterates_in_order() {
        let treap = seeded((0..57).collect::<Vec<u32>>(), Add, 8);
        assert!(treap.iter().copied().eq(0..57u32));
        assert_eq!(format!("{treap:?}"), format!("Treap({:?})", (0..57).collect::<Vec<u32>>()));
    }

    #[test]
    fn every_position_is_reachable() {
        let n = 2000u32;
        let mut treap = seeded((0..n).collect::<Vec<u32>>(), Add, 31);
        for i in 0..n as usize {
            assert_eq!(treap.value_at(i), Ok(&(i as u32)));
            assert_eq!(treap.query(i, i), Ok(i as u32));
        }
        for i in 0..n as usize {
            treap.update(i, 1).unwrap();
        }
        assert_eq!(treap.query(0, n as usize - 1), Ok(n));
        assert_eq!(treap.query(17, 1016), Ok(1000));
    }

    #[test]
    fn rejects_bad_input() {
        let mut empty: Treap<i32, Min> = Treap::default();
        assert!(empty.is_empty());
        assert_eq!(empty.query(0, 0), Err(Error::Empty));
        assert_eq!(empty.value_at(0), Err(Error::Empty));
        assert_eq!(empty.update(0, 1), Err(Error::Empty));

        let treap = seeded(vec![1, 2, 3], Min, 0);
        assert!(treap.query(0, 3).unwrap_err().is_invalid_range());
        assert!(treap.value_at(3).unwrap_err().is_out_of_bounds());
    }
}
