//! The two-level tree tour structure.
//!
//! A tour of `n` cities is split into P ≈ √n contiguous segments. Each
//! segment is a run of the cyclic city list headed by a parent record; the
//! parents form a second cyclic list. A parent's reversal bit decides what
//! "forward" means for the nodes it owns, which is what makes reversing a
//! whole segment a single bit flip.
//!
//! Definitions used throughout:
//!
//! - The *forward tour* follows a node's physical `next` link when its
//!   segment is not reversed, its `prev` link otherwise. At the parent level
//!   forward always means `next`.
//! - A segment's *forward begin/end* are its physical endpoints resolved
//!   through the reversal bit.
//!
//! Invariants, re-established by every public operation:
//!
//! - Local ids ascend by exactly one along a segment's physical `next`
//!   chain; the physical begin node holds the minimum, the physical end node
//!   the maximum. Ids of different segments are unrelated.
//! - Parent ids are `0..P` contiguous modulo P along the parent list.
//! - Each parent's forward end is linked to the forward begin of the next
//!   parent, and segment sizes sum to the city count with no segment empty.

mod moves;
mod query;
mod reverse;
mod splice;

#[cfg(test)]
mod model;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{Direction, Node, NodeIdx, Parent, ParentIdx};

/// A two-level tree encoding one cyclic Hamiltonian tour.
///
/// Built with [`TwoLevelTree::new`] and filled with
/// [`set_raw_tour`](TwoLevelTree::set_raw_tour). Cities are the consecutive
/// integers `origin_city..origin_city + n_cities`, and every public method
/// is keyed by city; read-only inspection goes through [`NodeView`] and
/// [`SegmentView`].
#[derive(Debug)]
pub struct TwoLevelTree {
    nodes: Vec<Node>,
    parents: Vec<Parent>,
    n_cities: usize,
    origin_city: usize,
    nominal_segment_length: usize,
    // Scratch buffers reused by the mutating operations; their contents are
    // only meaningful within a single call.
    scratch_nodes: Vec<NodeIdx>,
    scratch_parents: Vec<ParentIdx>,
}

/// Diagnostic snapshot of a tree's segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub n_cities: usize,
    pub n_segments: usize,
    pub nominal_segment_length: usize,
    /// Current segment sizes in arena order.
    pub segment_sizes: Vec<usize>,
}

impl TwoLevelTree {
    /// Build an empty tree for `n_cities` cities numbered consecutively from
    /// `origin_city`. The segment count P = ⌊√n⌋ + 1 and the nominal segment
    /// length n / P are fixed here for the lifetime of the tree.
    ///
    /// The tour itself must be supplied afterwards via
    /// [`set_raw_tour`](TwoLevelTree::set_raw_tour).
    pub fn new(n_cities: usize, origin_city: usize) -> Self {
        assert!(n_cities > 0, "a tour needs at least one city");
        let n_segments = (n_cities as f64).sqrt() as usize + 1;
        assert!(n_segments > 1, "single-segment trees are not supported");
        assert!(
            n_cities >= n_segments,
            "every segment needs at least one city"
        );
        TwoLevelTree {
            nodes: vec![Node::default(); n_cities],
            parents: vec![Parent::default(); n_segments],
            n_cities,
            origin_city,
            nominal_segment_length: n_cities / n_segments,
            scratch_nodes: Vec::new(),
            scratch_parents: Vec::new(),
        }
    }

    /// Set the forward tour represented by this tree.
    ///
    /// `order` must be a permutation of the city range. The permutation is
    /// cut into P contiguous chunks of the nominal length, the last chunk
    /// absorbing the remainder; chunk k becomes segment k with the reversal
    /// bit clear.
    pub fn set_raw_tour(&mut self, order: &[usize]) {
        assert_eq!(
            order.len(),
            self.n_cities,
            "tour length must equal the city count"
        );
        debug_assert!(
            self.is_permutation(order),
            "tour must be a permutation of the city range"
        );
        let p_count = self.n_segments();
        let segment_length = self.n_cities / p_count;
        let first = self.idx(order[0]);
        let last = self.idx(order[self.n_cities - 1]);

        for current in 0..p_count {
            let i_begin = current * segment_length;
            // The last segment takes all remaining cities.
            let i_end = if current + 1 == p_count {
                self.n_cities
            } else {
                i_begin + segment_length
            };
            let begin_node = self.idx(order[i_begin]);
            let end_node = self.idx(order[i_end - 1]);

            let parent = &mut self.parents[current];
            parent.id = current;
            parent.prev = if current > 0 { current - 1 } else { p_count - 1 };
            parent.next = if current + 1 < p_count { current + 1 } else { 0 };
            parent.reverse = false;
            parent.segment_begin = begin_node;
            parent.segment_end = end_node;
            parent.size = i_end - i_begin;

            for i in i_begin..i_end {
                let city = order[i];
                debug_assert!(self.is_city_valid(city));
                let prev = if i == 0 { last } else { self.idx(order[i - 1]) };
                let next = if i + 1 == self.n_cities {
                    first
                } else {
                    self.idx(order[i + 1])
                };
                let u = self.idx(city);
                let node = &mut self.nodes[u];
                node.city = city;
                node.parent = current;
                node.prev = prev;
                node.next = next;
                node.id = (i - i_begin) as i64;
            }
        }
    }

    pub fn n_cities(&self) -> usize {
        self.n_cities
    }

    pub fn origin_city(&self) -> usize {
        self.origin_city
    }

    /// Number of segments P, fixed at construction.
    pub fn n_segments(&self) -> usize {
        self.parents.len()
    }

    /// The nominal segment length n / P used as a heuristic threshold.
    pub fn nominal_segment_length(&self) -> usize {
        self.nominal_segment_length
    }

    /// View of the node bound to `city`.
    pub fn node(&self, city: usize) -> NodeView<'_> {
        NodeView {
            tree: self,
            idx: self.idx(city),
        }
    }

    /// View of the node bound to the origin city.
    pub fn origin_city_node(&self) -> NodeView<'_> {
        self.node(self.origin_city)
    }

    /// View of the segment currently holding `city`.
    pub fn segment(&self, city: usize) -> SegmentView<'_> {
        SegmentView {
            tree: self,
            idx: self.nodes[self.idx(city)].parent,
        }
    }

    /// The parent record in the first arena slot; its `prev` is the
    /// [`tail_segment`](TwoLevelTree::tail_segment) in the initial layout.
    pub fn head_segment(&self) -> SegmentView<'_> {
        SegmentView { tree: self, idx: 0 }
    }

    /// The parent record in the last arena slot.
    pub fn tail_segment(&self) -> SegmentView<'_> {
        SegmentView {
            tree: self,
            idx: self.parents.len() - 1,
        }
    }

    /// The tour as a flat city sequence, starting at `start_city` (the
    /// origin city when `None`) and walking `direction` for n steps.
    pub fn get_raw_tour(&self, start_city: Option<usize>, direction: Direction) -> Vec<usize> {
        let mut tour = Vec::new();
        self.to_raw_tour(&mut tour, start_city, direction);
        tour
    }

    /// Like [`get_raw_tour`](TwoLevelTree::get_raw_tour), writing into a
    /// caller-owned buffer. Previous contents of `tour` are discarded.
    pub fn to_raw_tour(
        &self,
        tour: &mut Vec<usize>,
        start_city: Option<usize>,
        direction: Direction,
    ) {
        let start = start_city.unwrap_or(self.origin_city);
        debug_assert!(self.is_city_valid(start));
        tour.clear();
        tour.reserve(self.n_cities);
        let mut u = self.idx(start);
        for _ in 0..self.n_cities {
            tour.push(self.nodes[u].city);
            u = match direction {
                Direction::Forward => self.next_idx(u),
                Direction::Backward => self.prev_idx(u),
            };
        }
    }

    /// Current segment sizes. With a valid `start_city`, sizes are listed in
    /// parent order beginning at that city's segment; with `None` they come
    /// in arena order.
    pub fn actual_segment_sizes(&self, start_city: Option<usize>) -> Vec<usize> {
        match start_city {
            Some(city) => {
                let start = self.nodes[self.idx(city)].parent;
                let mut sizes = Vec::with_capacity(self.parents.len());
                let mut p = start;
                loop {
                    sizes.push(self.parents[p].size);
                    p = self.parents[p].next;
                    if p == start {
                        break;
                    }
                }
                sizes
            }
            None => self.parents.iter().map(|p| p.size).collect(),
        }
    }

    /// Diagnostic snapshot of the current segmentation.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            n_cities: self.n_cities,
            n_segments: self.n_segments(),
            nominal_segment_length: self.nominal_segment_length,
            segment_sizes: self.actual_segment_sizes(None),
        }
    }

    /// Check every structural invariant of the tree, panicking on the first
    /// violation. O(n); meant for tests and debugging.
    pub fn assert_invariants(&self) {
        let p_count = self.n_segments();
        assert!(p_count >= 2, "tree must hold at least two segments");

        let mut total = 0usize;
        for (pi, p) in self.parents.iter().enumerate() {
            assert!(p.size >= 1, "segment {pi} is empty");
            total += p.size;
            assert_eq!(self.parents[p.next].prev, pi, "broken parent link at {pi}");
            assert_eq!(self.parents[p.prev].next, pi, "broken parent link at {pi}");
            assert_eq!(
                (p.id + 1) % p_count,
                self.parents[p.next].id,
                "parent ids not contiguous at {pi}"
            );

            // Local ids ascend by one along the physical chain.
            assert_eq!(self.nodes[p.segment_begin].parent, pi);
            let mut u = p.segment_begin;
            for _ in 1..p.size {
                let v = self.nodes[u].next;
                assert_eq!(
                    self.nodes[v].id,
                    self.nodes[u].id + 1,
                    "local ids not contiguous in segment {pi}"
                );
                assert_eq!(self.nodes[v].parent, pi, "stray node in segment {pi}");
                u = v;
            }
            assert_eq!(u, p.segment_end, "size of segment {pi} disagrees with its endpoints");

            // The forward end is linked to the next segment's forward begin.
            let e = p.forward_end();
            let b = self.parents[p.next].forward_begin();
            assert_eq!(self.next_idx(e), b, "broken boundary after segment {pi}");
            assert_eq!(self.prev_idx(b), e, "broken boundary after segment {pi}");
        }
        assert_eq!(total, self.n_cities, "segment sizes do not sum to n");

        // Logical next/prev are inverses and the forward walk is a
        // Hamiltonian cycle.
        let start = self.idx(self.origin_city);
        let mut seen = vec![false; self.n_cities];
        let mut u = start;
        for _ in 0..self.n_cities {
            assert_eq!(self.next_idx(self.prev_idx(u)), u);
            assert_eq!(self.prev_idx(self.next_idx(u)), u);
            assert!(!seen[u], "city {} visited twice", self.nodes[u].city);
            seen[u] = true;
            u = self.next_idx(u);
        }
        assert_eq!(u, start, "forward walk does not close after n steps");

        // Concatenating the segments in parent order reproduces the tour.
        let head = self.nodes[start].parent;
        let mut by_parents = Vec::with_capacity(self.n_cities);
        let mut pi = head;
        loop {
            let p = &self.parents[pi];
            let mut u = p.forward_begin();
            loop {
                by_parents.push(self.nodes[u].city);
                if u == p.forward_end() {
                    break;
                }
                u = self.next_idx(u);
            }
            pi = p.next;
            if pi == head {
                break;
            }
        }
        let first = by_parents[0];
        assert_eq!(
            by_parents,
            self.get_raw_tour(Some(first), Direction::Forward),
            "parent walk disagrees with the raw tour"
        );
    }

    fn idx(&self, city: usize) -> NodeIdx {
        debug_assert!(self.is_city_valid(city), "city {city} out of range");
        city - self.origin_city
    }

    fn is_city_valid(&self, city: usize) -> bool {
        city >= self.origin_city && city < self.origin_city + self.n_cities
    }

    /// Logical successor of `u` on the forward tour.
    fn next_idx(&self, u: NodeIdx) -> NodeIdx {
        let node = &self.nodes[u];
        if self.parents[node.parent].reverse {
            node.prev
        } else {
            node.next
        }
    }

    /// Logical predecessor of `u` on the forward tour.
    fn prev_idx(&self, u: NodeIdx) -> NodeIdx {
        let node = &self.nodes[u];
        if self.parents[node.parent].reverse {
            node.next
        } else {
            node.prev
        }
    }

    fn is_permutation(&self, order: &[usize]) -> bool {
        let mut seen = vec![false; self.n_cities];
        order.iter().all(|&city| {
            self.is_city_valid(city) && !std::mem::replace(&mut seen[city - self.origin_city], true)
        })
    }
}

impl Clone for TwoLevelTree {
    /// Deep copy. Arena indices are stable, so cloning the arenas yields an
    /// independent tree encoding the same tour; the scratch buffers are
    /// reset rather than copied.
    fn clone(&self) -> Self {
        TwoLevelTree {
            nodes: self.nodes.clone(),
            parents: self.parents.clone(),
            n_cities: self.n_cities,
            origin_city: self.origin_city,
            nominal_segment_length: self.nominal_segment_length,
            scratch_nodes: Vec::new(),
            scratch_parents: Vec::new(),
        }
    }
}

impl Default for TwoLevelTree {
    /// A sentinel tree with no tour. Queries and mutators on it are
    /// meaningless and panic on use.
    fn default() -> Self {
        TwoLevelTree {
            nodes: Vec::new(),
            parents: Vec::new(),
            n_cities: 0,
            origin_city: 0,
            nominal_segment_length: 0,
            scratch_nodes: Vec::new(),
            scratch_parents: Vec::new(),
        }
    }
}

impl fmt::Display for TwoLevelTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nodes.is_empty() {
            return write!(f, "TwoLevelTree (no tour)");
        }
        writeln!(
            f,
            "TwoLevelTree ({} cities, {} segments)",
            self.n_cities,
            self.n_segments()
        )?;
        write!(f, "  tour: {:?}", self.get_raw_tour(None, Direction::Forward))
    }
}

/// Read-only view of one city node.
///
/// Obtained from [`TwoLevelTree::node`]; navigation methods return further
/// views borrowing the same tree.
#[derive(Clone, Copy)]
pub struct NodeView<'a> {
    tree: &'a TwoLevelTree,
    idx: NodeIdx,
}

impl<'a> NodeView<'a> {
    pub fn city(&self) -> usize {
        self.tree.nodes[self.idx].city
    }

    /// Sequence number of this node within its segment.
    pub fn local_id(&self) -> i64 {
        self.tree.nodes[self.idx].id
    }

    /// Logical successor on the forward tour.
    pub fn next(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.next_idx(self.idx),
        }
    }

    /// Logical predecessor on the forward tour.
    pub fn prev(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.prev_idx(self.idx),
        }
    }

    /// Physically next node, ignoring the segment's reversal bit.
    pub fn physical_next(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.nodes[self.idx].next,
        }
    }

    /// Physically previous node, ignoring the segment's reversal bit.
    pub fn physical_prev(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.nodes[self.idx].prev,
        }
    }

    /// The segment owning this node.
    pub fn segment(&self) -> SegmentView<'a> {
        SegmentView {
            tree: self.tree,
            idx: self.tree.nodes[self.idx].parent,
        }
    }
}

impl PartialEq for NodeView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

impl Eq for NodeView<'_> {}

impl fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("city", &self.city())
            .field("local_id", &self.local_id())
            .finish()
    }
}

/// Read-only view of one segment's parent record.
#[derive(Clone, Copy)]
pub struct SegmentView<'a> {
    tree: &'a TwoLevelTree,
    idx: ParentIdx,
}

impl<'a> SegmentView<'a> {
    /// Sequence number of this parent in the cyclic parent list.
    pub fn id(&self) -> usize {
        self.tree.parents[self.idx].id
    }

    /// Number of city nodes currently in this segment.
    pub fn size(&self) -> usize {
        self.tree.parents[self.idx].size
    }

    /// Whether the segment is traversed forward along physical `prev` links.
    pub fn is_reversed(&self) -> bool {
        self.tree.parents[self.idx].reverse
    }

    /// Physical begin node (minimum local id).
    pub fn begin(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].segment_begin,
        }
    }

    /// Physical end node (maximum local id).
    pub fn end(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].segment_end,
        }
    }

    /// First node in a forward traversal of this segment.
    pub fn forward_begin(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].forward_begin(),
        }
    }

    /// Last node in a forward traversal of this segment.
    pub fn forward_end(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].forward_end(),
        }
    }

    /// First node in a backward traversal of this segment.
    pub fn backward_begin(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].backward_begin(),
        }
    }

    /// Last node in a backward traversal of this segment.
    pub fn backward_end(&self) -> NodeView<'a> {
        NodeView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].backward_end(),
        }
    }

    /// Next segment on the forward tour.
    pub fn next(&self) -> SegmentView<'a> {
        SegmentView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].next,
        }
    }

    /// Previous segment on the forward tour.
    pub fn prev(&self) -> SegmentView<'a> {
        SegmentView {
            tree: self.tree,
            idx: self.tree.parents[self.idx].prev,
        }
    }
}

impl PartialEq for SegmentView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

impl Eq for SegmentView<'_> {}

impl fmt::Debug for SegmentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentView")
            .field("id", &self.id())
            .field("size", &self.size())
            .field("reversed", &self.is_reversed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn tree_of(n_cities: usize, origin: usize, order: &[usize]) -> TwoLevelTree {
        let mut tree = TwoLevelTree::new(n_cities, origin);
        tree.set_raw_tour(order);
        tree
    }

    #[test]
    fn test_build_from_shuffled_order() {
        let n_cities = 67;
        let origin = 2;
        let mut order: Vec<usize> = (origin..origin + n_cities).collect();
        order.shuffle(&mut ChaCha8Rng::seed_from_u64(123));
        let tree = tree_of(n_cities, origin, &order);

        assert_eq!(tree.n_cities(), n_cities);
        assert_eq!(tree.n_segments(), (n_cities as f64).sqrt() as usize + 1);

        // Physical links follow the permutation, wrapping at both ends.
        for (i, &city) in order.iter().enumerate() {
            let node = tree.node(city);
            assert_eq!(node.city(), city);
            assert_eq!(node.physical_next().city(), order[(i + 1) % n_cities]);
            let prev = if i == 0 { order[n_cities - 1] } else { order[i - 1] };
            assert_eq!(node.physical_prev().city(), prev);
        }

        // The city list is one cycle in both physical orientations.
        let mut count = 0;
        let mut node = tree.origin_city_node();
        loop {
            node = node.physical_next();
            count += 1;
            if node == tree.origin_city_node() {
                break;
            }
        }
        assert_eq!(count, n_cities);
        count = 0;
        node = tree.origin_city_node();
        loop {
            node = node.physical_prev();
            count += 1;
            if node == tree.origin_city_node() {
                break;
            }
        }
        assert_eq!(count, n_cities);

        // Segment endpoints are stitched to their neighbors, and sizes add up.
        let mut total = 0;
        let mut segment = tree.head_segment();
        loop {
            assert_eq!(
                segment.end().physical_next(),
                segment.next().begin(),
                "segments must be physically adjacent"
            );
            assert_eq!(segment.begin().physical_prev(), segment.prev().end());
            total += segment.size();
            segment = segment.next();
            if segment == tree.head_segment() {
                break;
            }
        }
        assert_eq!(total, n_cities);

        // The initial layout assigns chunks to parents in order.
        assert_eq!(tree.node(order[0]).segment(), tree.head_segment());
        assert_eq!(
            tree.node(order[n_cities - 1]).segment(),
            tree.tail_segment()
        );
        assert_eq!(tree.tail_segment().next(), tree.head_segment());
        assert_eq!(tree.head_segment().prev(), tree.tail_segment());

        tree.assert_invariants();
    }

    #[test]
    fn test_segment_sizes_and_stats() {
        let order = [
            11, 13, 6, 8, 4, 1, 2, 5, 9, 10, 7, 12, 14, 3, 15, 16, 17, 18, 20, 19, 23, 22, 21,
        ];
        let tree = tree_of(23, 1, &order);
        assert_eq!(tree.actual_segment_sizes(None), vec![4, 4, 4, 4, 7]);
        assert_eq!(tree.actual_segment_sizes(Some(9)), vec![4, 4, 7, 4, 4]);

        let stats = tree.stats();
        assert_eq!(stats.n_cities, 23);
        assert_eq!(stats.n_segments, 5);
        assert_eq!(stats.nominal_segment_length, 4);
        assert_eq!(stats.segment_sizes, vec![4, 4, 4, 4, 7]);
    }

    #[test]
    fn test_raw_tour_rotations() {
        let order = [3, 6, 8, 4, 1, 2, 5, 9, 10, 7];
        let tree = tree_of(10, 1, &order);

        assert_eq!(tree.get_raw_tour(None, Direction::Forward), vec![
            1, 2, 5, 9, 10, 7, 3, 6, 8, 4
        ]);
        assert_eq!(tree.get_raw_tour(Some(3), Direction::Forward), order.to_vec());
        // Any start city yields a rotation of the same cycle.
        for &city in &order {
            let rotated = tree.get_raw_tour(Some(city), Direction::Forward);
            let offset = order.iter().position(|&c| c == city).unwrap();
            let expected: Vec<usize> = (0..10).map(|i| order[(offset + i) % 10]).collect();
            assert_eq!(rotated, expected);
        }
        // Backward is the forward tour read in reverse.
        let backward = tree.get_raw_tour(Some(3), Direction::Backward);
        let mut expected = order.to_vec();
        expected[1..].reverse();
        assert_eq!(backward, expected);

        let mut buf = vec![99; 3];
        tree.to_raw_tour(&mut buf, Some(3), Direction::Forward);
        assert_eq!(buf, order.to_vec());
    }

    #[test]
    fn test_deep_copy_independence() {
        let order = [3, 6, 8, 4, 1, 12, 2, 5, 9, 10, 7, 11];
        let mut tree = tree_of(12, 1, &order);

        let copy = tree.clone();
        assert_eq!(copy.get_raw_tour(Some(3), Direction::Forward), order.to_vec());

        // 2-opt move expressed in tour-endpoint form: flip(t1, t2, t4, t3).
        tree.flip(5, 9, 11, 3);
        assert_eq!(
            tree.get_raw_tour(Some(3), Direction::Forward),
            vec![3, 6, 8, 4, 1, 12, 2, 5, 11, 7, 10, 9]
        );
        assert_eq!(copy.get_raw_tour(Some(3), Direction::Forward), order.to_vec());
        assert_eq!(
            copy.get_raw_tour(Some(5), Direction::Forward),
            vec![5, 9, 10, 7, 11, 3, 6, 8, 4, 1, 12, 2]
        );
        copy.assert_invariants();
        tree.assert_invariants();
    }

    #[test]
    fn test_default_tree_is_a_sentinel() {
        let tree = TwoLevelTree::default();
        assert_eq!(tree.n_cities(), 0);
        assert_eq!(tree.n_segments(), 0);
        assert_eq!(format!("{tree}"), "TwoLevelTree (no tour)");
    }

    #[test]
    fn test_random_ops_match_naive_model() {
        for seed in 0..8 {
            model::run_random_ops(120, 1, seed, 60);
        }
    }

    #[test]
    fn test_random_ops_with_offset_origin() {
        model::run_random_ops(57, 5, 17, 40);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 24,
            .. ProptestConfig::default()
        })]

        #[test]
        fn prop_random_ops_match_naive_model(seed in any::<u64>()) {
            model::run_random_ops(90, 1, seed, 30);
        }

        #[test]
        fn prop_reverse_twice_restores_tour(seed in any::<u64>(), n in 8usize..96) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut order: Vec<usize> = (1..=n).collect();
            order.shuffle(&mut rng);
            let mut tree = TwoLevelTree::new(n, 1);
            tree.set_raw_tour(&order);

            let a = order[0];
            let b = order[n / 2];
            // Reversing the just-reversed path restores the original tour.
            if a != b && tree.next(b) != a {
                tree.reverse(a, b);
                tree.assert_invariants();
                tree.reverse(b, a);
                tree.assert_invariants();
                prop_assert_eq!(tree.get_raw_tour(Some(order[0]), Direction::Forward), order);
            }
        }
    }
}
