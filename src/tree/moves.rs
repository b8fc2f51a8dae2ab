//! The two local-search moves built on top of reversal: the 2-opt flip and
//! the 4-opt double-bridge perturbation.

use log::debug;

use crate::node::{Direction, NodeIdx};

use super::TwoLevelTree;

impl TwoLevelTree {
    /// 2-opt flip: remove the arcs `(a, b)` and `(c, d)`, insert `(a, c)`
    /// and `(b, d)`.
    ///
    /// Both arcs must currently exist, in the same orientation (both forward
    /// or both backward). The flip is carried out by reversing one of the
    /// two resulting subpaths, preferring the approximately shorter one;
    /// that reversal re-creates both new arcs, so nothing is inserted
    /// explicitly. `b == c` and `a == d` leave the tour unchanged.
    pub fn flip(&mut self, a: usize, b: usize, c: usize, d: usize) {
        let (a, b, c, d) = (self.idx(a), self.idx(b), self.idx(c), self.idx(d));
        self.flip_idx(a, b, c, d);
    }

    fn flip_idx(&mut self, a: NodeIdx, b: NodeIdx, c: NodeIdx, d: NodeIdx) {
        let is_forward = self.next_idx(a) == b;
        debug_assert!(
            is_forward || self.prev_idx(a) == b,
            "flip: (a, b) is not an arc"
        );
        debug_assert_eq!(
            self.next_idx(c) == d,
            is_forward,
            "flip: arcs differ in orientation"
        );
        debug_assert!(!(a == c && b == d), "flip: the two arcs coincide");
        if b == c || d == a {
            return;
        }
        // Reverse the cheaper of the subpaths (b, c) and (d, a).
        if self.is_approximately_shorter_idx(b, c, d, a) {
            if is_forward {
                self.reverse_idx(b, c);
            } else {
                self.reverse_idx(c, b);
            }
        } else if is_forward {
            self.reverse_idx(d, a);
        } else {
            self.reverse_idx(a, d);
        }
    }

    /// Double-bridge move: with `an`..`dn` the current successors of the
    /// four cities, remove the arcs `(a, an)`, `(b, bn)`, `(c, cn)`,
    /// `(d, dn)` and insert `(a, cn)`, `(b, dn)`, `(c, an)`, `(d, bn)`.
    ///
    /// The four cities must appear on the forward tour in the order
    /// `a .. b .. c .. d`, with at least one other city between each pair,
    /// and no two of them may share a segment. The resulting tour cannot be
    /// reached by any sequence of improving 2-opt flips, which is what makes
    /// this the standard perturbation step.
    pub fn double_bridge_move(&mut self, a: usize, b: usize, c: usize, d: usize) {
        let (a, b, c, d) = (self.idx(a), self.idx(b), self.idx(c), self.idx(d));
        self.double_bridge_move_idx(a, b, c, d);
    }

    fn double_bridge_move_idx(&mut self, a: NodeIdx, b: NodeIdx, c: NodeIdx, d: NodeIdx) {
        debug_assert!(self.is_between_idx(a, b, c), "double bridge: order violated");
        debug_assert!(self.is_between_idx(b, c, d), "double bridge: order violated");
        debug_assert!(self.is_between_idx(c, d, a), "double bridge: order violated");
        debug_assert!(self.is_between_idx(d, a, b), "double bridge: order violated");
        #[cfg(debug_assertions)]
        {
            let parents = [a, b, c, d].map(|u| self.nodes[u].parent);
            for i in 0..4 {
                for j in i + 1..4 {
                    debug_assert_ne!(
                        parents[i], parents[j],
                        "double bridge: cut points share a segment"
                    );
                }
            }
        }
        debug!(
            "double bridge at cities {}, {}, {}, {}",
            self.nodes[a].city, self.nodes[b].city, self.nodes[c].city, self.nodes[d].city
        );

        let an = self.next_idx(a);
        let bn = self.next_idx(b);
        let cn = self.next_idx(c);
        let dn = self.next_idx(d);

        // Push each cut onto a segment boundary, so every reconnection below
        // is a pure boundary rewrite.
        for p in [a, b, c, d] {
            if self.nodes[p].parent == self.nodes[self.next_idx(p)].parent {
                self.split_and_merge_idx(p, false, Direction::Forward);
            }
            #[cfg(debug_assertions)]
            {
                let q = self.next_idx(p);
                let pp = &self.parents[self.nodes[p].parent];
                debug_assert!(p == pp.segment_begin || p == pp.segment_end);
                let qp = &self.parents[self.nodes[q].parent];
                debug_assert!(q == qp.segment_begin || q == qp.segment_end);
                debug_assert_eq!(pp.next, self.nodes[q].parent);
            }
        }

        // Reconnect at the node and parent level, in this order.
        for (p, q) in [(a, cn), (d, bn), (c, an), (b, dn)] {
            self.connect_arc_forward(p, q);
            let pp = self.nodes[p].parent;
            let qp = self.nodes[q].parent;
            self.parents[pp].next = qp;
            self.parents[qp].prev = pp;
        }

        // Segments kept their contents and reversal bits, but their cyclic
        // order changed: renumber from the head parent.
        let mut p = 0;
        let mut id = 0;
        loop {
            self.parents[p].id = id;
            id += 1;
            p = self.parents[p].next;
            if p == 0 {
                break;
            }
        }
    }
}
