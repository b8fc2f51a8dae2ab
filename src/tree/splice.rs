//! Split-and-merge: migrating one end of a segment into its neighbor.
//!
//! This is the primitive the reversal and double-bridge routines use to move
//! cut points onto segment boundaries. It never changes the tour itself,
//! only which parent owns which run of nodes, and it never touches parent
//! ids.

use std::mem;

use log::trace;

use crate::node::{Direction, NodeIdx};

use super::TwoLevelTree;

impl TwoLevelTree {
    /// Detach the nodes on the given side of `s` within `s`'s segment
    /// (including `s` itself when `include_self` is set) and merge them into
    /// the neighboring segment on that side. Returns without effect when
    /// nothing needs to move.
    ///
    /// The move must not empty the segment; requesting one that would is a
    /// programming error.
    pub fn split_and_merge(&mut self, s: usize, include_self: bool, direction: Direction) {
        let s = self.idx(s);
        self.split_and_merge_idx(s, include_self, direction);
    }

    pub(super) fn split_and_merge_idx(
        &mut self,
        s: NodeIdx,
        include_self: bool,
        direction: Direction,
    ) {
        let parent = self.nodes[s].parent;
        let neighbor = match direction {
            Direction::Forward => self.parents[parent].next,
            Direction::Backward => self.parents[parent].prev,
        };

        // Collect the nodes that leave the segment, and find the node that
        // becomes the segment's new boundary.
        let mut moved = mem::take(&mut self.scratch_nodes);
        moved.clear();
        if include_self {
            moved.push(s);
        }
        let boundary = match direction {
            Direction::Forward => {
                let mut p = self.next_idx(s);
                while self.nodes[p].parent == parent {
                    moved.push(p);
                    p = self.next_idx(p);
                }
                if include_self {
                    self.prev_idx(s)
                } else {
                    s
                }
            }
            Direction::Backward => {
                let mut p = self.prev_idx(s);
                while self.nodes[p].parent == parent {
                    moved.push(p);
                    p = self.prev_idx(p);
                }
                if include_self {
                    self.next_idx(s)
                } else {
                    s
                }
            }
        };
        if moved.is_empty() {
            self.scratch_nodes = moved;
            return;
        }
        trace!(
            "split_and_merge: moving {} nodes {:?} from segment {} to {}",
            moved.len(),
            direction,
            self.parents[parent].id,
            self.parents[neighbor].id
        );

        self.parents[neighbor].size += moved.len();
        self.parents[parent].size -= moved.len();
        assert!(
            self.parents[parent].size > 0,
            "split_and_merge must not empty a segment"
        );

        match direction {
            Direction::Forward => {
                // Splice the moved run in front of the neighbor's forward
                // begin, relabeling by continuing its id sequence outwards.
                let mut q = self.parents[neighbor].forward_begin();
                let delta: i64 = if self.parents[neighbor].reverse { 1 } else { -1 };
                while let Some(p) = moved.pop() {
                    self.nodes[p].parent = neighbor;
                    self.connect_arc_forward(p, q);
                    self.nodes[p].id = self.nodes[q].id + delta;
                    q = p;
                }
                if self.parents[neighbor].reverse {
                    self.parents[neighbor].segment_end = q;
                } else {
                    self.parents[neighbor].segment_begin = q;
                }
                // Repair the boundary of the shrunk segment.
                self.connect_arc_forward(boundary, q);
                if self.parents[parent].reverse {
                    self.parents[parent].segment_begin = boundary;
                } else {
                    self.parents[parent].segment_end = boundary;
                }
            }
            Direction::Backward => {
                let mut q = self.parents[neighbor].backward_begin();
                let delta: i64 = if self.parents[neighbor].reverse { -1 } else { 1 };
                while let Some(p) = moved.pop() {
                    self.nodes[p].parent = neighbor;
                    self.connect_arc_forward(q, p);
                    self.nodes[p].id = self.nodes[q].id + delta;
                    q = p;
                }
                if self.parents[neighbor].reverse {
                    self.parents[neighbor].segment_begin = q;
                } else {
                    self.parents[neighbor].segment_end = q;
                }
                self.connect_arc_forward(q, boundary);
                if self.parents[parent].reverse {
                    self.parents[parent].segment_end = boundary;
                } else {
                    self.parents[parent].segment_begin = boundary;
                }
            }
        }
        self.scratch_nodes = moved;
    }

    /// Wire the arc `p --> q` into the physical lists so that `p` precedes
    /// `q` on the forward tour, writing whichever of `prev`/`next` is
    /// forward-facing on each side.
    pub(super) fn connect_arc_forward(&mut self, p: NodeIdx, q: NodeIdx) {
        if self.parents[self.nodes[p].parent].reverse {
            self.nodes[p].prev = q;
        } else {
            self.nodes[p].next = q;
        }
        if self.parents[self.nodes[q].parent].reverse {
            self.nodes[q].next = p;
        } else {
            self.nodes[q].prev = p;
        }
    }

    /// Relabel ids along the physical `next` chain from `a` to `b`,
    /// starting at `a_id`.
    pub(super) fn relabel_id(&mut self, a: NodeIdx, b: NodeIdx, a_id: i64) {
        debug_assert_eq!(self.nodes[a].parent, self.nodes[b].parent);
        self.nodes[a].id = a_id;
        let mut u = a;
        while u != b {
            let v = self.nodes[u].next;
            self.nodes[v].id = self.nodes[u].id + 1;
            u = v;
        }
    }
}
