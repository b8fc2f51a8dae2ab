//! Two-level tree tour representation for TSP local search.
//!
//! A cyclic Hamiltonian tour over `n` cities is partitioned into roughly √n
//! segments, each headed by a parent record carrying a reversal bit. This
//! makes the queries and mutations at the heart of Lin-Kernighan-style
//! heuristics cheap: successor/predecessor and betweenness in O(1), segment
//! reversal, 2-opt flips and double-bridge perturbations in O(√n) amortized.
//!
//! The crate is the tour representation only. Choosing which moves to apply,
//! computing distances and candidate neighbors, and parsing problem input
//! belong to the search driver calling into it.
//!
//! # Example
//!
//! ```
//! use tsp_tour_tree::TwoLevelTree;
//!
//! let mut tree = TwoLevelTree::new(10, 1);
//! tree.set_raw_tour(&[3, 6, 8, 4, 1, 2, 5, 9, 10, 7]);
//!
//! assert_eq!(tree.next(10), 7);
//! assert_eq!(tree.prev(3), 7);
//! assert!(tree.is_between(3, 6, 8));
//!
//! // 2-opt: remove arcs (3, 6) and (10, 7), insert (3, 10) and (6, 7).
//! tree.flip(3, 6, 10, 7);
//! assert!(tree.has_edge(3, 10));
//! assert!(tree.has_edge(6, 7));
//! ```

pub mod node;
pub mod tree;

pub use node::Direction;
pub use tree::{NodeView, SegmentView, TreeStats, TwoLevelTree};
