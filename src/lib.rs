#![cfg_attr(docsrs, feature(doc_cfg))]
//! # lazygraph
//!
//! lazygraph analyzes graphs that cannot or should not be materialized: infinite
//! graphs, huge graphs, or graphs whose edges are expensive to compute. Instead of
//! ingesting a graph structure, a traversal drives an application-supplied adjacency
//! callback on demand and reports results (reachability, depth, distance, paths,
//! spanning trees) one vertex per pull, doing no work ahead of what that vertex needs.
//!
//! ## Features
//! - Resumable, restartable strategies: breadth-first, depth-first (tree, all-paths and
//!   all-walks modes with a fine-grained event stream), neighbors-then-depth,
//!   topological sort, Dijkstra shortest paths, A* and minimum spanning tree
//! - Bidirectional meet-in-the-middle search for unweighted and weighted graphs
//! - Pluggable bookkeeping ("gears"): hash-indexed or dense-integer-indexed
//!   containers, native distance storage with an explicit infinity sentinel
//! - Vertex identity indirection, so traversals can run over equivalence classes
//! - Lazily materialized paths (forward or backward) from an incremental predecessor store
//!
//! ## Usage
//! ```rust
//! use lazygraph::prelude::*;
//!
//! // i -> i + 2, an infinite graph
//! let mut bfs = TraversalBreadthFirst::new(|&v: &u64, _: &_| [v + 2]);
//! bfs.start_from([0]);
//! let found: Vec<u64> = bfs
//!     .go_for_depth_range(10..20)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(found, vec![20, 22, 24, 26, 28, 30, 32, 34, 36, 38]);
//! ```
//!
//! ## Error model
//! Every pull returns `Result<Option<V>, TraversalError>`: `Ok(None)` ends the
//! sequence, an `Err` is fatal for the current run (see [`traversal_error`]).

pub mod algs;
pub mod debug_invariants;
pub mod gear;
pub mod paths;
pub mod traversal_error;
pub mod vertex;

pub use debug_invariants::DebugInvariants;
pub use traversal_error::TraversalError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::a_star::{AStarOptions, TraversalAStar};
    pub use crate::algs::bidirectional::{
        BSearchBreadthFirst, BSearchShortestPath, BidirectionalOptions, Meeting,
    };
    pub use crate::algs::breadth_first::TraversalBreadthFirst;
    pub use crate::algs::depth_first::{DepthFirstOptions, DfsEvent, DfsMode, TraversalDepthFirst};
    pub use crate::algs::neighbors_then_depth::TraversalNeighborsThenDepth;
    pub use crate::algs::shortest_paths::{ShortestPathsOptions, TraversalShortestPaths};
    pub use crate::algs::spanning_tree::TraversalMinimumSpanningTree;
    pub use crate::algs::strategy::{Phase, StartOptions, Traversal};
    pub use crate::algs::topological_sort::TraversalTopologicalSort;
    pub use crate::gear::{
        DenseGear, DenseNativeGear, DistanceMap, Gear, HashGear, VertexMap, VertexSet,
        WeightedGear,
    };
    pub use crate::paths::PathStore;
    pub use crate::traversal_error::TraversalError;
    pub use crate::vertex::{
        Adjacency, DenseKey, Edge, Identity, KeyFn, TreeEdge, VertexIdentity, Weight,
    };
}
