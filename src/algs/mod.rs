//! Traversal strategies.

pub mod a_star;
pub mod bidirectional;
pub mod breadth_first;
pub mod depth_first;
pub(crate) mod frontier;
pub mod neighbors_then_depth;
pub mod shortest_paths;
pub mod spanning_tree;
pub mod strategy;
pub mod topological_sort;

pub use a_star::TraversalAStar;
pub use bidirectional::{BSearchBreadthFirst, BSearchShortestPath};
pub use breadth_first::TraversalBreadthFirst;
pub use depth_first::TraversalDepthFirst;
pub use neighbors_then_depth::TraversalNeighborsThenDepth;
pub use shortest_paths::TraversalShortestPaths;
pub use spanning_tree::TraversalMinimumSpanningTree;
pub use strategy::Traversal;
pub use topological_sort::TraversalTopologicalSort;
