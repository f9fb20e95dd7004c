//! Vertices, keys, edges and weights.

pub mod bounds;
pub mod edge;
pub mod identity;
pub mod weight;

pub use bounds::{DenseKey, KeyLike, VertexLike};
pub use edge::{
    Adjacency, Edge, LabeledEdges, LabeledSuccessors, Successors, TreeEdge, WeightedEdges,
};
pub use identity::{Identity, KeyFn, VertexIdentity};
pub use weight::Weight;
