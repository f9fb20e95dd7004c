//! Edges and the adjacency abstraction.
//!
//! An adjacency maps a vertex (plus read access to the running strategy's
//! state, the *context*) to a finite sequence of outgoing edges. Applications
//! implement [`Adjacency`] on their own graph types, or hand a closure to a
//! strategy constructor, which wraps it in one of the adapters below:
//!
//! | adapter               | closure yields | edge shape       |
//! |-----------------------|----------------|------------------|
//! | [`Successors`]        | `V`            | `Edge<V>`        |
//! | [`LabeledSuccessors`] | `(V, L)`       | `Edge<V, (), L>` |
//! | [`WeightedEdges`]     | `(V, W)`       | `Edge<V, W>`     |
//! | [`LabeledEdges`]      | `(V, W, L)`    | `Edge<V, W, L>`  |

use std::iter::Map;

use serde::{Deserialize, Serialize};

/// Outgoing edge: target vertex, weight and label. `()` marks an absent part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge<V, W = (), L = ()> {
    pub to: V,
    pub weight: W,
    pub label: L,
}

impl<V> Edge<V> {
    #[inline]
    pub fn new(to: V) -> Self {
        Edge {
            to,
            weight: (),
            label: (),
        }
    }
}

impl<V, W, L> Edge<V, W, L> {
    #[inline]
    pub fn with(to: V, weight: W, label: L) -> Self {
        Edge { to, weight, label }
    }
}

/// Edge of a search tree (or path) with both end points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeEdge<V, W = (), L = ()> {
    pub from: V,
    pub to: V,
    pub weight: W,
    pub label: L,
}

/// Source of outgoing edges, queried lazily by the strategies.
///
/// `C` is the state type of the strategy that drives the adjacency; a
/// search-aware adjacency may read it (depth, distance, trace...). Plain
/// adjacencies are generic over `C` and ignore it.
pub trait Adjacency<V, W, L, C: ?Sized> {
    type Edges: Iterator<Item = Edge<V, W, L>>;

    fn edges_from(&mut self, vertex: &V, context: &C) -> Self::Edges;
}

/// Adapter for closures yielding plain successor vertices.
#[derive(Clone, Copy, Debug)]
pub struct Successors<F>(pub F);

/// Adapter for closures yielding `(successor, label)`.
#[derive(Clone, Copy, Debug)]
pub struct LabeledSuccessors<F>(pub F);

/// Adapter for closures yielding `(successor, weight)`.
#[derive(Clone, Copy, Debug)]
pub struct WeightedEdges<F>(pub F);

/// Adapter for closures yielding `(successor, weight, label)`.
#[derive(Clone, Copy, Debug)]
pub struct LabeledEdges<F>(pub F);

fn plain<V>(to: V) -> Edge<V> {
    Edge::new(to)
}

fn labeled<V, L>((to, label): (V, L)) -> Edge<V, (), L> {
    Edge::with(to, (), label)
}

fn weighted<V, W>((to, weight): (V, W)) -> Edge<V, W> {
    Edge::with(to, weight, ())
}

fn full<V, W, L>((to, weight, label): (V, W, L)) -> Edge<V, W, L> {
    Edge::with(to, weight, label)
}

impl<V, C, F, It> Adjacency<V, (), (), C> for Successors<F>
where
    C: ?Sized,
    F: FnMut(&V, &C) -> It,
    It: IntoIterator<Item = V>,
{
    type Edges = Map<It::IntoIter, fn(V) -> Edge<V>>;

    fn edges_from(&mut self, vertex: &V, context: &C) -> Self::Edges {
        (self.0)(vertex, context).into_iter().map(plain as fn(V) -> Edge<V>)
    }
}

impl<V, L, C, F, It> Adjacency<V, (), L, C> for LabeledSuccessors<F>
where
    C: ?Sized,
    F: FnMut(&V, &C) -> It,
    It: IntoIterator<Item = (V, L)>,
{
    type Edges = Map<It::IntoIter, fn((V, L)) -> Edge<V, (), L>>;

    fn edges_from(&mut self, vertex: &V, context: &C) -> Self::Edges {
        (self.0)(vertex, context)
            .into_iter()
            .map(labeled as fn((V, L)) -> Edge<V, (), L>)
    }
}

impl<V, W, C, F, It> Adjacency<V, W, (), C> for WeightedEdges<F>
where
    C: ?Sized,
    F: FnMut(&V, &C) -> It,
    It: IntoIterator<Item = (V, W)>,
{
    type Edges = Map<It::IntoIter, fn((V, W)) -> Edge<V, W>>;

    fn edges_from(&mut self, vertex: &V, context: &C) -> Self::Edges {
        (self.0)(vertex, context)
            .into_iter()
            .map(weighted as fn((V, W)) -> Edge<V, W>)
    }
}

impl<V, W, L, C, F, It> Adjacency<V, W, L, C> for LabeledEdges<F>
where
    C: ?Sized,
    F: FnMut(&V, &C) -> It,
    It: IntoIterator<Item = (V, W, L)>,
{
    type Edges = Map<It::IntoIter, fn((V, W, L)) -> Edge<V, W, L>>;

    fn edges_from(&mut self, vertex: &V, context: &C) -> Self::Edges {
        (self.0)(vertex, context)
            .into_iter()
            .map(full as fn((V, W, L)) -> Edge<V, W, L>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapters_shape_edges() {
        let mut plain = Successors(|v: &u32, _: &()| vec![v + 1, v + 2]);
        let edges: Vec<_> = plain.edges_from(&1, &()).collect();
        assert_eq!(edges, vec![Edge::new(2), Edge::new(3)]);

        let mut weighted = WeightedEdges(|v: &u32, _: &()| [(v * 2, 5u64)]);
        let edges: Vec<_> = weighted.edges_from(&3, &()).collect();
        assert_eq!(edges, vec![Edge::with(6, 5u64, ())]);

        let mut labeled = LabeledEdges(|_: &u32, _: &()| [(0u32, 1i32, 'x')]);
        let edge = labeled.edges_from(&3, &()).next().unwrap();
        assert_eq!(edge.label, 'x');
    }

    #[test]
    fn tree_edge_serializes() {
        let e = TreeEdge {
            from: 1u32,
            to: 2u32,
            weight: 3u64,
            label: (),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: TreeEdge<u32, u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
