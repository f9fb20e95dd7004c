//! Minimum spanning tree (Jarník / Prim).
//!
//! Grows a tree from the start vertices, always adding the cheapest edge that
//! leads out of the tree. Each reported vertex comes with the tree edge that
//! attached it ([`TraversalMinimumSpanningTree::edge`]). Weights may be
//! negative. The adjacency should be symmetric (undirected graph);
//! otherwise the result is the tree of cheapest attaching edges in edge
//! direction.

use super::frontier::Frontier;
use super::strategy::{Budget, Phase, StartOptions, Traversal, render_paths, render_state};
use crate::gear::{Gear, HashGear, VertexSet};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::{
    Adjacency, Edge, Identity, KeyLike, LabeledEdges, TreeEdge, VertexIdentity, VertexLike,
    Weight, WeightedEdges,
};

/// Context of a spanning-tree traversal, passed to its adjacency.
pub struct SpanningTreeState<V, W, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    pub(crate) edge: Option<TreeEdge<V, W, L>>,
    pub(crate) visited: G::Set,
    pub(crate) paths: Option<PathStore<V, W, L, I, G>>,
}

impl<V, W, L, I, G> SpanningTreeState<V, W, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    /// The tree edge of the last reported vertex.
    pub fn edge(&self) -> Option<&TreeEdge<V, W, L>> {
        self.edge.as_ref()
    }

    /// Keys of the tree vertices.
    pub fn visited(&self) -> &G::Set {
        &self.visited
    }

    pub fn paths(&self) -> Option<&PathStore<V, W, L, I, G>> {
        self.paths.as_ref()
    }
}

pub struct TraversalMinimumSpanningTree<V, W, A, L = (), I = Identity, G = HashGear<W>>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
    A: Adjacency<V, W, L, SpanningTreeState<V, W, L, I, G>>,
{
    next_edges: A,
    identity: I,
    gear: G,
    state: SpanningTreeState<V, W, L, I, G>,
    phase: Phase,
    budget: Budget,
    frontier: Frontier<W, (V, Edge<V, W, L>)>,
    /// tree vertices whose edges are still to be added to the frontier
    to_expand: Vec<V>,
}

impl<V, W, F, It> TraversalMinimumSpanningTree<V, W, WeightedEdges<F>>
where
    V: KeyLike,
    W: Weight,
    F: FnMut(&V, &SpanningTreeState<V, W, (), Identity, HashGear<W>>) -> It,
    It: IntoIterator<Item = (V, W)>,
{
    pub fn new(next_edges: F) -> Self {
        Self::from_adjacency(WeightedEdges(next_edges), Identity, HashGear::new())
    }
}

impl<V, W, L, F, It> TraversalMinimumSpanningTree<V, W, LabeledEdges<F>, L>
where
    V: KeyLike,
    W: Weight,
    L: Clone,
    F: FnMut(&V, &SpanningTreeState<V, W, L, Identity, HashGear<W>>) -> It,
    It: IntoIterator<Item = (V, W, L)>,
{
    pub fn new_labeled(next_edges: F) -> Self {
        Self::from_adjacency(LabeledEdges(next_edges), Identity, HashGear::new())
    }
}

impl<V, W, I, G, F, It> TraversalMinimumSpanningTree<V, W, WeightedEdges<F>, (), I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    F: FnMut(&V, &SpanningTreeState<V, W, (), I, G>) -> It,
    It: IntoIterator<Item = (V, W)>,
{
    pub fn with_gear(next_edges: F, identity: I, gear: G) -> Self {
        Self::from_adjacency(WeightedEdges(next_edges), identity, gear)
    }
}

impl<V, W, A, L, I, G> TraversalMinimumSpanningTree<V, W, A, L, I, G>
where
    V: VertexLike,
    W: Weight,
    L: Clone,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    A: Adjacency<V, W, L, SpanningTreeState<V, W, L, I, G>>,
{
    pub fn from_adjacency(next_edges: A, identity: I, gear: G) -> Self {
        let state = SpanningTreeState {
            edge: None,
            visited: gear.vertex_set(),
            paths: None,
        };
        let frontier = Frontier::new(gear.priority_queue());
        Self {
            next_edges,
            identity,
            gear,
            state,
            phase: Phase::Created,
            budget: Budget::default(),
            frontier,
            to_expand: Vec::new(),
        }
    }

    pub fn start_from<S>(&mut self, starts: S) -> &mut Self
    where
        S: IntoIterator<Item = V>,
    {
        self.start_from_with(starts, StartOptions::default())
    }

    /// `is_tree` is ignored: the visited set is what keeps the result a tree.
    pub fn start_from_with<S>(&mut self, starts: S, options: StartOptions<G::Set>) -> &mut Self
    where
        S: IntoIterator<Item = V>,
    {
        let StartOptions {
            build_paths,
            calculation_limit,
            already_visited,
            is_tree: _,
        } = options;
        self.state.visited = already_visited.unwrap_or_else(|| self.gear.vertex_set());
        self.state.paths = build_paths.then(|| PathStore::new(&self.gear, self.identity.clone()));
        self.state.edge = None;
        self.budget = Budget::new(calculation_limit);
        self.frontier.clear();
        self.to_expand.clear();
        for start in starts {
            let key = self.identity.key(&start);
            if let Some(paths) = self.state.paths.as_mut() {
                paths.add_root(key.clone());
            }
            self.state.visited.insert(key);
            self.to_expand.push(start);
        }
        self.to_expand.reverse();
        log::debug!(
            "minimum spanning tree started from {} vertices",
            self.to_expand.len()
        );
        self.phase = Phase::Started;
        self
    }

    fn advance(&mut self) -> Result<Option<V>, TraversalError> {
        match self.phase {
            Phase::Created => return Err(TraversalError::NotStarted),
            Phase::Exhausted => return Ok(None),
            Phase::Started => {}
        }
        loop {
            while let Some(vertex) = self.to_expand.pop() {
                if let Err(e) = self.budget.expand() {
                    self.phase = Phase::Exhausted;
                    return Err(e);
                }
                log::trace!("expanding {vertex:?}");
                for edge in self.next_edges.edges_from(&vertex, &self.state) {
                    if !self.state.visited.contains(&self.identity.key(&edge.to)) {
                        self.frontier.push(edge.weight, (vertex.clone(), edge));
                    }
                }
            }
            let Some((weight, (from, edge))) = self.frontier.pop() else {
                self.phase = Phase::Exhausted;
                return Ok(None);
            };
            let key = self.identity.key(&edge.to);
            if !self.state.visited.insert(key.clone()) {
                continue;
            }
            if let Some(paths) = self.state.paths.as_mut() {
                paths.append(key, from.clone(), weight, edge.label.clone());
            }
            self.to_expand.push(edge.to.clone());
            self.state.edge = Some(TreeEdge {
                from,
                to: edge.to.clone(),
                weight,
                label: edge.label,
            });
            return Ok(Some(edge.to));
        }
    }

    /// The tree edge that attached the last reported vertex.
    pub fn edge(&self) -> Option<&TreeEdge<V, W, L>> {
        self.state.edge.as_ref()
    }

    pub fn visited(&self) -> &G::Set {
        &self.state.visited
    }

    pub fn paths(&self) -> Option<&PathStore<V, W, L, I, G>> {
        self.state.paths.as_ref()
    }

    pub fn state(&self) -> &SpanningTreeState<V, W, L, I, G> {
        &self.state
    }
}

impl<V, W, A, L, I, G> Traversal for TraversalMinimumSpanningTree<V, W, A, L, I, G>
where
    V: VertexLike,
    W: Weight,
    L: Clone,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    A: Adjacency<V, W, L, SpanningTreeState<V, W, L, I, G>>,
{
    type Vertex = V;
    type Key = I::Key;

    fn next_vertex(&mut self) -> Result<Option<V>, TraversalError> {
        self.advance()
    }

    fn key_of(&self, vertex: &V) -> I::Key {
        self.identity.key(vertex)
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn expanded_vertices(&self) -> usize {
        self.budget.expanded()
    }

    fn state_to_string(&self, vertices: &[V]) -> String {
        let edge = match &self.state.edge {
            Some(e) => format!("{:?} -> {:?} ({:?})", e.from, e.to, e.weight),
            None => "none".to_string(),
        };
        render_state(
            "TraversalMinimumSpanningTree",
            &[
                ("phase", format!("{:?}", self.phase)),
                ("edge", edge),
                ("visited", self.state.visited.len().to_string()),
                ("frontier", self.frontier.len().to_string()),
                ("paths", render_paths(self.state.paths.as_ref(), vertices)),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_with_diagonal() {
        //  a -1- b
        //  |4  / |2
        //  c -3- d      b-c: 1
        let mut mst = TraversalMinimumSpanningTree::new(|v: &char, _: &_| -> Vec<(char, i32)> {
            match v {
                'a' => vec![('b', 1), ('c', 4)],
                'b' => vec![('a', 1), ('c', 1), ('d', 2)],
                'c' => vec![('a', 4), ('b', 1), ('d', 3)],
                _ => vec![('b', 2), ('c', 3)],
            }
        });
        mst.start_from(['a']);
        let mut total = 0;
        let mut tree = Vec::new();
        while let Some(v) = mst.next_vertex().unwrap() {
            let e = mst.edge().unwrap();
            total += e.weight;
            tree.push((e.from, v));
        }
        assert_eq!(total, 4);
        assert_eq!(tree, vec![('a', 'b'), ('b', 'c'), ('b', 'd')]);
    }
}
