//! Neighbors-then-depth: when a vertex is expanded, all its unseen neighbors
//! are reported first; then the search continues from the last reported one,
//! as in depth-first search. No trace, events or non-tree edges, which makes
//! it the cheapest way to enumerate reachable vertices with a depth.

use super::strategy::{
    Budget, Phase, SearchState, StartOptions, Traversal, render_paths, render_state,
};
use crate::gear::{Gear, HashGear, VertexSet};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::{
    Adjacency, Identity, KeyLike, LabeledSuccessors, Successors, VertexIdentity, VertexLike,
};

pub struct TraversalNeighborsThenDepth<V, A, L = (), I = Identity, G = HashGear>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, SearchState<V, L, I, G>>,
{
    next_edges: A,
    identity: I,
    gear: G,
    state: SearchState<V, L, I, G>,
    phase: Phase,
    budget: Budget,
    is_tree: bool,
    stack: Vec<(V, usize)>,
    expanding: Option<(V, usize, A::Edges)>,
}

impl<V, F, It> TraversalNeighborsThenDepth<V, Successors<F>>
where
    V: KeyLike,
    F: FnMut(&V, &SearchState<V, (), Identity, HashGear>) -> It,
    It: IntoIterator<Item = V>,
{
    pub fn new(next_vertices: F) -> Self {
        Self::from_adjacency(Successors(next_vertices), Identity, HashGear::new())
    }
}

impl<V, L, F, It> TraversalNeighborsThenDepth<V, LabeledSuccessors<F>, L>
where
    V: KeyLike,
    F: FnMut(&V, &SearchState<V, L, Identity, HashGear>) -> It,
    It: IntoIterator<Item = (V, L)>,
{
    pub fn new_labeled(next_edges: F) -> Self {
        Self::from_adjacency(LabeledSuccessors(next_edges), Identity, HashGear::new())
    }
}

impl<V, I, G, F, It> TraversalNeighborsThenDepth<V, Successors<F>, (), I, G>
where
    V: VertexLike,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    F: FnMut(&V, &SearchState<V, (), I, G>) -> It,
    It: IntoIterator<Item = V>,
{
    pub fn with_gear(next_vertices: F, identity: I, gear: G) -> Self {
        Self::from_adjacency(Successors(next_vertices), identity, gear)
    }
}

impl<V, A, L, I, G> TraversalNeighborsThenDepth<V, A, L, I, G>
where
    V: VertexLike,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, SearchState<V, L, I, G>>,
{
    pub fn from_adjacency(next_edges: A, identity: I, gear: G) -> Self {
        let state = SearchState::new(&gear);
        Self {
            next_edges,
            identity,
            gear,
            state,
            phase: Phase::Created,
            budget: Budget::default(),
            is_tree: false,
            stack: Vec::new(),
            expanding: None,
        }
    }

    pub fn start_from<S>(&mut self, starts: S) -> &mut Self
    where
        S: IntoIterator<Item = V>,
    {
        self.start_from_with(starts, StartOptions::default())
    }

    /// The first start vertex is expanded first.
    pub fn start_from_with<S>(&mut self, starts: S, options: StartOptions<G::Set>) -> &mut Self
    where
        S: IntoIterator<Item = V>,
    {
        let StartOptions {
            build_paths,
            calculation_limit,
            already_visited,
            is_tree,
        } = options;
        self.state.visited = already_visited.unwrap_or_else(|| self.gear.vertex_set());
        self.state.paths = build_paths.then(|| PathStore::new(&self.gear, self.identity.clone()));
        self.state.depth = 0;
        self.budget = Budget::new(calculation_limit);
        self.is_tree = is_tree;
        self.expanding = None;
        self.stack.clear();
        for start in starts {
            let key = self.identity.key(&start);
            if let Some(paths) = self.state.paths.as_mut() {
                paths.add_root(key.clone());
            }
            if !is_tree {
                self.state.visited.insert(key);
            }
            self.stack.push((start, 0));
        }
        self.stack.reverse();
        log::debug!(
            "neighbors-then-depth search started from {} vertices",
            self.stack.len()
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
            if let Some((from, depth, edges)) = self.expanding.as_mut() {
                for edge in edges.by_ref() {
                    let key = self.identity.key(&edge.to);
                    if !self.is_tree && !self.state.visited.insert(key.clone()) {
                        continue;
                    }
                    if let Some(paths) = self.state.paths.as_mut() {
                        paths.append(key, from.clone(), (), edge.label);
                    }
                    self.state.depth = *depth + 1;
                    self.stack.push((edge.to.clone(), *depth + 1));
                    return Ok(Some(edge.to));
                }
                self.expanding = None;
            }
            let Some((vertex, depth)) = self.stack.pop() else {
                self.phase = Phase::Exhausted;
                return Ok(None);
            };
            if let Err(e) = self.budget.expand() {
                self.phase = Phase::Exhausted;
                return Err(e);
            }
            self.state.depth = depth;
            log::trace!("expanding {vertex:?} at depth {depth}");
            let edges = self.next_edges.edges_from(&vertex, &self.state);
            self.expanding = Some((vertex, depth, edges));
        }
    }

    pub fn depth(&self) -> usize {
        self.state.depth
    }

    pub fn visited(&self) -> &G::Set {
        &self.state.visited
    }

    pub fn take_visited(&mut self) -> G::Set {
        std::mem::replace(&mut self.state.visited, self.gear.vertex_set())
    }

    pub fn paths(&self) -> Option<&PathStore<V, (), L, I, G>> {
        self.state.paths.as_ref()
    }

    pub fn state(&self) -> &SearchState<V, L, I, G> {
        &self.state
    }
}

impl<V, A, L, I, G> Traversal for TraversalNeighborsThenDepth<V, A, L, I, G>
where
    V: VertexLike,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, SearchState<V, L, I, G>>,
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
        render_state(
            "TraversalNeighborsThenDepth",
            &[
                ("phase", format!("{:?}", self.phase)),
                ("depth", self.state.depth.to_string()),
                ("visited", self.state.visited.len().to_string()),
                ("stack", self.stack.len().to_string()),
                ("paths", render_paths(self.state.paths.as_ref(), vertices)),
            ],
        )
    }
}
