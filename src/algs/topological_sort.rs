//! Topological sort: depth-first post-order, so every vertex is reported
//! after all vertices reachable from it. With edges pointing from a task to
//! its prerequisites, the report order is an execution order.
//!
//! A back edge proves a cycle. The run then fails with `CycleDetected` and
//! [`TraversalTopologicalSort::cycle_from_start`] holds the closed walk from
//! the start vertex to the repeated vertex.

use super::depth_first::{DepthFirstOptions, DepthFirstState, DfsEvent, TraversalDepthFirst};
use super::strategy::{Phase, StartOptions, Traversal, render_paths, render_state};
use crate::gear::{Gear, HashGear};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::{
    Adjacency, Identity, KeyLike, LabeledSuccessors, Successors, VertexIdentity, VertexLike,
};

pub struct TraversalTopologicalSort<V, A, L = (), I = Identity, G = HashGear>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, DepthFirstState<V, L, I, G>>,
{
    inner: TraversalDepthFirst<V, A, L, I, G>,
    cycle: Vec<V>,
}

impl<V, F, It> TraversalTopologicalSort<V, Successors<F>>
where
    V: KeyLike,
    F: FnMut(&V, &DepthFirstState<V, (), Identity, HashGear>) -> It,
    It: IntoIterator<Item = V>,
{
    pub fn new(next_vertices: F) -> Self {
        Self::from_adjacency(Successors(next_vertices), Identity, HashGear::new())
    }
}

impl<V, L, F, It> TraversalTopologicalSort<V, LabeledSuccessors<F>, L>
where
    V: KeyLike,
    L: Clone,
    F: FnMut(&V, &DepthFirstState<V, L, Identity, HashGear>) -> It,
    It: IntoIterator<Item = (V, L)>,
{
    pub fn new_labeled(next_edges: F) -> Self {
        Self::from_adjacency(LabeledSuccessors(next_edges), Identity, HashGear::new())
    }
}

impl<V, I, G, F, It> TraversalTopologicalSort<V, Successors<F>, (), I, G>
where
    V: VertexLike,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    F: FnMut(&V, &DepthFirstState<V, (), I, G>) -> It,
    It: IntoIterator<Item = V>,
{
    pub fn with_gear(next_vertices: F, identity: I, gear: G) -> Self {
        Self::from_adjacency(Successors(next_vertices), identity, gear)
    }
}

impl<V, A, L, I, G> TraversalTopologicalSort<V, A, L, I, G>
where
    V: VertexLike,
    L: Clone,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, DepthFirstState<V, L, I, G>>,
{
    pub fn from_adjacency(next_edges: A, identity: I, gear: G) -> Self {
        Self {
            inner: TraversalDepthFirst::from_adjacency(next_edges, identity, gear),
            cycle: Vec::new(),
        }
    }

    pub fn start_from<S>(&mut self, starts: S) -> &mut Self
    where
        S: IntoIterator<Item = V>,
        S::IntoIter: 'static,
    {
        self.start_from_with(starts, StartOptions::default())
    }

    /// `is_tree` is ignored: cycle detection needs the visited set.
    pub fn start_from_with<S>(&mut self, starts: S, options: StartOptions<G::Set>) -> &mut Self
    where
        S: IntoIterator<Item = V>,
        S::IntoIter: 'static,
    {
        let StartOptions {
            build_paths,
            calculation_limit,
            already_visited,
            is_tree: _,
        } = options;
        let mut dfs = DepthFirstOptions::new()
            .report(DfsEvent::LEAVING | DfsEvent::BACK_EDGE)
            .compute_trace(true)
            .build_paths(build_paths);
        dfs.calculation_limit = calculation_limit;
        dfs.already_visited = already_visited;
        self.cycle.clear();
        self.inner.reset(starts, dfs);
        self
    }

    fn advance(&mut self) -> Result<Option<V>, TraversalError> {
        let Some(vertex) = self.inner.advance()? else {
            return Ok(None);
        };
        if self.inner.state.event != DfsEvent::BACK_EDGE {
            return Ok(Some(vertex));
        }
        // the trace of a back edge ends with its target, closing the cycle
        let cycle = self.inner.state.trace.clone();
        self.inner.abort();
        log::debug!("topological sort found cycle {cycle:?}");
        let err = TraversalError::CycleDetected {
            cycle: format!("{cycle:?}"),
        };
        self.cycle = cycle;
        Err(err)
    }

    /// After `CycleDetected`: start vertex, ..., repeated vertex. Empty otherwise.
    pub fn cycle_from_start(&self) -> &[V] {
        &self.cycle
    }

    /// Depth of the last reported vertex in the depth-first tree.
    pub fn depth(&self) -> usize {
        self.inner.depth()
    }

    pub fn visited(&self) -> &G::Set {
        self.inner.visited()
    }

    pub fn take_visited(&mut self) -> G::Set {
        self.inner.take_visited()
    }

    pub fn paths(&self) -> Option<&PathStore<V, (), L, I, G>> {
        self.inner.paths()
    }
}

impl<V, A, L, I, G> Traversal for TraversalTopologicalSort<V, A, L, I, G>
where
    V: VertexLike,
    L: Clone,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, DepthFirstState<V, L, I, G>>,
{
    type Vertex = V;
    type Key = I::Key;

    fn next_vertex(&mut self) -> Result<Option<V>, TraversalError> {
        self.advance()
    }

    fn key_of(&self, vertex: &V) -> I::Key {
        self.inner.key_of(vertex)
    }

    fn phase(&self) -> Phase {
        self.inner.phase()
    }

    fn expanded_vertices(&self) -> usize {
        self.inner.expanded_vertices()
    }

    fn state_to_string(&self, vertices: &[V]) -> String {
        render_state(
            "TraversalTopologicalSort",
            &[
                ("phase", format!("{:?}", self.inner.phase())),
                ("depth", self.inner.depth().to_string()),
                ("cycle", format!("{:?}", self.cycle)),
                ("paths", render_paths(self.inner.paths(), vertices)),
            ],
        )
    }
}
