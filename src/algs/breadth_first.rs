//! Breadth-first traversal: vertices in non-decreasing edge count (depth)
//! from the start vertices.
//!
//! Vertices are reported when first seen, i.e. while their predecessor is
//! expanded; a reported vertex is expanded only after every vertex of its
//! depth has been reported. Start vertices are not reported.

use std::collections::VecDeque;
use std::ops::Range;

use super::strategy::{
    Budget, Phase, RangeQuery, SearchState, StartOptions, Traversal, render_paths, render_state,
};
use crate::gear::{Gear, HashGear, VertexSet};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::{
    Adjacency, Identity, KeyLike, LabeledSuccessors, Successors, VertexIdentity, VertexLike,
};

/// Lazy breadth-first search.
///
/// The adjacency receives the strategy's [`SearchState`]: while a vertex is
/// expanded, `depth()` is the depth of that vertex.
pub struct TraversalBreadthFirst<V, A, L = (), I = Identity, G = HashGear>
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
    /// depth of the vertices in `to_expand`
    level: usize,
    to_expand: VecDeque<V>,
    next_level: VecDeque<V>,
    expanding: Option<(V, A::Edges)>,
}

impl<V, F, It> TraversalBreadthFirst<V, Successors<F>>
where
    V: KeyLike,
    F: FnMut(&V, &SearchState<V, (), Identity, HashGear>) -> It,
    It: IntoIterator<Item = V>,
{
    /// Traversal over the successors returned by `next_vertices`.
    pub fn new(next_vertices: F) -> Self {
        Self::from_adjacency(Successors(next_vertices), Identity, HashGear::new())
    }
}

impl<V, L, F, It> TraversalBreadthFirst<V, LabeledSuccessors<F>, L>
where
    V: KeyLike,
    F: FnMut(&V, &SearchState<V, L, Identity, HashGear>) -> It,
    It: IntoIterator<Item = (V, L)>,
{
    /// Traversal over `(successor, label)` pairs; labels are kept on paths.
    pub fn new_labeled(next_edges: F) -> Self {
        Self::from_adjacency(LabeledSuccessors(next_edges), Identity, HashGear::new())
    }
}

impl<V, I, G, F, It> TraversalBreadthFirst<V, Successors<F>, (), I, G>
where
    V: VertexLike,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    F: FnMut(&V, &SearchState<V, (), I, G>) -> It,
    It: IntoIterator<Item = V>,
{
    /// Like [`new`](TraversalBreadthFirst::new) with explicit identity and gear.
    pub fn with_gear(next_vertices: F, identity: I, gear: G) -> Self {
        Self::from_adjacency(Successors(next_vertices), identity, gear)
    }
}

impl<V, A, L, I, G> TraversalBreadthFirst<V, A, L, I, G>
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
            level: 0,
            to_expand: VecDeque::new(),
            next_level: VecDeque::new(),
            expanding: None,
        }
    }

    /// Starts (or restarts) the traversal with default options.
    pub fn start_from<S>(&mut self, starts: S) -> &mut Self
    where
        S: IntoIterator<Item = V>,
    {
        self.start_from_with(starts, StartOptions::default())
    }

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
        self.level = 0;
        self.to_expand.clear();
        self.next_level.clear();
        self.expanding = None;
        for start in starts {
            let key = self.identity.key(&start);
            if let Some(paths) = self.state.paths.as_mut() {
                paths.add_root(key.clone());
            }
            if !is_tree {
                self.state.visited.insert(key);
            }
            self.to_expand.push_back(start);
        }
        log::debug!(
            "breadth-first search started from {} vertices",
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
            if let Some((from, edges)) = self.expanding.as_mut() {
                for edge in edges.by_ref() {
                    let key = self.identity.key(&edge.to);
                    if !self.is_tree && !self.state.visited.insert(key.clone()) {
                        continue;
                    }
                    if let Some(paths) = self.state.paths.as_mut() {
                        paths.append(key, from.clone(), (), edge.label);
                    }
                    self.state.depth = self.level + 1;
                    self.next_level.push_back(edge.to.clone());
                    return Ok(Some(edge.to));
                }
                self.expanding = None;
            }
            let Some(vertex) = self.to_expand.pop_front() else {
                if self.next_level.is_empty() {
                    log::debug!("breadth-first search exhausted at depth {}", self.level);
                    self.phase = Phase::Exhausted;
                    return Ok(None);
                }
                std::mem::swap(&mut self.to_expand, &mut self.next_level);
                self.level += 1;
                continue;
            };
            if let Err(e) = self.budget.expand() {
                self.phase = Phase::Exhausted;
                return Err(e);
            }
            self.state.depth = self.level;
            log::trace!("expanding {vertex:?} at depth {}", self.level);
            let edges = self.next_edges.edges_from(&vertex, &self.state);
            self.expanding = Some((vertex, edges));
        }
    }

    /// Depth of the last reported vertex.
    pub fn depth(&self) -> usize {
        self.state.depth
    }

    pub fn visited(&self) -> &G::Set {
        &self.state.visited
    }

    /// Hands out the visited set (e.g. for `already_visited` of a later run),
    /// leaving an empty one behind.
    pub fn take_visited(&mut self) -> G::Set {
        std::mem::replace(&mut self.state.visited, self.gear.vertex_set())
    }

    pub fn paths(&self) -> Option<&PathStore<V, (), L, I, G>> {
        self.state.paths.as_ref()
    }

    pub fn state(&self) -> &SearchState<V, L, I, G> {
        &self.state
    }

    /// Reported vertices with depth in `range`.
    pub fn go_for_depth_range(&mut self, range: Range<usize>) -> RangeQuery<'_, Self, usize> {
        RangeQuery::new(self, range, |t| t.state.depth)
    }
}

impl<V, A, L, I, G> Traversal for TraversalBreadthFirst<V, A, L, I, G>
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
            "TraversalBreadthFirst",
            &[
                ("phase", format!("{:?}", self.phase)),
                ("depth", self.state.depth.to_string()),
                ("visited", self.state.visited.len().to_string()),
                ("expanded", self.budget.expanded().to_string()),
                ("paths", render_paths(self.state.paths.as_ref(), vertices)),
            ],
        )
    }
}
