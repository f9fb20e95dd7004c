//! Dijkstra shortest paths over non-negative weights.
//!
//! Vertices are reported in non-decreasing distance from the start vertices,
//! each exactly once, with its final distance. The frontier is a min-heap
//! with lazy deletion: an improved distance pushes a new entry, and entries
//! whose priority exceeds the recorded distance of their vertex are skipped
//! when popped. A reported vertex is expanded at the next pull, so stopping
//! after a report costs no further adjacency calls.

use std::ops::Range;

use hashbrown::HashSet;

use super::frontier::Frontier;
use super::strategy::{Budget, Phase, RangeQuery, Traversal, render_paths, render_state};
use crate::gear::{DistanceMap, HashGear, WeightedGear};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::weight::extend_distance;
use crate::vertex::{
    Adjacency, Edge, Identity, KeyLike, LabeledEdges, VertexIdentity, VertexLike, Weight,
    WeightedEdges,
};

/// Options of [`TraversalShortestPaths::start_from_with`]. `D` is the
/// distance map type of the gear.
#[derive(Clone, Debug)]
pub struct ShortestPathsOptions<D> {
    pub(crate) build_paths: bool,
    pub(crate) calculation_limit: Option<usize>,
    pub(crate) known_distances: Option<D>,
    pub(crate) keep_distances: bool,
}

impl<D> Default for ShortestPathsOptions<D> {
    fn default() -> Self {
        Self {
            build_paths: false,
            calculation_limit: None,
            known_distances: None,
            keep_distances: false,
        }
    }
}

impl<D> ShortestPathsOptions<D> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn build_paths(mut self, yes: bool) -> Self {
        self.build_paths = yes;
        self
    }
    pub fn calculation_limit(mut self, limit: usize) -> Self {
        self.calculation_limit = Some(limit);
        self
    }
    /// Upper bounds for distances, e.g. from an earlier run. Vertices are
    /// only reached by paths shorter than their known distance.
    pub fn known_distances(mut self, distances: D) -> Self {
        self.known_distances = Some(distances);
        self
    }
    /// Expose the distance map through [`TraversalShortestPaths::distances`].
    /// It holds final distances for reported vertices and tentative ones for
    /// vertices still in the frontier.
    pub fn keep_distances(mut self, yes: bool) -> Self {
        self.keep_distances = yes;
        self
    }
}

/// Context of a shortest-paths traversal, passed to its adjacency.
pub struct ShortestPathsState<V, W, L, I, G>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: WeightedGear<I::Key, W>,
{
    pub(crate) distance: W,
    pub(crate) depth: usize,
    pub(crate) distances: G::Distances,
    pub(crate) paths: Option<PathStore<V, W, L, I, G>>,
}

impl<V, W, L, I, G> ShortestPathsState<V, W, L, I, G>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: WeightedGear<I::Key, W>,
{
    /// Distance of the current vertex (the one reported or being expanded).
    pub fn distance(&self) -> W {
        self.distance
    }

    /// Edge count of the shortest path found to the current vertex.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn paths(&self) -> Option<&PathStore<V, W, L, I, G>> {
        self.paths.as_ref()
    }
}

struct Pending<V, W, L> {
    vertex: V,
    depth: usize,
    via: Option<(V, W, L)>,
}

/// A relaxed edge, seen by the bidirectional coordinator.
pub(crate) struct Relaxation<'a, V, W, L> {
    pub(crate) from: &'a V,
    pub(crate) from_distance: W,
    pub(crate) edge: &'a Edge<V, W, L>,
}

pub struct TraversalShortestPaths<V, W, A, L = (), I = Identity, G = HashGear<W>>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: WeightedGear<I::Key, W>,
    A: Adjacency<V, W, L, ShortestPathsState<V, W, L, I, G>>,
{
    next_edges: A,
    identity: I,
    gear: G,
    state: ShortestPathsState<V, W, L, I, G>,
    phase: Phase,
    budget: Budget,
    frontier: Frontier<W, Pending<V, W, L>>,
    expand_next: Option<V>,
    keep_distances: bool,
    start_keys: HashSet<I::Key>,
}

impl<V, W, F, It> TraversalShortestPaths<V, W, WeightedEdges<F>>
where
    V: KeyLike,
    W: Weight,
    F: FnMut(&V, &ShortestPathsState<V, W, (), Identity, HashGear<W>>) -> It,
    It: IntoIterator<Item = (V, W)>,
{
    /// Traversal over the `(successor, weight)` pairs returned by `next_edges`.
    pub fn new(next_edges: F) -> Self {
        Self::from_adjacency(WeightedEdges(next_edges), Identity, HashGear::new())
    }
}

impl<V, W, L, F, It> TraversalShortestPaths<V, W, LabeledEdges<F>, L>
where
    V: KeyLike,
    W: Weight,
    F: FnMut(&V, &ShortestPathsState<V, W, L, Identity, HashGear<W>>) -> It,
    It: IntoIterator<Item = (V, W, L)>,
{
    pub fn new_labeled(next_edges: F) -> Self {
        Self::from_adjacency(LabeledEdges(next_edges), Identity, HashGear::new())
    }
}

impl<V, W, I, G, F, It> TraversalShortestPaths<V, W, WeightedEdges<F>, (), I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W>,
    F: FnMut(&V, &ShortestPathsState<V, W, (), I, G>) -> It,
    It: IntoIterator<Item = (V, W)>,
{
    pub fn with_gear(next_edges: F, identity: I, gear: G) -> Self {
        Self::from_adjacency(WeightedEdges(next_edges), identity, gear)
    }
}

impl<V, W, A, L, I, G> TraversalShortestPaths<V, W, A, L, I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W>,
    A: Adjacency<V, W, L, ShortestPathsState<V, W, L, I, G>>,
{
    pub fn from_adjacency(next_edges: A, identity: I, gear: G) -> Self {
        let state = ShortestPathsState {
            distance: gear.zero(),
            depth: 0,
            distances: gear.distance_map(),
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
            expand_next: None,
            keep_distances: false,
            start_keys: HashSet::new(),
        }
    }

    pub fn start_from<S>(&mut self, starts: S) -> &mut Self
    where
        S: IntoIterator<Item = V>,
    {
        self.start_from_with(starts, ShortestPathsOptions::default())
    }

    pub fn start_from_with<S>(
        &mut self,
        starts: S,
        options: ShortestPathsOptions<G::Distances>,
    ) -> &mut Self
    where
        S: IntoIterator<Item = V>,
    {
        let ShortestPathsOptions {
            build_paths,
            calculation_limit,
            known_distances,
            keep_distances,
        } = options;
        let zero = self.gear.zero();
        self.state.distances = known_distances.unwrap_or_else(|| self.gear.distance_map());
        self.state.paths = build_paths.then(|| PathStore::new(&self.gear, self.identity.clone()));
        self.state.distance = zero;
        self.state.depth = 0;
        self.keep_distances = keep_distances;
        self.budget = Budget::new(calculation_limit);
        self.frontier.clear();
        self.expand_next = None;

        self.start_keys.clear();
        for start in starts {
            let key = self.identity.key(&start);
            if !self.start_keys.insert(key.clone()) {
                continue;
            }
            if let Some(paths) = self.state.paths.as_mut() {
                paths.add_root(key.clone());
            }
            // a finite known distance offsets the start
            let known = self.state.distances.distance(&key);
            let distance = if known < self.state.distances.infinity() {
                known
            } else {
                zero
            };
            self.state.distances.set_distance(key, distance);
            self.frontier.push(
                distance,
                Pending {
                    vertex: start,
                    depth: 0,
                    via: None,
                },
            );
        }
        log::debug!(
            "shortest paths started from {} vertices",
            self.start_keys.len()
        );
        self.phase = Phase::Started;
        self
    }

    pub(crate) fn advance_observed<O>(&mut self, observer: &mut O) -> Result<Option<V>, TraversalError>
    where
        O: FnMut(Relaxation<'_, V, W, L>),
    {
        match self.phase {
            Phase::Created => return Err(TraversalError::NotStarted),
            Phase::Exhausted => return Ok(None),
            Phase::Started => {}
        }
        loop {
            if let Some(vertex) = self.expand_next.take() {
                if let Err(e) = self.expand(&vertex, observer) {
                    log::debug!("shortest paths failed expanding {vertex:?}: {e}");
                    self.phase = Phase::Exhausted;
                    return Err(e);
                }
            }
            let Some((distance, pending)) = self.frontier.pop() else {
                log::debug!(
                    "shortest paths exhausted after {} expansions",
                    self.budget.expanded()
                );
                self.phase = Phase::Exhausted;
                return Ok(None);
            };
            let key = self.identity.key(&pending.vertex);
            if distance > self.state.distances.distance(&key) {
                continue;
            }
            self.state.distance = distance;
            self.state.depth = pending.depth;
            // a start reached more cheaply from another start is expanded
            // through it, but still not reported
            let is_start = self.start_keys.contains(&key);
            if let (Some(paths), Some((predecessor, weight, label))) =
                (self.state.paths.as_mut(), pending.via)
            {
                if is_start {
                    paths.replace(key, predecessor, weight, label);
                } else {
                    paths.append(key, predecessor, weight, label);
                }
            }
            self.expand_next = Some(pending.vertex.clone());
            if !is_start {
                return Ok(Some(pending.vertex));
            }
        }
    }

    fn expand<O>(&mut self, vertex: &V, observer: &mut O) -> Result<(), TraversalError>
    where
        O: FnMut(Relaxation<'_, V, W, L>),
    {
        self.budget.expand()?;
        let from_distance = self.state.distance;
        let depth = self.state.depth;
        let zero = self.gear.zero();
        let infinity = self.gear.infinity();
        log::trace!("expanding {vertex:?} at distance {from_distance:?}");
        for edge in self.next_edges.edges_from(vertex, &self.state) {
            if edge.weight < zero {
                return Err(TraversalError::NegativeWeight(format!(
                    "{:?} on edge {vertex:?} -> {:?}",
                    edge.weight, edge.to
                )));
            }
            observer(Relaxation {
                from: vertex,
                from_distance,
                edge: &edge,
            });
            let distance = extend_distance(from_distance, edge.weight, infinity)?;
            let key = self.identity.key(&edge.to);
            if distance < self.state.distances.distance(&key) {
                self.state.distances.set_distance(key, distance);
                self.frontier.push(
                    distance,
                    Pending {
                        vertex: edge.to,
                        depth: depth + 1,
                        via: Some((vertex.clone(), edge.weight, edge.label)),
                    },
                );
            }
        }
        Ok(())
    }

    /// Distance of the last reported vertex.
    pub fn distance(&self) -> W {
        self.state.distance
    }

    /// Edge count of the shortest path to the last reported vertex.
    pub fn depth(&self) -> usize {
        self.state.depth
    }

    /// The distance map, if `keep_distances` was requested.
    pub fn distances(&self) -> Option<&G::Distances> {
        self.keep_distances.then_some(&self.state.distances)
    }

    pub fn paths(&self) -> Option<&PathStore<V, W, L, I, G>> {
        self.state.paths.as_ref()
    }

    pub fn state(&self) -> &ShortestPathsState<V, W, L, I, G> {
        &self.state
    }

    /// Reported vertices with distance in `range`.
    pub fn go_for_distance_range(&mut self, range: Range<W>) -> RangeQuery<'_, Self, W> {
        RangeQuery::new(self, range, |t| t.state.distance)
    }
}

impl<V, W, A, L, I, G> Traversal for TraversalShortestPaths<V, W, A, L, I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W>,
    A: Adjacency<V, W, L, ShortestPathsState<V, W, L, I, G>>,
{
    type Vertex = V;
    type Key = I::Key;

    fn next_vertex(&mut self) -> Result<Option<V>, TraversalError> {
        self.advance_observed(&mut |_| {})
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
            "TraversalShortestPaths",
            &[
                ("phase", format!("{:?}", self.phase)),
                ("distance", format!("{:?}", self.state.distance)),
                ("depth", self.state.depth.to_string()),
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
    fn triangle_prefers_two_cheap_edges() {
        let mut sp = TraversalShortestPaths::new(|v: &char, _: &_| match v {
            'a' => vec![('b', 1u32), ('c', 5)],
            'b' => vec![('c', 1)],
            _ => vec![],
        });
        sp.start_from_with(['a'], ShortestPathsOptions::new().build_paths(true));
        assert_eq!(sp.next_vertex(), Ok(Some('b')));
        assert_eq!(sp.distance(), 1);
        assert_eq!(sp.next_vertex(), Ok(Some('c')));
        assert_eq!(sp.distance(), 2);
        assert_eq!(sp.depth(), 2);
        assert_eq!(sp.paths().unwrap().path(&'c').unwrap(), vec!['a', 'b', 'c']);
        assert_eq!(sp.next_vertex(), Ok(None));
    }

    #[test]
    fn negative_weight_is_fatal() {
        let mut sp = TraversalShortestPaths::new(|_: &u8, _: &_| [(1u8, -1i32)]);
        sp.start_from([0]);
        assert!(matches!(
            sp.next_vertex(),
            Err(TraversalError::NegativeWeight(_))
        ));
        assert_eq!(sp.phase(), Phase::Exhausted);
    }

    #[test]
    fn reported_vertex_is_expanded_lazily() {
        let mut calls = 0;
        let mut sp = TraversalShortestPaths::new(|v: &u32, _: &_| {
            calls += 1;
            [(v + 1, 1u32)]
        });
        sp.start_from([0]);
        assert_eq!(sp.next_vertex(), Ok(Some(1)));
        assert_eq!(sp.expanded_vertices(), 1);
        drop(sp);
        assert_eq!(calls, 1);
    }
}
