//! A* search: like Dijkstra, but the frontier is ordered by path length plus
//! a heuristic estimate of the remaining distance to a goal.
//!
//! With an admissible heuristic (never overestimating), the first report of
//! a goal carries its shortest path length. Vertices may be reported again
//! when a shorter path is found later (inconsistent heuristic); the stored
//! path is then replaced.

use hashbrown::HashSet;

use super::frontier::Frontier;
use super::strategy::{Budget, Phase, Traversal, render_paths, render_state};
use crate::gear::{DistanceMap, HashGear, WeightedGear};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::weight::extend_distance;
use crate::vertex::{
    Adjacency, Identity, KeyLike, LabeledEdges, VertexIdentity, VertexLike, Weight, WeightedEdges,
};

/// Frontier priority `length + estimate`. `None` when the estimate is
/// infinite or the sum leaves the weight range: no goal is reachable that way.
fn priority<W: Weight>(length: W, estimate: W, infinity: W) -> Option<W> {
    length.checked_sum(estimate).filter(|p| *p < infinity)
}

/// Options of [`TraversalAStar::start_from_with`].
#[derive(Clone, Debug)]
pub struct AStarOptions<D> {
    pub(crate) build_paths: bool,
    pub(crate) calculation_limit: Option<usize>,
    pub(crate) known_path_lengths: Option<D>,
}

impl<D> Default for AStarOptions<D> {
    fn default() -> Self {
        Self {
            build_paths: false,
            calculation_limit: None,
            known_path_lengths: None,
        }
    }
}

impl<D> AStarOptions<D> {
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
    /// Upper bounds of the path lengths, e.g. from an earlier run.
    pub fn known_path_lengths(mut self, lengths: D) -> Self {
        self.known_path_lengths = Some(lengths);
        self
    }
}

/// Context of an A* traversal, passed to its adjacency.
pub struct AStarState<V, W, L, I, G>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: WeightedGear<I::Key, W>,
{
    pub(crate) path_length: W,
    pub(crate) depth: usize,
    pub(crate) path_lengths: G::Distances,
    pub(crate) paths: Option<PathStore<V, W, L, I, G>>,
}

impl<V, W, L, I, G> AStarState<V, W, L, I, G>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: WeightedGear<I::Key, W>,
{
    /// Length of the path by which the current vertex was reached.
    pub fn path_length(&self) -> W {
        self.path_length
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn paths(&self) -> Option<&PathStore<V, W, L, I, G>> {
        self.paths.as_ref()
    }
}

struct Pending<V, W, L> {
    vertex: V,
    path_length: W,
    depth: usize,
    via: Option<(V, W, L)>,
}

type Heuristic<V, W> = Box<dyn FnMut(&V) -> W>;

pub struct TraversalAStar<V, W, A, L = (), I = Identity, G = HashGear<W>>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: WeightedGear<I::Key, W>,
    A: Adjacency<V, W, L, AStarState<V, W, L, I, G>>,
{
    next_edges: A,
    identity: I,
    gear: G,
    state: AStarState<V, W, L, I, G>,
    phase: Phase,
    budget: Budget,
    heuristic: Option<Heuristic<V, W>>,
    frontier: Frontier<W, Pending<V, W, L>>,
    expand_next: Option<V>,
}

impl<V, W, F, It> TraversalAStar<V, W, WeightedEdges<F>>
where
    V: KeyLike,
    W: Weight,
    F: FnMut(&V, &AStarState<V, W, (), Identity, HashGear<W>>) -> It,
    It: IntoIterator<Item = (V, W)>,
{
    pub fn new(next_edges: F) -> Self {
        Self::from_adjacency(WeightedEdges(next_edges), Identity, HashGear::new())
    }
}

impl<V, W, L, F, It> TraversalAStar<V, W, LabeledEdges<F>, L>
where
    V: KeyLike,
    W: Weight,
    F: FnMut(&V, &AStarState<V, W, L, Identity, HashGear<W>>) -> It,
    It: IntoIterator<Item = (V, W, L)>,
{
    pub fn new_labeled(next_edges: F) -> Self {
        Self::from_adjacency(LabeledEdges(next_edges), Identity, HashGear::new())
    }
}

impl<V, W, I, G, F, It> TraversalAStar<V, W, WeightedEdges<F>, (), I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W>,
    F: FnMut(&V, &AStarState<V, W, (), I, G>) -> It,
    It: IntoIterator<Item = (V, W)>,
{
    pub fn with_gear(next_edges: F, identity: I, gear: G) -> Self {
        Self::from_adjacency(WeightedEdges(next_edges), identity, gear)
    }
}

impl<V, W, A, L, I, G> TraversalAStar<V, W, A, L, I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W>,
    A: Adjacency<V, W, L, AStarState<V, W, L, I, G>>,
{
    pub fn from_adjacency(next_edges: A, identity: I, gear: G) -> Self {
        let state = AStarState {
            path_length: gear.zero(),
            depth: 0,
            path_lengths: gear.distance_map(),
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
            heuristic: None,
            frontier,
            expand_next: None,
        }
    }

    /// Starts with `heuristic`, the estimated remaining distance from a vertex
    /// to the nearest goal.
    pub fn start_from<H, S>(&mut self, heuristic: H, starts: S) -> &mut Self
    where
        H: FnMut(&V) -> W + 'static,
        S: IntoIterator<Item = V>,
    {
        self.start_from_with(heuristic, starts, AStarOptions::default())
    }

    pub fn start_from_with<H, S>(
        &mut self,
        heuristic: H,
        starts: S,
        options: AStarOptions<G::Distances>,
    ) -> &mut Self
    where
        H: FnMut(&V) -> W + 'static,
        S: IntoIterator<Item = V>,
    {
        let AStarOptions {
            build_paths,
            calculation_limit,
            known_path_lengths,
        } = options;
        let zero = self.gear.zero();
        let infinity = self.gear.infinity();
        let mut heuristic: Heuristic<V, W> = Box::new(heuristic);
        self.state.path_lengths = known_path_lengths.unwrap_or_else(|| self.gear.distance_map());
        self.state.paths = build_paths.then(|| PathStore::new(&self.gear, self.identity.clone()));
        self.state.path_length = zero;
        self.state.depth = 0;
        self.budget = Budget::new(calculation_limit);
        self.frontier.clear();
        self.expand_next = None;

        let mut seen = HashSet::new();
        for start in starts {
            let key = self.identity.key(&start);
            if !seen.insert(key.clone()) {
                continue;
            }
            let Some(estimate) = priority(zero, heuristic(&start), infinity) else {
                log::trace!("start {start:?} cannot reach a goal");
                continue;
            };
            if let Some(paths) = self.state.paths.as_mut() {
                paths.add_root(key.clone());
            }
            self.state.path_lengths.set_distance(key, zero);
            self.frontier.push(
                estimate,
                Pending {
                    vertex: start,
                    path_length: zero,
                    depth: 0,
                    via: None,
                },
            );
        }
        self.heuristic = Some(heuristic);
        log::debug!("A* started from {} vertices", seen.len());
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
            if let Some(vertex) = self.expand_next.take() {
                if let Err(e) = self.expand(&vertex) {
                    log::debug!("A* failed expanding {vertex:?}: {e}");
                    self.phase = Phase::Exhausted;
                    return Err(e);
                }
            }
            let Some((_, pending)) = self.frontier.pop() else {
                self.phase = Phase::Exhausted;
                return Ok(None);
            };
            let key = self.identity.key(&pending.vertex);
            if pending.path_length > self.state.path_lengths.distance(&key) {
                continue;
            }
            self.state.path_length = pending.path_length;
            self.state.depth = pending.depth;
            let reached = pending.via.is_some();
            if let (Some(paths), Some((predecessor, weight, label))) =
                (self.state.paths.as_mut(), pending.via)
            {
                paths.replace(key, predecessor, weight, label);
            }
            self.expand_next = Some(pending.vertex.clone());
            if reached {
                return Ok(Some(pending.vertex));
            }
        }
    }

    fn expand(&mut self, vertex: &V) -> Result<(), TraversalError> {
        self.budget.expand()?;
        let path_length = self.state.path_length;
        let depth = self.state.depth;
        let zero = self.gear.zero();
        let infinity = self.gear.infinity();
        let Some(heuristic) = self.heuristic.as_mut() else {
            return Err(TraversalError::NotStarted);
        };
        log::trace!("expanding {vertex:?} at path length {path_length:?}");
        for edge in self.next_edges.edges_from(vertex, &self.state) {
            if edge.weight < zero {
                return Err(TraversalError::NegativeWeight(format!(
                    "{:?} on edge {vertex:?} -> {:?}",
                    edge.weight, edge.to
                )));
            }
            let length = extend_distance(path_length, edge.weight, infinity)?;
            let key = self.identity.key(&edge.to);
            if length < self.state.path_lengths.distance(&key) {
                let Some(total) = priority(length, heuristic(&edge.to), infinity) else {
                    log::trace!("pruning {:?}: no goal within reach", edge.to);
                    continue;
                };
                self.state.path_lengths.set_distance(key, length);
                self.frontier.push(
                    total,
                    Pending {
                        vertex: edge.to,
                        path_length: length,
                        depth: depth + 1,
                        via: Some((vertex.clone(), edge.weight, edge.label)),
                    },
                );
            }
        }
        Ok(())
    }

    /// Length of the path to the last reported vertex.
    pub fn path_length(&self) -> W {
        self.state.path_length
    }

    pub fn depth(&self) -> usize {
        self.state.depth
    }

    pub fn paths(&self) -> Option<&PathStore<V, W, L, I, G>> {
        self.state.paths.as_ref()
    }

    pub fn state(&self) -> &AStarState<V, W, L, I, G> {
        &self.state
    }
}

impl<V, W, A, L, I, G> Traversal for TraversalAStar<V, W, A, L, I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W>,
    A: Adjacency<V, W, L, AStarState<V, W, L, I, G>>,
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
            "TraversalAStar",
            &[
                ("phase", format!("{:?}", self.phase)),
                ("path_length", format!("{:?}", self.state.path_length)),
                ("depth", self.state.depth.to_string()),
                ("frontier", self.frontier.len().to_string()),
                ("paths", render_paths(self.state.paths.as_ref(), vertices)),
            ],
        )
    }
}
