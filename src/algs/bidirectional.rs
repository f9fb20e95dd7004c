//! Bidirectional meet-in-the-middle search.
//!
//! A coordinator owns a forward strategy (from the start vertices, over
//! outgoing edges) and a backward strategy (from the goal vertices, over
//! incoming edges, supplied separately by the caller). The two sides take
//! turns and the search ends as soon as no shorter connection than the best
//! meeting found so far is possible.
//!
//! - [`BSearchBreadthFirst`]: each turn completes one breadth-first level of
//!   one side. The search stops when the best meeting is no longer than the
//!   completed forward level plus the completed backward level plus one.
//! - [`BSearchShortestPath`]: the sides alternate pull by pull. Meetings are
//!   found when a vertex is settled by both sides and when an edge relaxed by
//!   one side ends at a vertex settled by the other. The search stops when the
//!   best meeting is no longer than the sum of the last settled distances of
//!   both sides.

use serde::{Deserialize, Serialize};

use super::breadth_first::TraversalBreadthFirst;
use super::shortest_paths::{
    Relaxation, ShortestPathsOptions, ShortestPathsState, TraversalShortestPaths,
};
use super::strategy::{SearchState, StartOptions, Traversal};
use crate::gear::{Gear, HashGear, VertexMap, WeightedGear};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::{
    Adjacency, Identity, KeyLike, Successors, VertexIdentity, VertexLike, Weight, WeightedEdges,
};

/// Result of a bidirectional search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting<V, N> {
    /// Edge count (breadth-first) or weight sum (shortest path) of the best
    /// connection from a start vertex to a goal vertex.
    pub length: N,
    /// The connection itself, from start to goal; only with `build_path`.
    pub path: Option<Vec<V>>,
}

/// Options of the bidirectional `start_from_with` calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct BidirectionalOptions {
    pub(crate) build_path: bool,
    pub(crate) calculation_limit: Option<usize>,
    pub(crate) fail_silently: bool,
}

impl BidirectionalOptions {
    pub fn new() -> Self {
        Self::default()
    }
    /// Materialize [`Meeting::path`].
    pub fn build_path(mut self, yes: bool) -> Self {
        self.build_path = yes;
        self
    }
    /// Expansion cap, applied to each side separately.
    pub fn calculation_limit(mut self, limit: usize) -> Self {
        self.calculation_limit = Some(limit);
        self
    }
    /// Return `Ok(None)` instead of `NoMeeting` when the sides never meet.
    pub fn fail_silently(mut self, yes: bool) -> Self {
        self.fail_silently = yes;
        self
    }
}

/// Best connection found so far. `forward_end` is the last vertex of the
/// forward half, `backward_end` the first vertex of the backward half; they
/// coincide (`joined`) for meetings at a vertex known to both sides.
struct Candidate<V, N> {
    length: N,
    forward_end: V,
    backward_end: V,
    joined: bool,
}

fn offer<V, N: PartialOrd>(best: &mut Option<Candidate<V, N>>, candidate: Candidate<V, N>) {
    if best.as_ref().is_none_or(|b| candidate.length < b.length) {
        *best = Some(candidate);
    }
}

fn join_paths<V, W, L, I, G>(
    forward: Option<&PathStore<V, W, L, I, G>>,
    backward: Option<&PathStore<V, W, L, I, G>>,
    candidate: &Candidate<V, impl Sized>,
) -> Result<Vec<V>, TraversalError>
where
    V: VertexLike,
    W: Clone,
    L: Clone,
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    let missing = || TraversalError::InvalidUsage("paths were not built for this run");
    let mut path = forward.ok_or_else(missing)?.path(&candidate.forward_end)?;
    let rest = backward
        .ok_or_else(missing)?
        .iter_to_start(&candidate.backward_end)?
        .skip(usize::from(candidate.joined));
    path.extend(rest.cloned());
    Ok(path)
}

fn finish<V, N>(
    best: Option<Candidate<V, N>>,
    options: &BidirectionalOptions,
    path: impl FnOnce(&Candidate<V, N>) -> Result<Vec<V>, TraversalError>,
) -> Result<Option<Meeting<V, N>>, TraversalError> {
    let Some(candidate) = best else {
        log::debug!("bidirectional search ended without meeting");
        return if options.fail_silently {
            Ok(None)
        } else {
            Err(TraversalError::NoMeeting)
        };
    };
    let path = if options.build_path {
        Some(path(&candidate)?)
    } else {
        None
    };
    Ok(Some(Meeting {
        length: candidate.length,
        path,
    }))
}

/// Bidirectional breadth-first search for the fewest-edges connection.
pub struct BSearchBreadthFirst<V, AF, AB, L = (), I = Identity, G = HashGear>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
    AF: Adjacency<V, (), L, SearchState<V, L, I, G>>,
    AB: Adjacency<V, (), L, SearchState<V, L, I, G>>,
{
    forward: TraversalBreadthFirst<V, AF, L, I, G>,
    backward: TraversalBreadthFirst<V, AB, L, I, G>,
    identity: I,
    forward_depths: G::Map<usize>,
    backward_depths: G::Map<usize>,
}

impl<V, F, B, ItF, ItB> BSearchBreadthFirst<V, Successors<F>, Successors<B>>
where
    V: KeyLike,
    F: FnMut(&V, &SearchState<V, (), Identity, HashGear>) -> ItF,
    ItF: IntoIterator<Item = V>,
    B: FnMut(&V, &SearchState<V, (), Identity, HashGear>) -> ItB,
    ItB: IntoIterator<Item = V>,
{
    /// `next_vertices` gives successors, `previous_vertices` predecessors.
    pub fn new(next_vertices: F, previous_vertices: B) -> Self {
        Self::from_adjacency(
            Successors(next_vertices),
            Successors(previous_vertices),
            Identity,
            HashGear::new(),
        )
    }
}

impl<V, I, G, F, B, ItF, ItB> BSearchBreadthFirst<V, Successors<F>, Successors<B>, (), I, G>
where
    V: VertexLike,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key> + Clone,
    F: FnMut(&V, &SearchState<V, (), I, G>) -> ItF,
    ItF: IntoIterator<Item = V>,
    B: FnMut(&V, &SearchState<V, (), I, G>) -> ItB,
    ItB: IntoIterator<Item = V>,
{
    pub fn with_gear(next_vertices: F, previous_vertices: B, identity: I, gear: G) -> Self {
        Self::from_adjacency(
            Successors(next_vertices),
            Successors(previous_vertices),
            identity,
            gear,
        )
    }
}

impl<V, AF, AB, L, I, G> BSearchBreadthFirst<V, AF, AB, L, I, G>
where
    V: VertexLike,
    L: Clone,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key> + Clone,
    AF: Adjacency<V, (), L, SearchState<V, L, I, G>>,
    AB: Adjacency<V, (), L, SearchState<V, L, I, G>>,
{
    pub fn from_adjacency(forward: AF, backward: AB, identity: I, gear: G) -> Self {
        Self {
            forward_depths: gear.vertex_map(),
            backward_depths: gear.vertex_map(),
            forward: TraversalBreadthFirst::from_adjacency(forward, identity.clone(), gear.clone()),
            backward: TraversalBreadthFirst::from_adjacency(backward, identity.clone(), gear),
            identity,
        }
    }

    pub fn start_from<S, T>(
        &mut self,
        starts: S,
        goals: T,
    ) -> Result<Option<Meeting<V, usize>>, TraversalError>
    where
        S: IntoIterator<Item = V>,
        T: IntoIterator<Item = V>,
    {
        self.start_from_with(starts, goals, BidirectionalOptions::default())
    }

    /// Runs the search to completion and returns the best meeting.
    pub fn start_from_with<S, T>(
        &mut self,
        starts: S,
        goals: T,
        options: BidirectionalOptions,
    ) -> Result<Option<Meeting<V, usize>>, TraversalError>
    where
        S: IntoIterator<Item = V>,
        T: IntoIterator<Item = V>,
    {
        let starts: Vec<V> = starts.into_iter().collect();
        let goals: Vec<V> = goals.into_iter().collect();
        log::debug!(
            "bidirectional breadth-first search from {} start and {} goal vertices",
            starts.len(),
            goals.len()
        );
        self.forward_depths.clear();
        self.backward_depths.clear();
        let mut best = None;
        for start in &starts {
            self.forward_depths.insert(self.identity.key(start), 0);
        }
        for goal in &goals {
            let key = self.identity.key(goal);
            if self.forward_depths.contains_key(&key) {
                offer(
                    &mut best,
                    Candidate {
                        length: 0,
                        forward_end: goal.clone(),
                        backward_end: goal.clone(),
                        joined: true,
                    },
                );
            }
            self.backward_depths.insert(key, 0);
        }
        let side_options = || StartOptions {
            build_paths: options.build_path,
            calculation_limit: options.calculation_limit,
            already_visited: None,
            is_tree: false,
        };
        self.forward.start_from_with(starts, side_options());
        self.backward.start_from_with(goals, side_options());

        if best.is_none() {
            self.search(&mut best)?;
        }
        finish(best, &options, |c| {
            join_paths(self.forward.paths(), self.backward.paths(), c)
        })
    }

    fn search(&mut self, best: &mut Option<Candidate<V, usize>>) -> Result<(), TraversalError> {
        // deepest level each side has reported completely, and the level in progress
        let mut complete = [0usize; 2];
        let mut level = [0usize; 2];
        let mut forward_turn = true;
        loop {
            if let Some(c) = best.as_ref() {
                if c.length <= complete[0] + complete[1] + 1 {
                    break;
                }
            }
            let side = usize::from(!forward_turn);
            let reported = if forward_turn {
                self.forward.next_vertex()?.map(|v| (v, self.forward.depth()))
            } else {
                self.backward.next_vertex()?.map(|v| (v, self.backward.depth()))
            };
            let Some((vertex, depth)) = reported else {
                break;
            };
            let key = self.identity.key(&vertex);
            let (own, other) = if forward_turn {
                (&mut self.forward_depths, &self.backward_depths)
            } else {
                (&mut self.backward_depths, &self.forward_depths)
            };
            if let Some(&rest) = other.get(&key) {
                offer(
                    best,
                    Candidate {
                        length: depth + rest,
                        forward_end: vertex.clone(),
                        backward_end: vertex,
                        joined: true,
                    },
                );
            }
            own.insert(key, depth);
            if depth > level[side] {
                complete[side] = depth - 1;
                level[side] = depth;
                forward_turn = !forward_turn;
            }
        }
        if let Some(c) = best.as_ref() {
            log::debug!(
                "bidirectional breadth-first search met at {:?} with length {}",
                c.forward_end,
                c.length
            );
        }
        Ok(())
    }

    /// Vertices expanded by both sides in the last run.
    pub fn expanded_vertices(&self) -> usize {
        self.forward.expanded_vertices() + self.backward.expanded_vertices()
    }

    pub fn forward(&self) -> &TraversalBreadthFirst<V, AF, L, I, G> {
        &self.forward
    }

    pub fn backward(&self) -> &TraversalBreadthFirst<V, AB, L, I, G> {
        &self.backward
    }
}

/// Bidirectional Dijkstra for the lightest connection.
pub struct BSearchShortestPath<V, W, AF, AB, L = (), I = Identity, G = HashGear<W>>
where
    W: Weight,
    I: VertexIdentity<V>,
    G: WeightedGear<I::Key, W>,
    AF: Adjacency<V, W, L, ShortestPathsState<V, W, L, I, G>>,
    AB: Adjacency<V, W, L, ShortestPathsState<V, W, L, I, G>>,
{
    forward: TraversalShortestPaths<V, W, AF, L, I, G>,
    backward: TraversalShortestPaths<V, W, AB, L, I, G>,
    identity: I,
    zero: W,
    forward_settled: G::Map<W>,
    backward_settled: G::Map<W>,
}

impl<V, W, F, B, ItF, ItB> BSearchShortestPath<V, W, WeightedEdges<F>, WeightedEdges<B>>
where
    V: KeyLike,
    W: Weight,
    F: FnMut(&V, &ShortestPathsState<V, W, (), Identity, HashGear<W>>) -> ItF,
    ItF: IntoIterator<Item = (V, W)>,
    B: FnMut(&V, &ShortestPathsState<V, W, (), Identity, HashGear<W>>) -> ItB,
    ItB: IntoIterator<Item = (V, W)>,
{
    /// `next_edges` gives outgoing `(successor, weight)` pairs,
    /// `previous_edges` incoming `(predecessor, weight)` pairs.
    pub fn new(next_edges: F, previous_edges: B) -> Self {
        Self::from_adjacency(
            WeightedEdges(next_edges),
            WeightedEdges(previous_edges),
            Identity,
            HashGear::new(),
        )
    }
}

impl<V, W, I, G, F, B, ItF, ItB>
    BSearchShortestPath<V, W, WeightedEdges<F>, WeightedEdges<B>, (), I, G>
where
    V: VertexLike,
    W: Weight,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W> + Clone,
    F: FnMut(&V, &ShortestPathsState<V, W, (), I, G>) -> ItF,
    ItF: IntoIterator<Item = (V, W)>,
    B: FnMut(&V, &ShortestPathsState<V, W, (), I, G>) -> ItB,
    ItB: IntoIterator<Item = (V, W)>,
{
    pub fn with_gear(next_edges: F, previous_edges: B, identity: I, gear: G) -> Self {
        Self::from_adjacency(
            WeightedEdges(next_edges),
            WeightedEdges(previous_edges),
            identity,
            gear,
        )
    }
}

impl<V, W, AF, AB, L, I, G> BSearchShortestPath<V, W, AF, AB, L, I, G>
where
    V: VertexLike,
    W: Weight,
    L: Clone,
    I: VertexIdentity<V> + Clone,
    G: WeightedGear<I::Key, W> + Clone,
    AF: Adjacency<V, W, L, ShortestPathsState<V, W, L, I, G>>,
    AB: Adjacency<V, W, L, ShortestPathsState<V, W, L, I, G>>,
{
    pub fn from_adjacency(forward: AF, backward: AB, identity: I, gear: G) -> Self {
        Self {
            zero: gear.zero(),
            forward_settled: gear.vertex_map(),
            backward_settled: gear.vertex_map(),
            forward: TraversalShortestPaths::from_adjacency(forward, identity.clone(), gear.clone()),
            backward: TraversalShortestPaths::from_adjacency(backward, identity.clone(), gear),
            identity,
        }
    }

    pub fn start_from<S, T>(
        &mut self,
        starts: S,
        goals: T,
    ) -> Result<Option<Meeting<V, W>>, TraversalError>
    where
        S: IntoIterator<Item = V>,
        T: IntoIterator<Item = V>,
    {
        self.start_from_with(starts, goals, BidirectionalOptions::default())
    }

    /// Runs the search to completion and returns the best meeting.
    pub fn start_from_with<S, T>(
        &mut self,
        starts: S,
        goals: T,
        options: BidirectionalOptions,
    ) -> Result<Option<Meeting<V, W>>, TraversalError>
    where
        S: IntoIterator<Item = V>,
        T: IntoIterator<Item = V>,
    {
        let starts: Vec<V> = starts.into_iter().collect();
        let goals: Vec<V> = goals.into_iter().collect();
        log::debug!(
            "bidirectional shortest path search from {} start and {} goal vertices",
            starts.len(),
            goals.len()
        );
        let zero = self.zero;
        self.forward_settled.clear();
        self.backward_settled.clear();
        let mut best = None;
        for start in &starts {
            self.forward_settled.insert(self.identity.key(start), zero);
        }
        for goal in &goals {
            let key = self.identity.key(goal);
            if self.forward_settled.contains_key(&key) {
                offer(
                    &mut best,
                    Candidate {
                        length: zero,
                        forward_end: goal.clone(),
                        backward_end: goal.clone(),
                        joined: true,
                    },
                );
            }
            self.backward_settled.insert(key, zero);
        }
        let side_options = || {
            let mut side = ShortestPathsOptions::new().build_paths(options.build_path);
            side.calculation_limit = options.calculation_limit;
            side
        };
        self.forward.start_from_with(starts, side_options());
        self.backward.start_from_with(goals, side_options());

        if best.is_none() {
            self.search(&mut best)?;
        }
        finish(best, &options, |c| {
            join_paths(self.forward.paths(), self.backward.paths(), c)
        })
    }

    fn search(&mut self, best: &mut Option<Candidate<V, W>>) -> Result<(), TraversalError> {
        // distances of the last vertex settled by each side
        let mut top = [self.zero; 2];
        let mut forward_turn = true;
        loop {
            if let Some(c) = best.as_ref() {
                match top[0].checked_sum(top[1]) {
                    Some(bound) if c.length > bound => {}
                    _ => break,
                }
            }
            let side = usize::from(!forward_turn);
            let identity = &self.identity;
            let reported = if forward_turn {
                let other = &self.backward_settled;
                let mut observe = |r: Relaxation<'_, V, W, L>| {
                    let Some(&rest) = other.get(&identity.key(&r.edge.to)) else {
                        return;
                    };
                    let length = r
                        .from_distance
                        .checked_sum(r.edge.weight)
                        .and_then(|d| d.checked_sum(rest));
                    if let Some(length) = length {
                        offer(
                            best,
                            Candidate {
                                length,
                                forward_end: r.from.clone(),
                                backward_end: r.edge.to.clone(),
                                joined: false,
                            },
                        );
                    }
                };
                let vertex = self.forward.advance_observed(&mut observe)?;
                vertex.map(|v| (v, self.forward.distance()))
            } else {
                let other = &self.forward_settled;
                let mut observe = |r: Relaxation<'_, V, W, L>| {
                    let Some(&rest) = other.get(&identity.key(&r.edge.to)) else {
                        return;
                    };
                    let length = rest
                        .checked_sum(r.edge.weight)
                        .and_then(|d| d.checked_sum(r.from_distance));
                    if let Some(length) = length {
                        offer(
                            best,
                            Candidate {
                                length,
                                forward_end: r.edge.to.clone(),
                                backward_end: r.from.clone(),
                                joined: false,
                            },
                        );
                    }
                };
                let vertex = self.backward.advance_observed(&mut observe)?;
                vertex.map(|v| (v, self.backward.distance()))
            };
            let Some((vertex, distance)) = reported else {
                break;
            };
            top[side] = distance;
            let key = self.identity.key(&vertex);
            let (own, other) = if forward_turn {
                (&mut self.forward_settled, &self.backward_settled)
            } else {
                (&mut self.backward_settled, &self.forward_settled)
            };
            if let Some(length) = other.get(&key).and_then(|&rest| distance.checked_sum(rest)) {
                offer(
                    best,
                    Candidate {
                        length,
                        forward_end: vertex.clone(),
                        backward_end: vertex,
                        joined: true,
                    },
                );
            }
            own.insert(key, distance);
            forward_turn = !forward_turn;
        }
        if let Some(c) = best.as_ref() {
            log::debug!(
                "bidirectional shortest path search met between {:?} and {:?} with length {:?}",
                c.forward_end,
                c.backward_end,
                c.length
            );
        }
        Ok(())
    }

    /// Vertices expanded by both sides in the last run.
    pub fn expanded_vertices(&self) -> usize {
        self.forward.expanded_vertices() + self.backward.expanded_vertices()
    }

    pub fn forward(&self) -> &TraversalShortestPaths<V, W, AF, L, I, G> {
        &self.forward
    }

    pub fn backward(&self) -> &TraversalShortestPaths<V, W, AB, L, I, G> {
        &self.backward
    }
}
