//! Depth-first traversal with an event stream.
//!
//! Besides plain pre-order enumeration, the traversal can report leaving
//! vertices (post-order), skipped start vertices and non-tree edges
//! (classified as back, forward or cross edges), maintain the trace (the
//! current path from the start vertex) and pre-order indices, and run over
//! all paths or all walks instead of a spanning tree.
//!
//! Successors are produced lazily: a vertex is expanded only when the
//! traversal continues after reporting it, so [`skip_expanding_entered_vertex`]
//! can prune a subtree before any of its edges are computed.
//!
//! [`skip_expanding_entered_vertex`]: TraversalDepthFirst::skip_expanding_entered_vertex

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::strategy::{Budget, Phase, Traversal, render_paths, render_state};
use crate::gear::{Gear, HashGear, VertexMap, VertexSet};
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::{
    Adjacency, Identity, KeyLike, LabeledSuccessors, Successors, VertexIdentity, VertexLike,
};

bitflags! {
    /// Events a depth-first traversal can report. Combine them to choose what
    /// [`DepthFirstOptions::report`] yields.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DfsEvent: u16 {
        const ENTERING_START = 1 << 0;
        const ENTERING_SUCCESSOR = 1 << 1;
        const LEAVING_SUCCESSOR = 1 << 2;
        const LEAVING_START = 1 << 3;
        /// Edge to a vertex on the trace.
        const BACK_EDGE = 1 << 4;
        /// Edge to an already visited descendant.
        const FORWARD_EDGE = 1 << 5;
        /// Edge to an already visited vertex that is neither ancestor nor descendant.
        const CROSS_EDGE = 1 << 6;
        /// Any non-tree edge, reported without classification unless one of
        /// the specific classes is requested as well.
        const SOME_NON_TREE_EDGE = 1 << 7;
        /// A start vertex that was already visited when its turn came.
        const SKIPPING_START = 1 << 8;

        const ENTERING = Self::ENTERING_START.bits() | Self::ENTERING_SUCCESSOR.bits();
        const LEAVING = Self::LEAVING_START.bits() | Self::LEAVING_SUCCESSOR.bits();
        const IN_OUT = Self::ENTERING.bits() | Self::LEAVING.bits();
        const NON_TREE_EDGES = Self::BACK_EDGE.bits()
            | Self::FORWARD_EDGE.bits()
            | Self::CROSS_EDGE.bits()
            | Self::SOME_NON_TREE_EDGE.bits();
    }
}

const CLASSIFIED: DfsEvent = DfsEvent::BACK_EDGE
    .union(DfsEvent::FORWARD_EDGE)
    .union(DfsEvent::CROSS_EDGE);

/// What counts as "already seen".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DfsMode {
    /// Each vertex is entered at most once: the traversal follows a spanning forest.
    #[default]
    Tree,
    /// A vertex is entered again on every simple path from a start vertex
    /// (never twice on the same trace).
    AllPaths,
    /// Every edge is followed; only terminates on finite acyclic graphs.
    AllWalks,
}

/// Options of [`TraversalDepthFirst::start_from_with`].
#[derive(Clone, Debug)]
pub struct DepthFirstOptions<S> {
    pub(crate) build_paths: bool,
    pub(crate) calculation_limit: Option<usize>,
    pub(crate) already_visited: Option<S>,
    pub(crate) mode: DfsMode,
    pub(crate) report: DfsEvent,
    pub(crate) compute_trace: bool,
    pub(crate) compute_on_trace: bool,
    pub(crate) compute_index: bool,
}

impl<S> Default for DepthFirstOptions<S> {
    fn default() -> Self {
        Self {
            build_paths: false,
            calculation_limit: None,
            already_visited: None,
            mode: DfsMode::Tree,
            report: DfsEvent::ENTERING_SUCCESSOR,
            compute_trace: false,
            compute_on_trace: false,
            compute_index: false,
        }
    }
}

impl<S> DepthFirstOptions<S> {
    pub fn new() -> Self {
        Self::default()
    }
    /// Tree mode only.
    pub fn build_paths(mut self, yes: bool) -> Self {
        self.build_paths = yes;
        self
    }
    pub fn calculation_limit(mut self, limit: usize) -> Self {
        self.calculation_limit = Some(limit);
        self
    }
    /// Tree mode only.
    pub fn already_visited(mut self, visited: S) -> Self {
        self.already_visited = Some(visited);
        self
    }
    pub fn mode(mut self, mode: DfsMode) -> Self {
        self.mode = mode;
        self
    }
    pub fn report(mut self, events: DfsEvent) -> Self {
        self.report = events;
        self
    }
    pub fn compute_trace(mut self, yes: bool) -> Self {
        self.compute_trace = yes;
        self
    }
    pub fn compute_on_trace(mut self, yes: bool) -> Self {
        self.compute_on_trace = yes;
        self
    }
    /// Tree mode only.
    pub fn compute_index(mut self, yes: bool) -> Self {
        self.compute_index = yes;
        self
    }

    fn validate(&self) -> Result<(), TraversalError> {
        if self.mode != DfsMode::Tree {
            if self.build_paths {
                return Err(TraversalError::InvalidUsage(
                    "paths can only be built in DfsMode::Tree",
                ));
            }
            if self.already_visited.is_some() {
                return Err(TraversalError::InvalidUsage(
                    "already_visited requires DfsMode::Tree",
                ));
            }
            if self.compute_index
                || self
                    .report
                    .intersects(DfsEvent::FORWARD_EDGE | DfsEvent::CROSS_EDGE)
            {
                return Err(TraversalError::InvalidUsage(
                    "indices and forward/cross edges require DfsMode::Tree",
                ));
            }
        }
        if self.mode == DfsMode::AllWalks
            && (self.compute_on_trace || self.report.intersects(DfsEvent::NON_TREE_EDGES))
        {
            return Err(TraversalError::InvalidUsage(
                "on-trace sets and non-tree edges are undefined in DfsMode::AllWalks",
            ));
        }
        Ok(())
    }
}

/// Context of a depth-first traversal, passed to its adjacency.
pub struct DepthFirstState<V, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    pub(crate) depth: usize,
    pub(crate) event: DfsEvent,
    pub(crate) trace: Vec<V>,
    pub(crate) trace_labels: Vec<L>,
    pub(crate) on_trace: G::Set,
    pub(crate) index: G::Map<usize>,
    pub(crate) visited: G::Set,
    pub(crate) paths: Option<PathStore<V, (), L, I, G>>,
}

impl<V, L, I, G> DepthFirstState<V, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    fn new(gear: &G) -> Self {
        Self {
            depth: 0,
            event: DfsEvent::empty(),
            trace: Vec::new(),
            trace_labels: Vec::new(),
            on_trace: gear.vertex_set(),
            index: gear.vertex_map(),
            visited: gear.vertex_set(),
            paths: None,
        }
    }

    /// Depth of the current vertex. For a non-tree edge: depth of its source plus one.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn event(&self) -> DfsEvent {
        self.event
    }

    /// Path from the start vertex to the current vertex. For a reported
    /// non-tree edge it ends with the edge's source and then its target.
    /// Only maintained with `compute_trace`.
    pub fn trace(&self) -> &[V] {
        &self.trace
    }

    /// Labels of the edges along [`trace`](Self::trace).
    pub fn trace_labels(&self) -> &[L] {
        &self.trace_labels
    }

    /// Keys of the trace vertices. Only maintained with `compute_on_trace`.
    pub fn on_trace(&self) -> &G::Set {
        &self.on_trace
    }

    /// Pre-order index (0-based) of every entered key. Only with `compute_index`.
    pub fn index(&self) -> &G::Map<usize> {
        &self.index
    }

    pub fn visited(&self) -> &G::Set {
        &self.visited
    }

    pub fn paths(&self) -> Option<&PathStore<V, (), L, I, G>> {
        self.paths.as_ref()
    }
}

enum Expansion<E> {
    Pending,
    Skipped,
    Active(E),
}

struct Frame<V, K, E> {
    vertex: V,
    key: K,
    successors: Expansion<E>,
}

/// Lazy depth-first search, see the module documentation.
pub struct TraversalDepthFirst<V, A, L = (), I = Identity, G = HashGear>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, DepthFirstState<V, L, I, G>>,
{
    next_edges: A,
    identity: I,
    gear: G,
    pub(crate) state: DepthFirstState<V, L, I, G>,
    phase: Phase,
    budget: Budget,
    stack: Vec<Frame<V, I::Key, A::Edges>>,
    /// pulled only when the previous start's subtree is exhausted
    starts: Option<Box<dyn Iterator<Item = V>>>,
    mode: DfsMode,
    report: DfsEvent,
    classify: bool,
    need_index: bool,
    need_on_trace: bool,
    compute_trace: bool,
    next_index: usize,
    may_skip: bool,
    /// key whose trace entry is removed at the next pull
    pending_leave: Option<I::Key>,
    /// target of a reported non-tree edge, removed from the trace at the next pull
    pending_edge: bool,
}

impl<V, F, It> TraversalDepthFirst<V, Successors<F>>
where
    V: KeyLike,
    F: FnMut(&V, &DepthFirstState<V, (), Identity, HashGear>) -> It,
    It: IntoIterator<Item = V>,
{
    pub fn new(next_vertices: F) -> Self {
        Self::from_adjacency(Successors(next_vertices), Identity, HashGear::new())
    }
}

impl<V, L, F, It> TraversalDepthFirst<V, LabeledSuccessors<F>, L>
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

impl<V, I, G, F, It> TraversalDepthFirst<V, Successors<F>, (), I, G>
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

impl<V, A, L, I, G> TraversalDepthFirst<V, A, L, I, G>
where
    V: VertexLike,
    L: Clone,
    I: VertexIdentity<V> + Clone,
    G: Gear<I::Key>,
    A: Adjacency<V, (), L, DepthFirstState<V, L, I, G>>,
{
    pub fn from_adjacency(next_edges: A, identity: I, gear: G) -> Self {
        let state = DepthFirstState::new(&gear);
        Self {
            next_edges,
            identity,
            gear,
            state,
            phase: Phase::Created,
            budget: Budget::default(),
            stack: Vec::new(),
            starts: None,
            mode: DfsMode::Tree,
            report: DfsEvent::ENTERING_SUCCESSOR,
            classify: false,
            need_index: false,
            need_on_trace: false,
            compute_trace: false,
            next_index: 0,
            may_skip: false,
            pending_leave: None,
            pending_edge: false,
        }
    }

    /// Starts (or restarts) with default options: tree mode, entering
    /// successors reported. The next start vertex is pulled from `starts`
    /// only after the subtree of the previous one is exhausted, so the
    /// source may be endless or depend on the results so far.
    pub fn start_from<S>(&mut self, starts: S) -> &mut Self
    where
        S: IntoIterator<Item = V>,
        S::IntoIter: 'static,
    {
        self.reset(starts, DepthFirstOptions::default());
        self
    }

    /// Starts with `options`. Combinations that are undefined for the chosen
    /// mode fail with `InvalidUsage` and leave the traversal untouched.
    pub fn start_from_with<S>(
        &mut self,
        starts: S,
        options: DepthFirstOptions<G::Set>,
    ) -> Result<&mut Self, TraversalError>
    where
        S: IntoIterator<Item = V>,
        S::IntoIter: 'static,
    {
        options.validate()?;
        self.reset(starts, options);
        Ok(self)
    }

    pub(crate) fn reset<S>(&mut self, starts: S, options: DepthFirstOptions<G::Set>)
    where
        S: IntoIterator<Item = V>,
        S::IntoIter: 'static,
    {
        let DepthFirstOptions {
            build_paths,
            calculation_limit,
            already_visited,
            mode,
            report,
            compute_trace,
            compute_on_trace,
            compute_index,
        } = options;
        self.state.visited = already_visited.unwrap_or_else(|| self.gear.vertex_set());
        self.state.paths = build_paths.then(|| PathStore::new(&self.gear, self.identity.clone()));
        self.state.on_trace = self.gear.vertex_set();
        self.state.index = self.gear.vertex_map();
        self.state.trace.clear();
        self.state.trace_labels.clear();
        self.state.depth = 0;
        self.state.event = DfsEvent::empty();

        self.mode = mode;
        self.report = report;
        self.classify = report.intersects(CLASSIFIED);
        self.need_index = compute_index
            || (mode == DfsMode::Tree
                && self.classify
                && report.intersects(
                    DfsEvent::FORWARD_EDGE | DfsEvent::CROSS_EDGE | DfsEvent::SOME_NON_TREE_EDGE,
                ));
        self.need_on_trace = compute_on_trace || mode == DfsMode::AllPaths || self.classify;
        self.compute_trace = compute_trace;

        self.budget = Budget::new(calculation_limit);
        self.stack.clear();
        self.starts = Some(Box::new(starts.into_iter()));
        self.next_index = 0;
        self.may_skip = false;
        self.pending_leave = None;
        self.pending_edge = false;
        log::debug!("depth-first search started: mode {mode:?}, report {report:?}");
        self.phase = Phase::Started;
    }

    /// Ends the run; further pulls yield `Ok(None)`.
    pub(crate) fn abort(&mut self) {
        self.phase = Phase::Exhausted;
        self.stack.clear();
        self.starts = None;
    }

    fn enter(&mut self, vertex: V, key: I::Key, via: Option<(V, L)>) {
        if self.mode == DfsMode::Tree {
            self.state.visited.insert(key.clone());
        }
        if self.need_index {
            self.state.index.insert(key.clone(), self.next_index);
            self.next_index += 1;
        }
        if self.need_on_trace {
            self.state.on_trace.insert(key.clone());
        }
        match via {
            None => {
                if let Some(paths) = self.state.paths.as_mut() {
                    paths.add_root(key.clone());
                }
            }
            Some((parent, label)) => {
                if self.compute_trace {
                    self.state.trace_labels.push(label.clone());
                }
                if let Some(paths) = self.state.paths.as_mut() {
                    paths.append(key.clone(), parent, (), label);
                }
            }
        }
        if self.compute_trace {
            self.state.trace.push(vertex.clone());
        }
        self.state.depth = self.stack.len();
        self.stack.push(Frame {
            vertex,
            key,
            successors: Expansion::Pending,
        });
    }

    fn pop_trace(&mut self, key: &I::Key) {
        if self.compute_trace {
            self.state.trace.pop();
            if self.state.trace_labels.len() > self.state.trace.len().saturating_sub(1) {
                self.state.trace_labels.pop();
            }
        }
        if self.need_on_trace {
            self.state.on_trace.remove(key);
        }
    }

    pub(crate) fn advance(&mut self) -> Result<Option<V>, TraversalError> {
        match self.phase {
            Phase::Created => return Err(TraversalError::NotStarted),
            Phase::Exhausted => return Ok(None),
            Phase::Started => {}
        }
        self.may_skip = false;
        if let Some(key) = self.pending_leave.take() {
            self.pop_trace(&key);
        }
        if std::mem::take(&mut self.pending_edge) {
            self.state.trace.pop();
            self.state.trace_labels.pop();
        }
        loop {
            if self.stack.is_empty() {
                let Some(start) = self.starts.as_mut().and_then(|starts| starts.next()) else {
                    log::debug!(
                        "depth-first search exhausted after {} expansions",
                        self.budget.expanded()
                    );
                    self.abort();
                    return Ok(None);
                };
                let key = self.identity.key(&start);
                if self.mode == DfsMode::Tree && self.state.visited.contains(&key) {
                    if self.report.contains(DfsEvent::SKIPPING_START) {
                        self.state.depth = 0;
                        self.state.event = DfsEvent::SKIPPING_START;
                        return Ok(Some(start));
                    }
                    continue;
                }
                self.enter(start.clone(), key, None);
                if self.report.contains(DfsEvent::ENTERING_START) {
                    self.state.event = DfsEvent::ENTERING_START;
                    self.may_skip = true;
                    return Ok(Some(start));
                }
                continue;
            }

            let depth = self.stack.len() - 1;
            let Some(top) = self.stack.last_mut() else {
                continue;
            };
            if matches!(top.successors, Expansion::Pending) {
                if let Err(e) = self.budget.expand() {
                    self.phase = Phase::Exhausted;
                    return Err(e);
                }
                self.state.depth = depth;
                log::trace!("expanding {:?} at depth {depth}", top.vertex);
                top.successors =
                    Expansion::Active(self.next_edges.edges_from(&top.vertex, &self.state));
            }
            let next = match &mut top.successors {
                Expansion::Active(edges) => edges.next(),
                Expansion::Pending | Expansion::Skipped => None,
            };

            match next {
                Some(edge) => {
                    let key = self.identity.key(&edge.to);
                    let seen = match self.mode {
                        DfsMode::Tree => self.state.visited.contains(&key),
                        DfsMode::AllPaths => self.state.on_trace.contains(&key),
                        DfsMode::AllWalks => false,
                    };
                    if seen {
                        let event = if !self.classify {
                            DfsEvent::SOME_NON_TREE_EDGE
                        } else if self.state.on_trace.contains(&key) {
                            DfsEvent::BACK_EDGE
                        } else if self.state.index.get(&key) > self.state.index.get(&top.key) {
                            DfsEvent::FORWARD_EDGE
                        } else {
                            DfsEvent::CROSS_EDGE
                        };
                        if self
                            .report
                            .intersects(event | DfsEvent::SOME_NON_TREE_EDGE)
                        {
                            self.state.event = event;
                            self.state.depth = depth + 1;
                            if self.compute_trace {
                                self.state.trace.push(edge.to.clone());
                                self.state.trace_labels.push(edge.label);
                                self.pending_edge = true;
                            }
                            return Ok(Some(edge.to));
                        }
                        continue;
                    }
                    let parent = top.vertex.clone();
                    self.enter(edge.to.clone(), key, Some((parent, edge.label)));
                    if self.report.contains(DfsEvent::ENTERING_SUCCESSOR) {
                        self.state.event = DfsEvent::ENTERING_SUCCESSOR;
                        self.may_skip = true;
                        return Ok(Some(edge.to));
                    }
                }
                None => {
                    let Some(frame) = self.stack.pop() else {
                        continue;
                    };
                    let event = if self.stack.is_empty() {
                        DfsEvent::LEAVING_START
                    } else {
                        DfsEvent::LEAVING_SUCCESSOR
                    };
                    self.state.depth = self.stack.len();
                    if self.report.contains(event) {
                        self.state.event = event;
                        self.pending_leave = Some(frame.key);
                        return Ok(Some(frame.vertex));
                    }
                    self.pop_trace(&frame.key);
                }
            }
        }
    }

    /// Prunes the subtree of the vertex just reported as entered: its
    /// successors are never computed and the traversal proceeds as if it had
    /// none. Only valid directly after an `ENTERING_START` or
    /// `ENTERING_SUCCESSOR` report; any other call is a usage error that
    /// ends the run.
    pub fn skip_expanding_entered_vertex(&mut self) -> Result<(), TraversalError> {
        if !self.may_skip {
            self.abort();
            return Err(TraversalError::InvalidUsage(
                "skip_expanding_entered_vertex is only valid directly after an entering event",
            ));
        }
        self.may_skip = false;
        if let Some(top) = self.stack.last_mut() {
            top.successors = Expansion::Skipped;
        }
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.state.depth
    }

    /// Event of the last reported vertex.
    pub fn event(&self) -> DfsEvent {
        self.state.event
    }

    pub fn trace(&self) -> &[V] {
        &self.state.trace
    }

    pub fn trace_labels(&self) -> &[L] {
        &self.state.trace_labels
    }

    pub fn on_trace(&self) -> &G::Set {
        &self.state.on_trace
    }

    /// Pre-order index of `vertex`, if indices are computed and it was entered.
    pub fn index_of(&self, vertex: &V) -> Option<usize> {
        self.state.index.get(&self.identity.key(vertex)).copied()
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

    pub fn state(&self) -> &DepthFirstState<V, L, I, G> {
        &self.state
    }
}

impl<V, A, L, I, G> Traversal for TraversalDepthFirst<V, A, L, I, G>
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
            "TraversalDepthFirst",
            &[
                ("phase", format!("{:?}", self.phase)),
                ("mode", format!("{:?}", self.mode)),
                ("event", format!("{:?}", self.state.event)),
                ("depth", self.state.depth.to_string()),
                ("trace", format!("{:?}", self.state.trace)),
                ("visited", self.state.visited.len().to_string()),
                ("paths", render_paths(self.state.paths.as_ref(), vertices)),
            ],
        )
    }
}
