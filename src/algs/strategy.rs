//! Shared harness of all strategies: lifecycle, calculation budget, start
//! options, the [`Traversal`] pull interface and its derived iterators.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Range;

use hashbrown::HashMap;
use itertools::Itertools;

use crate::gear::Gear;
use crate::paths::PathStore;
use crate::traversal_error::TraversalError;
use crate::vertex::VertexIdentity;

/// Lifecycle of a strategy run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Constructed, `start_from` not yet called.
    Created,
    /// Pulls may produce vertices.
    Started,
    /// The run ended (normally or by an error); pulls yield `Ok(None)`.
    Exhausted,
}

/// Counts expansions and enforces the optional calculation limit.
#[derive(Clone, Debug, Default)]
pub(crate) struct Budget {
    limit: Option<usize>,
    expanded: usize,
}

impl Budget {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self { limit, expanded: 0 }
    }

    /// Accounts for one more expansion.
    pub(crate) fn expand(&mut self) -> Result<(), TraversalError> {
        if let Some(limit) = self.limit {
            if self.expanded >= limit {
                log::debug!("calculation limit {limit} reached");
                return Err(TraversalError::CalculationLimitExceeded { limit });
            }
        }
        self.expanded += 1;
        Ok(())
    }

    pub(crate) fn expanded(&self) -> usize {
        self.expanded
    }
}

/// Options of `start_from_with` for the unweighted strategies.
///
/// `S` is the visited-set type of the strategy's gear.
#[derive(Clone, Debug)]
pub struct StartOptions<S> {
    pub(crate) build_paths: bool,
    pub(crate) calculation_limit: Option<usize>,
    pub(crate) already_visited: Option<S>,
    pub(crate) is_tree: bool,
}

impl<S> Default for StartOptions<S> {
    fn default() -> Self {
        Self {
            build_paths: false,
            calculation_limit: None,
            already_visited: None,
            is_tree: false,
        }
    }
}

impl<S> StartOptions<S> {
    pub fn new() -> Self {
        Self::default()
    }
    /// Record predecessors so that paths can be materialized.
    pub fn build_paths(mut self, yes: bool) -> Self {
        self.build_paths = yes;
        self
    }
    /// Fail with `CalculationLimitExceeded` instead of expanding more vertices.
    pub fn calculation_limit(mut self, limit: usize) -> Self {
        self.calculation_limit = Some(limit);
        self
    }
    /// Continue from a visited set of an earlier run; these keys are not reported again.
    pub fn already_visited(mut self, visited: S) -> Self {
        self.already_visited = Some(visited);
        self
    }
    /// The graph is a tree: skip visited bookkeeping.
    pub fn is_tree(mut self, yes: bool) -> Self {
        self.is_tree = yes;
        self
    }
}

/// Context shared by breadth-first, neighbors-then-depth and their adjacencies.
pub struct SearchState<V, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    pub(crate) depth: usize,
    pub(crate) visited: G::Set,
    pub(crate) paths: Option<PathStore<V, (), L, I, G>>,
}

impl<V, L, I, G> SearchState<V, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    pub(crate) fn new(gear: &G) -> Self {
        Self {
            depth: 0,
            visited: gear.vertex_set(),
            paths: None,
        }
    }

    /// Edge count from a start vertex to the current vertex.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn visited(&self) -> &G::Set {
        &self.visited
    }

    pub fn paths(&self) -> Option<&PathStore<V, (), L, I, G>> {
        self.paths.as_ref()
    }
}

/// Pull interface common to all strategies.
pub trait Traversal {
    type Vertex: Clone + Debug;
    type Key: Clone + Eq + Hash + Debug;

    /// Next reported vertex, `Ok(None)` once exhausted.
    fn next_vertex(&mut self) -> Result<Option<Self::Vertex>, TraversalError>;

    fn key_of(&self, vertex: &Self::Vertex) -> Self::Key;

    fn phase(&self) -> Phase;

    /// Number of vertices expanded in the current run.
    fn expanded_vertices(&self) -> usize;

    /// Human-readable dump of the attributes of the strategy, with paths to
    /// `vertices` when paths are built.
    fn state_to_string(&self, vertices: &[Self::Vertex]) -> String;

    /// The remaining reported vertices as an iterator. An error is yielded once
    /// and ends the iteration.
    fn iter(&mut self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter {
            traversal: self,
            done: false,
        }
    }

    /// Pulls until a vertex with the key of `target` is reported.
    fn go_to(
        &mut self,
        target: &Self::Vertex,
        fail_silently: bool,
    ) -> Result<Option<Self::Vertex>, TraversalError> {
        let wanted = self.key_of(target);
        while let Some(vertex) = self.next_vertex()? {
            if self.key_of(&vertex) == wanted {
                return Ok(Some(vertex));
            }
        }
        if fail_silently {
            Ok(None)
        } else {
            Err(TraversalError::VertexNotFound(format!("{target:?}")))
        }
    }

    /// Reports exactly the vertices of `targets`, in the order the strategy
    /// reaches them. Unless `fail_silently`, ends with `VertexNotFound` naming
    /// the targets that were never reached.
    fn go_for_vertices_in<T>(&mut self, targets: T, fail_silently: bool) -> VerticesIn<'_, Self>
    where
        Self: Sized,
        T: IntoIterator<Item = Self::Vertex>,
    {
        let remaining = targets
            .into_iter()
            .map(|v| (self.key_of(&v), v))
            .collect();
        VerticesIn {
            traversal: self,
            remaining,
            fail_silently,
            done: false,
        }
    }
}

/// See [`Traversal::iter`].
pub struct Iter<'a, T: Traversal> {
    traversal: &'a mut T,
    done: bool,
}

impl<T: Traversal> Iterator for Iter<'_, T> {
    type Item = Result<T::Vertex, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.traversal.next_vertex() {
            Ok(Some(v)) => Some(Ok(v)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// See [`Traversal::go_for_vertices_in`].
pub struct VerticesIn<'a, T: Traversal> {
    traversal: &'a mut T,
    remaining: HashMap<T::Key, T::Vertex>,
    fail_silently: bool,
    done: bool,
}

impl<T: Traversal> Iterator for VerticesIn<'_, T> {
    type Item = Result<T::Vertex, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done && !self.remaining.is_empty() {
            match self.traversal.next_vertex() {
                Ok(Some(v)) => {
                    if self.remaining.remove(&self.traversal.key_of(&v)).is_some() {
                        return Some(Ok(v));
                    }
                }
                Ok(None) => {
                    self.done = true;
                    if !self.fail_silently {
                        let missing = self.remaining.values().map(|v| format!("{v:?}")).join(", ");
                        return Some(Err(TraversalError::VertexNotFound(missing)));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Vertices whose measure (depth, distance...) lies in a half-open range.
///
/// Vertices are reported in non-decreasing measure, so the query stops at the
/// first vertex at or beyond `range.end`. That vertex is consumed from the
/// strategy but not yielded.
pub struct RangeQuery<'a, T, M> {
    traversal: &'a mut T,
    range: Range<M>,
    measure: fn(&T) -> M,
    done: bool,
}

impl<'a, T, M> RangeQuery<'a, T, M> {
    pub(crate) fn new(traversal: &'a mut T, range: Range<M>, measure: fn(&T) -> M) -> Self {
        Self {
            traversal,
            range,
            measure,
            done: false,
        }
    }
}

impl<T: Traversal, M: PartialOrd> Iterator for RangeQuery<'_, T, M> {
    type Item = Result<T::Vertex, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.traversal.next_vertex() {
                Ok(Some(v)) => {
                    let m = (self.measure)(self.traversal);
                    if m >= self.range.end {
                        self.done = true;
                    } else if m >= self.range.start {
                        return Some(Ok(v));
                    }
                }
                Ok(None) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// `name { field: value, ... }`, the layout of every `state_to_string`.
pub(crate) fn render_state(name: &str, fields: &[(&str, String)]) -> String {
    format!(
        "{name} {{ {} }}",
        fields.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")
    )
}

/// Paths to `vertices`, rendered for `state_to_string`.
pub(crate) fn render_paths<V, W, L, I, G>(
    paths: Option<&PathStore<V, W, L, I, G>>,
    vertices: &[V],
) -> String
where
    V: Debug,
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    let Some(paths) = paths else {
        return "not built".to_string();
    };
    let rendered = vertices.iter().map(|v| match paths.iter_from_start(v) {
        Ok(path) => format!("{v:?}: [{:?}]", path.format(", ")),
        Err(_) => format!("{v:?}: none"),
    });
    format!("{{{}}}", rendered.format(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_stops_at_limit() {
        let mut b = Budget::new(Some(2));
        assert!(b.expand().is_ok());
        assert!(b.expand().is_ok());
        assert_eq!(
            b.expand(),
            Err(TraversalError::CalculationLimitExceeded { limit: 2 })
        );
        assert_eq!(b.expanded(), 2);
        let mut unlimited = Budget::new(None);
        for _ in 0..1000 {
            unlimited.expand().unwrap();
        }
    }

    #[test]
    fn render_state_layout() {
        let s = render_state("Bfs", &[("depth", "3".into()), ("phase", "Started".into())]);
        assert_eq!(s, "Bfs { depth: 3, phase: Started }");
    }
}
