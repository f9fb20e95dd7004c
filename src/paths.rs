//! Incremental predecessor store and lazy path materialization.
//!
//! A strategy that builds paths records, for every vertex it reports, the
//! vertex it was reached from together with the weight and label of that
//! edge. Start vertices are recorded as roots. Paths are only materialized on
//! request: [`PathStore::iter_to_start`] walks the predecessor chain lazily,
//! [`PathStore::iter_from_start`] buffers it once and replays it reversed.

use crate::gear::{Gear, VertexMap};
use crate::traversal_error::TraversalError;
use crate::vertex::{TreeEdge, VertexIdentity};

#[derive(Clone, Debug)]
pub(crate) enum Link<V, W, L> {
    Root,
    Edge { predecessor: V, weight: W, label: L },
}

/// Predecessor relation of a search: one link per reached vertex key.
pub struct PathStore<V, W, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    links: G::Map<Link<V, W, L>>,
    identity: I,
}

impl<V, W, L, I, G> PathStore<V, W, L, I, G>
where
    V: std::fmt::Debug,
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    pub(crate) fn new(gear: &G, identity: I) -> Self {
        Self {
            links: gear.vertex_map(),
            identity,
        }
    }

    /// Records `key` as a root unless it already has a link.
    pub(crate) fn add_root(&mut self, key: I::Key) {
        if !self.links.contains_key(&key) {
            self.links.insert(key, Link::Root);
        }
    }

    /// Every chain must end at a root, so a predecessor has to be recorded
    /// before anything links to it.
    #[inline]
    fn check_predecessor(&self, predecessor: &V) {
        #[cfg(feature = "strict-invariants")]
        if !self.links.contains_key(&self.identity.key(predecessor)) {
            panic!("[invariants] predecessor {predecessor:?} has no recorded path");
        }
        #[cfg(not(feature = "strict-invariants"))]
        let _ = predecessor;
    }

    /// Records the first path to `key`. Returns `false` (and keeps the
    /// existing link) if `key` already has one.
    pub(crate) fn append(&mut self, key: I::Key, predecessor: V, weight: W, label: L) -> bool {
        if self.links.contains_key(&key) {
            return false;
        }
        self.check_predecessor(&predecessor);
        self.links.insert(
            key,
            Link::Edge {
                predecessor,
                weight,
                label,
            },
        );
        true
    }

    /// Overwrites the link of `key`, for searches that reopen vertices.
    pub(crate) fn replace(&mut self, key: I::Key, predecessor: V, weight: W, label: L) {
        self.check_predecessor(&predecessor);
        self.links.insert(
            key,
            Link::Edge {
                predecessor,
                weight,
                label,
            },
        );
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.links.contains_key(&self.identity.key(vertex))
    }

    /// Number of vertices with a recorded path, roots included.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The vertex `vertex` was reached from; `None` for roots and unknown vertices.
    pub fn predecessor(&self, vertex: &V) -> Option<&V> {
        match self.links.get(&self.identity.key(vertex))? {
            Link::Edge { predecessor, .. } => Some(predecessor),
            Link::Root => None,
        }
    }

    fn link(&self, vertex: &V) -> Result<&Link<V, W, L>, TraversalError> {
        self.links
            .get(&self.identity.key(vertex))
            .ok_or_else(|| TraversalError::NoPath(format!("{vertex:?}")))
    }

    /// Lazily walks from `vertex` back to its root, `vertex` first.
    pub fn iter_to_start<'a>(
        &'a self,
        vertex: &'a V,
    ) -> Result<ToStart<'a, V, W, L, I, G>, TraversalError> {
        self.link(vertex)?;
        Ok(ToStart {
            store: self,
            current: Some(vertex),
        })
    }

    /// Walks from the root to `vertex`.
    pub fn iter_from_start<'a>(
        &'a self,
        vertex: &'a V,
    ) -> Result<std::iter::Rev<std::vec::IntoIter<&'a V>>, TraversalError> {
        let chain: Vec<&V> = self.iter_to_start(vertex)?.collect();
        Ok(chain.into_iter().rev())
    }

    /// Number of edges on the stored path to `vertex`.
    pub fn edge_count(&self, vertex: &V) -> Result<usize, TraversalError> {
        Ok(self.iter_to_start(vertex)?.count() - 1)
    }
}

impl<V, W, L, I, G> PathStore<V, W, L, I, G>
where
    V: Clone + std::fmt::Debug,
    W: Clone,
    L: Clone,
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    /// Vertices of the path from its root to `vertex`, both included.
    pub fn path(&self, vertex: &V) -> Result<Vec<V>, TraversalError> {
        Ok(self.iter_from_start(vertex)?.cloned().collect())
    }

    /// Edges of the path from its root to `vertex`, in walking order.
    pub fn edges_from_start(&self, vertex: &V) -> Result<Vec<TreeEdge<V, W, L>>, TraversalError> {
        let mut edges = Vec::new();
        let mut current = vertex;
        while let Link::Edge {
            predecessor,
            weight,
            label,
        } = self.link(current)?
        {
            edges.push(TreeEdge {
                from: predecessor.clone(),
                to: current.clone(),
                weight: weight.clone(),
                label: label.clone(),
            });
            current = predecessor;
        }
        edges.reverse();
        Ok(edges)
    }

    /// Edge labels of the path from its root to `vertex`.
    pub fn labels_from_start(&self, vertex: &V) -> Result<Vec<L>, TraversalError> {
        Ok(self
            .edges_from_start(vertex)?
            .into_iter()
            .map(|e| e.label)
            .collect())
    }
}

/// Iterator over a predecessor chain, from a vertex back to its root.
pub struct ToStart<'a, V, W, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    store: &'a PathStore<V, W, L, I, G>,
    current: Option<&'a V>,
}

impl<'a, V, W, L, I, G> Iterator for ToStart<'a, V, W, L, I, G>
where
    I: VertexIdentity<V>,
    G: Gear<I::Key>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        let vertex = self.current?;
        let store = self.store;
        self.current = match store.links.get(&store.identity.key(vertex)) {
            Some(Link::Edge { predecessor, .. }) => Some(predecessor),
            _ => None,
        };
        Some(vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::HashGear;
    use crate::vertex::Identity;

    fn chain() -> PathStore<u32, u8, char, Identity, HashGear> {
        let mut store = PathStore::new(&HashGear::new(), Identity);
        store.add_root(0);
        assert!(store.append(1, 0, 5, 'a'));
        assert!(store.append(2, 1, 6, 'b'));
        assert!(!store.append(2, 0, 1, 'z'));
        store
    }

    #[test]
    fn paths_materialize_in_both_directions() {
        let store = chain();
        assert_eq!(store.path(&2).unwrap(), vec![0, 1, 2]);
        let back: Vec<u32> = store.iter_to_start(&2).unwrap().copied().collect();
        assert_eq!(back, vec![2, 1, 0]);
        assert_eq!(store.labels_from_start(&2).unwrap(), vec!['a', 'b']);
        assert_eq!(store.edge_count(&2).unwrap(), 2);
        assert_eq!(store.path(&0).unwrap(), vec![0]);
        assert_eq!(store.predecessor(&1), Some(&0));
        assert_eq!(store.predecessor(&0), None);
    }

    #[test]
    fn edges_carry_weights() {
        let store = chain();
        let edges = store.edges_from_start(&2).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].from, edges[0].to, edges[0].weight), (0, 1, 5));
        assert_eq!((edges[1].from, edges[1].to, edges[1].weight), (1, 2, 6));
    }

    #[test]
    fn unknown_vertex_has_no_path() {
        let store = chain();
        assert!(!store.contains(&9));
        assert!(matches!(store.path(&9), Err(TraversalError::NoPath(_))));
    }

    #[test]
    #[cfg(feature = "strict-invariants")]
    #[should_panic(expected = "has no recorded path")]
    fn link_to_unrecorded_predecessor_is_rejected() {
        let mut store = chain();
        store.append(5, 4, 1, 'x');
    }

    #[test]
    fn replace_rewires() {
        let mut store = chain();
        store.replace(2, 0, 9, 'c');
        assert_eq!(store.path(&2).unwrap(), vec![0, 2]);
        assert_eq!(store.len(), 3);
    }
}
