//! Vertex identity: the mapping from a vertex to the key the strategies use
//! for visited sets, distance maps and the predecessor store.
//!
//! Vertices with equal keys are treated as the same vertex. The first one
//! reached is the one reported.

use super::bounds::KeyLike;

/// Maps a vertex to its identifying key.
///
/// Strategies keep a copy of the identity for path materialization, hence
/// implementors should be cheap to clone.
pub trait VertexIdentity<V> {
    type Key: KeyLike;

    fn key(&self, vertex: &V) -> Self::Key;
}

/// The vertex is its own key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl<V: KeyLike> VertexIdentity<V> for Identity {
    type Key = V;

    #[inline]
    fn key(&self, vertex: &V) -> V {
        vertex.clone()
    }
}

/// Identity given by a function, e.g. to identify states by a projection.
#[derive(Clone, Copy)]
pub struct KeyFn<F>(pub F);

impl<V, K, F> VertexIdentity<V> for KeyFn<F>
where
    K: KeyLike,
    F: Fn(&V) -> K,
{
    type Key = K;

    #[inline]
    fn key(&self, vertex: &V) -> K {
        (self.0)(vertex)
    }
}

impl<F> std::fmt::Debug for KeyFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyFn(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_fn_projects() {
        let by_len = KeyFn(|s: &String| s.len());
        assert_eq!(by_len.key(&"abc".to_string()), 3);
        assert_eq!(Identity.key(&"abc".to_string()), "abc");
    }
}
