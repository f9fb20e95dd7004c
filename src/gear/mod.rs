//! Gears: the bookkeeping containers of a strategy.
//!
//! A strategy never creates a set, map or queue itself; it asks its gear. This
//! lets the application trade generality for speed without touching the
//! algorithms:
//!
//! - [`HashGear`]: hash-indexed containers for any hashable key
//! - [`DenseGear`]: bit set and vector-backed map for small integer keys
//! - [`DenseNativeGear`]: like `DenseGear`, with distances stored as plain
//!   values and "unknown" encoded as the infinity sentinel
//!
//! Whatever gear is chosen, results are identical; only time and memory
//! differ. [`Gear::with_vertex_set`] replaces just the visited-set factory of
//! an existing gear.

use std::collections::BinaryHeap;

use crate::vertex::Weight;

pub mod compose;
pub mod containers;
pub mod dense;
pub mod hashed;

pub use compose::WithVertexSet;
pub use containers::MappedDistances;
pub use dense::{BitSet, DenseGear, DenseMap, DenseNativeGear, NativeDistances};
pub use hashed::HashGear;

/// Set of vertex keys.
pub trait VertexSet<K> {
    /// Adds `key`; returns `true` if it was not present.
    fn insert(&mut self, key: K) -> bool;
    fn contains(&self, key: &K) -> bool;
    /// Removes `key`; returns `true` if it was present.
    fn remove(&mut self, key: &K) -> bool;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map from vertex keys to values.
pub trait VertexMap<K, T> {
    fn get(&self, key: &K) -> Option<&T>;
    /// Stores `value`, returning the previous one.
    fn insert(&mut self, key: K, value: T) -> Option<T>;
    fn remove(&mut self, key: &K) -> Option<T>;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Distance storage. Keys without a stored distance read as [`infinity`](Self::infinity).
pub trait DistanceMap<K, W> {
    fn distance(&self, key: &K) -> W;
    fn set_distance(&mut self, key: K, distance: W);
    fn clear(&mut self);
    fn infinity(&self) -> W;
}

/// Factory for the containers a strategy needs, keyed by `K`.
pub trait Gear<K> {
    type Set: VertexSet<K>;
    type Map<T>: VertexMap<K, T>;

    fn vertex_set(&self) -> Self::Set;
    fn vertex_map<T>(&self) -> Self::Map<T>;

    /// Heap backing the frontier of the priority-driven strategies.
    fn priority_queue<T: Ord>(&self) -> BinaryHeap<T> {
        BinaryHeap::new()
    }

    /// Same gear, but visited sets come from `factory`.
    fn with_vertex_set<F, S>(self, factory: F) -> WithVertexSet<Self, F>
    where
        Self: Sized,
        F: Fn() -> S,
        S: VertexSet<K>,
    {
        WithVertexSet::new(self, factory)
    }
}

/// Gear of the weighted strategies: adds distance storage and the zero and
/// infinity of the weight type.
pub trait WeightedGear<K, W: Weight>: Gear<K> {
    type Distances: DistanceMap<K, W>;

    fn zero(&self) -> W {
        W::zero()
    }
    fn infinity(&self) -> W;
    fn distance_map(&self) -> Self::Distances;
}
