//! The default gear: `hashbrown` containers for any hashable key.

use std::hash::Hash;

use hashbrown::{HashMap, HashSet};

use super::{Gear, MappedDistances, WeightedGear};
use crate::vertex::Weight;

/// Hash-indexed sets and maps. Works for every key type.
#[derive(Clone, Debug)]
pub struct HashGear<W = ()> {
    infinity: Option<W>,
}

impl<W> HashGear<W> {
    pub fn new() -> Self {
        Self { infinity: None }
    }

    /// Uses `infinity` instead of the weight type's own sentinel.
    pub fn with_infinity(infinity: W) -> Self {
        Self {
            infinity: Some(infinity),
        }
    }
}

impl<W> Default for HashGear<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, W> Gear<K> for HashGear<W> {
    type Set = HashSet<K>;
    type Map<T> = HashMap<K, T>;

    fn vertex_set(&self) -> HashSet<K> {
        HashSet::new()
    }

    fn vertex_map<T>(&self) -> HashMap<K, T> {
        HashMap::new()
    }
}

impl<K: Eq + Hash, W: Weight> WeightedGear<K, W> for HashGear<W> {
    type Distances = MappedDistances<HashMap<K, W>, W>;

    fn infinity(&self) -> W {
        self.infinity.unwrap_or_else(W::infinity)
    }

    fn distance_map(&self) -> Self::Distances {
        MappedDistances::new(HashMap::new(), WeightedGear::<K, W>::infinity(self))
    }
}
