//! [`VertexSet`] / [`VertexMap`] for the standard and `hashbrown` collections,
//! and [`MappedDistances`], the distance storage on top of any vertex map.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{BuildHasher, Hash};

use super::{DistanceMap, VertexMap, VertexSet};
use crate::vertex::Weight;

macro_rules! hashed_set {
    ($set:ident) => {
        impl<K, S> VertexSet<K> for $set<K, S>
        where
            K: Eq + Hash,
            S: BuildHasher,
        {
            #[inline]
            fn insert(&mut self, key: K) -> bool {
                $set::insert(self, key)
            }
            #[inline]
            fn contains(&self, key: &K) -> bool {
                $set::contains(self, key)
            }
            #[inline]
            fn remove(&mut self, key: &K) -> bool {
                $set::remove(self, key)
            }
            fn clear(&mut self) {
                $set::clear(self)
            }
            fn len(&self) -> usize {
                $set::len(self)
            }
        }
    };
}

macro_rules! hashed_map {
    ($map:ident) => {
        impl<K, T, S> VertexMap<K, T> for $map<K, T, S>
        where
            K: Eq + Hash,
            S: BuildHasher,
        {
            #[inline]
            fn get(&self, key: &K) -> Option<&T> {
                $map::get(self, key)
            }
            #[inline]
            fn insert(&mut self, key: K, value: T) -> Option<T> {
                $map::insert(self, key, value)
            }
            #[inline]
            fn remove(&mut self, key: &K) -> Option<T> {
                $map::remove(self, key)
            }
            fn clear(&mut self) {
                $map::clear(self)
            }
            fn len(&self) -> usize {
                $map::len(self)
            }
        }
    };
}

mod std_hashed {
    use super::*;
    use std::collections::{HashMap, HashSet};
    hashed_set!(HashSet);
    hashed_map!(HashMap);
}

mod brown_hashed {
    use super::*;
    use hashbrown::{HashMap, HashSet};
    hashed_set!(HashSet);
    hashed_map!(HashMap);
}

impl<K: Ord> VertexSet<K> for BTreeSet<K> {
    fn insert(&mut self, key: K) -> bool {
        BTreeSet::insert(self, key)
    }
    fn contains(&self, key: &K) -> bool {
        BTreeSet::contains(self, key)
    }
    fn remove(&mut self, key: &K) -> bool {
        BTreeSet::remove(self, key)
    }
    fn clear(&mut self) {
        BTreeSet::clear(self)
    }
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }
}

impl<K: Ord, T> VertexMap<K, T> for BTreeMap<K, T> {
    fn get(&self, key: &K) -> Option<&T> {
        BTreeMap::get(self, key)
    }
    fn insert(&mut self, key: K, value: T) -> Option<T> {
        BTreeMap::insert(self, key, value)
    }
    fn remove(&mut self, key: &K) -> Option<T> {
        BTreeMap::remove(self, key)
    }
    fn clear(&mut self) {
        BTreeMap::clear(self)
    }
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

/// Distances kept in a vertex map; absent keys read as `infinity`.
#[derive(Clone, Debug)]
pub struct MappedDistances<M, W> {
    map: M,
    infinity: W,
}

impl<M, W> MappedDistances<M, W> {
    pub fn new(map: M, infinity: W) -> Self {
        Self { map, infinity }
    }

    /// The underlying map, e.g. to enumerate the known distances.
    pub fn as_map(&self) -> &M {
        &self.map
    }
}

impl<K, W, M> DistanceMap<K, W> for MappedDistances<M, W>
where
    W: Weight,
    M: VertexMap<K, W>,
{
    #[inline]
    fn distance(&self, key: &K) -> W {
        self.map.get(key).copied().unwrap_or(self.infinity)
    }
    #[inline]
    fn set_distance(&mut self, key: K, distance: W) {
        self.map.insert(key, distance);
    }
    fn clear(&mut self) {
        self.map.clear()
    }
    fn infinity(&self) -> W {
        self.infinity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_set<S: VertexSet<u32>>(mut s: S) {
        assert!(s.is_empty());
        assert!(s.insert(3));
        assert!(!s.insert(3));
        assert!(s.contains(&3));
        assert!(s.remove(&3));
        assert!(!s.remove(&3));
        s.insert(1);
        s.clear();
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn collections_behave_as_sets() {
        exercise_set(std::collections::HashSet::new());
        exercise_set(hashbrown::HashSet::new());
        exercise_set(BTreeSet::new());
    }

    #[test]
    fn mapped_distances_default_to_infinity() {
        let mut d = MappedDistances::new(hashbrown::HashMap::<u8, u32>::new(), u32::MAX);
        assert_eq!(d.distance(&5u8), u32::MAX);
        d.set_distance(5u8, 9);
        assert_eq!(d.distance(&5u8), 9);
        assert_eq!(d.as_map().len(), 1);
        DistanceMap::<u8, u32>::clear(&mut d);
        assert_eq!(d.distance(&5u8), u32::MAX);
    }
}
