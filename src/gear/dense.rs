//! Dense containers for integer-like keys ([`DenseKey`]) and the gears built on them.
//!
//! All containers grow on demand, so no upper bound on the keys has to be
//! known in advance; `capacity` is only the initial reservation.

use super::{DistanceMap, Gear, VertexMap, VertexSet, WeightedGear};
use crate::debug_invariants::DebugInvariants;
use crate::traversal_error::TraversalError;
use crate::vertex::{DenseKey, Weight};

const WORD: usize = u64::BITS as usize;

/// Growable bit set over `usize` indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(WORD)),
            len: 0,
        }
    }

    #[inline]
    fn test(&self, index: usize) -> bool {
        self.words
            .get(index / WORD)
            .is_some_and(|w| w & (1 << (index % WORD)) != 0)
    }
}

impl<K: DenseKey> VertexSet<K> for BitSet {
    fn insert(&mut self, key: K) -> bool {
        let index = key.index();
        let word = index / WORD;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1 << (index % WORD);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        self.len += usize::from(fresh);
        crate::check_after_mutation!(self);
        fresh
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.test(key.index())
    }

    fn remove(&mut self, key: &K) -> bool {
        let index = key.index();
        let Some(w) = self.words.get_mut(index / WORD) else {
            return false;
        };
        let mask = 1 << (index % WORD);
        let present = *w & mask != 0;
        *w &= !mask;
        self.len -= usize::from(present);
        crate::check_after_mutation!(self);
        present
    }

    fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl DebugInvariants for BitSet {
    fn validate_invariants(&self) -> Result<(), TraversalError> {
        let counted: usize = self.words.iter().map(|w| w.count_ones() as usize).sum();
        if counted != self.len {
            return Err(TraversalError::InvariantViolation(format!(
                "BitSet len {} but {} bits set",
                self.len, counted
            )));
        }
        Ok(())
    }
}

/// Vector-backed map from dense keys to values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMap<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> Default for DenseMap<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }
}

impl<T> DenseMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Occupied slots as `(index, value)`, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }
}

impl<K: DenseKey, T> VertexMap<K, T> for DenseMap<T> {
    #[inline]
    fn get(&self, key: &K) -> Option<&T> {
        self.slots.get(key.index()).and_then(Option::as_ref)
    }

    fn insert(&mut self, key: K, value: T) -> Option<T> {
        let index = key.index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        let previous = self.slots[index].replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        crate::check_after_mutation!(self);
        previous
    }

    fn remove(&mut self, key: &K) -> Option<T> {
        let previous = self.slots.get_mut(key.index()).and_then(Option::take);
        if previous.is_some() {
            self.len -= 1;
        }
        crate::check_after_mutation!(self);
        previous
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl<T> DebugInvariants for DenseMap<T> {
    fn validate_invariants(&self) -> Result<(), TraversalError> {
        let occupied = self.slots.iter().filter(|s| s.is_some()).count();
        if occupied != self.len {
            return Err(TraversalError::InvariantViolation(format!(
                "DenseMap len {} but {} occupied slots",
                self.len, occupied
            )));
        }
        Ok(())
    }
}

/// Distances stored as plain values; unknown entries hold `infinity`.
#[derive(Clone, Debug)]
pub struct NativeDistances<W> {
    values: Vec<W>,
    infinity: W,
}

impl<W: Weight> NativeDistances<W> {
    pub fn new(capacity: usize, infinity: W) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            infinity,
        }
    }

    /// Distances of all indices below the highest one written so far.
    pub fn as_slice(&self) -> &[W] {
        &self.values
    }
}

impl<K: DenseKey, W: Weight> DistanceMap<K, W> for NativeDistances<W> {
    #[inline]
    fn distance(&self, key: &K) -> W {
        self.values
            .get(key.index())
            .copied()
            .unwrap_or(self.infinity)
    }

    fn set_distance(&mut self, key: K, distance: W) {
        let index = key.index();
        if index >= self.values.len() {
            self.values.resize(index + 1, self.infinity);
        }
        self.values[index] = distance;
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn infinity(&self) -> W {
        self.infinity
    }
}

/// Bit set and vector-backed maps for dense keys; distances in a [`DenseMap`].
#[derive(Clone, Debug)]
pub struct DenseGear<W = ()> {
    capacity: usize,
    infinity: Option<W>,
}

impl<W> DenseGear<W> {
    /// `capacity` is the expected number of keys (a hint, not a bound).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            infinity: None,
        }
    }

    /// Overrides the infinity sentinel of the weighted strategies.
    pub fn with_infinity(mut self, infinity: W) -> Self {
        self.infinity = Some(infinity);
        self
    }
}

impl<W> Default for DenseGear<W> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<K: DenseKey, W> Gear<K> for DenseGear<W> {
    type Set = BitSet;
    type Map<T> = DenseMap<T>;

    fn vertex_set(&self) -> BitSet {
        BitSet::with_capacity(self.capacity)
    }

    fn vertex_map<T>(&self) -> DenseMap<T> {
        DenseMap::with_capacity(self.capacity)
    }
}

impl<K: DenseKey, W: Weight> WeightedGear<K, W> for DenseGear<W> {
    type Distances = super::MappedDistances<DenseMap<W>, W>;

    fn infinity(&self) -> W {
        self.infinity.unwrap_or_else(W::infinity)
    }

    fn distance_map(&self) -> Self::Distances {
        super::MappedDistances::new(
            DenseMap::with_capacity(self.capacity),
            WeightedGear::<K, W>::infinity(self),
        )
    }
}

/// Dense gear with distances as a plain `Vec<W>` pre-filled with `infinity`.
#[derive(Clone, Debug)]
pub struct DenseNativeGear<W> {
    capacity: usize,
    infinity: W,
}

impl<W: Weight> DenseNativeGear<W> {
    /// `infinity` must exceed every distance the search can produce.
    pub fn new(capacity: usize, infinity: W) -> Self {
        Self { capacity, infinity }
    }
}

impl<K: DenseKey, W> Gear<K> for DenseNativeGear<W> {
    type Set = BitSet;
    type Map<T> = DenseMap<T>;

    fn vertex_set(&self) -> BitSet {
        BitSet::with_capacity(self.capacity)
    }

    fn vertex_map<T>(&self) -> DenseMap<T> {
        DenseMap::with_capacity(self.capacity)
    }
}

impl<K: DenseKey, W: Weight> WeightedGear<K, W> for DenseNativeGear<W> {
    type Distances = NativeDistances<W>;

    fn infinity(&self) -> W {
        self.infinity
    }

    fn distance_map(&self) -> NativeDistances<W> {
        NativeDistances::new(self.capacity, self.infinity)
    }
}
