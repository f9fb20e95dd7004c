//! Gear composition: replace the visited-set factory of an existing gear.

use std::collections::BinaryHeap;

use super::{Gear, VertexSet, WeightedGear};
use crate::vertex::Weight;

/// `G` with visited sets produced by `F`. Built by [`Gear::with_vertex_set`]
/// or directly with [`WithVertexSet::new`] when the key type is not inferable.
#[derive(Clone, Debug)]
pub struct WithVertexSet<G, F> {
    gear: G,
    factory: F,
}

impl<G, F> WithVertexSet<G, F> {
    pub fn new(gear: G, factory: F) -> Self {
        Self { gear, factory }
    }

    pub fn inner(&self) -> &G {
        &self.gear
    }
}

impl<K, G, F, S> Gear<K> for WithVertexSet<G, F>
where
    G: Gear<K>,
    F: Fn() -> S,
    S: VertexSet<K>,
{
    type Set = S;
    type Map<T> = G::Map<T>;

    fn vertex_set(&self) -> S {
        (self.factory)()
    }

    fn vertex_map<T>(&self) -> G::Map<T> {
        self.gear.vertex_map()
    }

    fn priority_queue<T: Ord>(&self) -> BinaryHeap<T> {
        self.gear.priority_queue()
    }
}

impl<K, W, G, F, S> WeightedGear<K, W> for WithVertexSet<G, F>
where
    W: Weight,
    G: WeightedGear<K, W>,
    F: Fn() -> S,
    S: VertexSet<K>,
{
    type Distances = G::Distances;

    fn zero(&self) -> W {
        self.gear.zero()
    }

    fn infinity(&self) -> W {
        self.gear.infinity()
    }

    fn distance_map(&self) -> G::Distances {
        self.gear.distance_map()
    }
}
