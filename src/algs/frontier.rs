//! Min-priority frontier for the weighted strategies.
//!
//! Weights are only `PartialOrd`, so entries compare incomparable priorities
//! as equal. Among equal priorities, the entry pushed first pops first, which
//! keeps every weighted strategy deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub(crate) struct Entry<P, T> {
    priority: P,
    seq: u64,
    item: T,
}

impl<P: PartialOrd, T> Ord for Entry<P, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<P: PartialOrd, T> PartialOrd for Entry<P, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: PartialOrd, T> PartialEq for Entry<P, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P: PartialOrd, T> Eq for Entry<P, T> {}

pub(crate) struct Frontier<P, T> {
    heap: BinaryHeap<Entry<P, T>>,
    seq: u64,
}

impl<P: PartialOrd + Copy, T> Frontier<P, T> {
    pub(crate) fn new(heap: BinaryHeap<Entry<P, T>>) -> Self {
        Self { heap, seq: 0 }
    }

    pub(crate) fn push(&mut self, priority: P, item: T) {
        self.heap.push(Entry {
            priority,
            seq: self.seq,
            item,
        });
        self.seq += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<(P, T)> {
        self.heap.pop().map(|e| (e.priority, e.item))
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.seq = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_smallest_then_oldest() {
        let mut f = Frontier::new(BinaryHeap::new());
        f.push(3u32, 'a');
        f.push(1, 'b');
        f.push(3, 'c');
        f.push(1, 'd');
        assert_eq!(f.len(), 4);
        let order: Vec<char> = std::iter::from_fn(|| f.pop().map(|(_, c)| c)).collect();
        assert_eq!(order, vec!['b', 'd', 'a', 'c']);
        assert_eq!(f.len(), 0);
    }

    #[test]
    fn float_priorities() {
        let mut f = Frontier::new(BinaryHeap::new());
        f.push(0.5f64, 1);
        f.push(0.25, 2);
        assert_eq!(f.pop(), Some((0.25, 2)));
        f.clear();
        assert_eq!(f.pop(), None);
    }
}
