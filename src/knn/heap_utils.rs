//! This module contains utility structures for managing the k nearest neighbours using a binary heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // Total order over f64, NaN sorts last

/// An element in the KBestNeighbors heap: a distance, the training index it came from, and its data.
#[derive(Debug)]
pub struct HeapElement<P> {
    pub distance: OrderedFloat<f64>,
    pub index: usize,
    pub data: P,
}

impl<P> HeapElement<P> {
    fn key(&self) -> (OrderedFloat<f64>, usize) {
        (self.distance, self.index)
    }
}

impl<P> PartialEq for HeapElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl<P> Eq for HeapElement<P> {}

impl<P> PartialOrd for HeapElement<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for HeapElement<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so the farthest kept neighbour sits on top and is the
        // one evicted. Equal distances fall back to the training index: a later point
        // never displaces an earlier one at the same distance.
        self.key().cmp(&other.key())
    }
}

/// Keeps the `capacity` closest items seen so far.
///
/// The result is the same as stably sorting every `(distance, item)` pair by distance
/// and taking the first `capacity`, provided items are added with increasing indices.
#[derive(Debug)]
pub struct KBestNeighbors<P> {
    capacity: usize,
    heap: BinaryHeap<HeapElement<P>>,
}

impl<P> KBestNeighbors<P> {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub fn add(&mut self, distance: f64, index: usize, point_data: P) {
        if self.capacity == 0 {
            return;
        }
        let item = HeapElement { distance: OrderedFloat(distance), index, data: point_data };
        if self.heap.len() < self.capacity {
            self.heap.push(item);
        } else if let Some(mut farthest) = self.heap.peek_mut() {
            if item < *farthest {
                *farthest = item;
            }
        }
    }

    /// Consumes the collection, returning `(distance, data)` pairs nearest first.
    pub fn into_sorted(self) -> Vec<(f64, P)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|elem| (elem.distance.0, elem.data))
            .collect()
    }

    /// Returns the current number of neighbors stored.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.heap.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
