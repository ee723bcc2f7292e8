use std::{cmp::Ordering, collections::BinaryHeap};

use ordered_float::OrderedFloat;

/// Binary heap keyed by a float score where the top is the largest score.
///
/// The k-NN search keeps its candidates here so the current worst candidate
/// is always available in constant time.
#[derive(Debug)]
pub struct MaxHeap<T>(BinaryHeap<MaxHeapEntry<T>>);

#[derive(Debug)]
struct MaxHeapEntry<T>(T, OrderedFloat<f64>);

impl<T> MaxHeapEntry<T> {
    fn new(item: T, score: OrderedFloat<f64>) -> Self {
        MaxHeapEntry(item, score)
    }
}

impl<T> Eq for MaxHeapEntry<T> {}

impl<T> PartialEq for MaxHeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<T> Ord for MaxHeapEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.1.cmp(&other.1)
    }
}

impl<T> PartialOrd for MaxHeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> MaxHeap<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        MaxHeap(BinaryHeap::with_capacity(capacity))
    }

    pub fn push(&mut self, item: T, score: OrderedFloat<f64>) {
        self.0.push(MaxHeapEntry::new(item, score));
    }

    pub fn pop(&mut self) -> Option<T> {
        self.0.pop().map(|entry| entry.0)
    }

    pub fn peek_score(&self) -> Option<OrderedFloat<f64>> {
        self.0.peek().map(|entry| entry.1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the heap and returns the items ordered by ascending score.
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.0
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.0)
            .collect()
    }
}
