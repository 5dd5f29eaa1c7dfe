//! Global priority queue of pending splits.
//!
//! The tree always applies the best pending split across every node, not just
//! the best split of one node: a best-first search over the whole structure.
//! [`SplitCandidate`] orders by benefit (highest first) and breaks ties by
//! creation sequence (earliest first), so results never depend on memory
//! addresses.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::split::Split;

/// A pending split together with its creation sequence number.
#[derive(Debug, Clone)]
pub struct SplitCandidate {
    pub seq: u64,
    pub split: Split,
}

impl SplitCandidate {
    pub fn new(seq: u64, split: Split) -> Self {
        Self { seq, split }
    }

    #[inline]
    pub fn benefit(&self) -> f64 {
        self.split.benefit
    }
}

impl PartialEq for SplitCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SplitCandidate {}

impl PartialOrd for SplitCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SplitCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher benefit first, then lower sequence first.
        self.benefit()
            .total_cmp(&other.benefit())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Max-heap of [`SplitCandidate`]s.
#[derive(Debug, Default)]
pub struct SplitQueue {
    heap: BinaryHeap<SplitCandidate>,
}

impl SplitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: SplitCandidate) {
        self.heap.push(candidate);
    }

    pub fn pop(&mut self) -> Option<SplitCandidate> {
        self.heap.pop()
    }

    /// Best pending candidate without removing it.
    pub fn peek(&self) -> Option<&SplitCandidate> {
        self.heap.peek()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
