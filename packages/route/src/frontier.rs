//! Min-priority frontier for the path search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A tentative distance for one grid cell, by flat index.
#[derive(Debug, Clone, Copy)]
struct Entry {
    distance: f64,
    index: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap pops the smallest distance first. Equal
    // distances pop in index order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Binary heap of `(distance, index)` pairs.
///
/// Entries are never updated in place. A cell whose distance improves is
/// pushed again, so the heap may hold stale entries; callers must discard
/// any popped entry whose distance exceeds the best recorded one.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
}

impl Frontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, distance: f64) {
        self.heap.push(Entry { distance, index });
    }

    /// Removes and returns the entry with the smallest distance.
    pub fn pop_min(&mut self) -> Option<(f64, usize)> {
        self.heap.pop().map(|e| (e.distance, e.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_distance() {
        let mut frontier = Frontier::new();
        frontier.push(0, 3.5);
        frontier.push(1, 0.25);
        frontier.push(2, 10.0);
        frontier.push(3, 1.0);

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop_min()).collect();
        assert_eq!(order, vec![(0.25, 1), (1.0, 3), (3.5, 0), (10.0, 2)]);
        assert!(frontier.heap.is_empty());
    }

    #[test]
    fn equal_distances_pop_by_index() {
        let mut frontier = Frontier::new();
        frontier.push(7, 2.0);
        frontier.push(3, 2.0);
        frontier.push(5, 2.0);

        assert_eq!(frontier.pop_min(), Some((2.0, 3)));
        assert_eq!(frontier.pop_min(), Some((2.0, 5)));
        assert_eq!(frontier.pop_min(), Some((2.0, 7)));
    }

    #[test]
    fn keeps_duplicate_entries_for_one_cell() {
        let mut frontier = Frontier::new();
        frontier.push(4, 9.0);
        frontier.push(4, 2.0);
        assert_eq!(frontier.heap.len(), 2);
        assert_eq!(frontier.pop_min(), Some((2.0, 4)));
        assert_eq!(frontier.pop_min(), Some((9.0, 4)));
    }

    #[test]
    fn infinity_sorts_last() {
        let mut frontier = Frontier::new();
        frontier.push(0, f64::INFINITY);
        frontier.push(1, 1e300);
        assert_eq!(frontier.pop_min(), Some((1e300, 1)));
    }
}
