use ordered_float::OrderedFloat;
use std::collections::BinaryHeap;

/// Bounded k-best collection: keeps the `capacity` closest candidates seen
/// so far, keyed by `(distance, point index)` so equal distances resolve to
/// the lower index.
pub struct KBest {
    capacity: usize,
    heap: BinaryHeap<(OrderedFloat<f64>, usize)>,
}

impl KBest {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        KBest {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    /// The live pruning bound: the distance of the worst accepted candidate,
    /// or infinity while the collection is not yet full.
    pub fn worst_distance(&self) -> f64 {
        if self.heap.len() < self.capacity {
            return f64::INFINITY;
        }
        self.heap
            .peek()
            .map_or(f64::INFINITY, |(distance, _)| distance.into_inner())
    }

    /// Offer a candidate; the worst entry is evicted on overflow.
    pub fn push(&mut self, distance: f64, index: usize) {
        self.heap.push((OrderedFloat(distance), index));
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Extract the accepted candidates, ascending by distance (ties by index).
    #[must_use]
    pub fn into_sorted(self) -> Vec<usize> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|(_, index)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::KBest;

    #[test]
    fn keeps_the_closest() {
        let mut kbest = KBest::new(2);
        assert_eq!(kbest.worst_distance(), f64::INFINITY);

        kbest.push(3.0, 0);
        // Not full yet, so the bound stays open.
        assert_eq!(kbest.worst_distance(), f64::INFINITY);

        kbest.push(1.0, 1);
        assert_eq!(kbest.worst_distance(), 3.0);

        kbest.push(2.0, 2);
        assert_eq!(kbest.worst_distance(), 2.0);

        kbest.push(5.0, 3);
        assert_eq!(kbest.into_sorted(), vec![1, 2]);
    }

    #[test]
    fn equal_distances_keep_the_lower_index() {
        let mut kbest = KBest::new(2);
        kbest.push(1.0, 7);
        kbest.push(1.0, 3);
        kbest.push(1.0, 5);
        assert_eq!(kbest.into_sorted(), vec![3, 5]);
    }
}
