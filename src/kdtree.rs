use crate::{
    distance::euclidean,
    error::EmptyIndexError,
    neighbors::KBest,
    node::{Node, NIL},
};
use ordered_float::OrderedFloat;

/// A static k-d tree over `D`-dimensional points.
///
/// The index owns its point store; queries return positions into the store
/// as it was passed to [`KdTree::construct`]. The tree is immutable between
/// `construct` calls, so `&self` queries may run concurrently.
pub struct KdTree<const D: usize> {
    root: usize,
    nodes: Vec<Node>,
    points: Vec<[f64; D]>,
}

impl<const D: usize> KdTree<D> {
    #[must_use]
    pub fn new() -> Self {
        KdTree {
            root: NIL,
            nodes: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Build the tree over `points`, replacing any previously built index.
    ///
    /// Median-split construction: each recursion selects the rank-median of
    /// its range on the current axis, so the tree is balanced (height
    /// O(log n)) even for degenerate inputs. Empty input gives an empty tree.
    pub fn construct(&mut self, points: Vec<[f64; D]>) {
        self.points = points;
        self.nodes.clear();
        self.nodes.reserve(self.points.len());
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        self.root = self.build_recursive(&mut order, 0);
    }

    /// Release the tree and the point store.
    pub fn clear(&mut self) {
        self.root = NIL;
        self.nodes.clear();
        self.points.clear();
    }

    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Read-only view of the point store; indices returned by queries are
    /// positions into this slice.
    #[must_use]
    pub fn points(&self) -> &[[f64; D]] {
        &self.points
    }

    /// Height of the tree (0 when empty).
    #[must_use]
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    /// Find the point closest to `query` in Euclidean distance.
    ///
    /// Returns the point's index and its distance. Equal distances resolve
    /// to the lower index.
    ///
    /// # Errors
    /// [`EmptyIndexError`] when the index holds no points.
    pub fn nearest_neighbor(&self, query: &[f64; D]) -> Result<(usize, f64), EmptyIndexError> {
        if self.root == NIL {
            return Err(EmptyIndexError);
        }
        let mut best = (f64::INFINITY, NIL);
        self.nearest_recursive(self.root, query, &mut best);
        Ok((best.1, best.0))
    }

    /// Find the `k` points closest to `query`, ascending by distance
    /// (ties ascending by index).
    ///
    /// `k == 0` yields an empty result; `k` larger than the point count is
    /// capped to the point count.
    #[must_use]
    pub fn query_neighbors(&self, query: &[f64; D], k: usize) -> Vec<usize> {
        if k == 0 || self.root == NIL {
            return Vec::new();
        }
        let mut neighbors = KBest::new(k.min(self.points.len()));
        self.neighbors_recursive(self.root, query, &mut neighbors);
        neighbors.into_sorted()
    }

    /// Find every point within `radius` of `query` (boundary included),
    /// ascending by distance. A negative radius yields an empty result.
    #[must_use]
    pub fn query_radius(&self, query: &[f64; D], radius: f64) -> Vec<usize> {
        if radius < 0.0 || self.root == NIL {
            return Vec::new();
        }
        let mut result = Vec::new();
        self.radius_recursive(self.root, query, radius, &mut result);
        result.sort_unstable();
        result.into_iter().map(|(_, index)| index).collect()
    }

    fn build_recursive(&mut self, order: &mut [usize], depth: usize) -> usize {
        if order.is_empty() {
            return NIL;
        }
        let axis = depth % D;
        let mid = order.len() / 2;

        // O(range) rank selection; partitions `order` so that everything
        // before `mid` is <= the median on this axis and everything after
        // is >= it.
        let points = &self.points;
        order.select_nth_unstable_by_key(mid, |&i| OrderedFloat(points[i][axis]));

        let point = order[mid];
        let (front, rest) = order.split_at_mut(mid);
        let back = &mut rest[1..];
        let left = self.build_recursive(front, depth + 1);
        let right = self.build_recursive(back, depth + 1);

        let slot = self.nodes.len();
        self.nodes.push(Node::new(point, axis, left, right));
        slot
    }

    fn nearest_recursive(&self, slot: usize, query: &[f64; D], best: &mut (f64, usize)) {
        let node = &self.nodes[slot];
        let distance = euclidean(query, &self.points[node.point]);
        if (OrderedFloat(distance), node.point) < (OrderedFloat(best.0), best.1) {
            *best = (distance, node.point);
        }

        let split = self.points[node.point][node.axis];
        let (near, far) = if query[node.axis] <= split {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if near != NIL {
            self.nearest_recursive(near, query, best);
        }
        // The far side can only hold a closer point if the splitting plane
        // itself is closer than the current best.
        if far != NIL && (query[node.axis] - split).abs() < best.0 {
            self.nearest_recursive(far, query, best);
        }
    }

    fn neighbors_recursive(&self, slot: usize, query: &[f64; D], neighbors: &mut KBest) {
        let node = &self.nodes[slot];
        neighbors.push(euclidean(query, &self.points[node.point]), node.point);

        let split = self.points[node.point][node.axis];
        let (near, far) = if query[node.axis] <= split {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if near != NIL {
            self.neighbors_recursive(near, query, neighbors);
        }
        if far != NIL && (query[node.axis] - split).abs() < neighbors.worst_distance() {
            self.neighbors_recursive(far, query, neighbors);
        }
    }

    fn radius_recursive(
        &self,
        slot: usize,
        query: &[f64; D],
        radius: f64,
        result: &mut Vec<(OrderedFloat<f64>, usize)>,
    ) {
        let node = &self.nodes[slot];
        let distance = euclidean(query, &self.points[node.point]);
        if distance <= radius {
            result.push((OrderedFloat(distance), node.point));
        }

        let split = self.points[node.point][node.axis];
        let (near, far) = if query[node.axis] <= split {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if near != NIL {
            self.radius_recursive(near, query, radius, result);
        }
        // Unlike nearest-neighbor pruning the bound is fixed, and points at
        // exactly `radius` must be returned, so the far side is searched on
        // equality too.
        if far != NIL && (query[node.axis] - split).abs() <= radius {
            self.radius_recursive(far, query, radius, result);
        }
    }

    fn subtree_height(&self, slot: usize) -> usize {
        if slot == NIL {
            return 0;
        }
        let node = &self.nodes[slot];
        1 + self
            .subtree_height(node.left)
            .max(self.subtree_height(node.right))
    }
}

impl<const D: usize> Default for KdTree<D> {
    fn default() -> Self {
        KdTree::new()
    }
}
