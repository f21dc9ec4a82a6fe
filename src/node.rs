/// Slot id used for an absent child or an empty root.
pub const NIL: usize = usize::MAX;

/// A partition node stored in the tree's arena.
///
/// `point` indexes into the point store, `left` and `right` index into the
/// arena ([`NIL`] when absent). The arena owns every node, so dropping or
/// rebuilding the tree never recurses.
pub struct Node {
    pub point: usize,
    pub axis: usize,
    pub left: usize,
    pub right: usize,
}

impl Node {
    #[must_use]
    pub fn new(point: usize, axis: usize, left: usize, right: usize) -> Node {
        Node {
            point,
            axis,
            left,
            right,
        }
    }
}
