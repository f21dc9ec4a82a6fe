mod distance;
mod error;
mod kdtree;
mod neighbors;
mod node;

pub use error::EmptyIndexError;
pub use kdtree::KdTree;
