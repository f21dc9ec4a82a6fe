use thiserror::Error;

/// Returned by queries that need at least one point in the index.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the index contains no points")]
pub struct EmptyIndexError;
