//! Error type for transport loading and queue capacity.

use thiserror::Error;

/// Errors produced by the search crate.
///
/// A search that fails to reach its goal is not an error: it yields an empty
/// path. `QueueFull` only escapes through the low-level queue API.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("immediate queue lane is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("invalid transport data: {0}")]
    TransportJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PathResult<T> = Result<T, PathError>;
