//! Error types for graph access.

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised by graph readers and the in-memory store.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A referenced node does not exist.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The backing store could not be reached or its lock was poisoned.
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    /// Record file could not be parsed.
    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        GraphError::InvalidFormat(e.to_string())
    }
}
