//! Error taxonomy for retrieval.

use kgrag_core::GraphError;
use kgrag_embeddings::EmbeddingError;
use kgrag_llm::LlmError;
use kgrag_vectors::{IndexSlot, VectorError};
use thiserror::Error;

/// Errors raised while building an index or answering a query.
///
/// `DimensionMismatch`, `IndexNotReady` and `UnknownSlot` are structural:
/// they abort the operation. Graph and generation failures for a single
/// candidate are absorbed by the engine and only surface here when they
/// abort a build or come from a direct call.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index not ready: no index has been built yet")]
    IndexNotReady,

    #[error("Unknown index slot: {0}")]
    UnknownSlot(IndexSlot),

    #[error("Embedding failed: {0}")]
    Embedding(EmbeddingError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Generation timed out after {0} seconds")]
    GenerationTimeout(u64),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Result type for retrieval operations.
pub type RagResult<T> = Result<T, RagError>;

impl RagError {
    /// Whether this error should abort a whole query rather than one candidate.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RagError::DimensionMismatch { .. } | RagError::IndexNotReady | RagError::UnknownSlot(_)
        )
    }
}

impl From<VectorError> for RagError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::DimensionMismatch { expected, actual } => {
                RagError::DimensionMismatch { expected, actual }
            }
        }
    }
}

impl From<EmbeddingError> for RagError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::DimensionMismatch { expected, got } => RagError::DimensionMismatch {
                expected,
                actual: got,
            },
            other => RagError::Embedding(other),
        }
    }
}

impl From<tokio::task::JoinError> for RagError {
    fn from(err: tokio::task::JoinError) -> Self {
        RagError::Task(err.to_string())
    }
}
