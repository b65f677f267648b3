//! # kgrag Vectors
//!
//! In-memory nearest-neighbour index over fixed-length vectors.
//!
//! Vectors are addressed by [`IndexSlot`]: the position assigned at insertion,
//! starting at 0 and increasing by one per successful insert. Slots are never
//! reused; the supported way to drop stale vectors is to build a new index.
//!
//! ## Quick Start
//!
//! ```rust
//! use kgrag_vectors::{FlatIndex, VectorIndex};
//!
//! let mut index = FlatIndex::new(3);
//! index.insert(vec![1.0, 0.0, 0.0]).unwrap();
//! index.insert(vec![0.0, 1.0, 0.0]).unwrap();
//!
//! let hits = index.search(&[0.9, 0.1, 0.0], 5).unwrap();
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits[0].slot, 0);
//! ```

pub mod flat;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use flat::FlatIndex;

/// Errors that can occur when working with a vector index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type for vector operations.
pub type VectorResult<T> = Result<T, VectorError>;

/// Position of a vector inside an index.
pub type IndexSlot = usize;

/// A search hit: a slot and its distance from the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub slot: IndexSlot,
    /// Euclidean (L2) distance; lower is closer.
    pub distance: f32,
}

/// Nearest-neighbour index contract.
///
/// [`FlatIndex`] scans every vector. A graph- or tree-based approximate
/// structure can implement this trait without changing callers, as long as
/// it keeps the ordering rules below.
pub trait VectorIndex: Send + Sync {
    /// Dimension every stored and query vector must have.
    fn dimension(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a vector and return its slot.
    ///
    /// A vector of the wrong length is rejected with
    /// [`VectorError::DimensionMismatch`] and does not consume a slot.
    fn insert(&mut self, vector: Vec<f32>) -> VectorResult<IndexSlot>;

    /// Return up to `k` stored vectors closest to `query`.
    ///
    /// Results are ordered by ascending distance, ties by ascending slot.
    /// An empty index (or `k == 0`) yields an empty list, not an error.
    fn search(&self, query: &[f32], k: usize) -> VectorResult<Vec<Neighbor>>;
}

/// Utility functions for vector operations.
pub mod util {
    /// Squared Euclidean distance. Callers must pass equal-length slices.
    pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "Vectors must have same dimension");
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
    }

    /// Euclidean distance. Callers must pass equal-length slices.
    pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
        squared_euclidean(a, b).sqrt()
    }
}
