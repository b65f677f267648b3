//! Exact brute-force L2 index.
//!
//! Vectors live in one contiguous buffer, slot `i` at
//! `data[i * dim..(i + 1) * dim]`. Search is a linear scan, O(N·dim) per
//! query, which is fine for a single small knowledge graph.

use crate::{util, IndexSlot, Neighbor, VectorError, VectorIndex, VectorResult};
use std::cmp::Ordering;

/// Flat (exhaustive) Euclidean index.
///
/// # Example
///
/// ```rust
/// use kgrag_vectors::{FlatIndex, VectorIndex, VectorError};
///
/// let mut index = FlatIndex::new(2);
/// assert_eq!(index.insert(vec![0.1, 0.0]).unwrap(), 0);
/// assert_eq!(index.insert(vec![10.0, 0.0]).unwrap(), 1);
///
/// // Wrong length: rejected, slot counter unchanged.
/// assert!(matches!(index.insert(vec![1.0]), Err(VectorError::DimensionMismatch { .. })));
/// assert_eq!(index.len(), 2);
///
/// let hits = index.search(&[0.0, 0.0], 1).unwrap();
/// assert_eq!(hits[0].slot, 0);
/// ```
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(dimension: usize, vectors: usize) -> Self {
        Self {
            dimension,
            data: Vec::with_capacity(dimension * vectors),
        }
    }

    /// The stored vector at `slot`.
    pub fn vector(&self, slot: IndexSlot) -> Option<&[f32]> {
        if slot >= self.len() {
            return None;
        }
        let start = slot * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    fn check(&self, len: usize) -> VectorResult<()> {
        if len != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: len,
            });
        }
        Ok(())
    }
}

fn by_distance_then_slot(a: &(IndexSlot, f32), b: &(IndexSlot, f32)) -> Ordering {
    a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    fn insert(&mut self, vector: Vec<f32>) -> VectorResult<IndexSlot> {
        self.check(vector.len())?;
        let slot = self.len();
        self.data.extend_from_slice(&vector);
        Ok(slot)
    }

    fn search(&self, query: &[f32], k: usize) -> VectorResult<Vec<Neighbor>> {
        self.check(query.len())?;

        let n = self.len();
        if n == 0 || k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(IndexSlot, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(slot, v)| (slot, util::squared_euclidean(query, v)))
            .collect();

        // Partition out the k best before sorting them.
        if k < n {
            scored.select_nth_unstable_by(k - 1, by_distance_then_slot);
            scored.truncate(k);
        }
        scored.sort_by(by_distance_then_slot);

        Ok(scored
            .into_iter()
            .map(|(slot, d2)| Neighbor {
                slot,
                distance: d2.sqrt(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_sequential_from_zero() {
        let mut index = FlatIndex::new(2);
        for expected in 0..5 {
            assert_eq!(index.insert(vec![expected as f32, 0.0]).unwrap(), expected);
        }
        assert_eq!(index.len(), 5);
        assert_eq!(index.vector(3), Some(&[3.0, 0.0][..]));
        assert_eq!(index.vector(5), None);
    }

    #[test]
    fn mismatched_insert_does_not_advance_slot() {
        let mut index = FlatIndex::new(384);
        let result = index.insert(vec![0.0; 300]);

        assert_eq!(
            result,
            Err(VectorError::DimensionMismatch {
                expected: 384,
                actual: 300
            })
        );
        assert!(index.is_empty());
        assert_eq!(index.insert(vec![0.0; 384]).unwrap(), 0);
    }

    #[test]
    fn search_orders_by_ascending_distance() {
        let mut index = FlatIndex::new(2);
        index.insert(vec![5.0, 0.0]).unwrap();
        index.insert(vec![1.0, 0.0]).unwrap();
        index.insert(vec![3.0, 0.0]).unwrap();
        index.insert(vec![4.0, 0.0]).unwrap();

        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let slots: Vec<_> = hits.iter().map(|h| h.slot).collect();
        assert_eq!(slots, vec![1, 2, 3]);
        assert!((hits[0].distance - 1.0).abs() < 1e-6);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn ties_break_by_slot() {
        let mut index = FlatIndex::new(2);
        index.insert(vec![0.0, 1.0]).unwrap();
        index.insert(vec![1.0, 0.0]).unwrap();
        index.insert(vec![0.0, -1.0]).unwrap();
        index.insert(vec![-1.0, 0.0]).unwrap();

        for k in 1..=4 {
            let hits = index.search(&[0.0, 0.0], k).unwrap();
            let slots: Vec<_> = hits.iter().map(|h| h.slot).collect();
            assert_eq!(slots, (0..k).collect::<Vec<_>>());
        }
    }

    #[test]
    fn k_larger_than_index_returns_everything() {
        let mut index = FlatIndex::new(2);
        index.insert(vec![1.0, 1.0]).unwrap();
        index.insert(vec![0.0, 0.0]).unwrap();

        let hits = index.search(&[0.0, 0.0], 5).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].slot, 1);
    }

    #[test]
    fn empty_index_and_zero_k_return_nothing() {
        let mut index = FlatIndex::new(3);
        assert!(index.search(&[0.0, 0.0, 0.0], 3).unwrap().is_empty());

        index.insert(vec![1.0, 2.0, 3.0]).unwrap();
        assert!(index.search(&[0.0, 0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn mismatched_query_is_rejected() {
        let mut index = FlatIndex::new(3);
        index.insert(vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            index.search(&[1.0, 2.0], 1),
            Err(VectorError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn search_results_are_bounded_and_known() {
        let mut index = FlatIndex::with_capacity(4, 64);
        for i in 0..64 {
            let x = i as f32;
            index.insert(vec![x.sin(), x.cos(), x * 0.1, 1.0]).unwrap();
        }

        let query = [0.3, -0.2, 2.0, 1.0];
        for k in [1, 7, 63, 64, 100] {
            let hits = index.search(&query, k).unwrap();
            assert_eq!(hits.len(), k.min(64));
            assert!(hits.iter().all(|h| h.slot < 64));
            assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        }
    }
}
