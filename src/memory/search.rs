//! Exact k-nearest-neighbour search over the flat vector index.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::errors::Error;
use crate::memory_types::SearchHit;

use super::store::MemoryStore;

/// Heap entry ordered by squared distance, then insertion index.
///
/// The max-heap keeps the current worst survivor on top, so a later record
/// with an equal distance never displaces an earlier one.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    squared: f64,
    id: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.squared
            .total_cmp(&other.squared)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Squared Euclidean distance with f64 accumulation.
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = (*x as f64) - (*y as f64);
            d * d
        })
        .sum()
}

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// Find the `k` stored records nearest to `query`.
    ///
    /// Results are ordered by ascending Euclidean distance; records at the same
    /// distance come back in insertion order. At most `min(k, len)` hits are
    /// returned, and an empty store yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `k` is zero
    /// - `query.len()` differs from the store dimension
    /// - The query contains NaN or infinite values
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, Error> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be a positive integer".to_string()));
        }
        self.check_vector(query)?;

        let inner = self.read();
        let dimension = self.dimension();
        let capacity = k.min(inner.records.len());
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(capacity + 1);

        for (id, row) in inner.index.chunks_exact(dimension).enumerate() {
            let candidate = Candidate {
                squared: squared_euclidean(query, row),
                id,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        let hits: Vec<SearchHit> = heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| {
                let record = &inner.records[candidate.id];
                SearchHit {
                    id: candidate.id,
                    text: record.text.clone(),
                    distance: candidate.squared.sqrt(),
                    metadata: record.metadata.clone(),
                }
            })
            .collect();

        debug!(k, scanned = inner.records.len(), returned = hits.len(), "knn search");
        Ok(hits)
    }
}
