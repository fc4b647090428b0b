//! Core memory store struct: append-only records with a parallel flat vector index.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::errors::Error;
use crate::memory_types::{MemoryRecord, Metadata, RecordId};

/// Maximum allowed input length (100,000 bytes).
pub const MAX_INPUT_LENGTH: usize = 100_000;

/// Text and metadata of a record; its vector lives only in the index.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) text: String,
    pub(crate) metadata: Metadata,
}

/// Records and their vectors, always mutated together.
///
/// `index[i * dimension..(i + 1) * dimension]` is the vector of `records[i]`.
#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) records: Vec<Entry>,
    pub(crate) index: Vec<f32>,
}

impl Inner {
    pub(crate) fn row(&self, id: RecordId, dimension: usize) -> &[f32] {
        &self.index[id * dimension..(id + 1) * dimension]
    }

    fn record(&self, id: RecordId, dimension: usize) -> Option<MemoryRecord> {
        let entry = self.records.get(id)?;
        Some(MemoryRecord::new(
            entry.text.clone(),
            self.row(id, dimension).to_vec(),
            Some(entry.metadata.clone()),
        ))
    }
}

/// In-process memory store with exact nearest-neighbour search.
///
/// All methods take `&self`. Mutations (`add`, `reset`) hold the write lock;
/// reads (`search`, `list_all`, `get`) share the read lock, so a search never
/// observes a record without its index row. Share across threads with `Arc`.
#[derive(Debug)]
pub struct MemoryStore {
    dimension: usize,
    pub(crate) inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store for vectors of length `dimension`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `dimension` is zero.
    pub fn new(dimension: usize) -> Result<Self, Error> {
        if dimension == 0 {
            return Err(Error::InvalidArgument(
                "dimension must be a positive integer".to_string(),
            ));
        }
        Ok(MemoryStore {
            dimension,
            inner: RwLock::new(Inner::default()),
        })
    }

    /// Vector length fixed at construction.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use = "handle the error or the record id may be lost"]
    /// Append a record and return its insertion index.
    ///
    /// Duplicate text is legal; each call creates an independent record.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Text is empty or whitespace-only
    /// - Text exceeds `MAX_INPUT_LENGTH`
    /// - `vector.len()` differs from the store dimension
    /// - The vector contains NaN or infinite values
    ///
    /// The store is unchanged after a failed call.
    pub fn add(
        &self,
        text: &str,
        vector: &[f32],
        metadata: Option<Metadata>,
    ) -> Result<RecordId, Error> {
        validate(text)?;
        self.check_vector(vector)?;

        let mut inner = self.write();
        let id = inner.records.len();
        inner.index.extend_from_slice(vector);
        inner.records.push(Entry {
            text: text.to_string(),
            metadata: metadata.unwrap_or_default(),
        });
        debug!(id, dimension = self.dimension, "stored memory record");
        Ok(id)
    }

    /// Discard every record and index row. The dimension is kept.
    pub fn reset(&self) {
        let mut inner = self.write();
        let dropped = inner.records.len();
        inner.records.clear();
        inner.index.clear();
        debug!(dropped, "memory store reset");
    }

    /// Every stored text in insertion order.
    pub fn list_all(&self) -> Vec<String> {
        self.read()
            .records
            .iter()
            .map(|record| record.text.clone())
            .collect()
    }

    /// Snapshot of every record in insertion order.
    pub fn records(&self) -> Vec<MemoryRecord> {
        let inner = self.read();
        (0..inner.records.len())
            .filter_map(|id| inner.record(id, self.dimension))
            .collect()
    }

    /// Get a record by insertion index.
    pub fn get(&self, id: RecordId) -> Option<MemoryRecord> {
        self.read().record(id, self.dimension)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject vectors of the wrong length or with non-finite components.
    pub(crate) fn check_vector(&self, vector: &[f32]) -> Result<(), Error> {
        if vector.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidEmbedding(
                "Vector contains NaN or infinite values".to_string(),
            ));
        }
        Ok(())
    }

    // Both pushes in `add` happen after validation, so a poisoned guard still
    // holds records and index in step.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Validate snippet text (rejects empty and whitespace-only inputs).
///
/// Returns the text unchanged so it can be chained into embedding calls.
pub fn validate(text: &str) -> Result<&str, Error> {
    if text.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    if text.len() > MAX_INPUT_LENGTH {
        return Err(Error::InputTooLong {
            max_length: MAX_INPUT_LENGTH,
            actual_length: text.len(),
        });
    }
    Ok(text)
}
