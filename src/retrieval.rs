//! Retrieval pipeline: embed a question, search the store, rank the text.
//!
//! Stateless composition over an [`Embedder`] and a [`MemoryStore`]; either
//! side can be swapped for a stub in tests.

use crate::embedding::Embedder;
use crate::errors::Error;
use crate::memory::{MemoryStore, validate};
use crate::memory_types::SearchHit;

#[must_use = "handle the error or results may be lost"]
/// Retrieve the `k` memories nearest to `question`, keeping distances and metadata.
///
/// # Errors
///
/// Returns error if:
/// - Question is empty or too long
/// - `k` is zero
/// - Embedding fails (propagated unchanged)
/// - The embedding length differs from the store dimension
pub fn retrieve_hits(
    question: &str,
    k: usize,
    embedder: &dyn Embedder,
    store: &MemoryStore,
) -> Result<Vec<SearchHit>, Error> {
    let question = validate(question)?;
    if k == 0 {
        return Err(Error::InvalidArgument("k must be a positive integer".to_string()));
    }
    let query = embedder.embed(question)?;
    store.search(&query, k)
}

#[must_use = "handle the error or results may be lost"]
/// Retrieve the text of the `k` memories nearest to `question`, best first.
pub fn retrieve(
    question: &str,
    k: usize,
    embedder: &dyn Embedder,
    store: &MemoryStore,
) -> Result<Vec<String>, Error> {
    Ok(retrieve_hits(question, k, embedder, store)?
        .into_iter()
        .map(|hit| hit.text)
        .collect())
}
