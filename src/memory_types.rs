//! Memory record and search result types.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;

/// Insertion index of a record within its store.
pub type RecordId = usize;

/// Open metadata mapping attached at ingestion.
///
/// Conventional keys are `source`, `timestamp` and `user_id`; none are
/// enforced and the store never reads them.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// One stored snippet: text, embedding and metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRecord {
    /// Source text, stored verbatim.
    pub text: String,
    /// Embedding of `text`; length equals the owning store's dimension.
    #[serde(skip)]
    pub vector: Vec<f32>,
    /// Descriptive metadata, never used for ranking.
    pub metadata: Metadata,
}

impl MemoryRecord {
    /// Build a record with an optional metadata map.
    pub fn new(text: impl Into<String>, vector: Vec<f32>, metadata: Option<Metadata>) -> Self {
        Self {
            text: text.into(),
            vector,
            metadata: metadata.unwrap_or_default(),
        }
    }

    /// Build a record stamped with `user_id`, `source` and the current UTC timestamp.
    pub fn ingested(text: impl Into<String>, vector: Vec<f32>, user_id: &str, source: &str) -> Self {
        Self::new(text, vector, Some(ingestion_metadata(user_id, source)))
    }
}

/// Metadata stamped onto every ingested snippet.
pub fn ingestion_metadata(user_id: &str, source: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("user_id".to_string(), user_id.into());
    metadata.insert("source".to_string(), source.into());
    metadata.insert("timestamp".to_string(), Utc::now().to_rfc3339().into());
    metadata
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Insertion index of the matching record.
    pub id: RecordId,
    /// Stored text of the matching record.
    pub text: String,
    /// Euclidean distance from the query vector.
    pub distance: f64,
    /// Metadata of the matching record.
    pub metadata: Metadata,
}
