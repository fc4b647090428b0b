//! Ingestion: validate, embed, stamp metadata, store.
//!
//! `bulk_add` tolerates per-item failures so one malformed record from a
//! heterogeneous source never blocks the rest of the batch.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::embedding::Embedder;
use crate::errors::Error;
use crate::memory::{MemoryStore, validate};
use crate::memory_types::{Metadata, RecordId, ingestion_metadata};

/// Source tag used when an item does not name one.
pub const DEFAULT_BULK_SOURCE: &str = "bulk";

/// One snippet awaiting ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestItem {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl IngestItem {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: Some(source.into()),
        }
    }

    /// Source tag, defaulting to `"bulk"`.
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_BULK_SOURCE)
    }
}

/// Confirmation of a stored snippet.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub id: RecordId,
    pub text: String,
    pub metadata: Metadata,
}

/// Per-item result of [`bulk_add`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestOutcome {
    /// Item was embedded and stored.
    Stored { id: RecordId, text: String },
    /// Item was skipped; `reason` is the error message.
    Failed { text: String, reason: String },
}

impl IngestOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, IngestOutcome::Stored { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, IngestOutcome::Failed { .. })
    }
}

#[must_use = "handle the error or the receipt may be lost"]
/// Ingest a single snippet.
///
/// Text is validated before the embedder is called, so empty input never
/// costs an embedding request.
///
/// # Errors
///
/// Returns error if:
/// - Text is empty or too long
/// - Embedding fails
/// - The embedder's output length differs from the store dimension
pub fn ingest_text(
    store: &MemoryStore,
    embedder: &dyn Embedder,
    user_id: &str,
    text: &str,
    source: &str,
) -> Result<IngestReceipt, Error> {
    let text = validate(text)?;
    let vector = embedder.embed(text)?;
    let metadata = ingestion_metadata(user_id, source);
    let id = store.add(text, &vector, Some(metadata.clone()))?;
    debug!(id, source, "ingested memory");
    Ok(IngestReceipt {
        id,
        text: text.to_string(),
        metadata,
    })
}

/// Ingest every item independently, in order.
///
/// Never fails as a whole: each item yields its own outcome, and failures are
/// logged and recorded with their reason.
pub fn bulk_add(
    items: &[IngestItem],
    embedder: &dyn Embedder,
    store: &MemoryStore,
    user_id: &str,
) -> Vec<IngestOutcome> {
    items
        .iter()
        .map(
            |item| match ingest_text(store, embedder, user_id, &item.text, item.source()) {
                Ok(receipt) => IngestOutcome::Stored {
                    id: receipt.id,
                    text: receipt.text,
                },
                Err(e) => {
                    warn!(source = item.source(), error = %e, "skipping memory");
                    IngestOutcome::Failed {
                        text: item.text.clone(),
                        reason: e.to_string(),
                    }
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    /// Embedder that fails for texts containing "boom".
    struct FlakyEmbedder {
        inner: HashEmbedder,
    }

    impl Embedder for FlakyEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
            if text.contains("boom") {
                return Err(Error::Embedding("quota exceeded".to_string()));
            }
            self.inner.embed(text)
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }

        fn model_name(&self) -> &str {
            "flaky"
        }
    }

    /// Embedder that panics if called.
    struct UnreachableEmbedder;

    impl Embedder for UnreachableEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, Error> {
            panic!("embedder must not be called for invalid input");
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn model_name(&self) -> &str {
            "unreachable"
        }
    }

    #[test]
    fn test_ingest_text_stamps_metadata() {
        let store = MemoryStore::new(8).unwrap();
        let embedder = HashEmbedder::new(8).unwrap();

        let receipt = ingest_text(&store, &embedder, "alice", "Went jogging", "notes").unwrap();

        assert_eq!(receipt.id, 0);
        assert_eq!(receipt.text, "Went jogging");
        assert_eq!(receipt.metadata["user_id"], "alice");
        assert_eq!(receipt.metadata["source"], "notes");
        assert!(receipt.metadata.contains_key("timestamp"));

        let stored = store.get(0).unwrap();
        assert_eq!(stored.metadata, receipt.metadata);
    }

    #[test]
    fn test_ingest_empty_text_skips_embedder() {
        let store = MemoryStore::new(4).unwrap();
        let result = ingest_text(&store, &UnreachableEmbedder, "u", " \n ", "manual");
        assert!(matches!(result, Err(Error::EmptyInput)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ingest_dimension_mismatch() {
        let store = MemoryStore::new(4).unwrap();
        let embedder = HashEmbedder::new(8).unwrap();
        let result = ingest_text(&store, &embedder, "u", "hello", "manual");
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 4,
                actual: 8
            })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_bulk_partial_failure() {
        let store = MemoryStore::new(8).unwrap();
        let embedder = HashEmbedder::new(8).unwrap();
        let items: Vec<IngestItem> =
            serde_json::from_str(r#"[{"text":"ok"}, {"text":""}, {"text":"ok2"}]"#).unwrap();

        let outcomes = bulk_add(&items, &embedder, &store, "demo");

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|o| o.is_failed()).count(), 1);
        assert!(outcomes[1].is_failed());
        assert_eq!(store.list_all(), vec!["ok", "ok2"]);
    }

    #[test]
    fn test_bulk_embedding_failure_does_not_abort() {
        let store = MemoryStore::new(8).unwrap();
        let embedder = FlakyEmbedder {
            inner: HashEmbedder::new(8).unwrap(),
        };
        let items = vec![
            IngestItem::new("boom first", "calendar"),
            IngestItem::new("Habit: Read at 21:00 (daily)", "habits"),
            IngestItem::new("boom again", "notes"),
        ];

        let outcomes = bulk_add(&items, &embedder, &store, "demo");

        assert!(outcomes[0].is_failed());
        assert_eq!(
            outcomes[1],
            IngestOutcome::Stored {
                id: 0,
                text: "Habit: Read at 21:00 (daily)".to_string()
            }
        );
        match &outcomes[2] {
            IngestOutcome::Failed { text, reason } => {
                assert_eq!(text, "boom again");
                assert!(reason.contains("quota exceeded"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_bulk_default_source() {
        let store = MemoryStore::new(8).unwrap();
        let embedder = HashEmbedder::new(8).unwrap();
        let items: Vec<IngestItem> = serde_json::from_str(r#"[{"text":"no source"}]"#).unwrap();

        bulk_add(&items, &embedder, &store, "demo");

        assert_eq!(store.get(0).unwrap().metadata["source"], "bulk");
    }

    #[test]
    fn test_item_missing_text_fails_individually() {
        let store = MemoryStore::new(8).unwrap();
        let embedder = HashEmbedder::new(8).unwrap();
        let items: Vec<IngestItem> =
            serde_json::from_str(r#"[{"source":"calendar"}, {"text":"fine"}]"#).unwrap();

        let outcomes = bulk_add(&items, &embedder, &store, "demo");
        assert!(outcomes[0].is_failed());
        assert!(outcomes[1].is_stored());
    }

    #[test]
    fn test_outcome_serialization() {
        let stored = IngestOutcome::Stored {
            id: 3,
            text: "tea".to_string(),
        };
        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains("\"status\":\"stored\""));
        assert!(json.contains("\"id\":3"));

        let failed = IngestOutcome::Failed {
            text: String::new(),
            reason: "Input cannot be empty".to_string(),
        };
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
    }
}
