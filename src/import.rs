//! Import of ingestion items from JSON files.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::errors::Error;
use crate::ingest::{IngestItem, IngestOutcome};

/// Import statistics for reporting.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub total: usize,
    pub stored: usize,
    pub failed: usize,
}

impl ImportStats {
    /// Tally a batch of ingestion outcomes.
    pub fn from_outcomes(outcomes: &[IngestOutcome]) -> Self {
        let stored = outcomes.iter().filter(|o| o.is_stored()).count();
        Self {
            total: outcomes.len(),
            stored,
            failed: outcomes.len() - stored,
        }
    }

    /// Records rejected before ingestion.
    pub fn skipped(count: usize) -> Self {
        Self {
            total: count,
            stored: 0,
            failed: count,
        }
    }

    /// Add another batch's counts to this one.
    pub fn merge(&mut self, other: &ImportStats) {
        self.total += other.total;
        self.stored += other.stored;
        self.failed += other.failed;
    }
}

/// Read a JSON array of `{ "text": ..., "source": ... }` items.
///
/// Elements are converted one by one: a missing, null or non-string `text`
/// (or an element that is not an object) becomes an item with empty text,
/// which `bulk_add` then reports as a failed item.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if `json_path` does not exist, or
/// `Error::Json` if the file is not a JSON array.
pub fn import_items(json_path: &Path) -> Result<Vec<IngestItem>, Error> {
    if !json_path.exists() {
        return Err(Error::FileNotFound(json_path.to_path_buf()));
    }

    let content = std::fs::read_to_string(json_path)?;
    let values: Vec<Value> = serde_json::from_str(&content)?;
    Ok(values.iter().map(item_from_value).collect())
}

fn item_from_value(value: &Value) -> IngestItem {
    let text = value.get("text").and_then(Value::as_str).unwrap_or_default();
    let source = value
        .get("source")
        .and_then(Value::as_str)
        .map(str::to_string);
    IngestItem {
        text: text.to_string(),
        source,
    }
}
