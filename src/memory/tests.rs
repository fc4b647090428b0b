//! Tests for the memory store.

use std::sync::Arc;
use std::thread;

use super::*;
use crate::errors::Error;
use crate::memory_types::Metadata;

fn store_with(records: &[(&str, [f32; 3])]) -> MemoryStore {
    let store = MemoryStore::new(3).unwrap();
    for (text, vector) in records {
        store.add(text, vector, None).unwrap();
    }
    store
}

fn texts(hits: &[crate::memory_types::SearchHit]) -> Vec<&str> {
    hits.iter().map(|hit| hit.text.as_str()).collect()
}

#[test]
fn test_new_with_zero_dimension() {
    let result = MemoryStore::new(0);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_add_returns_insertion_index() {
    let store = MemoryStore::new(2).unwrap();
    assert_eq!(store.add("first", &[0.0, 0.0], None).unwrap(), 0);
    assert_eq!(store.add("second", &[1.0, 0.0], None).unwrap(), 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.dimension(), 2);
}

#[test]
fn test_add_wrong_dimension_leaves_store_unchanged() {
    let store = store_with(&[("a", [0.0, 0.0, 0.0])]);

    for bad in [vec![], vec![1.0], vec![1.0, 2.0, 3.0, 4.0]] {
        let result = store.add("bad", &bad, None);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch { expected: 3, .. })
        ));
        assert_eq!(store.len(), 1);
    }
    assert_eq!(store.list_all(), vec!["a"]);
}

#[test]
fn test_add_empty_text() {
    let store = MemoryStore::new(3).unwrap();
    assert!(matches!(
        store.add("", &[0.0, 0.0, 0.0], None),
        Err(Error::EmptyInput)
    ));
    assert!(matches!(
        store.add("  \t\n", &[0.0, 0.0, 0.0], None),
        Err(Error::EmptyInput)
    ));
    assert!(store.is_empty());
}

#[test]
fn test_add_oversized_text() {
    let store = MemoryStore::new(1).unwrap();
    let long_text = "x".repeat(store::MAX_INPUT_LENGTH + 1);
    let result = store.add(&long_text, &[0.0], None);
    assert!(matches!(result, Err(Error::InputTooLong { .. })));
    assert!(store.is_empty());
}

#[test]
fn test_add_non_finite_vector() {
    let store = MemoryStore::new(2).unwrap();
    assert!(matches!(
        store.add("nan", &[f32::NAN, 0.0], None),
        Err(Error::InvalidEmbedding(_))
    ));
    assert!(matches!(
        store.add("inf", &[0.0, f32::INFINITY], None),
        Err(Error::InvalidEmbedding(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn test_duplicates_are_independent_records() {
    let store = store_with(&[("same", [1.0, 0.0, 0.0]), ("same", [1.0, 0.0, 0.0])]);
    assert_eq!(store.len(), 2);

    let hits = store.search(&[1.0, 0.0, 0.0], 5).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, 0);
    assert_eq!(hits[1].id, 1);
}

#[test]
fn test_search_ranking() {
    let store = store_with(&[
        ("a", [0.0, 0.0, 0.0]),
        ("b", [1.0, 0.0, 0.0]),
        ("c", [5.0, 0.0, 0.0]),
    ]);

    let hits = store.search(&[0.0, 0.0, 0.0], 2).unwrap();
    assert_eq!(texts(&hits), vec!["a", "b"]);
    assert_eq!(hits[0].distance, 0.0);
    assert!((hits[1].distance - 1.0).abs() < 1e-9);
}

#[test]
fn test_search_orders_by_true_distance() {
    let store = store_with(&[
        ("far", [10.0, 10.0, 10.0]),
        ("mid", [3.0, 4.0, 0.0]),
        ("near", [0.5, 0.0, 0.0]),
        ("neg", [-2.0, 0.0, 0.0]),
    ]);

    let hits = store.search(&[0.0, 0.0, 0.0], 4).unwrap();
    assert_eq!(texts(&hits), vec!["near", "neg", "mid", "far"]);
    assert!((hits[2].distance - 5.0).abs() < 1e-9);
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn test_search_tie_break_by_insertion_order() {
    let store = store_with(&[
        ("right", [1.0, 0.0, 0.0]),
        ("up", [0.0, 1.0, 0.0]),
        ("left", [-1.0, 0.0, 0.0]),
        ("down", [0.0, -1.0, 0.0]),
    ]);

    for _ in 0..5 {
        let hits = store.search(&[0.0, 0.0, 0.0], 4).unwrap();
        assert_eq!(texts(&hits), vec!["right", "up", "left", "down"]);
    }

    let hits = store.search(&[0.0, 0.0, 0.0], 2).unwrap();
    assert_eq!(texts(&hits), vec!["right", "up"]);
}

#[test]
fn test_search_tie_break_with_later_closer_record() {
    let store = store_with(&[
        ("tie-1", [2.0, 0.0, 0.0]),
        ("tie-2", [0.0, 2.0, 0.0]),
        ("closest", [0.1, 0.0, 0.0]),
        ("tie-3", [0.0, 0.0, 2.0]),
    ]);

    let hits = store.search(&[0.0, 0.0, 0.0], 3).unwrap();
    assert_eq!(texts(&hits), vec!["closest", "tie-1", "tie-2"]);
}

#[test]
fn test_search_empty_store() {
    let store = MemoryStore::new(3).unwrap();
    for k in [1, 3, 100] {
        assert!(store.search(&[0.0, 0.0, 0.0], k).unwrap().is_empty());
    }
}

#[test]
fn test_search_k_saturation() {
    let store = store_with(&[
        ("a", [0.0, 0.0, 0.0]),
        ("b", [1.0, 0.0, 0.0]),
        ("c", [5.0, 0.0, 0.0]),
    ]);
    let hits = store.search(&[0.0, 0.0, 0.0], 100).unwrap();
    assert_eq!(hits.len(), 3);
}

#[test]
fn test_search_zero_k() {
    let store = store_with(&[("a", [0.0, 0.0, 0.0])]);
    let result = store.search(&[0.0, 0.0, 0.0], 0);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_search_wrong_dimension() {
    let store = store_with(&[("a", [0.0, 0.0, 0.0])]);
    let result = store.search(&[0.0, 0.0], 1);
    assert!(matches!(
        result,
        Err(Error::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_search_wrong_dimension_on_empty_store() {
    let store = MemoryStore::new(3).unwrap();
    let result = store.search(&[0.0; 4], 1);
    assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
}

#[test]
fn test_search_returns_text_verbatim() {
    let text = "  Café at 7:30 ☕, then \"deep work\"\n";
    let store = MemoryStore::new(3).unwrap();
    store.add(text, &[1.0, 2.0, 3.0], None).unwrap();

    let hits = store.search(&[1.0, 2.0, 3.0], 1).unwrap();
    assert_eq!(hits[0].text.as_bytes(), text.as_bytes());
}

#[test]
fn test_search_returns_metadata() {
    let store = MemoryStore::new(1).unwrap();
    let mut metadata = Metadata::new();
    metadata.insert("source".to_string(), "calendar".into());
    store.add("Dentist", &[0.0], Some(metadata.clone())).unwrap();

    let hits = store.search(&[0.0], 1).unwrap();
    assert_eq!(hits[0].metadata, metadata);
}

#[test]
fn test_metadata_does_not_affect_ranking() {
    let store = MemoryStore::new(1).unwrap();
    let mut loud = Metadata::new();
    loud.insert("priority".to_string(), 1000.into());
    store.add("far", &[9.0], Some(loud)).unwrap();
    store.add("near", &[1.0], None).unwrap();

    let hits = store.search(&[0.0], 2).unwrap();
    assert_eq!(texts(&hits), vec!["near", "far"]);
}

#[test]
fn test_reset() {
    let store = store_with(&[("a", [0.0, 0.0, 0.0]), ("b", [1.0, 0.0, 0.0])]);
    store.reset();

    assert!(store.list_all().is_empty());
    assert!(store.search(&[0.0, 0.0, 0.0], 3).unwrap().is_empty());
    assert_eq!(store.dimension(), 3);

    let id = store.add("fresh", &[2.0, 0.0, 0.0], None).unwrap();
    assert_eq!(id, 0);
    assert_eq!(store.list_all(), vec!["fresh"]);
}

#[test]
fn test_reset_twice() {
    let store = store_with(&[("a", [0.0, 0.0, 0.0])]);
    store.reset();
    store.reset();
    assert!(store.is_empty());
}

#[test]
fn test_list_all_insertion_order() {
    let store = store_with(&[
        ("third?", [5.0, 0.0, 0.0]),
        ("first?", [0.0, 0.0, 0.0]),
        ("second?", [1.0, 0.0, 0.0]),
    ]);
    assert_eq!(store.list_all(), vec!["third?", "first?", "second?"]);
}

#[test]
fn test_get_and_records() {
    let store = store_with(&[("a", [0.0, 1.0, 2.0]), ("b", [3.0, 4.0, 5.0])]);

    let record = store.get(1).unwrap();
    assert_eq!(record.text, "b");
    assert_eq!(record.vector, vec![3.0, 4.0, 5.0]);
    assert!(store.get(2).is_none());

    let records = store.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].vector, vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_index_matches_records() {
    let store = store_with(&[("a", [0.0, 1.0, 2.0]), ("b", [3.0, 4.0, 5.0])]);
    let _ = store.add("bad", &[1.0], None);

    let inner = store.read();
    assert_eq!(inner.records.len(), 2);
    assert_eq!(inner.index.len(), inner.records.len() * 3);
    assert_eq!(inner.row(1, 3), &[3.0f32, 4.0, 5.0]);
    drop(inner);

    let records = store.records();
    for (row, record) in [[0.0f32, 1.0, 2.0], [3.0, 4.0, 5.0]].iter().zip(records.iter()) {
        assert_eq!(row.as_slice(), record.vector.as_slice());
    }
}

#[test]
fn test_concurrent_readers_and_writers() {
    let store = Arc::new(MemoryStore::new(2).unwrap());

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    let value = (w * 100 + i) as f32;
                    store.add(&format!("w{w}-{i}"), &[value, 0.0], None).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..50 {
                    let hits = store.search(&[0.0, 0.0], 10).unwrap();
                    for hit in &hits {
                        let record = store.get(hit.id).unwrap();
                        assert_eq!(record.text, hit.text);
                    }
                    for pair in hits.windows(2) {
                        assert!(pair[0].distance <= pair[1].distance);
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 200);
    let inner = store.read();
    assert_eq!(inner.index.len(), 400);
}
