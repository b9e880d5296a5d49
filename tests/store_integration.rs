//! Integration tests for the Event Store.
//!
//! These verify the window/durability contract end to end: bounded size,
//! newest-first order, eviction versus persistence, and clearing.

use std::collections::BTreeMap;

use tempfile::TempDir;
use webhook_capture::store::EventStore;

// ============================================================================
// Test Utilities
// ============================================================================

fn open_store(max_events: usize) -> (EventStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = EventStore::open(dir.path(), max_events).unwrap();
    (store, dir)
}

async fn capture_tagged(store: &EventStore, tag: &str) -> webhook_capture::store::Captured {
    store
        .capture(
            "POST",
            "/hook",
            BTreeMap::new(),
            BTreeMap::new(),
            Some(serde_json::json!({ "tag": tag })),
        )
        .await
}

fn tag_of(event: &webhook_capture::event::Event) -> String {
    event.body.as_ref().unwrap()["tag"].as_str().unwrap().to_string()
}

// ============================================================================
// Window Semantics
// ============================================================================

#[tokio::test]
async fn test_window_stabilizes_at_bound_newest_first() {
    let (store, _dir) = open_store(10);

    for i in 0..25 {
        capture_tagged(&store, &format!("e{}", i)).await;
    }

    assert_eq!(store.count(), 10);

    let page = store.list(50, 0);
    assert_eq!(page.total, 10);
    assert_eq!(page.data.len(), 10);

    let tags: Vec<String> = page.data.iter().map(tag_of).collect();
    let expected: Vec<String> = (15..25).rev().map(|i| format!("e{}", i)).collect();
    assert_eq!(tags, expected);
}

#[tokio::test]
async fn test_get_by_id_until_evicted() {
    let (store, _dir) = open_store(3);

    let kept = capture_tagged(&store, "kept").await;
    assert!(store.get_by_id(&kept.event.id).is_some());

    for i in 0..3 {
        capture_tagged(&store, &format!("push{}", i)).await;
    }

    // evicted from the window, therefore unreachable by id
    assert!(store.get_by_id(&kept.event.id).is_none());
}

#[tokio::test]
async fn test_list_pagination_exact_counts() {
    let (store, _dir) = open_store(100);

    for i in 0..10 {
        capture_tagged(&store, &format!("e{}", i)).await;
    }

    let page = store.list(3, 0);
    assert_eq!(page.total, 10);
    assert_eq!(page.data.len(), 3);
    assert_eq!(tag_of(&page.data[0]), "e9");

    let page = store.list(50, 7);
    assert_eq!(page.data.len(), 3);
    assert_eq!(tag_of(&page.data[0]), "e2");

    let page = store.list(50, 100);
    assert_eq!(page.total, 10);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_clear_returns_count_and_empties_window() {
    let (store, _dir) = open_store(100);

    for i in 0..5 {
        capture_tagged(&store, &format!("e{}", i)).await;
    }

    assert_eq!(store.clear(), 5);
    assert_eq!(store.count(), 0);
    assert!(store.latest().is_none());

    let page = store.list(50, 0);
    assert_eq!(page.total, 0);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_latest_is_newest() {
    let (store, _dir) = open_store(10);

    assert!(store.latest().is_none());
    capture_tagged(&store, "first").await;
    let second = capture_tagged(&store, "second").await;

    assert_eq!(store.latest().unwrap().id, second.event.id);
}

// ============================================================================
// Durability vs Eviction
// ============================================================================

#[tokio::test]
async fn test_durability_outlives_window_eviction() {
    let (store, _dir) = open_store(2);

    let e1 = capture_tagged(&store, "e1").await;
    let e2 = capture_tagged(&store, "e2").await;
    let e3 = capture_tagged(&store, "e3").await;

    // window holds [e3, e2]; e1 evicted
    let page = store.list(50, 0);
    let ids: Vec<&str> = page.data.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![e3.event.id.as_str(), e2.event.id.as_str()]);
    assert!(store.get_by_id(&e1.event.id).is_none());

    // but its durable record is still readable by key
    let key = e1.saved_file.as_deref().unwrap();
    let persisted = store.read_persisted(key).await.unwrap();
    assert_eq!(persisted, e1.event);
}

#[tokio::test]
async fn test_clear_does_not_touch_durable_records() {
    let (store, _dir) = open_store(10);

    for i in 0..4 {
        capture_tagged(&store, &format!("e{}", i)).await;
    }
    assert_eq!(store.clear(), 4);

    let records = store.list_persisted().await.unwrap();
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn test_every_capture_persisted_exactly_once() {
    let (store, _dir) = open_store(2);

    for i in 0..6 {
        capture_tagged(&store, &format!("e{}", i)).await;
    }

    // window bounded at 2, disk keeps all 6
    assert_eq!(store.count(), 2);
    let records = store.list_persisted().await.unwrap();
    assert_eq!(records.len(), 6);
}

#[tokio::test]
async fn test_capture_survives_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = EventStore::open(dir.path(), 10).unwrap();

    // make the directory unwritable so the durable write fails
    drop(std::fs::remove_dir_all(dir.path()));

    let captured = capture_tagged(&store, "orphan").await;
    assert!(captured.saved_file.is_none());

    // in-memory insert happened regardless
    assert_eq!(store.count(), 1);
    assert_eq!(store.latest().unwrap().id, captured.event.id);
}

#[tokio::test]
async fn test_capture_ids_unique() {
    let (store, _dir) = open_store(1000);

    let mut ids = std::collections::HashSet::new();
    for i in 0..200 {
        let captured = capture_tagged(&store, &format!("e{}", i)).await;
        assert!(ids.insert(captured.event.id));
    }
}
