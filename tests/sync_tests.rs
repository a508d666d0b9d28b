//! Sync-policy semantics against the in-process remote store.

use serde_json::{Map, Value};

use reelsync::model::{CanonicalRecord, ResolvedRecord, TitleKind};
use reelsync::remote::{sync_records, MemoryRemote, SyncPolicy};

fn resolved(id: &str, title: &str, year: i32) -> ResolvedRecord {
    ResolvedRecord::from_canonical(CanonicalRecord {
        id: id.into(),
        kind: TitleKind::Movie,
        title: title.into(),
        original_title: title.into(),
        is_adult: false,
        start_year: year,
        end_year: None,
        runtime_minutes: None,
        genres: vec![],
    })
}

fn extras(seen: bool) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("seen".to_string(), Value::Bool(seen));
    map
}

#[test]
fn test_insert_only_is_idempotent_and_never_modifies() {
    let mut store = MemoryRemote::new();
    let records = vec![resolved("tt1", "Heat", 1995), resolved("tt2", "Crash", 2004)];

    let report =
        sync_records(&mut store, &records, SyncPolicy::InsertOnly, &extras(false)).unwrap();
    assert_eq!(report.records, 2);
    assert_eq!(report.new_documents(), 2);
    assert_eq!(report.modified, 0);

    // Second identical seed: nothing inserted, nothing touched.
    let report =
        sync_records(&mut store, &records, SyncPolicy::InsertOnly, &extras(false)).unwrap();
    assert_eq!(report.new_documents(), 0);
    assert_eq!(report.modified, 0);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_insert_only_preserves_existing_seen_flag() {
    let mut store = MemoryRemote::new();

    // The watched list pushed the record with seen: true.
    let watched = vec![resolved("tt1", "Heat", 1995)];
    sync_records(&mut store, &watched, SyncPolicy::ReplaceExisting, &extras(true)).unwrap();
    assert_eq!(store.get("tt1").unwrap()["seen"], true);

    // A later catalog seed must not clobber it.
    let seed = vec![resolved("tt1", "Heat", 1995), resolved("tt2", "Crash", 2004)];
    let report = sync_records(&mut store, &seed, SyncPolicy::InsertOnly, &extras(false)).unwrap();
    assert_eq!(report.new_documents(), 1);
    assert_eq!(store.get("tt1").unwrap()["seen"], true);
    assert_eq!(store.get("tt2").unwrap()["seen"], false);
}

#[test]
fn test_replace_existing_overwrites_seeded_document() {
    let mut store = MemoryRemote::new();

    let seed = vec![resolved("tt1", "Heat", 1995)];
    sync_records(&mut store, &seed, SyncPolicy::InsertOnly, &extras(false)).unwrap();

    // Watching the movie flips seen to true through a full replace.
    let report =
        sync_records(&mut store, &seed, SyncPolicy::ReplaceExisting, &extras(true)).unwrap();
    assert_eq!(report.new_documents(), 0);
    assert_eq!(report.modified, 1);
    assert_eq!(store.get("tt1").unwrap()["seen"], true);
}

#[test]
fn test_new_upsert_counts_in_both_inserted_and_upserted() {
    let mut store = MemoryRemote::new();
    let records = vec![resolved("tt1", "Heat", 1995)];
    let report =
        sync_records(&mut store, &records, SyncPolicy::ReplaceExisting, &extras(true)).unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(report.upserted, 1);
    assert_eq!(report.modified, 0);
}

#[test]
fn test_empty_batch_is_a_noop() {
    let mut store = MemoryRemote::new();
    let report =
        sync_records(&mut store, &[], SyncPolicy::ReplaceExisting, &Map::new()).unwrap();
    assert_eq!(report.records, 0);
    assert_eq!(report.new_documents(), 0);
    assert!(store.is_empty());
}
