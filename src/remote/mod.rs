//! Reconciliation with the shared remote store.
//!
//! The sync engine turns a batch of resolved records into one unordered bulk
//! upsert, keyed by canonical id, under a caller-selected conflict policy:
//!
//! * [`SyncPolicy::ReplaceExisting`]: local data is authoritative. Existing
//!   remote documents are overwritten wholesale; absent ones are inserted.
//! * [`SyncPolicy::InsertOnly`]: seed-only. Existing remote documents are
//!   left untouched (their provenance flags must never be clobbered); absent
//!   ones are inserted with the full document.
//!
//! The batch is unordered: one malformed operation must not abort its
//! siblings. Connectivity or auth failures abort the whole batch and surface
//! as [`RemoteSyncError`]; retries are a caller concern.

pub mod http;
pub mod memory;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RemoteSyncError;
use crate::model::ResolvedRecord;
use crate::normalize::normalize_title;

/// Conflict policy for a sync batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Full upsert: overwrite existing documents, insert absent ones.
    ReplaceExisting,
    /// Set-on-insert upsert: never touch existing documents.
    InsertOnly,
}

/// Per-operation write mode, the wire-level form of [`SyncPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertMode {
    /// Replace the matched document, or insert.
    Replace,
    /// Insert the document only if the match key is absent.
    SetOnInsert,
}

/// One idempotent write operation, keyed by canonical id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertOp {
    /// Match key: the canonical id.
    pub id: String,
    /// Write mode.
    pub mode: UpsertMode,
    /// Full document to write.
    pub document: Value,
}

/// Aggregate result of one bulk write.
///
/// Every operation here is an upsert, so a document newly created by the
/// batch counts in both `inserted` and `upserted`. `modified` counts
/// pre-existing documents whose content actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    /// Documents newly created by the batch.
    pub inserted: u64,
    /// Documents newly created through an upsert.
    pub upserted: u64,
    /// Pre-existing documents that actually changed.
    pub modified: u64,
}

/// Outcome counts of a sync batch, as reported to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Records submitted in the batch.
    pub records: usize,
    /// Documents newly created.
    pub inserted: u64,
    /// Documents newly created through an upsert.
    pub upserted: u64,
    /// Pre-existing documents actually changed (always 0 under
    /// [`SyncPolicy::InsertOnly`]).
    pub modified: u64,
}

impl SyncReport {
    fn from_outcome(records: usize, outcome: BulkOutcome) -> Self {
        Self {
            records,
            inserted: outcome.inserted,
            upserted: outcome.upserted,
            modified: outcome.modified,
        }
    }

    /// Documents the remote store did not have before this batch.
    #[must_use]
    pub fn new_documents(&self) -> u64 {
        self.inserted.max(self.upserted)
    }
}

/// A remote store accepting unordered bulk upserts.
///
/// Implementations apply all independent, non-conflicting operations even if
/// some individual operations fail, and report aggregate counts. Internal
/// parallelism, if any, is entirely the store's business.
pub trait RemoteStore {
    /// Apply one unordered batch of upsert operations.
    fn bulk_upsert(&mut self, ops: &[UpsertOp]) -> Result<BulkOutcome, RemoteSyncError>;
}

/// Sync a batch of resolved records to the remote store.
///
/// Builds one operation per record, keyed by canonical id, with `extras`
/// (e.g. a `"seen": true` flag) folded into each document, and submits them
/// as a single unordered bulk write.
pub fn sync_records(
    store: &mut dyn RemoteStore,
    records: &[ResolvedRecord],
    policy: SyncPolicy,
    extras: &Map<String, Value>,
) -> Result<SyncReport, RemoteSyncError> {
    let ops: Vec<UpsertOp> = records
        .iter()
        .map(|record| record_to_op(record, policy, extras))
        .collect();
    log::debug!("submitting bulk write of {} operations", ops.len());
    let outcome = store.bulk_upsert(&ops)?;
    Ok(SyncReport::from_outcome(records.len(), outcome))
}

/// Build the remote document for a record: the serialized record plus its
/// normalized title and the caller's extra fields.
fn record_to_op(record: &ResolvedRecord, policy: SyncPolicy, extras: &Map<String, Value>) -> UpsertOp {
    let mut document = match serde_json::to_value(record).expect("records always serialize") {
        Value::Object(map) => map,
        _ => unreachable!("a record serializes to a JSON object"),
    };
    document.insert(
        "normalized_title".to_string(),
        Value::String(normalize_title(&record.title)),
    );
    for (key, value) in extras {
        document.insert(key.clone(), value.clone());
    }

    UpsertOp {
        id: record.id.clone(),
        mode: match policy {
            SyncPolicy::ReplaceExisting => UpsertMode::Replace,
            SyncPolicy::InsertOnly => UpsertMode::SetOnInsert,
        },
        document: Value::Object(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalRecord, ResolvedRecord, TitleKind};

    fn resolved(id: &str, title: &str) -> ResolvedRecord {
        ResolvedRecord::from_canonical(CanonicalRecord {
            id: id.into(),
            kind: TitleKind::Movie,
            title: title.into(),
            original_title: title.into(),
            is_adult: false,
            start_year: 1982,
            end_year: None,
            runtime_minutes: Some(117),
            genres: vec!["Sci-Fi".into()],
        })
    }

    fn extras(seen: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("seen".to_string(), Value::Bool(seen));
        map
    }

    #[test]
    fn test_record_to_op_document_shape() {
        let op = record_to_op(
            &resolved("tt0083658", "Blade Runner"),
            SyncPolicy::ReplaceExisting,
            &extras(true),
        );
        assert_eq!(op.id, "tt0083658");
        assert_eq!(op.mode, UpsertMode::Replace);
        assert_eq!(op.document["title"], "Blade Runner");
        assert_eq!(op.document["normalized_title"], "blade runner");
        assert_eq!(op.document["seen"], true);
    }

    #[test]
    fn test_policy_maps_to_mode() {
        let op = record_to_op(&resolved("tt1", "X"), SyncPolicy::InsertOnly, &Map::new());
        assert_eq!(op.mode, UpsertMode::SetOnInsert);
    }

    #[test]
    fn test_sync_reports_batch_size() {
        let mut store = MemoryRemote::new();
        let records = vec![resolved("tt1", "A"), resolved("tt2", "B")];
        let report =
            sync_records(&mut store, &records, SyncPolicy::ReplaceExisting, &Map::new()).unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.new_documents(), 2);
    }

    #[test]
    fn test_upsert_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&UpsertMode::SetOnInsert).unwrap(),
            "\"set_on_insert\""
        );
        assert_eq!(serde_json::to_string(&UpsertMode::Replace).unwrap(), "\"replace\"");
    }
}
