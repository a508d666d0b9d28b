//! In-process remote store.
//!
//! Implements the exact bulk-upsert semantics of the remote interface over a
//! plain document map. Backs the test suite and `--dry-run` syncs.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::RemoteSyncError;
use crate::remote::{BulkOutcome, RemoteStore, UpsertMode, UpsertOp};

/// Remote store over an in-memory document map, keyed by canonical id.
#[derive(Debug, Default, Clone)]
pub struct MemoryRemote {
    documents: BTreeMap<String, Value>,
}

impl MemoryRemote {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored document for an id, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.documents.get(id)
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl RemoteStore for MemoryRemote {
    fn bulk_upsert(&mut self, ops: &[UpsertOp]) -> Result<BulkOutcome, RemoteSyncError> {
        let mut outcome = BulkOutcome::default();
        for op in ops {
            // Unordered batch: a malformed operation is dropped, its
            // siblings still apply.
            if op.id.is_empty() {
                log::warn!("dropping bulk operation with an empty match key");
                continue;
            }
            match self.documents.get(&op.id) {
                None => {
                    self.documents.insert(op.id.clone(), op.document.clone());
                    outcome.inserted += 1;
                    outcome.upserted += 1;
                }
                Some(existing) => match op.mode {
                    UpsertMode::SetOnInsert => {}
                    UpsertMode::Replace => {
                        if existing != &op.document {
                            self.documents.insert(op.id.clone(), op.document.clone());
                            outcome.modified += 1;
                        }
                    }
                },
            }
        }
        Ok(outcome)
    }
}
