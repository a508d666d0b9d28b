//! Per-item resolution cache, persisted as a sidecar file.
//!
//! Each movie directory gets a small JSON sidecar (`.reelsync.json`) holding
//! the canonical id it last resolved to. The cache is append-only from the
//! pipeline's perspective: written once on successful resolution, read on
//! every later attempt, never expired and never re-validated against the
//! catalog (a stale mapping is trusted).
//!
//! Writes are merge-writes: the sidecar may carry auxiliary keys owned by
//! other tooling, and storing an id must preserve them. Single-writer
//! assumption; no cross-process atomicity is attempted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::StorageError;

/// Default sidecar file name, colocated with each movie directory.
pub const SIDECAR_FILE_NAME: &str = ".reelsync.json";

/// Key under which the canonical id is stored inside the sidecar.
const ID_KEY: &str = "id";

/// Sidecar-file resolution cache.
#[derive(Debug, Clone)]
pub struct SidecarCache {
    file_name: String,
}

impl Default for SidecarCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SidecarCache {
    /// Cache using the default sidecar file name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file_name: SIDECAR_FILE_NAME.to_string(),
        }
    }

    /// Cache using a custom sidecar file name.
    #[must_use]
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Path of the sidecar file for a movie directory.
    #[must_use]
    pub fn sidecar_path(&self, movie_dir: &Path) -> PathBuf {
        movie_dir.join(&self.file_name)
    }

    /// Look up the cached canonical id for a movie directory.
    ///
    /// A missing sidecar, or a sidecar without an id key, is `Ok(None)`;
    /// only real I/O or parse failures are errors.
    pub fn get(&self, movie_dir: &Path) -> Result<Option<String>, StorageError> {
        let entries = match self.read_entries(movie_dir)? {
            Some(entries) => entries,
            None => return Ok(None),
        };
        Ok(entries
            .get(ID_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Store the resolved canonical id for a movie directory.
    ///
    /// Merge-write: existing unrelated keys in the sidecar are preserved; a
    /// prior id mapping is overwritten.
    pub fn put(&self, movie_dir: &Path, id: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries(movie_dir)?.unwrap_or_default();
        entries.insert(ID_KEY.to_string(), Value::String(id.to_string()));

        let path = self.sidecar_path(movie_dir);
        let json = serde_json::to_string_pretty(&Value::Object(entries))
            .expect("JSON maps always serialize");
        fs::write(&path, json).map_err(|source| StorageError::Io { path, source })
    }

    fn read_entries(&self, movie_dir: &Path) -> Result<Option<Map<String, Value>>, StorageError> {
        let path = self.sidecar_path(movie_dir);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(Some(entries)),
            Ok(other) => Err(StorageError::Corrupt {
                path,
                message: format!("expected a JSON object, got {other}"),
            }),
            Err(err) => Err(StorageError::Corrupt {
                path,
                message: err.to_string(),
            }),
        }
    }
}
