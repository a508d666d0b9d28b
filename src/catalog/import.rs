//! One-time build of the local catalog mirror from a bulk TSV dump.
//!
//! The dump is the standard tab-separated title export (`\N` for null).
//! Rows are inserted in batches inside transactions; the lookup indexes are
//! created afterwards so the bulk load stays fast. Downloading and
//! decompressing the dump is left to external tooling.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rusqlite::params;
use thiserror::Error;

use crate::catalog::SqliteCatalog;
use crate::error::StorageError;
use crate::model::CanonicalRecord;
use crate::normalize::normalize_title;

/// Rows per insert transaction during the bulk load.
const BATCH_SIZE: usize = 1 << 15;

/// Errors from the catalog import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Could not read the dump file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Dump path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The dump header is missing an expected column.
    #[error("dump header is missing column {0:?}")]
    MissingColumn(&'static str),

    /// Writing to the mirror failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Catalog(err))
    }
}

/// Column layout of the dump, resolved from its header line.
struct DumpColumns {
    id: usize,
    kind: usize,
    title: usize,
    original_title: usize,
    is_adult: usize,
    start_year: usize,
    end_year: usize,
    runtime_minutes: usize,
    genres: usize,
}

impl DumpColumns {
    fn from_header(header: &str) -> Result<Self, ImportError> {
        let names: Vec<&str> = header.trim_end().split('\t').collect();
        let position = |name: &'static str| {
            names
                .iter()
                .position(|n| *n == name)
                .ok_or(ImportError::MissingColumn(name))
        };
        Ok(Self {
            id: position("tconst")?,
            kind: position("titleType")?,
            title: position("primaryTitle")?,
            original_title: position("originalTitle")?,
            is_adult: position("isAdult")?,
            start_year: position("startYear")?,
            end_year: position("endYear")?,
            runtime_minutes: position("runtimeMinutes")?,
            genres: position("genres")?,
        })
    }
}

/// `\N` marks a null field in the dump.
fn field<'a>(fields: &[&'a str], index: usize) -> Option<&'a str> {
    fields.get(index).copied().filter(|f| *f != "\\N")
}

impl SqliteCatalog {
    /// (Re)create the `titles` table, dropping any previous mirror.
    pub fn create_schema(&mut self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "DROP TABLE IF EXISTS titles;
             CREATE TABLE titles(
                 id              TEXT PRIMARY KEY,
                 kind            TEXT,
                 title           TEXT,
                 original_title  TEXT,
                 is_adult        BOOLEAN,
                 start_year      INT,
                 end_year        INT,
                 runtime_minutes INT,
                 genres          TEXT,
                 normalized_title TEXT
             );",
        )?;
        Ok(())
    }

    /// Create the lookup indexes. Run once, after the bulk load.
    pub fn finalize_schema(&mut self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_normalized_title_start_year
                 ON titles(normalized_title, start_year);
             CREATE INDEX IF NOT EXISTS idx_start_year ON titles(start_year);",
        )?;
        Ok(())
    }

    /// Insert canonical records into the mirror in one transaction.
    ///
    /// The `normalized_title` column is computed here so lookups and inserts
    /// can never disagree about the comparison key.
    pub fn insert_records(&mut self, records: &[CanonicalRecord]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO titles(
                     id, kind, title, original_title, is_adult,
                     start_year, end_year, runtime_minutes, genres, normalized_title
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.id,
                    record.kind.as_str(),
                    record.title,
                    record.original_title,
                    record.is_adult,
                    record.start_year,
                    record.end_year,
                    record.runtime_minutes,
                    record.genres.join(","),
                    normalize_title(&record.title),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Build the mirror from a TSV dump file.
    ///
    /// Recreates the schema, streams the rows in, then creates indexes.
    /// Returns the number of imported rows.
    pub fn import_tsv_file(&mut self, dump_path: &Path) -> Result<usize, ImportError> {
        let file = File::open(dump_path).map_err(|source| ImportError::Io {
            path: dump_path.to_path_buf(),
            source,
        })?;
        let count = self.import_tsv(BufReader::new(file), dump_path)?;
        self.finalize_schema()?;
        Ok(count)
    }

    /// Stream a TSV dump into the mirror. The first line must be the header.
    pub fn import_tsv(
        &mut self,
        reader: impl BufRead,
        dump_path: &Path,
    ) -> Result<usize, ImportError> {
        self.create_schema()?;

        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line.map_err(|source| ImportError::Io {
                path: dump_path.to_path_buf(),
                source,
            })?,
            None => return Ok(0),
        };
        let columns = DumpColumns::from_header(&header)?;

        let mut batch: Vec<CanonicalRecord> = Vec::with_capacity(BATCH_SIZE);
        let mut imported = 0usize;
        for line in lines {
            let line = line.map_err(|source| ImportError::Io {
                path: dump_path.to_path_buf(),
                source,
            })?;
            let fields: Vec<&str> = line.trim_end_matches('\n').split('\t').collect();
            let Some(record) = row_to_record(&columns, &fields) else {
                log::debug!("skipping malformed dump row: {line:?}");
                continue;
            };
            batch.push(record);

            if batch.len() == BATCH_SIZE {
                self.insert_records(&batch)?;
                imported += batch.len();
                batch.clear();
                log::info!("imported {imported} titles...");
            }
        }
        if !batch.is_empty() {
            self.insert_records(&batch)?;
            imported += batch.len();
        }
        log::info!("imported {imported} titles from {}", dump_path.display());
        Ok(imported)
    }
}

fn row_to_record(columns: &DumpColumns, fields: &[&str]) -> Option<CanonicalRecord> {
    let id = field(fields, columns.id)?;
    Some(CanonicalRecord {
        id: id.to_string(),
        kind: field(fields, columns.kind).unwrap_or("movie").into(),
        title: field(fields, columns.title).unwrap_or_default().to_string(),
        original_title: field(fields, columns.original_title)
            .unwrap_or_default()
            .to_string(),
        is_adult: field(fields, columns.is_adult) == Some("1"),
        start_year: field(fields, columns.start_year)
            .and_then(|y| y.parse().ok())
            .unwrap_or(0),
        end_year: field(fields, columns.end_year).and_then(|y| y.parse().ok()),
        runtime_minutes: field(fields, columns.runtime_minutes).and_then(|m| m.parse().ok()),
        genres: field(fields, columns.genres)
            .map(|g| g.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
    })
}
