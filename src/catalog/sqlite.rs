//! SQLite-backed catalog store.

use std::path::Path;

use rusqlite::{params, Connection, Row};

use crate::catalog::CatalogStore;
use crate::error::StorageError;
use crate::model::{CanonicalRecord, TitleKind};
use crate::normalize::normalize_title;

/// Catalog store over a local SQLite mirror.
///
/// The `titles` table carries one row per canonical record with a
/// precomputed `normalized_title` column indexed together with `start_year`,
/// so the fuzzy lookup is a plain indexed equality query.
pub struct SqliteCatalog {
    pub(crate) conn: Connection,
}

impl std::fmt::Debug for SqliteCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCatalog").finish_non_exhaustive()
    }
}

impl SqliteCatalog {
    /// Open the catalog mirror at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open a fresh in-memory catalog with the schema created.
    ///
    /// Backs tests and ad-hoc imports; the on-disk mirror is built by
    /// [`crate::catalog::import`].
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let mut catalog = Self { conn };
        catalog.create_schema()?;
        Ok(catalog)
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CanonicalRecord> {
        let kind: String = row.get("kind")?;
        let genres: Option<String> = row.get("genres")?;
        Ok(CanonicalRecord {
            id: row.get("id")?,
            kind: TitleKind::from(kind),
            title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
            original_title: row
                .get::<_, Option<String>>("original_title")?
                .unwrap_or_default(),
            is_adult: row.get::<_, Option<bool>>("is_adult")?.unwrap_or(false),
            start_year: row.get::<_, Option<i32>>("start_year")?.unwrap_or(0),
            end_year: row.get("end_year")?,
            runtime_minutes: row.get("runtime_minutes")?,
            genres: split_genres(genres.as_deref()),
        })
    }
}

/// The catalog stores genres as one comma-separated column.
fn split_genres(genres: Option<&str>) -> Vec<String> {
    genres
        .map(|g| {
            g.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl CatalogStore for SqliteCatalog {
    fn find_by_title_year(
        &self,
        title: &str,
        start_year: i32,
    ) -> Result<Vec<CanonicalRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM titles WHERE normalized_title = ?1 AND start_year = ?2",
        )?;
        let rows = stmt.query_map(
            params![normalize_title(title), start_year],
            Self::record_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<CanonicalRecord>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT * FROM titles WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], Self::record_from_row)?;
        rows.next().transpose().map_err(StorageError::from)
    }

    fn sample(&self, n: usize) -> Result<Vec<CanonicalRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM titles WHERE id IN (
                 SELECT id FROM titles ORDER BY RANDOM() LIMIT ?1
             )",
        )?;
        let rows = stmt.query_map(params![n as i64], Self::record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, kind: &str, title: &str, year: i32) -> CanonicalRecord {
        CanonicalRecord {
            id: id.into(),
            kind: TitleKind::from(kind),
            title: title.into(),
            original_title: title.into(),
            is_adult: false,
            start_year: year,
            end_year: None,
            runtime_minutes: None,
            genres: vec!["Drama".into()],
        }
    }

    fn seeded_catalog() -> SqliteCatalog {
        let mut catalog = SqliteCatalog::open_in_memory().unwrap();
        catalog
            .insert_records(&[
                record("tt0000001", "movie", "The Matrix", 1999),
                record("tt0000002", "videoGame", "The Matrix", 1999),
                record("tt0000003", "movie", "Heat", 1995),
            ])
            .unwrap();
        catalog
    }

    #[test]
    fn test_find_by_title_year_normalizes_the_query() {
        let catalog = seeded_catalog();
        let matches = catalog.find_by_title_year("the   MATRIX", 1999).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_find_by_title_year_respects_year() {
        let catalog = seeded_catalog();
        assert!(catalog.find_by_title_year("The Matrix", 2003).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_id() {
        let catalog = seeded_catalog();
        let found = catalog.find_by_id("tt0000003").unwrap().unwrap();
        assert_eq!(found.title, "Heat");
        assert_eq!(found.kind, TitleKind::Movie);
        assert_eq!(found.genres, vec!["Drama"]);
        assert!(catalog.find_by_id("tt9999999").unwrap().is_none());
    }

    #[test]
    fn test_sample_bounds() {
        let catalog = seeded_catalog();
        assert_eq!(catalog.sample(2).unwrap().len(), 2);
        // Asking for more than exists returns everything.
        assert_eq!(catalog.sample(50).unwrap().len(), 3);
    }

    #[test]
    fn test_split_genres() {
        assert_eq!(split_genres(Some("Sci-Fi,Thriller")), vec!["Sci-Fi", "Thriller"]);
        assert_eq!(split_genres(Some(" Drama ")), vec!["Drama"]);
        assert!(split_genres(Some("")).is_empty());
        assert!(split_genres(None).is_empty());
    }
}
