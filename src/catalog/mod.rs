//! Canonical title catalog.
//!
//! The catalog is a read-only keyed lookup over canonical records, backed by
//! a local SQLite mirror of a bulk title dump. The pipeline only consumes the
//! [`CatalogStore`] interface:
//!
//! * fuzzy lookup by `(normalized title, start year)`,
//! * direct lookup by canonical id,
//! * random sampling for remote seeding.
//!
//! [`import`] holds the one-time build of the mirror from a TSV dump.

pub mod import;
pub mod sqlite;

pub use sqlite::SqliteCatalog;

use crate::error::StorageError;
use crate::model::CanonicalRecord;

/// Read-only keyed lookup over canonical records.
pub trait CatalogStore {
    /// All records whose normalized title and start year match.
    ///
    /// The store normalizes `title` itself; callers pass the raw local title.
    fn find_by_title_year(
        &self,
        title: &str,
        start_year: i32,
    ) -> Result<Vec<CanonicalRecord>, StorageError>;

    /// The record with the given canonical id, if any.
    fn find_by_id(&self, id: &str) -> Result<Option<CanonicalRecord>, StorageError>;

    /// `n` records drawn at random from the whole catalog.
    fn sample(&self, n: usize) -> Result<Vec<CanonicalRecord>, StorageError>;
}
