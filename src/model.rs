//! Record types flowing through the identification pipeline.
//!
//! Three records model the lifecycle of a movie item:
//!
//! 1. [`LocalRecord`]: what the filesystem scanner knows about a movie
//!    directory. No identity yet.
//! 2. [`CanonicalRecord`]: an authoritative catalog entry with a globally
//!    unique id. Immutable once read from the catalog store.
//! 3. [`ResolvedRecord`]: the merge of the two, identified by the canonical
//!    id. This is what gets synced to the remote store.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of a canonical title.
///
/// Only `Movie` participates in tie-breaking; everything else (series
/// episodes, shorts, video games, ...) is carried as `Other` with the
/// catalog's original kind string retained for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TitleKind {
    /// A feature film.
    Movie,
    /// Any non-movie title; holds the catalog's kind string.
    Other(String),
}

impl TitleKind {
    /// The catalog's string form of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Other(kind) => kind,
        }
    }

    /// Whether this is a movie-typed title.
    #[must_use]
    pub fn is_movie(&self) -> bool {
        matches!(self, Self::Movie)
    }
}

impl From<String> for TitleKind {
    fn from(kind: String) -> Self {
        if kind == "movie" {
            Self::Movie
        } else {
            Self::Other(kind)
        }
    }
}

impl From<&str> for TitleKind {
    fn from(kind: &str) -> Self {
        Self::from(kind.to_string())
    }
}

impl From<TitleKind> for String {
    fn from(kind: TitleKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A movie directory as discovered on disk, not yet tied to a canonical id.
///
/// Created per scan, discarded after the merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalRecord {
    /// Title parsed from the directory name
    pub title: String,
    /// Release year parsed from the directory name
    pub start_year: i32,
    /// Video quality tag (e.g. "1080p"); the scanner fills a default
    pub quality: Option<String>,
    /// Absolute path of the movie directory
    pub path: PathBuf,
    /// Earliest access time among the directory's video files
    pub first_watch_time: Option<DateTime<Utc>>,
    /// Languages detected in subtitle files
    pub subtitle_languages: Vec<String>,
}

impl LocalRecord {
    /// Create a record with only the parsed name parts; derived attributes
    /// start empty.
    #[must_use]
    pub fn new(title: impl Into<String>, start_year: i32, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            start_year,
            quality: None,
            path: path.into(),
            first_watch_time: None,
            subtitle_languages: Vec::new(),
        }
    }
}

impl fmt::Display for LocalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.start_year)?;
        if let Some(quality) = &self.quality {
            write!(f, " [{quality}]")?;
        }
        Ok(())
    }
}

/// An authoritative catalog entry.
///
/// Read-only from this crate's perspective: sourced from the catalog store
/// and never mutated. An empty string and a zero `start_year` are the defined
/// empty sentinels for the non-`Option` fields (see [`crate::merge`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Globally unique catalog id, never empty
    pub id: String,
    /// Title kind (movie, episode, short, ...)
    pub kind: TitleKind,
    /// Primary title
    pub title: String,
    /// Original-language title
    pub original_title: String,
    /// Adult-content flag
    pub is_adult: bool,
    /// Release year; 0 when the catalog has none
    pub start_year: i32,
    /// End year for multi-year titles
    pub end_year: Option<i32>,
    /// Runtime in minutes
    pub runtime_minutes: Option<u32>,
    /// Genre labels; replaces, never unions, on merge
    pub genres: Vec<String>,
}

impl fmt::Display for CanonicalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) [{} {}]",
            self.title,
            self.start_year,
            self.kind.as_str(),
            self.id
        )
    }
}

/// A local record merged with its resolved canonical record.
///
/// Invariant: `id` is never empty. Canonical fields take precedence where
/// present; local-only fields (path, quality, watch time, subtitles) always
/// survive from the [`LocalRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    /// Canonical catalog id; the record's identity
    pub id: String,
    /// Title kind from the catalog
    pub kind: TitleKind,
    /// Merged title
    pub title: String,
    /// Original-language title from the catalog
    pub original_title: String,
    /// Adult-content flag from the catalog
    pub is_adult: bool,
    /// Merged release year
    pub start_year: i32,
    /// End year from the catalog
    pub end_year: Option<i32>,
    /// Runtime in minutes from the catalog
    pub runtime_minutes: Option<u32>,
    /// Genres from the catalog
    pub genres: Vec<String>,
    /// Local movie directory, when the record came from a scan
    pub path: Option<PathBuf>,
    /// Local quality tag
    pub quality: Option<String>,
    /// Local first-watch timestamp
    pub first_watch_time: Option<DateTime<Utc>>,
    /// Local subtitle languages
    pub subtitle_languages: Vec<String>,
}

impl ResolvedRecord {
    /// Wrap a bare canonical record, with no local data attached.
    ///
    /// Used when seeding the remote store straight from the catalog.
    #[must_use]
    pub fn from_canonical(canonical: CanonicalRecord) -> Self {
        Self {
            id: canonical.id,
            kind: canonical.kind,
            title: canonical.title,
            original_title: canonical.original_title,
            is_adult: canonical.is_adult,
            start_year: canonical.start_year,
            end_year: canonical.end_year,
            runtime_minutes: canonical.runtime_minutes,
            genres: canonical.genres,
            path: None,
            quality: None,
            first_watch_time: None,
            subtitle_languages: Vec::new(),
        }
    }
}

impl fmt::Display for ResolvedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.start_year)?;
        if let Some(quality) = &self.quality {
            write!(f, " [{quality}]")?;
        }
        Ok(())
    }
}
