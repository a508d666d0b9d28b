//! Error taxonomy and process exit codes.
//!
//! Library errors are typed per failure domain:
//!
//! * [`StorageError`]: sidecar-cache or catalog I/O, including the fatal
//!   cache/catalog divergence case.
//! * [`ResolveError`]: identity resolution outcomes that are not successes.
//! * [`RemoteSyncError`]: remote store connectivity, auth, or batch rejection.
//! * [`DirNameParseError`]: a movie directory name the scanner cannot parse.
//!
//! Resolution and parse failures are per-item: the batch continues and the
//! caller decides whether to skip or halt. Remote sync failures abort the
//! whole batch.

use std::path::PathBuf;

use thiserror::Error;

/// Exit codes for the ReelSync application.
///
/// - 0: Success (all items processed)
/// - 1: General error (unexpected failure)
/// - 3: Partial success (completed, but some items were skipped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: every item resolved and synced.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Partial success: completed, but some items could not be resolved.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "RS000",
            Self::GeneralError => "RS001",
            Self::PartialSuccess => "RS003",
        }
    }
}

/// Errors from the sidecar cache or the catalog store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing a sidecar file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A sidecar file exists but does not hold valid JSON.
    #[error("malformed sidecar cache at {path}: {message}")]
    Corrupt {
        /// Path to the sidecar file
        path: PathBuf,
        /// Parser error message
        message: String,
    },

    /// The catalog database failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] rusqlite::Error),

    /// A cached canonical id no longer resolves in the catalog.
    ///
    /// The cache and the catalog have diverged; this is treated as data
    /// corruption and is fatal for the item, never silently recovered.
    #[error("cached id {id:?} for {path} no longer resolves in the catalog")]
    CacheDiverged {
        /// The cached canonical id
        id: String,
        /// The movie directory whose sidecar holds the id
        path: PathBuf,
    },
}

/// Identity resolution failures.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The fuzzy lookup found no catalog entry for the title and year.
    #[error("no catalog match for {title} ({year})")]
    NotFound {
        /// Local title as scanned
        title: String,
        /// Start year parsed from the directory name
        year: i32,
    },

    /// The fuzzy lookup could not narrow the matches down to one record.
    #[error("{matches} matches ({movie_matches} movies) for {title} ({year})")]
    AmbiguousMatch {
        /// Local title as scanned
        title: String,
        /// Start year parsed from the directory name
        year: i32,
        /// Total records sharing the normalized title and year
        matches: usize,
        /// How many of those are movie-typed
        movie_matches: usize,
    },

    /// The cache or the catalog failed underneath the resolver.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The interactive operator prompt failed at the terminal level.
    #[error("operator prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

impl ResolveError {
    /// Whether this is a lookup miss that the interactive fallback may fix.
    ///
    /// Storage and prompt failures are infrastructure problems and are never
    /// handed to the operator.
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AmbiguousMatch { .. })
    }
}

/// Remote store failures. Always batch-fatal; no partial retry is attempted.
#[derive(Error, Debug)]
pub enum RemoteSyncError {
    /// Could not reach the remote store (connectivity, TLS, DNS).
    #[error("remote store connection failed: {0}")]
    Transport(String),

    /// The remote store answered with a non-success status.
    #[error("remote store rejected the batch: HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The remote store answered 2xx but the body was not a bulk outcome.
    #[error("malformed remote response: {0}")]
    InvalidResponse(String),
}

/// A movie directory name that does not match the expected
/// `Title (YYYY) [1080p]` shape.
///
/// Surfaced per item; never fatal to a batch scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not parse movie directory name {name:?}")]
pub struct DirNameParseError {
    /// The offending directory name
    pub name: String,
}
