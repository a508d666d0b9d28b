//! Identity resolution: map a local record to exactly one canonical record.
//!
//! Ordered algorithm, first success wins:
//!
//! 1. **Cache check**: the sidecar cache is authoritative. A cached id that
//!    no longer resolves in the catalog is a fatal divergence, not a miss.
//! 2. **Fuzzy lookup**: all catalog records matching the normalized title and
//!    start year. One match wins; among several, a single movie-typed
//!    survivor wins (movies are preferred over episodes, games and shorts
//!    sharing a title and year); anything else is ambiguous.
//! 3. **Interactive fallback**: only for lookup failures and only when
//!    enabled. The operator is shown a search URL and types a canonical id
//!    back; declining the confirmation falls through to the step-2 failure.
//!
//! Every success path writes the resolved id back to the sidecar cache.
//! The outcome is a tagged [`Resolution`] state rather than control flow
//! hidden in error handlers.

pub mod prompt;

pub use prompt::{search_url, Prompt, StdinPrompt};

use crate::cache::SidecarCache;
use crate::catalog::CatalogStore;
use crate::error::{ResolveError, StorageError};
use crate::model::{CanonicalRecord, LocalRecord};

/// Knobs for a resolution run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Ask the operator when fuzzy lookup fails.
    pub interactive: bool,
    /// Open the suggested search URL in a browser when prompting.
    pub auto_open_browser: bool,
}

/// How a record was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The sidecar cache already held the canonical id.
    Cached(CanonicalRecord),
    /// Fuzzy lookup narrowed the catalog down to exactly one record.
    FuzzyUnique(CanonicalRecord),
    /// The operator supplied and confirmed the id.
    UserResolved(CanonicalRecord),
}

impl Resolution {
    /// The resolved canonical record, however it was found.
    #[must_use]
    pub fn record(&self) -> &CanonicalRecord {
        match self {
            Self::Cached(r) | Self::FuzzyUnique(r) | Self::UserResolved(r) => r,
        }
    }

    /// Consume the resolution, yielding the canonical record.
    #[must_use]
    pub fn into_record(self) -> CanonicalRecord {
        match self {
            Self::Cached(r) | Self::FuzzyUnique(r) | Self::UserResolved(r) => r,
        }
    }

    /// Whether the cache short-circuited the lookup.
    #[must_use]
    pub fn from_cache(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

/// Resolves local records against the catalog, one item at a time.
pub struct Resolver<'a> {
    catalog: &'a dyn CatalogStore,
    cache: &'a SidecarCache,
    prompt: &'a dyn Prompt,
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl<'a> Resolver<'a> {
    /// Wire a resolver to its collaborators.
    #[must_use]
    pub fn new(
        catalog: &'a dyn CatalogStore,
        cache: &'a SidecarCache,
        prompt: &'a dyn Prompt,
    ) -> Self {
        Self {
            catalog,
            cache,
            prompt,
        }
    }

    /// Resolve one local record to exactly one canonical record.
    pub fn resolve(
        &self,
        local: &LocalRecord,
        opts: &ResolveOptions,
    ) -> Result<Resolution, ResolveError> {
        // Step 1: the cache is authoritative when present.
        if let Some(id) = self.cache.get(&local.path)? {
            let record = self
                .catalog
                .find_by_id(&id)?
                .ok_or_else(|| StorageError::CacheDiverged {
                    id,
                    path: local.path.clone(),
                })?;
            log::debug!("{local}: resolved from sidecar cache as {}", record.id);
            self.cache.put(&local.path, &record.id)?;
            return Ok(Resolution::Cached(record));
        }

        // Step 2: fuzzy lookup with the movie-preference tie-break.
        let fuzzy_failure = match self.fuzzy_lookup(local) {
            Ok(record) => {
                log::debug!("{local}: fuzzy lookup resolved {}", record.id);
                self.cache.put(&local.path, &record.id)?;
                return Ok(Resolution::FuzzyUnique(record));
            }
            Err(err) if opts.interactive && err.is_lookup_failure() => err,
            Err(err) => return Err(err),
        };

        // Step 3: hand the failure to the operator; a declined confirmation
        // falls through to the fuzzy failure.
        match self.ask_operator(local, opts)? {
            Some(record) => {
                self.cache.put(&local.path, &record.id)?;
                Ok(Resolution::UserResolved(record))
            }
            None => Err(fuzzy_failure),
        }
    }

    fn fuzzy_lookup(&self, local: &LocalRecord) -> Result<CanonicalRecord, ResolveError> {
        let mut matches = self
            .catalog
            .find_by_title_year(&local.title, local.start_year)?;

        if matches.is_empty() {
            return Err(ResolveError::NotFound {
                title: local.title.clone(),
                year: local.start_year,
            });
        }
        if matches.len() == 1 {
            return Ok(matches.remove(0));
        }

        let total = matches.len();
        let mut movies: Vec<CanonicalRecord> =
            matches.into_iter().filter(|m| m.kind.is_movie()).collect();
        if movies.len() == 1 {
            return Ok(movies.remove(0));
        }
        Err(ResolveError::AmbiguousMatch {
            title: local.title.clone(),
            year: local.start_year,
            matches: total,
            movie_matches: movies.len(),
        })
    }

    fn ask_operator(
        &self,
        local: &LocalRecord,
        opts: &ResolveOptions,
    ) -> Result<Option<CanonicalRecord>, ResolveError> {
        let url = search_url(local);
        if opts.auto_open_browser {
            if let Err(err) = webbrowser::open(&url) {
                log::warn!("could not open browser for {local}: {err}");
            }
        }

        let suggestion = format!("Please enter the canonical id for {local} (try {url})");
        let id = self
            .prompt
            .ask_for_id(&suggestion)
            .map_err(ResolveError::Prompt)?;
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let Some(record) = self.catalog.find_by_id(id)? else {
            log::warn!("operator-supplied id {id:?} is not in the catalog");
            return Ok(None);
        };

        let confirmed = self
            .prompt
            .confirm(&format!("Got {record}. Correct?"))
            .map_err(ResolveError::Prompt)?;
        Ok(confirmed.then_some(record))
    }
}
