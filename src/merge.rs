//! Field-precedence merge of a local record with its canonical record.
//!
//! Precedence rule: a canonical field overwrites the local value only when it
//! is *present*. Presence is an explicit per-field check, not a language
//! truthiness rule:
//!
//! * strings: present when non-empty (empty string is the defined empty
//!   sentinel);
//! * `start_year`: present when non-zero (zero is the defined empty sentinel,
//!   matching the catalog's "no year" encoding);
//! * `Option` fields (`end_year`, `runtime_minutes`): present when `Some`, so
//!   a legitimate `Some(0)` runtime does override;
//! * genre lists: replace wholesale, never union.
//!
//! Local-only fields (path, quality, first-watch time, subtitle languages)
//! have no canonical counterpart and always survive unchanged.

use crate::model::{CanonicalRecord, LocalRecord, ResolvedRecord};

/// Merge a local record with the canonical record it resolved to.
///
/// Deterministic and total; the result's identity is the canonical id.
#[must_use]
pub fn merge(local: &LocalRecord, canonical: &CanonicalRecord) -> ResolvedRecord {
    ResolvedRecord {
        id: canonical.id.clone(),
        kind: canonical.kind.clone(),
        title: prefer_nonempty(&canonical.title, &local.title),
        original_title: canonical.original_title.clone(),
        is_adult: canonical.is_adult,
        start_year: if canonical.start_year != 0 {
            canonical.start_year
        } else {
            local.start_year
        },
        end_year: canonical.end_year,
        runtime_minutes: canonical.runtime_minutes,
        genres: canonical.genres.clone(),
        path: Some(local.path.clone()),
        quality: local.quality.clone(),
        first_watch_time: local.first_watch_time,
        subtitle_languages: local.subtitle_languages.clone(),
    }
}

fn prefer_nonempty(canonical: &str, local: &str) -> String {
    if canonical.is_empty() {
        local.to_string()
    } else {
        canonical.to_string()
    }
}
