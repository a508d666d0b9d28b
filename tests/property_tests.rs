//! Property-based tests for the pure pipeline pieces.

use proptest::prelude::*;

use reelsync::merge::merge;
use reelsync::model::{CanonicalRecord, LocalRecord, TitleKind};
use reelsync::normalize::normalize_title;

proptest! {
    #[test]
    fn test_normalize_is_idempotent(title in "\\PC*") {
        let once = normalize_title(&title);
        let twice = normalize_title(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_output_has_no_banned_characters(title in "\\PC*") {
        let normalized = normalize_title(&title);
        for banned in ['\\', '/', ':', '*', '?', '"', '<', '>', ',', '|', '-', '\'', '\u{00B7}'] {
            prop_assert!(!normalized.contains(banned));
        }
        prop_assert!(!normalized.contains("  "));
        prop_assert_eq!(normalized.trim(), &normalized);
    }

    #[test]
    fn test_normalize_is_case_insensitive(title in "[a-zA-Z0-9 ]{0,40}") {
        prop_assert_eq!(
            normalize_title(&title.to_uppercase()),
            normalize_title(&title.to_lowercase())
        );
    }

    #[test]
    fn test_merge_is_deterministic(
        title in "[a-zA-Z ]{1,20}",
        year in 1900i32..2100,
        runtime in proptest::option::of(1u32..500),
    ) {
        let local = LocalRecord::new(title.clone(), year, "/movies/x");
        let canonical = CanonicalRecord {
            id: "tt1".into(),
            kind: TitleKind::Movie,
            title,
            original_title: String::new(),
            is_adult: false,
            start_year: year,
            end_year: None,
            runtime_minutes: runtime,
            genres: vec![],
        };
        let a = merge(&local, &canonical);
        let b = merge(&local, &canonical);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_merge_keeps_the_canonical_id(id in "tt[0-9]{1,8}") {
        let local = LocalRecord::new("Heat", 1995, "/movies/heat");
        let canonical = CanonicalRecord {
            id: id.clone(),
            kind: TitleKind::Movie,
            title: "Heat".into(),
            original_title: "Heat".into(),
            is_adult: false,
            start_year: 1995,
            end_year: None,
            runtime_minutes: None,
            genres: vec![],
        };
        prop_assert_eq!(merge(&local, &canonical).id, id);
    }
}
