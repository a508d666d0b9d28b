//! Movie directory name parsing.
//!
//! Directory names follow the `Title (YYYY) [1080p]` convention; the quality
//! tag is optional. Trailing text after the recognized prefix is ignored.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::DirNameParseError;

/// Name parts parsed out of a movie directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDirName {
    /// Title text before the year
    pub title: String,
    /// Four-digit release year
    pub start_year: i32,
    /// Quality tag, when the name carries one
    pub quality: Option<String>,
}

fn dir_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(?P<title>.*\S)\s+\((?P<start_year>\d{4})\)(?:\s+\[(?P<quality>\d{3,}p)\])?")
            .expect("dir name regex is valid")
    })
}

/// Parse a movie directory name into its parts.
pub fn parse_dir_name(name: &str) -> Result<ParsedDirName, DirNameParseError> {
    let captures = dir_name_regex()
        .captures(name)
        .ok_or_else(|| DirNameParseError {
            name: name.to_string(),
        })?;
    Ok(ParsedDirName {
        title: captures["title"].to_string(),
        start_year: captures["start_year"]
            .parse()
            .expect("four digits always parse"),
        quality: captures.name("quality").map(|m| m.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title_year_quality() {
        let parsed = parse_dir_name("Blade Runner (1982) [1080p]").unwrap();
        assert_eq!(parsed.title, "Blade Runner");
        assert_eq!(parsed.start_year, 1982);
        assert_eq!(parsed.quality.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_parse_without_quality() {
        let parsed = parse_dir_name("Heat (1995)").unwrap();
        assert_eq!(parsed.title, "Heat");
        assert_eq!(parsed.start_year, 1995);
        assert_eq!(parsed.quality, None);
    }

    #[test]
    fn test_parse_title_containing_parentheses() {
        let parsed = parse_dir_name("Shaun of the Dead (UK) (2004)").unwrap();
        assert_eq!(parsed.title, "Shaun of the Dead (UK)");
        assert_eq!(parsed.start_year, 2004);
    }

    #[test]
    fn test_parse_ignores_trailing_text() {
        let parsed = parse_dir_name("Heat (1995) [720p] extended cut").unwrap();
        assert_eq!(parsed.quality.as_deref(), Some("720p"));
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        for name in ["no year here", "Heat 1995", "(1999)", ""] {
            let err = parse_dir_name(name).unwrap_err();
            assert_eq!(err.name, name);
        }
    }

    #[test]
    fn test_parse_requires_four_digit_year() {
        assert!(parse_dir_name("Heat (95)").is_err());
    }
}
