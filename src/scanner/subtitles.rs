//! Subtitle language detection.
//!
//! Subtitle files come in a mix of UTF-8 and legacy Windows codepages, so
//! detection works on a raw byte sample: Hebrew text shows up either as
//! codepoints in the Hebrew block (UTF-8) or as cp1255 high bytes; anything
//! else with ASCII letters is assumed English. Deliberately crude, but it
//! matches what actually lands next to video files.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes examined from the head of each subtitle file.
const SAMPLE_SIZE: usize = 8192;

/// cp1255 maps the Hebrew alphabet to 0xE0..=0xFA.
const CP1255_HEBREW: std::ops::RangeInclusive<u8> = 0xE0..=0xFA;

fn language_of_sample(sample: &[u8]) -> Option<&'static str> {
    if let Ok(text) = std::str::from_utf8(sample) {
        if text.chars().any(|c| ('\u{0590}'..='\u{05FF}').contains(&c)) {
            return Some("Hebrew");
        }
        if text.chars().any(|c| c.is_ascii_alphabetic()) {
            return Some("English");
        }
        return None;
    }

    if sample.iter().any(|b| CP1255_HEBREW.contains(b)) {
        return Some("Hebrew");
    }
    if sample.iter().any(u8::is_ascii_alphabetic) {
        return Some("English");
    }
    None
}

/// Detect the language of one subtitle file from its head bytes.
pub fn detect_language(path: &Path) -> io::Result<Option<&'static str>> {
    let mut sample = vec![0u8; SAMPLE_SIZE];
    let mut file = File::open(path)?;
    let read = file.read(&mut sample)?;
    sample.truncate(read);
    Ok(language_of_sample(&sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_utf8_hebrew() {
        assert_eq!(
            language_of_sample("1\n00:00:01 --> 00:00:02\nשלום עולם\n".as_bytes()),
            Some("Hebrew")
        );
    }

    #[test]
    fn test_cp1255_hebrew() {
        // "שלום" in cp1255.
        let sample = [b'1', b'\n', 0xF9, 0xEC, 0xE5, 0xED, b'\n'];
        assert_eq!(language_of_sample(&sample), Some("Hebrew"));
    }

    #[test]
    fn test_english() {
        assert_eq!(
            language_of_sample(b"1\n00:00:01 --> 00:00:02\nHello world\n"),
            Some("English")
        );
    }

    #[test]
    fn test_digits_only_is_unknown() {
        assert_eq!(language_of_sample(b"1\n00:00:01 --> 00:00:02\n\n"), None);
        assert_eq!(language_of_sample(b""), None);
    }

    #[test]
    fn test_detect_language_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1\n00:00:01,000 --> 00:00:02,000\nHello").unwrap();
        assert_eq!(detect_language(file.path()).unwrap(), Some("English"));
    }
}
