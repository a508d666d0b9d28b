//! Filesystem scanner for movie directories.
//!
//! Each configured movies root holds one subdirectory per movie, named
//! `Title (YYYY) [1080p]`. The scanner turns those subdirectories into
//! [`LocalRecord`]s:
//!
//! * name parts from [`dirname`] (quality defaults to 720p);
//! * first-watch time: earliest access time among the video files;
//! * subtitle languages: byte-level sniff of the `.srt` files.
//!
//! A directory whose name does not parse is a per-item error; it never
//! aborts the scan of its siblings.

pub mod dirname;
pub mod subtitles;

pub use dirname::{parse_dir_name, ParsedDirName};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use walkdir::WalkDir;

use crate::error::DirNameParseError;
use crate::model::LocalRecord;

/// Quality assumed when the directory name has no quality tag.
const DEFAULT_QUALITY: &str = "720p";

/// Extensions treated as the movie's video files.
const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi"];

/// Per-item scan failures.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The directory name does not follow the naming convention.
    #[error(transparent)]
    Parse(#[from] DirNameParseError),

    /// Reading the directory or its files failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// List the movie directories directly under a movies root, sorted by name.
pub fn list_movie_dirs(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ScanError::Io {
            path: err.path().unwrap_or(root).to_path_buf(),
            source: err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk error")),
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Collect everything the filesystem knows about one movie directory.
pub fn collect_local_info(movie_dir: &Path) -> Result<LocalRecord, ScanError> {
    let name = movie_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DirNameParseError {
            name: movie_dir.display().to_string(),
        })?;
    let parsed = parse_dir_name(name)?;

    let mut record = LocalRecord::new(parsed.title, parsed.start_year, movie_dir);
    record.quality = parsed.quality.or_else(|| Some(DEFAULT_QUALITY.to_string()));
    record.first_watch_time = first_watch_time(movie_dir)?;
    record.subtitle_languages = subtitle_languages(movie_dir)?;
    Ok(record)
}

/// Scan a movies root into per-item results.
///
/// Listing the root is fatal; everything after that is per item.
pub fn scan_root(root: &Path) -> Result<Vec<Result<LocalRecord, ScanError>>, ScanError> {
    Ok(list_movie_dirs(root)?
        .iter()
        .map(|dir| collect_local_info(dir))
        .collect())
}

/// Files directly inside the movie directory with one of the extensions.
fn find_by_extensions(movie_dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ScanError> {
    let entries = std::fs::read_dir(movie_dir).map_err(|source| ScanError::Io {
        path: movie_dir.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::Io {
            path: movie_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if matches {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Earliest access time among the directory's video files.
fn first_watch_time(movie_dir: &Path) -> Result<Option<DateTime<Utc>>, ScanError> {
    let mut earliest: Option<DateTime<Utc>> = None;
    for path in find_by_extensions(movie_dir, VIDEO_EXTENSIONS)? {
        let metadata = std::fs::metadata(&path).map_err(|source| ScanError::Io {
            path: path.clone(),
            source,
        })?;
        // Not every filesystem records access times; skip those that don't.
        let Ok(accessed) = metadata.accessed() else {
            continue;
        };
        let accessed = DateTime::<Utc>::from(accessed);
        earliest = Some(match earliest {
            Some(current) => current.min(accessed),
            None => accessed,
        });
    }
    Ok(earliest)
}

/// Sorted, deduplicated subtitle languages for the directory's `.srt` files.
fn subtitle_languages(movie_dir: &Path) -> Result<Vec<String>, ScanError> {
    let mut languages = std::collections::BTreeSet::new();
    for path in find_by_extensions(movie_dir, &["srt"])? {
        let detected = subtitles::detect_language(&path).map_err(|source| ScanError::Io {
            path: path.clone(),
            source,
        })?;
        if let Some(language) = detected {
            languages.insert(language.to_string());
        }
    }
    Ok(languages.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_root_mixes_items_and_errors() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("Heat (1995) [1080p]")).unwrap();
        fs::create_dir(root.path().join("not a movie")).unwrap();
        fs::write(root.path().join("loose-file.txt"), "ignored").unwrap();

        let results = scan_root(root.path()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let record = results
            .iter()
            .find_map(|r| r.as_ref().ok())
            .expect("one parsed record");
        assert_eq!(record.title, "Heat");
        assert_eq!(record.quality.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_quality_defaults_when_untagged() {
        let root = tempdir().unwrap();
        let dir = root.path().join("Heat (1995)");
        fs::create_dir(&dir).unwrap();
        let record = collect_local_info(&dir).unwrap();
        assert_eq!(record.quality.as_deref(), Some("720p"));
    }

    #[test]
    fn test_subtitle_languages_are_sorted_and_deduped() {
        let root = tempdir().unwrap();
        let dir = root.path().join("Heat (1995)");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.srt"), "Hello world").unwrap();
        fs::write(dir.join("b.srt"), "More English text").unwrap();
        fs::write(dir.join("c.srt"), "שלום").unwrap();

        let record = collect_local_info(&dir).unwrap();
        assert_eq!(record.subtitle_languages, vec!["English", "Hebrew"]);
    }

    #[test]
    fn test_first_watch_time_uses_earliest_video_atime() {
        let root = tempdir().unwrap();
        let dir = root.path().join("Heat (1995)");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("movie.mkv"), "x").unwrap();
        fs::write(dir.join("extras.mp4"), "x").unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();

        let early = filetime::FileTime::from_unix_time(1_000_000_000, 0);
        let late = filetime::FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_atime(dir.join("movie.mkv"), late).unwrap();
        filetime::set_file_atime(dir.join("extras.mp4"), early).unwrap();

        let record = collect_local_info(&dir).unwrap();
        let watch = record.first_watch_time.expect("video files present");
        assert_eq!(watch.timestamp(), 1_000_000_000);
    }

    #[test]
    fn test_no_video_files_means_no_watch_time() {
        let root = tempdir().unwrap();
        let dir = root.path().join("Heat (1995)");
        fs::create_dir(&dir).unwrap();
        let record = collect_local_info(&dir).unwrap();
        assert!(record.first_watch_time.is_none());
    }
}
