//! Continuing an interrupted metadata dump.
//!
//! A dump killed mid-write may end in a partial record. That tail is cut off,
//! the ISSN already present become the ignore set, and new records are
//! appended to the same file.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::mapping;
use crate::utils::atomic;

/// Prepares `path` for appending and returns the ISSN it already holds.
///
/// A missing file counts as an empty dump.
pub fn resume_dump(path: &Path) -> Result<HashSet<String>, String> {
    if !path.exists() {
        return Ok(HashSet::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let complete = complete_lines(&content);
    if complete.len() < content.len() {
        tracing::info!(
            "dropping partial last line of {} ({} bytes)",
            path.display(),
            content.len() - complete.len()
        );
        atomic::write_file(path, complete.as_bytes())
            .map_err(|e| format!("Failed to truncate {}: {}", path.display(), e))?;
    }

    let harvested: HashSet<String> = mapping::extract(complete.lines())
        .filter_map(Result::ok)
        .map(|m| m.issn)
        .collect();
    tracing::info!("{} ISSN already harvested in {}", harvested.len(), path.display());
    Ok(harvested)
}

/// Opens `path` for appending, creating it if needed.
pub fn open_append(path: &Path) -> Result<File, String> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))
}

/// Everything up to and including the last newline.
fn complete_lines(content: &str) -> &str {
    match content.rfind('\n') {
        Some(i) => &content[..=i],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIRST: &str = r#"{"@graph":[{"@id":"resource/ISSN/0003-200X#KeyTitle"},{"@id":"resource/ISSN-L/0003-200X"}]}"#;
    const SECOND: &str = r#"{"@graph":[{"@id":"resource/ISSN/1234-5679"}]}"#;

    #[test]
    fn test_complete_lines() {
        assert_eq!(complete_lines("a\nb\n"), "a\nb\n");
        assert_eq!(complete_lines("a\nb"), "a\n");
        assert_eq!(complete_lines("partial"), "");
        assert_eq!(complete_lines(""), "");
    }

    #[test]
    fn test_resume_truncated_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ndj");
        let content = format!(
            "{}\n{}\n{{\"@graph\":[{{\"@id\":\"resource/ISSN/2347-67",
            FIRST, SECOND
        );
        std::fs::write(&path, content).unwrap();

        let harvested = resume_dump(&path).unwrap();

        let expected: HashSet<String> = ["0003-200X".to_string(), "1234-5679".to_string()]
            .into_iter()
            .collect();
        assert_eq!(harvested, expected);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{}\n{}\n", FIRST, SECOND)
        );
    }

    #[test]
    fn test_resume_complete_dump_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ndj");
        let content = format!("{}\n{}\n", FIRST, SECOND);
        std::fs::write(&path, &content).unwrap();

        assert_eq!(resume_dump(&path).unwrap().len(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_resume_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ndj");
        assert!(resume_dump(&path).unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_open_append_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ndj");
        std::fs::write(&path, format!("{}\n", FIRST)).unwrap();

        let mut f = open_append(&path).unwrap();
        writeln!(f, "{}", SECOND).unwrap();
        drop(f);

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{}\n{}\n", FIRST, SECOND)
        );
    }
}
