//! Atomic file writes: data goes to a temporary file next to the target, which
//! is renamed over the target only once everything has been written and synced.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Permission bits of files written to the cache.
pub const FILE_MODE: u32 = 0o644;

pub fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // The temporary file is removed on drop if any step fails.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    set_mode(&tmp)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(tmp: &NamedTempFile) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(FILE_MODE))
}

#[cfg(not(unix))]
fn set_mode(_tmp: &NamedTempFile) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issnlist.tsv");

        write_file(&path, b"0003-200X").unwrap();
        write_file(&path, b"1234-5679\n2347-6710").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "1234-5679\n2347-6710"
        );
        // Only the target remains, no temporary leftovers.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");
        write_file(&path, b"<sitemapindex/>").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, FILE_MODE);
    }

    #[test]
    fn test_write_file_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sitemap.xml");
        assert!(write_file(&path, b"x").is_err());
    }
}
