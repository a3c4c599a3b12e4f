use std::fs;
use std::path::Path;
use tracing::warn;

use super::GalleryError;

/// Returns the names of all direct entries of `dir`, sorted ascending.
///
/// Subdirectories and non-image files are listed like any other entry.
/// Names that are not valid UTF-8 are skipped with a warning, since they
/// could not be requested back through a URL.
pub fn list_images(dir: &Path) -> Result<Vec<String>, GalleryError> {
    let entries = fs::read_dir(dir).map_err(|e| GalleryError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GalleryError::io(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Skipping non-UTF-8 entry {:?} in {}", raw, dir.display()),
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_listing_is_sorted() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.gif", "a.gif", "B.gif", "b.gif", "10.gif", "2.gif"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }

        let names = list_images(tmp.path()).unwrap();
        assert_eq!(
            names,
            vec!["10.gif", "2.gif", "B.gif", "a.gif", "b.gif", "c.gif"]
        );
    }

    #[test]
    fn test_listing_matches_direct_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.gif"), b"x").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("deep.gif"), b"x").unwrap();

        let names = list_images(tmp.path()).unwrap();
        let listed: HashSet<_> = names.iter().map(String::as_str).collect();
        let expected: HashSet<_> = ["a.gif", "notes.txt", "nested"].into_iter().collect();
        assert_eq!(listed, expected);

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.gif"), b"x").unwrap();
        fs::write(tmp.path().join(OsStr::from_bytes(b"bad\xff.gif")), b"x").unwrap();

        assert_eq!(list_images(tmp.path()).unwrap(), vec!["a.gif"]);
    }

    #[test]
    fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(list_images(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("imgs");

        let err = list_images(&missing).unwrap_err();
        match &err {
            GalleryError::Io { path, source } => {
                assert_eq!(path, &missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("imgs"));
    }
}
