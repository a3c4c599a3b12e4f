use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::GalleryError;

/// A bare file name taken from a request, safe to join onto a base directory.
///
/// Construction goes through [`ImageName::parse`], which keeps only the last
/// path segment of the input. The result never contains a separator and is
/// never `..`, so joining it onto a directory cannot leave that directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName(String);

impl ImageName {
    pub fn parse(raw: &str) -> Result<Self, GalleryError> {
        let base = base_name(raw);

        if matches!(base.as_str(), ".." | "." | "/") {
            warn!("Rejected file name {:?} (resolves to {:?})", raw, base);
            return Err(GalleryError::FileNotFound);
        }

        if base != raw {
            warn!("Collapsed file name {:?} to {:?}", raw, base);
        }

        Ok(ImageName(base))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn resolve_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.0)
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Last element of a slash-separated path. Backslashes count as separators
// too. Empty input yields ".", input made only of separators yields "/".
fn base_name(raw: &str) -> String {
    if raw.is_empty() {
        return ".".to_string();
    }

    let normalized = raw.replace('\\', "/");
    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.rsplit_once('/') {
        Some((_, last)) => last.to_string(),
        None => trimmed.to_string(),
    }
}
