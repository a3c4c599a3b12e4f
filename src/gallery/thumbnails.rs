// Offline thumbnail pass: one `<stem>.jpeg` per source image.
//
// The pass is incremental. A thumbnail that already exists is never
// touched, so re-running only does work for new sources. A source that
// fails to decode or encode is recorded in the report and the pass moves
// on to the next one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{GalleryError, codec, list_images};

/// Name of the thumbnail derived from a source image name: the last
/// extension is replaced with `.jpeg`. Names without an extension (and
/// dot-files like `.hidden`) keep their full name as the stem.
pub fn thumbnail_name(source: &str) -> String {
    let stem = match source.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => source,
    };
    format!("{}.jpeg", stem)
}

#[derive(Debug, Default)]
pub struct ThumbnailReport {
    /// Sources whose thumbnail was written by this run.
    pub generated: Vec<String>,
    /// Sources that already had a thumbnail.
    pub skipped: Vec<String>,
    /// Entries that are not regular files.
    pub ignored: Vec<String>,
    pub failed: Vec<(String, GalleryError)>,
}

impl ThumbnailReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Builds thumbnails for every image in `images_dir` into `thumbs_dir`.
///
/// Only one pass should run against a thumbnail directory at a time. Each
/// thumbnail is written to a temporary file and renamed into place, so a
/// reader never observes a partially written JPEG.
#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    images_dir: PathBuf,
    thumbs_dir: PathBuf,
}

impl ThumbnailGenerator {
    pub fn new(images_dir: impl Into<PathBuf>, thumbs_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            thumbs_dir: thumbs_dir.into(),
        }
    }

    /// Runs the pass. Only failures to list the source directory or to
    /// create the thumbnail directory abort it; per-image failures end up
    /// in [`ThumbnailReport::failed`].
    pub fn run(&self) -> Result<ThumbnailReport, GalleryError> {
        let names = list_images(&self.images_dir)?;
        self.ensure_thumbs_dir()?;

        info!(
            "Generating thumbnails for {} entries from {} into {}",
            names.len(),
            self.images_dir.display(),
            self.thumbs_dir.display()
        );

        let mut report = ThumbnailReport::default();

        for name in names {
            let target = self.thumbs_dir.join(thumbnail_name(&name));
            if target.exists() {
                debug!("Skipping {}: {} exists", name, target.display());
                report.skipped.push(name);
                continue;
            }

            let source = self.images_dir.join(&name);
            match fs::metadata(&source) {
                Ok(metadata) if !metadata.is_file() => {
                    debug!("Ignoring {}: not a regular file", name);
                    report.ignored.push(name);
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    let err = GalleryError::io(&source, e);
                    error!("Failed to generate thumbnail for {}: {}", name, err);
                    report.failed.push((name, err));
                    continue;
                }
            }

            match self.generate_one(&name, &source, &target) {
                Ok(()) => {
                    info!("Generated {}", target.display());
                    report.generated.push(name);
                }
                Err(err) => {
                    error!("Failed to generate thumbnail for {}: {}", name, err);
                    report.failed.push((name, err));
                }
            }
        }

        Ok(report)
    }

    fn ensure_thumbs_dir(&self) -> Result<(), GalleryError> {
        match fs::create_dir(&self.thumbs_dir) {
            Ok(()) => {
                info!("Created thumbnail directory {}", self.thumbs_dir.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && self.thumbs_dir.is_dir() => Ok(()),
            Err(e) => Err(GalleryError::io(&self.thumbs_dir, e)),
        }
    }

    fn generate_one(&self, name: &str, source: &Path, target: &Path) -> Result<(), GalleryError> {
        let data = fs::read(source).map_err(|e| GalleryError::io(source, e))?;
        let jpeg = codec::make_thumbnail(&data, name)?;
        write_into_place(&self.thumbs_dir, target, &jpeg)
    }
}

fn write_into_place(dir: &Path, target: &Path, data: &[u8]) -> Result<(), GalleryError> {
    let temp = dir.join(format!(".{}.tmp", Uuid::new_v4()));

    if let Err(e) = fs::write(&temp, data) {
        let _ = fs::remove_file(&temp);
        return Err(GalleryError::io(&temp, e));
    }

    fs::rename(&temp, target).map_err(|e| {
        let _ = fs::remove_file(&temp);
        GalleryError::io(target, e)
    })
}
