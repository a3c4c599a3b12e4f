// Gallery core: path validation, directory listing, page rendering and
// the offline thumbnail pass. Nothing in here knows about HTTP.

mod codec;
mod listing;
mod page;
mod path_guard;
mod thumbnails;

pub use codec::{THUMBNAIL_WIDTH, source_content_type};
pub use listing::list_images;
pub use page::PageRenderer;
pub use path_guard::ImageName;
pub use thumbnails::ThumbnailGenerator;

#[cfg(test)]
pub(crate) use codec::tests::gif_bytes;

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    /// The requested name was rejected by the path guard.
    #[error("file not found")]
    FileNotFound,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}: {source}")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to render page: {0}")]
    Render(String),
}

impl GalleryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GalleryError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Directory layout and page renderer shared by every request handler.
#[derive(Debug)]
pub struct Gallery {
    images_dir: PathBuf,
    thumbs_dir: PathBuf,
    renderer: PageRenderer,
}

impl Gallery {
    pub fn new(
        images_dir: impl Into<PathBuf>,
        thumbs_dir: impl Into<PathBuf>,
        renderer: PageRenderer,
    ) -> Self {
        Self {
            images_dir: images_dir.into(),
            thumbs_dir: thumbs_dir.into(),
            renderer,
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn thumbs_dir(&self) -> &Path {
        &self.thumbs_dir
    }

    pub fn thumbnails_enabled(&self) -> bool {
        self.renderer.thumbnails_enabled()
    }

    /// Lists the source directory and renders the index page from it.
    pub fn render_index(&self) -> Result<String, GalleryError> {
        let images = list_images(&self.images_dir)?;
        tracing::debug!("Rendering index page with {} image(s).", images.len());
        self.renderer.render(&images)
    }
}
