use image::codecs::jpeg::JpegEncoder;
use image::error::{ImageError, LimitError, LimitErrorKind};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tracing::debug;

use super::GalleryError;

/// Width of every generated thumbnail, in pixels.
pub const THUMBNAIL_WIDTH: u32 = 128;

/// JPEG quality used for thumbnails. Matches the usual encoder default.
pub const THUMBNAIL_JPEG_QUALITY: u8 = 75;

/// Tallest thumbnail the pass will produce. Sources narrower than 1:16
/// would scale past it and are rejected instead.
pub const MAX_THUMBNAIL_HEIGHT: u32 = 16 * THUMBNAIL_WIDTH;

/// Thumbnail size for a source of `width` x `height`: fixed width, height
/// scaled to keep the aspect ratio (rounded, at least one pixel).
pub fn thumbnail_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width == 0 {
        return (THUMBNAIL_WIDTH, 1);
    }
    let scaled = (THUMBNAIL_WIDTH as f64 * height as f64 / width as f64).round() as u32;
    (THUMBNAIL_WIDTH, scaled.max(1))
}

/// Content type served for a source image, picked from its extension.
/// Unknown extensions fall back to GIF, the format the gallery is built around.
pub fn source_content_type(name: &str) -> mime::Mime {
    match format_hint(name) {
        Some(ImageFormat::Jpeg) => mime::IMAGE_JPEG,
        _ => mime::IMAGE_GIF,
    }
}

fn format_hint(name: &str) -> Option<ImageFormat> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "gif" => Some(ImageFormat::Gif),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

// Decodes a source image, trusting the extension first and sniffing the
// content when the extension is unknown.
fn decode_source(data: &[u8], name: &str) -> Result<DynamicImage, GalleryError> {
    let decoded = match format_hint(name) {
        Some(format) => image::load_from_memory_with_format(data, format),
        None => image::load_from_memory(data),
    };
    decoded.map_err(|source| GalleryError::Image {
        name: name.to_string(),
        source,
    })
}

fn encode_jpeg(img: &DynamicImage, quality: u8, name: &str) -> Result<Vec<u8>, GalleryError> {
    // JPEG has no alpha channel; GIF transparency is flattened.
    let rgb = img.to_rgb8();

    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|source| GalleryError::Image {
            name: name.to_string(),
            source,
        })?;

    Ok(buffer)
}

/// Decodes `data`, downscales it with Lanczos3 to the thumbnail size and
/// returns the JPEG-encoded result.
pub fn make_thumbnail(data: &[u8], name: &str) -> Result<Vec<u8>, GalleryError> {
    let source = decode_source(data, name)?;
    let (width, height) = thumbnail_dimensions(source.width(), source.height());
    if height > MAX_THUMBNAIL_HEIGHT {
        return Err(GalleryError::Image {
            name: name.to_string(),
            source: ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)),
        });
    }

    debug!(
        "Resizing {}: {}x{} -> {}x{}",
        name,
        source.width(),
        source.height(),
        width,
        height
    );

    let resized = source.resize_exact(width, height, FilterType::Lanczos3);
    encode_jpeg(&resized, THUMBNAIL_JPEG_QUALITY, name)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128, 255])
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Gif)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_thumbnail_dimensions_keep_aspect_ratio() {
        assert_eq!(thumbnail_dimensions(256, 128), (128, 64));
        assert_eq!(thumbnail_dimensions(128, 128), (128, 128));
        assert_eq!(thumbnail_dimensions(300, 200), (128, 85));
        assert_eq!(thumbnail_dimensions(64, 100), (128, 200));
        assert_eq!(thumbnail_dimensions(1000, 1), (128, 1));
    }

    #[test]
    fn test_source_content_type() {
        assert_eq!(source_content_type("a.gif"), mime::IMAGE_GIF);
        assert_eq!(source_content_type("a.GIF"), mime::IMAGE_GIF);
        assert_eq!(source_content_type("a.jpg"), mime::IMAGE_JPEG);
        assert_eq!(source_content_type("a.jpeg"), mime::IMAGE_JPEG);
        assert_eq!(source_content_type("notes.txt"), mime::IMAGE_GIF);
        assert_eq!(source_content_type("noext"), mime::IMAGE_GIF);
    }

    #[test]
    fn test_make_thumbnail_from_gif() {
        let data = gif_bytes(300, 200);
        let jpeg = make_thumbnail(&data, "a.gif").unwrap();

        let thumb = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!(thumb.width(), 128);
        assert_eq!(thumb.height(), 85);
    }

    #[test]
    fn test_make_thumbnail_sniffs_unknown_extension() {
        let data = gif_bytes(40, 20);
        let jpeg = make_thumbnail(&data, "mystery").unwrap();

        let thumb = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (128, 64));
    }

    #[test]
    fn test_make_thumbnail_is_deterministic() {
        let data = gif_bytes(200, 150);
        let first = make_thumbnail(&data, "a.gif").unwrap();
        let second = make_thumbnail(&data, "a.gif").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_make_thumbnail_height_limit() {
        // 2x32 scales to exactly the limit.
        let jpeg = make_thumbnail(&gif_bytes(2, 32), "tall.gif").unwrap();
        let thumb = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (128, MAX_THUMBNAIL_HEIGHT));

        // 1x300 would need a 128x38400 buffer.
        let err = make_thumbnail(&gif_bytes(1, 300), "sliver.gif").unwrap_err();
        assert!(matches!(
            err,
            GalleryError::Image {
                ref name,
                source: ImageError::Limits(_),
            } if name == "sliver.gif"
        ));
    }

    #[test]
    fn test_make_thumbnail_rejects_garbage() {
        let err = make_thumbnail(b"definitely not a gif", "bad.gif").unwrap_err();
        assert!(matches!(err, GalleryError::Image { ref name, .. } if name == "bad.gif"));
    }
}
