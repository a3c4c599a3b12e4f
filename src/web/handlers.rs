// Route handlers for the gallery page and the two raw image routes, plus
// the request timeout middleware.

use axum::{
    extract::{Path, Request, State, rejection::PathRejection},
    http::header,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use std::time::Duration;
use tracing::debug;

use super::{SharedGallery, error::ApiError};
use crate::gallery::{self, GalleryError, ImageName};

// --- GET / ---
// Lists the source directory and renders the gallery page.
pub async fn index(State(gallery): State<SharedGallery>) -> Result<Html<String>, ApiError> {
    let page = tokio::task::spawn_blocking(move || gallery.render_index())
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Index task failed: {}", e)))??;

    Ok(Html(page))
}

// --- GET /images/{name} ---
pub async fn get_image(
    State(gallery): State<SharedGallery>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(name) = path?;
    let name = ImageName::parse(&name)?;
    let data = read_file(&name.resolve_in(gallery.images_dir())).await?;

    debug!("Serving image {} ({} bytes)", name, data.len());
    Ok(raw_image(data, gallery::source_content_type(name.as_str())))
}

// --- GET /thumbnails/{name} ---
pub async fn get_thumbnail(
    State(gallery): State<SharedGallery>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(name) = path?;
    let name = ImageName::parse(&name)?;
    let data = read_file(&name.resolve_in(gallery.thumbs_dir())).await?;

    debug!("Serving thumbnail {} ({} bytes)", name, data.len());
    Ok(raw_image(data, mime::IMAGE_JPEG))
}

// Aborts handlers that run past `limit` with a JSON 408.
pub async fn enforce_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::RequestTimeout(format!(
            "request timed out after {}s",
            limit.as_secs_f64()
        ))
        .into_response(),
    }
}

async fn read_file(path: &std::path::Path) -> Result<Vec<u8>, GalleryError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| GalleryError::io(path, e))
}

fn raw_image(data: Vec<u8>, content_type: mime::Mime) -> Response {
    ([(header::CONTENT_TYPE, content_type.to_string())], data).into_response()
}
