// Error type for the HTTP layer and its conversion into JSON responses.
//
// Every failure is reported as `{"error": "<message>"}`. The status code
// follows the kind of failure instead of always being 200.

use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::io::ErrorKind;

use super::models::ErrorBody;
use crate::gallery::GalleryError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    RequestTimeout(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::RequestTimeout(msg) => (StatusCode::REQUEST_TIMEOUT, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, error_message);
        } else {
            tracing::warn!("Request failed ({}): {}", status, error_message);
        }

        let body = Json(ErrorBody {
            error: error_message,
        });
        (status, body).into_response()
    }
}

impl From<GalleryError> for ApiError {
    fn from(error: GalleryError) -> Self {
        let message = error.to_string();
        match error {
            GalleryError::FileNotFound => Self::BadRequest(message),
            GalleryError::Io { source, .. } if source.kind() == ErrorKind::NotFound => {
                Self::NotFound(message)
            }
            GalleryError::Io { .. } | GalleryError::Image { .. } | GalleryError::Render(_) => {
                Self::InternalServerError(message)
            }
        }
    }
}

// Path segments that axum cannot decode (e.g. invalid UTF-8 after
// percent-decoding) get the same JSON envelope as guard rejections.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let message = rejection.body_text();
        if rejection.status().is_server_error() {
            Self::InternalServerError(message)
        } else {
            Self::BadRequest(message)
        }
    }
}
