use super::{REQUEST_TIMEOUT, SharedGallery, handlers};
use axum::{Router, middleware, routing::get};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::Level;

pub fn create_app(gallery: SharedGallery) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/images/{name}", get(handlers::get_image));

    if gallery.thumbnails_enabled() {
        router = router
            .route("/thumbnails/{name}", get(handlers::get_thumbnail))
            // Path used by older gallery pages
            .route("/thumbs/{name}", get(handlers::get_thumbnail));
    }

    router
        .layer(middleware::from_fn_with_state(
            REQUEST_TIMEOUT,
            handlers::enforce_timeout,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        .with_state(gallery)
}
