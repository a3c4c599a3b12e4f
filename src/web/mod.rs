// HTTP front end for the gallery: router, handlers, JSON errors and
// listener setup.

mod app;
mod error;
mod handlers;
mod listeners;
mod models;

pub use app::create_app;
pub use listeners::create_listener;

use crate::gallery::Gallery;
use std::sync::Arc;
use std::time::Duration;

/// Requests taking longer than this are aborted.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub type SharedGallery = Arc<Gallery>;
