// Main entry point for gallery-server.
// Parses the configuration, sets up logging and runs one of three modes:
// fetch a URL, generate thumbnails, or serve the gallery over HTTP.

mod fetch;
mod gallery;
mod shutdown_signal;
mod web;

use clap::Parser;
use gallery::{Gallery, PageRenderer, ThumbnailGenerator};
use shutdown_signal::shutdown_signal;
use std::{path::PathBuf, sync::Arc};
use tracing::Level;

/// Command line arguments for gallery-server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "GALLERY_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "GALLERY_PORT", default_value_t = 8080)]
    port: u16,

    /// Directory containing the source images.
    #[arg(long, env = "GALLERY_IMAGES_DIR", default_value = "imgs")]
    images_dir: PathBuf,

    /// Directory holding generated thumbnails. Created by --thumb if missing.
    #[arg(long, env = "GALLERY_THUMBS_DIR", default_value = "thumbs")]
    thumbs_dir: PathBuf,

    /// Generate missing thumbnails and exit instead of serving.
    #[arg(long, env = "GALLERY_THUMB", action = clap::ArgAction::SetTrue)]
    thumb: bool,

    /// Serve the gallery without the thumbnail grid and thumbnail routes.
    #[arg(long, env = "GALLERY_DISABLE_THUMBNAILS", action = clap::ArgAction::SetTrue)]
    disable_thumbnails: bool,

    /// Fetch the given URL, print its body and exit.
    #[arg(long, env = "GALLERY_FETCH", value_name = "URL")]
    fetch: Option<String>,

    /// Enable debug logging.
    #[arg(short, long, env = "GALLERY_VERBOSE", action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let config = AppConfig::parse();

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    if let Some(url) = &config.fetch {
        if let Err(e) = fetch::fetch_to_stdout(url).await {
            tracing::error!("Failed to fetch {}: {}", url, e);
            eprintln!("ERROR: Could not fetch {}. Error: {}", url, e);
            std::process::exit(1);
        }
        return;
    }

    if config.thumb {
        generate_thumbnails(&config).await;
        return;
    }

    serve(config).await;
}

async fn generate_thumbnails(config: &AppConfig) {
    tracing::info!(
        "Generating {}px wide thumbnails from {} into {}",
        gallery::THUMBNAIL_WIDTH,
        config.images_dir.display(),
        config.thumbs_dir.display()
    );

    let generator = ThumbnailGenerator::new(&config.images_dir, &config.thumbs_dir);
    let result = tokio::task::spawn_blocking(move || generator.run()).await;

    let report = match result {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            tracing::error!("FATAL: Thumbnail generation failed: {}", e);
            eprintln!("FATAL: Thumbnail generation failed. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("FATAL: Thumbnail task failed: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Thumbnails: {} generated, {} already present, {} ignored, {} failed",
        report.generated.len(),
        report.skipped.len(),
        report.ignored.len(),
        report.failed.len()
    );

    if report.has_failures() {
        for (name, err) in &report.failed {
            tracing::error!("  - {}: {}", name, err);
        }
        std::process::exit(1);
    }
}

async fn serve(config: AppConfig) {
    tracing::info!("Starting gallery-server...");
    tracing::info!("Serving images from {}", config.images_dir.display());

    let renderer = PageRenderer::new(!config.disable_thumbnails);
    if renderer.thumbnails_enabled() {
        tracing::info!("Serving thumbnails from {}", config.thumbs_dir.display());
    } else {
        tracing::info!("Thumbnails disabled");
    }

    let gallery = Arc::new(Gallery::new(
        config.images_dir,
        config.thumbs_dir,
        renderer,
    ));
    let app = web::create_app(gallery);

    let listener = match web::create_listener(&config.host, config.port).await {
        Ok((addr, l)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", e);
    }

    tracing::info!("gallery-server has shut down.");
}
