//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the filestore REST API on its own, without loading a `.env` file.
//!
//! ## Intended use
//! Useful in containers where the environment is injected directly. The workspace's main
//! `filestore-run` binary serves the same router after loading `.env`.

use api_rest::{build_app, shutdown_signal, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the filestore REST API server
///
/// # Environment Variables
/// - `FILESTORE_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `FILESTORE_STORAGE_DIR`: Blob directory (default: "storage")
/// - `FILESTORE_METADATA_PATH`: Metadata JSON file (default: "metadata/files.json")
/// - `FILESTORE_API_KEY`: Optional API key for the `/files` routes
/// - `FILESTORE_MAX_UPLOAD_BYTES`: Request body ceiling (default: 25 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the metadata file cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("filestore_files=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;
    let app = build_app(&cfg).await?;

    tracing::info!("-- Starting filestore REST API on {}", cfg.addr);

    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
