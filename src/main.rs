use api_rest::{build_app, shutdown_signal, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the filestore application
///
/// Loads `.env` if present, then serves the REST API (default `0.0.0.0:3000`) until Ctrl-C.
///
/// # Environment Variables
/// - `FILESTORE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `FILESTORE_STORAGE_DIR`: Directory holding the blobs (default: "storage")
/// - `FILESTORE_METADATA_PATH`: Metadata JSON file (default: "metadata/files.json")
/// - `FILESTORE_API_KEY`: API key required on `/files` routes when set
/// - `FILESTORE_MAX_UPLOAD_BYTES`: Upload ceiling in bytes (default: 25 MiB)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or the server itself fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("filestore_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("filestore_files=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;
    tracing::info!("++ Starting filestore REST on {}", cfg.addr);

    let app = build_app(&cfg).await?;
    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("filestore stopped");
    Ok(())
}
