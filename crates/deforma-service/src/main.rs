//! Deforma service - one-shot CSV ingest and HTTP API.
//!
//! Run with: `cargo run -p deforma-service`

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use deforma_service::{AppState, Config, api};
use deforma_store::Store;

/// Deforma service - CSV ingest and HTTP query API.
#[derive(Parser, Debug)]
#[command(name = "deforma-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Source CSV path (overrides config).
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deforma_service=info".parse()?)
                .add_directive("deforma_ingest=info".parse()?)
                .add_directive("deforma_store=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(db_path) = args.database {
        config.storage.path = db_path;
    }
    if let Some(csv_path) = args.csv {
        config.ingest.csv = csv_path;
    }
    config.validate()?;

    // Ingestion runs exactly once, gated on the database file not
    // existing yet.
    let load_needed = !config.storage.path.exists();

    info!("Opening database at {:?}", config.storage.path);
    let mut store = Store::open(&config.storage.path)?;

    if load_needed {
        info!("Loading readings from {:?}", config.ingest.csv);
        let report = deforma_ingest::load_csv(&mut store, &config.ingest.csv)?;
        info!(
            "Loaded {} readings ({} rows skipped)",
            report.inserted, report.skipped_rows
        );
    }

    // Create application state
    let state = AppState::new(store, config.clone());

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse()?;

    info!("Starting server on {}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
