//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, without reading a `.env` file. The workspace's main
//! `medcat-run` binary serves the same router.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medcat_core::{config::resolve_catalog_file, CatalogService, CoreConfig};

/// Main entry point for the REST API server
///
/// # Environment Variables
/// - `MEDCAT_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MEDCAT_CATALOG_FILE`: Backing catalog file (default: `medicamentos_completos_com_bromazepam.csv`)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the catalog file path is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("medcat_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDCAT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let catalog_file =
        resolve_catalog_file(std::env::var("MEDCAT_CATALOG_FILE").ok().map(PathBuf::from));
    let cfg = Arc::new(CoreConfig::new(catalog_file)?);

    tracing::info!("-- Starting medication catalog REST API on {}", addr);

    let app = router(AppState::load(CatalogService::new(cfg)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
