use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use medcat_core::{CatalogService, CoreConfig, config::resolve_catalog_file};

/// Main entry point for the medication catalog
///
/// Resolves configuration once, loads the catalog table and serves the REST API with its
/// Swagger UI.
///
/// # Environment Variables
/// - `MEDCAT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDCAT_CATALOG_FILE`: Backing catalog file (default: `medicamentos_completos_com_bromazepam.csv`)
///
/// Variables may also come from a `.env` file in the working directory.
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server itself fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medcat=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("MEDCAT_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;
    let catalog_file =
        resolve_catalog_file(std::env::var("MEDCAT_CATALOG_FILE").ok().map(PathBuf::from));

    tracing::info!("++ Catalog file {}", catalog_file.display());
    tracing::info!("++ Starting medication catalog REST on {}", rest_addr);

    let catalog = CatalogService::new(Arc::new(CoreConfig::new(catalog_file)?));

    let app = router(AppState::load(catalog));
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
