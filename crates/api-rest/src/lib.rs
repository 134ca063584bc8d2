//! # API REST
//!
//! REST presentation layer for the medication catalog.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! All data operations are delegated to `medcat-core`.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use medcat_core::{CatalogService, LoadOutcome, Table};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers.
///
/// The table is loaded once at startup and then mutated in place by add and import requests.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<CatalogService>,
    table: Arc<Mutex<Table>>,
}

impl AppState {
    pub fn new(catalog: CatalogService, table: Table) -> Self {
        Self {
            catalog: Arc::new(catalog),
            table: Arc::new(Mutex::new(table)),
        }
    }

    /// Reads the backing file and wraps the result in shared state.
    pub fn load(catalog: CatalogService) -> Self {
        let outcome = catalog.load();
        match &outcome {
            LoadOutcome::Loaded(table) => tracing::info!(
                "loaded {} medications from {}",
                table.len(),
                catalog.store().path().display()
            ),
            LoadOutcome::Defaulted { reason, .. } => tracing::warn!(
                "starting with an empty catalog ({:?}) at {}",
                reason,
                catalog.store().path().display()
            ),
        }
        Self::new(catalog, outcome.into_table())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_medications,
        handlers::search_medications,
        handlers::add_medication,
        handlers::import_medications,
        handlers::top_reactions,
        handlers::class_counts,
    ),
    components(schemas(
        dto::HealthRes,
        dto::MedicationDto,
        dto::ListMedicationsRes,
        dto::SearchRes,
        dto::AddMedicationRes,
        dto::ImportRes,
        dto::FrequencyDto,
        dto::FrequenciesRes,
        dto::ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/medications",
            get(handlers::list_medications).post(handlers::add_medication),
        )
        .route("/medications/search", get(handlers::search_medications))
        .route("/medications/import", post(handlers::import_medications))
        .route("/stats/reactions", get(handlers::top_reactions))
        .route("/stats/classes", get(handlers::class_counts))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
