//! HTTP handlers.
//!
//! Every handler locks the shared table for the whole operation, so requests run one at a time
//! against the backing file.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use medcat_core::{CatalogError, Record, Table, DEFAULT_SUMMARY_LIMIT};
use std::sync::MutexGuard;

use crate::dto::{
    AddMedicationRes, ErrorRes, FrequenciesRes, HealthRes, ImportRes, LimitParams,
    ListMedicationsRes, MedicationDto, SearchParams, SearchRes,
};
use crate::AppState;

pub type ApiError = (StatusCode, Json<ErrorRes>);

/// Maps core failures onto HTTP statuses.
///
/// Recoverable warnings keep their message for the caller; persistence faults are logged and
/// reported as a bare internal error.
fn api_error(err: CatalogError) -> ApiError {
    let status = match &err {
        CatalogError::Validation(_) | CatalogError::MissingColumns(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CatalogError::MissingColumn(_) | CatalogError::ImportParse(_) => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!("catalog operation failed: {:?}", err);
            return internal_error();
        }
    };

    let missing_columns = match &err {
        CatalogError::MissingColumns(columns) => {
            columns.iter().map(|c| c.name().to_string()).collect()
        }
        _ => Vec::new(),
    };

    (
        status,
        Json(ErrorRes {
            error: err.to_string(),
            missing_columns,
        }),
    )
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorRes {
            error: "Internal error".into(),
            missing_columns: Vec::new(),
        }),
    )
}

fn lock_table(state: &AppState) -> Result<MutexGuard<'_, Table>, ApiError> {
    state.table.lock().map_err(|_| {
        tracing::error!("catalog table lock poisoned");
        internal_error()
    })
}

fn to_dtos(table: &Table) -> Vec<MedicationDto> {
    table.iter().map(MedicationDto::from).collect()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Medication catalog is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/medications",
    responses(
        (status = 200, description = "Every medication in file order", body = ListMedicationsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_medications(
    State(state): State<AppState>,
) -> Result<Json<ListMedicationsRes>, ApiError> {
    let table = lock_table(&state)?;
    Ok(Json(ListMedicationsRes {
        medications: to_dtos(&table),
        total: table.len(),
    }))
}

#[utoipa::path(
    get,
    path = "/medications/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching medications", body = SearchRes),
        (status = 400, description = "Unknown column", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn search_medications(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchRes>, ApiError> {
    let term = params.term.unwrap_or_default();
    let table = lock_table(&state)?;
    let found = state
        .catalog
        .search(&table, &params.column, &term)
        .map_err(api_error)?;

    Ok(Json(SearchRes {
        column: params.column,
        term,
        medications: to_dtos(&found),
    }))
}

#[utoipa::path(
    post,
    path = "/medications",
    request_body = MedicationDto,
    responses(
        (status = 201, description = "Medication added", body = AddMedicationRes),
        (status = 422, description = "Medication name is required", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn add_medication(
    State(state): State<AppState>,
    Json(req): Json<MedicationDto>,
) -> Result<(StatusCode, Json<AddMedicationRes>), ApiError> {
    let mut table = lock_table(&state)?;
    state
        .catalog
        .add(&mut table, Record::from(req.clone()))
        .map_err(api_error)?;

    Ok((
        StatusCode::CREATED,
        Json(AddMedicationRes {
            medication: req,
            total_rows: table.len(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/medications/import",
    request_body(content = String, description = "Delimited text with a header row", content_type = "text/csv"),
    responses(
        (status = 200, description = "Rows merged", body = ImportRes),
        (status = 400, description = "Source could not be parsed", body = ErrorRes),
        (status = 422, description = "Source lacks catalog columns", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn import_medications(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportRes>, ApiError> {
    let mut table = lock_table(&state)?;
    let summary = state
        .catalog
        .import_bytes(&mut table, &body)
        .map_err(api_error)?;

    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/stats/reactions",
    params(LimitParams),
    responses(
        (status = 200, description = "Most frequent adverse reactions", body = FrequenciesRes)
    )
)]
#[axum::debug_handler]
pub async fn top_reactions(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<FrequenciesRes>, ApiError> {
    let table = lock_table(&state)?;
    let limit = params.limit.unwrap_or(DEFAULT_SUMMARY_LIMIT);
    let entries = state.catalog.reaction_frequencies(&table, limit);

    Ok(Json(FrequenciesRes {
        entries: entries.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/stats/classes",
    params(LimitParams),
    responses(
        (status = 200, description = "Medications per class", body = FrequenciesRes)
    )
)]
#[axum::debug_handler]
pub async fn class_counts(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<FrequenciesRes>, ApiError> {
    let table = lock_table(&state)?;
    let limit = params.limit.unwrap_or(DEFAULT_SUMMARY_LIMIT);
    let entries = state.catalog.class_counts(&table, limit);

    Ok(Json(FrequenciesRes {
        entries: entries.into_iter().map(Into::into).collect(),
    }))
}
