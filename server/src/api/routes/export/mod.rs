//! Inventory CSV export endpoints

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::api::types::ApiError;
use crate::core::constants::EXPORT_FILE_NAME;
use crate::data::DatabaseService;
use crate::domain::export::{CsvExport, build_export_query, export_csv, unfiltered_query};

/// Shared state for export endpoints
#[derive(Clone)]
pub struct ExportApiState {
    pub database: Arc<DatabaseService>,
    /// Directory where each export creates its own temp file
    pub temp_dir: PathBuf,
}

/// Routes nested under `/api/v1/resources`
pub fn resource_routes(state: ExportApiState) -> Router<()> {
    Router::new()
        .route("/export/csv", get(export_all_csv))
        .with_state(state)
}

/// Routes nested under `/api/v1/views`
pub fn view_routes(state: ExportApiState) -> Router<()> {
    Router::new()
        .route("/{view_id}/export/csv", get(export_view_csv))
        .with_state(state)
}

/// Export every resource as CSV
pub async fn export_all_csv(State(state): State<ExportApiState>) -> Result<Response, ApiError> {
    let query = unfiltered_query(state.database.backend().dialect());
    let resources = state.database.repository().fetch_resources(&query).await?;
    tracing::debug!(rows = resources.len(), "Exporting inventory");

    let export = export_csv(resources, state.temp_dir.clone()).await?;
    csv_attachment(export)
}

/// Export the resources matched by a saved view as CSV
pub async fn export_view_csv(
    State(state): State<ExportApiState>,
    Path(view_id): Path<String>,
) -> Result<Response, ApiError> {
    let view_id: i64 = view_id.parse().map_err(|_| {
        ApiError::bad_request("INVALID_VIEW_ID", format!("Invalid view id: {}", view_id))
    })?;

    let repository = state.database.repository();
    let view = repository.get_view(view_id).await?.ok_or_else(|| {
        ApiError::not_found("VIEW_NOT_FOUND", format!("View {} not found", view_id))
    })?;

    let query = build_export_query(
        &view.filters,
        &view.exclude,
        state.database.backend().dialect(),
    )?;
    let resources = repository.fetch_resources(&query).await?;
    tracing::debug!(
        view_id,
        view = %view.name,
        filters = view.filters.len(),
        excluded = view.exclude.len(),
        rows = resources.len(),
        "Exporting view"
    );

    let export = export_csv(resources, state.temp_dir.clone()).await?;
    csv_attachment(export)
}

/// Stream a finished CSV document as a file download
fn csv_attachment(export: CsvExport) -> Result<Response, ApiError> {
    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| ApiError::internal(format!("Invalid export file name: {}", e)))?,
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(export.len()));

    Ok((headers, Body::from_stream(export.into_stream())).into_response())
}
