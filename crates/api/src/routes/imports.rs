//! Template import handlers: preview, bulk import and the import schema.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use domain::models::{BulkImportReport, ImportableTemplate};
use domain::services::import::revalidate_parsed;
use domain::services::{import_selected, ImportPreview};
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_bulk_import, record_import_preview};

/// JSON Schema describing the JSON import payload.
pub const IMPORT_SCHEMA: &str = include_str!("../../static/import_schema.json");

/// Create import routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(bulk_import))
        .route("/preview", post(preview_import))
        .route("/schema", get(import_schema))
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    /// Pasted HTML or JSON.
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub templates: Vec<ImportableTemplate>,
}

/// Runs the import pipeline on pasted input. Nothing is stored.
///
/// POST /api/v1/imports/preview
pub async fn preview_import(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<ImportPreview>, ApiError> {
    let limit = state.config.import.max_input_bytes;
    if request.input.len() > limit {
        return Err(ApiError::PayloadTooLarge(format!(
            "Import input exceeds {} bytes",
            limit
        )));
    }

    let preview = state.pipeline.process_input(&request.input);
    record_import_preview(preview.format, preview.templates.len());
    tracing::info!(
        format = %preview.format,
        total = preview.summary.total,
        valid = preview.summary.valid,
        "Import preview generated"
    );

    Ok(Json(preview))
}

/// Selected candidates are re-checked against the required-field and
/// creation rules, since the preview round-trips through the client.
fn recheck(candidates: &mut [ImportableTemplate]) {
    for candidate in candidates.iter_mut().filter(|c| c.is_selected) {
        let mut errors = revalidate_parsed(&candidate.template).errors;
        if let Err(invalid) = candidate.to_new_template().validate() {
            errors.push(invalid.to_string());
        }
        if !errors.is_empty() {
            tracing::warn!(candidate = %candidate.id, "Rejected selected import candidate");
            candidate.validation_errors.extend(errors);
            candidate.is_selected = false;
        }
    }
}

/// Creates a template for every selected, valid candidate.
///
/// POST /api/v1/imports
pub async fn bulk_import(
    State(state): State<AppState>,
    Json(request): Json<BulkImportRequest>,
) -> Result<Json<BulkImportReport>, ApiError> {
    let limit = state.config.import.max_templates_per_import;
    if request.templates.len() > limit {
        return Err(ApiError::PayloadTooLarge(format!(
            "At most {} templates can be imported at once",
            limit
        )));
    }

    let mut candidates = request.templates;
    recheck(&mut candidates);

    let report = import_selected(state.store.as_ref(), &candidates).await;
    record_bulk_import(&report);

    Ok(Json(report))
}

/// GET /api/v1/imports/schema
pub async fn import_schema() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/schema+json")], IMPORT_SCHEMA)
}
