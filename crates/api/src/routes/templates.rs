//! Template gallery and CRUD handlers.
//!
//! System templates come from the in-memory catalog and are read-only;
//! everything else goes through the template store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use domain::models::{EmailTemplate, NewTemplate, OutputFormat, TemplateCategory, TemplateChanges};
use domain::services::{
    track_usage_best_effort, GalleryFilter, GalleryTab, LayoutCounts, TemplateCatalog,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Create template routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/counts", get(layout_counts))
        .route(
            "/:id",
            get(get_template)
                .patch(update_template)
                .delete(delete_template),
        )
        .route("/:id/favorite", post(toggle_favorite))
        .route("/:id/duplicate", post(duplicate_template))
        .route("/:id/usage", post(track_usage))
}

/// Query parameters for the gallery listing.
///
/// `style_tags` is a comma-separated list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryQuery {
    pub tab: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub style_tags: Option<String>,
}

impl TryFrom<GalleryQuery> for GalleryFilter {
    type Error = ApiError;

    fn try_from(query: GalleryQuery) -> Result<Self, Self::Error> {
        let tab = match query.tab.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(tab) => tab.parse::<GalleryTab>().map_err(ApiError::Validation)?,
            None => GalleryTab::default(),
        };
        let category = query
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(str::parse::<TemplateCategory>)
            .transpose()
            .map_err(ApiError::Validation)?;
        let style_tags = query
            .style_tags
            .unwrap_or_default()
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(GalleryFilter {
            tab,
            category,
            search: query.search.filter(|s| !s.trim().is_empty()),
            style_tags,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ListTemplatesResponse {
    pub templates: Vec<EmailTemplate>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct TemplateCountsResponse {
    pub total: usize,
    #[serde(flatten)]
    pub counts: LayoutCounts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackUsageRequest {
    pub output_format: OutputFormat,
    #[serde(default)]
    pub event_id: Option<String>,
}

fn reject_system(id: &str) -> Result<(), ApiError> {
    if TemplateCatalog::is_system_id(id) {
        return Err(ApiError::Forbidden(
            "System templates are read-only".to_string(),
        ));
    }
    Ok(())
}

async fn find_template(state: &AppState, id: &str) -> Result<EmailTemplate, ApiError> {
    let found = if TemplateCatalog::is_system_id(id) {
        state.catalog.get(id).cloned()
    } else {
        state.store.get_template(id).await?
    };
    found.ok_or_else(|| ApiError::NotFound(format!("Template not found: {}", id)))
}

/// Gallery listing: system templates first, then user templates, filtered.
///
/// GET /api/v1/templates?tab=&category=&search=&styleTags=
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<ListTemplatesResponse>, ApiError> {
    let filter = GalleryFilter::try_from(query)?;
    let user_templates = state.store.fetch_templates(filter.category).await?;
    let templates = state.catalog.gallery(user_templates, &filter);

    Ok(Json(ListTemplatesResponse {
        total: templates.len(),
        templates,
    }))
}

/// GET /api/v1/templates/counts
pub async fn layout_counts(
    State(state): State<AppState>,
) -> Result<Json<TemplateCountsResponse>, ApiError> {
    let all = state.catalog.merge(state.store.fetch_templates(None).await?);

    Ok(Json(TemplateCountsResponse {
        total: all.len(),
        counts: TemplateCatalog::layout_counts(&all),
    }))
}

/// POST /api/v1/templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<NewTemplate>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let template = state.store.create_template(request).await?;
    tracing::info!(template_id = %template.id, name = %template.name, "Template created");

    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/v1/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmailTemplate>, ApiError> {
    Ok(Json(find_template(&state, &id).await?))
}

/// PATCH /api/v1/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<TemplateChanges>,
) -> Result<Json<EmailTemplate>, ApiError> {
    reject_system(&id)?;
    changes.validate()?;
    if changes.is_empty() {
        return Err(ApiError::Validation("No changes provided".to_string()));
    }

    Ok(Json(state.store.update_template(&id, changes).await?))
}

/// DELETE /api/v1/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    reject_system(&id)?;
    state.store.delete_template(&id).await?;
    tracing::info!(template_id = %id, "Template deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/:id/favorite
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmailTemplate>, ApiError> {
    reject_system(&id)?;
    let current = find_template(&state, &id).await?;

    let changes = TemplateChanges {
        is_favorite: Some(!current.is_favorite),
        ..Default::default()
    };
    Ok(Json(state.store.update_template(&id, changes).await?))
}

/// Copies a system or user template into a new user template.
///
/// POST /api/v1/templates/:id/duplicate
pub async fn duplicate_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let source = find_template(&state, &id).await?;
    let copy = state.store.create_template(source.duplicate()).await?;
    tracing::info!(source_id = %id, template_id = %copy.id, "Template duplicated");

    Ok((StatusCode::CREATED, Json(copy)))
}

/// Records a usage event in the background and answers immediately.
///
/// POST /api/v1/templates/:id/usage
pub async fn track_usage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TrackUsageRequest>,
) -> StatusCode {
    let store = state.store.clone();
    tokio::spawn(async move {
        track_usage_best_effort(store.as_ref(), &id, request.output_format, request.event_id)
            .await;
    });

    StatusCode::ACCEPTED
}
