//! Color contrast checks for the template editor.

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use shared::color;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct ContrastQuery {
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub fg: String,
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub bg: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ContrastResponse {
    pub foreground: String,
    pub background: String,
    /// WCAG contrast ratio, rounded to two decimals.
    pub ratio: f64,
    pub readable: bool,
    /// Black or white, whichever reads better on the background.
    pub suggested_text_color: String,
    pub background_is_dark: Option<bool>,
}

/// GET /api/v1/colors/contrast?fg=&bg=
pub async fn contrast(
    Query(query): Query<ContrastQuery>,
) -> Result<Json<ContrastResponse>, ApiError> {
    query.validate()?;
    Ok(Json(evaluate(&query.fg, &query.bg)))
}

fn evaluate(fg: &str, bg: &str) -> ContrastResponse {
    let ratio = color::contrast_ratio(fg, bg);
    ContrastResponse {
        foreground: fg.to_string(),
        background: bg.to_string(),
        ratio: (ratio * 100.0).round() / 100.0,
        readable: color::is_readable(fg, bg),
        suggested_text_color: color::contrast_color(bg).to_string(),
        background_is_dark: color::is_dark(bg),
    }
}
