//! JSON import: batch normalization, validation and conversion.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::models::template::infer_layout_type;
use crate::models::template_config::RECOMMENDED_FIELDS;
use crate::models::{
    AddOnType, GroupLayoutStyle, ImportableTemplate, LayoutType, OutputFormats, ParsedTemplate,
    TemplateCategory, TemplateConfig, ThemeMode, ValidationResult,
};

pub const INVALID_JSON_ERROR: &str = "Invalid JSON format";

/// Raw candidate records pulled out of a JSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBatch {
    pub templates: Vec<Value>,
    pub error: Option<String>,
}

/// Accepts `{"templates": [...]}`, a bare array, or a single object.
pub fn parse_json_import_data(raw: &str) -> JsonBatch {
    let parsed: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "JSON import input failed to parse");
            return JsonBatch {
                templates: Vec::new(),
                error: Some(INVALID_JSON_ERROR.to_string()),
            };
        }
    };

    let templates = match parsed {
        Value::Object(mut map) if map.get("templates").is_some_and(Value::is_array) => {
            match map.remove("templates") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        Value::Array(items) => items,
        other => vec![other],
    };

    JsonBatch {
        templates,
        error: None,
    }
}

/// Checks one raw candidate. Errors block import; warnings do not.
pub fn validate_template(candidate: &Value) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if non_empty_str(candidate.get("name")).is_none() {
        errors.push("Missing or invalid \"name\" field".to_string());
    }

    match candidate.get("category").filter(|v| truthy(v)) {
        None => errors.push("Missing \"category\" field".to_string()),
        Some(value) => {
            if exact_category(value).is_none() {
                errors.push(format!(
                    "Invalid category \"{}\". Valid categories: {}",
                    display_value(value),
                    TemplateCategory::valid_values()
                ));
            }
        }
    }

    if non_empty_str(candidate.get("html_template")).is_none() {
        errors.push("Missing or invalid \"html_template\" field".to_string());
    }

    match candidate.get("config").and_then(Value::as_object) {
        None => errors.push("Missing or invalid \"config\" object".to_string()),
        Some(config) => warnings.extend(recommended_field_warnings(config)),
    }

    if let Some(tags) = candidate.get("style_tags").filter(|v| truthy(v)) {
        if !tags.is_array() {
            warnings.push("style_tags should be an array".to_string());
        }
    }

    if let Some(mode) = candidate.get("theme_mode").filter(|v| truthy(v)) {
        let known = mode
            .as_str()
            .is_some_and(|m| ThemeMode::ALL.iter().any(|t| t.as_str() == m));
        if !known {
            warnings.push("theme_mode should be \"light\", \"dark\", or \"auto\"".to_string());
        }
    }

    ValidationResult::from_messages(errors, warnings)
}

/// Re-runs the required-field checks on a candidate that has already been
/// parsed, e.g. one sent back by a client after preview.
pub fn revalidate_parsed(template: &ParsedTemplate) -> ValidationResult {
    match serde_json::to_value(template) {
        Ok(value) => validate_template(&value),
        Err(err) => ValidationResult::from_messages(vec![err.to_string()], Vec::new()),
    }
}

/// Converts one raw candidate into a preview row.
///
/// The config is always merged over the defaults, even for invalid
/// candidates, so every row can be previewed.
pub fn json_to_importable(candidate: &Value, index: usize, session: &str) -> ImportableTemplate {
    let validation = validate_template(candidate);
    let mut warnings = validation.warnings;

    let category = candidate
        .get("category")
        .and_then(exact_category)
        .unwrap_or(TemplateCategory::General);
    let add_on_type = parse_optional::<AddOnType>(candidate.get("add_on_type"));
    let layout_type = parse_optional::<LayoutType>(candidate.get("layout_type"))
        .unwrap_or_else(|| infer_layout_type(category, add_on_type));

    let config = match candidate.get("config").and_then(Value::as_object) {
        Some(partial) => {
            let merged = TemplateConfig::merge_with_defaults(partial);
            warnings.extend(
                merged
                    .ignored_fields
                    .iter()
                    .map(|field| format!("Ignored invalid config field \"{}\"", field)),
            );
            merged.config
        }
        None => TemplateConfig::default(),
    };

    let template = ParsedTemplate {
        name: non_empty_str(candidate.get("name"))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Template {}", index + 1)),
        category,
        layout_type,
        layout_style: parse_optional::<GroupLayoutStyle>(candidate.get("layout_style")),
        config,
        html_template: non_empty_str(candidate.get("html_template"))
            .unwrap_or_default()
            .to_string(),
        description: non_empty_str(candidate.get("description")).map(str::to_string),
        style_tags: candidate
            .get("style_tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        theme_mode: parse_optional::<ThemeMode>(candidate.get("theme_mode")),
        add_on_type,
        output_formats: candidate
            .get("output_formats")
            .and_then(|v| serde_json::from_value::<OutputFormats>(v.clone()).ok()),
        quick_share_template: non_empty_str(candidate.get("quick_share_template"))
            .map(str::to_string),
    };

    ImportableTemplate {
        id: format!("json-{}-{}", index, session),
        template,
        is_selected: validation.valid,
        validation_errors: validation.errors,
        validation_warnings: warnings,
    }
}

/// Loose truthiness: null, false, 0 and "" count as absent.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Category lookup without normalization: the stored value must be exact.
fn exact_category(value: &Value) -> Option<TemplateCategory> {
    let raw = value.as_str()?;
    TemplateCategory::ALL
        .iter()
        .copied()
        .find(|c| c.as_str() == raw)
}

fn parse_optional<T: FromStr>(value: Option<&Value>) -> Option<T> {
    value.and_then(Value::as_str).and_then(|s| s.parse().ok())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Warnings for recommended config keys that are absent or falsy.
pub fn recommended_field_warnings(config: &Map<String, Value>) -> Vec<String> {
    RECOMMENDED_FIELDS
        .iter()
        .filter(|field| !config.get(**field).is_some_and(truthy))
        .map(|field| format!("Missing {} in config", field))
        .collect()
}
