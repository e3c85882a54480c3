//! Input format detection.

use crate::models::ImportFormat;

const HTML_SIGNATURES: &[&str] = &[
    "<!doctype",
    "<html",
    "<div",
    "<table",
    "<section",
    "<article",
];

/// Classifies pasted text as JSON, HTML or unknown.
///
/// Text that starts like JSON but fails to parse is checked for HTML next,
/// since a template may open with a literal brace.
pub fn detect_format(input: &str) -> ImportFormat {
    let trimmed = input.trim();

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return ImportFormat::Json;
    }

    let lower = trimmed.to_lowercase();
    if HTML_SIGNATURES.iter().any(|sig| lower.starts_with(sig))
        || lower.contains("<style")
        || lower.contains("style=\"")
    {
        return ImportFormat::Html;
    }

    ImportFormat::Unknown
}
