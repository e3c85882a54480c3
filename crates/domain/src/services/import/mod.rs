//! Template import pipeline.
//!
//! Turns pasted text into a list of [`ImportableTemplate`] candidates:
//! format detection, JSON normalization and validation, or HTML fragment
//! extraction followed by config inference and classification. The
//! pipeline is synchronous and does no I/O.

pub mod classify;
pub mod extract;
pub mod format;
pub mod heuristics;
pub mod html;
pub mod inference;
pub mod json;
pub mod title;

use chrono::Utc;
use serde::Serialize;

use crate::models::{
    ImportFormat, ImportSummary, ImportableTemplate, LayoutType, ParsedTemplate, TemplateCategory,
};

pub use extract::extract_fragments_by_tag;
pub use format::detect_format;
pub use heuristics::{CategoryRule, ImportHeuristics};
pub use html::parse_html_template;
pub use json::{
    json_to_importable, parse_json_import_data, revalidate_parsed, validate_template, JsonBatch,
};

pub const UNKNOWN_FORMAT_ERROR: &str = "Could not detect format. Please paste valid HTML or JSON.";
pub const EMPTY_IMPORT_ERROR: &str = "No templates found in JSON input";

/// Suffix source for candidate ids.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionStamp {
    Clock,
    Fixed(String),
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportPreview {
    pub format: ImportFormat,
    pub templates: Vec<ImportableTemplate>,
    pub summary: ImportSummary,
}

#[derive(Debug, Clone)]
pub struct ImportPipeline {
    heuristics: ImportHeuristics,
    session: SessionStamp,
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new(ImportHeuristics::default())
    }
}

impl ImportPipeline {
    pub fn new(heuristics: ImportHeuristics) -> Self {
        Self {
            heuristics,
            session: SessionStamp::Clock,
        }
    }

    /// Uses a constant id suffix so repeated runs are identical.
    pub fn with_fixed_session(mut self, stamp: impl Into<String>) -> Self {
        self.session = SessionStamp::Fixed(stamp.into());
        self
    }

    pub fn heuristics(&self) -> &ImportHeuristics {
        &self.heuristics
    }

    fn session_stamp(&self) -> String {
        match &self.session {
            SessionStamp::Clock => Utc::now().timestamp_millis().to_string(),
            SessionStamp::Fixed(stamp) => stamp.clone(),
        }
    }

    /// Runs the whole pipeline. The result always holds at least one
    /// candidate; unusable input yields a single unselectable one.
    pub fn process_input(&self, input: &str) -> ImportPreview {
        let format = detect_format(input);
        let session = self.session_stamp();

        let templates = match format {
            ImportFormat::Json => self.json_candidates(input, &session),
            ImportFormat::Html => parse_html_template(input, &self.heuristics)
                .into_iter()
                .enumerate()
                .map(|(index, parsed)| {
                    ImportableTemplate::accepted(format!("html-{}-{}", index, session), parsed)
                })
                .collect(),
            ImportFormat::Unknown => vec![error_candidate("Unknown Format", UNKNOWN_FORMAT_ERROR)],
        };

        let summary = ImportSummary::from_candidates(&templates);
        tracing::debug!(
            format = %format,
            total = summary.total,
            valid = summary.valid,
            "Processed import input"
        );

        ImportPreview {
            format,
            templates,
            summary,
        }
    }

    fn json_candidates(&self, input: &str, session: &str) -> Vec<ImportableTemplate> {
        let batch = parse_json_import_data(input);
        if let Some(error) = batch.error {
            return vec![error_candidate("Parse Error", error)];
        }
        if batch.templates.is_empty() {
            return vec![error_candidate("Empty Import", EMPTY_IMPORT_ERROR)];
        }
        batch
            .templates
            .iter()
            .enumerate()
            .map(|(index, raw)| json_to_importable(raw, index, session))
            .collect()
    }
}

fn error_candidate(name: &str, error: impl Into<String>) -> ImportableTemplate {
    ImportableTemplate::rejected(
        "error",
        ParsedTemplate::new(name, TemplateCategory::General, LayoutType::Individual, ""),
        error,
    )
}

/// Flips one candidate's selection. Invalid candidates stay unselected.
/// Returns false if no candidate has the id or the flip was refused.
pub fn toggle_select(candidates: &mut [ImportableTemplate], id: &str) -> bool {
    match candidates.iter_mut().find(|c| c.id == id) {
        Some(candidate) => {
            let target = !candidate.is_selected;
            candidate.set_selected(target)
        }
        None => false,
    }
}

/// Selects or clears every valid candidate; invalid ones are always
/// cleared. Returns the number selected afterwards.
pub fn toggle_select_all(candidates: &mut [ImportableTemplate], selected: bool) -> usize {
    for candidate in candidates.iter_mut() {
        let target = selected && candidate.is_valid();
        candidate.set_selected(target);
    }
    candidates.iter().filter(|c| c.is_selected).count()
}
