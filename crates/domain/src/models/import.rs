//! Transient import candidates and the reports built from them.
//!
//! Nothing here is persisted directly: a selected candidate is turned into a
//! [`NewTemplate`] and created through the template store.

use serde::{Deserialize, Serialize};

use super::template::{
    AddOnType, GroupLayoutStyle, LayoutType, NewTemplate, OutputFormats, TemplateCategory,
    ThemeMode,
};
use super::template_config::TemplateConfig;

string_enum! {
    /// Shape of pasted import input.
    ImportFormat, "import format" {
        Json => "json",
        Html => "html",
        Unknown => "unknown",
    }
}

/// Template fields recovered from JSON or HTML input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTemplate {
    pub name: String,
    pub category: TemplateCategory,
    pub layout_type: LayoutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_style: Option<GroupLayoutStyle>,
    pub config: TemplateConfig,
    pub html_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_mode: Option<ThemeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_on_type: Option<AddOnType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_formats: Option<OutputFormats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_share_template: Option<String>,
}

impl ParsedTemplate {
    /// Parsed template with default config and no optional metadata.
    pub fn new(
        name: impl Into<String>,
        category: TemplateCategory,
        layout_type: LayoutType,
        html_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            layout_type,
            layout_style: None,
            config: TemplateConfig::default(),
            html_template: html_template.into(),
            description: None,
            style_tags: Vec::new(),
            theme_mode: None,
            add_on_type: None,
            output_formats: None,
            quick_share_template: None,
        }
    }
}

/// One row of the import preview.
///
/// A candidate with validation errors is never selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportableTemplate {
    pub id: String,
    #[serde(flatten)]
    pub template: ParsedTemplate,
    #[serde(rename = "isSelected")]
    pub is_selected: bool,
    #[serde(rename = "validationErrors", default)]
    pub validation_errors: Vec<String>,
    #[serde(rename = "validationWarnings", default)]
    pub validation_warnings: Vec<String>,
}

impl ImportableTemplate {
    /// Valid candidate, selected by default.
    pub fn accepted(id: impl Into<String>, template: ParsedTemplate) -> Self {
        Self {
            id: id.into(),
            template,
            is_selected: true,
            validation_errors: Vec::new(),
            validation_warnings: Vec::new(),
        }
    }

    /// Candidate carrying a single blocking error.
    pub fn rejected(id: impl Into<String>, template: ParsedTemplate, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template,
            is_selected: false,
            validation_errors: vec![error.into()],
            validation_warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty()
    }

    /// Sets the selection flag. Returns false when the candidate is invalid
    /// and the request to select it was refused.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if selected && !self.is_valid() {
            self.is_selected = false;
            return false;
        }
        self.is_selected = selected;
        true
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
    }

    /// Overrides the inferred category. Moving into an add-on category also
    /// moves the layout type to add-on.
    pub fn set_category(&mut self, category: TemplateCategory) {
        self.template.category = category;
        if category.is_add_on() {
            self.template.layout_type = LayoutType::AddOn;
        }
    }

    pub fn set_layout_type(&mut self, layout_type: LayoutType) {
        self.template.layout_type = layout_type;
    }

    /// Creation payload for the template store.
    pub fn to_new_template(&self) -> NewTemplate {
        let parsed = &self.template;
        NewTemplate {
            name: parsed.name.trim().to_string(),
            category: parsed.category,
            layout_type: Some(parsed.layout_type),
            layout_style: parsed.layout_style,
            description: parsed.description.clone(),
            html_template: parsed.html_template.clone(),
            thumbnail_url: None,
            config: parsed.config.clone(),
            style_tags: parsed.style_tags.clone(),
            theme_mode: parsed.theme_mode,
            output_formats: parsed.output_formats.clone(),
            quick_share_template: parsed.quick_share_template.clone(),
            add_on_type: parsed.add_on_type,
            parent_event_id: None,
            user_id: None,
        }
    }
}

/// Result of checking one raw JSON candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_messages(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Counts shown above the import preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub selected: usize,
}

impl ImportSummary {
    pub fn from_candidates(candidates: &[ImportableTemplate]) -> Self {
        let valid = candidates.iter().filter(|c| c.is_valid()).count();
        Self {
            total: candidates.len(),
            valid,
            invalid: candidates.len() - valid,
            selected: candidates.iter().filter(|c| c.is_selected).count(),
        }
    }
}

string_enum! {
    ImportOutcomeStatus, "import outcome" {
        Created => "created",
        Failed => "failed",
        Skipped => "skipped",
    }
}

/// What happened to one candidate during a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImportOutcome {
    pub candidate_id: String,
    pub name: String,
    pub status: ImportOutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate of a bulk import. Earlier successes are kept when later
/// candidates fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImportReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<BulkImportOutcome>,
}

impl BulkImportReport {
    pub fn record(&mut self, outcome: BulkImportOutcome) {
        match outcome.status {
            ImportOutcomeStatus::Created => {
                self.attempted += 1;
                self.succeeded += 1;
            }
            ImportOutcomeStatus::Failed => {
                self.attempted += 1;
                self.failed += 1;
            }
            ImportOutcomeStatus::Skipped => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> ImportableTemplate {
        ImportableTemplate::accepted(
            id,
            ParsedTemplate::new("Card", TemplateCategory::General, LayoutType::Individual, "<div></div>"),
        )
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(candidate("html-0-1")).unwrap();
        assert_eq!(json["id"], "html-0-1");
        assert_eq!(json["name"], "Card");
        assert_eq!(json["layout_type"], "individual");
        assert_eq!(json["isSelected"], true);
        assert!(json["validationErrors"].as_array().unwrap().is_empty());
        assert!(json["config"]["fontHeading"].is_string());
    }

    #[test]
    fn test_invalid_candidate_cannot_be_selected() {
        let mut rejected = ImportableTemplate::rejected(
            "error",
            ParsedTemplate::new("Parse Error", TemplateCategory::General, LayoutType::Individual, ""),
            "Invalid JSON format",
        );
        assert!(!rejected.is_selected);
        assert!(!rejected.set_selected(true));
        assert!(!rejected.is_selected);
        assert!(rejected.set_selected(false));
    }

    #[test]
    fn test_set_category_moves_add_on_layout() {
        let mut c = candidate("json-0-1");
        c.set_category(TemplateCategory::Concerts);
        assert_eq!(c.template.layout_type, LayoutType::Individual);
        c.set_category(TemplateCategory::Wristbands);
        assert_eq!(c.template.layout_type, LayoutType::AddOn);
    }

    #[test]
    fn test_to_new_template_trims_name() {
        let mut c = candidate("json-0-1");
        c.rename("  Spaced  ");
        let new = c.to_new_template();
        assert_eq!(new.name, "Spaced");
        assert_eq!(new.layout_type, Some(LayoutType::Individual));
    }

    #[test]
    fn test_summary_counts() {
        let mut unselected = candidate("b");
        unselected.set_selected(false);
        let invalid = ImportableTemplate::rejected(
            "c",
            ParsedTemplate::new("x", TemplateCategory::General, LayoutType::Individual, ""),
            "Missing \"category\" field",
        );
        let summary = ImportSummary::from_candidates(&[candidate("a"), unselected, invalid]);
        assert_eq!(
            summary,
            ImportSummary {
                total: 3,
                valid: 2,
                invalid: 1,
                selected: 1
            }
        );
    }

    #[test]
    fn test_report_counts() {
        let mut report = BulkImportReport::default();
        report.record(BulkImportOutcome {
            candidate_id: "a".into(),
            name: "A".into(),
            status: ImportOutcomeStatus::Created,
            template_id: Some("t1".into()),
            error: None,
        });
        report.record(BulkImportOutcome {
            candidate_id: "b".into(),
            name: "B".into(),
            status: ImportOutcomeStatus::Failed,
            template_id: None,
            error: Some("boom".into()),
        });
        report.record(BulkImportOutcome {
            candidate_id: "c".into(),
            name: "C".into(),
            status: ImportOutcomeStatus::Skipped,
            template_id: None,
            error: None,
        });
        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.is_complete_success());
    }
}
