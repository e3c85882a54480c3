//! Layout type and category heuristics.

use regex::Regex;

use super::extract::text_content;
use super::heuristics::ImportHeuristics;
use crate::models::{GroupLayoutStyle, LayoutType, TemplateCategory};

lazy_static::lazy_static! {
    static ref TABLE_ROW_REGEX: Regex = Regex::new(r"(?i)<tr[\s>/]").unwrap();

    static ref DATE_TOKEN_REGEX: Regex =
        Regex::new(r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+\d+").unwrap();

    static ref LAYOUT_STYLE_REGEX: Regex = Regex::new(r"(?i)\blayout-([a-z0-9_-]+)").unwrap();
}

/// Where the layout decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSource {
    Section,
    ClassAttribute,
    Content,
    AddOnKeyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub layout_type: LayoutType,
    pub layout_source: LayoutSource,
    pub category: TemplateCategory,
}

/// Classifies one fragment.
///
/// An enclosing section's layout is authoritative. Otherwise the
/// fragment's own class attribute decides, then content markers. Add-on
/// keywords override both of the latter.
pub fn classify(
    fragment: &str,
    class_attr: Option<&str>,
    section_context: Option<LayoutType>,
    heuristics: &ImportHeuristics,
) -> Classification {
    let category = heuristics.category_for(&text_content(fragment));

    if let Some(layout_type) = section_context {
        return Classification {
            layout_type,
            layout_source: LayoutSource::Section,
            category,
        };
    }

    let (mut layout_type, mut layout_source) = match class_attr.and_then(layout_from_class) {
        Some(layout) => (layout, LayoutSource::ClassAttribute),
        None => (layout_from_content(fragment, heuristics), LayoutSource::Content),
    };

    if has_add_on_keyword(fragment, heuristics) {
        layout_type = LayoutType::AddOn;
        layout_source = LayoutSource::AddOnKeyword;
    }

    Classification {
        layout_type,
        layout_source,
        category,
    }
}

/// Layout named by a `<section>` class: `group-layout` or `individual-layout`,
/// with underscores accepted.
pub fn layout_from_section_class(class: &str) -> Option<LayoutType> {
    let lower = class.to_lowercase();
    if lower.contains("group-layout") || lower.contains("group_layout") {
        Some(LayoutType::Group)
    } else if lower.contains("individual-layout") || lower.contains("individual_layout") {
        Some(LayoutType::Individual)
    } else {
        None
    }
}

/// True for section classes the article strategy treats as layout scopes.
pub fn is_layout_section_class(class: &str) -> bool {
    let lower = class.to_lowercase();
    layout_from_section_class(&lower).is_some() || lower.contains("event-shell")
}

fn layout_from_class(class: &str) -> Option<LayoutType> {
    let lower = class.to_lowercase();
    if lower.contains("group") {
        Some(LayoutType::Group)
    } else if lower.contains("single") {
        Some(LayoutType::Individual)
    } else {
        None
    }
}

fn layout_from_content(fragment: &str, heuristics: &ImportHeuristics) -> LayoutType {
    let marked = heuristics
        .group_markers
        .iter()
        .any(|marker| !marker.is_empty() && fragment.contains(marker.as_str()));
    let many_rows = TABLE_ROW_REGEX.find_iter(fragment).count() >= heuristics.min_table_rows;
    let many_dates = DATE_TOKEN_REGEX.find_iter(fragment).count() >= heuristics.min_date_tokens;

    let forced_individual = heuristics
        .individual_markers
        .iter()
        .any(|marker| !marker.is_empty() && fragment.contains(marker.as_str()));

    if (marked || many_rows || many_dates) && !forced_individual {
        LayoutType::Group
    } else {
        LayoutType::Individual
    }
}

fn has_add_on_keyword(fragment: &str, heuristics: &ImportHeuristics) -> bool {
    let lower = fragment.to_lowercase();
    heuristics
        .add_on_keywords
        .iter()
        .any(|keyword| !keyword.is_empty() && lower.contains(&keyword.to_lowercase()))
}

/// Raw `layout-<name>` label from a class attribute.
pub fn layout_style_label(class: &str) -> Option<String> {
    LAYOUT_STYLE_REGEX
        .captures(class)
        .map(|caps| caps[1].to_lowercase())
}

/// Known group layout style for a label, if it names one.
pub fn layout_style_from_label(label: &str) -> Option<GroupLayoutStyle> {
    label.parse().ok()
}
