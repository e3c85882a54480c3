//! Keyword and token tables used by HTML inference.
//!
//! The defaults reproduce the tables the importer has always shipped with.
//! Every field is optional when deserializing, so configuration can override
//! a single table and keep the rest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::TemplateCategory;

/// Keywords that map fragment text to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: TemplateCategory,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn new(category: TemplateCategory, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True if any keyword occurs in the already lower-cased text.
    pub fn matches(&self, lower_text: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && lower_text.contains(&k.to_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportHeuristics {
    /// `var(--font-<token>)` lookup for heading and body fonts.
    pub font_tokens: BTreeMap<String, String>,
    pub fallback_heading_font: String,
    pub fallback_body_font: String,
    /// Class prefix identifying card containers.
    pub card_class_prefix: String,
    /// Case-sensitive substrings that mark a group layout.
    pub group_markers: Vec<String>,
    /// Case-sensitive substrings that force an individual layout.
    pub individual_markers: Vec<String>,
    /// Case-insensitive substrings that force an add-on layout.
    pub add_on_keywords: Vec<String>,
    /// Table rows needed before a fragment counts as a list of events.
    pub min_table_rows: usize,
    /// Month-abbreviation date tokens needed for the same.
    pub min_date_tokens: usize,
    /// Evaluated in order; the first matching rule wins.
    pub category_rules: Vec<CategoryRule>,
}

impl Default for ImportHeuristics {
    fn default() -> Self {
        let font_tokens = [
            ("display-1", "Space Grotesk"),
            ("display-2", "Bebas Neue"),
            ("serif-1", "Playfair Display"),
            ("serif-2", "Lora"),
            ("sans-1", "Inter"),
            ("sans-2", "DM Sans"),
            ("mono", "DM Mono"),
            ("sport", "Rajdhani"),
            ("retro", "Press Start 2P"),
            ("alt-sans", "Montserrat"),
        ]
        .into_iter()
        .map(|(token, font)| (token.to_string(), font.to_string()))
        .collect();

        Self {
            font_tokens,
            fallback_heading_font: "Space Grotesk".to_string(),
            fallback_body_font: "DM Sans".to_string(),
            card_class_prefix: "card".to_string(),
            group_markers: to_strings(&[
                "event-card--group",
                "event-list",
                "Combined Events",
                "Sample Event Group",
                "event-row",
            ]),
            individual_markers: to_strings(&["event-card--single"]),
            add_on_keywords: to_strings(&["parking", "wristband", "vip pass", "upgrade"]),
            min_table_rows: 2,
            min_date_tokens: 2,
            category_rules: vec![
                CategoryRule::new(
                    TemplateCategory::Sports,
                    &[
                        "lakers", "warriors", "clippers", "kings", "dodgers", "nba", "nhl", "nfl",
                        "mlb",
                    ],
                ),
                CategoryRule::new(TemplateCategory::Concerts, &["concert", "tour", "music"]),
                CategoryRule::new(TemplateCategory::Festivals, &["festival", "coachella"]),
                CategoryRule::new(TemplateCategory::Comedy, &["comedy", "comedian"]),
                CategoryRule::new(
                    TemplateCategory::Sports,
                    &["tennis", "us open", "grand slam"],
                ),
                CategoryRule::new(TemplateCategory::Parking, &["parking"]),
                CategoryRule::new(TemplateCategory::Wristbands, &["wristband"]),
            ],
        }
    }
}

impl ImportHeuristics {
    /// Resolves a font token, falling back to the heading or body default.
    pub fn resolve_font_token(&self, token: &str, heading: bool) -> String {
        match self.font_tokens.get(&token.trim().to_lowercase()) {
            Some(font) => font.clone(),
            None if heading => self.fallback_heading_font.clone(),
            None => self.fallback_body_font.clone(),
        }
    }

    /// First category whose keywords occur in the text; `general` otherwise.
    pub fn category_for(&self, text: &str) -> TemplateCategory {
        let lower = text.to_lowercase();
        self.category_rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.category)
            .unwrap_or(TemplateCategory::General)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
