//! Built-in system templates and the gallery view over them.
//!
//! System entries are read-only and live only in memory. The gallery lists
//! them ahead of the user's stored templates.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{
    AddOnType, EmailTemplate, GroupLayoutStyle, LayoutType, NewTemplate, TemplateCategory,
    TemplateConfig, ThemeMode,
};

const SYSTEM_ID_PREFIX: &str = "system-";
const BUILTIN_SEED: &str = include_str!("../../data/system_templates.json");

/// Errors raised while loading a seed list.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid system template seed: {0}")]
    InvalidSeed(#[from] serde_json::Error),

    #[error("System template {name} has invalid config fields: {fields:?}")]
    InvalidConfig { name: String, fields: Vec<String> },
}

string_enum! {
    /// Gallery tab selector.
    GalleryTab, "gallery tab" {
        All => "all",
        Favorites => "favorites",
        Recent => "recent",
        Group => "group",
        Individual => "individual",
        AddOn => "add-on",
    }
}

impl Default for GalleryTab {
    fn default() -> Self {
        GalleryTab::All
    }
}

/// Gallery listing criteria. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryFilter {
    #[serde(default)]
    pub tab: GalleryTab,
    #[serde(default)]
    pub category: Option<TemplateCategory>,
    #[serde(default)]
    pub search: Option<String>,
    /// A template matches when it carries any of these tags.
    #[serde(default)]
    pub style_tags: Vec<String>,
}

impl GalleryFilter {
    pub fn matches(&self, template: &EmailTemplate) -> bool {
        let tab_ok = match self.tab {
            GalleryTab::All => true,
            GalleryTab::Favorites => template.is_favorite,
            GalleryTab::Recent => template.last_used_at.is_some(),
            GalleryTab::Group => template.effective_layout_type() == LayoutType::Group,
            GalleryTab::Individual => template.effective_layout_type() == LayoutType::Individual,
            GalleryTab::AddOn => template.effective_layout_type() == LayoutType::AddOn,
        };
        if !tab_ok {
            return false;
        }

        if self.category.is_some_and(|c| c != template.category) {
            return false;
        }

        if let Some(query) = &self.search {
            if !template.matches_search(query) {
                return false;
            }
        }

        self.style_tags.is_empty()
            || self
                .style_tags
                .iter()
                .any(|tag| template.style_tags.contains(tag))
    }
}

/// Template counts per layout type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCounts {
    pub group: usize,
    pub individual: usize,
    #[serde(rename = "add-on")]
    pub add_on: usize,
}

/// Seed file entry; `config` is a partial object over the defaults.
#[derive(Debug, Deserialize)]
struct SeedEntry {
    name: String,
    category: TemplateCategory,
    #[serde(default)]
    layout_type: Option<LayoutType>,
    #[serde(default)]
    layout_style: Option<GroupLayoutStyle>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    add_on_type: Option<AddOnType>,
    #[serde(default)]
    theme_mode: Option<ThemeMode>,
    #[serde(default)]
    style_tags: Vec<String>,
    html_template: String,
    #[serde(default)]
    quick_share_template: Option<String>,
    #[serde(default)]
    config: Map<String, Value>,
}

impl SeedEntry {
    fn into_new_template(self) -> Result<NewTemplate, CatalogError> {
        let merged = TemplateConfig::merge_with_defaults(&self.config);
        if !merged.ignored_fields.is_empty() {
            return Err(CatalogError::InvalidConfig {
                name: self.name,
                fields: merged.ignored_fields,
            });
        }
        Ok(NewTemplate {
            layout_type: self.layout_type,
            layout_style: self.layout_style,
            description: self.description,
            config: merged.config,
            style_tags: self.style_tags,
            theme_mode: self.theme_mode,
            quick_share_template: self.quick_share_template,
            add_on_type: self.add_on_type,
            ..NewTemplate::new(self.name, self.category, self.html_template)
        })
    }
}

/// Read-only list of system templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    system: Vec<EmailTemplate>,
}

impl TemplateCatalog {
    /// Builds the catalog from an injected list; entry `i` gets id `system-<i>`.
    pub fn new(entries: Vec<NewTemplate>) -> Self {
        let now = Utc::now();
        let system = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let layout_type = entry.resolved_layout_type();
                EmailTemplate {
                    id: format!("{}{}", SYSTEM_ID_PREFIX, index),
                    name: entry.name,
                    category: entry.category,
                    layout_type: Some(layout_type),
                    layout_style: entry.layout_style,
                    description: entry.description,
                    html_template: entry.html_template,
                    thumbnail_url: entry.thumbnail_url,
                    is_system: true,
                    is_favorite: false,
                    config: entry.config,
                    user_id: None,
                    created_at: now,
                    updated_at: now,
                    style_tags: entry.style_tags,
                    theme_mode: entry.theme_mode,
                    output_formats: entry.output_formats,
                    quick_share_template: entry.quick_share_template,
                    last_used_at: None,
                    add_on_type: entry.add_on_type,
                    parent_event_id: entry.parent_event_id,
                }
            })
            .collect();
        Self { system }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog from the bundled seed list.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_seed_json(BUILTIN_SEED)
    }

    /// Catalog from a JSON array of seed entries.
    pub fn from_seed_json(raw: &str) -> Result<Self, CatalogError> {
        let entries: Vec<SeedEntry> = serde_json::from_str(raw)?;
        let templates = entries
            .into_iter()
            .map(SeedEntry::into_new_template)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(templates))
    }

    pub fn is_system_id(id: &str) -> bool {
        id.starts_with(SYSTEM_ID_PREFIX)
    }

    pub fn system_templates(&self) -> &[EmailTemplate] {
        &self.system
    }

    pub fn len(&self) -> usize {
        self.system.len()
    }

    pub fn is_empty(&self) -> bool {
        self.system.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&EmailTemplate> {
        self.system.iter().find(|t| t.id == id)
    }

    /// System entries first, then the user's rows in their given order.
    pub fn merge(&self, user_templates: Vec<EmailTemplate>) -> Vec<EmailTemplate> {
        let mut all = self.system.clone();
        all.extend(user_templates);
        all
    }

    /// Merged list narrowed by the filter. The recent tab is ordered by
    /// last use, newest first.
    pub fn gallery(&self, user_templates: Vec<EmailTemplate>, filter: &GalleryFilter) -> Vec<EmailTemplate> {
        let mut listed: Vec<EmailTemplate> = self
            .merge(user_templates)
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        if filter.tab == GalleryTab::Recent {
            listed.sort_by(|a, b| b.last_used_at.cmp(&a.last_used_at));
        }
        listed
    }

    pub fn layout_counts(templates: &[EmailTemplate]) -> LayoutCounts {
        templates
            .iter()
            .fold(LayoutCounts::default(), |mut counts, template| {
                match template.effective_layout_type() {
                    LayoutType::Group => counts.group += 1,
                    LayoutType::Individual => counts.individual += 1,
                    LayoutType::AddOn => counts.add_on += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_template(name: &str, category: TemplateCategory) -> EmailTemplate {
        let now = Utc::now();
        EmailTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            category,
            layout_type: None,
            layout_style: None,
            description: None,
            html_template: "<div></div>".to_string(),
            thumbnail_url: None,
            is_system: false,
            is_favorite: false,
            config: TemplateConfig::default(),
            user_id: None,
            created_at: now,
            updated_at: now,
            style_tags: Vec::new(),
            theme_mode: None,
            output_formats: None,
            quick_share_template: None,
            last_used_at: None,
            add_on_type: None,
            parent_event_id: None,
        }
    }

    #[test]
    fn test_builtin_seed_loads() {
        let catalog = TemplateCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        let first = &catalog.system_templates()[0];
        assert_eq!(first.id, "system-0");
        assert!(first.is_system);
        assert_eq!(first.name, "Combined Events Minimal");
        assert_eq!(first.config.accent_color, "#e65c00");
        // Unlisted keys keep their defaults.
        assert_eq!(first.config.padding, TemplateConfig::default().padding);

        let parking = catalog
            .system_templates()
            .iter()
            .find(|t| t.name == "Parking Pass")
            .unwrap();
        assert_eq!(parking.layout_type, Some(LayoutType::AddOn));
    }

    #[test]
    fn test_seed_with_bad_config_is_rejected() {
        let raw = r#"[{"name":"X","category":"general","html_template":"<div></div>","config":{"padding":"wide"}}]"#;
        assert!(matches!(
            TemplateCatalog::from_seed_json(raw),
            Err(CatalogError::InvalidConfig { .. })
        ));
        assert!(TemplateCatalog::from_seed_json("{}").is_err());
    }

    #[test]
    fn test_merge_puts_system_first() {
        let catalog = TemplateCatalog::new(vec![NewTemplate::new(
            "Builtin",
            TemplateCategory::Minimal,
            "<div></div>",
        )]);
        let merged = catalog.merge(vec![user_template("Mine", TemplateCategory::General)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "system-0");
        assert_eq!(merged[1].name, "Mine");
        assert!(TemplateCatalog::is_system_id(&merged[0].id));
        assert!(!TemplateCatalog::is_system_id(&merged[1].id));
        assert!(catalog.get("system-0").is_some());
        assert!(catalog.get("system-9").is_none());
    }

    #[test]
    fn test_layout_counts_use_effective_layout() {
        let templates = vec![
            user_template("A", TemplateCategory::Parking),
            user_template("B", TemplateCategory::Sports),
            EmailTemplate {
                layout_type: Some(LayoutType::Group),
                ..user_template("C", TemplateCategory::Sports)
            },
        ];
        let counts = TemplateCatalog::layout_counts(&templates);
        assert_eq!(
            counts,
            LayoutCounts {
                group: 1,
                individual: 1,
                add_on: 1
            }
        );
    }

    #[test]
    fn test_filter_tabs_category_search_and_tags() {
        let catalog = TemplateCatalog::empty();
        let mut favorite = user_template("Lakers Night", TemplateCategory::Sports);
        favorite.is_favorite = true;
        favorite.style_tags = vec!["bold".to_string()];
        let mut described = user_template("Plain", TemplateCategory::Comedy);
        described.description = Some("Late show at the Improv".to_string());
        let lot = user_template("Lot C", TemplateCategory::Parking);
        let users = vec![favorite, described, lot];

        let names = |filter: GalleryFilter| -> Vec<String> {
            catalog
                .gallery(users.clone(), &filter)
                .into_iter()
                .map(|t| t.name)
                .collect()
        };

        assert_eq!(names(GalleryFilter::default()).len(), 3);
        assert_eq!(
            names(GalleryFilter {
                tab: GalleryTab::Favorites,
                ..Default::default()
            }),
            vec!["Lakers Night"]
        );
        assert_eq!(
            names(GalleryFilter {
                tab: GalleryTab::AddOn,
                ..Default::default()
            }),
            vec!["Lot C"]
        );
        assert_eq!(
            names(GalleryFilter {
                category: Some(TemplateCategory::Comedy),
                ..Default::default()
            }),
            vec!["Plain"]
        );
        assert_eq!(
            names(GalleryFilter {
                search: Some("IMPROV".to_string()),
                ..Default::default()
            }),
            vec!["Plain"]
        );
        assert_eq!(
            names(GalleryFilter {
                search: Some("parking".to_string()),
                ..Default::default()
            }),
            vec!["Lot C"]
        );
        assert_eq!(
            names(GalleryFilter {
                style_tags: vec!["retro".to_string(), "bold".to_string()],
                ..Default::default()
            }),
            vec!["Lakers Night"]
        );
    }

    #[test]
    fn test_recent_tab_sorts_by_last_use() {
        let now = Utc::now();
        let mut older = user_template("Older", TemplateCategory::General);
        older.last_used_at = Some(now - Duration::hours(2));
        let mut newer = user_template("Newer", TemplateCategory::General);
        newer.last_used_at = Some(now);
        let unused = user_template("Unused", TemplateCategory::General);

        let filter = GalleryFilter {
            tab: GalleryTab::Recent,
            ..Default::default()
        };
        let listed = TemplateCatalog::empty().gallery(vec![older, unused, newer], &filter);
        let names: Vec<&str> = listed.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[test]
    fn test_gallery_tab_parsing() {
        assert_eq!("add-on".parse::<GalleryTab>(), Ok(GalleryTab::AddOn));
        assert_eq!("Recent".parse::<GalleryTab>(), Ok(GalleryTab::Recent));
        assert!("archived".parse::<GalleryTab>().is_err());
    }
}
