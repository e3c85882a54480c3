//! Email template domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::template_config::TemplateConfig;

string_enum! {
    /// Closed set of template categories.
    TemplateCategory, "template category" {
        Sports => "sports",
        Concerts => "concerts",
        Festivals => "festivals",
        BigEvents => "big-events",
        Minimal => "minimal",
        Modern => "modern",
        General => "general",
        Comedy => "comedy",
        Theater => "theater",
        Tennis => "tennis",
        Golf => "golf",
        Racing => "racing",
        Fighting => "fighting",
        Awards => "awards",
        Parking => "parking",
        Wristbands => "wristbands",
        Upgrades => "upgrades",
        Hospitality => "hospitality",
        Neon => "neon",
        Luxury => "luxury",
    }
}

impl TemplateCategory {
    /// Human-readable label shown in the gallery.
    pub fn label(&self) -> &'static str {
        match self {
            TemplateCategory::Sports => "Sports",
            TemplateCategory::Concerts => "Concerts",
            TemplateCategory::Festivals => "Festivals",
            TemplateCategory::BigEvents => "Big Events",
            TemplateCategory::Minimal => "Minimal",
            TemplateCategory::Modern => "Modern",
            TemplateCategory::General => "General",
            TemplateCategory::Comedy => "Comedy",
            TemplateCategory::Theater => "Theater",
            TemplateCategory::Tennis => "Tennis",
            TemplateCategory::Golf => "Golf",
            TemplateCategory::Racing => "Racing",
            TemplateCategory::Fighting => "Fighting",
            TemplateCategory::Awards => "Awards",
            TemplateCategory::Parking => "Parking",
            TemplateCategory::Wristbands => "Wristbands",
            TemplateCategory::Upgrades => "Upgrades",
            TemplateCategory::Hospitality => "Hospitality",
            TemplateCategory::Neon => "Neon",
            TemplateCategory::Luxury => "Luxury",
        }
    }

    /// Categories whose templates are add-on passes rather than events.
    pub fn is_add_on(&self) -> bool {
        matches!(
            self,
            TemplateCategory::Parking
                | TemplateCategory::Wristbands
                | TemplateCategory::Upgrades
                | TemplateCategory::Hospitality
        )
    }

    /// Comma-separated list of every valid category value.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

string_enum! {
    /// How a template arranges events.
    LayoutType, "layout type" {
        Group => "group",
        Individual => "individual",
        AddOn => "add-on",
    }
}

impl LayoutType {
    pub fn label(&self) -> &'static str {
        match self {
            LayoutType::Group => "Group",
            LayoutType::Individual => "Individual",
            LayoutType::AddOn => "Add-On",
        }
    }
}

string_enum! {
    /// Visual arrangement used by group templates.
    GroupLayoutStyle, "layout style" {
        ListMinimal => "list-minimal",
        ListDetailed => "list-detailed",
        TwoColumnTable => "two-column-table",
        MagazineHero => "magazine-hero",
        SportsOutline => "sports-outline",
        CombinedBlock => "combined-block",
        Timeline => "timeline",
        CardGrid => "card-grid",
        BioSplit => "bio-split",
        CalendarStrip => "calendar-strip",
    }
}

string_enum! {
    /// Supplementary pass types.
    AddOnType, "add-on type" {
        Parking => "parking",
        VipParking => "vip-parking",
        WristbandGa => "wristband-ga",
        WristbandVip => "wristband-vip",
        WristbandPlatinum => "wristband-platinum",
        WristbandWeekend => "wristband-weekend",
        Shuttle => "shuttle",
        Camping => "camping",
        Glamping => "glamping",
        MeetGreet => "meet-greet",
        EarlyEntry => "early-entry",
        Backstage => "backstage",
        LoungeAccess => "lounge-access",
        ClubSuite => "club-suite",
        AllInclusive => "all-inclusive",
        MerchBundle => "merch-bundle",
        Upgrade => "upgrade",
    }
}

string_enum! {
    ThemeMode, "theme mode" {
        Light => "light",
        Dark => "dark",
        Auto => "auto",
    }
}

string_enum! {
    /// Channel a template was rendered into.
    OutputFormat, "output format" {
        Email => "email",
        WebsiteCard => "website_card",
        QuickShare => "quick_share",
        Social => "social",
    }
}

/// Which output channels a template supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormats {
    pub email: bool,
    pub website_card: bool,
    pub quick_share: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<bool>,
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self {
            email: true,
            website_card: false,
            quick_share: false,
            social: None,
        }
    }
}

/// A template as presented to the gallery and editor.
///
/// Persisted rows carry a UUID id; built-in catalog entries use `system-<n>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<LayoutType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_style: Option<GroupLayoutStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub html_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub is_system: bool,
    pub is_favorite: bool,
    pub config: TemplateConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_mode: Option<ThemeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_formats: Option<OutputFormats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_share_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_on_type: Option<AddOnType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_event_id: Option<String>,
}

impl EmailTemplate {
    /// Layout type with the fallback applied to rows that never stored one.
    pub fn effective_layout_type(&self) -> LayoutType {
        self.layout_type
            .unwrap_or_else(|| infer_layout_type(self.category, self.add_on_type))
    }

    /// Copy of this template as a new user template.
    pub fn duplicate(&self) -> NewTemplate {
        NewTemplate {
            name: format!("{} (Copy)", self.name),
            category: self.category,
            layout_type: Some(self.effective_layout_type()),
            layout_style: self.layout_style,
            description: self.description.clone(),
            html_template: self.html_template.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            config: self.config.clone(),
            style_tags: self.style_tags.clone(),
            theme_mode: self.theme_mode,
            output_formats: self.output_formats.clone(),
            quick_share_template: self.quick_share_template.clone(),
            add_on_type: self.add_on_type,
            parent_event_id: self.parent_event_id.clone(),
            user_id: None,
        }
    }

    /// True when name, description or category contains the query.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&query))
                .unwrap_or(false)
            || self.category.as_str().contains(&query)
    }
}

/// Layout type for a template that has none stored.
pub fn infer_layout_type(category: TemplateCategory, add_on_type: Option<AddOnType>) -> LayoutType {
    if add_on_type.is_some() || category.is_add_on() {
        LayoutType::AddOn
    } else {
        LayoutType::Individual
    }
}

/// Fields accepted when creating a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewTemplate {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,
    pub category: TemplateCategory,
    #[serde(default)]
    pub layout_type: Option<LayoutType>,
    #[serde(default)]
    pub layout_style: Option<GroupLayoutStyle>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    #[serde(default)]
    pub description: Option<String>,
    pub html_template: String,
    #[validate(url(message = "Thumbnail must be a valid URL"))]
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub config: TemplateConfig,
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_style_tags"))]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub theme_mode: Option<ThemeMode>,
    #[serde(default)]
    pub output_formats: Option<OutputFormats>,
    #[serde(default)]
    pub quick_share_template: Option<String>,
    #[serde(default)]
    pub add_on_type: Option<AddOnType>,
    #[serde(default)]
    pub parent_event_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl NewTemplate {
    /// Minimal template with default config.
    pub fn new(
        name: impl Into<String>,
        category: TemplateCategory,
        html_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            layout_type: None,
            layout_style: None,
            description: None,
            html_template: html_template.into(),
            thumbnail_url: None,
            config: TemplateConfig::default(),
            style_tags: Vec::new(),
            theme_mode: None,
            output_formats: None,
            quick_share_template: None,
            add_on_type: None,
            parent_event_id: None,
            user_id: None,
        }
    }

    /// Layout type to persist: explicit value, else inferred.
    pub fn resolved_layout_type(&self) -> LayoutType {
        self.layout_type
            .unwrap_or_else(|| infer_layout_type(self.category, self.add_on_type))
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TemplateChanges {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,
    pub category: Option<TemplateCategory>,
    pub layout_type: Option<LayoutType>,
    pub layout_style: Option<GroupLayoutStyle>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub html_template: Option<String>,
    #[validate(url(message = "Thumbnail must be a valid URL"))]
    pub thumbnail_url: Option<String>,
    #[validate(nested)]
    pub config: Option<TemplateConfig>,
    pub is_favorite: Option<bool>,
    #[validate(custom(function = "shared::validation::validate_style_tags"))]
    pub style_tags: Option<Vec<String>>,
    pub theme_mode: Option<ThemeMode>,
    pub output_formats: Option<OutputFormats>,
    pub quick_share_template: Option<String>,
    pub add_on_type: Option<AddOnType>,
    pub parent_event_id: Option<String>,
}

impl TemplateChanges {
    pub fn is_empty(&self) -> bool {
        self == &TemplateChanges::default()
    }

    /// Applies the changes to an in-memory template.
    pub fn apply_to(&self, template: &mut EmailTemplate) {
        if let Some(name) = &self.name {
            template.name = name.clone();
        }
        if let Some(category) = self.category {
            template.category = category;
        }
        if let Some(layout_type) = self.layout_type {
            template.layout_type = Some(layout_type);
        }
        if let Some(layout_style) = self.layout_style {
            template.layout_style = Some(layout_style);
        }
        if let Some(description) = &self.description {
            template.description = Some(description.clone());
        }
        if let Some(html) = &self.html_template {
            template.html_template = html.clone();
        }
        if let Some(url) = &self.thumbnail_url {
            template.thumbnail_url = Some(url.clone());
        }
        if let Some(config) = &self.config {
            template.config = config.clone();
        }
        if let Some(is_favorite) = self.is_favorite {
            template.is_favorite = is_favorite;
        }
        if let Some(tags) = &self.style_tags {
            template.style_tags = tags.clone();
        }
        if let Some(theme_mode) = self.theme_mode {
            template.theme_mode = Some(theme_mode);
        }
        if let Some(formats) = &self.output_formats {
            template.output_formats = Some(formats.clone());
        }
        if let Some(quick_share) = &self.quick_share_template {
            template.quick_share_template = Some(quick_share.clone());
        }
        if let Some(add_on_type) = self.add_on_type {
            template.add_on_type = Some(add_on_type);
        }
        if let Some(parent) = &self.parent_event_id {
            template.parent_event_id = Some(parent.clone());
        }
    }
}
