//! Visual and behavioral parameters of a template.
//!
//! Required fields always carry a value; optional fields stay `None` until
//! an editor or import sets them, and renderers treat `None` as "use the
//! layout's own default".

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

string_enum! {
    ColorMode, "color mode" {
        Auto => "auto",
        Dark => "dark",
        Light => "light",
        Gray => "gray",
        Custom => "custom",
    }
}

string_enum! {
    TitleSize, "title size" {
        Auto => "auto",
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
    }
}

string_enum! {
    BackgroundPreset, "background preset" {
        Light => "light",
        Dark => "dark",
        Transparent => "transparent",
        Custom => "custom",
    }
}

string_enum! {
    BlockShadow, "block shadow" {
        None => "none",
        Soft => "soft",
        Medium => "medium",
        Deep => "deep",
    }
}

string_enum! {
    ColumnLayout, "column layout" {
        Single => "single",
        Two => "two",
        Three => "three",
        Grid => "grid",
    }
}

string_enum! {
    CardStyle, "card style" {
        Flat => "flat",
        Elevated => "elevated",
        Neon => "neon",
        Glass => "glass",
        Brutalist => "brutalist",
        Ticket => "ticket",
    }
}

string_enum! {
    HeroImageMode, "hero image mode" {
        Auto => "auto",
        Landscape => "landscape",
        Portrait => "portrait",
        None => "none",
    }
}

string_enum! {
    CtaStyle, "CTA style" {
        Button => "button",
        Link => "link",
        Pill => "pill",
        Underline => "underline",
    }
}

/// Every key of the serialized config, in declaration order.
pub const FIELD_NAMES: &[&str] = &[
    "fontHeading",
    "fontBody",
    "fontSizeTitle",
    "fontSizeBody",
    "fontSizeSubtitle",
    "letterSpacing",
    "lineHeight",
    "titleColorMode",
    "bodyColorMode",
    "titleSize",
    "titleFillRow",
    "fontPairing",
    "backgroundColor",
    "textColor",
    "accentColor",
    "ctaBackgroundColor",
    "ctaTextColor",
    "borderColor",
    "glowColor",
    "gradientStart",
    "gradientEnd",
    "bgPreset",
    "backgroundTransparent",
    "innerBorderEnabled",
    "innerBorderColor",
    "innerBorderWidth",
    "innerBorderInset",
    "blockShadow",
    "blockShadowColor",
    "enableSportsFrame",
    "sportsAutoPalette",
    "sportsOuterColor",
    "sportsOuterAltColor",
    "sportsInnerColor",
    "sportsCornerRadius",
    "sportsGapThickness",
    "sportsUseGradient",
    "padding",
    "margin",
    "borderWidth",
    "borderRadius",
    "shadowIntensity",
    "columnLayout",
    "cardStyle",
    "showImages",
    "showTimes",
    "showVenue",
    "showCta",
    "showConciergeLink",
    "showPrices",
    "showMatchup",
    "showHeaderDetail",
    "heroImageMode",
    "showSecondaryImages",
    "showTimeInHeader",
    "showTimePerRow",
    "collapseIdenticalTimes",
    "showSlateLabel",
    "showComedianPhoto",
    "showOpener",
    "showAgeRestriction",
    "showContentWarning",
    "showTourName",
    "showRecordingBadge",
    "showParentEvent",
    "showLotMap",
    "showAccessAreas",
    "showValidDays",
    "showUpgradeIncludes",
    "showShuttleSchedule",
    "ctaText",
    "ctaLink",
    "ctaEnabled",
    "eventCtaEnabled",
    "eventUnderline",
    "eventIcon",
    "conciergeLabel",
    "conciergeNoUrlLabel",
    "conciergeColor",
    "conciergeUnderline",
    "conciergeIcon",
    "showTicketsCta",
    "ticketsCtaText",
    "ticketsCtaStyle",
    "ticketsCtaIcon",
    "showEmailCta",
    "emailCtaText",
    "emailCtaStyle",
    "emailCtaIcon",
    "combineGroups",
    "combinedTitleOverride",
    "slateOverride",
    "customBlurb",
    "autoFillHeaderDate",
];

/// Keys whose absence from an imported config produces a warning.
pub const RECOMMENDED_FIELDS: &[&str] = &["backgroundColor", "textColor", "fontHeading", "fontBody"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    // Typography
    #[validate(length(min = 1, message = "Heading font must not be empty"))]
    pub font_heading: String,
    #[validate(length(min = 1, message = "Body font must not be empty"))]
    pub font_body: String,
    #[validate(range(min = 6, max = 200, message = "Title font size must be 6-200px"))]
    pub font_size_title: i32,
    #[validate(range(min = 6, max = 200, message = "Body font size must be 6-200px"))]
    pub font_size_body: i32,
    #[validate(range(min = 6, max = 200, message = "Subtitle font size must be 6-200px"))]
    pub font_size_subtitle: i32,
    pub letter_spacing: f64,
    pub line_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color_mode: Option<ColorMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_color_mode: Option<ColorMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_size: Option<TitleSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_fill_row: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_pairing: Option<String>,

    // Colors
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub background_color: String,
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub text_color: String,
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub accent_color: String,
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub cta_background_color: String,
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub cta_text_color: String,
    #[validate(custom(function = "shared::validation::validate_color"))]
    pub border_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_end: Option<String>,

    // Background & frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_preset: Option<BackgroundPreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_transparent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_border_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_border_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_border_inset: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_shadow: Option<BlockShadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_shadow_color: Option<String>,

    // Sports double-border frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_sports_frame: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_auto_palette: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_outer_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_outer_alt_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_inner_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_corner_radius: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_gap_thickness: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_use_gradient: Option<bool>,

    // Layout
    #[validate(range(min = 0, max = 200, message = "Padding must be 0-200px"))]
    pub padding: i32,
    #[validate(range(min = 0, max = 200, message = "Margin must be 0-200px"))]
    pub margin: i32,
    #[validate(range(min = 0, max = 50, message = "Border width must be 0-50px"))]
    pub border_width: i32,
    #[validate(range(min = 0, max = 200, message = "Border radius must be 0-200px"))]
    pub border_radius: i32,
    pub shadow_intensity: i32,
    pub column_layout: ColumnLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_style: Option<CardStyle>,

    // Visibility
    pub show_images: bool,
    pub show_times: bool,
    pub show_venue: bool,
    pub show_cta: bool,
    pub show_concierge_link: bool,
    pub show_prices: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_matchup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_header_detail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image_mode: Option<HeroImageMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_secondary_images: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_time_in_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_time_per_row: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_identical_times: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_slate_label: Option<bool>,

    // Comedy visibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_comedian_photo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_opener: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_age_restriction: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_content_warning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tour_name: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_recording_badge: Option<bool>,

    // Add-on visibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_parent_event: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_lot_map: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_access_areas: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_valid_days: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_upgrade_includes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_shuttle_schedule: Option<bool>,

    // CTA
    #[validate(length(max = 100, message = "CTA text must be at most 100 characters"))]
    pub cta_text: String,
    pub cta_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_cta_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_icon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concierge_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concierge_no_url_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concierge_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concierge_underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concierge_icon: Option<bool>,

    // Dual CTA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tickets_cta: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets_cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets_cta_style: Option<CtaStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets_cta_icon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_email_cta: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_cta_style: Option<CtaStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_cta_icon: Option<bool>,

    // Group templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine_groups: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_title_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slate_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_blurb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fill_header_date: Option<bool>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            font_heading: "Sora".to_string(),
            font_body: "DM Sans".to_string(),
            font_size_title: 28,
            font_size_body: 14,
            font_size_subtitle: 18,
            letter_spacing: 0.0,
            line_height: 1.5,
            title_color_mode: None,
            body_color_mode: None,
            title_size: None,
            title_fill_row: None,
            font_pairing: None,
            background_color: "#1a1a1a".to_string(),
            text_color: "#ffffff".to_string(),
            accent_color: "#f5a623".to_string(),
            cta_background_color: "#f5a623".to_string(),
            cta_text_color: "#1a1a1a".to_string(),
            border_color: "#333333".to_string(),
            glow_color: None,
            gradient_start: None,
            gradient_end: None,
            bg_preset: None,
            background_transparent: None,
            inner_border_enabled: None,
            inner_border_color: None,
            inner_border_width: None,
            inner_border_inset: None,
            block_shadow: None,
            block_shadow_color: None,
            enable_sports_frame: None,
            sports_auto_palette: None,
            sports_outer_color: None,
            sports_outer_alt_color: None,
            sports_inner_color: None,
            sports_corner_radius: None,
            sports_gap_thickness: None,
            sports_use_gradient: None,
            padding: 24,
            margin: 16,
            border_width: 0,
            border_radius: 8,
            shadow_intensity: 0,
            column_layout: ColumnLayout::Single,
            card_style: None,
            show_images: true,
            show_times: true,
            show_venue: true,
            show_cta: true,
            show_concierge_link: true,
            show_prices: true,
            show_matchup: None,
            show_header_detail: None,
            hero_image_mode: None,
            show_secondary_images: None,
            show_time_in_header: None,
            show_time_per_row: None,
            collapse_identical_times: None,
            show_slate_label: None,
            show_comedian_photo: None,
            show_opener: None,
            show_age_restriction: None,
            show_content_warning: None,
            show_tour_name: None,
            show_recording_badge: None,
            show_parent_event: None,
            show_lot_map: None,
            show_access_areas: None,
            show_valid_days: None,
            show_upgrade_includes: None,
            show_shuttle_schedule: None,
            cta_text: "Get Tickets".to_string(),
            cta_link: "mailto:concierge@firstclasstixx.com".to_string(),
            cta_enabled: None,
            event_cta_enabled: None,
            event_underline: None,
            event_icon: None,
            concierge_label: None,
            concierge_no_url_label: None,
            concierge_color: None,
            concierge_underline: None,
            concierge_icon: None,
            show_tickets_cta: Some(true),
            tickets_cta_text: Some("View Tickets".to_string()),
            tickets_cta_style: Some(CtaStyle::Link),
            tickets_cta_icon: Some(true),
            show_email_cta: Some(true),
            email_cta_text: Some("Email".to_string()),
            email_cta_style: Some(CtaStyle::Link),
            email_cta_icon: Some(true),
            combine_groups: None,
            combined_title_override: None,
            slate_override: None,
            custom_blurb: None,
            auto_fill_header_date: None,
        }
    }
}

/// Outcome of overlaying a partial config onto the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    pub config: TemplateConfig,
    /// Keys that were present but carried a value of the wrong shape.
    pub ignored_fields: Vec<String>,
}

impl TemplateConfig {
    /// Overlays `partial` onto the defaults key by key.
    ///
    /// Explicit keys win, absent keys keep their default, and keys whose
    /// value does not fit the field are dropped and reported. Unknown keys
    /// are ignored silently.
    pub fn merge_with_defaults(partial: &Map<String, Value>) -> MergedConfig {
        Self::default().merge(partial)
    }

    /// Overlays `partial` onto this config.
    pub fn merge(&self, partial: &Map<String, Value>) -> MergedConfig {
        let mut base = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let mut ignored_fields = Vec::new();

        for (key, value) in partial {
            if !FIELD_NAMES.contains(&key.as_str()) {
                continue;
            }
            let mut candidate = base.clone();
            candidate.insert(key.clone(), value.clone());
            match serde_json::from_value::<TemplateConfig>(Value::Object(candidate.clone())) {
                Ok(_) => base = candidate,
                Err(_) => ignored_fields.push(key.clone()),
            }
        }

        let config = serde_json::from_value(Value::Object(base)).unwrap_or_else(|_| self.clone());
        MergedConfig {
            config,
            ignored_fields,
        }
    }
}
