//! Best-effort `TemplateConfig` inference from a markup fragment.
//!
//! Each config field has an ordered list of strategies returning
//! `Option<T>`. The first strategy that yields a value wins; a field no
//! strategy resolves keeps its default.

use std::collections::BTreeMap;

use regex::Regex;

use super::extract::root_style_attribute;
use super::heuristics::ImportHeuristics;
use crate::models::{TemplateConfig, ThemeMode};

lazy_static::lazy_static! {
    static ref COLOR_LITERAL_REGEX: Regex =
        Regex::new(r"(?i)#[0-9a-f]{3,8}\b|rgba?\([^)]*\)").unwrap();

    static ref FONT_TOKEN_REGEX: Regex =
        Regex::new(r"(?i)^var\(\s*--font-([a-z0-9-]+)\s*\)").unwrap();

    static ref INLINE_BACKGROUND_REGEX: Regex =
        Regex::new(r#"(?i)(?:^|[\s;"'{])background(?:-color)?\s*:\s*([^;"'>]+)"#).unwrap();

    static ref INLINE_COLOR_REGEX: Regex =
        Regex::new(r#"(?i)(?:^|[\s;"'{])color\s*:\s*(#[0-9a-f]{3,8}\b|rgba?\([^)]*\))"#).unwrap();

    static ref INLINE_ACCENT_REGEX: Regex = Regex::new(
        r#"(?i)(?:^|[\s;"'{])color\s*:\s*(#[0-9a-f]{3,8})\b[^>]*>\s*(?:View|Email|Get|Buy)"#
    )
    .unwrap();

    static ref INLINE_CTA_BACKGROUND_REGEX: Regex = Regex::new(
        r"(?i)background(?:-color)?\s*:\s*(#[0-9a-f]{3,8})\b[^>]*>[^<]*(?:Ticket|Get|Buy|Search)"
    )
    .unwrap();

    static ref DARK_HEX_REGEX: Regex = Regex::new(r"#[0-3][0-9a-fA-F]{5}").unwrap();

    static ref BORDER_RADIUS_REGEX: Regex =
        Regex::new(r"(?i)border-radius\s*:\s*(\d+)px").unwrap();

    static ref BORDER_SHORTHAND_REGEX: Regex = Regex::new(
        r#"(?i)(?:^|[\s;"'{])border\s*:\s*(\d+)px\s+solid\s+(#[0-9a-f]{3,8})\b"#
    )
    .unwrap();

    static ref PADDING_REGEX: Regex =
        Regex::new(r#"(?i)(?:^|[\s;"'{])padding\s*:\s*(\d+)px"#).unwrap();

    static ref FONT_FAMILY_REGEX: Regex =
        Regex::new(r"(?i)font-family\s*:\s*'([^']+)'").unwrap();

    static ref TITLE_SIZE_REGEX: Regex = Regex::new(
        r"(?i)font-size\s*:\s*(\d+)px[^>]*font-weight\s*:\s*(?:bold|900|800|700)"
    )
    .unwrap();
}

/// What the strategies look at.
pub struct StyleInput<'a> {
    pub html: &'a str,
    pub custom_properties: CustomProperties,
    pub heuristics: &'a ImportHeuristics,
}

impl<'a> StyleInput<'a> {
    pub fn new(html: &'a str, heuristics: &'a ImportHeuristics) -> Self {
        let custom_properties = root_style_attribute(html)
            .map(|style| CustomProperties::parse(&style))
            .unwrap_or_default();
        Self {
            html,
            custom_properties,
            heuristics,
        }
    }
}

/// `--name: value` declarations of a single style attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomProperties {
    declarations: Vec<(String, String)>,
}

impl CustomProperties {
    pub fn parse(style: &str) -> Self {
        let declarations = split_declarations(style)
            .into_iter()
            .filter_map(|declaration| {
                let (name, value) = declaration.split_once(':')?;
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim();
                (name.starts_with("--") && !value.is_empty())
                    .then(|| (name, value.to_string()))
            })
            .collect();
        Self { declarations }
    }

    /// Value of the first listed name that is declared.
    pub fn get(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|wanted| {
            let wanted = wanted.to_ascii_lowercase();
            self.declarations
                .iter()
                .find(|(name, _)| *name == wanted)
                .map(|(_, value)| value.as_str())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Splits on `;` outside parentheses and quotes.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

type StrategyFn<'s, T> = Box<dyn Fn(&StyleInput) -> Option<T> + 's>;

/// Ordered strategies for one field.
pub struct Strategies<'s, T> {
    steps: Vec<(&'static str, StrategyFn<'s, T>)>,
}

/// A resolved value and the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: &'static str,
}

impl<'s, T> Default for Strategies<'s, T> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<'s, T> Strategies<'s, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then<F>(mut self, name: &'static str, strategy: F) -> Self
    where
        F: Fn(&StyleInput) -> Option<T> + 's,
    {
        self.steps.push((name, Box::new(strategy)));
        self
    }

    pub fn resolve(&self, input: &StyleInput) -> Option<Resolved<T>> {
        self.steps.iter().find_map(|(name, strategy)| {
            strategy(input).map(|value| Resolved {
                value,
                source: *name,
            })
        })
    }
}

/// Config plus the strategy that set each inferred field.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredConfig {
    pub config: TemplateConfig,
    /// camelCase field name to strategy name.
    pub sources: BTreeMap<&'static str, &'static str>,
}

impl InferredConfig {
    pub fn theme_mode(&self) -> ThemeMode {
        theme_for_background(&self.config.background_color)
    }
}

/// Dark when the background's luminance is low; unparseable colors count as
/// light.
pub fn theme_for_background(color: &str) -> ThemeMode {
    match shared::color::is_dark(color) {
        Some(true) => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// Suffix used in generated names. Only a six-digit hex background whose
/// first digit is 0-3 reads as dark here, independent of `theme_for_background`.
pub fn name_theme_label(color: &str) -> &'static str {
    if DARK_HEX_REGEX.is_match(color) {
        "Dark"
    } else {
        "Light"
    }
}

/// First embedded hex or `rgb()/rgba()` literal of a value.
pub fn first_color_literal(value: &str) -> Option<String> {
    COLOR_LITERAL_REGEX
        .find(value)
        .map(|m| m.as_str().to_string())
}

/// Font family named by a custom property value.
pub fn resolve_font(value: &str, heuristics: &ImportHeuristics, heading: bool) -> Option<String> {
    let value = value.trim();
    if let Some(caps) = FONT_TOKEN_REGEX.captures(value) {
        return Some(heuristics.resolve_font_token(&caps[1], heading));
    }
    let family = value
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    (!family.is_empty()).then(|| family.to_string())
}

fn custom_color(input: &StyleInput, names: &[&str]) -> Option<String> {
    input
        .custom_properties
        .get(names)
        .and_then(first_color_literal)
}

fn custom_font(input: &StyleInput, names: &[&str], heading: bool) -> Option<String> {
    input
        .custom_properties
        .get(names)
        .and_then(|value| resolve_font(value, input.heuristics, heading))
}

fn capture(regex: &Regex, html: &str, group: usize) -> Option<String> {
    regex
        .captures(html)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim().to_string())
}

fn capture_px(regex: &Regex, html: &str, group: usize) -> Option<i32> {
    capture(regex, html, group).and_then(|n| n.parse().ok())
}

fn inline_background(input: &StyleInput) -> Option<String> {
    INLINE_BACKGROUND_REGEX
        .captures_iter(input.html)
        .find_map(|caps| first_color_literal(&caps[1]))
}

const ACCENT: &[&str] = &["--accent"];
const BACKGROUND: &[&str] = &["--bg", "--card-bg"];
const BORDER: &[&str] = &["--border", "--card-border"];
const TEXT: &[&str] = &["--text"];
const ACCENT_TEXT: &[&str] = &["--accentText"];
const TITLE_FONT: &[&str] = &["--titleFont", "--title-font"];
const BODY_FONT: &[&str] = &["--bodyFont", "--body-font"];

/// Runs every field's strategies over the fragment.
pub fn infer_config(html: &str, heuristics: &ImportHeuristics) -> InferredConfig {
    let input = StyleInput::new(html, heuristics);
    let mut config = TemplateConfig::default();
    let mut sources = BTreeMap::new();

    macro_rules! apply {
        ($field:ident, $key:literal, $strategies:expr) => {
            if let Some(resolved) = $strategies.resolve(&input) {
                config.$field = resolved.value;
                sources.insert($key, resolved.source);
            }
        };
    }

    apply!(
        accent_color,
        "accentColor",
        Strategies::new()
            .then("custom-property", |i: &StyleInput| custom_color(i, ACCENT))
            .then("inline-accent", |i: &StyleInput| capture(&INLINE_ACCENT_REGEX, i.html, 1))
    );
    apply!(
        cta_background_color,
        "ctaBackgroundColor",
        Strategies::new()
            .then("custom-property", |i: &StyleInput| custom_color(i, ACCENT))
            .then("inline-cta", |i: &StyleInput| {
                capture(&INLINE_CTA_BACKGROUND_REGEX, i.html, 1)
            })
    );
    apply!(
        background_color,
        "backgroundColor",
        Strategies::new()
            .then("custom-property", |i: &StyleInput| custom_color(i, BACKGROUND))
            .then("inline-background", inline_background)
    );
    apply!(
        border_color,
        "borderColor",
        Strategies::new()
            .then("custom-property", |i: &StyleInput| custom_color(i, BORDER))
            .then("inline-border", |i: &StyleInput| capture(&BORDER_SHORTHAND_REGEX, i.html, 2))
    );
    apply!(
        border_width,
        "borderWidth",
        Strategies::new().then("inline-border", |i: &StyleInput| {
            capture_px(&BORDER_SHORTHAND_REGEX, i.html, 1)
        })
    );
    apply!(
        text_color,
        "textColor",
        Strategies::new()
            .then("custom-property", |i: &StyleInput| custom_color(i, TEXT))
            .then("inline-color", |i: &StyleInput| capture(&INLINE_COLOR_REGEX, i.html, 1))
    );
    apply!(
        cta_text_color,
        "ctaTextColor",
        Strategies::new().then("custom-property", |i: &StyleInput| custom_color(i, ACCENT_TEXT))
    );
    apply!(
        font_heading,
        "fontHeading",
        Strategies::new()
            .then("custom-property", |i: &StyleInput| {
                custom_font(i, TITLE_FONT, true)
            })
            .then("inline-font-family", |i: &StyleInput| capture(&FONT_FAMILY_REGEX, i.html, 1))
    );
    apply!(
        font_body,
        "fontBody",
        Strategies::new().then("custom-property", |i: &StyleInput| {
            custom_font(i, BODY_FONT, false)
        })
    );
    apply!(
        border_radius,
        "borderRadius",
        Strategies::new().then("inline-border-radius", |i: &StyleInput| {
            capture_px(&BORDER_RADIUS_REGEX, i.html, 1)
        })
    );
    apply!(
        padding,
        "padding",
        Strategies::new().then("inline-padding", |i: &StyleInput| capture_px(&PADDING_REGEX, i.html, 1))
    );
    apply!(
        font_size_title,
        "fontSizeTitle",
        Strategies::new().then("inline-title-size", |i: &StyleInput| {
            capture_px(&TITLE_SIZE_REGEX, i.html, 1)
        })
    );

    InferredConfig { config, sources }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(html: &str) -> InferredConfig {
        infer_config(html, &ImportHeuristics::default())
    }

    #[test]
    fn test_card_custom_properties() {
        let html = r#"<div class="card" style="--bg:#111827;--accent:#10b981;--titleFont:var(--font-sans-1);"><div class="title">Premium Parking</div></div>"#;
        let inferred = infer(html);
        assert_eq!(inferred.config.background_color, "#111827");
        assert_eq!(inferred.config.accent_color, "#10b981");
        assert_eq!(inferred.config.cta_background_color, "#10b981");
        assert_eq!(inferred.config.font_heading, "Inter");
        assert_eq!(inferred.sources["backgroundColor"], "custom-property");
        assert_eq!(inferred.theme_mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_gradient_reduced_to_first_color() {
        let html = r#"<div style="--card-bg: radial-gradient(circle at top, rgba(16,185,129,0.2), #0b1020 60%); --card-border: rgba(255,255,255,0.08); --title-font: var(--font-serif-1); --body-font: var(--font-unknown)">x</div>"#;
        let config = infer(html).config;
        assert_eq!(config.background_color, "rgba(16,185,129,0.2)");
        assert_eq!(config.border_color, "rgba(255,255,255,0.08)");
        assert_eq!(config.font_heading, "Playfair Display");
        assert_eq!(config.font_body, "DM Sans");
    }

    #[test]
    fn test_plain_font_family_value() {
        let html = r#"<div style="--titleFont: 'Bebas Neue', sans-serif; --bodyFont: Lora">x</div>"#;
        let config = infer(html).config;
        assert_eq!(config.font_heading, "Bebas Neue");
        assert_eq!(config.font_body, "Lora");
    }

    #[test]
    fn test_custom_property_beats_inline() {
        let html = r#"<div style="--accent:#ff0000; background:#ffffff"><a style="color:#00ff00">View tickets</a></div>"#;
        let inferred = infer(html);
        assert_eq!(inferred.config.accent_color, "#ff0000");
        assert_eq!(inferred.config.background_color, "#ffffff");
        assert_eq!(inferred.sources["backgroundColor"], "inline-background");
    }

    #[test]
    fn test_inline_fallbacks() {
        let html = concat!(
            r#"<div style="max-width: 600px; background-color: #0a0a0a; border-radius: 12px; "#,
            r#"border: 2px solid #333333; padding: 32px; font-family: 'Oswald', sans-serif">"#,
            r#"<h1 style="font-size: 36px; font-weight: 800; color: #fafafa">Title</h1>"#,
            r#"<a style="background: #e11d48; color: #ffd700">Get Tickets</a>"#,
            "</div>",
        );
        let inferred = infer(html);
        let config = &inferred.config;
        assert_eq!(config.background_color, "#0a0a0a");
        assert_eq!(config.border_radius, 12);
        assert_eq!(config.border_width, 2);
        assert_eq!(config.border_color, "#333333");
        assert_eq!(config.padding, 32);
        assert_eq!(config.font_heading, "Oswald");
        assert_eq!(config.font_size_title, 36);
        assert_eq!(config.text_color, "#fafafa");
        assert_eq!(config.accent_color, "#ffd700");
        assert_eq!(config.cta_background_color, "#e11d48");
        assert_eq!(inferred.sources["padding"], "inline-padding");
    }

    #[test]
    fn test_prefixed_properties_do_not_leak() {
        let html = r#"<div style="border-color: #123456; padding-top: 40px; background-image: url(x.png)">x</div>"#;
        let inferred = infer(html);
        assert_eq!(inferred.config, TemplateConfig::default());
        assert!(inferred.sources.is_empty());
    }

    #[test]
    fn test_defaults_survive_without_signals() {
        let inferred = infer("<p>nothing to see</p>");
        assert_eq!(inferred.config, TemplateConfig::default());
        assert_eq!(inferred.theme_mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_theme_for_background() {
        assert_eq!(theme_for_background("#ffffff"), ThemeMode::Light);
        assert_eq!(theme_for_background("#0b1020"), ThemeMode::Dark);
        assert_eq!(theme_for_background("not-a-color"), ThemeMode::Light);
    }

    #[test]
    fn test_name_theme_label() {
        assert_eq!(name_theme_label("#1a1a1a"), "Dark");
        assert_eq!(name_theme_label("#3FFFFF"), "Dark");
        assert_eq!(name_theme_label("#5a0000"), "Light");
        assert_eq!(name_theme_label("#111"), "Light");
        assert_eq!(name_theme_label("rgb(0, 0, 0)"), "Light");
        // Luminance still drives the theme mode.
        assert_eq!(theme_for_background("#5a0000"), ThemeMode::Dark);
        assert_eq!(theme_for_background("#111"), ThemeMode::Dark);
    }

    #[test]
    fn test_split_declarations_respects_parentheses() {
        let props = CustomProperties::parse(
            "--bg: linear-gradient(90deg, #000 0%; #fff 100%); --Text: #eee; color: red",
        );
        assert_eq!(props.get(&["--bg"]), Some("linear-gradient(90deg, #000 0%; #fff 100%)"));
        assert_eq!(props.get(&["--text"]), Some("#eee"));
        assert_eq!(props.get(&["color"]), None);
    }

    #[test]
    fn test_strategies_first_match_wins() {
        let heuristics = ImportHeuristics::default();
        let input = StyleInput::new("<div>x</div>", &heuristics);
        let strategies = Strategies::new()
            .then("none", |_: &StyleInput| None)
            .then("first", |_: &StyleInput| Some(1))
            .then("second", |_: &StyleInput| Some(2));
        assert_eq!(
            strategies.resolve(&input),
            Some(Resolved {
                value: 1,
                source: "first"
            })
        );
        assert!(Strategies::<i32>::new().resolve(&input).is_none());
    }
}
