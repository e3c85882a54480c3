//! HTML import: sanitizing, fragment strategies and candidate assembly.

use regex::Regex;

use super::classify::{
    classify, is_layout_section_class, layout_from_section_class, layout_style_from_label,
    layout_style_label,
};
use super::extract::{extract_elements, split_max_width_containers};
use super::heuristics::ImportHeuristics;
use super::inference::{infer_config, name_theme_label, InferredConfig};
use super::title::{extract_subtitle, extract_title};
use crate::models::{GroupLayoutStyle, LayoutType, ParsedTemplate, TemplateCategory, ThemeMode};

lazy_static::lazy_static! {
    static ref SANITIZE_PATTERNS: Vec<Regex> = [
        r"(?i)<!doctype[^>]*>",
        r"(?i)</?html\b[^>]*>",
        r"(?is)<head\b[^>]*>.*?</head\s*>",
        r"(?i)</?body\b[^>]*>",
        r"(?is)<style\b[^>]*>.*?</style\s*>",
        r"(?i)<link\b[^>]*>",
        r"(?i)<meta\b[^>]*>",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
}

/// Which strategy produced a set of fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentStrategy {
    Cards,
    Articles,
    MaxWidthContainers,
    WholeInput,
}

/// A fragment plus what its strategy knows about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFragment {
    pub html: String,
    pub class: Option<String>,
    pub section_context: Option<LayoutType>,
}

impl SourceFragment {
    fn plain(html: String) -> Self {
        Self {
            html,
            class: None,
            section_context: None,
        }
    }
}

/// Strips document wrappers, head content, styles, links and meta tags.
pub fn sanitize_html(input: &str) -> String {
    SANITIZE_PATTERNS
        .iter()
        .fold(input.to_string(), |html, pattern| {
            pattern.replace_all(&html, "").into_owned()
        })
        .trim()
        .to_string()
}

/// Locates template fragments, trying each strategy until one finds any.
pub fn locate_fragments(
    clean: &str,
    heuristics: &ImportHeuristics,
) -> (FragmentStrategy, Vec<SourceFragment>) {
    let prefix = heuristics.card_class_prefix.to_lowercase();
    let cards: Vec<SourceFragment> = extract_elements(clean, "div", |class| {
        class.is_some_and(|c| c.trim().to_lowercase().starts_with(&prefix))
    })
    .into_iter()
    .map(|element| SourceFragment {
        html: element.html,
        class: element.class,
        section_context: None,
    })
    .collect();
    if !cards.is_empty() {
        return (FragmentStrategy::Cards, cards);
    }

    let articles = article_fragments(clean);
    if !articles.is_empty() {
        return (FragmentStrategy::Articles, articles);
    }

    let containers: Vec<SourceFragment> = split_max_width_containers(clean)
        .into_iter()
        .map(SourceFragment::plain)
        .collect();
    if !containers.is_empty() {
        return (FragmentStrategy::MaxWidthContainers, containers);
    }

    (
        FragmentStrategy::WholeInput,
        vec![SourceFragment::plain(clean.to_string())],
    )
}

/// Articles inside layout sections carry the section's layout. Without any
/// such section, every top-level article is used as is.
fn article_fragments(clean: &str) -> Vec<SourceFragment> {
    let sections = extract_elements(clean, "section", |class| {
        class.is_some_and(is_layout_section_class)
    });

    let scoped: Vec<SourceFragment> = sections
        .iter()
        .flat_map(|section| {
            let context = section.class.as_deref().and_then(layout_from_section_class);
            extract_elements(&section.html, "article", |_| true)
                .into_iter()
                .map(move |article| SourceFragment {
                    html: article.html,
                    class: article.class,
                    section_context: context,
                })
        })
        .collect();
    if !scoped.is_empty() {
        return scoped;
    }

    extract_elements(clean, "article", |_| true)
        .into_iter()
        .map(|article| SourceFragment {
            html: article.html,
            class: article.class,
            section_context: None,
        })
        .collect()
}

/// Parses pasted HTML into one template per located fragment.
pub fn parse_html_template(input: &str, heuristics: &ImportHeuristics) -> Vec<ParsedTemplate> {
    let clean = sanitize_html(input);
    let (strategy, fragments) = locate_fragments(&clean, heuristics);
    tracing::debug!(
        strategy = ?strategy,
        fragments = fragments.len(),
        "Located HTML template fragments"
    );

    fragments
        .into_iter()
        .enumerate()
        .map(|(index, fragment)| match strategy {
            FragmentStrategy::Cards => card_template(fragment, index, heuristics),
            _ => container_template(fragment, index, heuristics),
        })
        .collect()
}

fn card_template(fragment: SourceFragment, index: usize, heuristics: &ImportHeuristics) -> ParsedTemplate {
    let inferred = infer_config(&fragment.html, heuristics);
    let theme_mode = inferred.theme_mode();
    let classification = classify(
        &fragment.html,
        fragment.class.as_deref(),
        fragment.section_context,
        heuristics,
    );
    let layout_type = classification.layout_type;
    let style_label = fragment.class.as_deref().and_then(layout_style_label);
    let title = extract_title(&fragment.html);
    let kicker = extract_subtitle(&fragment.html);

    let suffix = style_label
        .as_ref()
        .map(|label| format!(" ({})", label))
        .unwrap_or_default();
    let name = match &title {
        Some(title) => format!("{}{}", title, suffix),
        None => format!(
            "Imported {} Template {}{}",
            layout_type.label(),
            index + 1,
            suffix
        ),
    };
    let description = match &kicker {
        Some(kicker) => format!("{} - {} layout", kicker, layout_type),
        None => format!("{} layout", layout_type),
    };

    assemble(
        fragment.html,
        name,
        description,
        layout_type,
        classification.category,
        style_label.as_deref().and_then(layout_style_from_label),
        inferred,
        theme_mode,
    )
}

fn container_template(
    fragment: SourceFragment,
    index: usize,
    heuristics: &ImportHeuristics,
) -> ParsedTemplate {
    let inferred = infer_config(&fragment.html, heuristics);
    let theme_mode = inferred.theme_mode();
    let classification = classify(
        &fragment.html,
        fragment.class.as_deref(),
        fragment.section_context,
        heuristics,
    );
    let layout_type = classification.layout_type;
    let title = extract_title(&fragment.html);

    let (name, description) = match &title {
        Some(title) => (
            format!("{} ({})", title, layout_type.label()),
            format!("{} - {} layout", title, layout_type),
        ),
        None => {
            let theme = name_theme_label(&inferred.config.background_color);
            (
                format!(
                    "Imported {} Template {} ({})",
                    layout_type.label(),
                    index + 1,
                    theme
                ),
                format!("Imported from HTML - {} layout", layout_type),
            )
        }
    };

    assemble(
        fragment.html,
        name,
        description,
        layout_type,
        classification.category,
        None,
        inferred,
        theme_mode,
    )
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    html: String,
    name: String,
    description: String,
    layout_type: LayoutType,
    category: TemplateCategory,
    layout_style: Option<GroupLayoutStyle>,
    inferred: InferredConfig,
    theme_mode: ThemeMode,
) -> ParsedTemplate {
    ParsedTemplate {
        layout_style,
        config: inferred.config,
        description: Some(description),
        theme_mode: Some(theme_mode),
        ..ParsedTemplate::new(name, category, layout_type, html)
    }
}
