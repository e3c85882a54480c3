//! Title and subtitle extraction.

use regex::Regex;

use super::extract::{class_attribute, element_at, text_content};

lazy_static::lazy_static! {
    static ref OPEN_TAG_REGEX: Regex =
        Regex::new(r"(?s)<([a-zA-Z][a-zA-Z0-9-]*)(?:\s[^>]*)?>").unwrap();
}

/// Which opening tags a lookup step accepts.
enum Matcher {
    ClassToken(fn(&str) -> bool),
    Tags(&'static [&'static str]),
}

impl Matcher {
    fn accepts(&self, tag: &str, opening_tag: &str) -> bool {
        match self {
            Matcher::ClassToken(predicate) => class_attribute(opening_tag)
                .map(|class| class.split_whitespace().any(|t| predicate(&t.to_lowercase())))
                .unwrap_or(false),
            Matcher::Tags(tags) => tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
        }
    }
}

fn is_title_token(token: &str) -> bool {
    token.contains("title") && !token.contains("subtitle")
}

fn is_event_title_token(token: &str) -> bool {
    token.contains("event-title")
}

fn is_kicker_token(token: &str) -> bool {
    token.contains("kicker")
}

fn is_sub_token(token: &str) -> bool {
    token.contains("sub")
}

fn is_category_token(token: &str) -> bool {
    token.contains("category")
}

const TITLE_STEPS: &[Matcher] = &[
    Matcher::ClassToken(is_title_token),
    Matcher::Tags(&["h1", "h2", "h3"]),
    Matcher::ClassToken(is_event_title_token),
];

const SUBTITLE_STEPS: &[Matcher] = &[
    Matcher::ClassToken(is_kicker_token),
    Matcher::ClassToken(is_sub_token),
    Matcher::ClassToken(is_category_token),
];

/// Display title of a fragment: a `title` class, then a heading, then an
/// `event-title` class.
pub fn extract_title(fragment: &str) -> Option<String> {
    first_text(fragment, TITLE_STEPS)
}

/// Kicker line of a fragment: a `kicker` class, then `sub`, then
/// `category`.
pub fn extract_subtitle(fragment: &str) -> Option<String> {
    first_text(fragment, SUBTITLE_STEPS)
}

fn first_text(fragment: &str, steps: &[Matcher]) -> Option<String> {
    let root = fragment.find('<');
    steps.iter().find_map(|matcher| {
        let start = OPEN_TAG_REGEX.captures_iter(fragment).find_map(|caps| {
            let whole = caps.get(0)?;
            let accepted = Some(whole.start()) != root && matcher.accepts(&caps[1], whole.as_str());
            accepted.then_some(whole.start())
        })?;
        let element = element_at(fragment, start)?;
        let text = text_content(element.inner_html(fragment));
        (!text.is_empty()).then_some(text)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_class() {
        let html = r#"<div class="card"><div class="title">Premium <b>Parking</b></div></div>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Premium Parking"));
    }

    #[test]
    fn test_title_balances_nested_divs() {
        let html = r#"<div class="card"><div class="title"><div>Lakers</div> vs <div>Kings</div></div><div>Tickets</div></div>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Lakers vs Kings"));
    }

    #[test]
    fn test_subtitle_class_is_not_a_title() {
        let html = r#"<div><p class="subtitle">Second</p><h2>Main Event</h2></div>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Main Event"));
        assert_eq!(extract_subtitle(html).as_deref(), Some("Second"));
    }

    #[test]
    fn test_heading_fallback_and_entities() {
        let html = "<article><h3>Rock &amp;  Roll\n Night</h3></article>";
        assert_eq!(extract_title(html).as_deref(), Some("Rock & Roll Night"));
    }

    #[test]
    fn test_root_element_is_skipped() {
        let html = r#"<div class="title-card"><h1>Inner</h1></div>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Inner"));
    }

    #[test]
    fn test_empty_title_falls_through() {
        let html = r#"<div><div class="title">  </div><h1>Fallback</h1></div>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Fallback"));
    }

    #[test]
    fn test_kicker_then_sub_then_category() {
        let html = r#"<div><span class="category">Sports</span><span class="kicker">NBA</span></div>"#;
        assert_eq!(extract_subtitle(html).as_deref(), Some("NBA"));
        let html = r#"<div><span class="category">Sports</span></div>"#;
        assert_eq!(extract_subtitle(html).as_deref(), Some("Sports"));
    }

    #[test]
    fn test_none_when_missing() {
        assert_eq!(extract_title("<div><p>plain</p></div>"), None);
        assert_eq!(extract_subtitle("<div><p>plain</p></div>"), None);
        assert_eq!(extract_title("no markup"), None);
    }

    #[test]
    fn test_unclosed_title_is_ignored() {
        let html = r#"<div><div class="title">Open forever"#;
        assert_eq!(extract_title(html), None);
    }
}
