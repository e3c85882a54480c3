//! Balanced-tag fragment extraction.
//!
//! Pasted markup routinely nests elements of the same name (a card `div`
//! full of `div`s, an `article` inside an `article`), so fragments are found
//! by counting open and close tags rather than by matching the next close.
//! All scanning happens on an ASCII-lowercased copy, which keeps byte
//! offsets identical to the original input.

use regex::Regex;

lazy_static::lazy_static! {
    static ref CLASS_ATTR_REGEX: Regex =
        Regex::new(r#"(?is)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#).unwrap();

    static ref STYLE_ATTR_REGEX: Regex =
        Regex::new(r#"(?is)(?:^|\s)style\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();

    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();

    static ref NUMERIC_ENTITY_REGEX: Regex = Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap();

    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();

    static ref MAX_WIDTH_CONTAINER_REGEX: Regex = Regex::new(
        r#"(?i)<div\b[^>]*\bstyle\s*=\s*["'][^"']*max-width\s*:\s*600px"#
    )
    .unwrap();
}

/// A balanced element located in some source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Byte offset of the `<` that opens the element.
    pub start: usize,
    /// Byte offset just past the closing tag.
    pub end: usize,
    /// Byte offset just past the opening tag's `>`.
    pub inner_start: usize,
    /// Byte offset of the closing tag's `<`.
    pub inner_end: usize,
    pub tag: String,
    /// Raw value of the opening tag's `class` attribute.
    pub class: Option<String>,
    /// Outer HTML.
    pub html: String,
}

impl Element {
    pub fn inner_html<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.inner_start..self.inner_end).unwrap_or("")
    }
}

enum Balance {
    Closed { inner_end: usize, end: usize },
    Unclosed,
}

/// Returns the outer HTML of every top-level `tag` element, optionally
/// restricted to elements whose class attribute starts with `class_prefix`.
pub fn extract_fragments_by_tag(html: &str, tag: &str, class_prefix: Option<&str>) -> Vec<String> {
    let prefix = class_prefix.map(|p| p.to_ascii_lowercase());
    extract_elements(html, tag, |class| match (&prefix, class) {
        (None, _) => true,
        (Some(prefix), Some(class)) => class.trim().to_ascii_lowercase().starts_with(prefix),
        (Some(_), None) => false,
    })
    .into_iter()
    .map(|element| element.html)
    .collect()
}

/// Balanced extraction with an arbitrary predicate over the class attribute.
///
/// Elements nested inside an already extracted element are not reported.
/// Scanning stops at the first element that is never closed, keeping the
/// elements found before it.
pub fn extract_elements<F>(html: &str, tag: &str, accept: F) -> Vec<Element>
where
    F: Fn(Option<&str>) -> bool,
{
    let tag = tag.to_ascii_lowercase();
    let lower = html.to_ascii_lowercase();
    let mut elements = Vec::new();
    let mut cursor = 0;
    let mut covered_until = 0;

    while let Some(start) = find_open(&lower, &tag, cursor) {
        cursor = start + 1;
        if start < covered_until {
            continue;
        }
        let Some(open_end) = opening_tag_end(&lower, start) else {
            break;
        };
        let class = class_attribute(&html[start..open_end]);
        if !accept(class.as_deref()) {
            // Nothing inside an opening tag can start another element.
            cursor = open_end;
            continue;
        }
        match balance(&lower, &tag, start, open_end) {
            Balance::Closed { inner_end, end } => {
                covered_until = end;
                elements.push(Element {
                    start,
                    end,
                    inner_start: open_end,
                    inner_end,
                    tag: tag.clone(),
                    class,
                    html: html[start..end].to_string(),
                });
            }
            Balance::Unclosed => break,
        }
    }

    elements
}

/// Balances the element whose opening tag starts at `start`.
pub fn element_at(html: &str, start: usize) -> Option<Element> {
    let lower = html.to_ascii_lowercase();
    let rest = lower.get(start + 1..)?;
    let name_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
        .count();
    if name_len == 0 {
        return None;
    }
    let tag = rest[..name_len].to_string();
    let open_end = opening_tag_end(&lower, start)?;
    match balance(&lower, &tag, start, open_end) {
        Balance::Closed { inner_end, end } => Some(Element {
            start,
            end,
            inner_start: open_end,
            inner_end,
            class: class_attribute(&html[start..open_end]),
            tag,
            html: html[start..end].to_string(),
        }),
        Balance::Unclosed => None,
    }
}

fn balance(lower: &str, tag: &str, start: usize, open_end: usize) -> Balance {
    if is_self_closing(lower, start, open_end) {
        return Balance::Closed {
            inner_end: open_end,
            end: open_end,
        };
    }

    let mut depth = 1usize;
    let mut pos = open_end;
    let mut next_open = find_open(lower, tag, pos);
    let mut next_close = find_close(lower, tag, pos);

    loop {
        let Some((close_start, close_end)) = next_close else {
            return Balance::Unclosed;
        };
        match next_open {
            Some(open) if open < close_start => {
                let Some(nested_end) = opening_tag_end(lower, open) else {
                    return Balance::Unclosed;
                };
                if !is_self_closing(lower, open, nested_end) {
                    depth += 1;
                }
                pos = nested_end;
                next_open = find_open(lower, tag, pos);
                if close_start < pos {
                    next_close = find_close(lower, tag, pos);
                }
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Balance::Closed {
                        inner_end: close_start,
                        end: close_end,
                    };
                }
                pos = close_end;
                next_close = find_close(lower, tag, pos);
                if next_open.is_some_and(|open| open < pos) {
                    next_open = find_open(lower, tag, pos);
                }
            }
        }
    }
}

/// Next `<tag` followed by whitespace, `>` or `/`.
fn find_open(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{}", tag);
    let bytes = lower.as_bytes();
    let mut from = from;
    while let Some(offset) = lower.get(from..)?.find(&needle) {
        let at = from + offset;
        match bytes.get(at + needle.len()) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(at),
            _ => from = at + 1,
        }
    }
    None
}

/// Next `</tag>` (whitespace allowed before `>`), as (start, end).
fn find_close(lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let needle = format!("</{}", tag);
    let bytes = lower.as_bytes();
    let mut from = from;
    while let Some(offset) = lower.get(from..)?.find(&needle) {
        let at = from + offset;
        let mut end = at + needle.len();
        while bytes.get(end).is_some_and(|b| b.is_ascii_whitespace()) {
            end += 1;
        }
        if bytes.get(end) == Some(&b'>') {
            return Some((at, end + 1));
        }
        from = at + 1;
    }
    None
}

/// Offset just past the `>` of the opening tag at `start`. Quotes only
/// count when they open an attribute value.
fn opening_tag_end(lower: &str, start: usize) -> Option<usize> {
    let bytes = lower.as_bytes();
    let mut quote: Option<u8> = None;
    let mut after_equals = false;
    let mut i = start + 1;

    while let Some(&b) = bytes.get(i) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'>' => return Some(i + 1),
                b'"' | b'\'' if after_equals => quote = Some(b),
                b'=' => {
                    after_equals = true;
                    i += 1;
                    continue;
                }
                b if b.is_ascii_whitespace() && after_equals => {
                    i += 1;
                    continue;
                }
                _ => {}
            },
        }
        after_equals = false;
        i += 1;
    }
    None
}

fn is_self_closing(lower: &str, start: usize, open_end: usize) -> bool {
    open_end >= start + 2 && lower.as_bytes().get(open_end - 2) == Some(&b'/')
}

/// `class` attribute value of an opening tag.
pub fn class_attribute(opening_tag: &str) -> Option<String> {
    let inner = opening_tag.trim_start_matches('<');
    let attrs = inner
        .find(|c: char| c.is_whitespace())
        .map(|i| &inner[i..])?;
    CLASS_ATTR_REGEX.captures(attrs).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
    })
}

/// `style` attribute of the first opening tag in `html`.
pub fn root_style_attribute(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let start = lower.find('<')?;
    let end = opening_tag_end(&lower, start)?;
    let tag = &html[start..end];
    let attrs = tag.find(|c: char| c.is_whitespace()).map(|i| &tag[i..])?;
    STYLE_ATTR_REGEX.captures(attrs).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

/// Readable text of a markup snippet: tags dropped, common entities decoded
/// and whitespace collapsed.
pub fn text_content(html: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(html, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE_REGEX.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_REGEX.replace_all(text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix('x').or_else(|| raw.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });
    numeric
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Splits on repeated `max-width: 600px` container divs.
///
/// Each segment runs from one container to the next and must end with a
/// closing `</div>`; a segment that does not is merged into the following
/// one. Text before the first container and an unterminated tail are
/// dropped.
pub fn split_max_width_containers(html: &str) -> Vec<String> {
    let starts: Vec<usize> = MAX_WIDTH_CONTAINER_REGEX
        .find_iter(html)
        .map(|m| m.start())
        .collect();
    let mut segments = Vec::new();
    let mut segment_start: Option<usize> = None;

    for (i, &start) in starts.iter().enumerate() {
        let from = *segment_start.get_or_insert(start);
        let to = starts.get(i + 1).copied().unwrap_or(html.len());
        let segment = html[from..to].trim_end();
        if ends_with_close_div(segment) {
            segments.push(segment.to_string());
            segment_start = None;
        }
    }

    segments
}

fn ends_with_close_div(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 6 && bytes[bytes.len() - 6..].eq_ignore_ascii_case(b"</div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced(fragment: &str, tag: &str) -> bool {
        let lower = fragment.to_ascii_lowercase();
        let opens = lower.matches(&format!("<{} ", tag)).count()
            + lower.matches(&format!("<{}>", tag)).count();
        let closes = lower.matches(&format!("</{}>", tag)).count();
        opens == closes
    }

    #[test]
    fn test_nested_article_is_one_fragment() {
        let input = r#"<article class="a"><article class="b">inner</article>outer</article>"#;
        let fragments = extract_fragments_by_tag(input, "article", None);
        assert_eq!(fragments, vec![input.to_string()]);
    }

    #[test]
    fn test_top_level_siblings_with_deep_nesting() {
        let input = concat!(
            "<article><div><article><article>a</article></article></div></article>",
            "<p>between</p>",
            "<ARTICLE class=\"x\">b<article>c</article></ARTICLE>",
            "<article>d</article>",
        );
        let fragments = extract_fragments_by_tag(input, "article", None);
        assert_eq!(fragments.len(), 3);
        for fragment in &fragments {
            assert!(balanced(fragment, "article"), "{}", fragment);
        }
        assert!(fragments[1].starts_with("<ARTICLE"));
        assert_eq!(fragments[2], "<article>d</article>");
    }

    #[test]
    fn test_tag_name_boundary() {
        let input = "<divider></divider><div>x</div>";
        assert_eq!(extract_fragments_by_tag(input, "div", None), vec!["<div>x</div>"]);
    }

    #[test]
    fn test_class_prefix_filter() {
        let input = concat!(
            r#"<div class="wrapper">"#,
            r#"<div class="card layout-timeline"><div class="title">A</div></div>"#,
            r#"<div class="other">skip</div>"#,
            r#"<div class='Card group'>B</div>"#,
            "</div>",
        );
        let fragments = extract_fragments_by_tag(input, "div", Some("card"));
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains("layout-timeline"));
        assert!(fragments[0].ends_with("A</div></div>"));
        assert_eq!(fragments[1], "<div class='Card group'>B</div>");
    }

    #[test]
    fn test_prefix_must_lead_the_class_value() {
        let input = r#"<div class="sidecard">x</div><div class="cards">y</div>"#;
        let fragments = extract_fragments_by_tag(input, "div", Some("card"));
        assert_eq!(fragments, vec![r#"<div class="cards">y</div>"#.to_string()]);
    }

    #[test]
    fn test_quoted_gt_inside_attribute() {
        let input = r#"<div class="card" data-x="a>b"><div>in</div></div>"#;
        let fragments = extract_fragments_by_tag(input, "div", Some("card"));
        assert_eq!(fragments, vec![input.to_string()]);
    }

    #[test]
    fn test_unclosed_stops_and_keeps_earlier_fragments() {
        let input = "<article>one</article><article>two<article>three</article>";
        let fragments = extract_fragments_by_tag(input, "article", None);
        assert_eq!(fragments, vec!["<article>one</article>".to_string()]);
    }

    #[test]
    fn test_self_closing_nested_tag() {
        let input = "<div>a<div/>b</div>";
        assert_eq!(extract_fragments_by_tag(input, "div", None), vec![input.to_string()]);
    }

    #[test]
    fn test_close_tag_with_whitespace() {
        let input = "<section class=\"group-layout\">x</section >";
        let elements = extract_elements(input, "section", |_| true);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].class.as_deref(), Some("group-layout"));
        assert_eq!(elements[0].inner_html(input), "x");
    }

    #[test]
    fn test_terminates_on_large_malformed_input() {
        let input = "<div class=\"card\"><article><div>".repeat(40_000);
        assert!(input.len() > 1_000_000);
        assert!(extract_fragments_by_tag(&input, "div", Some("card")).is_empty());
        assert!(extract_fragments_by_tag(&input, "article", None).is_empty());

        let unclosed_quotes = "<div class=\"card".repeat(60_000);
        assert!(extract_fragments_by_tag(&unclosed_quotes, "div", None).is_empty());

        let closes_only = "</div></article>".repeat(70_000);
        assert!(extract_fragments_by_tag(&closes_only, "div", None).is_empty());
    }

    #[test]
    fn test_element_at() {
        let input = r#"<div class="card"><h2 class="x">Hi <b>there</b></h2></div>"#;
        let start = input.find("<h2").unwrap();
        let element = element_at(input, start).unwrap();
        assert_eq!(element.tag, "h2");
        assert_eq!(element.class.as_deref(), Some("x"));
        assert_eq!(element.inner_html(input), "Hi <b>there</b>");
        assert!(element_at("<h1>open", 0).is_none());
    }

    #[test]
    fn test_class_attribute_forms() {
        assert_eq!(class_attribute(r#"<div class="a b">"#).as_deref(), Some("a b"));
        assert_eq!(class_attribute("<div class='a'>").as_deref(), Some("a"));
        assert_eq!(class_attribute("<div class=a>").as_deref(), Some("a"));
        assert_eq!(class_attribute(r#"<div data-class="a">"#), None);
        assert_eq!(class_attribute("<div>"), None);
    }

    #[test]
    fn test_root_style_attribute() {
        let html = r#"<div class="card" style="--bg:#111;"><p style="color:red">x</p></div>"#;
        assert_eq!(root_style_attribute(html).as_deref(), Some("--bg:#111;"));
        assert_eq!(root_style_attribute("<div><p style=\"a\"></p></div>"), None);
    }

    #[test]
    fn test_text_content() {
        assert_eq!(
            text_content("<b>Lakers</b>\n  &amp;   <i>Warriors</i>&nbsp;&#8212;&#x41;"),
            "Lakers & Warriors \u{2014}A"
        );
        assert_eq!(text_content("<br/>  "), "");
    }

    #[test]
    fn test_split_max_width_containers() {
        let container = r#"<div style="max-width: 600px; margin: 0 auto">"#;
        let input = format!(
            "intro {c}<div>one</div></div>\n{c}two</div>{c}unterminated",
            c = container
        );
        let segments = split_max_width_containers(&input);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].starts_with(container));
        assert!(segments[0].ends_with("<div>one</div></div>"));
        assert_eq!(segments[1], format!("{}two</div>", container));
    }

    #[test]
    fn test_split_merges_segment_without_close() {
        let container = r#"<div style="max-width:600px">"#;
        let input = format!("{c}a{c}b</div></div>", c = container);
        let segments = split_max_width_containers(&input);
        assert_eq!(segments, vec![input.clone()]);
    }
}
