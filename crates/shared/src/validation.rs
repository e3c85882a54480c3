//! Common validation utilities.

use validator::ValidationError;

/// Maximum number of style tags on a single template.
pub const MAX_STYLE_TAGS: usize = 20;

/// Maximum length of a single style tag.
pub const MAX_STYLE_TAG_LENGTH: usize = 40;

lazy_static::lazy_static! {
    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub static ref HEX_COLOR_REGEX: regex::Regex =
        regex::Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();

    /// `rgb(...)` or `rgba(...)` functional notation.
    pub static ref RGB_FUNCTION_REGEX: regex::Regex =
        regex::Regex::new(r"^rgba?\(\s*[0-9.%\s,/]+\)$").unwrap();

    /// Slug-like tag: lowercase words separated by dashes.
    pub static ref STYLE_TAG_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Returns true if the value is a hex or `rgb()/rgba()` color literal.
pub fn is_color_literal(value: &str) -> bool {
    let value = value.trim();
    HEX_COLOR_REGEX.is_match(value) || RGB_FUNCTION_REGEX.is_match(&value.to_ascii_lowercase())
}

/// Validates that a string is a CSS color literal usable in a template config.
pub fn validate_color(value: &str) -> Result<(), ValidationError> {
    if is_color_literal(value) || value.trim().eq_ignore_ascii_case("transparent") {
        Ok(())
    } else {
        let mut err = ValidationError::new("color_format");
        err.message = Some("Color must be a hex value or rgb()/rgba() literal".into());
        Err(err)
    }
}

/// Validates the style tag list attached to a template.
pub fn validate_style_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_STYLE_TAGS {
        return Err(ValidationError::new("too_many_style_tags").with_message(
            std::borrow::Cow::Borrowed("A template can carry at most 20 style tags"),
        ));
    }
    for tag in tags {
        if tag.len() > MAX_STYLE_TAG_LENGTH || !STYLE_TAG_REGEX.is_match(tag) {
            return Err(ValidationError::new("style_tag_format").with_message(
                std::borrow::Cow::Borrowed(
                    "Style tags must be lowercase words separated by dashes (max 40 characters)",
                ),
            ));
        }
    }
    Ok(())
}

/// Validates that a name is not blank once trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
