//! Color math used by template styling.
//!
//! Provides hex/RGB/HSL conversion and the WCAG relative luminance and
//! contrast formulas. Parsing accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and
//! `rgb()/rgba()` literals; alpha is ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum contrast ratio for normal-size text (WCAG AA).
pub const READABLE_CONTRAST_RATIO: f64 = 4.5;

/// Luminance above which black text reads better than white.
pub const DARK_LUMINANCE_THRESHOLD: f64 = 0.179;

/// Errors produced while parsing a color literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),

    #[error("Unsupported color format: {0}")]
    Unsupported(String),
}

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn luminance(&self) -> f64 {
        let channel = |c: u8| {
            let s = c as f64 / 255.0;
            if s <= 0.03928 {
                s / 12.92
            } else {
                ((s + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f64::EPSILON {
            return Hsl {
                h: 0,
                s: 0,
                l: (l * 100.0).round() as u8,
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };

        Hsl {
            h: (h * 360.0).round() as u16,
            s: (s * 100.0).round() as u8,
            l: (l * 100.0).round() as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let lower = value.to_ascii_lowercase();

        if lower.starts_with("rgb") {
            return parse_rgb_function(&lower).ok_or_else(|| ColorError::Unsupported(s.to_string()));
        }

        let digits = value.strip_prefix('#').unwrap_or(value);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(s.to_string()));
        }

        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorError::InvalidHex(s.to_string()))
        };

        match digits.len() {
            3 | 4 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(ColorError::InvalidHex(s.to_string())),
        }
    }
}

fn parse_rgb_function(value: &str) -> Option<Rgb> {
    let open = value.find('(')?;
    let close = value.rfind(')')?;
    if close <= open {
        return None;
    }

    let channels: Vec<u8> = value[open + 1..close]
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .take(3)
        .map(|part| part.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8))
        .collect::<Option<Vec<_>>>()?;

    match channels.as_slice() {
        [r, g, b] => Some(Rgb::new(*r, *g, *b)),
        _ => None,
    }
}

/// Parses a hex or `rgb()` color. Returns `None` for anything else.
pub fn hex_to_rgb(color: &str) -> Option<Rgb> {
    color.parse().ok()
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    Rgb::new(r, g, b).to_hex()
}

/// Relative luminance of a color, or 0 when it cannot be parsed.
pub fn luminance(color: &str) -> f64 {
    hex_to_rgb(color).map(|rgb| rgb.luminance()).unwrap_or(0.0)
}

pub fn contrast_ratio(first: &str, second: &str) -> f64 {
    let l1 = luminance(first);
    let l2 = luminance(second);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

pub fn is_readable(text_color: &str, background_color: &str) -> bool {
    contrast_ratio(text_color, background_color) >= READABLE_CONTRAST_RATIO
}

/// Picks black or white text for the given background.
pub fn contrast_color(background_color: &str) -> &'static str {
    if luminance(background_color) > DARK_LUMINANCE_THRESHOLD {
        "#000000"
    } else {
        "#ffffff"
    }
}

/// Whether a background reads as dark. Unparseable colors are `None`.
pub fn is_dark(color: &str) -> Option<bool> {
    hex_to_rgb(color).map(|rgb| rgb.luminance() <= DARK_LUMINANCE_THRESHOLD)
}

/// Shifts every channel by `percent` of the full range. Unparseable input
/// is returned unchanged.
pub fn adjust_brightness(color: &str, percent: f64) -> String {
    match hex_to_rgb(color) {
        Some(rgb) => {
            let adjust = |c: u8| (c as f64 + 255.0 * percent / 100.0).round().clamp(0.0, 255.0) as u8;
            rgb_to_hex(adjust(rgb.r), adjust(rgb.g), adjust(rgb.b))
        }
        None => color.to_string(),
    }
}

/// Channel-wise inversion.
pub fn complementary_color(color: &str) -> String {
    match hex_to_rgb(color) {
        Some(rgb) => rgb_to_hex(255 - rgb.r, 255 - rgb.g, 255 - rgb.b),
        None => color.to_string(),
    }
}

pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let s = s / 100.0;
    let l = l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if (0.0..60.0).contains(&h) => (c, x, 0.0),
        h if (60.0..120.0).contains(&h) => (x, c, 0.0),
        h if (120.0..180.0).contains(&h) => (0.0, c, x),
        h if (180.0..240.0).contains(&h) => (0.0, x, c),
        h if (240.0..300.0).contains(&h) => (x, 0.0, c),
        h if (300.0..360.0).contains(&h) => (c, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };

    let to_channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    rgb_to_hex(to_channel(r), to_channel(g), to_channel(b))
}

pub fn hex_to_hsl(color: &str) -> Option<Hsl> {
    hex_to_rgb(color).map(|rgb| rgb.to_hsl())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_six_digits() {
        assert_eq!(hex_to_rgb("#f5a623"), Some(Rgb::new(0xf5, 0xa6, 0x23)));
        assert_eq!(hex_to_rgb("F5A623"), Some(Rgb::new(0xf5, 0xa6, 0x23)));
    }

    #[test]
    fn test_hex_to_rgb_short_and_alpha() {
        assert_eq!(hex_to_rgb("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(hex_to_rgb("#11182780"), Some(Rgb::new(0x11, 0x18, 0x27)));
    }

    #[test]
    fn test_hex_to_rgb_rgba_function() {
        assert_eq!(
            hex_to_rgb("rgba(255, 255, 255, 0.1)"),
            Some(Rgb::new(255, 255, 255))
        );
        assert_eq!(hex_to_rgb("rgb(16 185 129)"), Some(Rgb::new(16, 185, 129)));
    }

    #[test]
    fn test_hex_to_rgb_invalid() {
        assert_eq!(hex_to_rgb("#12"), None);
        assert_eq!(hex_to_rgb("#gggggg"), None);
        assert_eq!(hex_to_rgb("linear-gradient(red, blue)"), None);
        assert!(matches!(
            "rgb(1,2)".parse::<Rgb>(),
            Err(ColorError::Unsupported(_))
        ));
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex(0, 0, 0), "#000000");
        assert_eq!(rgb_to_hex(26, 26, 26), "#1a1a1a");
    }

    #[test]
    fn test_luminance_extremes() {
        assert!((luminance("#ffffff") - 1.0).abs() < 1e-9);
        assert!(luminance("#000000").abs() < 1e-9);
        assert_eq!(luminance("not a color"), 0.0);
    }

    #[test]
    fn test_contrast_ratio_black_white() {
        let ratio = contrast_ratio("#000000", "#ffffff");
        assert!((ratio - 21.0).abs() < 1e-6);
        assert!((contrast_ratio("#ffffff", "#000000") - ratio).abs() < 1e-9);
    }

    #[test]
    fn test_is_readable() {
        assert!(is_readable("#ffffff", "#1a1a1a"));
        assert!(!is_readable("#777777", "#888888"));
    }

    #[test]
    fn test_contrast_color() {
        assert_eq!(contrast_color("#f5a623"), "#000000");
        assert_eq!(contrast_color("#1a1a1a"), "#ffffff");
    }

    #[test]
    fn test_is_dark() {
        assert_eq!(is_dark("#111827"), Some(true));
        assert_eq!(is_dark("#ffffff"), Some(false));
        assert_eq!(is_dark("transparent"), None);
    }

    #[test]
    fn test_adjust_brightness() {
        assert_eq!(adjust_brightness("#808080", 10.0), "#9a9a9a");
        assert_eq!(adjust_brightness("#ffffff", 50.0), "#ffffff");
        assert_eq!(adjust_brightness("#000000", -20.0), "#000000");
        assert_eq!(adjust_brightness("nope", 10.0), "nope");
    }

    #[test]
    fn test_complementary_color() {
        assert_eq!(complementary_color("#000000"), "#ffffff");
        assert_eq!(complementary_color("#f5a623"), "#0a59dc");
    }

    #[test]
    fn test_hsl_round_trip_primary() {
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
        assert_eq!(
            hex_to_hsl("#0000ff"),
            Some(Hsl {
                h: 240,
                s: 100,
                l: 50
            })
        );
    }

    #[test]
    fn test_hex_to_hsl_grey() {
        assert_eq!(hex_to_hsl("#808080"), Some(Hsl { h: 0, s: 0, l: 50 }));
    }
}
