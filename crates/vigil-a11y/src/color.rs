//! # Color and Contrast
//!
//! Parses CSS color literals and computes the WCAG 2.x contrast ratio from
//! sRGB relative luminance:
//!
//! ```text
//! channel  c = v / 255
//! linear   c <= 0.03928 ? c / 12.92 : ((c + 0.055) / 1.055) ^ 2.4
//! L        0.2126 R + 0.7152 G + 0.0722 B
//! ratio    (max(L1, L2) + 0.05) / (min(L1, L2) + 0.05)
//! ```
//!
//! Accepted literals: `#rgb`, `#rrggbb`, `#rrggbbaa` (alpha ignored),
//! `rgb(r, g, b)`, `rgba(r, g, b, a)` (alpha ignored), and a small set of
//! named colors.

use std::str::FromStr;

use vigil_core::{VigilError, VigilResult};

use crate::error::A11yError;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn relative_luminance(&self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// Contrast ratio against `other`, in `[1, 21]`.
    pub fn contrast_ratio(&self, other: &Rgb) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

const NAMED: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("silver", Rgb::new(192, 192, 192)),
    ("navy", Rgb::new(0, 0, 128)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("teal", Rgb::new(0, 128, 128)),
];

impl FromStr for Rgb {
    type Err = VigilError;

    fn from_str(s: &str) -> VigilResult<Self> {
        let input = s.trim();
        let invalid = || VigilError::InvalidColor {
            input: s.to_string(),
        };

        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = input.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args).ok_or_else(invalid);
        }

        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, rgb)| *rgb)
            .ok_or_else(invalid)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Rgb::new(digits.next()??, digits.next()??, digits.next()??))
        }
        6 | 8 => Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgb> {
    let parts: Vec<&str> = args
        .split(|c| c == ',' || c == '/' || c == ' ')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        let v = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => p.parse::<f64>().ok()?,
        };
        (0.0..=255.0).contains(&v).then(|| v.round() as u8)
    };
    Some(Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

/// Parse a color literal.
pub fn parse_color(input: &str) -> VigilResult<Rgb> {
    input.parse()
}

/// Contrast ratio between two color literals.
pub fn contrast_ratio(foreground: &str, background: &str) -> Result<f64, A11yError> {
    let fg = parse_color(foreground)?;
    let bg = parse_color(background)?;
    Ok(fg.contrast_ratio(&bg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_supported_literals() {
        assert_eq!(parse_color("#fff").unwrap(), Rgb::new(255, 255, 255));
        assert_eq!(parse_color("#1a2B3c").unwrap(), Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(parse_color("#00000080").unwrap(), Rgb::new(0, 0, 0));
        assert_eq!(parse_color("rgb(10, 20, 30)").unwrap(), Rgb::new(10, 20, 30));
        assert_eq!(parse_color("RGBA(10,20,30,0.5)").unwrap(), Rgb::new(10, 20, 30));
        assert_eq!(parse_color("rgb(100% 0% 0%)").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_color(" Navy ").unwrap(), Rgb::new(0, 0, 128));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["#ggg", "#12345", "rgb(1,2)", "rgb(300,0,0)", "hsl(0,0%,0%)", "bluish", ""] {
            assert!(
                matches!(parse_color(bad), Err(VigilError::InvalidColor { .. })),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn black_on_white_is_21() {
        let ratio = contrast_ratio("#000", "#ffffff").unwrap();
        assert!((ratio - 21.0).abs() < 1e-9);
    }

    #[test]
    fn same_color_is_1() {
        assert!((contrast_ratio("#777", "#777").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn known_ratio() {
        // #767676 on white is the classic minimum AA gray, about 4.54:1.
        let ratio = contrast_ratio("#767676", "#fff").unwrap();
        assert!(ratio > 4.5 && ratio < 4.6, "{ratio}");
    }

    #[test]
    fn error_wraps_core_error() {
        let err = contrast_ratio("#000", "nope").unwrap_err();
        assert!(matches!(err, A11yError::Core(VigilError::InvalidColor { .. })));
    }

    fn rgb() -> impl Strategy<Value = Rgb> {
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
    }

    proptest! {
        #[test]
        fn contrast_is_symmetric(a in rgb(), b in rgb()) {
            prop_assert!((a.contrast_ratio(&b) - b.contrast_ratio(&a)).abs() < 1e-12);
        }

        #[test]
        fn contrast_is_bounded(a in rgb(), b in rgb()) {
            let ratio = a.contrast_ratio(&b);
            prop_assert!((1.0..=21.0 + 1e-9).contains(&ratio));
        }
    }
}
