//! Colors and tolerant color parsing
//!
//! Palette colors arrive from page options and `data-*` attributes, so the
//! parser accepts the shapes people actually write (`[r, g, b]`, `#rgb`,
//! `#rrggbb`, `rgb(...)`, `rgba(...)`) and falls back to a default for
//! anything else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lerp;

/// An RGB triple (channels nominally 0-255, kept fractional for blending)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear blend toward `other`
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        Rgb {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
        }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f64; 3]> for Rgb {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self { r, g, b }
    }
}

/// A color with alpha, as handed to the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` string; channels are truncated to integers
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a
        )
    }
}

#[inline]
fn channel(v: f64) -> i32 {
    (v as i32).clamp(0, 255)
}

/// Parse a color option, returning `default` for anything unrecognised
pub fn parse_color(value: &Value, default: Rgb) -> Rgb {
    match value {
        Value::Array(items) => parse_triple(items).unwrap_or(default),
        Value::String(s) => hex_to_rgb(s).or_else(|| rgb_function(s)).unwrap_or(default),
        _ => default,
    }
}

fn parse_triple(items: &[Value]) -> Option<Rgb> {
    if items.len() != 3 {
        return None;
    }
    let mut out = [0.0; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        let v = item.as_f64()?;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }
    Some(Rgb::from(out))
}

/// `#rgb`, `#rrggbb` (the `#` is optional)
fn hex_to_rgb(s: &str) -> Option<Rgb> {
    let stripped = s.replacen('#', "", 1);
    let h = stripped.trim();
    if !h.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match h.len() {
        3 => h.chars().flat_map(|c| [c, c]).collect(),
        6 => h.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok().map(f64::from);
    Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
}

/// First `rgb(...)` / `rgba(...)` group anywhere in the string, case-insensitive
fn rgb_function(s: &str) -> Option<Rgb> {
    let lower = s.to_ascii_lowercase();
    let args = lower.match_indices("rgb").find_map(|(at, _)| {
        let rest = &lower[at + 3..];
        let rest = rest.strip_prefix('a').unwrap_or(rest);
        let inner = rest.strip_prefix('(')?;
        let close = inner.find(')')?;
        (close > 0).then(|| &inner[..close])
    })?;

    let parts: Vec<f64> = args
        .split(',')
        .take(3)
        .map(|p| parse_float_prefix(p.trim()).unwrap_or(f64::NAN))
        .collect();
    if parts.len() != 3 || parts.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Rgb::new(parts[0], parts[1], parts[2]))
}

/// Parse the longest leading float literal of `s` (`"12.5px"` -> 12.5)
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const PURPLE: Rgb = Rgb::new(180.0, 70.0, 255.0);
    const FALLBACK: Rgb = Rgb::new(1.0, 2.0, 3.0);

    #[test]
    fn test_equivalent_spellings_agree() {
        assert_eq!(parse_color(&json!("#B446FF"), FALLBACK), PURPLE);
        assert_eq!(parse_color(&json!("rgb(180,70,255)"), FALLBACK), PURPLE);
        assert_eq!(parse_color(&json!([180, 70, 255]), FALLBACK), PURPLE);
    }

    #[test]
    fn test_invalid_returns_default() {
        assert_eq!(parse_color(&json!("notacolor"), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!(null), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!(42), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!([1, 2]), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!([1, "x", 3]), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!("#12345"), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!("#gg0000"), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!("rgb()"), FALLBACK), FALLBACK);
        assert_eq!(parse_color(&json!("rgb(1, 2)"), FALLBACK), FALLBACK);
    }

    #[test]
    fn test_hex_shorthand_and_bare() {
        assert_eq!(parse_color(&json!("#fff"), FALLBACK), Rgb::new(255.0, 255.0, 255.0));
        assert_eq!(parse_color(&json!("4682ff"), FALLBACK), Rgb::new(70.0, 130.0, 255.0));
        assert_eq!(parse_color(&json!("  #000  "), FALLBACK), Rgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rgba_ignores_alpha_and_case() {
        let c = parse_color(&json!("RGBA(10, 20.5, 30, 0.4)"), FALLBACK);
        assert_eq!(c, Rgb::new(10.0, 20.5, 30.0));
        let c = parse_color(&json!("color: rgb( 1 ,2, 3 );"), FALLBACK);
        assert_eq!(c, Rgb::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_float_prefix() {
        assert_eq!(parse_float_prefix("12px"), Some(12.0));
        assert_eq!(parse_float_prefix("  -0.5e2x"), Some(-50.0));
        assert_eq!(parse_float_prefix(".25"), Some(0.25));
        assert_eq!(parse_float_prefix("3e"), Some(3.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix(""), None);
    }

    #[test]
    fn test_css_truncates_channels() {
        let c = Rgba::new(254.9, 70.2, 300.0, 0.5);
        assert_eq!(c.to_css(), "rgba(254, 70, 255, 0.5)");
    }

    proptest! {
        #[test]
        fn prop_hex_matches_array(r: u8, g: u8, b: u8) {
            let hex = format!("#{:02x}{:02X}{:02x}", r, g, b);
            let expected = Rgb::new(r as f64, g as f64, b as f64);
            prop_assert_eq!(parse_color(&json!(hex), FALLBACK), expected);
            prop_assert_eq!(parse_color(&json!([r, g, b]), FALLBACK), expected);
        }

        #[test]
        fn prop_never_panics(s in ".*") {
            let _ = parse_color(&json!(s), FALLBACK);
        }
    }
}
