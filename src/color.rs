// Color resolution
//
// Turns a CSS custom-property color value (either `#rrggbb` or
// `hsl(H, S%, L%)`) into a canonical hex color for the particle engine.
// Resolution never fails: malformed input falls back to a theme constant.

use ratatui::style::Color;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Primary fallback on the dark theme
pub const FALLBACK_PRIMARY_DARK: &str = "#00d4ff";

/// Primary fallback on the light theme
pub const FALLBACK_PRIMARY_LIGHT: &str = "#0ea5e9";

/// Secondary fallback on the dark theme
pub const FALLBACK_SECONDARY_DARK: &str = "#0066ff";

/// Secondary fallback on the light theme
pub const FALLBACK_SECONDARY_LIGHT: &str = "#0033aa";

/// Errors raised while parsing a color value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("not a hex color: {0:?}")]
    NotHex(String),

    #[error("not an hsl() color: {0:?}")]
    NotHsl(String),

    #[error("hsl component {name} out of range: {value}")]
    OutOfRange { name: &'static str, value: u32 },
}

/// A validated `#rrggbb` color
///
/// The original spelling is preserved, so resolving an already-hex value is
/// the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `#RRGGBB` string (either case)
    pub fn parse(raw: &str) -> Result<Self, ColorError> {
        let digits = raw
            .strip_prefix('#')
            .ok_or_else(|| ColorError::NotHex(raw.to_string()))?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::NotHex(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Build from RGB channels, formatted as lowercase hex
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{:02x}{:02x}{:02x}", r, g, b))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RGB channels of this color
    pub fn rgb(&self) -> (u8, u8, u8) {
        // Validated in parse()/from_rgb(), so every slice is two hex digits
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    /// Convert to a terminal color
    pub fn to_color(&self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb(r, g, b)
    }

    fn fallback(constant: &'static str) -> Self {
        Self(constant.to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed `hsl(H, S%, L%)` with integer components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    /// Hue in degrees, 0..360
    pub h: u16,
    /// Saturation percentage, 0..=100
    pub s: u8,
    /// Lightness percentage, 0..=100
    pub l: u8,
}

impl Hsl {
    /// Convert to hex using the standard piecewise hue function
    pub fn to_hex(self) -> HexColor {
        let h = f64::from(self.h) / 360.0;
        let s = f64::from(self.s) / 100.0;
        let l = f64::from(self.l) / 100.0;

        let (r, g, b) = if self.s == 0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        HexColor::from_rgb(to_channel(r), to_channel(g), to_channel(b))
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Parse an `hsl(H, S%, L%)` value
///
/// Whitespace around components is tolerated. Hue must be below 360 and the
/// percentages at most 100.
pub fn parse_hsl(raw: &str) -> Result<Hsl, ColorError> {
    let not_hsl = || ColorError::NotHsl(raw.to_string());

    let inner = raw
        .trim()
        .strip_prefix("hsl(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(not_hsl)?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let [h, s, l] = parts.as_slice() else {
        return Err(not_hsl());
    };

    let number = |text: &str| text.parse::<u32>().map_err(|_| not_hsl());
    let percent = |text: &str| text.strip_suffix('%').ok_or_else(not_hsl).and_then(number);

    let h = number(h)?;
    let s = percent(s)?;
    let l = percent(l)?;

    if h >= 360 {
        return Err(ColorError::OutOfRange { name: "hue", value: h });
    }
    if s > 100 {
        return Err(ColorError::OutOfRange { name: "saturation", value: s });
    }
    if l > 100 {
        return Err(ColorError::OutOfRange { name: "lightness", value: l });
    }

    Ok(Hsl {
        h: h as u16,
        s: s as u8,
        l: l as u8,
    })
}

fn resolve_with(raw: &str, fallback: &'static str) -> HexColor {
    let raw = raw.trim();
    if let Ok(hex) = HexColor::parse(raw) {
        return hex;
    }
    match parse_hsl(raw) {
        Ok(hsl) => hsl.to_hex(),
        Err(e) => {
            tracing::debug!(error = %e, fallback, "Color value unusable, using fallback");
            HexColor::fallback(fallback)
        }
    }
}

/// Resolve a primary color value to hex, falling back per theme
pub fn resolve(raw: &str, is_dark: bool) -> HexColor {
    let fallback = if is_dark {
        FALLBACK_PRIMARY_DARK
    } else {
        FALLBACK_PRIMARY_LIGHT
    };
    resolve_with(raw, fallback)
}

/// Resolve a secondary color value to hex, falling back per theme
pub fn resolve_secondary(raw: &str, is_dark: bool) -> HexColor {
    let fallback = if is_dark {
        FALLBACK_SECONDARY_DARK
    } else {
        FALLBACK_SECONDARY_LIGHT
    };
    resolve_with(raw, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_canonical_hex(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_resolve_golden_hsl() {
        assert_eq!(resolve("hsl(195,100%,55%)", false).as_str(), "#1ac6ff");
        assert_eq!(resolve("hsl(195, 100%, 55%)", true).as_str(), "#1ac6ff");
    }

    #[test]
    fn test_resolve_primary_hues() {
        assert_eq!(resolve("hsl(0, 100%, 50%)", true).as_str(), "#ff0000");
        assert_eq!(resolve("hsl(120, 100%, 50%)", true).as_str(), "#00ff00");
        assert_eq!(resolve("hsl(240, 100%, 50%)", true).as_str(), "#0000ff");
    }

    #[test]
    fn test_resolve_achromatic() {
        assert_eq!(resolve("hsl(0, 0%, 0%)", true).as_str(), "#000000");
        assert_eq!(resolve("hsl(200, 0%, 100%)", true).as_str(), "#ffffff");
        assert_eq!(resolve("hsl(42, 0%, 50%)", true).as_str(), "#808080");
    }

    #[test]
    fn test_resolve_hex_is_identity() {
        assert_eq!(resolve("#abc123", true).as_str(), "#abc123");
        assert_eq!(resolve("#abc123", false).as_str(), "#abc123");
        assert_eq!(resolve("#ABC123", false).as_str(), "#ABC123");
    }

    #[test]
    fn test_resolve_garbage_falls_back_per_theme() {
        assert_eq!(resolve("garbage", true).as_str(), FALLBACK_PRIMARY_DARK);
        assert_eq!(resolve("garbage", false).as_str(), FALLBACK_PRIMARY_LIGHT);
        assert_eq!(resolve("", true).as_str(), FALLBACK_PRIMARY_DARK);
        assert_eq!(resolve("#abc", false).as_str(), FALLBACK_PRIMARY_LIGHT);
        assert_eq!(resolve("hsl(400, 50%, 50%)", true).as_str(), FALLBACK_PRIMARY_DARK);
        assert_eq!(resolve("hsl(10, 150%, 50%)", false).as_str(), FALLBACK_PRIMARY_LIGHT);
    }

    #[test]
    fn test_resolve_secondary_fallbacks() {
        assert_eq!(resolve_secondary("nope", true).as_str(), FALLBACK_SECONDARY_DARK);
        assert_eq!(resolve_secondary("nope", false).as_str(), FALLBACK_SECONDARY_LIGHT);
        assert_eq!(resolve_secondary("#123456", false).as_str(), "#123456");
    }

    #[test]
    fn test_parse_hsl_errors() {
        assert!(matches!(parse_hsl("rgb(1, 2, 3)"), Err(ColorError::NotHsl(_))));
        assert!(matches!(parse_hsl("hsl(1, 2, 3)"), Err(ColorError::NotHsl(_))));
        assert!(matches!(parse_hsl("hsl(1, 2%)"), Err(ColorError::NotHsl(_))));
        assert_eq!(
            parse_hsl("hsl(360, 2%, 3%)"),
            Err(ColorError::OutOfRange { name: "hue", value: 360 })
        );
    }

    #[test]
    fn test_hex_rgb_and_terminal_color() {
        let hex = HexColor::parse("#1AC6ff").unwrap();
        assert_eq!(hex.rgb(), (0x1a, 0xc6, 0xff));
        assert_eq!(hex.to_color(), Color::Rgb(0x1a, 0xc6, 0xff));
        assert!(HexColor::parse("1ac6ff").is_err());
        assert!(HexColor::parse("#1ac6fg").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every valid hsl() input resolves to a canonical lowercase hex color
        #[test]
        fn prop_hsl_resolves_to_canonical_hex(
            h in 0u16..360,
            s in 0u8..=100,
            l in 0u8..=100,
            dark in any::<bool>(),
        ) {
            let raw = format!("hsl({}, {}%, {}%)", h, s, l);
            let hex = resolve(&raw, dark);
            prop_assert!(is_canonical_hex(hex.as_str()), "{} -> {}", raw, hex);
        }

        /// Resolution never fails, whatever the input
        #[test]
        fn prop_resolve_total(raw in ".{0,24}", dark in any::<bool>()) {
            let hex = resolve(&raw, dark);
            prop_assert!(HexColor::parse(hex.as_str()).is_ok());
        }
    }
}
