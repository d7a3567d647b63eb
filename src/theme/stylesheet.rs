// Computed custom properties
//
// Stands in for `getComputedStyle(root).getPropertyValue("--primary-color")`.
// Base values are written in hsl() and differ per theme; a non-default
// palette marker overrides both accents with the palette's hex colors, and
// inline properties on the root override everything.

use crate::dom::Document;
use crate::palette::find_palette;

pub const PRIMARY_COLOR: &str = "--primary-color";
pub const SECONDARY_COLOR: &str = "--secondary-color";

const BASE_PRIMARY_DARK: &str = "hsl(195, 100%, 50%)";
const BASE_PRIMARY_LIGHT: &str = "hsl(199, 89%, 48%)";
const BASE_SECONDARY_DARK: &str = "hsl(220, 100%, 50%)";
const BASE_SECONDARY_LIGHT: &str = "hsl(221, 83%, 53%)";

/// Value of a custom property for the document's current markers
///
/// `None` when the property is unknown or the palette marker names no
/// known palette, which callers treat like an empty computed value.
pub fn computed_property(doc: &Document, name: &str) -> Option<String> {
    if let Some(inline) = doc.style_property(name) {
        return Some(inline.to_string());
    }
    let dark = doc.is_dark();

    if let Some(id) = doc.palette_marker() {
        let palette = find_palette(id)?;
        return match name {
            PRIMARY_COLOR => Some(palette.colors.primary.to_string()),
            SECONDARY_COLOR => Some(palette.colors.secondary.to_string()),
            _ => None,
        };
    }

    let value = match (name, dark) {
        (PRIMARY_COLOR, true) => BASE_PRIMARY_DARK,
        (PRIMARY_COLOR, false) => BASE_PRIMARY_LIGHT,
        (SECONDARY_COLOR, true) => BASE_SECONDARY_DARK,
        (SECONDARY_COLOR, false) => BASE_SECONDARY_LIGHT,
        _ => return None,
    };
    Some(value.to_string())
}

pub fn computed_primary(doc: &Document) -> String {
    computed_property(doc, PRIMARY_COLOR).unwrap_or_default()
}

pub fn computed_secondary(doc: &Document) -> String {
    computed_property(doc, SECONDARY_COLOR).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{resolve, FALLBACK_PRIMARY_DARK};
    use crate::dom::{DATA_PALETTE, DATA_THEME};

    #[test]
    fn test_base_values_follow_theme() {
        let mut doc = Document::new();
        doc.set_body_attr(DATA_THEME, "dark");
        assert_eq!(computed_primary(&doc), BASE_PRIMARY_DARK);
        assert_eq!(resolve(&computed_primary(&doc), true).as_str(), "#00bfff");

        doc.set_body_attr(DATA_THEME, "light");
        assert_eq!(computed_primary(&doc), BASE_PRIMARY_LIGHT);
        assert_eq!(computed_secondary(&doc), BASE_SECONDARY_LIGHT);
    }

    #[test]
    fn test_palette_marker_overrides() {
        let mut doc = Document::new();
        doc.set_body_attr(DATA_THEME, "dark");
        doc.set_root_attr(DATA_PALETTE, "sunset");
        assert_eq!(computed_primary(&doc), "#ea580c");
        assert_eq!(computed_secondary(&doc), "#dc2626");

        // Development-only palette ids resolve too
        doc.set_root_attr(DATA_PALETTE, "vintage");
        assert_eq!(computed_primary(&doc), "#bc6c25");
    }

    #[test]
    fn test_inline_property_wins() {
        let mut doc = Document::new();
        doc.set_body_attr(DATA_THEME, "light");
        doc.set_root_attr(DATA_PALETTE, "sunset");
        doc.set_style_property(PRIMARY_COLOR, "#ff6b35");
        assert_eq!(computed_primary(&doc), "#ff6b35");
        assert_eq!(computed_secondary(&doc), "#dc2626");

        doc.remove_style_property(PRIMARY_COLOR);
        assert_eq!(computed_primary(&doc), "#ea580c");
    }

    #[test]
    fn test_unknown_palette_falls_back_through_resolver() {
        let mut doc = Document::new();
        doc.set_body_attr(DATA_THEME, "dark");
        doc.set_root_attr(DATA_PALETTE, "mauve");
        assert_eq!(computed_property(&doc, PRIMARY_COLOR), None);
        assert_eq!(resolve(&computed_primary(&doc), true).as_str(), FALLBACK_PRIMARY_DARK);
        assert_eq!(computed_property(&doc, "--font-size"), None);
    }
}
