// Document model
//
// The explicit, injectable replacement for the browser document: marker
// attributes on the root and body, the theme toggle control, the particle
// container and its rendering surfaces, and the palette selector elements.
// Every element except the attribute maps is optional; components skip
// their setup when their target is absent.

use std::collections::BTreeMap;

/// Body attribute carrying the current theme
pub const DATA_THEME: &str = "data-theme";

/// Root attribute carrying the current non-default palette
pub const DATA_PALETTE: &str = "data-palette";

/// Id of the particle container element
pub const PARTICLES_CONTAINER_ID: &str = "particles-js";

/// The theme toggle button's accessible text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleControl {
    pub aria_label: String,
    pub title: String,
}

/// A rendering surface (canvas) attached to the particle container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    /// Id of the engine instance drawing into this surface
    pub instance_id: u64,
}

/// Element hosting the particle effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    surfaces: Vec<Surface>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            surfaces: Vec::new(),
        }
    }

    pub fn append(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    /// Remove every surface, returning how many were attached
    pub fn remove_surfaces(&mut self) -> usize {
        let removed = self.surfaces.len();
        self.surfaces.clear();
        removed
    }

    /// Drop all content (same as removing surfaces, the only children)
    pub fn clear(&mut self) {
        self.surfaces.clear();
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }
}

/// One clickable palette entry in the theme controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteOption {
    pub palette_id: String,
    pub label: String,
    pub active: bool,
}

/// Developer palette panel state: selector, swatches and description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevPreview {
    pub selected_index: usize,
    pub primary_swatch: String,
    pub secondary_swatch: String,
    pub description: String,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    root_attrs: BTreeMap<String, String>,
    body_attrs: BTreeMap<String, String>,
    root_style: BTreeMap<String, String>,
    pub theme_toggle: Option<ToggleControl>,
    pub effect_container: Option<Container>,
    pub palette_options: Vec<PaletteOption>,
    pub dev_preview: Option<DevPreview>,
}

impl Document {
    /// An empty document with no interactive elements
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full landing page: toggle, particle container, palette options
    pub fn landing_page<'a>(palettes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            theme_toggle: Some(ToggleControl::default()),
            effect_container: Some(Container::new(PARTICLES_CONTAINER_ID)),
            palette_options: palettes
                .into_iter()
                .map(|(id, name)| PaletteOption {
                    palette_id: id.to_string(),
                    label: name.to_string(),
                    active: false,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.root_attrs.get(name).map(String::as_str)
    }

    pub fn set_root_attr(&mut self, name: &str, value: &str) {
        self.root_attrs.insert(name.to_string(), value.to_string());
    }

    pub fn remove_root_attr(&mut self, name: &str) {
        self.root_attrs.remove(name);
    }

    pub fn body_attr(&self, name: &str) -> Option<&str> {
        self.body_attrs.get(name).map(String::as_str)
    }

    pub fn set_body_attr(&mut self, name: &str, value: &str) {
        self.body_attrs.insert(name.to_string(), value.to_string());
    }

    /// Inline custom property on the root element
    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.root_style.get(name).map(String::as_str)
    }

    pub fn set_style_property(&mut self, name: &str, value: &str) {
        self.root_style.insert(name.to_string(), value.to_string());
    }

    pub fn remove_style_property(&mut self, name: &str) {
        self.root_style.remove(name);
    }

    /// Whether the body marker says dark (absent marker is not dark)
    pub fn is_dark(&self) -> bool {
        self.body_attr(DATA_THEME) == Some("dark")
    }

    /// Current non-default palette id, if any
    pub fn palette_marker(&self) -> Option<&str> {
        self.root_attr(DATA_PALETTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_surfaces() {
        let mut container = Container::new(PARTICLES_CONTAINER_ID);
        container.append(Surface { instance_id: 1 });
        container.append(Surface { instance_id: 2 });
        assert_eq!(container.surfaces().len(), 2);

        assert_eq!(container.remove_surfaces(), 2);
        assert_eq!(container.remove_surfaces(), 0);
        assert!(container.surfaces().is_empty());
    }

    #[test]
    fn test_theme_marker() {
        let mut doc = Document::new();
        assert!(!doc.is_dark());
        doc.set_body_attr(DATA_THEME, "dark");
        assert!(doc.is_dark());
        doc.set_body_attr(DATA_THEME, "light");
        assert!(!doc.is_dark());
    }

    #[test]
    fn test_landing_page_elements() {
        let doc = Document::landing_page([("default", "Sky"), ("forest", "Forest")]);
        assert!(doc.theme_toggle.is_some());
        assert_eq!(
            doc.effect_container.as_ref().map(|c| c.id.as_str()),
            Some(PARTICLES_CONTAINER_ID)
        );
        assert_eq!(doc.palette_options.len(), 2);
        assert!(doc.palette_options.iter().all(|o| !o.active));
        assert_eq!(doc.palette_marker(), None);
    }
}
