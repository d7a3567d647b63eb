// Palette registry
//
// A fixed, ordered catalog of accent palettes. Activating a palette sets the
// root `data-palette` marker (absent for `default`), persists the choice,
// syncs the selection indicators and notifies subscribers so the particle
// backdrop can recolor.

use crate::dom::{Document, DATA_PALETTE};
use crate::notify::{Broadcaster, Notification};
use crate::storage::{Storage, KEY_DEV_CURRENT_PALETTE, KEY_SELECTED_PALETTE};
use crate::theme::stylesheet::{PRIMARY_COLOR, SECONDARY_COLOR};
use rand::Rng;

/// Id of the palette meaning "no override, use the base colors"
pub const DEFAULT_PALETTE_ID: &str = "default";

/// Palette applied on the very first run of the site catalog
pub const FIRST_RUN_PALETTE_ID: &str = "forest";

/// Primary and secondary accent colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColors {
    pub primary: &'static str,
    pub secondary: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: PaletteColors,
}

const fn palette(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    primary: &'static str,
    secondary: &'static str,
) -> Palette {
    Palette {
        id,
        name,
        description,
        colors: PaletteColors { primary, secondary },
    }
}

/// Palettes offered in the page's theme controls
pub const SITE_PALETTES: &[Palette] = &[
    palette("default", "Sky", "Clear sky blues", "#0ea5e9", "#3b82f6"),
    palette("sunset", "Sunset", "Warm oranges and reds", "#ea580c", "#dc2626"),
    palette("forest", "Forest", "Soft natural greens", "#3ba76b", "#2f7d53"),
    palette("cyberpunk", "Cyberpunk", "Neon purples and pinks", "#a855f7", "#ec4899"),
    palette("minimal", "Minimal", "Sophisticated grays", "#6b7280", "#374151"),
    palette("blackwhite", "Black & White", "Pure contrast", "#000000", "#ffffff"),
];

/// Larger catalog for trying out palettes during development
pub const DEV_PALETTES: &[Palette] = &[
    palette("default", "Default", "Original blue/cyan theme", "#00d4ff", "#0066ff"),
    palette("ocean", "Ocean", "Cool blues and teals", "#00b4d8", "#90e0ef"),
    palette("sunset", "Sunset", "Warm oranges and reds", "#ff6b35", "#f7931e"),
    palette("forest", "Forest", "Natural greens", "#52b788", "#b7e4c7"),
    palette("cyberpunk", "Cyberpunk", "Neon purples and magentas", "#e0aaff", "#c77dff"),
    palette("minimal", "Minimal", "Sophisticated grays", "#495057", "#6c757d"),
    palette("warm", "Warm", "Cozy oranges and yellows", "#f77f00", "#fcbf49"),
    palette("cool", "Cool", "Fresh blues and cyans", "#219ebc", "#8ecae6"),
    palette("vintage", "Vintage", "Earthy browns and golds", "#bc6c25", "#dda15e"),
    palette("neon", "Neon", "Electric greens and pinks", "#39ff14", "#ff073a"),
    palette("monochrome", "Monochrome", "Pure black and white contrast", "#333333", "#666666"),
];

/// Which catalog a registry serves, and how its selection is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Catalog {
    /// Site palettes, persisted by id (legacy numeric index accepted)
    #[default]
    Site,
    /// Development palettes, persisted by numeric index
    Dev,
}

impl Catalog {
    pub fn palettes(self) -> &'static [Palette] {
        match self {
            Catalog::Site => SITE_PALETTES,
            Catalog::Dev => DEV_PALETTES,
        }
    }

    fn storage_key(self) -> &'static str {
        match self {
            Catalog::Site => KEY_SELECTED_PALETTE,
            Catalog::Dev => KEY_DEV_CURRENT_PALETTE,
        }
    }
}

/// Look up a palette by id across both catalogs, site first
pub fn find_palette(id: &str) -> Option<&'static Palette> {
    SITE_PALETTES
        .iter()
        .chain(DEV_PALETTES.iter())
        .find(|p| p.id == id)
}

/// Index after `current`, wrapping to the start
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current + 1) % len
}

/// Index before `current`, wrapping to the end
pub fn previous_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

/// Uniform pick among the other `len - 1` indices (or `current` if alone)
pub fn random_index<R: Rng + ?Sized>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return current;
    }
    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}

/// Interpret a persisted site selection: canonical integer → index, else id
fn parse_saved(saved: &str) -> SavedPalette<'_> {
    let trimmed = saved.trim();
    match trimmed.parse::<usize>() {
        Ok(index) if index.to_string() == trimmed => SavedPalette::Index(index),
        _ => SavedPalette::Id(saved),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SavedPalette<'a> {
    Index(usize),
    Id(&'a str),
}

/// The ordered palette catalog plus the active selection
#[derive(Debug, Clone)]
pub struct PaletteRegistry {
    catalog: Catalog,
    current: usize,
}

impl PaletteRegistry {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog, current: 0 }
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    pub fn palettes(&self) -> &'static [Palette] {
        self.catalog.palettes()
    }

    pub fn len(&self) -> usize {
        self.palettes().len()
    }

    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &'static Palette {
        &self.palettes()[self.current]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.palettes().iter().position(|p| p.id == id)
    }

    /// Activate a palette by id; unknown ids are ignored
    pub fn activate(
        &mut self,
        id: &str,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> bool {
        match self.index_of(id) {
            Some(index) => self.activate_index(index, doc, storage, bus),
            None => {
                tracing::debug!(id, "Ignoring unknown palette id");
                false
            }
        }
    }

    /// Activate a palette by position; out-of-range indices are ignored
    pub fn activate_index(
        &mut self,
        index: usize,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> bool {
        if index >= self.len() {
            return false;
        }
        self.current = index;
        let palette = self.current();

        if palette.id == DEFAULT_PALETTE_ID {
            doc.remove_root_attr(DATA_PALETTE);
        } else {
            doc.set_root_attr(DATA_PALETTE, palette.id);
        }

        // The development catalog writes its colors inline, shadowing the site stylesheet
        match self.catalog {
            Catalog::Dev if palette.id != DEFAULT_PALETTE_ID => {
                doc.set_style_property(PRIMARY_COLOR, palette.colors.primary);
                doc.set_style_property(SECONDARY_COLOR, palette.colors.secondary);
            }
            _ => {
                doc.remove_style_property(PRIMARY_COLOR);
                doc.remove_style_property(SECONDARY_COLOR);
            }
        }

        self.persist(storage);
        self.sync_indicators(doc);
        bus.broadcast(Notification::PaletteChanged);

        tracing::info!(
            palette = palette.id,
            name = palette.name,
            "Palette switched"
        );
        true
    }

    pub fn next(
        &mut self,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> bool {
        let index = next_index(self.current, self.len());
        self.activate_index(index, doc, storage, bus)
    }

    pub fn previous(
        &mut self,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> bool {
        let index = previous_index(self.current, self.len());
        self.activate_index(index, doc, storage, bus)
    }

    /// Jump to a different palette chosen at random
    pub fn random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> bool {
        let index = random_index(self.current, self.len(), rng);
        self.activate_index(index, doc, storage, bus)
    }

    /// Back to the first palette of the catalog
    pub fn reset(
        &mut self,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> bool {
        self.activate_index(0, doc, storage, bus)
    }

    /// Apply the persisted selection at page load
    pub fn restore(
        &mut self,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) {
        let saved = storage.get(self.catalog.storage_key());
        let applied = match (self.catalog, saved.as_deref()) {
            (Catalog::Site, None) | (Catalog::Site, Some("")) => {
                self.activate(FIRST_RUN_PALETTE_ID, doc, storage, bus)
            }
            (Catalog::Site, Some(saved)) => match parse_saved(saved) {
                SavedPalette::Index(index) => self.activate_index(index, doc, storage, bus),
                SavedPalette::Id(id) => self.activate(id, doc, storage, bus),
            },
            (Catalog::Dev, Some(saved)) => match saved.trim().parse::<usize>() {
                Ok(index) => self.activate_index(index, doc, storage, bus),
                Err(_) => false,
            },
            (Catalog::Dev, None) => false,
        };

        if !applied {
            self.sync_indicators(doc);
        }
    }

    /// CSS rule reproducing the current palette
    pub fn export_css(&self) -> String {
        let palette = self.current();
        format!(
            "/* {} Palette */\n[data-palette=\"{}\"] {{\n    --primary-color: {};\n    --secondary-color: {};\n}}\n",
            palette.name, palette.id, palette.colors.primary, palette.colors.secondary
        )
    }

    fn persist(&self, storage: &mut dyn Storage) {
        let key = self.catalog.storage_key();
        match self.catalog {
            Catalog::Site => storage.set(key, self.current().id),
            Catalog::Dev => storage.set(key, &self.current.to_string()),
        }
    }

    /// Mark the active palette option and refresh the dev preview
    fn sync_indicators(&self, doc: &mut Document) {
        let palette = self.current();
        for option in &mut doc.palette_options {
            option.active = option.palette_id == palette.id;
        }
        if let Some(preview) = doc.dev_preview.as_mut() {
            preview.selected_index = self.current;
            preview.primary_swatch = palette.colors.primary.to_string();
            preview.secondary_swatch = palette.colors.secondary.to_string();
            preview.description = palette.description.to_string();
        }
    }
}
