// Application state management
//
// This module contains the root AppState that owns the document, the
// persisted preferences, the notification bus and every controller, and
// wires them together at startup and on each frame.

pub mod config;
pub mod event;

use crate::dom::{DevPreview, Document};
use crate::effect::particles::ParticleField;
use crate::effect::{EffectController, ParticlePolicy};
use crate::notify::{Broadcaster, Notification};
use crate::orchestrator::{Orchestrator, Viewport};
use crate::palette::PaletteRegistry;
use crate::storage::{Storage, KEY_DEV_PALETTES_ENABLED};
use crate::theme::{SystemPreference, ThemeController};
use crate::timer::Timer;
use config::{Cli, TOAST_DURATION};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Text shown in the hero section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub tagline: String,
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    pub document: Document,
    pub storage: Box<dyn Storage>,
    pub bus: Broadcaster<Notification>,
    pub theme: ThemeController,
    pub palettes: PaletteRegistry,
    pub orchestrator: Orchestrator<ParticleField>,

    /// Developer palette shortcuts and panel are available
    pub dev_controls: bool,

    /// Transient message in the status bar
    pub toast: Option<String>,
    toast_timer: Timer,

    pub profile: Profile,
    state_dir: PathBuf,
    rng: StdRng,
}

/// Dev controls: debug builds, the command line flag, or the stored opt-in
pub fn dev_controls_enabled(flag: bool, storage: &dyn Storage) -> bool {
    flag || cfg!(debug_assertions)
        || storage.get(KEY_DEV_PALETTES_ENABLED).as_deref() == Some("true")
}

impl AppState {
    /// Build the page and bring every controller up
    ///
    /// Order matters: theme first, then the saved palette, then the effect,
    /// so the first particle instance already has the right accent.
    pub fn new(
        cli: &Cli,
        mut storage: Box<dyn Storage>,
        system: SystemPreference,
        state_dir: PathBuf,
        viewport: Viewport,
        now: Instant,
    ) -> Self {
        let palettes = PaletteRegistry::new(cli.catalog);
        let mut document =
            Document::landing_page(palettes.palettes().iter().map(|p| (p.id, p.name)));

        let dev_controls = dev_controls_enabled(cli.dev_palettes, storage.as_ref());
        if dev_controls {
            document.dev_preview = Some(DevPreview::default());
        }

        let mut bus = Broadcaster::new();
        let policy = if cli.fixed_density {
            ParticlePolicy::fixed()
        } else {
            ParticlePolicy::Responsive
        };
        let engine = ParticleField::new(
            f64::from(viewport.width_px()),
            f64::from(viewport.height_px()),
        );
        let mut orchestrator =
            Orchestrator::new(EffectController::new(engine, policy), &mut bus, viewport);

        let theme = ThemeController::start(&mut document, storage.as_ref(), system, &mut bus);
        let mut palettes = palettes;
        palettes.restore(&mut document, storage.as_mut(), &mut bus);

        // The effect reads the final state directly
        orchestrator.discard_pending();
        orchestrator.start(&mut document);

        tracing::info!(
            theme = theme.current().as_str(),
            palette = palettes.current().id,
            catalog = ?palettes.catalog(),
            dev_controls,
            cols = viewport.cols,
            rows = viewport.rows,
            "Page ready"
        );

        let mut state = Self {
            running: true,
            document,
            storage,
            bus,
            theme,
            palettes,
            orchestrator,
            dev_controls,
            toast: None,
            toast_timer: Timer::new(),
            profile: Profile {
                name: cli.name.clone(),
                tagline: cli.tagline.clone(),
            },
            state_dir,
            rng: StdRng::from_entropy(),
        };
        state.on_tick(now);
        state
    }

    /// Advance controllers and timers by one frame
    pub fn on_tick(&mut self, now: Instant) {
        self.orchestrator.tick(&mut self.document, now);
        if self.toast_timer.fire(now) {
            self.toast = None;
        }
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16, now: Instant) {
        self.orchestrator.on_resize(cols, rows, now);
    }

    /// The terminal regained focus; the system scheme may have changed meanwhile
    pub fn on_focus_gained(&mut self, preference: SystemPreference) -> bool {
        self.theme.on_system_preference_change(
            preference,
            &mut self.document,
            self.storage.as_ref(),
            &mut self.bus,
        )
    }

    pub fn toggle_theme(&mut self) {
        self.theme
            .toggle(&mut self.document, self.storage.as_mut(), &mut self.bus);
    }

    /// Activate the palette behind the nth option of the selector
    pub fn select_palette_option(&mut self, index: usize) -> bool {
        let Some(id) = self
            .document
            .palette_options
            .get(index)
            .map(|o| o.palette_id.clone())
        else {
            return false;
        };
        self.palettes
            .activate(&id, &mut self.document, self.storage.as_mut(), &mut self.bus)
    }

    pub fn next_palette(&mut self) -> bool {
        self.palettes
            .next(&mut self.document, self.storage.as_mut(), &mut self.bus)
    }

    pub fn previous_palette(&mut self) -> bool {
        self.palettes
            .previous(&mut self.document, self.storage.as_mut(), &mut self.bus)
    }

    pub fn random_palette(&mut self) -> bool {
        self.palettes.random(
            &mut self.rng,
            &mut self.document,
            self.storage.as_mut(),
            &mut self.bus,
        )
    }

    pub fn reset_palette(&mut self) -> bool {
        self.palettes
            .reset(&mut self.document, self.storage.as_mut(), &mut self.bus)
    }

    pub fn toggle_dev_panel(&mut self) {
        if let Some(preview) = self.document.dev_preview.as_mut() {
            preview.collapsed = !preview.collapsed;
        }
    }

    /// Write the current palette as CSS into the state directory
    pub fn export_palette(&mut self, now: Instant) -> io::Result<PathBuf> {
        let css = self.palettes.export_css();
        let path = export_path(&self.state_dir, self.palettes.current().id);

        let written = std::fs::create_dir_all(&self.state_dir)
            .and_then(|()| std::fs::write(&path, css));
        match &written {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Palette CSS exported");
                self.show_toast(format!("Palette CSS saved to {}", path.display()), now);
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Palette CSS export failed");
                self.show_toast(format!("Export failed: {}", e), now);
            }
        }
        written.map(|()| path)
    }

    pub fn show_toast(&mut self, message: String, now: Instant) {
        self.toast = Some(message);
        self.toast_timer.schedule(now, TOAST_DURATION);
    }
}

fn export_path(dir: &Path, palette_id: &str) -> PathBuf {
    dir.join(format!("palette-{}.css", palette_id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dom::{DATA_PALETTE, DATA_THEME};
    use crate::effect::ParticleEngine;
    use crate::palette::Catalog;
    use crate::storage::{MemoryStorage, KEY_SELECTED_PALETTE, KEY_THEME};
    use std::time::Duration;

    pub(crate) const VIEWPORT: Viewport = Viewport { cols: 160, rows: 40 };

    pub(crate) fn app_with(cli: Cli, storage: MemoryStorage, dir: &Path) -> AppState {
        AppState::new(
            &cli,
            Box::new(storage),
            SystemPreference::NoPreference,
            dir.to_path_buf(),
            VIEWPORT,
            Instant::now(),
        )
    }

    #[test]
    fn test_first_run_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(Cli::default(), MemoryStorage::new(), dir.path());

        assert_eq!(app.document.body_attr(DATA_THEME), Some("dark"));
        assert_eq!(app.document.root_attr(DATA_PALETTE), Some("forest"));
        assert_eq!(app.storage.get(KEY_SELECTED_PALETTE).as_deref(), Some("forest"));
        // Startup applies the theme without recording a choice
        assert_eq!(app.storage.get(KEY_THEME), None);
        assert_eq!(app.orchestrator.effect().engine().registered(), 1);
    }

    #[test]
    fn test_stored_preferences_restored() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MemoryStorage::new()
            .with(KEY_THEME, "light")
            .with(KEY_SELECTED_PALETTE, "cyberpunk");
        let app = app_with(Cli::default(), storage, dir.path());

        assert_eq!(app.document.body_attr(DATA_THEME), Some("light"));
        assert_eq!(app.document.root_attr(DATA_PALETTE), Some("cyberpunk"));
        assert!(app
            .document
            .palette_options
            .iter()
            .any(|o| o.active && o.palette_id == "cyberpunk"));
    }

    #[test]
    fn test_dev_controls_sources() {
        let storage = MemoryStorage::new().with(KEY_DEV_PALETTES_ENABLED, "true");
        assert!(dev_controls_enabled(false, &storage));
        assert!(dev_controls_enabled(true, &MemoryStorage::new()));
        assert_eq!(
            dev_controls_enabled(false, &MemoryStorage::new()),
            cfg!(debug_assertions)
        );
    }

    #[test]
    fn test_focus_follows_system_until_user_chooses() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Cli::default(), MemoryStorage::new(), dir.path());

        assert!(app.on_focus_gained(SystemPreference::Light));
        assert_eq!(app.document.body_attr(DATA_THEME), Some("light"));

        app.toggle_theme();
        assert_eq!(app.storage.get(KEY_THEME).as_deref(), Some("dark"));
        assert!(!app.on_focus_gained(SystemPreference::Light));
        assert_eq!(app.document.body_attr(DATA_THEME), Some("dark"));
    }

    #[test]
    fn test_export_writes_css_and_toast_expires() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            catalog: Catalog::Dev,
            ..Cli::default()
        };
        let storage = MemoryStorage::new().with("dev-current-palette", "2");
        let mut app = app_with(cli, storage, dir.path());
        let t0 = Instant::now();

        let path = app.export_palette(t0).unwrap();
        let id = app.palettes.current().id;
        assert_eq!(path, dir.path().join(format!("palette-{}.css", id)));
        let css = std::fs::read_to_string(&path).unwrap();
        assert!(css.contains(&format!("[data-palette=\"{}\"]", id)));
        assert!(app.toast.is_some());

        app.on_tick(t0 + Duration::from_millis(2999));
        assert!(app.toast.is_some());
        app.on_tick(t0 + Duration::from_millis(3000));
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_select_palette_option_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Cli::default(), MemoryStorage::new(), dir.path());

        assert!(app.select_palette_option(1));
        assert_eq!(app.palettes.current_index(), 1);
        assert!(!app.select_palette_option(42));
        assert_eq!(app.palettes.current_index(), 1);

        assert!(app.select_palette_option(0));
        assert_eq!(app.document.root_attr(DATA_PALETTE), None);
    }

    #[test]
    fn test_random_palette_always_moves() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Cli::default(), MemoryStorage::new(), dir.path());
        for _ in 0..20 {
            let before = app.palettes.current_index();
            app.random_palette();
            assert_ne!(app.palettes.current_index(), before);
        }
    }
}
