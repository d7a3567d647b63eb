// Theme module - dark/light display mode and chrome colors
//
// The theme is a body-level marker (`data-theme`), independent of the accent
// palette. The initial theme comes from the stored preference, then the
// system color scheme, then dark. System changes only apply while the user
// has not picked a theme explicitly.

pub mod stylesheet;

use crate::dom::{Document, DATA_THEME};
use crate::notify::{Broadcaster, Notification};
use crate::storage::{Storage, KEY_THEME};
use ratatui::style::Color;

/// Environment variable overriding the detected system color scheme
pub const COLOR_SCHEME_ENV: &str = "FOLIO_COLOR_SCHEME";

/// Display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeState {
    #[default]
    Dark,
    Light,
}

impl ThemeState {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeState::Dark => "dark",
            ThemeState::Light => "light",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "dark" => Some(ThemeState::Dark),
            "light" => Some(ThemeState::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeState::Dark => ThemeState::Light,
            ThemeState::Light => ThemeState::Dark,
        }
    }

    /// Text for the toggle control: it advertises the theme a click reaches
    pub fn toggle_label(self) -> String {
        format!("Switch to {} theme", self.toggled().as_str())
    }
}

/// The operating environment's color scheme signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemPreference {
    Dark,
    Light,
    #[default]
    NoPreference,
}

impl SystemPreference {
    /// Read the system preference from the process environment
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    /// `FOLIO_COLOR_SCHEME` wins; otherwise the terminal's `COLORFGBG`
    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(scheme) = lookup(COLOR_SCHEME_ENV) {
            match ThemeState::parse(&scheme.to_ascii_lowercase()) {
                Some(ThemeState::Dark) => return SystemPreference::Dark,
                Some(ThemeState::Light) => return SystemPreference::Light,
                None => {}
            }
        }
        lookup("COLORFGBG")
            .map(|value| Self::from_colorfgbg(&value))
            .unwrap_or_default()
    }

    /// Interpret `COLORFGBG` ("fg;bg" or "fg;default;bg"), keyed on the background
    pub fn from_colorfgbg(value: &str) -> Self {
        match value.rsplit(';').next().map(str::trim).map(str::parse::<u8>) {
            Some(Ok(7)) | Some(Ok(9..=15)) => SystemPreference::Light,
            Some(Ok(0..=6)) | Some(Ok(8)) => SystemPreference::Dark,
            _ => SystemPreference::NoPreference,
        }
    }
}

/// Owns the theme marker, its persistence and the toggle control text
#[derive(Debug, Clone)]
pub struct ThemeController {
    current: ThemeState,
}

impl ThemeController {
    /// Stored preference > system light preference > dark
    pub fn initial_theme(storage: &dyn Storage, system: SystemPreference) -> ThemeState {
        if let Some(theme) = storage.get(KEY_THEME).as_deref().and_then(ThemeState::parse) {
            return theme;
        }
        match system {
            SystemPreference::Light => ThemeState::Light,
            SystemPreference::Dark | SystemPreference::NoPreference => ThemeState::Dark,
        }
    }

    /// Resolve and apply the initial theme without recording a user choice
    pub fn start(
        doc: &mut Document,
        storage: &dyn Storage,
        system: SystemPreference,
        bus: &mut Broadcaster<Notification>,
    ) -> Self {
        let mut controller = Self {
            current: Self::initial_theme(storage, system),
        };
        controller.apply(controller.current, doc, bus);
        controller
    }

    pub fn current(&self) -> ThemeState {
        self.current
    }

    /// Explicit user choice: apply, persist and notify
    pub fn set_theme(
        &mut self,
        theme: ThemeState,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) {
        storage.set(KEY_THEME, theme.as_str());
        self.apply(theme, doc, bus);
    }

    /// Flip the theme currently shown on the document
    pub fn toggle(
        &mut self,
        doc: &mut Document,
        storage: &mut dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> ThemeState {
        let next = if doc.is_dark() {
            ThemeState::Light
        } else {
            ThemeState::Dark
        };
        self.set_theme(next, doc, storage, bus);
        next
    }

    /// Follow a system scheme change unless the user picked a theme
    pub fn on_system_preference_change(
        &mut self,
        preference: SystemPreference,
        doc: &mut Document,
        storage: &dyn Storage,
        bus: &mut Broadcaster<Notification>,
    ) -> bool {
        if storage.get(KEY_THEME).is_some() {
            tracing::debug!("Ignoring system color scheme change: explicit preference stored");
            return false;
        }
        let theme = match preference {
            SystemPreference::Dark => ThemeState::Dark,
            SystemPreference::Light => ThemeState::Light,
            SystemPreference::NoPreference => return false,
        };
        if theme == self.current && doc.body_attr(DATA_THEME) == Some(theme.as_str()) {
            return false;
        }
        self.apply(theme, doc, bus);
        true
    }

    fn apply(&mut self, theme: ThemeState, doc: &mut Document, bus: &mut Broadcaster<Notification>) {
        self.current = theme;
        doc.set_body_attr(DATA_THEME, theme.as_str());

        if let Some(toggle) = doc.theme_toggle.as_mut() {
            let label = theme.toggle_label();
            toggle.aria_label = label.clone();
            toggle.title = label;
        }

        bus.broadcast(Notification::ThemeChanged);
        tracing::info!(theme = theme.as_str(), "Theme applied");
    }
}

/// Terminal colors for the page chrome (everything but the accents)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
}

/// Near-black page with soft slate text
pub const DARK_CHROME: Chrome = Chrome {
    background: Color::Rgb(11, 15, 25),
    foreground: Color::Rgb(226, 232, 240),
    muted: Color::Rgb(148, 163, 184),
    border: Color::Rgb(51, 65, 85),
};

/// Off-white page with deep slate text
pub const LIGHT_CHROME: Chrome = Chrome {
    background: Color::Rgb(248, 250, 252),
    foreground: Color::Rgb(15, 23, 42),
    muted: Color::Rgb(100, 116, 139),
    border: Color::Rgb(203, 213, 225),
};

pub fn chrome(theme: ThemeState) -> Chrome {
    match theme {
        ThemeState::Dark => DARK_CHROME,
        ThemeState::Light => LIGHT_CHROME,
    }
}

/// Interpolate between two RGB colors based on a ratio (0.0 ~ 1.0)
///
/// Used to fake alpha: blending an accent toward the background by
/// `1 - opacity`.
pub fn interpolate_color(color1: (u8, u8, u8), color2: (u8, u8, u8), ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let r = (color1.0 as f32 + (color2.0 as f32 - color1.0 as f32) * ratio) as u8;
    let g = (color1.1 as f32 + (color2.1 as f32 - color1.1 as f32) * ratio) as u8;
    let b = (color1.2 as f32 + (color2.2 as f32 - color1.2 as f32) * ratio) as u8;
    Color::Rgb(r, g, b)
}

/// RGB channels of a chrome color (non-RGB colors read as black)
pub fn rgb_of(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    }
}
