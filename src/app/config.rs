// Application configuration
//
// This module contains:
// - Viewport breakpoints and particle densities
// - Effect lifecycle delays
// - The per-theme particle style table
// - Command line options and state directory resolution

use crate::palette::Catalog;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Viewport
// ============================================================================

/// Pixel width of one terminal column, used to map columns onto breakpoints
pub const CELL_WIDTH_PX: u32 = 8;

/// Pixel height of one terminal row
pub const CELL_HEIGHT_PX: u32 = 16;

/// Widest viewport treated as mobile
pub const MOBILE_MAX_WIDTH_PX: u32 = 768;

/// Widest viewport treated as tablet
pub const TABLET_MAX_WIDTH_PX: u32 = 1024;

// ============================================================================
// Particle density
// ============================================================================

pub const MOBILE_PARTICLE_COUNT: u32 = 30;
pub const TABLET_PARTICLE_COUNT: u32 = 60;
pub const DESKTOP_PARTICLE_COUNT: u32 = 120;

/// Particle count of the fixed-density policy
pub const FIXED_PARTICLE_COUNT: u32 = 80;

/// Particles closer than this (px) are joined by a line
pub const LINE_LINK_DISTANCE: f32 = 150.0;

/// Base movement speed (px per frame at 60 fps)
pub const MOVE_SPEED: f32 = 2.0;

/// Maximum particle radius (px)
pub const PARTICLE_SIZE: f32 = 3.0;

// ============================================================================
// Timing
// ============================================================================

/// Quiet period before a burst of resize events is acted upon
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Delay between teardown and rebuild after a failed recolor
pub const REINIT_AFTER_RECOLOR: Duration = Duration::from_millis(200);

/// Delay between teardown and rebuild after a density change
pub const REINIT_AFTER_RESIZE: Duration = Duration::from_millis(100);

/// How long the export notification stays on screen
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// UI frame interval
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

// ============================================================================
// Theme style table
// ============================================================================

/// Opacity and line styling that differ between themes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectStyle {
    pub opacity: f32,
    pub opacity_min: f32,
    pub line_opacity: f32,
    pub line_width: f32,
}

/// Dark backgrounds need less opacity and thinner lines
pub const DARK_EFFECT_STYLE: EffectStyle = EffectStyle {
    opacity: 0.5,
    opacity_min: 0.1,
    line_opacity: 0.4,
    line_width: 1.0,
};

pub const LIGHT_EFFECT_STYLE: EffectStyle = EffectStyle {
    opacity: 0.8,
    opacity_min: 0.25,
    line_opacity: 0.55,
    line_width: 1.3,
};

pub fn effect_style(is_dark: bool) -> EffectStyle {
    if is_dark {
        DARK_EFFECT_STYLE
    } else {
        LIGHT_EFFECT_STYLE
    }
}

// ============================================================================
// Command line
// ============================================================================

/// Environment variable naming the state directory
pub const STATE_DIR_ENV: &str = "FOLIO_STATE_DIR";

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Log file name inside the state directory
pub const LOG_FILE: &str = "folio.log";

#[derive(Debug, Clone, Parser)]
#[command(name = "folio", version, about = "Terminal portfolio front page")]
pub struct Cli {
    /// Show the developer palette controls
    #[arg(long)]
    pub dev_palettes: bool,

    /// Palette catalog to offer
    #[arg(long, value_enum, default_value_t = Catalog::Site)]
    pub catalog: Catalog,

    /// Use a fixed particle count instead of the responsive one
    #[arg(long)]
    pub fixed_density: bool,

    /// Where preferences and logs are kept
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Name shown in the hero section
    #[arg(long, default_value = "Ada Lovelace")]
    pub name: String,

    /// Tagline shown under the name
    #[arg(long, default_value = "Systems engineer. Builds small, sharp tools.")]
    pub tagline: String,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            dev_palettes: false,
            catalog: Catalog::Site,
            fixed_density: false,
            state_dir: None,
            name: "Ada Lovelace".to_string(),
            tagline: "Systems engineer. Builds small, sharp tools.".to_string(),
        }
    }
}

/// Platform default: the user state dir, then `~/.local/state`, then `./.folio`
pub fn default_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
        .map(|dir| dir.join("folio"))
        .unwrap_or_else(|| PathBuf::from(".folio"))
}

/// State directory: flag > `FOLIO_STATE_DIR` > platform default
pub fn resolve_state_dir(flag: Option<PathBuf>, env_dir: Option<String>) -> PathBuf {
    flag.or_else(|| env_dir.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(default_state_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_precedence() {
        assert_eq!(
            resolve_state_dir(Some(PathBuf::from("/flag")), Some("/env".to_string())),
            PathBuf::from("/flag")
        );
        assert_eq!(
            resolve_state_dir(None, Some("/env".to_string())),
            PathBuf::from("/env")
        );
        assert_eq!(resolve_state_dir(None, Some(String::new())), default_state_dir());
        assert_eq!(resolve_state_dir(None, None), default_state_dir());
    }

    #[test]
    fn test_default_state_dir_is_app_specific() {
        let dir = default_state_dir();
        assert!(dir.ends_with("folio") || dir == PathBuf::from(".folio"));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["folio", "--dev-palettes", "--catalog", "dev", "--fixed-density"]);
        assert!(cli.dev_palettes);
        assert_eq!(cli.catalog, Catalog::Dev);
        assert!(cli.fixed_density);

        let defaults = Cli::parse_from(["folio"]);
        assert_eq!(defaults.catalog, Catalog::Site);
        assert_eq!(defaults.name, Cli::default().name);
    }

    #[test]
    fn test_effect_style_table() {
        let dark = effect_style(true);
        let light = effect_style(false);
        assert!(dark.opacity < light.opacity);
        assert!(dark.line_width < light.line_width);
        assert!(dark.line_opacity < light.line_opacity);
    }
}
