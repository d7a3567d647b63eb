// UI rendering module
//
// This module contains all UI rendering components for folio.
// The main draw() function layers the page over the particle backdrop.

mod backdrop;
mod hero;
mod palette_panel;
mod status_bar;

use crate::app::AppState;
use crate::color;
use crate::effect::EffectInstance;
use crate::orchestrator::accent_color;
use crate::theme::chrome;
use crate::theme::stylesheet::computed_secondary;
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    widgets::Clear,
    Frame,
};

use backdrop::render_backdrop;
use hero::render_hero;
use palette_panel::{render_dev_panel, render_palette_bar};
use status_bar::render_status_bar;

/// Width of the developer palette panel
const DEV_PANEL_WIDTH: u16 = 34;

/// Centered hero box inside `area`
fn hero_area(area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(9)])
        .flex(Flex::Center)
        .areas(area);
    let [hero] = Layout::horizontal([Constraint::Max(64)])
        .flex(Flex::Center)
        .areas(row);
    hero
}

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let doc = &app.document;
    let page_chrome = chrome(app.theme.current());
    let primary = accent_color(doc).to_color();
    let secondary = color::resolve_secondary(&computed_secondary(doc), doc.is_dark()).to_color();

    // Backdrop first; everything else is drawn over it
    let engine = app.orchestrator.effect().engine();
    let live = app
        .orchestrator
        .effect()
        .handle()
        .and_then(|id| engine.instances().iter().find(|i| i.id() == id));
    render_backdrop(f, size, live, engine.bounds(), page_chrome);

    // Main layout: page, palette bar, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Page
            Constraint::Length(3), // Palette bar
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    let page = match doc.dev_preview.as_ref() {
        Some(preview) if !preview.collapsed => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(DEV_PANEL_WIDTH)])
                .split(chunks[0]);
            f.render_widget(Clear, columns[1]);
            render_dev_panel(f, columns[1], app.palettes.palettes(), preview, page_chrome);
            columns[0]
        }
        _ => chunks[0],
    };

    let hero = hero_area(page);
    for area in [hero, chunks[1], chunks[2]] {
        f.render_widget(Clear, area);
    }
    render_hero(f, hero, app, page_chrome, (primary, secondary));
    render_palette_bar(f, chunks[1], &doc.palette_options, page_chrome, primary);
    render_status_bar(f, chunks[2], app, page_chrome, primary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Cli;
    use crate::app::tests::app_with;
    use crate::storage::MemoryStorage;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_draw_shows_profile_and_palettes() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(Cli::default(), MemoryStorage::new(), dir.path());
        let screen = rendered(&app, 160, 40);

        assert!(screen.contains(&app.profile.name));
        assert!(screen.contains("Forest"));
        assert!(screen.contains("[dark]"));
    }

    #[test]
    fn test_draw_survives_tiny_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(Cli::default(), MemoryStorage::new(), dir.path());
        rendered(&app, 10, 4);
    }

    #[test]
    fn test_hero_area_is_centered() {
        let area = Rect::new(0, 0, 100, 30);
        let hero = hero_area(area);
        assert_eq!(hero.width, 64);
        assert_eq!(hero.height, 9);
        assert_eq!(hero.x, 18);
    }
}
