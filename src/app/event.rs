// Keyboard event handling
//
// This module contains the keyboard event handler that processes
// user input and updates the application state accordingly.

use super::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit the application
/// - `t`, `T` - Toggle light/dark theme
/// - `1`..`9` - Pick the nth palette in the selector
///
/// With developer controls enabled:
/// - `Ctrl+Alt+Right` / `Ctrl+Alt+Left` - Next / previous palette
/// - `Ctrl+Alt+Space` - Random palette
/// - `e` - Export the current palette as CSS
/// - `r` - Reset to the default palette
/// - `d` - Collapse or expand the palette panel
pub fn handle_key_event(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    let chord = key
        .modifiers
        .contains(KeyModifiers::CONTROL | KeyModifiers::ALT);

    if chord && app.dev_controls {
        match key.code {
            KeyCode::Right => {
                app.next_palette();
                return true;
            }
            KeyCode::Left => {
                app.previous_palette();
                return true;
            }
            KeyCode::Char(' ') => {
                app.random_palette();
                return true;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.toggle_theme();
            true
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.select_palette_option(index);
            true
        }
        KeyCode::Char('e') | KeyCode::Char('E') if app.dev_controls => {
            // Failure is reported through the toast
            let _ = app.export_palette(now);
            true
        }
        KeyCode::Char('r') | KeyCode::Char('R') if app.dev_controls => {
            app.reset_palette();
            true
        }
        KeyCode::Char('d') | KeyCode::Char('D') if app.dev_controls => {
            app.toggle_dev_panel();
            true
        }
        _ => true,
    }
}
