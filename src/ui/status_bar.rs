// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts, the theme and
// palette indicators, and the transient toast when one is showing.

use crate::app::AppState;
use crate::theme::Chrome;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// One key hint; lower priority numbers survive narrow terminals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub priority: u8,
    pub key: &'static str,
    pub desc: &'static str,
}

/// Hints for the current mode, most important first
pub fn key_hints(dev_controls: bool) -> Vec<Hint> {
    let mut hints = vec![
        Hint { priority: 1, key: "Q:", desc: "Quit | " },
        Hint { priority: 1, key: "T:", desc: "Theme | " },
        Hint { priority: 1, key: "1-9:", desc: "Palette | " },
    ];
    if dev_controls {
        hints.extend([
            Hint { priority: 2, key: "C-A-←/→:", desc: "Cycle | " },
            Hint { priority: 2, key: "C-A-Space:", desc: "Random | " },
            Hint { priority: 3, key: "E:", desc: "Export | " },
            Hint { priority: 3, key: "R:", desc: "Reset | " },
            Hint { priority: 3, key: "D:", desc: "Panel | " },
        ]);
    }
    hints
}

/// Hints that fit into `width` columns, added by priority
pub fn fit_hints(hints: &[Hint], width: usize) -> Vec<&Hint> {
    let mut used = 0;
    let mut fitted = Vec::new();
    for priority in 1..=3 {
        for hint in hints.iter().filter(|h| h.priority == priority) {
            let len = hint.key.chars().count() + hint.desc.chars().count();
            if used + len <= width {
                fitted.push(hint);
                used += len;
            }
        }
    }
    // Keep on-screen order stable regardless of priority
    fitted.sort_by_key(|h| hints.iter().position(|x| x == *h));
    fitted
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState, chrome: Chrome, accent: Color) {
    let indicators = build_indicators(app, chrome, accent);
    let indicator_width: usize = indicators.iter().map(|s| s.content.chars().count()).sum();
    let available = (area.width as usize).saturating_sub(4 + indicator_width);

    let mut spans = vec![Span::styled(" ◆ ", Style::default().fg(accent))];

    match &app.toast {
        Some(message) => spans.push(Span::styled(
            format!("{} ", message),
            Style::default().fg(chrome.foreground).add_modifier(Modifier::BOLD),
        )),
        None => {
            let hints = key_hints(app.dev_controls);
            for hint in fit_hints(&hints, available) {
                spans.push(Span::styled(
                    hint.key,
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(hint.desc, Style::default().fg(chrome.muted)));
            }
        }
    }

    spans.extend(indicators);

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(chrome.border)),
        )
        .style(Style::default().bg(chrome.background))
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

/// `[theme] [palette]` indicators shown at the end of the bar
pub fn build_indicators(app: &AppState, chrome: Chrome, accent: Color) -> Vec<Span<'static>> {
    let theme = app.theme.current().as_str();
    let palette = app.palettes.current().name;
    let label = Style::default().fg(chrome.muted);
    let value = Style::default().fg(accent).add_modifier(Modifier::BOLD);

    vec![
        Span::styled("[", label),
        Span::styled(theme, value),
        Span::styled("] [", label),
        Span::styled(palette, value),
        Span::styled("]", label),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_hints_only_with_dev_controls() {
        assert_eq!(key_hints(false).len(), 3);
        assert!(key_hints(true).iter().any(|h| h.key == "E:"));
    }

    #[test]
    fn test_fit_hints_drops_low_priority_first() {
        let hints = key_hints(true);
        let all: usize = hints
            .iter()
            .map(|h| h.key.chars().count() + h.desc.chars().count())
            .sum();
        assert_eq!(fit_hints(&hints, all).len(), hints.len());

        let narrow = fit_hints(&hints, 20);
        assert!(narrow.iter().all(|h| h.priority == 1));
        assert_eq!(narrow[0].key, "Q:");
        assert!(fit_hints(&hints, 0).is_empty());
    }
}
