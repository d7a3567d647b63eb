// Hero section rendering module
//
// Renders the name, tagline and the theme toggle control over the backdrop.

use crate::app::AppState;
use crate::theme::Chrome;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_hero(f: &mut Frame, area: Rect, app: &AppState, chrome: Chrome, accents: (Color, Color)) {
    let (primary, secondary) = accents;
    let toggle = app
        .document
        .theme_toggle
        .as_ref()
        .map(|t| t.title.as_str())
        .unwrap_or_default();

    let text = vec![
        Line::from(Span::styled(
            app.profile.name.as_str(),
            Style::default().fg(primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            app.profile.tagline.as_str(),
            Style::default().fg(chrome.foreground),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[T] ", Style::default().fg(secondary).add_modifier(Modifier::BOLD)),
            Span::styled(toggle, Style::default().fg(chrome.muted)),
        ]),
    ];

    let hero = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(primary)),
        )
        .style(Style::default().bg(chrome.background))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(hero, area);
}
