// Palette selector rendering module
//
// Renders the palette options bar with its active indicator and, when
// developer controls are on, the palette panel with swatches and the
// description of the current palette.

use crate::color::HexColor;
use crate::dom::{DevPreview, PaletteOption};
use crate::palette::Palette;
use crate::theme::Chrome;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Swatch color for a stored hex value (unparseable values draw in gray)
fn swatch(hex: &str) -> Color {
    HexColor::parse(hex)
        .map(|c| c.to_color())
        .unwrap_or(Color::Gray)
}

pub fn render_palette_bar(
    f: &mut Frame,
    area: Rect,
    options: &[PaletteOption],
    chrome: Chrome,
    accent: Color,
) {
    let mut spans = vec![Span::raw(" ")];
    for (idx, option) in options.iter().enumerate() {
        let style = if option.active {
            Style::default()
                .fg(chrome.background)
                .bg(accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(chrome.muted)
        };
        let marker = if option.active { "●" } else { "○" };
        spans.push(Span::styled(
            format!(" {} {} {} ", idx + 1, marker, option.label),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    let bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title(Span::styled(" Palette ", Style::default().fg(accent)))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(chrome.border)),
        )
        .style(Style::default().bg(chrome.background));

    f.render_widget(bar, area);
}

/// Developer panel: every palette with the current one highlighted
pub fn render_dev_panel(
    f: &mut Frame,
    area: Rect,
    palettes: &[Palette],
    preview: &DevPreview,
    chrome: Chrome,
) {
    let mut items: Vec<ListItem> = palettes
        .iter()
        .enumerate()
        .map(|(idx, palette)| {
            let selected = idx == preview.selected_index;
            let style = if selected {
                Style::default()
                    .fg(chrome.foreground)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(chrome.muted)
            };
            ListItem::new(Line::from(vec![
                Span::styled("██", Style::default().fg(swatch(palette.colors.primary))),
                Span::styled("██ ", Style::default().fg(swatch(palette.colors.secondary))),
                Span::styled(format!("{:2}. {}", idx + 1, palette.name), style),
            ]))
        })
        .collect();

    items.push(ListItem::new(Line::from("")));
    items.push(ListItem::new(Line::from(vec![
        Span::styled("████", Style::default().fg(swatch(&preview.primary_swatch))),
        Span::raw(" "),
        Span::styled("████", Style::default().fg(swatch(&preview.secondary_swatch))),
    ])));
    items.push(ListItem::new(Line::from(Span::styled(
        preview.description.clone(),
        Style::default().fg(chrome.foreground),
    ))));

    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(
                " 🎨 Palettes [D] ",
                Style::default().fg(chrome.foreground).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(chrome.border))
            .style(Style::default().bg(chrome.background)),
    );

    f.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_parses_hex() {
        assert_eq!(swatch("#112233"), Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(swatch(""), Color::Gray);
    }
}
