// Particle backdrop rendering module
//
// Paints the live particle instance onto a Braille canvas that covers the
// whole page. Terminals have no alpha, so opacity is faked by blending the
// accent toward the page background.

use crate::color::HexColor;
use crate::effect::particles::ParticleInstance;
use crate::theme::{interpolate_color, rgb_of, Chrome};
use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Line as CanvasLine, Points},
    Frame,
};

/// Links fainter than this are not drawn
const MIN_LINK_OPACITY: f32 = 0.05;

/// Accent drawn at `opacity` over the page background
pub fn blend(chrome: Chrome, color: &HexColor, opacity: f32) -> Color {
    interpolate_color(rgb_of(chrome.background), color.rgb(), opacity)
}

/// Convert engine pixels (origin top-left) to canvas space (origin bottom-left)
pub fn to_canvas(point: (f32, f32), height: f64) -> (f64, f64) {
    (f64::from(point.0), height - f64::from(point.1))
}

pub fn render_backdrop(
    f: &mut Frame,
    area: Rect,
    instance: Option<&ParticleInstance>,
    bounds: (f32, f32),
    chrome: Chrome,
) {
    let width = f64::from(bounds.0.max(1.0));
    let height = f64::from(bounds.1.max(1.0));

    let canvas = Canvas::default()
        .background_color(chrome.background)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            let Some(instance) = instance else {
                return;
            };

            for link in instance.links() {
                if link.opacity < MIN_LINK_OPACITY {
                    continue;
                }
                let (x1, y1) = to_canvas(link.from, height);
                let (x2, y2) = to_canvas(link.to, height);
                ctx.draw(&CanvasLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: blend(chrome, instance.line_color(), link.opacity),
                });
            }

            // Particles on top of the lines
            ctx.layer();
            for particle in instance.particles() {
                let coords = [to_canvas((particle.x, particle.y), height)];
                ctx.draw(&Points {
                    coords: &coords,
                    color: blend(chrome, instance.color(), particle.opacity),
                });
            }
        });

    f.render_widget(canvas, area);
}
