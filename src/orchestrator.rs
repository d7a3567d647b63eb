// Theme/palette to particle synchronization
//
// Subscribes to document change notifications and keeps the particle effect
// colored with the current accent. All notifications queued since the last
// frame collapse into a single recolor, so a theme switch that also touches
// the palette marker never triggers two rebuilds.

use crate::app::config::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::color::{self, HexColor};
use crate::dom::Document;
use crate::effect::{EffectController, EffectInputs, ParticleEngine, Recolor};
use crate::notify::{Broadcaster, Notification};
use crate::theme::stylesheet::computed_primary;
use std::sync::mpsc::Receiver;
use std::time::Instant;

/// Viewport size in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn width_px(self) -> u32 {
        u32::from(self.cols) * CELL_WIDTH_PX
    }

    pub fn height_px(self) -> u32 {
        u32::from(self.rows) * CELL_HEIGHT_PX
    }
}

/// Current accent resolved against the document's theme
pub fn accent_color(doc: &Document) -> HexColor {
    color::resolve(&computed_primary(doc), doc.is_dark())
}

fn inputs_for(doc: &Document, viewport: Viewport) -> EffectInputs {
    EffectInputs {
        is_dark: doc.is_dark(),
        color: accent_color(doc),
        viewport_width: viewport.width_px(),
    }
}

pub struct Orchestrator<E: ParticleEngine> {
    effect: EffectController<E>,
    notifications: Receiver<Notification>,
    viewport: Viewport,
}

impl<E: ParticleEngine> Orchestrator<E> {
    pub fn new(
        mut effect: EffectController<E>,
        bus: &mut Broadcaster<Notification>,
        viewport: Viewport,
    ) -> Self {
        effect.engine_mut().resize_surface(
            f64::from(viewport.width_px()),
            f64::from(viewport.height_px()),
        );
        Self {
            effect,
            notifications: bus.subscribe(),
            viewport,
        }
    }

    pub fn effect(&self) -> &EffectController<E> {
        &self.effect
    }

    pub fn inputs(&self, doc: &Document) -> EffectInputs {
        inputs_for(doc, self.viewport)
    }

    /// Start the effect for the current document state
    pub fn start(&mut self, doc: &mut Document) -> bool {
        let inputs = self.inputs(doc);
        self.effect.initialize(doc, &inputs)
    }

    /// Drop notifications queued before the effect existed
    pub fn discard_pending(&mut self) -> usize {
        self.notifications.try_iter().count()
    }

    /// Drain queued notifications and recolor once if any arrived
    pub fn handle_notifications(&mut self, doc: &mut Document, now: Instant) -> Option<Recolor> {
        let mut theme = false;
        let mut palette = false;
        for note in self.notifications.try_iter() {
            match note {
                Notification::ThemeChanged => theme = true,
                Notification::PaletteChanged => palette = true,
            }
        }
        if !theme && !palette {
            return None;
        }

        let color = accent_color(doc);
        tracing::debug!(theme, palette, color = %color, "Syncing particle colors");
        Some(self.effect.recolor(doc, &color, now))
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16, now: Instant) {
        self.viewport = Viewport { cols, rows };
        self.effect.engine_mut().resize_surface(
            f64::from(self.viewport.width_px()),
            f64::from(self.viewport.height_px()),
        );
        self.effect.on_resize(self.viewport.width_px(), now);
    }

    /// One frame: react to notifications, then advance the effect
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        self.handle_notifications(doc, now);

        let viewport = self.viewport;
        let snapshot = doc.clone();
        self.effect
            .tick(doc, now, || inputs_for(&snapshot, viewport));
    }
}
