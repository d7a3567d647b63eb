// Particle backdrop lifecycle
//
// The controller owns the single slot for a live particle instance. It builds
// the engine configuration from theme, accent color and viewport width, asks
// the engine to start (which completes on a later frame), tears instances
// down, and recolors the running instance in place when it can. When in-place
// recoloring fails it rebuilds: destroy now, initialize after a short delay.

pub mod particles;

use crate::app::config::{
    effect_style, DESKTOP_PARTICLE_COUNT, FIXED_PARTICLE_COUNT, LINE_LINK_DISTANCE,
    MOBILE_MAX_WIDTH_PX, MOBILE_PARTICLE_COUNT, MOVE_SPEED, PARTICLE_SIZE,
    REINIT_AFTER_RECOLOR, REINIT_AFTER_RESIZE, RESIZE_DEBOUNCE, TABLET_MAX_WIDTH_PX,
    TABLET_PARTICLE_COUNT,
};
use crate::color::HexColor;
use crate::dom::{Container, Document};
use crate::timer::{Debounce, Timer};
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;

/// Failures reported by the rendering engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no live effect instance")]
    NoInstance,

    #[error("instance {0} is not registered with the engine")]
    UnknownInstance(u64),

    #[error("instance {id} cannot be modified while {state}")]
    InvalidState { id: u64, state: &'static str },
}

/// How many particles to draw for a given viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticlePolicy {
    /// 30 on mobile, 60 on tablet, 120 on desktop
    #[default]
    Responsive,
    /// Same count everywhere
    Fixed(u32),
}

impl ParticlePolicy {
    pub fn fixed() -> Self {
        ParticlePolicy::Fixed(FIXED_PARTICLE_COUNT)
    }

    pub fn particle_count(self, viewport_width: u32) -> u32 {
        match self {
            ParticlePolicy::Fixed(count) => count,
            ParticlePolicy::Responsive if viewport_width <= MOBILE_MAX_WIDTH_PX => {
                MOBILE_PARTICLE_COUNT
            }
            ParticlePolicy::Responsive if viewport_width <= TABLET_MAX_WIDTH_PX => {
                TABLET_PARTICLE_COUNT
            }
            ParticlePolicy::Responsive => DESKTOP_PARTICLE_COUNT,
        }
    }
}

/// Connecting-line settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineConfig {
    pub distance: f32,
    pub color: HexColor,
    pub opacity: f32,
    pub width: f32,
}

/// Everything the engine needs to start an instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectConfig {
    pub count: u32,
    pub color: HexColor,
    pub opacity: f32,
    pub opacity_min: f32,
    pub size: f32,
    pub speed: f32,
    pub line_linked: LineConfig,
}

/// Build the engine configuration for the current page state
pub fn build_config(
    policy: ParticlePolicy,
    is_dark: bool,
    color: &HexColor,
    viewport_width: u32,
) -> EffectConfig {
    let style = effect_style(is_dark);
    EffectConfig {
        count: policy.particle_count(viewport_width),
        color: color.clone(),
        opacity: style.opacity,
        opacity_min: style.opacity_min,
        size: PARTICLE_SIZE,
        speed: MOVE_SPEED,
        line_linked: LineConfig {
            distance: LINE_LINK_DISTANCE,
            color: color.clone(),
            opacity: style.line_opacity,
            width: style.line_width,
        },
    }
}

/// Inputs read from the page whenever a configuration is built
#[derive(Debug, Clone, PartialEq)]
pub struct EffectInputs {
    pub is_dark: bool,
    pub color: HexColor,
    pub viewport_width: u32,
}

/// The two capabilities needed from a running instance
pub trait EffectInstance {
    fn id(&self) -> u64;

    /// Replace particle and line colors
    fn set_color(&mut self, color: &HexColor) -> Result<(), EngineError>;

    /// Redraw with the current settings
    fn refresh(&mut self) -> Result<(), EngineError>;
}

/// Adapter over the particle rendering engine
///
/// Initialization is asynchronous: `request_init` only queues the request,
/// and the instance shows up in the registry after a later `pump`.
pub trait ParticleEngine {
    type Instance: EffectInstance;

    /// Queue a new instance for `container`, replacing any queued request
    fn request_init(&mut self, container_id: &str, config: EffectConfig);

    /// Forget a queued request that has not started yet
    fn cancel_pending(&mut self);

    fn has_pending(&self) -> bool;

    /// Run the engine's frame: finish queued setup, advance animation
    fn pump(&mut self, container: &mut Container, now: Instant);

    /// Canvas size in pixels
    fn resize_surface(&mut self, width: f64, height: f64);

    /// Number of instances in the engine's registry
    fn registered(&self) -> usize;

    /// Id of the first registered instance
    fn first_id(&self) -> Option<u64>;

    fn instance_mut(&mut self, id: u64) -> Option<&mut Self::Instance>;

    /// The engine's own teardown hook
    fn destroy_hook(&mut self, id: u64) -> Result<(), EngineError>;

    /// Drop every instance from the registry
    fn clear_registry(&mut self);
}

/// Outcome of a recolor request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recolor {
    /// Colors changed on the running instance
    Patched,
    /// Instance torn down; a fresh one is scheduled
    Rebuilding,
}

/// Owner of the zero-or-one live particle instance
#[derive(Debug)]
pub struct EffectController<E: ParticleEngine> {
    engine: E,
    policy: ParticlePolicy,
    handle: Option<u64>,
    reinit: Timer,
    resize: Debounce<u32>,
    last_count: Option<u32>,
}

impl<E: ParticleEngine> EffectController<E> {
    pub fn new(engine: E, policy: ParticlePolicy) -> Self {
        Self {
            engine,
            policy,
            handle: None,
            reinit: Timer::new(),
            resize: Debounce::new(RESIZE_DEBOUNCE),
            last_count: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Id of the captured live instance
    pub fn handle(&self) -> Option<u64> {
        self.handle
    }

    #[cfg(test)]
    pub fn rebuild_pending(&self) -> bool {
        self.reinit.is_pending()
    }

    fn has_instance(&self) -> bool {
        self.handle.is_some() || self.engine.registered() > 0 || self.engine.has_pending()
    }

    /// Start a new instance in the page's particle container
    ///
    /// Returns `false` when the page has no container. Any previous instance
    /// is torn down first so two never coexist.
    pub fn initialize(&mut self, doc: &mut Document, inputs: &EffectInputs) -> bool {
        if doc.effect_container.is_none() {
            tracing::debug!("No particle container on this page, skipping effect");
            return false;
        }
        if self.has_instance() {
            self.destroy(doc);
        }

        let Some(container) = doc.effect_container.as_mut() else {
            return false;
        };
        container.clear();

        let config = build_config(self.policy, inputs.is_dark, &inputs.color, inputs.viewport_width);
        self.last_count = Some(config.count);
        tracing::info!(
            count = config.count,
            color = %config.color,
            dark = inputs.is_dark,
            "Requesting particle effect"
        );
        if let Ok(json) = serde_json::to_string(&config) {
            tracing::debug!(config = %json, "Effect config");
        }

        self.engine.request_init(&container.id, config);
        self.reinit.cancel();
        true
    }

    /// Tear down the live instance; safe to call with nothing running
    pub fn destroy(&mut self, doc: &mut Document) {
        if let Some(id) = self.handle.take() {
            if let Err(e) = self.engine.destroy_hook(id) {
                tracing::warn!(error = %e, id, "Engine destroy hook failed, cleaning up manually");
            }
        }
        self.engine.cancel_pending();
        self.engine.clear_registry();

        if let Some(container) = doc.effect_container.as_mut() {
            let removed = container.remove_surfaces();
            container.clear();
            if removed > 0 {
                tracing::debug!(removed, "Removed particle surfaces");
            }
        }
    }

    /// Recolor in place, or rebuild when the instance cannot be patched
    pub fn recolor(&mut self, doc: &mut Document, color: &HexColor, now: Instant) -> Recolor {
        let patched = match self.handle.and_then(|id| self.engine.instance_mut(id)) {
            Some(instance) => instance.set_color(color).and_then(|()| instance.refresh()),
            None => Err(EngineError::NoInstance),
        };

        match patched {
            Ok(()) => {
                tracing::info!(color = %color, "Particle colors updated");
                Recolor::Patched
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update particles in place, reinitializing");
                self.destroy(doc);
                self.reinit.schedule(now, REINIT_AFTER_RECOLOR);
                Recolor::Rebuilding
            }
        }
    }

    /// Record a viewport width change; acted upon after the quiet period
    pub fn on_resize(&mut self, viewport_width: u32, now: Instant) {
        self.resize.push(viewport_width, now);
    }

    /// Advance timers and the engine by one frame
    pub fn tick<F>(&mut self, doc: &mut Document, now: Instant, inputs: F)
    where
        F: Fn() -> EffectInputs,
    {
        if let Some(width) = self.resize.fire(now) {
            let count = self.policy.particle_count(width);
            if self.has_instance() && self.last_count != Some(count) {
                tracing::info!(width, count, "Viewport density changed, rebuilding particles");
                self.destroy(doc);
                self.reinit.schedule(now, REINIT_AFTER_RESIZE);
            }
        }

        if self.reinit.fire(now) {
            self.initialize(doc, &inputs());
        }

        if let Some(container) = doc.effect_container.as_mut() {
            self.engine.pump(container, now);
        }

        if self.handle.is_none() {
            self.handle = self.engine.first_id();
            if let Some(id) = self.handle {
                tracing::info!(id, "Particle instance ready");
            }
        }
    }
}
