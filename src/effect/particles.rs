// Particle field engine
//
// A small particles.js-style engine: drifting dots with pulsing opacity,
// joined by lines when closer than the link distance. Instances register
// themselves on the first frame after a request, mirroring the browser
// engine's asynchronous start. Positions are in viewport pixels.

use super::{EffectConfig, EffectInstance, EngineError, ParticleEngine};
use crate::color::HexColor;
use crate::dom::{Container, Surface};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Frames per second the speed setting is expressed in
const REFERENCE_FPS: f32 = 60.0;

/// Longest step applied in one frame, so a stalled terminal does not teleport particles
const MAX_STEP_SECS: f32 = 0.1;

/// Opacity change per second while pulsing
const OPACITY_SPEED: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    pub radius: f32,
    pub opacity: f32,
    fading: bool,
}

/// Two particles close enough to be joined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: (f32, f32),
    pub to: (f32, f32),
    /// Line opacity scaled by closeness, 0.0..=line opacity
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct ParticleInstance {
    id: u64,
    container_id: String,
    config: EffectConfig,
    particles: Vec<Particle>,
    detached: bool,
}

impl ParticleInstance {
    #[cfg(test)]
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn color(&self) -> &HexColor {
        &self.config.color
    }

    pub fn line_color(&self) -> &HexColor {
        &self.config.line_linked.color
    }

    /// Pairs of particles within the link distance
    pub fn links(&self) -> Vec<Link> {
        let distance = self.config.line_linked.distance;
        let max_opacity = self.config.line_linked.opacity;
        let mut links = Vec::new();

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                if dist < distance {
                    links.push(Link {
                        from: (a.x, a.y),
                        to: (b.x, b.y),
                        opacity: max_opacity * (1.0 - dist / distance),
                    });
                }
            }
        }
        links
    }

    fn step(&mut self, dt: f32, bounds: (f32, f32)) {
        let (width, height) = bounds;
        let low = self.config.opacity_min;
        let high = self.config.opacity;

        for p in &mut self.particles {
            p.x += p.vx * dt;
            p.y += p.vy * dt;

            // Leaving one edge re-enters from the opposite one
            if width > 0.0 {
                p.x = p.x.rem_euclid(width);
            }
            if height > 0.0 {
                p.y = p.y.rem_euclid(height);
            }

            if p.fading {
                p.opacity -= OPACITY_SPEED * dt;
                if p.opacity <= low {
                    p.opacity = low;
                    p.fading = false;
                }
            } else {
                p.opacity += OPACITY_SPEED * dt;
                if p.opacity >= high {
                    p.opacity = high;
                    p.fading = true;
                }
            }
        }
    }
}

impl EffectInstance for ParticleInstance {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_color(&mut self, color: &HexColor) -> Result<(), EngineError> {
        if self.detached {
            return Err(EngineError::InvalidState {
                id: self.id,
                state: "detached",
            });
        }
        self.config.color = color.clone();
        self.config.line_linked.color = color.clone();
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), EngineError> {
        if self.detached {
            return Err(EngineError::InvalidState {
                id: self.id,
                state: "detached",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct PendingInit {
    container_id: String,
    config: EffectConfig,
}

/// The engine: a registry of instances plus at most one queued start
#[derive(Debug)]
pub struct ParticleField {
    rng: StdRng,
    bounds: (f32, f32),
    pending: Option<PendingInit>,
    registry: Vec<ParticleInstance>,
    next_id: u64,
    last_frame: Option<Instant>,
}

impl ParticleField {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), width, height)
    }

    /// Deterministic engine for tests
    #[cfg(test)]
    pub fn seeded(seed: u64, width: f64, height: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), width, height)
    }

    fn with_rng(rng: StdRng, width: f64, height: f64) -> Self {
        Self {
            rng,
            bounds: (width as f32, height as f32),
            pending: None,
            registry: Vec::new(),
            next_id: 0,
            last_frame: None,
        }
    }

    pub fn bounds(&self) -> (f32, f32) {
        self.bounds
    }

    /// Every registered instance, oldest first
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.registry
    }

    fn spawn(&mut self, config: &EffectConfig) -> Vec<Particle> {
        let (width, height) = self.bounds;
        let base_speed = config.speed * REFERENCE_FPS;

        (0..config.count)
            .map(|_| {
                let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                let speed = base_speed * self.rng.gen_range(0.2..1.0);
                Particle {
                    x: self.rng.gen_range(0.0..width.max(1.0)),
                    y: self.rng.gen_range(0.0..height.max(1.0)),
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed,
                    radius: self.rng.gen_range(0.5..=config.size),
                    opacity: self.rng.gen_range(config.opacity_min..=config.opacity),
                    fading: self.rng.gen_bool(0.5),
                }
            })
            .collect()
    }
}

impl ParticleEngine for ParticleField {
    type Instance = ParticleInstance;

    fn request_init(&mut self, container_id: &str, config: EffectConfig) {
        self.pending = Some(PendingInit {
            container_id: container_id.to_string(),
            config,
        });
    }

    fn cancel_pending(&mut self) {
        self.pending = None;
    }

    fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn pump(&mut self, container: &mut Container, now: Instant) {
        if let Some(request) = self.pending.take() {
            if request.container_id == container.id {
                self.next_id += 1;
                let particles = self.spawn(&request.config);
                container.append(Surface {
                    instance_id: self.next_id,
                });
                self.registry.push(ParticleInstance {
                    id: self.next_id,
                    container_id: request.container_id,
                    config: request.config,
                    particles,
                    detached: false,
                });
            } else {
                tracing::warn!(
                    requested = %request.container_id,
                    found = %container.id,
                    "Particle container not found, dropping start request"
                );
            }
        }

        // An instance whose surface was removed behind the engine's back stops accepting updates
        for instance in &mut self.registry {
            if instance.container_id == container.id
                && !container
                    .surfaces()
                    .iter()
                    .any(|s| s.instance_id == instance.id)
            {
                instance.detached = true;
            }
        }

        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32().min(MAX_STEP_SECS))
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let bounds = self.bounds;
        for instance in self.registry.iter_mut().filter(|i| !i.detached) {
            instance.step(dt, bounds);
        }
    }

    fn resize_surface(&mut self, width: f64, height: f64) {
        self.bounds = (width as f32, height as f32);
    }

    fn registered(&self) -> usize {
        self.registry.len()
    }

    fn first_id(&self) -> Option<u64> {
        self.registry.first().map(|i| i.id)
    }

    fn instance_mut(&mut self, id: u64) -> Option<&mut ParticleInstance> {
        self.registry.iter_mut().find(|i| i.id == id)
    }

    fn destroy_hook(&mut self, id: u64) -> Result<(), EngineError> {
        let before = self.registry.len();
        self.registry.retain(|i| i.id != id);
        if self.registry.len() == before {
            return Err(EngineError::UnknownInstance(id));
        }
        Ok(())
    }

    fn clear_registry(&mut self) {
        self.registry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PARTICLES_CONTAINER_ID;
    use crate::effect::{build_config, ParticlePolicy};
    use proptest::prelude::*;
    use std::time::Duration;

    fn config(count: u32) -> EffectConfig {
        let color = HexColor::parse("#3ba76b").unwrap();
        build_config(ParticlePolicy::Fixed(count), true, &color, 1280)
    }

    fn started(count: u32) -> (ParticleField, Container, Instant) {
        let mut engine = ParticleField::seeded(7, 1280.0, 640.0);
        let mut container = Container::new(PARTICLES_CONTAINER_ID);
        let t0 = Instant::now();
        engine.request_init(PARTICLES_CONTAINER_ID, config(count));
        engine.pump(&mut container, t0);
        (engine, container, t0)
    }

    #[test]
    fn test_start_completes_on_pump() {
        let mut engine = ParticleField::seeded(1, 800.0, 600.0);
        let mut container = Container::new(PARTICLES_CONTAINER_ID);
        engine.request_init(PARTICLES_CONTAINER_ID, config(40));
        assert_eq!(engine.registered(), 0);
        assert!(engine.has_pending());

        engine.pump(&mut container, Instant::now());
        assert_eq!(engine.registered(), 1);
        assert_eq!(container.surfaces().len(), 1);
        assert_eq!(engine.instances()[0].particles().len(), 40);
    }

    #[test]
    fn test_wrong_container_drops_request() {
        let mut engine = ParticleField::seeded(1, 800.0, 600.0);
        let mut container = Container::new("elsewhere");
        engine.request_init(PARTICLES_CONTAINER_ID, config(10));
        engine.pump(&mut container, Instant::now());
        assert_eq!(engine.registered(), 0);
        assert!(!engine.has_pending());
    }

    #[test]
    fn test_set_color_updates_particles_and_lines() {
        let (mut engine, _container, _) = started(10);
        let id = engine.first_id().unwrap();
        let color = HexColor::parse("#ea580c").unwrap();

        let instance = engine.instance_mut(id).unwrap();
        instance.set_color(&color).unwrap();
        instance.refresh().unwrap();
        assert_eq!(instance.color(), &color);
        assert_eq!(instance.line_color(), &color);
    }

    #[test]
    fn test_detached_instance_rejects_updates() {
        let (mut engine, mut container, t0) = started(10);
        let id = engine.first_id().unwrap();
        container.remove_surfaces();
        engine.pump(&mut container, t0 + Duration::from_millis(33));

        let color = HexColor::parse("#ea580c").unwrap();
        let result = engine.instance_mut(id).unwrap().set_color(&color);
        assert_eq!(
            result,
            Err(EngineError::InvalidState { id, state: "detached" })
        );
    }

    #[test]
    fn test_destroy_hook_unknown_id() {
        let (mut engine, _container, _) = started(5);
        let id = engine.first_id().unwrap();
        assert_eq!(engine.destroy_hook(id), Ok(()));
        assert_eq!(engine.destroy_hook(id), Err(EngineError::UnknownInstance(id)));
    }

    #[test]
    fn test_links_fade_with_distance() {
        let (engine, _container, _) = started(60);
        let instance = &engine.instances()[0];
        let max = instance.config().line_linked.opacity;
        for link in instance.links() {
            assert!(link.opacity > 0.0 && link.opacity <= max);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Particles stay inside the viewport and within the opacity band
        #[test]
        fn prop_particles_stay_in_bounds(seed in any::<u64>(), frames in 1usize..40) {
            let mut engine = ParticleField::seeded(seed, 640.0, 480.0);
            let mut container = Container::new(PARTICLES_CONTAINER_ID);
            let t0 = Instant::now();
            engine.request_init(PARTICLES_CONTAINER_ID, config(30));

            for frame in 0..frames {
                engine.pump(&mut container, t0 + Duration::from_millis(33 * frame as u64));
            }

            let instance = &engine.instances()[0];
            let cfg = instance.config();
            for p in instance.particles() {
                prop_assert!(p.x >= 0.0 && p.x <= 640.0, "x = {}", p.x);
                prop_assert!(p.y >= 0.0 && p.y <= 480.0, "y = {}", p.y);
                prop_assert!(p.opacity >= cfg.opacity_min - 1e-4);
                prop_assert!(p.opacity <= cfg.opacity + 1e-4);
            }
        }
    }
}
