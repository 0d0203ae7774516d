//! The particle field
//!
//! Owns the grid, the live ripples, the intro wave and the pointer, and
//! paints one frame at a time onto its `Surface`. Event handlers are plain
//! methods; whoever owns the field forwards pointer and resize events.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::TIME_STEP;
use crate::renderer::{Ambient, Surface, draw_edge_glow, draw_particle};
use crate::settings::{ColorOptions, FieldOptions, FieldSettings, RippleOptions};
use crate::sim::{
    FrameInputs, IntroWave, Particle, Pointer, Ripple, RippleRequest, advance_ripples, build_grid,
    displace, ease,
};

/// Animated pixel grid bound to a drawing surface
pub struct ParticleField<S: Surface> {
    surface: S,
    settings: FieldSettings,
    particles: Vec<Particle>,
    ripples: Vec<Ripple>,
    intro: Option<IntroWave>,
    pointer: Pointer,
    /// Size of the current grid
    size: DVec2,
    /// Simulation time, advanced a fixed step per frame
    time: f64,
    rng: Pcg32,
    /// Wavefront radii for the frame being drawn
    fronts: Vec<f64>,
}

impl<S: Surface> ParticleField<S> {
    /// Create a field; the grid is built on `init_grid` (or `Animator::start`)
    pub fn new(surface: S, options: &FieldOptions, seed: u64) -> Self {
        Self::with_settings(surface, FieldSettings::from_options(options), seed)
    }

    pub fn with_settings(surface: S, settings: FieldSettings, seed: u64) -> Self {
        let center = surface.viewport() / 2.0;
        let intro = settings.intro_enabled.then(|| IntroWave::new(center));
        Self {
            surface,
            settings,
            particles: Vec::new(),
            ripples: Vec::new(),
            intro,
            pointer: Pointer::default(),
            size: DVec2::ZERO,
            time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            fronts: Vec::new(),
        }
    }

    /// Fit the surface to the viewport and rebuild the grid from scratch
    pub fn init_grid(&mut self) {
        let viewport = self.surface.viewport().max(DVec2::ZERO).floor();
        self.surface.resize(viewport.x as u32, viewport.y as u32);
        self.size = viewport;
        self.particles = build_grid(viewport.x, viewport.y, self.settings.spacing, &mut self.rng);
        log::info!(
            "Grid built: {} particles for {}x{} at spacing {}",
            self.particles.len(),
            viewport.x,
            viewport.y,
            self.settings.spacing
        );
    }

    /// Start a new ripple; unset request fields use viewport-based defaults
    pub fn trigger_ripple(&mut self, request: RippleRequest) {
        let ripple = request.resolve(self.surface.viewport(), self.settings.ripple.velocity);
        log::debug!(
            "Ripple at ({:.0}, {:.0}) v={} maxR={:.0}",
            ripple.origin.x,
            ripple.origin.y,
            ripple.velocity,
            ripple.max_radius
        );
        self.ripples.push(ripple);
    }

    /// Re-arm the intro wave at `(x, y)` starting now
    pub fn set_intro_center(&mut self, x: f64, y: f64) {
        let now = self.time;
        if let Some(intro) = self.intro.as_mut() {
            intro.rearm(DVec2::new(x, y), now);
            log::debug!("Intro wave armed at ({:.0}, {:.0})", x, y);
        }
    }

    pub fn set_ripple_options(&mut self, partial: &RippleOptions) {
        self.settings.ripple.merge(partial);
    }

    pub fn set_colors(&mut self, partial: &ColorOptions) {
        self.settings.palette.merge(partial);
    }

    /// Pointer moved; the first move cancels a running intro
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer.pos = DVec2::new(x, y);
        self.pointer.active = true;
        if let Some(intro) = self.intro.as_mut().filter(|i| i.active) {
            intro.active = false;
            log::debug!("Intro wave cancelled by pointer");
        }
    }

    pub fn on_resize(&mut self) {
        self.init_grid();
    }

    /// Advance the simulation one frame and paint it
    pub fn render_frame(&mut self) {
        let size = self.size;
        self.surface.clear(size.x, size.y);

        advance_ripples(&mut self.ripples, self.settings.ripple.decay);

        let mut fronts = std::mem::take(&mut self.fronts);
        match self.intro.as_mut() {
            Some(intro) => intro.update(self.time, size.length(), &mut fronts),
            None => fronts.clear(),
        }

        let frame = FrameInputs {
            ripples: &self.ripples,
            ripple: &self.settings.ripple,
            palette: &self.settings.palette,
            intro: self.intro.as_ref().filter(|_| !fronts.is_empty()),
            fronts: &fronts,
            pointer: self.pointer.pos,
            light_radius: self.settings.light_radius,
            gravity_strength: self.settings.gravity_strength,
        };
        let ambient = Ambient {
            time: self.time,
            default_dot_alpha: self.settings.default_dot_alpha,
            light_radius: self.settings.light_radius,
            brightness_boost: self.intro.as_ref().map_or(0.0, |i| i.brightness_boost),
            pointer: self.pointer.pos,
        };

        for p in self.particles.iter_mut() {
            let look = displace(p, &frame);
            ease(p, look.target);
            draw_particle(&mut self.surface, p, &look, &ambient);
        }

        let pointer = self.pointer.active.then_some(self.pointer.pos);
        draw_edge_glow(&mut self.surface, size, self.time, pointer);

        self.fronts = fronts;
        self.time += TIME_STEP;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn intro(&self) -> Option<&IntroWave> {
        self.intro.as_ref()
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Size of the current grid
    pub fn size(&self) -> DVec2 {
        self.size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use serde_json::json;

    fn field() -> ParticleField<RecordingSurface> {
        let mut field =
            ParticleField::new(RecordingSurface::new(800.0, 600.0), &FieldOptions::default(), 42);
        field.init_grid();
        field
    }

    #[test]
    fn test_default_field_end_to_end() {
        let mut field = field();
        assert_eq!(field.particles().len(), 638);
        assert_eq!(field.surface().size(), (800, 600));

        field.trigger_ripple(
            RippleRequest::at(400.0, 300.0)
                .with_velocity(6.0)
                .with_max_radius(640.0),
        );
        field.render_frame();

        assert_eq!(field.ripples().len(), 1);
        assert_eq!(field.ripples()[0].radius, 6.0);
        assert!((field.ripples()[0].opacity - 0.995).abs() < 1e-12);
        assert!((field.time() - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_frame_draw_order() {
        let mut field = field();
        field.render_frame();
        let commands = field.surface().commands();

        assert_eq!(
            commands.first(),
            Some(&DrawCommand::Clear {
                width: 800.0,
                height: 600.0
            })
        );
        let tail: Vec<_> = commands[commands.len() - 4..].iter().collect();
        assert!(tail.iter().all(|c| matches!(c, DrawCommand::Gradient { .. })));
        // One base dot per particle at least
        assert!(field.surface().fills().count() >= 638);
    }

    #[test]
    fn test_ripple_expires() {
        let mut field = field();
        field.trigger_ripple(RippleRequest::at(0.0, 0.0).with_max_radius(1e9));
        for _ in 0..199 {
            field.render_frame();
        }
        assert_eq!(field.ripples().len(), 1);
        field.render_frame();
        assert!(field.ripples().is_empty());
    }

    #[test]
    fn test_ripple_defaults_from_viewport() {
        let mut field = field();
        field.set_ripple_options(&RippleOptions {
            velocity: json!(9),
            ..Default::default()
        });
        field.trigger_ripple(RippleRequest::default());
        let r = &field.ripples()[0];
        assert_eq!(r.origin, DVec2::new(400.0, 300.0));
        assert_eq!(r.velocity, 9.0);
        assert_eq!(r.max_radius, 640.0);
    }

    #[test]
    fn test_resize_rebuilds_grid() {
        let mut field = field();
        field.surface_mut().set_viewport(400.0, 300.0);
        field.on_resize();
        assert_eq!(field.particles().len(), 15 * 11);
        assert_eq!(field.size(), DVec2::new(400.0, 300.0));
        assert_eq!(field.surface().size(), (400, 300));
    }

    #[test]
    fn test_pointer_cancels_intro_once() {
        let mut field = field();
        assert!(field.intro().unwrap().active);
        assert_eq!(field.intro().unwrap().center, DVec2::new(400.0, 300.0));

        field.on_pointer_move(10.0, 20.0);
        assert!(!field.intro().unwrap().active);
        assert!(field.pointer().active);
        assert_eq!(field.pointer().pos, DVec2::new(10.0, 20.0));

        // Re-armed intro survives until the next pointer move
        for _ in 0..10 {
            field.render_frame();
        }
        field.set_intro_center(100.0, 50.0);
        let intro = field.intro().unwrap();
        assert!(intro.active);
        assert_eq!(intro.center, DVec2::new(100.0, 50.0));
        assert_eq!(intro.start_time, field.time());

        field.on_pointer_move(11.0, 20.0);
        assert!(!field.intro().unwrap().active);
    }

    #[test]
    fn test_intro_runs_out() {
        let mut field = field();
        field.set_intro_center(400.0, 300.0);
        // 18 time units of pulses = 1200 frames
        for _ in 0..1205 {
            field.render_frame();
        }
        assert!(!field.intro().unwrap().active);
    }

    #[test]
    fn test_tiny_spacing_falls_back_to_default_grid() {
        let options = FieldOptions {
            spacing: json!("1e-300"),
            ..Default::default()
        };
        let mut field = ParticleField::new(RecordingSurface::new(800.0, 600.0), &options, 3);
        field.init_grid();
        assert_eq!(field.settings().spacing, 28.0);
        assert_eq!(field.particles().len(), 638);
    }

    #[test]
    fn test_intro_disabled() {
        let options = FieldOptions {
            intro: json!(false),
            ..Default::default()
        };
        let mut field = ParticleField::new(RecordingSurface::new(800.0, 600.0), &options, 1);
        assert!(field.intro().is_none());
        field.set_intro_center(1.0, 1.0);
        assert!(field.intro().is_none());
    }

    #[test]
    fn test_set_colors_merges() {
        let mut field = field();
        field.set_colors(&ColorOptions {
            blue: json!("#000000"),
            white: json!({"not": "a color"}),
            ..Default::default()
        });
        let palette = field.settings().palette;
        assert_eq!(palette.blue, Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(palette.white, Rgb::new(255.0, 255.0, 255.0));
    }

    #[test]
    fn test_particles_ease_toward_pointer() {
        let mut field = field();
        field.on_pointer_move(400.0, 300.0);
        let before: Vec<_> = field.particles().iter().map(|p| p.pos).collect();
        field.render_frame();
        let moved = field
            .particles()
            .iter()
            .zip(&before)
            .filter(|(p, b)| p.pos != **b)
            .count();
        assert!(moved > 0);
        for p in field.particles() {
            let to_pointer = DVec2::new(400.0, 300.0) - p.base;
            let step = p.pos - p.base;
            // Never overshoots past the pointer and never moves away from it
            assert!(step.dot(to_pointer) >= -1e-9);
            assert!(step.length() <= to_pointer.length() + 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = field();
        let mut b = field();
        for f in [&mut a, &mut b] {
            f.on_pointer_move(123.0, 456.0);
            f.trigger_ripple(RippleRequest::at(200.0, 200.0));
            for _ in 0..5 {
                f.render_frame();
            }
        }
        assert_eq!(a.surface().commands(), b.surface().commands());
    }
}
