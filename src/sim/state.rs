//! Simulation state types
//!
//! Particles, ripples, the intro wave and the pointer. Everything here is
//! plain data plus the small amount of per-entity logic that owns it.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::*;
use crate::settings::parse_optional_number;

/// One grid dot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Grid position, fixed at layout time
    pub base: DVec2,
    /// Rendered position, eased toward each frame's target
    pub pos: DVec2,
    /// Base brightness for the pointer light, in [0.1, 0.6)
    pub alpha: f64,
    /// Has a slow pulsing glow
    pub breathe: bool,
    /// Phase offset for flicker and breathe, in [0, 2π)
    pub phase: f64,
    /// Flicker rate, in [0.8, 1.4)
    pub flicker_speed: f64,
}

impl Particle {
    /// Chance that a particle breathes
    pub const BREATHE_CHANCE: f64 = 0.1;

    pub fn new(base: DVec2, rng: &mut Pcg32) -> Self {
        Self {
            base,
            pos: base,
            alpha: rng.random::<f64>() * 0.5 + 0.1,
            breathe: rng.random_bool(Self::BREATHE_CHANCE),
            phase: rng.random::<f64>() * std::f64::consts::TAU,
            flicker_speed: 0.8 + rng.random::<f64>() * 0.6,
        }
    }
}

/// Number of lattice points `k * spacing` lying in `[0, extent)`
fn lattice_count(extent: f64, spacing: f64) -> usize {
    let mut n = (extent / spacing).ceil() as usize;
    if n > MAX_PARTICLES {
        return n;
    }
    // Division rounding can be off by one either way
    while n > 0 && (n - 1) as f64 * spacing >= extent {
        n -= 1;
    }
    while (n as f64) * spacing < extent {
        n += 1;
    }
    n
}

/// Tile `[0, width) x [0, height)` row-major at `spacing` pitch.
/// Grids over `MAX_PARTICLES` come back empty.
pub fn build_grid(width: f64, height: f64, spacing: f64, rng: &mut Pcg32) -> Vec<Particle> {
    if !(spacing > 0.0) || !(width > 0.0) || !(height > 0.0) {
        return Vec::new();
    }
    let cols = lattice_count(width, spacing);
    let rows = lattice_count(height, spacing);
    let Some(count) = cols.checked_mul(rows).filter(|&n| n <= MAX_PARTICLES) else {
        log::warn!(
            "Refusing a {}x{} grid at spacing {} ({} x {} particles)",
            width,
            height,
            spacing,
            cols,
            rows
        );
        return Vec::new();
    };
    let mut particles = Vec::with_capacity(count);

    for row in 0..rows {
        let y = row as f64 * spacing;
        for col in 0..cols {
            let x = col as f64 * spacing;
            particles.push(Particle::new(DVec2::new(x, y), rng));
        }
    }
    particles
}

/// An expanding ring of displacement and color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ripple {
    pub origin: DVec2,
    pub radius: f64,
    pub max_radius: f64,
    /// Radius growth per frame
    pub velocity: f64,
    pub opacity: f64,
}

impl Ripple {
    /// Grow by one frame and fade by `decay`
    pub fn advance(&mut self, decay: f64) {
        self.radius += self.velocity;
        self.opacity -= decay;
    }

    /// Faded out or past its reach
    pub fn is_spent(&self) -> bool {
        self.opacity <= RIPPLE_FADE_EPSILON || self.radius >= self.max_radius
    }
}

/// Parameters for a new ripple; unset fields get viewport-based defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleRequest {
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(rename = "maxR")]
    pub max_radius: Option<f64>,
    pub velocity: Option<f64>,
    pub opacity: Option<f64>,
}

impl RippleRequest {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Read `{x, y, maxR, velocity, opacity}` from loosely typed options;
    /// missing or unparseable fields stay unset
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(parse_optional_number);
        Self {
            x: field("x"),
            y: field("y"),
            max_radius: field("maxR"),
            velocity: field("velocity"),
            opacity: field("opacity"),
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = Some(max_radius);
        self
    }

    /// Resolve against the viewport size and the configured default velocity
    pub fn resolve(&self, viewport: DVec2, default_velocity: f64) -> Ripple {
        Ripple {
            origin: DVec2::new(
                self.x.unwrap_or(viewport.x / 2.0),
                self.y.unwrap_or(viewport.y / 2.0),
            ),
            radius: 0.0,
            max_radius: self
                .max_radius
                .unwrap_or(viewport.x.max(viewport.y) * RIPPLE_REACH),
            velocity: self.velocity.unwrap_or(default_velocity),
            opacity: self.opacity.unwrap_or(1.0),
        }
    }
}

/// The one-shot concentric pulse played at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroWave {
    pub center: DVec2,
    /// Simulation time the first pulse leaves the center
    pub start_time: f64,
    pub wave_count: u32,
    /// Seconds of simulation time per pulse
    pub period: f64,
    pub thickness: f64,
    pub strength: f64,
    pub brightness_boost: f64,
    pub active: bool,
}

impl IntroWave {
    pub fn new(center: DVec2) -> Self {
        Self {
            center,
            start_time: INTRO_START_TIME,
            wave_count: INTRO_WAVE_COUNT,
            period: INTRO_PERIOD,
            thickness: INTRO_THICKNESS,
            strength: INTRO_STRENGTH,
            brightness_boost: INTRO_BRIGHTNESS_BOOST,
            active: true,
        }
    }

    /// Total time from the first pulse leaving to the last one reaching the corner
    pub fn duration(&self) -> f64 {
        self.wave_count as f64 * self.period
    }

    /// Move the center and replay from `now`
    pub fn rearm(&mut self, center: DVec2, now: f64) {
        self.center = center;
        self.start_time = now;
        self.active = true;
    }

    /// Wavefront radii at `t` seconds after start. A pulse is present while
    /// its own phase lies in `[0, period]`; radius grows linearly to `reach`.
    pub fn fronts_at(&self, t: f64, reach: f64, out: &mut Vec<f64>) {
        out.clear();
        if t < 0.0 || t > self.duration() {
            return;
        }
        for i in 0..self.wave_count {
            let phase = t - i as f64 * self.period;
            if (0.0..=self.period).contains(&phase) {
                out.push(phase / self.period * reach);
            }
        }
    }

    /// Per-frame update: writes this frame's wavefronts into `out` and
    /// switches the wave off once every pulse has finished
    pub fn update(&mut self, time: f64, reach: f64, out: &mut Vec<f64>) {
        out.clear();
        if !self.active {
            return;
        }
        let t = time - self.start_time;
        if t > self.duration() {
            self.active = false;
            log::debug!("Intro wave finished");
            return;
        }
        self.fronts_at(t, reach, out);
    }
}

/// Last known pointer position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub pos: DVec2,
    pub active: bool,
}

impl Default for Pointer {
    fn default() -> Self {
        Self {
            pos: DVec2::splat(POINTER_PARKED),
            active: false,
        }
    }
}
