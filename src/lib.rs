//! Pixel Backdrop - animated pixel-grid page background
//!
//! Core modules:
//! - `sim`: Particle grid, ripples and intro wave (pure, deterministic per seed)
//! - `renderer`: Drawing surface abstraction, particle and edge-glow painters
//! - `field`: `ParticleField`, the component tying sim and renderer together
//! - `animator`: Frame loop with a single pending frame handle
//! - `settings`: Tolerant option parsing, ripple tuning and palette
//! - `intro` / `projects`: Page glue that is pure enough to live outside the DOM
//! - `platform`: Browser bindings (canvas, requestAnimationFrame, listeners)

pub mod animator;
pub mod color;
pub mod error;
pub mod field;
pub mod intro;
pub mod platform;
pub mod projects;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use animator::{Animator, FrameScheduler};
pub use color::{Rgb, Rgba, parse_color};
pub use error::BackdropError;
pub use field::ParticleField;
pub use renderer::{RecordingSurface, Surface};
pub use settings::{
    ColorOptions, FieldOptions, FieldSettings, Palette, RippleOptions, RippleSettings, parse_number,
    parse_optional_number,
};
pub use sim::RippleRequest;

/// Effect tuning constants
pub mod consts {
    /// Simulation time added per rendered frame (assumes a steady refresh rate)
    pub const TIME_STEP: f64 = 0.015;
    /// Fraction of the remaining distance a particle covers toward its target each frame
    pub const EASING: f64 = 0.1;

    /// Grid and lighting defaults
    pub const DEFAULT_SPACING: f64 = 28.0;
    pub const DEFAULT_LIGHT_RADIUS: f64 = 380.0;
    pub const DEFAULT_GRAVITY_STRENGTH: f64 = 0.25;
    pub const DEFAULT_DOT_ALPHA: f64 = 0.05;
    /// Smallest grid pitch accepted from options
    pub const MIN_SPACING: f64 = 1.0;
    /// Grids larger than this are refused instead of allocated
    pub const MAX_PARTICLES: usize = 4_000_000;
    /// Gravity reaches this multiple of the light radius
    pub const GRAVITY_RADIUS_FACTOR: f64 = 1.4;
    /// Pointer position before the first move (off screen)
    pub const POINTER_PARKED: f64 = -1000.0;

    /// Ripple defaults
    pub const DEFAULT_RIPPLE_THICKNESS: f64 = 80.0;
    pub const DEFAULT_RIPPLE_STRENGTH: f64 = 25.0;
    pub const DEFAULT_RIPPLE_VELOCITY: f64 = 6.0;
    pub const DEFAULT_RIPPLE_DECAY: f64 = 0.005;
    /// Default max radius as a fraction of the larger viewport side
    pub const RIPPLE_REACH: f64 = 0.8;
    /// Ripple color alpha gain over the band peak
    pub const RIPPLE_COLOR_GAIN: f64 = 1.5;
    /// Ripple colors fainter than this leave the particle's ambient look alone
    pub const RIPPLE_COLOR_THRESHOLD: f64 = 0.01;
    /// Opacity at or below this counts as fully faded (absorbs float drift)
    pub const RIPPLE_FADE_EPSILON: f64 = 1e-9;

    /// Intro wave defaults
    pub const INTRO_START_TIME: f64 = 1.0;
    pub const INTRO_WAVE_COUNT: u32 = 3;
    pub const INTRO_PERIOD: f64 = 6.0;
    pub const INTRO_THICKNESS: f64 = 80.0;
    pub const INTRO_STRENGTH: f64 = 30.0;
    pub const INTRO_BRIGHTNESS_BOOST: f64 = 1.0;
    /// Ambient brightness multiplier while no wavefront touches a particle
    pub const INTRO_BASE_BRIGHTNESS: f64 = 3.0;

    /// Edge glow
    pub const EDGE_BASE_WIDTH: f64 = 80.0;
    pub const EDGE_WIDTH_WAVE: f64 = 70.0;
    pub const EDGE_POINTER_ZONE: f64 = 400.0;
    pub const EDGE_POINTER_WIDTH: f64 = 60.0;
    pub const EDGE_BASE_INTENSITY: f64 = 0.06;
    pub const EDGE_POINTER_GAIN: f64 = 1.2;
}

/// Linear interpolation between `start` and `end`
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}

/// Remap a sine value from [-1, 1] to [0, 1]
#[inline]
pub fn unit_sine(angle: f64) -> f64 {
    angle.sin() * 0.5 + 0.5
}
