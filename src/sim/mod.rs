//! Particle simulation
//!
//! Pure and deterministic for a given seed:
//! - Fixed time step per frame, no wall clock
//! - Seeded RNG, used only when the grid is (re)built
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{IntroWave, Particle, Pointer, Ripple, RippleRequest, build_grid};
pub use tick::{Displacement, FrameInputs, advance_ripples, band_peak, displace, ease, pointer_pull};
