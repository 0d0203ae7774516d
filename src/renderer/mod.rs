//! Canvas-style rendering
//!
//! Painters draw through the `Surface` trait so the same frame code runs on
//! a browser canvas and on the in-memory `RecordingSurface`.

pub mod dots;
pub mod edge_glow;
pub mod recording;
pub mod surface;

pub use dots::{Ambient, draw_particle};
pub use edge_glow::{Edge, EdgeBand, draw_edge_glow, edge_bands};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{ColorStop, LinearGradient, Rect, Surface};
