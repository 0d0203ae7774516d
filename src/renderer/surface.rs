//! Drawing surface abstraction
//!
//! The field only needs a handful of immediate-mode calls: clear, solid
//! rectangle fill and linear-gradient rectangle fill. The browser canvas
//! implements this in `platform::web`; `RecordingSurface` implements it in
//! memory for tests and headless runs.

use glam::DVec2;

use crate::color::Rgba;

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centered on `center`
    pub fn centered(center: DVec2, size: f64) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }
}

/// A gradient color stop at `offset` in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Linear gradient from `start` to `end` through three stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub start: DVec2,
    pub end: DVec2,
    pub stops: [ColorStop; 3],
}

/// Something the field can paint on
pub trait Surface {
    /// Size the field should cover (the browser viewport on the web)
    fn viewport(&self) -> DVec2;

    /// Resize the backing store
    fn resize(&mut self, width: u32, height: u32);

    /// Clear `[0, width) x [0, height)` to transparent
    fn clear(&mut self, width: f64, height: f64);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &LinearGradient);
}
