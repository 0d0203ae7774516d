//! Breathing edge glow
//!
//! Four linear gradients hug the screen edges. Their depth and intensity
//! drift on independent slow sine waves and swell when the pointer comes
//! close to that edge.

use glam::DVec2;

use super::surface::{ColorStop, LinearGradient, Rect, Surface};
use crate::color::{Rgb, Rgba};
use crate::consts::*;
use crate::unit_sine;

const GLOW_CYAN: Rgb = Rgb::new(0.0, 223.0, 255.0);
const GLOW_PURPLE: Rgb = Rgb::new(150.0, 100.0, 255.0);
/// Offset and relative strength of the purple midpoint stop
const MID_STOP: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// One edge's glow for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeBand {
    pub edge: Edge,
    /// Depth of the band in pixels
    pub width: f64,
    /// Alpha of the innermost (edge-side) stop
    pub intensity: f64,
}

impl EdgeBand {
    /// Screen rectangle and gradient for a `size` surface
    pub fn geometry(&self, size: DVec2) -> (Rect, LinearGradient) {
        let (w, h, d) = (size.x, size.y, self.width);
        let (rect, start, end) = match self.edge {
            Edge::Top => (Rect::new(0.0, 0.0, w, d), DVec2::ZERO, DVec2::new(0.0, d)),
            Edge::Bottom => (
                Rect::new(0.0, h - d, w, d),
                DVec2::new(0.0, h),
                DVec2::new(0.0, h - d),
            ),
            Edge::Left => (Rect::new(0.0, 0.0, d, h), DVec2::ZERO, DVec2::new(d, 0.0)),
            Edge::Right => (
                Rect::new(w - d, 0.0, d, h),
                DVec2::new(w, 0.0),
                DVec2::new(w - d, 0.0),
            ),
        };
        let gradient = LinearGradient {
            start,
            end,
            stops: [
                ColorStop {
                    offset: 0.0,
                    color: GLOW_CYAN.with_alpha(self.intensity),
                },
                ColorStop {
                    offset: MID_STOP,
                    color: GLOW_PURPLE.with_alpha(self.intensity * MID_STOP),
                },
                ColorStop {
                    offset: 1.0,
                    color: Rgba::TRANSPARENT,
                },
            ],
        };
        (rect, gradient)
    }
}

/// How strongly the pointer at distance `gap` from an edge excites it, in [0, 1]
#[inline]
fn reaction(gap: f64) -> f64 {
    (1.0 - gap / EDGE_POINTER_ZONE).clamp(0.0, 1.0)
}

/// Compute the four bands at simulation `time`. `pointer` is `None` until
/// the pointer has moved at least once.
pub fn edge_bands(size: DVec2, time: f64, pointer: Option<DVec2>) -> [EdgeBand; 4] {
    let breath = unit_sine(time * 0.4);
    let flow1 = unit_sine(time * 0.9);
    let flow2 = unit_sine(time * 1.2 + 2.1);
    let flow3 = unit_sine(time * 0.6 + 4.2);

    let [react_top, react_bottom, react_left, react_right] = match pointer {
        Some(p) => [
            reaction(p.y),
            reaction(size.y - p.y),
            reaction(p.x),
            reaction(size.x - p.x),
        ],
        None => [0.0; 4],
    };

    let width = |wave: f64, sway: f64, react: f64| {
        EDGE_BASE_WIDTH
            + EDGE_WIDTH_WAVE * (0.3 + 0.7 * wave) * (0.6 + 0.4 * sway)
            + react * EDGE_POINTER_WIDTH
    };
    let intensity = |wave: f64, react: f64| {
        EDGE_BASE_INTENSITY * (0.7 + 0.5 * wave) * (1.0 + react * EDGE_POINTER_GAIN)
    };

    [
        EdgeBand {
            edge: Edge::Top,
            width: width(breath, flow1, react_top),
            intensity: intensity(breath, react_top),
        },
        EdgeBand {
            edge: Edge::Bottom,
            width: width(flow2, breath, react_bottom),
            intensity: intensity(flow2, react_bottom),
        },
        EdgeBand {
            edge: Edge::Left,
            width: width(flow3, flow1, react_left),
            intensity: intensity(flow3, react_left),
        },
        EdgeBand {
            edge: Edge::Right,
            width: width(flow1, flow2, react_right),
            intensity: intensity(flow1, react_right),
        },
    ]
}

/// Paint the edge glow over everything drawn so far
pub fn draw_edge_glow<S: Surface>(surface: &mut S, size: DVec2, time: f64, pointer: Option<DVec2>) {
    for band in edge_bands(size, time, pointer) {
        let (rect, gradient) = band.geometry(size);
        surface.fill_gradient_rect(rect, &gradient);
    }
}
