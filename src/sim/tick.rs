//! Per-frame particle motion
//!
//! Each frame every particle gets a target position built from its grid
//! position plus three additive pushes (ripples, intro wavefronts, pointer
//! gravity), then eases a fixed fraction of the way toward it.

use glam::DVec2;

use super::state::{IntroWave, Particle, Ripple};
use crate::color::Rgba;
use crate::consts::*;
use crate::settings::{Palette, RippleSettings};

/// Everything a particle needs to know about this frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub ripples: &'a [Ripple],
    pub ripple: &'a RippleSettings,
    pub palette: &'a Palette,
    /// Intro wave, only when it has wavefronts this frame
    pub intro: Option<&'a IntroWave>,
    pub fronts: &'a [f64],
    pub pointer: DVec2,
    pub light_radius: f64,
    pub gravity_strength: f64,
}

/// Result of pushing one particle around for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub target: DVec2,
    /// Set when a ripple band colors this particle; wins over the ambient look
    pub ripple_color: Option<Rgba>,
    /// Strongest eased intro band score touching this particle, in [0, 1]
    pub intro_boost: f64,
}

/// Grow and fade every ripple, dropping the spent ones
pub fn advance_ripples(ripples: &mut Vec<Ripple>, decay: f64) {
    for ripple in ripples.iter_mut() {
        ripple.advance(decay);
    }
    ripples.retain(|r| !r.is_spent());
}

/// Compute where `p` wants to be this frame
pub fn displace(p: &Particle, frame: &FrameInputs) -> Displacement {
    let mut target = p.base;
    let ripple_color = apply_ripples(p.base, frame, &mut target);
    let intro_boost = match frame.intro {
        Some(intro) => apply_intro(p.base, intro, frame.fronts, &mut target),
        None => 0.0,
    };
    target += pointer_pull(p.base, frame.pointer, frame.light_radius, frame.gravity_strength);

    Displacement {
        target,
        ripple_color,
        intro_boost,
    }
}

/// Move a fraction of the way to `target`
#[inline]
pub fn ease(p: &mut Particle, target: DVec2) {
    p.pos += (target - p.pos) * EASING;
}

/// Bell-shaped band intensity at normalized band position `n` in [0, 1]
#[inline]
pub fn band_peak(n: f64) -> f64 {
    (1.0 - (n - 0.5).abs() * 2.0).powi(3)
}

fn apply_ripples(base: DVec2, frame: &FrameInputs, target: &mut DVec2) -> Option<Rgba> {
    let thickness = frame.ripple.thickness;
    let half = thickness / 2.0;
    let mut color = None;

    for rip in frame.ripples {
        let offset = base - rip.origin;
        let dist = offset.length();
        if dist <= rip.radius - half || dist >= rip.radius + half {
            continue;
        }

        let n = (dist - (rip.radius - half)) / thickness;
        let peak = band_peak(n);
        let push = peak * frame.ripple.strength * rip.opacity;
        let angle = offset.y.atan2(offset.x);
        *target += DVec2::new(angle.cos(), angle.sin()) * push;

        // Later ripples overwrite earlier ones
        let alpha = (rip.opacity * peak * RIPPLE_COLOR_GAIN).min(1.0);
        if alpha > RIPPLE_COLOR_THRESHOLD {
            color = Some(frame.palette.band_color(n).with_alpha(alpha));
        }
    }
    color
}

fn apply_intro(base: DVec2, intro: &IntroWave, fronts: &[f64], target: &mut DVec2) -> f64 {
    if fronts.is_empty() {
        return 0.0;
    }
    let offset = base - intro.center;
    let mut dist = offset.length();
    if dist == 0.0 {
        dist = 1.0;
    }
    let dir = offset / dist;

    let mut boost: f64 = 0.0;
    for &radius in fronts {
        let band = 1.0 - (dist - radius).abs() / intro.thickness;
        if band > 0.0 {
            let eased = band * band;
            boost = boost.max(eased);
            *target += dir * eased * intro.strength;
        }
    }
    boost
}

/// Offset pulling `base` toward the pointer, fading to zero at the edge of reach
pub fn pointer_pull(base: DVec2, pointer: DVec2, light_radius: f64, gravity: f64) -> DVec2 {
    let reach = light_radius * GRAVITY_RADIUS_FACTOR;
    let delta = pointer - base;
    let distance = delta.length();
    if distance < reach {
        let force = (reach - distance) / reach;
        delta * force * gravity
    } else {
        DVec2::ZERO
    }
}
