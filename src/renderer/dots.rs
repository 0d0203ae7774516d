//! Particle painter
//!
//! A particle is drawn either as a single ripple-colored square, or with
//! its ambient look: a flickering white dot, an optional breathing glow and
//! a chromatic fringe while inside the pointer light.

use glam::DVec2;

use super::surface::{Rect, Surface};
use crate::color::Rgb;
use crate::consts::INTRO_BASE_BRIGHTNESS;
use crate::sim::{Displacement, Particle};
use crate::unit_sine;

const DOT_WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);
const GLOW_WHITE: Rgb = Rgb::new(220.0, 235.0, 255.0);
const FRINGE_CYAN: Rgb = Rgb::new(0.0, 223.0, 255.0);
const FRINGE_VIOLET: Rgb = Rgb::new(180.0, 100.0, 255.0);

/// Breathing glow oscillation rate (radians per unit of simulation time)
const BREATHE_RATE: f64 = 0.6;
/// Fringe dots spread up to this many pixels at the edge of the light
const FRINGE_SPREAD: f64 = 5.0;

/// Frame-wide lighting parameters
#[derive(Debug, Clone, Copy)]
pub struct Ambient {
    pub time: f64,
    pub default_dot_alpha: f64,
    pub light_radius: f64,
    /// Intro brightness gain (0 when there is no intro wave)
    pub brightness_boost: f64,
    pub pointer: DVec2,
}

impl Ambient {
    /// Flicker factor in [0.4, 1.0]
    pub fn flicker(&self, p: &Particle) -> f64 {
        0.4 + 0.6 * unit_sine(self.time * p.flicker_speed + p.phase)
    }

    /// Brightness multiplier from the intro wave
    pub fn intro_brightness(&self, intro_boost: f64) -> f64 {
        INTRO_BASE_BRIGHTNESS + intro_boost * self.brightness_boost
    }
}

/// Paint one particle at its eased position
pub fn draw_particle<S: Surface>(surface: &mut S, p: &Particle, look: &Displacement, ambient: &Ambient) {
    if let Some(color) = look.ripple_color {
        let size = 2.0 + color.a * 1.5;
        surface.fill_rect(Rect::centered(p.pos, size), color);
        return;
    }

    let lit = ambient.flicker(p) * ambient.intro_brightness(look.intro_boost);
    let (x, y) = (p.pos.x, p.pos.y);

    surface.fill_rect(
        Rect::new(x, y, 1.0, 1.0),
        DOT_WHITE.with_alpha(ambient.default_dot_alpha * lit),
    );

    if p.breathe {
        let breath = unit_sine(ambient.time * BREATHE_RATE + p.phase);
        let glow_alpha = (0.08 + breath * 0.2) * lit;
        surface.fill_rect(Rect::new(x - 0.5, y - 0.5, 2.0, 2.0), GLOW_WHITE.with_alpha(glow_alpha));
    }

    let distance = (ambient.pointer - p.base).length();
    let proximity = (1.0 - distance / ambient.light_radius).max(0.0);
    if proximity > 0.0 {
        let shift = (1.0 - proximity) * FRINGE_SPREAD;
        surface.fill_rect(
            Rect::new(x - shift, y, 1.0, 1.0),
            FRINGE_CYAN.with_alpha(proximity * p.alpha * 0.95 * lit),
        );
        surface.fill_rect(
            Rect::new(x + shift, y, 1.0, 1.0),
            FRINGE_VIOLET.with_alpha(proximity * p.alpha * 0.5 * lit),
        );
        surface.fill_rect(
            Rect::new(x, y, 1.0, 1.0),
            FRINGE_CYAN.with_alpha(proximity * 0.9 * lit),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::renderer::RecordingSurface;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn particle(breathe: bool) -> Particle {
        let mut p = Particle::new(DVec2::new(100.0, 100.0), &mut Pcg32::seed_from_u64(3));
        p.breathe = breathe;
        p.phase = 0.0;
        p.flicker_speed = 1.0;
        p.alpha = 0.5;
        p
    }

    fn ambient(pointer: DVec2) -> Ambient {
        Ambient {
            time: 0.0,
            default_dot_alpha: 0.05,
            light_radius: 380.0,
            brightness_boost: 1.0,
            pointer,
        }
    }

    fn plain() -> Displacement {
        Displacement {
            target: DVec2::ZERO,
            ripple_color: None,
            intro_boost: 0.0,
        }
    }

    #[test]
    fn test_ripple_color_replaces_ambient() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let look = Displacement {
            ripple_color: Some(Rgba::new(255.0, 255.0, 255.0, 1.0)),
            ..plain()
        };
        draw_particle(&mut surface, &particle(true), &look, &ambient(DVec2::new(100.0, 100.0)));

        let fills: Vec<_> = surface.fills().collect();
        assert_eq!(fills.len(), 1);
        assert_eq!(*fills[0].0, Rect::new(98.25, 98.25, 3.5, 3.5));
    }

    #[test]
    fn test_ambient_dot_alpha() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        // sin(0) = 0 -> flicker 0.4 + 0.6 * 0.5 = 0.7; brightness 3
        draw_particle(&mut surface, &particle(false), &plain(), &ambient(DVec2::splat(-1000.0)));

        let fills: Vec<_> = surface.fills().collect();
        assert_eq!(fills.len(), 1);
        assert!((fills[0].1.a - 0.05 * 0.7 * 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_breathe_adds_glow() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_particle(&mut surface, &particle(true), &plain(), &ambient(DVec2::splat(-1000.0)));
        let fills: Vec<_> = surface.fills().collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(*fills[1].0, Rect::new(99.5, 99.5, 2.0, 2.0));
    }

    #[test]
    fn test_intro_boost_brightens() {
        let mut dim = RecordingSurface::new(800.0, 600.0);
        let mut bright = RecordingSurface::new(800.0, 600.0);
        let lit = Displacement {
            intro_boost: 1.0,
            ..plain()
        };
        let far = ambient(DVec2::splat(-1000.0));
        draw_particle(&mut dim, &particle(false), &plain(), &far);
        draw_particle(&mut bright, &particle(false), &lit, &far);

        let a = dim.fills().next().unwrap().1.a;
        let b = bright.fills().next().unwrap().1.a;
        assert!((b / a - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fringe_inside_light() {
        let mut surface = RecordingSurface::new(800.0, 600.0);
        // Pointer 190px away: proximity 0.5, shift 2.5
        draw_particle(&mut surface, &particle(false), &plain(), &ambient(DVec2::new(290.0, 100.0)));

        let fills: Vec<_> = surface.fills().collect();
        assert_eq!(fills.len(), 4);
        assert_eq!(fills[1].0.x, 97.5);
        assert_eq!(fills[2].0.x, 102.5);
        assert_eq!(fills[3].0.x, 100.0);
        assert_eq!((fills[1].1.r, fills[1].1.g), (0.0, 223.0));
    }
}
