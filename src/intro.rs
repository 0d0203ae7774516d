//! Page intro sequence
//!
//! Shortly after load the page sends two ripples out from the input box,
//! aims the intro wave at it, and types the headline in. The timing lives
//! here as plain data; `platform::page` turns it into timers and DOM edits.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::sim::RippleRequest;

/// Delay before the intro starts
pub const INTRO_DELAY_MS: f64 = 600.0;
/// Gap between the two intro ripples
pub const ECHO_DELAY_MS: f64 = 800.0;
/// Intro ripples travel a little slower than the default
pub const INTRO_RIPPLE_VELOCITY: f64 = 5.0;

pub const HEADLINE: &str = "Code Your Dream";
pub const HEADLINE_MIN_DELAY_MS: f64 = 45.0;
pub const HEADLINE_MAX_DELAY_MS: f64 = 90.0;

/// Something the page does during the intro
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntroCue {
    /// Send a ripple out
    Ripple(RippleRequest),
    /// Move the intro wave to a point and replay it
    AimIntroWave(DVec2),
    /// Show the intro container and start typing the headline
    RevealHeadline,
}

/// A cue and when it fires, in ms after boot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledCue {
    pub at_ms: f64,
    pub cue: IntroCue,
}

/// The intro cues in firing order
#[derive(Debug, Clone, PartialEq)]
pub struct IntroTimeline {
    cues: Vec<ScheduledCue>,
}

impl IntroTimeline {
    /// Timeline centered on `target` (the input box, or the viewport center
    /// when the page has none)
    pub fn centered_on(target: DVec2) -> Self {
        let ripple = RippleRequest::at(target.x, target.y).with_velocity(INTRO_RIPPLE_VELOCITY);
        let cues = vec![
            ScheduledCue {
                at_ms: INTRO_DELAY_MS,
                cue: IntroCue::AimIntroWave(target),
            },
            ScheduledCue {
                at_ms: INTRO_DELAY_MS,
                cue: IntroCue::Ripple(ripple),
            },
            ScheduledCue {
                at_ms: INTRO_DELAY_MS,
                cue: IntroCue::RevealHeadline,
            },
            ScheduledCue {
                at_ms: INTRO_DELAY_MS + ECHO_DELAY_MS,
                cue: IntroCue::Ripple(ripple),
            },
        ];
        Self { cues }
    }

    pub fn cues(&self) -> &[ScheduledCue] {
        &self.cues
    }

    /// Cues firing in `(after_ms, until_ms]`
    pub fn due(&self, after_ms: f64, until_ms: f64) -> impl Iterator<Item = &ScheduledCue> {
        self.cues
            .iter()
            .filter(move |c| c.at_ms > after_ms && c.at_ms <= until_ms)
    }
}

/// Center of a rectangle given by its top-left corner and size, or `fallback`
pub fn target_center(rect: Option<(f64, f64, f64, f64)>, fallback: DVec2) -> DVec2 {
    match rect {
        Some((left, top, width, height)) => DVec2::new(left + width / 2.0, top + height / 2.0),
        None => fallback,
    }
}

/// One typewriter step: the text to show now, and how long to wait before
/// the next step (`None` on the last step)
#[derive(Debug, Clone, PartialEq)]
pub struct TypeStep {
    pub shown: String,
    pub delay_ms: Option<f64>,
}

/// Reveals text one character at a time with jittered delays.
/// Yields every prefix from empty to the full text.
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
    min_ms: f64,
    max_ms: f64,
    rng: Pcg32,
}

impl Typewriter {
    pub fn new(text: &str, min_ms: f64, max_ms: f64, rng: Pcg32) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            min_ms,
            max_ms: max_ms.max(min_ms),
            rng,
        }
    }

    /// Headline typewriter with the page's usual pacing
    pub fn headline(rng: Pcg32) -> Self {
        Self::new(HEADLINE, HEADLINE_MIN_DELAY_MS, HEADLINE_MAX_DELAY_MS, rng)
    }
}

impl Iterator for Typewriter {
    type Item = TypeStep;

    fn next(&mut self) -> Option<TypeStep> {
        if self.shown > self.chars.len() {
            return None;
        }
        let shown: String = self.chars[..self.shown].iter().collect();
        self.shown += 1;
        let delay_ms = (self.shown <= self.chars.len())
            .then(|| self.min_ms + self.rng.random::<f64>() * (self.max_ms - self.min_ms));
        Some(TypeStep { shown, delay_ms })
    }
}
