//! Field options and tuning
//!
//! Options come from page script (a JS object converted through JSON) and
//! from the canvas `data-*` attributes. Every value is parsed tolerantly:
//! a bad value falls back to the default (or the previous value when
//! merging) and never reaches the render loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{Rgb, parse_color, parse_float_prefix};
use crate::consts::*;
use crate::error::BackdropError;

/// Parse a numeric option: a JSON number or a string with a numeric prefix.
/// Missing, unparseable or non-finite values yield `default`.
pub fn parse_number(value: &Value, default: f64) -> f64 {
    parse_optional_number(value).unwrap_or(default)
}

/// Like `parse_number`, but reports absence instead of substituting a default
pub fn parse_optional_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// Ripple tuning shared by every live ripple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RippleSettings {
    /// Radial width of the distortion band
    pub thickness: f64,
    /// Peak displacement in pixels
    pub strength: f64,
    /// Default growth per frame for new ripples
    pub velocity: f64,
    /// Opacity lost per frame
    pub decay: f64,
}

impl Default for RippleSettings {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_RIPPLE_THICKNESS,
            strength: DEFAULT_RIPPLE_STRENGTH,
            velocity: DEFAULT_RIPPLE_VELOCITY,
            decay: DEFAULT_RIPPLE_DECAY,
        }
    }
}

impl RippleSettings {
    /// Merge a partial update; unset or invalid fields keep their value
    pub fn merge(&mut self, partial: &RippleOptions) {
        self.thickness = parse_number(&partial.thickness, self.thickness);
        self.strength = parse_number(&partial.strength, self.strength);
        self.velocity = parse_number(&partial.velocity, self.velocity);
        self.decay = parse_number(&partial.decay, self.decay);
    }
}

/// The three colors a ripple band blends through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub purple: Rgb,
    pub white: Rgb,
    pub blue: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            purple: Rgb::new(180.0, 70.0, 255.0),
            white: Rgb::new(255.0, 255.0, 255.0),
            blue: Rgb::new(70.0, 130.0, 255.0),
        }
    }
}

impl Palette {
    /// Merge a partial update; unset or invalid colors keep their value
    pub fn merge(&mut self, partial: &ColorOptions) {
        self.purple = parse_color(&partial.purple, self.purple);
        self.white = parse_color(&partial.white, self.white);
        self.blue = parse_color(&partial.blue, self.blue);
    }

    /// Band color at normalized position `n` in [0, 1]:
    /// purple -> white over the inner half, white -> blue over the outer half
    pub fn band_color(&self, n: f64) -> Rgb {
        if n < 0.5 {
            self.purple.lerp(self.white, n * 2.0)
        } else {
            self.white.lerp(self.blue, (n - 0.5) * 2.0)
        }
    }
}

/// Partial ripple options (raw, parsed on use)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleOptions {
    pub thickness: Value,
    pub strength: Value,
    pub velocity: Value,
    pub decay: Value,
}

/// Partial color options (raw, parsed on use)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOptions {
    pub purple: Value,
    pub white: Value,
    pub blue: Value,
}

/// Nested option groups of the wrong shape (`"ripple": 5`) count as unset
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Constructor options for a `ParticleField`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOptions {
    pub spacing: Value,
    pub light_radius: Value,
    pub gravity_strength: Value,
    pub default_dot_alpha: Value,
    #[serde(deserialize_with = "lenient")]
    pub ripple: RippleOptions,
    #[serde(deserialize_with = "lenient")]
    pub colors: ColorOptions,
    /// `false` disables the intro wave entirely
    pub intro: Value,
}

impl FieldOptions {
    /// Parse options from a JSON document. Only text that is not JSON is
    /// rejected; a document of the wrong shape falls back like `from_value`.
    pub fn from_json(json: &str) -> Result<Self, BackdropError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    /// Options from a loosely typed value. Anything but an object is
    /// ignored with a warning.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::default(),
            Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed options: {}", e);
                Self::default()
            }),
            other => {
                log::warn!("Ignoring options that are not an object: {}", other);
                Self::default()
            }
        }
    }

    /// Fill ripple and color options the caller left unset from `data-*`
    /// attributes. `lookup` receives dataset keys (`rippleThickness`, ...).
    pub fn fill_from_dataset(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots: [(&str, &mut Value); 7] = [
            ("rippleThickness", &mut self.ripple.thickness),
            ("rippleStrength", &mut self.ripple.strength),
            ("rippleVelocity", &mut self.ripple.velocity),
            ("rippleDecay", &mut self.ripple.decay),
            ("colorPurple", &mut self.colors.purple),
            ("colorWhite", &mut self.colors.white),
            ("colorBlue", &mut self.colors.blue),
        ];
        for (key, slot) in slots {
            if slot.is_null() {
                if let Some(raw) = lookup(key) {
                    *slot = Value::String(raw);
                }
            }
        }
    }
}

/// Fully resolved field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSettings {
    /// Grid pitch in pixels
    pub spacing: f64,
    /// Radius of the chromatic pointer light
    pub light_radius: f64,
    /// Pull toward the pointer (fraction of the offset at the pointer itself)
    pub gravity_strength: f64,
    /// Alpha of an ambient dot before flicker and intro brightness
    pub default_dot_alpha: f64,
    pub ripple: RippleSettings,
    pub palette: Palette,
    pub intro_enabled: bool,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            light_radius: DEFAULT_LIGHT_RADIUS,
            gravity_strength: DEFAULT_GRAVITY_STRENGTH,
            default_dot_alpha: DEFAULT_DOT_ALPHA,
            ripple: RippleSettings::default(),
            palette: Palette::default(),
            intro_enabled: true,
        }
    }
}

impl FieldSettings {
    /// Resolve options against the defaults
    pub fn from_options(options: &FieldOptions) -> Self {
        let mut settings = Self::default();

        let spacing = parse_number(&options.spacing, DEFAULT_SPACING);
        settings.spacing = if spacing >= MIN_SPACING {
            spacing
        } else {
            log::warn!("Ignoring grid spacing {} below {}px", spacing, MIN_SPACING);
            DEFAULT_SPACING
        };
        settings.light_radius = parse_number(&options.light_radius, DEFAULT_LIGHT_RADIUS);
        settings.gravity_strength =
            parse_number(&options.gravity_strength, DEFAULT_GRAVITY_STRENGTH);
        settings.default_dot_alpha = parse_number(&options.default_dot_alpha, DEFAULT_DOT_ALPHA);
        settings.ripple.merge(&options.ripple);
        settings.palette.merge(&options.colors);
        settings.intro_enabled = options.intro != Value::Bool(false);

        settings
    }
}
