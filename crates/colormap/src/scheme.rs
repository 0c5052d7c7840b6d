//! Color schemes and multi-stop interpolation engine.

use serde::{Deserialize, Serialize};

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Blue -> Cyan -> Yellow -> Red, the classic heat ramp
    #[default]
    Jet,
    /// Black -> White
    Grayscale,
    /// Blue -> White -> Red (divergent data)
    Divergent,
}

impl ColorScheme {
    /// All available schemes, useful for CLI help and combo boxes.
    pub const ALL: &[ColorScheme] = &[Self::Jet, Self::Grayscale, Self::Divergent];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jet => "Jet",
            Self::Grayscale => "Grayscale",
            Self::Divergent => "Divergent",
        }
    }
}

// ─── Color stop definitions ────────────────────────────────────────────

const JET_STOPS: &[ColorStop] = &[
    ColorStop::new(0.000, 0, 0, 128),
    ColorStop::new(0.125, 0, 0, 255),
    ColorStop::new(0.375, 0, 255, 255),
    ColorStop::new(0.625, 255, 255, 0),
    ColorStop::new(0.875, 255, 0, 0),
    ColorStop::new(1.000, 128, 0, 0),
];

const DIVERGENT_STOPS: &[ColorStop] = &[
    ColorStop::new(0.00, 44, 62, 180),
    ColorStop::new(0.25, 120, 160, 220),
    ColorStop::new(0.50, 240, 240, 240),
    ColorStop::new(0.75, 220, 120, 80),
    ColorStop::new(1.00, 180, 30, 30),
];

// ─── Interpolation engine ──────────────────────────────────────────────

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    if t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

/// Evaluate a color scheme at normalized position `t` ∈ [0, 1].
///
/// Positions outside [0, 1] clamp to the scheme endpoints.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    match scheme {
        ColorScheme::Jet => multi_stop(JET_STOPS, t),
        ColorScheme::Grayscale => {
            let v = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgb::new(v, v, v)
        }
        ColorScheme::Divergent => multi_stop(DIVERGENT_STOPS, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints() {
        assert_eq!(evaluate(ColorScheme::Jet, 0.0), Rgb::new(0, 0, 128));
        assert_eq!(evaluate(ColorScheme::Jet, 1.0), Rgb::new(128, 0, 0));
    }

    #[test]
    fn jet_midpoint_is_green_ish() {
        // halfway between cyan and yellow
        let c = evaluate(ColorScheme::Jet, 0.5);
        assert_eq!(c, Rgb::new(128, 255, 128));
    }

    #[test]
    fn grayscale_midpoint() {
        assert_eq!(evaluate(ColorScheme::Grayscale, 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn clamping_outside_unit_range() {
        assert_eq!(evaluate(ColorScheme::Jet, -0.5), Rgb::new(0, 0, 128));
        assert_eq!(evaluate(ColorScheme::Jet, 1.5), Rgb::new(128, 0, 0));
    }

    #[test]
    fn all_schemes_evaluate_midpoint() {
        for &scheme in ColorScheme::ALL {
            let _ = evaluate(scheme, 0.5);
        }
    }
}
