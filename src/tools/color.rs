//! Color Converter
//!
//! HEX ↔ RGB ↔ HSL using the standard colorimetric formulas.

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`
pub fn parse_hex(input: &str) -> AppResult<Rgb> {
    let digits = input.trim().trim_start_matches('#');

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(AppError::unsupported_unit(input)),
    };

    let bytes = hex::decode(&expanded).map_err(|_| AppError::unsupported_unit(input))?;
    match bytes.as_slice() {
        [r, g, b] => Ok(Rgb { r: *r, g: *g, b: *b }),
        _ => Err(AppError::unsupported_unit(input)),
    }
}

/// `#rrggbb`
pub fn to_hex(rgb: Rgb) -> String {
    format!("#{}", hex::encode([rgb.r, rgb.g, rgb.b]))
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
    }

    let s = delta / (1.0 - (2.0 * l - 1.0).abs());

    let h = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Hsl {
        h: round1(h),
        s: round1(s * 100.0),
        l: round1(l * 100.0),
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> AppResult<Rgb> {
    if !(0.0..=100.0).contains(&hsl.s) || !(0.0..=100.0).contains(&hsl.l) || !hsl.h.is_finite() {
        return Err(AppError::invalid_input("Saturation and lightness must be between 0 and 100"));
    }

    let h = hsl.h.rem_euclid(360.0);
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Ok(Rgb {
        r: channel(r1),
        g: channel(g1),
        b: channel(b1),
    })
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
