//! Unit Converter
//!
//! Linear categories scale through a base unit (metre, kilogram, byte).
//! Temperature is affine and pivots through Celsius.

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Mass,
    Data,
    Temperature,
}

/// (symbol, factor to base unit)
const LENGTH_UNITS: [(&str, f64); 10] = [
    ("mm", 0.001),
    ("cm", 0.01),
    ("m", 1.0),
    ("km", 1000.0),
    ("in", 0.0254),
    ("ft", 0.3048),
    ("yd", 0.9144),
    ("mi", 1609.344),
    ("nmi", 1852.0),
    ("um", 1e-6),
];

const MASS_UNITS: [(&str, f64); 7] = [
    ("mg", 1e-6),
    ("g", 0.001),
    ("kg", 1.0),
    ("t", 1000.0),
    ("oz", 0.028_349_523_125),
    ("lb", 0.453_592_37),
    ("st", 6.350_293_18),
];

/// Case matters here: `b`/`Mb` are bits, `B`/`MB` are bytes
const DATA_UNITS: [(&str, f64); 15] = [
    ("bit", 0.125),
    ("b", 0.125),
    ("kb", 125.0),
    ("Kb", 125.0),
    ("Mb", 125_000.0),
    ("Gb", 125_000_000.0),
    ("B", 1.0),
    ("kB", 1e3),
    ("KB", 1e3),
    ("MB", 1e6),
    ("GB", 1e9),
    ("TB", 1e12),
    ("KiB", 1024.0),
    ("MiB", 1_048_576.0),
    ("GiB", 1_073_741_824.0),
];

/// Convert `value` from one unit to another within a category
pub fn convert(category: UnitCategory, value: f64, from: &str, to: &str) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::invalid_input("Value must be a finite number"));
    }

    let (from, to) = (from.trim(), to.trim());
    let (from_lower, to_lower) = (from.to_lowercase(), to.to_lowercase());

    match category {
        UnitCategory::Length => convert_linear(&LENGTH_UNITS, value, &from_lower, &to_lower),
        UnitCategory::Mass => convert_linear(&MASS_UNITS, value, &from_lower, &to_lower),
        UnitCategory::Data => convert_linear(&DATA_UNITS, value, from, to),
        UnitCategory::Temperature => {
            let celsius = to_celsius(value, &from_lower)?;
            if celsius < -273.15 {
                return Err(AppError::invalid_input("Temperature is below absolute zero"));
            }
            from_celsius(celsius, &to_lower)
        }
    }
}

/// Units accepted for a category
pub fn supported_units(category: UnitCategory) -> Vec<&'static str> {
    match category {
        UnitCategory::Length => LENGTH_UNITS.iter().map(|(u, _)| *u).collect(),
        UnitCategory::Mass => MASS_UNITS.iter().map(|(u, _)| *u).collect(),
        UnitCategory::Data => DATA_UNITS.iter().map(|(u, _)| *u).collect(),
        UnitCategory::Temperature => vec!["c", "f", "k"],
    }
}

fn convert_linear(table: &[(&str, f64)], value: f64, from: &str, to: &str) -> AppResult<f64> {
    let from_factor = factor(table, from)?;
    let to_factor = factor(table, to)?;
    Ok(value * from_factor / to_factor)
}

fn factor(table: &[(&str, f64)], unit: &str) -> AppResult<f64> {
    table
        .iter()
        .find(|(symbol, _)| *symbol == unit)
        .map(|(_, f)| *f)
        .ok_or_else(|| AppError::unsupported_unit(unit))
}

fn to_celsius(value: f64, unit: &str) -> AppResult<f64> {
    match unit {
        "c" => Ok(value),
        "f" => Ok((value - 32.0) * 5.0 / 9.0),
        "k" => Ok(value - 273.15),
        other => Err(AppError::unsupported_unit(other)),
    }
}

fn from_celsius(celsius: f64, unit: &str) -> AppResult<f64> {
    match unit {
        "c" => Ok(celsius),
        "f" => Ok(celsius * 9.0 / 5.0 + 32.0),
        "k" => Ok(celsius + 273.15),
        other => Err(AppError::unsupported_unit(other)),
    }
}
