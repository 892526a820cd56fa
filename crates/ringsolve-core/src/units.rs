//! Physical constants, frequency/wavelength conversion and SI prefixes.

use std::f64::consts::PI;

use serde::{Deserialize, Deserializer};

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Angular frequency (rad/s) of a vacuum wavelength (m).
pub fn wavelength_to_frequency(wavelength: f64) -> f64 {
    2.0 * PI / wavelength * SPEED_OF_LIGHT
}

/// Vacuum wavelength (m) of an angular frequency (rad/s).
pub fn frequency_to_wavelength(omega: f64) -> f64 {
    2.0 * PI / omega * SPEED_OF_LIGHT
}

/// Angular free spectral range (rad/s) of a cavity with round-trip
/// `length` and group index `group_index`.
pub fn free_spectral_range(length: f64, group_index: f64) -> f64 {
    2.0 * PI * SPEED_OF_LIGHT / (group_index * length)
}

/// Parse a value with an optional SI suffix (case-sensitive).
///
/// Supported suffixes:
/// - T (tera), G (giga), M (mega), k (kilo)
/// - m (milli), u or µ (micro), n (nano), p (pico), f (femto)
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    let suffix_start = s.char_indices().last().map(|(i, _)| i)?;
    let (num_str, suffix) = s.split_at(suffix_start);
    if num_str.is_empty() {
        return None;
    }
    let value: f64 = num_str.trim_end().parse().ok()?;

    let multiplier = match suffix {
        "T" => 1e12,
        "G" => 1e9,
        "M" => 1e6,
        "k" => 1e3,
        "m" => 1e-3,
        "u" | "µ" => 1e-6,
        "n" => 1e-9,
        "p" => 1e-12,
        "f" => 1e-15,
        _ => return None,
    };

    Some(value * multiplier)
}

/// Deserialize a number, or a string with an SI suffix such as `"120u"`.
///
/// Use with `#[serde(deserialize_with = "...")]` on `f64` fields.
pub fn deserialize_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(v) => Ok(v),
        Raw::Text(s) => parse_value(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid value: {s:?}"))),
    }
}

/// Format a value with an SI prefix.
pub fn format_value(value: f64) -> String {
    const PREFIXES: [(f64, &str); 9] = [
        (1e12, "T"),
        (1e9, "G"),
        (1e6, "M"),
        (1e3, "k"),
        (1.0, ""),
        (1e-3, "m"),
        (1e-6, "u"),
        (1e-9, "n"),
        (1e-12, "p"),
    ];

    let abs_value = value.abs();
    if abs_value == 0.0 {
        return "0.0000".to_string();
    }
    for (scale, suffix) in PREFIXES {
        if abs_value >= scale {
            return format!("{:.4}{}", value / scale, suffix);
        }
    }
    format!("{:.4}f", value / 1e-15)
}
