//! Declared parameter symbols and validation of numeric values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric values keyed by parameter name.
pub type NumericParameters = BTreeMap<String, f64>;

/// Longest path length accepted, in unit delays.
///
/// Responses are evaluated at any accepted length; pole/zero extraction is
/// further limited by [`MAX_POLE_ZERO_DEGREE`](crate::transfer::MAX_POLE_ZERO_DEGREE).
pub const MAX_PATH_LENGTH: f64 = 100_000.0;

/// How a parameter enters the equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Path length in unit delays; a non-negative integer exponent of z⁻¹.
    Length,
    /// A real scalar factor (coupling, loss).
    Coefficient,
}

/// A parameter declared by a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSymbol {
    /// Key in the numeric parameter map.
    pub name: &'static str,
    /// Kind of parameter.
    pub kind: ParameterKind,
}

impl ParameterSymbol {
    pub const fn length(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Length,
        }
    }

    pub const fn coefficient(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Coefficient,
        }
    }
}

/// Check that `values` supplies exactly the declared parameters with
/// admissible values.
pub fn validate(symbols: &[ParameterSymbol], values: &NumericParameters) -> Result<()> {
    let missing: Vec<String> = symbols
        .iter()
        .filter(|s| !values.contains_key(s.name))
        .map(|s| s.name.to_string())
        .collect();
    let unexpected: Vec<String> = values
        .keys()
        .filter(|k| !symbols.iter().any(|s| s.name == k.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(Error::ParameterMismatch {
            missing,
            unexpected,
        });
    }

    for symbol in symbols {
        let value = values[symbol.name];
        if !value.is_finite() {
            return Err(Error::InvalidParameter {
                name: symbol.name.to_string(),
                reason: format!("{value} is not finite"),
            });
        }
        if symbol.kind == ParameterKind::Length
            && (value < 0.0 || value.fract() != 0.0 || value > MAX_PATH_LENGTH)
        {
            return Err(Error::InvalidParameter {
                name: symbol.name.to_string(),
                reason: format!(
                    "path length must be an integer in [0, {MAX_PATH_LENGTH}], got {value}"
                ),
            });
        }
    }
    Ok(())
}
