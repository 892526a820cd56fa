//! Rational transfer functions in `z⁻¹` and their responses.

use ringsolve_core::C64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::NumericParameters;
use crate::poly::{Atom, Poly};
use crate::roots::roots;

/// Default distance within which a pole and a zero cancel.
pub const DEFAULT_CANCELLATION_TOLERANCE: f64 = 1e-6;

/// Highest polynomial degree handed to the root finder.
///
/// Aberth iteration costs O(n²) per step; responses are not limited.
pub const MAX_POLE_ZERO_DEGREE: usize = 4096;

/// `H(z) = Σ b_k z⁻ᵏ / Σ a_k z⁻ᵏ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    /// `b_k`, coefficient of `z⁻ᵏ`.
    pub numerator: Vec<C64>,
    /// `a_k`, coefficient of `z⁻ᵏ`.
    pub denominator: Vec<C64>,
}

/// Poles and zeros in the z-plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoleZero {
    pub zeros: Vec<C64>,
    pub poles: Vec<C64>,
}

/// Coefficients in `w = z⁻¹` of a polynomial with numeric parameters.
///
/// A propagation atom `(γ·z⁻¹)^L` becomes `γ^L·w^L`; every other parameter
/// is a plain number.
pub fn substitute(poly: &Poly, parameters: &NumericParameters) -> Result<Vec<C64>> {
    let lookup = |name: &str| {
        parameters
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndeclaredParameter(name.to_string()))
    };

    let mut coefficients = vec![C64::new(0.0, 0.0)];
    for (monomial, c) in poly.terms() {
        let mut value = c;
        let mut degree = 0usize;
        for (atom, exp) in monomial.factors() {
            match atom {
                Atom::Param(name) => value *= lookup(name)?.powi(exp as i32),
                Atom::Propagation { loss, length } => {
                    // Lengths are validated as non-negative integers.
                    let steps = lookup(length)? as usize * exp as usize;
                    value *= lookup(loss)?.powi(steps as i32);
                    degree += steps;
                }
            }
        }
        if coefficients.len() <= degree {
            coefficients.resize(degree + 1, C64::new(0.0, 0.0));
        }
        coefficients[degree] += value;
    }
    Ok(coefficients)
}

/// `Σ c_k w^k` by Horner's rule.
fn eval_series(coefficients: &[C64], w: C64) -> C64 {
    coefficients
        .iter()
        .rev()
        .fold(C64::new(0.0, 0.0), |acc, &c| acc * w + c)
}

impl TransferFunction {
    pub fn new(numerator: Vec<C64>, denominator: Vec<C64>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `H(z)`.
    pub fn evaluate(&self, z: C64) -> C64 {
        let w = z.inv();
        eval_series(&self.numerator, w) / eval_series(&self.denominator, w)
    }

    /// `H(e^{iω})` at each normalized frequency.
    pub fn frequency_response(&self, omegas: &[f64]) -> Vec<C64> {
        omegas
            .iter()
            .map(|&w| self.evaluate(C64::from_polar(1.0, w)))
            .collect()
    }

    /// `|H(e^{iω})|`.
    pub fn magnitude_response(&self, omegas: &[f64]) -> Vec<f64> {
        self.frequency_response(omegas)
            .iter()
            .map(|h| h.norm())
            .collect()
    }

    /// `arg H(e^{iω})`, wrapped to (-π, π].
    pub fn phase_response(&self, omegas: &[f64]) -> Vec<f64> {
        self.frequency_response(omegas)
            .iter()
            .map(|h| h.arg())
            .collect()
    }

    /// Poles and zeros after cancelling pairs closer than `tolerance`
    /// (relative to their magnitude).
    ///
    /// Fails with [`Error::DegreeTooHigh`] above [`MAX_POLE_ZERO_DEGREE`].
    pub fn pole_zero(&self, tolerance: f64) -> Result<PoleZero> {
        // Multiply through by z^K so both sides are polynomials in z.
        let order = self.numerator.len().max(self.denominator.len());
        let degree = order.saturating_sub(1);
        if degree > MAX_POLE_ZERO_DEGREE {
            return Err(Error::DegreeTooHigh {
                degree,
                max: MAX_POLE_ZERO_DEGREE,
            });
        }
        let padded = |c: &[C64]| {
            let mut v = c.to_vec();
            v.resize(order, C64::new(0.0, 0.0));
            v
        };
        let mut zeros = roots(&padded(&self.numerator));
        let mut poles = roots(&padded(&self.denominator));

        let mut kept_zeros = Vec::with_capacity(zeros.len());
        for zero in zeros.drain(..) {
            let partner = poles
                .iter()
                .enumerate()
                .filter(|(_, p)| (*p - zero).norm() <= tolerance * (1.0 + p.norm()))
                .min_by(|(_, a), (_, b)| (*a - zero).norm().total_cmp(&(*b - zero).norm()))
                .map(|(i, _)| i);
            match partner {
                Some(i) => {
                    poles.remove(i);
                }
                None => kept_zeros.push(zero),
            }
        }
        log::debug!(
            "pole/zero: {} zeros, {} poles after cancellation",
            kept_zeros.len(),
            poles.len()
        );
        Ok(PoleZero {
            zeros: kept_zeros,
            poles,
        })
    }
}

/// `n` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
