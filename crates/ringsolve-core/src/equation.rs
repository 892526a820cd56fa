//! Sparse field equations.
//!
//! A field equation is one row of the circuit system: a sparse list of
//! `(pin, coefficient)` terms, the pin whose amplitude the row determines,
//! and an ordinate (right-hand side) that is zero except for sources.
//! Unlisted pins have coefficient zero.

use crate::C64;
use crate::pin::PinId;

/// A coefficient that is either the same at every frequency sample or
/// given per sample.
#[derive(Debug, Clone, PartialEq)]
pub enum Coefficient {
    /// Same value at every sample.
    Uniform(C64),
    /// One value per frequency sample.
    Spectral(Vec<C64>),
}

impl Coefficient {
    /// Real constant coefficient.
    pub fn real(value: f64) -> Self {
        Coefficient::Uniform(C64::new(value, 0.0))
    }

    /// Value at a given frequency sample.
    #[inline]
    pub fn at(&self, sample: usize) -> C64 {
        match self {
            Coefficient::Uniform(c) => *c,
            Coefficient::Spectral(values) => values[sample],
        }
    }

    /// Number of samples carried, `None` if uniform.
    pub fn num_samples(&self) -> Option<usize> {
        match self {
            Coefficient::Uniform(_) => None,
            Coefficient::Spectral(values) => Some(values.len()),
        }
    }
}

impl From<C64> for Coefficient {
    fn from(c: C64) -> Self {
        Coefficient::Uniform(c)
    }
}

impl From<f64> for Coefficient {
    fn from(v: f64) -> Self {
        Coefficient::real(v)
    }
}

impl From<Vec<C64>> for Coefficient {
    fn from(values: Vec<C64>) -> Self {
        Coefficient::Spectral(values)
    }
}

/// One linear equation `Σ c_k · A_k = ordinate`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEquation {
    target: PinId,
    terms: Vec<(PinId, Coefficient)>,
    ordinate: C64,
}

impl FieldEquation {
    /// Start an equation that determines the field at `target`.
    pub fn new(target: PinId) -> Self {
        Self {
            target,
            terms: Vec::new(),
            ordinate: C64::new(0.0, 0.0),
        }
    }

    /// Add a term. Repeated pins accumulate during assembly.
    pub fn term(mut self, pin: PinId, coefficient: impl Into<Coefficient>) -> Self {
        self.terms.push((pin, coefficient.into()));
        self
    }

    /// Set the right-hand side.
    pub fn with_ordinate(mut self, ordinate: C64) -> Self {
        self.ordinate = ordinate;
        self
    }

    /// The pin this equation determines.
    pub fn target(&self) -> PinId {
        self.target
    }

    /// Sparse terms of the row.
    pub fn terms(&self) -> &[(PinId, Coefficient)] {
        &self.terms
    }

    /// Right-hand side value.
    pub fn ordinate(&self) -> C64 {
        self.ordinate
    }

    /// Coefficient of `pin` at a sample (zero if absent).
    pub fn coefficient(&self, pin: PinId, sample: usize) -> C64 {
        self.terms
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, c)| c.at(sample))
            .sum()
    }

    /// Pins referenced by the row.
    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.terms.iter().map(|(p, _)| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_and_spectral() {
        let u = Coefficient::real(2.0);
        assert_eq!(u.at(0), C64::new(2.0, 0.0));
        assert_eq!(u.at(99), C64::new(2.0, 0.0));
        assert_eq!(u.num_samples(), None);

        let s = Coefficient::from(vec![C64::new(1.0, 0.0), C64::new(0.0, 1.0)]);
        assert_eq!(s.at(1), C64::new(0.0, 1.0));
        assert_eq!(s.num_samples(), Some(2));
    }

    #[test]
    fn test_repeated_terms_accumulate() {
        let a = PinId::new(0);
        let b = PinId::new(1);
        let eq = FieldEquation::new(b).term(b, 1.0).term(a, -0.5).term(a, -0.25);

        assert_eq!(eq.target(), b);
        assert_eq!(eq.coefficient(a, 0), C64::new(-0.75, 0.0));
        assert_eq!(eq.coefficient(PinId::new(9), 0), C64::new(0.0, 0.0));
        assert_eq!(eq.ordinate(), C64::new(0.0, 0.0));
    }
}
