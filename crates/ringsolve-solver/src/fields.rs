//! Solved field vectors and the observables derived from them.

use indexmap::IndexMap;
use nalgebra::DVector;
use ringsolve_core::{C64, Error as CoreError, PinId};

use crate::error::Result;

/// Why a sample could not be solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The LU factorization broke down.
    Singular,
    /// The solve produced NaN or infinite amplitudes.
    NonFinite,
}

/// A frequency sample whose solve failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleFailure {
    /// Sample index.
    pub index: usize,
    /// Angular frequency of the sample (rad/s).
    pub angular_frequency: f64,
    /// Failure reason.
    pub kind: FailureKind,
}

/// Field amplitudes at every pin for every frequency sample.
///
/// Failed samples hold NaN at every pin and are listed in
/// [`failures`](Self::failures).
#[derive(Debug, Clone)]
pub struct FieldSolution {
    angular_frequencies: Vec<f64>,
    columns: IndexMap<PinId, usize>,
    samples: Vec<DVector<C64>>,
    failures: Vec<SampleFailure>,
}

impl FieldSolution {
    pub(crate) fn new(
        angular_frequencies: Vec<f64>,
        columns: IndexMap<PinId, usize>,
        samples: Vec<DVector<C64>>,
        failures: Vec<SampleFailure>,
    ) -> Self {
        Self {
            angular_frequencies,
            columns,
            samples,
            failures,
        }
    }

    /// Angular frequencies of the samples.
    pub fn angular_frequencies(&self) -> &[f64] {
        &self.angular_frequencies
    }

    /// Number of samples.
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Solved pins, in column order.
    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.columns.keys().copied()
    }

    /// Field vector of one sample, in column order.
    pub fn sample(&self, index: usize) -> Option<&DVector<C64>> {
        self.samples.get(index)
    }

    /// Samples that failed to solve.
    pub fn failures(&self) -> &[SampleFailure] {
        &self.failures
    }

    /// True if every sample solved.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn column(&self, pin: PinId) -> Result<usize> {
        Ok(self
            .columns
            .get(&pin)
            .copied()
            .ok_or(CoreError::UnknownPin(pin))?)
    }

    fn map_pin<T>(&self, pin: PinId, f: impl Fn(C64) -> T) -> Result<Vec<T>> {
        let col = self.column(pin)?;
        Ok(self.samples.iter().map(|x| f(x[col])).collect())
    }

    /// Complex field at a pin across all samples.
    pub fn field(&self, pin: PinId) -> Result<Vec<C64>> {
        self.map_pin(pin, |a| a)
    }

    /// Field amplitude `|A|` at a pin.
    pub fn field_amplitude(&self, pin: PinId) -> Result<Vec<f64>> {
        self.map_pin(pin, |a| a.norm())
    }

    /// Intensity `|A|²` at a pin.
    pub fn intensity(&self, pin: PinId) -> Result<Vec<f64>> {
        self.map_pin(pin, |a| a.norm_sqr())
    }

    /// Power transmission to an output pin, relative to a unit source.
    pub fn transmission(&self, pin: PinId) -> Result<Vec<f64>> {
        self.intensity(pin)
    }

    /// Phase of the field at a pin (rad, in (−π, π]).
    pub fn phase(&self, pin: PinId) -> Result<Vec<f64>> {
        self.map_pin(pin, |a| a.arg())
    }

    /// Intensity at a pin in dB.
    pub fn magnitude_db(&self, pin: PinId) -> Result<Vec<f64>> {
        self.map_pin(pin, |a| 20.0 * a.norm().log10())
    }

    /// Phase accumulated from `from` to `to` (rad), `arg(A_to) − arg(A_from)`.
    pub fn phase_difference(&self, from: PinId, to: PinId) -> Result<Vec<f64>> {
        let (a, b) = (self.column(from)?, self.column(to)?);
        Ok(self
            .samples
            .iter()
            .map(|x| x[b].arg() - x[a].arg())
            .collect())
    }

    /// Pairs of `(ω, value)` for tabular output.
    pub fn tabulate(&self, values: &[f64]) -> Vec<(f64, f64)> {
        self.angular_frequencies
            .iter()
            .copied()
            .zip(values.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringsolve_core::PinAllocator;

    fn solution() -> (FieldSolution, Vec<PinId>) {
        let mut alloc = PinAllocator::new();
        let pins = alloc.allocate_n(2);
        let columns = pins.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        let samples = vec![
            DVector::from_vec(vec![C64::new(1.0, 0.0), C64::new(0.0, 0.5)]),
            DVector::from_vec(vec![C64::new(1.0, 0.0), C64::new(-0.1, 0.0)]),
        ];
        (FieldSolution::new(vec![1.0, 2.0], columns, samples, vec![]), pins)
    }

    #[test]
    fn test_observables() {
        let (sol, pins) = solution();
        assert!(sol.is_complete());
        assert_eq!(sol.field_amplitude(pins[1]).unwrap(), vec![0.5, 0.1]);

        let intensity = sol.intensity(pins[1]).unwrap();
        assert!((intensity[0] - 0.25).abs() < 1e-15);
        assert!((intensity[1] - 0.01).abs() < 1e-15);

        let db = sol.magnitude_db(pins[1]).unwrap();
        assert!((db[1] + 20.0).abs() < 1e-12, "db = {}", db[1]);

        let phase = sol.phase(pins[1]).unwrap();
        assert!((phase[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-15);

        let dphi = sol.phase_difference(pins[0], pins[1]).unwrap();
        assert!((dphi[1] - std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn test_unknown_pin() {
        let (sol, _) = solution();
        assert!(sol.field(PinId::new(99)).is_err());
    }

    #[test]
    fn test_tabulate() {
        let (sol, pins) = solution();
        let rows = sol.tabulate(&sol.field_amplitude(pins[0]).unwrap());
        assert_eq!(rows, vec![(1.0, 1.0), (2.0, 1.0)]);
    }
}
