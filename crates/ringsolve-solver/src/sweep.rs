//! Angular-frequency grids.

use serde::{Deserialize, Serialize};

use ringsolve_core::units::wavelength_to_frequency;

use crate::error::{Error, Result};

/// A linear grid of angular frequencies (rad/s), endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    /// First angular frequency.
    pub start: f64,
    /// Last angular frequency.
    pub stop: f64,
    /// Number of samples.
    pub num_points: usize,
}

impl SweepParams {
    /// Linear grid from `start` to `stop`.
    pub fn linear(start: f64, stop: f64, num_points: usize) -> Self {
        Self {
            start,
            stop,
            num_points,
        }
    }

    /// Grid centred on the optical frequency of `wavelength`, `span` wide.
    pub fn around_wavelength(wavelength: f64, span: f64, num_points: usize) -> Self {
        let center = wavelength_to_frequency(wavelength);
        Self::linear(center - span / 2.0, center + span / 2.0, num_points)
    }

    /// Grid centred on `wavelength` covering `count` free spectral ranges.
    pub fn spanning_fsr(wavelength: f64, fsr: f64, count: f64, num_points: usize) -> Self {
        Self::around_wavelength(wavelength, count * fsr, num_points)
    }

    /// Reject empty or non-finite grids.
    pub fn validate(&self) -> Result<()> {
        if self.num_points == 0 {
            return Err(Error::InvalidSweep("no sample points".to_string()));
        }
        if !self.start.is_finite() || !self.stop.is_finite() {
            return Err(Error::InvalidSweep(format!(
                "non-finite bounds {}..{}",
                self.start, self.stop
            )));
        }
        Ok(())
    }
}

/// Generate the samples of a linear grid.
pub fn generate_frequencies(params: &SweepParams) -> Vec<f64> {
    match params.num_points {
        0 => Vec::new(),
        1 => vec![params.start],
        n => {
            let step = (params.stop - params.start) / (n as f64 - 1.0);
            (0..n).map(|i| params.start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringsolve_core::units::free_spectral_range;

    #[test]
    fn test_generate_linear_frequencies() {
        let freqs = generate_frequencies(&SweepParams::linear(1.0, 100.0, 100));
        assert_eq!(freqs.len(), 100);
        assert!((freqs[0] - 1.0).abs() < 1e-10);
        assert!((freqs[99] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_single_and_empty_grids() {
        assert_eq!(generate_frequencies(&SweepParams::linear(5.0, 9.0, 1)), vec![5.0]);
        assert!(generate_frequencies(&SweepParams::linear(5.0, 9.0, 0)).is_empty());
        assert!(SweepParams::linear(5.0, 9.0, 0).validate().is_err());
        assert!(SweepParams::linear(f64::NAN, 9.0, 3).validate().is_err());
    }

    #[test]
    fn test_fsr_grid_is_centred() {
        let fsr = free_spectral_range(2.0 * std::f64::consts::PI * 120e-6, 2.0);
        let params = SweepParams::spanning_fsr(1550e-9, fsr, 3.0, 501);
        let freqs = generate_frequencies(&params);
        let center = wavelength_to_frequency(1550e-9);

        assert!((freqs[250] - center).abs() / center < 1e-12);
        assert!(((freqs[500] - freqs[0]) - 3.0 * fsr).abs() / fsr < 1e-9);
    }
}
