//! Main-resonance extraction efficiency.
//!
//! The loaded linewidth of the resonance nearest `ω = π` is measured on
//! `|H|²`, then compared with the linewidth the cavity would have with
//! material loss alone: `η = 1 − FWHM_intrinsic / FWHM_measured`.

use std::f64::consts::PI;

use ringsolve_solver::resonance_near;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::transfer::{linspace, TransferFunction};

/// Sampling of the efficiency measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyConfig {
    /// Normalized frequency the main resonance is searched near.
    pub target: f64,
    /// Samples over `[0, 2π]` for locating the peak.
    pub coarse_samples: usize,
    /// Samples of the refined window; zero disables refinement.
    pub refine_samples: usize,
    /// Half-width of the refined window in units of the coarse FWHM.
    pub refine_span: f64,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            target: PI,
            coarse_samples: 10_000,
            refine_samples: 5_000,
            refine_span: 2.0,
        }
    }
}

/// FWHM in normalized frequency of `1/|1 − a·e^{−iωL}|²`.
pub fn intrinsic_fwhm(round_trip_amplitude: f64, cavity_length: f64) -> Result<f64> {
    let a = round_trip_amplitude;
    if !(a > 0.0 && a <= 1.0) {
        return Err(Error::InvalidParameter {
            name: "round_trip_amplitude".into(),
            reason: format!("{a} is outside (0, 1]"),
        });
    }
    if !(cavity_length > 0.0) {
        return Err(Error::InvalidParameter {
            name: "cavity_length".into(),
            reason: format!("{cavity_length} is not positive"),
        });
    }
    let cos_half = (1.0 - (1.0 - a).powi(2) / (2.0 * a)).clamp(-1.0, 1.0);
    Ok(2.0 * cos_half.acos() / cavity_length)
}

fn intensity(h: &TransferFunction, omegas: &[f64]) -> Vec<f64> {
    h.magnitude_response(omegas).iter().map(|m| m * m).collect()
}

/// FWHM of the `|H|²` peak nearest `config.target`.
pub fn measured_fwhm(h: &TransferFunction, config: &EfficiencyConfig) -> Result<f64> {
    let omegas = linspace(0.0, 2.0 * PI, config.coarse_samples);
    let coarse = resonance_near(&omegas, &intensity(h, &omegas), config.target)?;
    if config.refine_samples == 0 {
        return Ok(coarse.fwhm);
    }

    let half_window = config.refine_span * coarse.fwhm;
    let fine_omegas = linspace(
        coarse.position - half_window,
        coarse.position + half_window,
        config.refine_samples,
    );
    let fine = resonance_near(&fine_omegas, &intensity(h, &fine_omegas), coarse.position)?;
    log::debug!(
        "main resonance at ω = {:.6}: coarse FWHM {:.3e}, refined {:.3e}",
        fine.position,
        coarse.fwhm,
        fine.fwhm
    );
    Ok(fine.fwhm)
}

/// `1 − intrinsic/measured` for a cavity of round-trip amplitude
/// `round_trip_amplitude` and length `cavity_length`.
pub fn extraction_efficiency(
    h: &TransferFunction,
    round_trip_amplitude: f64,
    cavity_length: f64,
    config: &EfficiencyConfig,
) -> Result<f64> {
    let intrinsic = intrinsic_fwhm(round_trip_amplitude, cavity_length)?;
    let measured = measured_fwhm(h, config)?;
    Ok(1.0 - intrinsic / measured)
}
