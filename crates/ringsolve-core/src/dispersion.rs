//! Second-order dispersion and propagation loss of a guided mode.

use std::f64::consts::LN_10;

use serde::{Deserialize, Serialize};

use crate::C64;
use crate::units::{SPEED_OF_LIGHT, wavelength_to_frequency};

/// Propagation parameters shared by every waveguide of a circuit.
///
/// The wavevector is expanded to second order around the central frequency
/// ω₀ = 2πc/λ₀:
///
/// β(ω) = n_eff·ω₀/c + n_g·(ω − ω₀)/c + ½·GVD·(ω − ω₀)²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dispersion {
    /// Effective refractive index n_eff.
    pub effective_index: f64,
    /// Group refractive index n_g.
    pub group_index: f64,
    /// Group-velocity dispersion (s²/m).
    pub gvd: f64,
    /// Propagation loss (dB/m).
    pub loss_db_per_m: f64,
    /// Central wavelength λ₀ (m).
    pub central_wavelength: f64,
}

impl Default for Dispersion {
    fn default() -> Self {
        Self {
            effective_index: 1.0,
            group_index: 1.0,
            gvd: 0.0,
            loss_db_per_m: 10.0,
            central_wavelength: 1550e-9,
        }
    }
}

impl Dispersion {
    /// Lossless, dispersionless propagation with the given indices.
    pub fn lossless(effective_index: f64, group_index: f64) -> Self {
        Self {
            effective_index,
            group_index,
            gvd: 0.0,
            loss_db_per_m: 0.0,
            ..Self::default()
        }
    }

    /// Central angular frequency ω₀ (rad/s).
    pub fn central_frequency(&self) -> f64 {
        wavelength_to_frequency(self.central_wavelength)
    }

    /// Wavevector β(ω) (rad/m).
    pub fn wavevector(&self, omega: f64) -> f64 {
        let omega_0 = self.central_frequency();
        let detuning = omega - omega_0;
        self.effective_index * omega_0 / SPEED_OF_LIGHT
            + self.group_index * detuning / SPEED_OF_LIGHT
            + 0.5 * self.gvd * detuning * detuning
    }

    /// Field amplitude remaining after `length` metres.
    pub fn loss_amplitude(&self, length: f64) -> f64 {
        (-self.loss_db_per_m * LN_10 / 20.0 * length).exp()
    }

    /// Complex transmission `loss · exp(i(β·L + φ))` over `length` metres
    /// with an extra phase `phase_delay`.
    pub fn propagation(&self, omega: f64, length: f64, phase_delay: f64) -> C64 {
        C64::from_polar(
            self.loss_amplitude(length),
            self.wavevector(omega) * length + phase_delay,
        )
    }
}
