//! Lossless 2×2 directional coupler.

use std::f64::consts::FRAC_PI_2;

use ringsolve_core::{C64, FieldEquation, PinAllocator, PinId, Structure, check_pin_count};

use crate::error::{Error, Result};

/// A point coupler between two guides.
///
/// Pins are `[in_0, in_1, out_0, out_1]`. With self-coupling
/// `σ = √(1−κ²)·e^{iφ_s}` and cross-coupling `κ' = κ·e^{iφ_c}`:
///
/// ```text
/// out_0 =  σ·in_0     + κ'·in_1
/// out_1 = −conj(κ')·in_0 + conj(σ)·in_1
/// ```
///
/// The 2×2 block is unitary for every κ in [0, 1].
#[derive(Debug, Clone)]
pub struct DirectionalCoupler {
    pins: Vec<PinId>,
    /// Cross-coupling coefficient κ in [0, 1].
    pub cross_coupling: f64,
    /// Phase of the self-coupling term (rad).
    pub self_coupling_phase: f64,
    /// Phase of the cross-coupling term (rad).
    pub cross_coupling_phase: f64,
}

impl DirectionalCoupler {
    /// Number of ports.
    pub const NUM_PINS: usize = 4;

    /// Create a coupler over four freshly allocated pins.
    pub fn new(pins: &mut PinAllocator, cross_coupling: f64) -> Result<Self> {
        let pins = pins.allocate_n(Self::NUM_PINS);
        Self::with_pins(cross_coupling, &pins)
    }

    /// Create a coupler over `[in_0, in_1, out_0, out_1]` with the
    /// conventional phases φ_s = 0 and φ_c = π/2.
    pub fn with_pins(cross_coupling: f64, pins: &[PinId]) -> Result<Self> {
        Self::with_phases(cross_coupling, 0.0, FRAC_PI_2, pins)
    }

    /// Create a coupler with explicit coupling phases.
    pub fn with_phases(
        cross_coupling: f64,
        self_coupling_phase: f64,
        cross_coupling_phase: f64,
        pins: &[PinId],
    ) -> Result<Self> {
        check_pin_count("DirectionalCoupler", Self::NUM_PINS, pins)?;
        if !(0.0..=1.0).contains(&cross_coupling) {
            return Err(Error::InvalidParameter(format!(
                "cross-coupling coefficient {cross_coupling} outside [0, 1]"
            )));
        }
        if !self_coupling_phase.is_finite() || !cross_coupling_phase.is_finite() {
            return Err(Error::InvalidParameter(
                "coupling phases must be finite".to_string(),
            ));
        }
        Ok(Self {
            pins: pins.to_vec(),
            cross_coupling,
            self_coupling_phase,
            cross_coupling_phase,
        })
    }

    /// Complex self-coupling σ.
    pub fn sigma(&self) -> C64 {
        C64::from_polar(
            (1.0 - self.cross_coupling * self.cross_coupling).sqrt(),
            self.self_coupling_phase,
        )
    }

    /// Complex cross-coupling κ'.
    pub fn kappa(&self) -> C64 {
        C64::from_polar(self.cross_coupling, self.cross_coupling_phase)
    }
}

impl Structure for DirectionalCoupler {
    fn name(&self) -> &str {
        "DirectionalCoupler"
    }

    fn pins(&self) -> &[PinId] {
        &self.pins
    }

    fn num_equations(&self) -> usize {
        2
    }

    fn field_equations(&self, _angular_frequencies: &[f64]) -> Vec<FieldEquation> {
        let (sigma, kappa) = (self.sigma(), self.kappa());
        let p = &self.pins;
        vec![
            FieldEquation::new(p[2])
                .term(p[0], -sigma)
                .term(p[1], -kappa)
                .term(p[2], 1.0),
            FieldEquation::new(p[3])
                .term(p[0], kappa.conj())
                .term(p[1], -sigma.conj())
                .term(p[3], 1.0),
        ]
    }
}
