//! All-pass ring resonator.

use std::f64::consts::PI;

use ringsolve_core::{
    Composite, Dispersion, FieldEquation, PinAllocator, PinId, Structure, check_pin_count,
};
use ringsolve_core::units::deserialize_value;
use serde::{Deserialize, Serialize};

use crate::check_length;
use crate::coupler::DirectionalCoupler;
use crate::error::Result;
use crate::waveguide::Waveguide;

/// Geometry of a ring resonator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingParams {
    /// Ring radius (m).
    #[serde(deserialize_with = "deserialize_value")]
    pub radius: f64,
    /// Bus-to-ring cross-coupling κ.
    pub cross_coupling: f64,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            radius: 1e-6,
            cross_coupling: 0.75f64.sqrt(),
        }
    }
}

/// A ring closed on one directional coupler.
///
/// Pins are `[input, ring_in, through, ring_out]`: the coupler spans all four
/// and a waveguide of length 2πr carries `ring_out` back to `ring_in`. The
/// input pin is left undetermined (3 equations over 4 pins) so the ring can
/// be driven by whatever the enclosing circuit connects to it.
#[derive(Debug)]
pub struct RingResonator {
    params: RingParams,
    circuit: Composite,
}

impl RingResonator {
    /// Number of ports.
    pub const NUM_PINS: usize = 4;
    /// Number of equations contributed.
    pub const NUM_EQUATIONS: usize = 3;

    /// Create a ring over freshly allocated pins.
    pub fn new(pins: &mut PinAllocator, params: RingParams, dispersion: Dispersion) -> Result<Self> {
        let pins = pins.allocate_n(Self::NUM_PINS);
        Self::with_pins(params, dispersion, &pins)
    }

    /// Create a ring over `[input, ring_in, through, ring_out]`.
    pub fn with_pins(params: RingParams, dispersion: Dispersion, pins: &[PinId]) -> Result<Self> {
        check_pin_count("RingResonator", Self::NUM_PINS, pins)?;
        check_length("radius", params.radius)?;

        let mut circuit = Composite::new("RingResonator", pins.to_vec(), dispersion);
        circuit.add(DirectionalCoupler::with_pins(params.cross_coupling, pins)?)?;
        circuit.add(Waveguide::with_pins(
            2.0 * PI * params.radius,
            dispersion,
            &[pins[3], pins[1]],
        )?)?;

        Ok(Self { params, circuit })
    }

    /// Attach the frequency grid used when this ring is solved on its own.
    pub fn with_angular_frequencies(mut self, angular_frequencies: Vec<f64>) -> Self {
        self.circuit.set_angular_frequencies(angular_frequencies);
        self
    }

    /// Geometry.
    pub fn params(&self) -> &RingParams {
        &self.params
    }

    /// Round-trip length 2πr (m).
    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.params.radius
    }

    /// Angular free spectral range (rad/s) of the ring.
    pub fn free_spectral_range(&self) -> f64 {
        self.circuit.free_spectral_range(self.circumference())
    }

    /// Bus input pin.
    pub fn input(&self) -> PinId {
        self.circuit.pins()[0]
    }

    /// Bus output pin.
    pub fn through(&self) -> PinId {
        self.circuit.pins()[2]
    }

    /// Intra-ring field entering the coupler.
    pub fn ring_in(&self) -> PinId {
        self.circuit.pins()[1]
    }

    /// Intra-ring field leaving the coupler.
    pub fn ring_out(&self) -> PinId {
        self.circuit.pins()[3]
    }
}

impl AsRef<Composite> for RingResonator {
    fn as_ref(&self) -> &Composite {
        &self.circuit
    }
}

impl Structure for RingResonator {
    fn name(&self) -> &str {
        self.circuit.name()
    }

    fn pins(&self) -> &[PinId] {
        self.circuit.pins()
    }

    fn num_equations(&self) -> usize {
        self.circuit.num_equations()
    }

    fn field_equations(&self, angular_frequencies: &[f64]) -> Vec<FieldEquation> {
        self.circuit.field_equations(angular_frequencies)
    }
}
