//! Add-drop filter: a ring between two bus waveguides.

use std::f64::consts::PI;

use ringsolve_core::{
    C64, Composite, Dispersion, FieldEquation, PinAllocator, PinId, Structure, check_pin_count,
};
use ringsolve_core::units::deserialize_value;
use serde::{Deserialize, Serialize};

use crate::check_length;
use crate::coupler::DirectionalCoupler;
use crate::error::Result;
use crate::waveguide::Waveguide;

/// Geometry of an add-drop filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddDropParams {
    /// Ring radius (m).
    #[serde(deserialize_with = "deserialize_value")]
    pub radius: f64,
    /// Cross-coupling to the input bus.
    pub input_cross_coupling: f64,
    /// Cross-coupling to the drop bus.
    pub auxiliary_cross_coupling: f64,
    /// Amplitude injected inside the ring, on the half-ring returning to the
    /// input coupler.
    pub internal_source: Option<C64>,
}

impl Default for AddDropParams {
    fn default() -> Self {
        Self {
            radius: 1e-6,
            input_cross_coupling: 0.1,
            auxiliary_cross_coupling: 0.1,
            internal_source: None,
        }
    }
}

/// A ring coupled to two buses.
///
/// Pin layout (8 pins, 6 equations):
///
/// | pin | role                               |
/// |-----|------------------------------------|
/// | 0   | input bus, in                      |
/// | 1   | ring, entering the input coupler   |
/// | 2   | input bus, out (through port)      |
/// | 3   | ring, leaving the input coupler    |
/// | 4   | drop bus, in (add port)            |
/// | 5   | ring, entering the drop coupler    |
/// | 6   | drop bus, out (drop port)          |
/// | 7   | ring, leaving the drop coupler     |
///
/// Two half-rings of length πr connect 3 → 5 and 7 → 1. The input and add
/// pins are left for the enclosing circuit to drive.
#[derive(Debug)]
pub struct AddDropFilter {
    params: AddDropParams,
    circuit: Composite,
}

impl AddDropFilter {
    /// Number of ports.
    pub const NUM_PINS: usize = 8;
    /// Number of equations contributed.
    pub const NUM_EQUATIONS: usize = 6;

    /// Create a filter over freshly allocated pins.
    pub fn new(
        pins: &mut PinAllocator,
        params: AddDropParams,
        dispersion: Dispersion,
    ) -> Result<Self> {
        let pins = pins.allocate_n(Self::NUM_PINS);
        Self::with_pins(params, dispersion, &pins)
    }

    /// Create a filter over an explicit pin list (see the type docs for the
    /// layout).
    pub fn with_pins(params: AddDropParams, dispersion: Dispersion, pins: &[PinId]) -> Result<Self> {
        check_pin_count("AddDropFilter", Self::NUM_PINS, pins)?;
        check_length("radius", params.radius)?;

        let half_ring = PI * params.radius;
        let mut returning = Waveguide::with_pins(half_ring, dispersion, &[pins[7], pins[1]])?;
        if let Some(amplitude) = params.internal_source {
            returning = returning.with_source(amplitude);
        }

        let mut circuit = Composite::new("AddDropFilter", pins.to_vec(), dispersion);
        circuit.add(DirectionalCoupler::with_pins(
            params.input_cross_coupling,
            &pins[..4],
        )?)?;
        circuit.add(DirectionalCoupler::with_pins(
            params.auxiliary_cross_coupling,
            &pins[4..],
        )?)?;
        circuit.add(Waveguide::with_pins(
            half_ring,
            dispersion,
            &[pins[3], pins[5]],
        )?)?;
        circuit.add(returning)?;

        Ok(Self { params, circuit })
    }

    /// Attach the frequency grid used when this filter is solved on its own.
    pub fn with_angular_frequencies(mut self, angular_frequencies: Vec<f64>) -> Self {
        self.circuit.set_angular_frequencies(angular_frequencies);
        self
    }

    /// Geometry.
    pub fn params(&self) -> &AddDropParams {
        &self.params
    }

    /// Angular free spectral range (rad/s) of the ring.
    pub fn free_spectral_range(&self) -> f64 {
        self.circuit.free_spectral_range(2.0 * PI * self.params.radius)
    }

    /// Input-bus input pin.
    pub fn input(&self) -> PinId {
        self.circuit.pins()[0]
    }

    /// Through port.
    pub fn through(&self) -> PinId {
        self.circuit.pins()[2]
    }

    /// Add port.
    pub fn add_port(&self) -> PinId {
        self.circuit.pins()[4]
    }

    /// Drop port.
    pub fn drop_port(&self) -> PinId {
        self.circuit.pins()[6]
    }
}

impl AsRef<Composite> for AddDropFilter {
    fn as_ref(&self) -> &Composite {
        &self.circuit
    }
}

impl Structure for AddDropFilter {
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
