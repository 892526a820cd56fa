//! Resonant interferometric coupler (RIC).
//!
//! An add-drop filter whose through port is routed through a Mach-Zehnder
//! arm holding an auxiliary ring and fed back into the add port. The
//! auxiliary ring tunes how strongly the main cavity couples to the bus.

use std::f64::consts::PI;

use ringsolve_core::{
    C64, Composite, Dispersion, FieldEquation, PinAllocator, PinId, Structure, check_pin_count,
};
use ringsolve_core::units::deserialize_value;
use serde::{Deserialize, Serialize};

use crate::add_drop::{AddDropFilter, AddDropParams};
use crate::check_length;
use crate::error::Result;
use crate::ring::{RingParams, RingResonator};
use crate::source::Source;
use crate::waveguide::Waveguide;

/// Where the circuit is driven.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "amplitude")]
pub enum Excitation {
    /// Drive the input bus.
    External(C64),
    /// Drive the main cavity from inside; the input bus is left dark.
    Internal(C64),
}

impl Default for Excitation {
    fn default() -> Self {
        Excitation::External(C64::new(1.0, 0.0))
    }
}

/// Geometry and couplings of a RIC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RicParams {
    /// Main ring radius (m).
    #[serde(deserialize_with = "deserialize_value")]
    pub main_radius: f64,
    /// Auxiliary ring radius (m).
    #[serde(deserialize_with = "deserialize_value")]
    pub auxiliary_radius: f64,
    /// Total Mach-Zehnder arm length (m), split evenly around the auxiliary ring.
    #[serde(deserialize_with = "deserialize_value")]
    pub mach_zehnder_length: f64,
    /// Main ring ↔ input bus cross-coupling.
    pub input_cross_coupling: f64,
    /// Main ring ↔ interferometer cross-coupling.
    pub through_cross_coupling: f64,
    /// Auxiliary ring ↔ interferometer cross-coupling.
    pub ring_cross_coupling: f64,
    /// Phase shift applied on the first interferometer arm (rad).
    pub phase_delay: f64,
    /// Driving configuration.
    pub excitation: Excitation,
}

impl Default for RicParams {
    fn default() -> Self {
        Self {
            main_radius: 120e-6,
            auxiliary_radius: 90e-6,
            mach_zehnder_length: PI * 120e-6,
            input_cross_coupling: 0.1,
            through_cross_coupling: 0.1,
            ring_cross_coupling: 0.3,
            phase_delay: 0.0,
            excitation: Excitation::default(),
        }
    }
}

/// The RIC circuit (12 pins, 12 equations: self-contained and square).
///
/// Pins 0..8 form the main add-drop filter, pins 8..12 the auxiliary ring.
/// Half of the interferometer length joins pin 2 to pin 8, the other half
/// joins pin 10 back to pin 4. The drop port (pin 6) is the observed output.
#[derive(Debug)]
pub struct ResonantInterferometricCoupler {
    params: RicParams,
    circuit: Composite,
}

impl ResonantInterferometricCoupler {
    /// Number of ports.
    pub const NUM_PINS: usize = 12;
    /// Number of equations contributed.
    pub const NUM_EQUATIONS: usize = 12;

    /// Create a RIC over freshly allocated pins.
    pub fn new(pins: &mut PinAllocator, params: RicParams, dispersion: Dispersion) -> Result<Self> {
        let pins = pins.allocate_n(Self::NUM_PINS);
        Self::with_pins(params, dispersion, &pins)
    }

    /// Create a RIC over an explicit pin list.
    pub fn with_pins(params: RicParams, dispersion: Dispersion, pins: &[PinId]) -> Result<Self> {
        check_pin_count("ResonantInterferometricCoupler", Self::NUM_PINS, pins)?;
        check_length("mach_zehnder_length", params.mach_zehnder_length)?;

        let (bus_amplitude, internal_source) = match params.excitation {
            Excitation::External(amplitude) => (amplitude, None),
            Excitation::Internal(amplitude) => (C64::new(0.0, 0.0), Some(amplitude)),
        };
        let add_drop = AddDropParams {
            radius: params.main_radius,
            input_cross_coupling: params.input_cross_coupling,
            auxiliary_cross_coupling: params.through_cross_coupling,
            internal_source,
        };
        let ring = RingParams {
            radius: params.auxiliary_radius,
            cross_coupling: params.ring_cross_coupling,
        };
        let arm = params.mach_zehnder_length / 2.0;

        let mut circuit =
            Composite::new("ResonantInterferometricCoupler", pins.to_vec(), dispersion);
        circuit.add(Source::with_pins(bus_amplitude, &pins[..1])?)?;
        circuit.add(AddDropFilter::with_pins(add_drop, dispersion, &pins[..8])?)?;
        circuit.add(
            Waveguide::with_pins(arm, dispersion, &[pins[2], pins[8]])?
                .with_phase_delay(params.phase_delay),
        )?;
        circuit.add(RingResonator::with_pins(ring, dispersion, &pins[8..])?)?;
        circuit.add(Waveguide::with_pins(arm, dispersion, &[pins[10], pins[4]])?)?;

        log::debug!(
            "built RIC: R={:.3e} r={:.3e} L={:.3e} φ={:.3}",
            params.main_radius,
            params.auxiliary_radius,
            params.mach_zehnder_length,
            params.phase_delay
        );
        Ok(Self { params, circuit })
    }

    /// Attach the frequency grid the circuit is solved on.
    pub fn with_angular_frequencies(mut self, angular_frequencies: Vec<f64>) -> Self {
        self.circuit.set_angular_frequencies(angular_frequencies);
        self
    }

    /// Geometry and couplings.
    pub fn params(&self) -> &RicParams {
        &self.params
    }

    /// Angular free spectral range (rad/s) of the main ring.
    pub fn free_spectral_range(&self) -> f64 {
        self.circuit.free_spectral_range(2.0 * PI * self.params.main_radius)
    }

    /// Driven input pin.
    pub fn input(&self) -> PinId {
        self.circuit.pins()[0]
    }

    /// Observed drop port.
    pub fn drop_port(&self) -> PinId {
        self.circuit.pins()[6]
    }

    /// Ends of the two interferometer arms: `[(start, end); 2]`.
    pub fn interferometer_arms(&self) -> [(PinId, PinId); 2] {
        let p = self.circuit.pins();
        [(p[2], p[8]), (p[10], p[4])]
    }
}

impl AsRef<Composite> for ResonantInterferometricCoupler {
    fn as_ref(&self) -> &Composite {
        &self.circuit
    }
}

impl Structure for ResonantInterferometricCoupler {
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
