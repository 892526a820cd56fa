//! One-way propagation between two pins.

use ringsolve_core::{
    C64, Dispersion, FieldEquation, PinAllocator, PinId, Structure, check_pin_count,
};

use crate::check_length;
use crate::error::Result;

/// A straight waveguide section carrying light from `pins[0]` to `pins[1]`.
///
/// The single equation is
///
/// ```text
/// A_out − a·exp(i(β(ω)·L + φ))·A_in = s
/// ```
///
/// where `a` is the amplitude left after the propagation loss, `φ` an optional
/// extra phase (a phase shifter) and `s` an optional embedded source
/// amplitude injected at the output.
#[derive(Debug, Clone)]
pub struct Waveguide {
    pins: Vec<PinId>,
    /// Length in metres.
    pub length: f64,
    /// Mode dispersion and loss.
    pub dispersion: Dispersion,
    /// Extra phase added to the propagation phase (rad).
    pub phase_delay: f64,
    /// Amplitude injected at the output pin, if this section is a source.
    pub source: Option<C64>,
}

impl Waveguide {
    /// Number of ports.
    pub const NUM_PINS: usize = 2;

    /// Create a waveguide over two freshly allocated pins.
    pub fn new(pins: &mut PinAllocator, length: f64, dispersion: Dispersion) -> Result<Self> {
        let pins = pins.allocate_n(Self::NUM_PINS);
        Self::with_pins(length, dispersion, &pins)
    }

    /// Create a waveguide over `[input, output]`.
    pub fn with_pins(length: f64, dispersion: Dispersion, pins: &[PinId]) -> Result<Self> {
        check_pin_count("Waveguide", Self::NUM_PINS, pins)?;
        check_length("length", length)?;
        Ok(Self {
            pins: pins.to_vec(),
            length,
            dispersion,
            phase_delay: 0.0,
            source: None,
        })
    }

    /// Add a fixed phase shift to the propagation phase.
    pub fn with_phase_delay(mut self, phase_delay: f64) -> Self {
        self.phase_delay = phase_delay;
        self
    }

    /// Inject `amplitude` at the output pin.
    pub fn with_source(mut self, amplitude: C64) -> Self {
        self.source = Some(amplitude);
        self
    }

    /// Input pin.
    pub fn input(&self) -> PinId {
        self.pins[0]
    }

    /// Output pin.
    pub fn output(&self) -> PinId {
        self.pins[1]
    }

    /// Complex transmission input → output at one angular frequency.
    pub fn transmission(&self, omega: f64) -> C64 {
        self.dispersion
            .propagation(omega, self.length, self.phase_delay)
    }
}

impl Structure for Waveguide {
    fn name(&self) -> &str {
        "Waveguide"
    }

    fn pins(&self) -> &[PinId] {
        &self.pins
    }

    fn num_equations(&self) -> usize {
        1
    }

    fn field_equations(&self, angular_frequencies: &[f64]) -> Vec<FieldEquation> {
        let propagation: Vec<C64> = angular_frequencies
            .iter()
            .map(|&omega| -self.transmission(omega))
            .collect();
        vec![
            FieldEquation::new(self.output())
                .term(self.input(), propagation)
                .term(self.output(), 1.0)
                .with_ordinate(self.source.unwrap_or_default()),
        ]
    }
}
