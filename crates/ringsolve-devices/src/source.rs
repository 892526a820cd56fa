//! Fixed-amplitude excitation of a single pin.

use ringsolve_core::{C64, FieldEquation, PinAllocator, PinId, Structure, check_pin_count};

use crate::error::Result;

/// A source pinning one field amplitude: `A = amplitude`.
///
/// An amplitude of zero leaves the pin as an undriven input.
#[derive(Debug, Clone)]
pub struct Source {
    pins: Vec<PinId>,
    /// Injected complex amplitude.
    pub amplitude: C64,
}

impl Source {
    /// Number of ports.
    pub const NUM_PINS: usize = 1;

    /// Create a unit source on a freshly allocated pin.
    pub fn new(pins: &mut PinAllocator) -> Self {
        Self {
            pins: vec![pins.allocate()],
            amplitude: C64::new(1.0, 0.0),
        }
    }

    /// Create a source of the given amplitude on `pins[0]`.
    pub fn with_pins(amplitude: C64, pins: &[PinId]) -> Result<Self> {
        check_pin_count("Source", Self::NUM_PINS, pins)?;
        Ok(Self {
            pins: pins.to_vec(),
            amplitude,
        })
    }

    /// Driven pin.
    pub fn pin(&self) -> PinId {
        self.pins[0]
    }
}

impl Structure for Source {
    fn name(&self) -> &str {
        "Source"
    }

    fn pins(&self) -> &[PinId] {
        &self.pins
    }

    fn num_equations(&self) -> usize {
        1
    }

    fn field_equations(&self, _angular_frequencies: &[f64]) -> Vec<FieldEquation> {
        vec![FieldEquation::new(self.pin())
            .term(self.pin(), 1.0)
            .with_ordinate(self.amplitude)]
    }
}
