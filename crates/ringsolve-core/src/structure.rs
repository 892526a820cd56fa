//! The structure capability shared by elementary and composite blocks.

use crate::C64;
use crate::equation::FieldEquation;
use crate::error::{Error, Result};
use crate::pin::PinId;

/// An optical building block defining linear relations among its pins.
pub trait Structure: std::fmt::Debug + Send + Sync {
    /// Structure name (e.g., "Waveguide", "RingResonator").
    fn name(&self) -> &str;

    /// Pins assigned to this structure, in port order.
    fn pins(&self) -> &[PinId];

    /// Number of ports.
    fn num_pins(&self) -> usize {
        self.pins().len()
    }

    /// Number of equations this structure contributes.
    fn num_equations(&self) -> usize;

    /// Field equations evaluated on a frequency grid (rad/s).
    ///
    /// Frequency-dependent coefficients carry one value per entry of
    /// `angular_frequencies`.
    fn field_equations(&self, angular_frequencies: &[f64]) -> Vec<FieldEquation>;

    /// Right-hand side contributions, one per equation.
    fn ordinate_vector(&self) -> Vec<C64> {
        self.field_equations(&[])
            .iter()
            .map(FieldEquation::ordinate)
            .collect()
    }
}

/// Reject a pin list whose length does not match a structure's arity.
pub fn check_pin_count(structure: &str, expected: usize, pins: &[PinId]) -> Result<()> {
    if pins.len() != expected {
        return Err(Error::PinCountMismatch {
            structure: structure.to_string(),
            expected,
            actual: pins.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pin_count() {
        let pins = [PinId::new(0), PinId::new(1)];
        assert!(check_pin_count("Waveguide", 2, &pins).is_ok());

        let err = check_pin_count("DirectionalCoupler", 4, &pins).unwrap_err();
        assert_eq!(
            err.to_string(),
            "DirectionalCoupler requires 4 pins, got 2"
        );
    }
}
