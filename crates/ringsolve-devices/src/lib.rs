//! Optical building blocks for ringsolve.
//!
//! This crate provides the structure catalog:
//! - Elementary structures: [`Waveguide`] (with phase-delay and embedded
//!   source variants), [`DirectionalCoupler`], [`Source`]
//! - Composite circuits: [`RingResonator`], [`AddDropFilter`] and the
//!   [`ResonantInterferometricCoupler`]
//!
//! Every structure can be built either from a [`PinAllocator`], which hands
//! out fresh pins, or over an explicit pin list whose length is checked
//! against the structure's arity.
//!
//! [`PinAllocator`]: ringsolve_core::PinAllocator

pub mod add_drop;
pub mod coupler;
pub mod error;
pub mod ric;
pub mod ring;
pub mod source;
pub mod waveguide;

pub use add_drop::{AddDropFilter, AddDropParams};
pub use coupler::DirectionalCoupler;
pub use error::{Error, Result};
pub use ric::{Excitation, ResonantInterferometricCoupler, RicParams};
pub use ring::{RingParams, RingResonator};
pub use source::Source;
pub use waveguide::Waveguide;

/// Reject non-finite or negative geometric parameters.
pub(crate) fn check_length(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidValue {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}
