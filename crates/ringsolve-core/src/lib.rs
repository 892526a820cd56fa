//! Core circuit representation for ringsolve.
//!
//! This crate provides the fundamental data structures for frequency-domain
//! photonic circuits: pins and their allocator, sparse field equations, the
//! [`Structure`] capability, composite structures, the dispersion model, and
//! the batched coefficient system `M(ω) x(ω) = b(ω)` assembled from them.

pub mod composite;
pub mod dispersion;
pub mod equation;
pub mod error;
pub mod pin;
pub mod structure;
pub mod system;
pub mod units;

pub use composite::Composite;
pub use dispersion::Dispersion;
pub use equation::{Coefficient, FieldEquation};
pub use error::{Error, Result};
pub use pin::{Pin, PinAllocator, PinId};
pub use structure::{Structure, check_pin_count};
pub use system::BatchedSystem;

/// Complex field amplitude.
pub type C64 = num_complex::Complex<f64>;
