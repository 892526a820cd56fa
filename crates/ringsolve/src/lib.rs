//! # ringsolve
//!
//! Frequency-domain and symbolic analysis of ring-resonator photonic circuits.
//!
//! ringsolve provides:
//! - Pins, field equations and composable optical structures
//! - A device catalog: waveguides, directional couplers, rings, add-drop
//!   filters and resonant interferometric couplers
//! - Batched per-frequency field solves, parallel across samples
//! - Symbolic z-domain transfer functions, pole/zero analysis and the
//!   extraction efficiency of the main resonance
//!
//! ## Numeric fields
//!
//! ```rust
//! use ringsolve::prelude::*;
//!
//! let mut pins = PinAllocator::new();
//! let omegas: Vec<f64> = (0..16).map(|i| 1.2e15 + 1e12 * i as f64).collect();
//! let ric = ResonantInterferometricCoupler::new(
//!     &mut pins,
//!     RicParams::default(),
//!     Dispersion::default(),
//! )
//! .unwrap()
//! .with_angular_frequencies(omegas);
//!
//! let fields = ric.fields().unwrap();
//! let drop = fields.transmission(ric.drop_port()).unwrap();
//! assert_eq!(drop.len(), 16);
//! ```
//!
//! ## Symbolic responses
//!
//! ```rust
//! use ringsolve::prelude::*;
//!
//! let ring = SymbolicCircuit::new(Ring)?.with_numeric_parameters(NumericParameters::from([
//!     ("l".to_string(), 5.0),
//!     ("cross_coupling_1".to_string(), 0.5),
//!     ("self_coupling_1".to_string(), 0.75f64.sqrt()),
//!     ("unitary_loss_coefficient".to_string(), 0.999),
//! ]))?;
//! let (omega, magnitude) = ring.magnitude_response_data(2)?;
//! assert_eq!(omega.len(), magnitude.len());
//! # Ok::<(), ringsolve::SymbolicError>(())
//! ```

// Re-export the member crates
pub use ringsolve_core as core;
pub use ringsolve_devices as devices;
pub use ringsolve_solver as solver;
pub use ringsolve_symbolic as symbolic;

// ============================================================================
// Convenient re-exports from ringsolve_core
// ============================================================================

pub use ringsolve_core::{
    BatchedSystem, C64, Coefficient, Composite, Dispersion,
    // Errors
    Error as CoreError,
    FieldEquation, PinAllocator, PinId, Structure,
};

// ============================================================================
// Convenient re-exports from ringsolve_devices
// ============================================================================

pub use ringsolve_devices::{
    AddDropFilter, AddDropParams, DirectionalCoupler,
    // Errors
    Error as DeviceError,
    Excitation, ResonantInterferometricCoupler, RicParams, RingParams, RingResonator, Source,
    Waveguide,
};

// ============================================================================
// Convenient re-exports from ringsolve_solver
// ============================================================================

pub use ringsolve_solver::{
    // Errors
    Error as SolverError,
    FieldSolution, Resonance, SolveConfig, SolveFields, SweepParams, generate_frequencies,
    resonance_near, solve_structure, solve_system,
};

// ============================================================================
// Convenient re-exports from ringsolve_symbolic
// ============================================================================

pub use ringsolve_symbolic::{
    EfficiencyConfig,
    // Errors
    Error as SymbolicError,
    NumericParameters, PoleZero, SolutionCache, SymbolicCircuit, Topology, TransferFunction,
};

/// Re-export of nalgebra's dynamic vector type.
pub use nalgebra::DVector;

/// Re-export of num_complex's Complex type.
pub use num_complex::Complex;

/// Prelude module containing commonly used types and traits.
///
/// ```rust
/// use ringsolve::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::{C64, Composite, Dispersion, PinAllocator, PinId, Structure};

    // Devices
    pub use crate::{
        AddDropFilter, AddDropParams, DirectionalCoupler, ResonantInterferometricCoupler,
        RicParams, RingParams, RingResonator, Source, Waveguide,
    };

    // Numeric solve
    pub use crate::{FieldSolution, SolveConfig, SolveFields, SweepParams, generate_frequencies};

    // Symbolic
    pub use crate::symbolic::Ring;
    pub use crate::{NumericParameters, SymbolicCircuit, Topology, TransferFunction};
}
