//! Symbolic z-domain analysis of ring-resonator topologies.
//!
//! A [`Topology`] states one linear equation per pin in the pin amplitudes,
//! coupling parameters and the delay `(γ·z⁻¹)^L` of each waveguide, with
//! integer lengths kept symbolic. The system is solved once by exact
//! polynomial arithmetic ([`solve`]), cached per topology definition
//! ([`SolutionCache`]), and turned into a numeric [`TransferFunction`] by
//! substitution whenever parameters change.
//!
//! ```ignore
//! let mut ring = SymbolicCircuit::new(Ring)?;
//! ring.set_numeric_parameters(params)?;
//! let (omega, magnitude) = ring.magnitude_response_data(2)?;
//! let pz = ring.pole_zero(2)?;
//! ```

pub mod cache;
pub mod circuit;
pub mod efficiency;
pub mod error;
pub mod expr;
pub mod linear;
pub mod params;
pub mod poly;
pub mod roots;
pub mod solve;
pub mod topology;
pub mod transfer;

pub use cache::SolutionCache;
pub use circuit::{SymbolicCircuit, DEFAULT_RESPONSE_SAMPLES};
pub use efficiency::{extraction_efficiency, intrinsic_fwhm, measured_fwhm, EfficiencyConfig};
pub use error::{Error, Result};
pub use expr::{Equation, Expr};
pub use linear::{LinearForm, LinearSystem};
pub use params::{NumericParameters, ParameterKind, ParameterSymbol};
pub use poly::{Atom, Poly};
pub use solve::{solve, SymbolicSolution};
pub use topology::{
    by_name, catalog, InterferometricCoupler, PhotonicMolecule, ResonantInterferometricCoupler,
    Ring, Topology, TwoHeadedRic,
};
pub use transfer::{
    linspace, PoleZero, TransferFunction, DEFAULT_CANCELLATION_TOLERANCE, MAX_POLE_ZERO_DEGREE,
};
