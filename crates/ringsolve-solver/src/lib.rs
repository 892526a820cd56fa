//! Frequency-domain solver for ringsolve circuits.
//!
//! This crate provides:
//! - Frequency grids ([`SweepParams`])
//! - Dense complex LU solves ([`solve_complex`])
//! - The batched per-sample field solve, parallel across samples
//!   ([`solve_system`], [`SolveFields`])
//! - Field observables keyed by pin ([`FieldSolution`])
//! - Resonance measurements: peak search and FWHM ([`measure`])

pub mod error;
pub mod fields;
pub mod linear;
pub mod measure;
pub mod solve;
pub mod sweep;

pub use error::{Error, Result};
pub use fields::{FailureKind, FieldSolution, SampleFailure};
pub use linear::solve_complex;
pub use measure::{Resonance, fwhm, local_maxima, nearest_peak, resonance_near};
pub use solve::{SolveConfig, SolveFields, solve_structure, solve_system};
pub use sweep::{SweepParams, generate_frequencies};
