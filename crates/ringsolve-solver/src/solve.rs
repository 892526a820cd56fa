//! Batched field solve across frequency samples.
//!
//! Every sample of a [`BatchedSystem`] is an independent dense complex
//! system. Samples are solved in parallel with rayon once the sweep is large
//! enough to amortize the thread-pool dispatch. A sample whose solve fails
//! does not abort the sweep: its field vector is filled with NaN, the failure
//! is recorded, and the remaining samples are still solved.

use nalgebra::DVector;
use rayon::prelude::*;
use ringsolve_core::{BatchedSystem, C64, Composite, Structure};

use crate::error::{Error, Result};
use crate::fields::{FailureKind, FieldSolution, SampleFailure};
use crate::linear::solve_complex;

/// Configuration for the batched solve.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    /// Minimum samples to use parallel execution (below this, sequential is faster).
    pub min_samples_for_parallel: usize,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            min_samples_for_parallel: 64,
        }
    }
}

impl SolveConfig {
    /// Set the parallel threshold.
    pub fn with_min_parallel(mut self, min: usize) -> Self {
        self.min_samples_for_parallel = min;
        self
    }
}

/// Solve every sample of an assembled system.
pub fn solve_system(system: &BatchedSystem, config: &SolveConfig) -> FieldSolution {
    let num_samples = system.num_samples();
    let use_parallel =
        num_samples >= config.min_samples_for_parallel && rayon::current_num_threads() > 1;

    let solve_one = |sample: usize| solve_complex(system.matrix(sample), system.ordinate());
    let results: Vec<Result<DVector<C64>>> = if use_parallel {
        log::info!(
            "solving {} samples of size {} on {} threads",
            num_samples,
            system.size(),
            rayon::current_num_threads()
        );
        (0..num_samples).into_par_iter().map(solve_one).collect()
    } else {
        log::debug!(
            "solving {} samples of size {} sequentially",
            num_samples,
            system.size()
        );
        (0..num_samples).map(solve_one).collect()
    };

    let omegas = system.angular_frequencies();
    let nan = C64::new(f64::NAN, f64::NAN);
    let mut samples = Vec::with_capacity(num_samples);
    let mut failures = Vec::new();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(x) => samples.push(x),
            Err(err) => {
                let kind = match err {
                    Error::NonFinite => FailureKind::NonFinite,
                    _ => FailureKind::Singular,
                };
                log::warn!(
                    "sample {} (ω = {:.6e} rad/s) failed to solve: {}",
                    index,
                    omegas[index],
                    err
                );
                samples.push(DVector::from_element(system.size(), nan));
                failures.push(SampleFailure {
                    index,
                    angular_frequency: omegas[index],
                    kind,
                });
            }
        }
    }

    if !failures.is_empty() {
        log::warn!("{} of {} samples failed", failures.len(), num_samples);
    }

    FieldSolution::new(
        omegas.to_vec(),
        system.pins().enumerate().map(|(i, p)| (p, i)).collect(),
        samples,
        failures,
    )
}

/// Assemble and solve a structure on a frequency grid.
pub fn solve_structure(
    structure: &dyn Structure,
    angular_frequencies: &[f64],
    config: &SolveConfig,
) -> Result<FieldSolution> {
    let system = BatchedSystem::assemble(structure, angular_frequencies)?;
    Ok(solve_system(&system, config))
}

/// Field solve for circuits that carry their own frequency grid.
pub trait SolveFields {
    /// Solve with an explicit configuration.
    fn fields_with(&self, config: &SolveConfig) -> Result<FieldSolution>;

    /// Solve with the default configuration.
    fn fields(&self) -> Result<FieldSolution> {
        self.fields_with(&SolveConfig::default())
    }
}

impl<T: AsRef<Composite>> SolveFields for T {
    fn fields_with(&self, config: &SolveConfig) -> Result<FieldSolution> {
        let system = self.as_ref().coefficient_matrix()?;
        Ok(solve_system(&system, config))
    }
}
