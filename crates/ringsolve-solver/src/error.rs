//! Error types for ringsolve-solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] ringsolve_core::Error),

    #[error("singular matrix")]
    SingularMatrix,

    #[error("solution contains non-finite values")]
    NonFinite,

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("no local maximum found near {target}")]
    PeakNotFound { target: f64 },

    #[error("half maximum not reached on the {side} side of the peak at {position}")]
    HalfMaximumNotFound { side: &'static str, position: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
