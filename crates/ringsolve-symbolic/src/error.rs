//! Error types for ringsolve-symbolic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Solver(#[from] ringsolve_solver::Error),

    #[error("equation {index} is not linear in the pin amplitudes: {equation}")]
    Nonlinear { index: usize, equation: String },

    #[error("pin A_{pin} out of range for a {num_pins}-pin topology")]
    PinOutOfRange { pin: usize, num_pins: usize },

    #[error("parameter {0} is not declared by the topology")]
    UndeclaredParameter(String),

    #[error("{pins} pins but {equations} equations")]
    EquationCount { pins: usize, equations: usize },

    #[error("symbolic system is singular")]
    Singular,

    #[error("polynomial of degree {degree} exceeds the root-finding limit of {max}")]
    DegreeTooHigh { degree: usize, max: usize },

    #[error("{num_pins} pins exceeds the symbolic solver limit of {max}")]
    TooManyPins { num_pins: usize, max: usize },

    #[error("numeric parameters do not match the topology (missing: {missing:?}, unexpected: {unexpected:?})")]
    ParameterMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("numeric parameters must be set first")]
    ParametersNotSet,

    #[error("solution cache lock poisoned")]
    CachePoisoned,

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
