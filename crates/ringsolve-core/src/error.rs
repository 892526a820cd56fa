//! Error types for ringsolve-core.

use thiserror::Error;

use crate::pin::PinId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{structure} requires {expected} pins, got {actual}")]
    PinCountMismatch {
        structure: String,
        expected: usize,
        actual: usize,
    },

    #[error("pin {0} is not live")]
    PinNotLive(PinId),

    #[error("pin {0} is not part of the assembled structure")]
    UnknownPin(PinId),

    #[error("pin {0} is determined by more than one equation")]
    DuplicateEquation(PinId),

    #[error("underdetermined system: {equations} equations for {pins} pins")]
    Underdetermined { pins: usize, equations: usize },

    #[error("overdetermined system: {equations} equations for {pins} pins")]
    Overdetermined { pins: usize, equations: usize },

    #[error("coefficient has {actual} frequency samples, expected {expected}")]
    SampleMismatch { expected: usize, actual: usize },

    #[error("frequency sweep is empty")]
    EmptySweep,

    #[error("{0} has no angular frequencies to solve at")]
    MissingFrequencies(String),
}

pub type Result<T> = std::result::Result<T, Error>;
