use kepler::OrbitError;
use thiserror::Error;

use crate::body::BodyId;

/// Failures surfaced by the simulation engine.
///
/// Numerical degeneracies during a tick are not errors; they are recovered
/// in place and logged. Everything here is a setup, input or API misuse
/// failure that leaves no partially-built system behind.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error(transparent)]
    Orbit(#[from] OrbitError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no body with id {0:?}")]
    UnknownBody(BodyId),

    #[error("{body:?} cannot orbit {primary:?}: the primary graph would contain a cycle")]
    CyclicPrimary { body: BodyId, primary: BodyId },

    #[error("{0:?} is not a ship")]
    NotAShip(BodyId),

    #[error("time step must be finite, got {0} s")]
    InvalidTimeStep(f64),

    #[error("{0:?} has no orbit")]
    NoOrbit(BodyId),

    #[error("body file is empty")]
    EmptyDefinition,

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: planet '{name}' must have a primary")]
    MissingPrimary { line: usize, name: String },

    #[error("line {line}: expected {expected} columns, found {found}")]
    TooFewColumns {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: unknown body type '{kind}'")]
    UnknownBodyType { line: usize, kind: String },

    #[error("line {line}: '{name}' declares {expected} satellites but the file ends first")]
    TruncatedSubtree {
        line: usize,
        name: String,
        expected: usize,
    },

    #[error("line {line}: invalid epoch '{value}'")]
    InvalidEpoch { line: usize, value: String },
}

pub type Result<T> = std::result::Result<T, OrreryError>;
