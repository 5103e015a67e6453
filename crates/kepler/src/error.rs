use thiserror::Error;

/// Reasons a set of orbital elements cannot describe a closed Keplerian orbit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("semi-major axis must be positive and finite, got {0} m")]
    InvalidSemiMajorAxis(f64),

    #[error("eccentricity must be in [0, 1) for a closed orbit, got {0}")]
    UnboundEccentricity(f64),

    #[error("gravitational parameter must be positive and finite, got {0} m³/s²")]
    InvalidGravitationalParameter(f64),

    #[error("angle '{name}' must be finite, got {value}")]
    NonFiniteAngle { name: &'static str, value: f64 },
}
