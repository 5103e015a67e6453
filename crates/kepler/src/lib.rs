//! Keplerian orbital mechanics and planetary astrophysics
//!
//! This crate holds the numerical core shared by every simulation mode:
//! planar vector helpers, the eccentric-anomaly solver, the planetary
//! mass–radius regression, stellar radiative properties, and the Keplerian
//! [`Orbit`] with its projection to Cartesian coordinates.

pub mod anomaly;
pub mod constants;
pub mod error;
pub mod material;
pub mod orbit;
pub mod radius;
pub mod stellar;
pub mod vector;

// Re-export key types at crate root
pub use anomaly::{AnomalySolver, KeplerSolver};
pub use error::OrbitError;
pub use material::{Composition, CompressionRegime, Material, QuantifiedMaterial};
pub use orbit::{Orbit, OrbitalElements};
pub use stellar::StarProperties;
pub use vector::{PlanarVector, VectorExt};

#[cfg(test)]
mod orbit_test;
