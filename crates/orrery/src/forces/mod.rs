//! Gravitational interaction models for free flight
//!
//! An [`InteractionModel`] turns the current system state into per-body
//! velocity kicks for one tick, plus the list of body pairs that were close
//! enough to be considered for primary reassignment. Models differ in which
//! pairs they evaluate exactly: [`DirectInteraction`] evaluates all of them,
//! [`TensorGridInteraction`] only nearby ones and approximates the rest by
//! cell aggregates.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::body::BodyId;
use crate::system::SystemState;

pub mod direct;
pub mod tensor_grid;

#[cfg(test)]
mod direct_test;

pub use direct::DirectInteraction;
pub use tensor_grid::{Candidate, TensorCell, TensorGrid, TensorGridInteraction};

/// An ordered pair of real bodies that interacted this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encounter {
    /// Body that felt the pull
    pub body: BodyId,
    /// Body that pulled it
    pub other: BodyId,
}

/// Result of one interaction pass
#[derive(Debug, Clone, Default)]
pub struct Interactions {
    /// Velocity change per body, indexed like `SystemState::bodies`
    pub kicks: Vec<Vector2<f64>>,
    /// Real-body pairs, in evaluation order
    pub encounters: Vec<Encounter>,
}

impl Interactions {
    pub fn new(body_count: usize) -> Self {
        Self {
            kicks: vec![Vector2::zeros(); body_count],
            encounters: Vec::new(),
        }
    }
}

/// A strategy for computing gravitational kicks
///
/// # Examples
///
/// ```
/// use kepler::{constants::G, Composition};
/// use nalgebra::Point2;
/// use orrery::body::Body;
/// use orrery::forces::{DirectInteraction, InteractionModel};
/// use orrery::system::SystemState;
/// use units::Mass;
///
/// let mut system = SystemState::new(G);
/// let mut a = Body::planet("A", Mass::from_earth_masses(1.0), Composition::earth_like());
/// let mut b = a.clone();
/// a.position = Point2::new(-1.0e7, 0.0);
/// b.position = Point2::new(1.0e7, 0.0);
/// system.add_body(a);
/// system.add_body(b);
///
/// let mut model = DirectInteraction::new();
/// assert!(model.prepare(&system).is_empty());
///
/// let result = model.interactions(&system, 1.0);
/// assert!(result.kicks[0].x > 0.0);
/// assert!(result.kicks[1].x < 0.0);
/// ```
pub trait InteractionModel: Send + Sync {
    /// Rebuilds any spatial index for the current positions.
    ///
    /// Returns the bodies that fall outside the model's domain; the caller
    /// is expected to remove them and call `prepare` again.
    fn prepare(&mut self, _state: &SystemState) -> Vec<BodyId> {
        Vec::new()
    }

    /// Velocity kicks accumulated over `dt` seconds
    fn interactions(&self, state: &SystemState, dt: f64) -> Interactions;
}

/// Which interaction model a simulation uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionKind {
    Direct,
    #[default]
    TensorGrid,
}

/// Velocity change on a body at `target` from a mass at `source` over `dt`.
///
/// `Δv = −G·dt·m/|r|² · r̂` with `r = target − source`. Coincident points
/// exert nothing and yield `None`.
pub fn gravity_kick(
    g: f64,
    dt: f64,
    target: &Point2<f64>,
    source: &Point2<f64>,
    source_mass: f64,
) -> Option<Vector2<f64>> {
    let separation = target - source;
    let distance_squared = separation.magnitude_squared();
    if distance_squared == 0.0 {
        return None;
    }

    let direction = separation / distance_squared.sqrt();
    Some(-direction * (g * dt * source_mass / distance_squared))
}
