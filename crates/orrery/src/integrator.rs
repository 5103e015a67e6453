//! Time integration for free flight
//!
//! A free-flight tick is split in two halves around capture resolution:
//! velocities are kicked by the interaction model, primaries are updated,
//! then positions drift with the new velocities. Splitting the step lets
//! the capture rule see post-kick state while positions still belong to the
//! start of the tick.
//!
//! Neither half ever fails. A body whose velocity or position stops being
//! finite is reset (velocity to zero, position to the origin) and reported,
//! so one degenerate body cannot poison the rest of the system.

use log::warn;
use nalgebra::{Point2, Vector2};

use crate::body::BodyId;
use crate::system::SystemState;

/// A split kick/drift integrator
pub trait Integrator: Send + Sync {
    /// Adds `kicks[i]` to the velocity of `state.bodies[i]`.
    ///
    /// Returns the bodies whose velocity was reset.
    fn kick(&self, state: &mut SystemState, kicks: &[Vector2<f64>]) -> Vec<BodyId>;

    /// Moves every body along its velocity for `dt` seconds.
    ///
    /// Returns the bodies whose position was reset.
    fn drift(&self, state: &mut SystemState, dt: f64) -> Vec<BodyId>;
}

/// First-order symplectic Euler: `v += Δv`, then `x += v·dt`
///
/// # Examples
///
/// ```
/// use kepler::{constants::G, Composition};
/// use nalgebra::Vector2;
/// use orrery::body::Body;
/// use orrery::integrator::{Integrator, SymplecticEuler};
/// use orrery::system::SystemState;
/// use units::Mass;
///
/// let mut system = SystemState::new(G);
/// system.add_body(Body::planet("Rock", Mass::from_earth_masses(1.0), Composition::earth_like()));
///
/// let integrator = SymplecticEuler;
/// integrator.kick(&mut system, &[Vector2::new(2.0, 0.0)]);
/// integrator.drift(&mut system, 10.0);
///
/// assert_eq!(system.bodies[0].position.x, 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SymplecticEuler;

impl Integrator for SymplecticEuler {
    fn kick(&self, state: &mut SystemState, kicks: &[Vector2<f64>]) -> Vec<BodyId> {
        let mut reset = Vec::new();

        for (body, kick) in state.bodies.iter_mut().zip(kicks) {
            body.velocity += kick;
            if !(body.velocity.x.is_finite() && body.velocity.y.is_finite()) {
                warn!("{} ({:?}) had a non-finite velocity; zeroed", body.name, body.id);
                body.velocity = Vector2::zeros();
                reset.push(body.id);
            }
        }
        reset
    }

    fn drift(&self, state: &mut SystemState, dt: f64) -> Vec<BodyId> {
        let mut reset = Vec::new();

        for body in state.bodies.iter_mut() {
            body.position += body.velocity * dt;
            if !(body.position.x.is_finite() && body.position.y.is_finite()) {
                warn!("{} ({:?}) had a non-finite position; moved to the origin", body.name, body.id);
                body.position = Point2::origin();
                reset.push(body.id);
            }
        }
        reset
    }
}
