//! Analytic (Keplerian) propagation
//!
//! Bodies with an orbit move along their conic; their absolute state is the
//! primary's absolute state plus the orbit's relative state, composed from
//! the roots down. Roots, and bodies without an orbit, keep whatever planar
//! position they have.

use kepler::Orbit;
use nalgebra::{Point3, Vector2, Vector3};
use units::Time;

use crate::system::SystemState;

/// Advances every orbit by `dt` and recomputes absolute positions.
///
/// # Examples
///
/// ```
/// use kepler::{constants::G, AnomalySolver, Composition, OrbitalElements, StarProperties};
/// use orrery::analytic;
/// use orrery::body::Body;
/// use orrery::system::SystemState;
/// use units::{Length, Mass, Time};
///
/// let mut system = SystemState::new(G);
/// let sun = system.add_body(Body::star("Sun", Mass::from_solar_masses(1.0), StarProperties::sun_like()));
/// let earth = system
///     .add_orbiting_body(
///         Body::planet("Earth", Mass::from_earth_masses(1.0), Composition::earth_like()),
///         sun,
///         OrbitalElements::circular(Length::from_au(1.0)),
///         AnomalySolver::default(),
///     )
///     .unwrap();
///
/// analytic::advance(&mut system, Time::from_days(1.0));
///
/// assert_eq!(system.time, 86_400.0);
/// assert!(system.get_body(earth).unwrap().position.y > 0.0);
/// ```
pub fn advance(state: &mut SystemState, dt: Time) {
    for orbit in state.bodies.iter_mut().filter_map(|b| b.orbit.as_mut()) {
        orbit.advance(dt);
    }
    state.time += dt.to_seconds();
    place(state);
}

/// Recomputes absolute positions and velocities from the current orbit phases
pub fn place(state: &mut SystemState) {
    for id in state.hierarchy_order() {
        let Some(index) = state.index_of(id) else {
            continue;
        };

        let anchor = state.bodies[index]
            .primary()
            .and_then(|p| state.get_body(p))
            .map(|p| (p.spatial_position, p.velocity));

        let body = &mut state.bodies[index];
        match (anchor, body.orbit.as_ref()) {
            (Some((origin, drift)), Some(orbit)) => {
                let (position, velocity) = relative_state(orbit);
                body.spatial_position = origin + position;
                body.position = body.spatial_position.xy();
                body.velocity = drift + velocity;
            }
            _ => {
                body.spatial_position = Point3::new(body.position.x, body.position.y, 0.0);
            }
        }
    }
}

fn relative_state(orbit: &Orbit) -> (Vector3<f64>, Vector2<f64>) {
    (
        orbit.current_spatial_position(),
        orbit.current_spatial_velocity().xy(),
    )
}
