use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use kepler::{Composition, StarProperties};
use nalgebra::{Point2, Vector2};
use units::{Length, Mass};

use crate::body::{Body, BodyClass, BodyId, BodyKind, ShipState, SHIP_RADIUS_M};

#[test]
fn test_new_body_is_detached_root() {
    let body = Body::new(
        "Rock",
        BodyKind::Ship(ShipState::new(1.0, 1.0)),
        Mass::from_kg(5.0),
        1.0,
    );

    assert_eq!(body.id, BodyId(0));
    assert_eq!(body.primary(), None);
    assert!(body.satellites().is_empty());
    assert_eq!(body.sphere_of_influence(), f64::INFINITY);
    assert_eq!(body.position, Point2::origin());
    assert!(body.orbit.is_none());
}

#[test]
fn test_star_radius_from_properties() {
    let sun = Body::star("Sun", Mass::from_solar_masses(1.0), StarProperties::sun_like());

    assert_eq!(sun.class(), BodyClass::Star);
    assert_relative_eq!(sun.radius, Length::from_solar_radii(1.0).to_meters(), max_relative = 1e-12);
    assert_relative_eq!(sun.density().to_grams_per_cm3(), 1.41, epsilon = 0.01);
}

#[test]
fn test_planet_radius_from_composition() {
    let earth = Body::planet(
        "Earth",
        Mass::from_earth_masses(1.0),
        Composition::earth_like(),
    );

    assert_eq!(earth.class(), BodyClass::Planet);
    assert_relative_eq!(
        Length::from_meters(earth.radius).to_earth_radii(),
        1.0,
        epsilon = 0.02
    );
}

#[test]
fn test_ship_accessors() {
    let mut ship = Body::ship("Ship", Mass::from_kg(0.0001), ShipState::new(1e-9, 1e-6));

    assert!(ship.is_ship());
    assert_eq!(ship.radius, SHIP_RADIUS_M);

    ship.ship_state_mut().unwrap().rotation = 1.0;
    assert_eq!(ship.ship_state().unwrap().rotation, 1.0);

    let planet = Body::planet("P", Mass::from_earth_masses(1.0), Composition::earth_like());
    assert!(planet.ship_state().is_none());
}

#[test]
fn test_ship_heading() {
    let mut state = ShipState::new(1.0, 1.0);
    assert_relative_eq!(state.heading(), Vector2::new(0.0, 1.0), epsilon = 1e-12);

    state.rotation = FRAC_PI_2;
    assert_relative_eq!(state.heading(), Vector2::new(-1.0, 0.0), epsilon = 1e-12);
}

#[test]
fn test_momentum_and_energy() {
    let mut body = Body::new(
        "Probe",
        BodyKind::Ship(ShipState::new(0.0, 0.0)),
        Mass::from_kg(2.0),
        1.0,
    );
    body.velocity = Vector2::new(3.0, 4.0);

    assert_eq!(body.momentum(), Vector2::new(6.0, 8.0));
    assert_eq!(body.kinetic_energy(), 25.0);
    assert_eq!(body.speed(), 5.0);
}

#[test]
fn test_distance_to() {
    let mut a = Body::new("A", BodyKind::Ship(ShipState::new(0.0, 0.0)), Mass::from_kg(1.0), 1.0);
    let mut b = a.clone();
    a.position = Point2::new(0.0, 0.0);
    b.position = Point2::new(3.0, 4.0);

    assert_eq!(a.distance_to(&b), 5.0);
}
