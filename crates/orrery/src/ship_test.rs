use approx::assert_relative_eq;
use kepler::constants::G;
use kepler::Composition;
use nalgebra::{Point2, Vector2};
use units::Mass;

use crate::body::{Body, BodyId, ShipState};
use crate::error::OrreryError;
use crate::forces::Encounter;
use crate::ship::{thrust, turn, update_targets};
use crate::system::SystemState;

fn with_ship() -> (SystemState, BodyId) {
    let mut system = SystemState::new(G);
    let ship = system.add_body(Body::ship(
        "Heart of Gold",
        Mass::from_kg(1.0e-4),
        ShipState::new(1.0e-9, 1.0e-6),
    ));
    (system, ship)
}

fn rock_at(system: &mut SystemState, name: &str, x: f64) -> BodyId {
    let mut rock = Body::planet(name, Mass::from_earth_masses(1.0), Composition::earth_like());
    rock.position = Point2::new(x, 0.0);
    system.add_body(rock)
}

#[test]
fn test_thrust_along_default_heading() {
    let (mut system, ship) = with_ship();

    thrust(&mut system, ship, 1.0, 2.0).unwrap();

    // 1e-9 · 2 / 1e-4 = 2e-5 along +y
    let velocity = system.get_body(ship).unwrap().velocity;
    assert_relative_eq!(velocity.x, 0.0);
    assert_relative_eq!(velocity.y, 2.0e-5, max_relative = 1e-12);
}

#[test]
fn test_thrust_follows_rotation() {
    let (mut system, ship) = with_ship();
    system
        .get_body_mut(ship)
        .unwrap()
        .ship_state_mut()
        .unwrap()
        .rotation = std::f64::consts::FRAC_PI_2;

    thrust(&mut system, ship, 0.5, 1.0).unwrap();

    let velocity = system.get_body(ship).unwrap().velocity;
    assert_relative_eq!(velocity.x, -5.0e-6, max_relative = 1e-12);
    assert_relative_eq!(velocity.y, 0.0, epsilon = 1e-18);
}

#[test]
fn test_turn_scales_with_rcs_and_mass() {
    let (mut system, ship) = with_ship();

    turn(&mut system, ship, -1.0, 0.5).unwrap();

    // 0.5 · 1e-6 · −1 / 1e-4
    let rotation = system.get_body(ship).unwrap().ship_state().unwrap().rotation;
    assert_relative_eq!(rotation, -0.005, max_relative = 1e-12);
}

#[test]
fn test_commands_reject_non_ships() {
    let (mut system, _) = with_ship();
    let rock = rock_at(&mut system, "Rock", 0.0);

    assert!(matches!(
        thrust(&mut system, rock, 1.0, 1.0),
        Err(OrreryError::NotAShip(id)) if id == rock
    ));
    assert!(matches!(
        turn(&mut system, rock, 1.0, 1.0),
        Err(OrreryError::NotAShip(_))
    ));
    assert!(matches!(
        thrust(&mut system, BodyId(77), 1.0, 1.0),
        Err(OrreryError::UnknownBody(_))
    ));
    assert_eq!(system.get_body(rock).unwrap().velocity, Vector2::zeros());
}

#[test]
fn test_target_is_nearest_encounter() {
    let (mut system, ship) = with_ship();
    let far = rock_at(&mut system, "Far", 1.0e9);
    let near = rock_at(&mut system, "Near", -1.0e6);

    let encounters = [
        Encounter { body: ship, other: far },
        Encounter { body: far, other: ship },
        Encounter { body: ship, other: near },
    ];
    update_targets(&mut system, &encounters);

    assert_eq!(
        system.get_body(ship).unwrap().ship_state().unwrap().target,
        Some(near)
    );

    update_targets(&mut system, &[]);
    assert_eq!(system.get_body(ship).unwrap().ship_state().unwrap().target, None);
}
