use approx::assert_relative_eq;
use kepler::constants::G;
use kepler::Composition;
use nalgebra::{Point2, Vector2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use units::Mass;

use crate::body::{Body, BodyId};
use crate::forces::{gravity_kick, DirectInteraction, Encounter, InteractionModel};
use crate::system::SystemState;

fn rock(kg: f64, x: f64, y: f64) -> Body {
    let mut body = Body::planet("Rock", Mass::from_kg(kg), Composition::earth_like());
    body.position = Point2::new(x, y);
    body
}

#[test]
fn test_gravity_kick_points_toward_source() {
    let kick = gravity_kick(G, 10.0, &Point2::new(2.0, 0.0), &Point2::origin(), 1.0e10).unwrap();

    assert!(kick.x < 0.0);
    assert_relative_eq!(kick.y, 0.0);
    assert_relative_eq!(kick.x, -G * 10.0 * 1.0e10 / 4.0, max_relative = 1e-12);
}

#[test]
fn test_gravity_kick_skips_coincident_points() {
    let p = Point2::new(1.0, 1.0);
    assert!(gravity_kick(G, 1.0, &p, &p, 1.0e30).is_none());
}

#[test]
fn test_two_body_kicks_are_equal_and_opposite_in_momentum() {
    let mut system = SystemState::new(G);
    system.add_body(rock(1.0e20, 0.0, 0.0));
    system.add_body(rock(3.0e20, 1.0e6, 0.0));

    let result = DirectInteraction::new().interactions(&system, 60.0);

    let p0 = result.kicks[0] * 1.0e20;
    let p1 = result.kicks[1] * 3.0e20;
    assert_relative_eq!(p0.x, -p1.x, max_relative = 1e-12);
    assert!(result.kicks[0].x > 0.0);

    let expected = G * 60.0 * 3.0e20 / 1.0e12;
    assert_relative_eq!(result.kicks[0].x, expected, max_relative = 1e-12);
}

#[test]
fn test_encounters_recorded_in_both_directions() {
    let mut system = SystemState::new(G);
    let a = system.add_body(rock(1.0e20, 0.0, 0.0));
    let b = system.add_body(rock(1.0e20, 1.0e6, 0.0));

    let result = DirectInteraction::new().interactions(&system, 1.0);

    assert_eq!(
        result.encounters,
        vec![
            Encounter { body: a, other: b },
            Encounter { body: b, other: a },
        ]
    );
}

#[test]
fn test_coincident_bodies_leave_velocity_unchanged() {
    let mut system = SystemState::new(G);
    system.add_body(rock(1.0e20, 5.0, 5.0));
    system.add_body(rock(1.0e22, 5.0, 5.0));

    let result = DirectInteraction::new().interactions(&system, 1.0e6);

    assert_eq!(result.kicks, vec![Vector2::zeros(), Vector2::zeros()]);
    assert!(result.encounters.is_empty());
}

#[test]
fn test_momentum_conserved_for_random_cloud() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut system = SystemState::new(G);
    for _ in 0..40 {
        system.add_body(rock(
            rng.random_range(1.0e18..1.0e22),
            rng.random_range(-1.0e9..1.0e9),
            rng.random_range(-1.0e9..1.0e9),
        ));
    }

    let result = DirectInteraction::new().interactions(&system, 3600.0);

    let (total, scale) = system
        .bodies
        .iter()
        .zip(&result.kicks)
        .fold((Vector2::zeros(), 0.0), |(sum, scale), (body, kick)| {
            let p = kick * body.mass;
            (sum + p, f64::max(scale, p.norm()))
        });

    assert!(total.norm() <= scale * 1e-10, "net momentum {total:?}");
    assert_eq!(result.encounters.len(), 40 * 39);
}

#[test]
fn test_no_kicks_without_partners() {
    let mut system = SystemState::new(G);
    let id = system.add_body(rock(1.0e20, 0.0, 0.0));

    let result = DirectInteraction::new().interactions(&system, 1.0);

    assert_eq!(id, BodyId(0));
    assert_eq!(result.kicks, vec![Vector2::zeros()]);
}
