use approx::assert_relative_eq;
use kepler::constants::G;
use kepler::{AnomalySolver, Composition, OrbitalElements, StarProperties};
use nalgebra::{Point2, Vector2};
use units::{Length, Mass};

use crate::analytic;
use crate::body::{Body, BodyClass, BodyId};
use crate::config::SimulationConfig;
use crate::error::OrreryError;
use crate::forces::InteractionKind;
use crate::simulation::{Simulation, SimulationMode};
use crate::system::SystemState;

const EARTH_MOON: &str = "\
Earth and Moon
2
2000 1 1
---
Star Sun 1 0 0 0 0 0 0 0 1.989 30
Planet Earth 1 0 0 0 1.496 11 0.0 0 5.972 24
Planet Moon 0 0 0 0 3.844 8 0.0 0 7.342 22
";

fn free_flight_config() -> SimulationConfig {
    let mut config = SimulationConfig {
        mode: SimulationMode::FreeFlight,
        ..SimulationConfig::default()
    };
    config.interaction.kind = InteractionKind::Direct;
    config
}

/// Sun with Earth on a circular orbit, positions placed analytically
fn sun_and_earth() -> (SystemState, BodyId, BodyId) {
    let mut system = SystemState::new(G);
    let sun = system.add_body(Body::star(
        "Sun",
        Mass::from_solar_masses(1.0),
        StarProperties::sun_like(),
    ));
    let earth = system
        .add_orbiting_body(
            Body::planet("Earth", Mass::from_earth_masses(1.0), Composition::earth_like()),
            sun,
            OrbitalElements::circular(Length::from_au(1.0)),
            AnomalySolver::default(),
        )
        .unwrap();
    analytic::place(&mut system);
    (system, sun, earth)
}

#[test]
fn test_analytic_advance_scales_wall_time() {
    let config = SimulationConfig {
        speed: 86_400.0,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::load(EARTH_MOON, config).unwrap();
    let earth = simulation.state().find_by_name("Earth").unwrap();
    let before = simulation.state().get_body(earth).unwrap().position;

    let report = simulation.advance(1.0).unwrap();

    assert_eq!(report.dt, 86_400.0);
    assert_eq!(simulation.time(), 86_400.0);
    let after = simulation.state().get_body(earth).unwrap().position;
    // One day is ~1/365 of the way round: ~2.58e9 m of arc
    assert_relative_eq!((after - before).magnitude(), 2.575e9, max_relative = 0.01);
}

#[test]
fn test_current_date_tracks_epoch() {
    let config = SimulationConfig {
        speed: 3_600.0,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::load(EARTH_MOON, config).unwrap();
    simulation.advance(24.0).unwrap();

    let date = simulation.current_date().unwrap();
    assert_eq!(date.to_rfc3339(), "2000-01-02T00:00:00+00:00");
}

#[test]
fn test_non_finite_step_is_rejected() {
    let mut simulation = Simulation::load(EARTH_MOON, SimulationConfig::default()).unwrap();

    assert!(matches!(
        simulation.advance(f64::NAN),
        Err(OrreryError::InvalidTimeStep(_))
    ));
    assert!(matches!(
        simulation.advance(f64::INFINITY),
        Err(OrreryError::InvalidTimeStep(_))
    ));
    assert_eq!(simulation.time(), 0.0);
}

#[test]
fn test_invalid_config_fails_creation() {
    let mut config = SimulationConfig::default();
    config.interaction.grid_size = -1.0;

    assert!(matches!(
        Simulation::new(config, SystemState::new(G)),
        Err(OrreryError::InvalidConfig(_))
    ));
}

#[test]
fn test_free_flight_keeps_earth_in_orbit() {
    let (system, sun, earth) = sun_and_earth();
    let config = SimulationConfig {
        speed: 3_600.0,
        ..free_flight_config()
    };
    let mut simulation = Simulation::new(config, system).unwrap();

    // Ten days in one-hour steps
    for _ in 0..240 {
        let report = simulation.advance(1.0).unwrap();
        assert!(report.evicted.is_empty());
        assert!(report.reset.is_empty());
    }

    let state = simulation.state();
    let distance = state.get_body(earth).unwrap().distance_to(state.get_body(sun).unwrap());
    assert_relative_eq!(distance, Length::from_au(1.0).to_meters(), max_relative = 2e-3);
    assert_eq!(state.get_body(earth).unwrap().primary(), Some(sun));
}

#[test]
fn test_free_flight_conserves_momentum_with_direct_interaction() {
    let (system, _, _) = sun_and_earth();
    let config = SimulationConfig {
        speed: 3_600.0,
        ..free_flight_config()
    };
    let mut simulation = Simulation::new(config, system).unwrap();
    let earth_momentum = Mass::from_earth_masses(1.0).to_kg() * 29_780.0;
    let before = simulation.state().total_momentum();

    for _ in 0..100 {
        simulation.advance(1.0).unwrap();
    }

    let after = simulation.state().total_momentum();
    assert!((after - before).magnitude() < earth_momentum * 1e-9);
}

#[test]
fn test_ship_is_captured_by_nearby_planet() {
    let (system, sun, earth) = sun_and_earth();
    let mut simulation = Simulation::new(free_flight_config(), system).unwrap();

    let earth_position = simulation.state().get_body(earth).unwrap().position;
    let ship = simulation.add_ship(
        "Probe",
        earth_position + Vector2::new(1.0e7, 0.0),
        Vector2::zeros(),
    );

    let report = simulation.advance(1.0).unwrap();

    let probe = simulation.state().get_body(ship).unwrap();
    assert_eq!(probe.primary(), Some(earth));
    assert_eq!(probe.ship_state().unwrap().target, Some(earth));
    assert!(report.captures.iter().any(|c| c.body == ship && c.to == earth));
    // The planet itself keeps the Sun
    assert_eq!(simulation.state().get_body(earth).unwrap().primary(), Some(sun));
}

#[test]
fn test_bodies_outside_grid_are_evicted() {
    let (mut system, sun, _) = sun_and_earth();
    let mut stray = Body::planet("Stray", Mass::from_earth_masses(1.0), Composition::earth_like());
    stray.position = Point2::new(1.0e14, 0.0);
    let stray = system.add_body(stray);
    system.change_primary(stray, sun).unwrap();

    let mut config = SimulationConfig {
        mode: SimulationMode::FreeFlight,
        ..SimulationConfig::default()
    };
    config.interaction.grid_size = 1.0e13;
    let mut simulation = Simulation::new(config, system).unwrap();

    let report = simulation.advance(1.0).unwrap();

    assert_eq!(report.evicted, vec![stray]);
    assert_eq!(simulation.state().body_count(), 2);
    assert!(!simulation
        .state()
        .get_body(sun)
        .unwrap()
        .satellites()
        .contains(&stray));
}

#[test]
fn test_ship_commands() {
    let mut simulation =
        Simulation::new(free_flight_config(), SystemState::new(G)).unwrap();
    let ship = simulation.add_ship("Probe", Point2::origin(), Vector2::zeros());

    simulation.turn(ship, 1.0, 1.0).unwrap();
    simulation.thrust(ship, 1.0, 1.0).unwrap();

    let body = simulation.state().get_body(ship).unwrap();
    let rotation = body.ship_state().unwrap().rotation;
    // rcs 1e-6 / mass 1e-4
    assert_relative_eq!(rotation, 0.01, max_relative = 1e-12);
    assert_relative_eq!(body.velocity.magnitude(), 1.0e-5, max_relative = 1e-12);
    assert_relative_eq!(body.velocity.x, -1.0e-5 * rotation.sin(), max_relative = 1e-12);

    assert!(matches!(
        simulation.thrust(ship, 1.0, f64::NAN),
        Err(OrreryError::InvalidTimeStep(_))
    ));
}

#[test]
fn test_zoom_clamps_scale() {
    let mut simulation = Simulation::new(SimulationConfig::default(), SystemState::new(G)).unwrap();

    assert_relative_eq!(simulation.zoom(100.0), 0.9);
    assert_eq!(simulation.zoom(1.0e6), 0.005);
    assert_eq!(simulation.zoom(-1.0e9), 1000.0);
    assert_eq!(simulation.zoom(f64::NAN), 1000.0);
}

#[test]
fn test_snapshots() {
    let simulation = Simulation::load(EARTH_MOON, SimulationConfig::default()).unwrap();
    let snapshots = simulation.snapshots();

    assert_eq!(snapshots.len(), 3);
    let sun = &snapshots[0];
    assert_eq!(sun.kind, BodyClass::Star);
    assert_eq!(sun.sphere_of_influence, None);
    assert_eq!(sun.primary, None);

    let earth = &snapshots[1];
    assert_eq!(earth.name, "Earth");
    assert_eq!(earth.primary, Some(sun.id));
    assert!(earth.sphere_of_influence.unwrap() > 0.0);
    assert_relative_eq!(earth.position[0], 1.496e11, max_relative = 1e-12);
    assert_eq!(earth.rotation, None);
}

#[test]
fn test_orbit_path_is_anchored_at_primary() {
    let simulation = Simulation::load(EARTH_MOON, SimulationConfig::default()).unwrap();
    let state = simulation.state();
    let earth = state.find_by_name("Earth").unwrap();
    let moon = state.find_by_name("Moon").unwrap();
    let sun = state.find_by_name("Sun").unwrap();

    let path = simulation.orbit_path(moon).unwrap();
    let center = state.get_body(earth).unwrap().spatial_position;

    assert_eq!(path.len(), 129);
    assert_eq!(path.first(), path.last());
    for point in &path {
        assert_relative_eq!((point - center).magnitude(), 3.844e8, max_relative = 1e-9);
    }

    assert!(matches!(
        simulation.orbit_path(sun),
        Err(OrreryError::NoOrbit(_))
    ));
}

#[test]
fn test_dispose_returns_state() {
    let mut simulation = Simulation::load(EARTH_MOON, SimulationConfig::default()).unwrap();
    simulation.advance(5.0).unwrap();

    let state = simulation.dispose();
    assert_eq!(state.time, 5.0);
    assert_eq!(state.body_count(), 3);
}
