use std::f64::consts::{FRAC_PI_2, PI, TAU};

use approx::assert_relative_eq;
use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use units::{Length, Mass, Time};

use crate::anomaly::{series_anomaly, true_anomaly, AnomalySolver, KeplerSolver};
use crate::constants::G;
use crate::error::OrbitError;
use crate::orbit::{Orbit, OrbitalElements};

fn elements(a: f64, e: f64) -> OrbitalElements {
    OrbitalElements {
        eccentricity: e,
        ..OrbitalElements::circular(Length::from_meters(a))
    }
}

#[test]
fn test_keplers_third_law_two_body_scenario() {
    let a: f64 = 23454.8;
    let orbit = Orbit::new(elements(a, 0.0), Mass::from_kg(333000.0), G).unwrap();

    let mu = G * 333000.0;
    let expected = TAU * (a.powi(3) / mu).sqrt();

    assert_relative_eq!(orbit.period().to_seconds(), expected, max_relative = 1e-12);
    assert_relative_eq!(orbit.mu(), mu, max_relative = 1e-12);
}

#[test]
fn test_derived_axes() {
    let orbit = Orbit::from_mu(elements(10.0, 0.6), 1.0).unwrap();

    assert_relative_eq!(orbit.semi_minor_axis().to_meters(), 8.0, epsilon = 1e-12);
    assert_relative_eq!(orbit.linear_eccentricity().to_meters(), 6.0, epsilon = 1e-9);
    assert_relative_eq!(orbit.periapsis().to_meters(), 4.0, epsilon = 1e-9);
    assert_relative_eq!(orbit.apoapsis().to_meters(), 16.0, epsilon = 1e-9);
}

#[test]
fn test_invalid_elements_are_rejected() {
    assert_eq!(
        Orbit::from_mu(elements(0.0, 0.1), 1.0),
        Err(OrbitError::InvalidSemiMajorAxis(0.0))
    );
    assert_eq!(
        Orbit::from_mu(elements(1.0, 1.0), 1.0),
        Err(OrbitError::UnboundEccentricity(1.0))
    );
    assert_eq!(
        Orbit::from_mu(elements(1.0, -0.1), 1.0),
        Err(OrbitError::UnboundEccentricity(-0.1))
    );
    assert_eq!(
        Orbit::from_mu(elements(1.0, 0.1), 0.0),
        Err(OrbitError::InvalidGravitationalParameter(0.0))
    );

    let tilted = OrbitalElements {
        inclination: f64::NAN,
        ..elements(1.0, 0.1)
    };
    assert!(matches!(
        Orbit::from_mu(tilted, 1.0),
        Err(OrbitError::NonFiniteAngle {
            name: "inclination",
            ..
        })
    ));
}

#[test]
fn test_position_at_is_periodic() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for _ in 0..200 {
        let el = OrbitalElements {
            semi_major_axis: Length::from_meters(rng.random_range(1.0e9..1.0e12)),
            eccentricity: rng.random_range(0.0..0.9),
            inclination: rng.random_range(0.0..PI),
            longitude_ascending_node: rng.random_range(0.0..TAU),
            argument_of_periapsis: rng.random_range(0.0..TAU),
            mean_anomaly: rng.random_range(0.0..TAU),
        };
        let orbit = Orbit::new(el, Mass::from_solar_masses(1.0), G).unwrap();
        let t = Time::from_seconds(rng.random_range(0.0..1.0e8));

        let now = orbit.position_at(t);
        let later = orbit.position_at(t + orbit.period());
        let scale = el.semi_major_axis.to_meters();

        assert_relative_eq!(now.x, later.x, epsilon = scale * 1e-8);
        assert_relative_eq!(now.y, later.y, epsilon = scale * 1e-8);
    }
}

#[test]
fn test_periapsis_on_x_axis_at_zero_anomaly() {
    let orbit = Orbit::from_mu(elements(10.0, 0.5), 1.0).unwrap();
    let position = orbit.current_position();

    assert_relative_eq!(position.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(position.y, 0.0, epsilon = 1e-9);
}

#[test]
fn test_advance_half_period_reaches_apoapsis() {
    let mut orbit = Orbit::from_mu(elements(10.0, 0.5), 1.0).unwrap();
    orbit.advance(orbit.period() * 0.5);

    assert_relative_eq!(orbit.mean_anomaly(), PI, epsilon = 1e-9);
    assert_relative_eq!(orbit.current_position().x, -15.0, epsilon = 1e-6);
    assert_relative_eq!(orbit.current_position().y, 0.0, epsilon = 1e-6);
}

#[test]
fn test_advance_full_period_wraps() {
    let mut orbit = Orbit::from_mu(elements(10.0, 0.3), 1.0).unwrap();
    let start = orbit.current_position();

    for _ in 0..10 {
        orbit.advance(orbit.period() * 0.1);
    }

    assert!(orbit.mean_anomaly() >= 0.0 && orbit.mean_anomaly() < TAU);
    assert_relative_eq!(orbit.current_position().x, start.x, epsilon = 1e-6);
    assert_relative_eq!(orbit.current_position().y, start.y, epsilon = 1e-6);
}

#[test]
fn test_advance_matches_position_at() {
    let el = OrbitalElements {
        mean_anomaly: 1.0,
        argument_of_periapsis: 0.4,
        ..elements(5.0e10, 0.2)
    };
    let mut orbit = Orbit::new(el, Mass::from_solar_masses(1.0), G).unwrap();
    let dt = Time::from_days(3.0);

    orbit.advance(dt);
    let stepped = orbit.current_position();
    let direct = orbit.position_at(dt);

    assert_relative_eq!(stepped.x, direct.x, max_relative = 1e-9);
    assert_relative_eq!(stepped.y, direct.y, max_relative = 1e-9);
}

#[test]
fn test_orientation_rotates_into_plane() {
    // Periapsis toward +y via ω, then tilted 90° about x: periapsis lands on +z
    let el = OrbitalElements {
        argument_of_periapsis: FRAC_PI_2,
        inclination: FRAC_PI_2,
        ..elements(10.0, 0.0)
    };
    let orbit = Orbit::from_mu(el, 1.0).unwrap();
    let spatial = orbit.current_spatial_position();

    assert_relative_eq!(spatial, Vector3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
    assert_relative_eq!(orbit.current_position().norm(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_path_is_closed_and_on_ellipse() {
    let orbit = Orbit::from_mu(elements(10.0, 0.5), 1.0).unwrap();
    let path = orbit.path(64);

    assert_eq!(path.len(), 65);
    assert_eq!(path.first(), path.last());

    for point in &path {
        let r = point.norm();
        assert!(r >= orbit.periapsis().to_meters() - 1e-9);
        assert!(r <= orbit.apoapsis().to_meters() + 1e-9);
    }

    assert_eq!(orbit.path(0).len(), 4);
}

#[test]
fn test_state_vector_circular_speed() {
    let a = Length::from_au(1.0);
    let orbit = Orbit::new(OrbitalElements::circular(a), Mass::from_solar_masses(1.0), G).unwrap();

    let (position, velocity) = orbit.state_vector_at(Time::from_days(40.0));
    let expected_speed = (orbit.mu() / a.to_meters()).sqrt();

    assert_relative_eq!(position.norm(), a.to_meters(), max_relative = 1e-9);
    assert_relative_eq!(velocity.norm(), expected_speed, max_relative = 1e-9);
    assert_relative_eq!(position.dot(&velocity), 0.0, epsilon = 1e-3 * a.to_meters());
}

#[test]
fn test_state_vector_velocity_matches_finite_difference() {
    let el = OrbitalElements {
        mean_anomaly: 0.7,
        inclination: 0.3,
        longitude_ascending_node: 1.1,
        argument_of_periapsis: 2.0,
        ..elements(1.0e9, 0.4)
    };
    let orbit = Orbit::new(el, Mass::from_earth_masses(1.0), G).unwrap();

    let t = Time::from_hours(5.0);
    let h = Time::from_seconds(1.0);
    let (_, velocity) = orbit.state_vector_at(t);
    let (before, _) = orbit.state_vector_at(t - h);
    let (after, _) = orbit.state_vector_at(t + h);
    let numeric = (after - before) / 2.0;

    assert_relative_eq!(velocity, numeric, epsilon = 1e-3);
}

#[test]
fn test_series_solver_is_used_when_configured() {
    let el = OrbitalElements {
        mean_anomaly: 1.0,
        ..elements(10.0, 0.05)
    };
    let newton = Orbit::from_mu(el, 1.0).unwrap();
    let series = newton.clone().with_solver(AnomalySolver::Series);

    assert_ne!(newton.eccentric_anomaly(), series.eccentric_anomaly());
    assert_relative_eq!(series.eccentric_anomaly(), series_anomaly(1.0, 0.05));
    // The series angle is the true anomaly, not E
    assert_relative_eq!(
        series.eccentric_anomaly(),
        true_anomaly(newton.eccentric_anomaly(), 0.05),
        epsilon = 1e-3
    );

    let strict = newton.clone().with_solver(AnomalySolver::Newton(KeplerSolver::with_tolerance(0.0)));
    assert_relative_eq!(strict.eccentric_anomaly(), newton.eccentric_anomaly(), epsilon = 1e-12);
}

#[test]
fn test_rebinding_primary_mass_changes_period() {
    let mut orbit = Orbit::new(elements(1.0e9, 0.1), Mass::from_earth_masses(1.0), G).unwrap();
    let before = orbit.period().to_seconds();

    orbit
        .set_primary_mass(Mass::from_earth_masses(4.0), G)
        .unwrap();

    assert_relative_eq!(orbit.period().to_seconds(), before / 2.0, max_relative = 1e-12);
    assert!(orbit.set_mu(-1.0).is_err());
}
