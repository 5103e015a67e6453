//! Keplerian orbits and their projection to Cartesian coordinates
//!
//! An [`Orbit`] is a validated set of [`OrbitalElements`] bound to the
//! gravitational parameter of its primary. It advances its own mean anomaly
//! for analytic propagation, and can be sampled statelessly at any epoch for
//! path drawing or for seeding free-flight state vectors.
//!
//! Positions are relative to the primary, in meters. The orbit is laid out
//! in its own plane with periapsis on +x and the primary at the focus, then
//! oriented by the classical 3-1-3 rotation Rz(Ω)·Rx(i)·Rz(ω). Planar
//! positions are the x/y components of that oriented vector.

use std::f64::consts::TAU;

use nalgebra::{Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use units::{Length, Mass, Time};

use crate::anomaly::{wrap_angle, AnomalySolver};
use crate::error::OrbitError;

/// Classical orbital elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalElements {
    pub semi_major_axis: Length,

    /// 0 ≤ e < 1
    pub eccentricity: f64,

    /// Radians
    pub inclination: f64,

    /// Longitude of the ascending node Ω (radians)
    pub longitude_ascending_node: f64,

    /// Argument of periapsis ω (radians)
    pub argument_of_periapsis: f64,

    /// Mean anomaly at epoch M₀ (radians)
    pub mean_anomaly: f64,
}

impl OrbitalElements {
    /// Circular, uninclined orbit starting at periapsis
    pub fn circular(semi_major_axis: Length) -> Self {
        Self {
            semi_major_axis,
            eccentricity: 0.0,
            inclination: 0.0,
            longitude_ascending_node: 0.0,
            argument_of_periapsis: 0.0,
            mean_anomaly: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), OrbitError> {
        let a = self.semi_major_axis.to_meters();
        if !(a > 0.0 && a.is_finite()) {
            return Err(OrbitError::InvalidSemiMajorAxis(a));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitError::UnboundEccentricity(self.eccentricity));
        }

        let angles = [
            ("inclination", self.inclination),
            ("longitude_ascending_node", self.longitude_ascending_node),
            ("argument_of_periapsis", self.argument_of_periapsis),
            ("mean_anomaly", self.mean_anomaly),
        ];
        for (name, value) in angles {
            if !value.is_finite() {
                return Err(OrbitError::NonFiniteAngle { name, value });
            }
        }

        Ok(())
    }
}

fn validate_mu(mu: f64) -> Result<(), OrbitError> {
    if mu > 0.0 && mu.is_finite() {
        Ok(())
    } else {
        Err(OrbitError::InvalidGravitationalParameter(mu))
    }
}

/// A closed orbit about a primary with gravitational parameter µ
///
/// # Examples
///
/// ```
/// use kepler::{Orbit, OrbitalElements};
/// use kepler::constants::G;
/// use units::{Length, Mass};
///
/// let earth = OrbitalElements::circular(Length::from_au(1.0));
/// let orbit = Orbit::new(earth, Mass::from_solar_masses(1.0), G).unwrap();
///
/// assert!((orbit.period().to_days() - 365.25).abs() < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    elements: OrbitalElements,
    mu: f64,
    solver: AnomalySolver,
    mean_anomaly: f64,
    eccentric_anomaly: f64,
}

impl Orbit {
    /// Orbit about a primary of `primary_mass` under gravitational constant `g`
    pub fn new(elements: OrbitalElements, primary_mass: Mass, g: f64) -> Result<Self, OrbitError> {
        Self::from_mu(elements, g * primary_mass.to_kg())
    }

    pub fn from_mu(elements: OrbitalElements, mu: f64) -> Result<Self, OrbitError> {
        elements.validate()?;
        validate_mu(mu)?;

        let solver = AnomalySolver::default();
        let mean_anomaly = wrap_angle(elements.mean_anomaly);
        Ok(Self {
            elements,
            mu,
            solver,
            mean_anomaly,
            eccentric_anomaly: solver.eccentric_anomaly(mean_anomaly, elements.eccentricity),
        })
    }

    pub fn with_solver(mut self, solver: AnomalySolver) -> Self {
        self.solver = solver;
        self.eccentric_anomaly = solver.eccentric_anomaly(self.mean_anomaly, self.eccentricity());
        self
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn solver(&self) -> AnomalySolver {
        self.solver
    }

    /// Gravitational parameter µ = G·M of the primary (m³/s²)
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Rebinds the orbit to a new primary mass, keeping its shape and phase.
    pub fn set_primary_mass(&mut self, primary_mass: Mass, g: f64) -> Result<(), OrbitError> {
        self.set_mu(g * primary_mass.to_kg())
    }

    pub fn set_mu(&mut self, mu: f64) -> Result<(), OrbitError> {
        validate_mu(mu)?;
        self.mu = mu;
        Ok(())
    }

    pub fn semi_major_axis(&self) -> Length {
        self.elements.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    /// b = a·√(1 − e²)
    pub fn semi_minor_axis(&self) -> Length {
        let e = self.eccentricity();
        self.semi_major_axis() * (1.0 - e * e).sqrt()
    }

    /// Distance from the center of the ellipse to the focus, c = √(a² − b²)
    pub fn linear_eccentricity(&self) -> Length {
        let a = self.semi_major_axis().to_meters();
        let b = self.semi_minor_axis().to_meters();
        Length::from_meters((a * a - b * b).max(0.0).sqrt())
    }

    pub fn periapsis(&self) -> Length {
        self.semi_major_axis() - self.linear_eccentricity()
    }

    pub fn apoapsis(&self) -> Length {
        self.semi_major_axis() + self.linear_eccentricity()
    }

    /// T = 2π·√(a³/µ)
    pub fn period(&self) -> Time {
        let a = self.semi_major_axis().to_meters();
        Time::from_seconds(TAU * (a.powi(3) / self.mu).sqrt())
    }

    /// n = 2π/T (rad/s)
    pub fn mean_motion(&self) -> f64 {
        let a = self.semi_major_axis().to_meters();
        (self.mu / a.powi(3)).sqrt()
    }

    /// Current mean anomaly in [0, 2π)
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// Projection angle from the configured solver; only approximates E
    /// under [`AnomalySolver::Series`]
    pub fn eccentric_anomaly(&self) -> f64 {
        self.eccentric_anomaly
    }

    /// Advances the orbit phase by `dt`.
    pub fn advance(&mut self, dt: Time) {
        let period = self.period().to_seconds();
        self.mean_anomaly = wrap_angle(self.mean_anomaly + TAU * dt.to_seconds() / period);
        self.eccentric_anomaly = self
            .solver
            .eccentric_anomaly(self.mean_anomaly, self.eccentricity());
    }

    /// Mean anomaly at `epoch` seconds after the element epoch, in [0, 2π)
    pub fn mean_anomaly_at(&self, epoch: Time) -> f64 {
        let period = self.period().to_seconds();
        let phase = epoch.to_seconds().rem_euclid(period) / period;
        wrap_angle(self.elements.mean_anomaly + TAU * phase)
    }

    /// Position in the orbital plane for eccentric anomaly `e_anomaly`
    pub fn in_plane_position(&self, e_anomaly: f64) -> Vector2<f64> {
        let a = self.semi_major_axis().to_meters();
        let b = self.semi_minor_axis().to_meters();
        let c = self.linear_eccentricity().to_meters();
        let (sin, cos) = e_anomaly.sin_cos();
        Vector2::new(cos * a - c, sin * b)
    }

    /// Rotation from the orbital plane to the reference frame
    pub fn orientation(&self) -> Rotation3<f64> {
        let el = &self.elements;
        Rotation3::from_axis_angle(&Vector3::z_axis(), el.longitude_ascending_node)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), el.inclination)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), el.argument_of_periapsis)
    }

    fn orient(&self, in_plane: Vector2<f64>) -> Vector3<f64> {
        self.orientation() * Vector3::new(in_plane.x, in_plane.y, 0.0)
    }

    pub fn spatial_position_for(&self, e_anomaly: f64) -> Vector3<f64> {
        self.orient(self.in_plane_position(e_anomaly))
    }

    /// Relative 3D position at the current phase
    pub fn current_spatial_position(&self) -> Vector3<f64> {
        self.spatial_position_for(self.eccentric_anomaly)
    }

    /// Relative planar position at the current phase
    pub fn current_position(&self) -> Vector2<f64> {
        self.current_spatial_position().xy()
    }

    pub fn spatial_position_at(&self, epoch: Time) -> Vector3<f64> {
        let mean_anomaly = self.mean_anomaly_at(epoch);
        let e_anomaly = self.solver.eccentric_anomaly(mean_anomaly, self.eccentricity());
        self.spatial_position_for(e_anomaly)
    }

    /// Relative planar position at `epoch`, independent of the orbit's own phase
    pub fn position_at(&self, epoch: Time) -> Vector2<f64> {
        self.spatial_position_at(epoch).xy()
    }

    /// Closed polyline of the orbit, relative to the primary.
    ///
    /// Samples are spaced evenly in eccentric anomaly; the first point is
    /// repeated at the end. Fewer than three samples are raised to three.
    pub fn path(&self, samples: usize) -> Vec<Vector3<f64>> {
        let samples = samples.max(3);
        let mut points: Vec<Vector3<f64>> = (0..samples)
            .map(|i| self.spatial_position_for(TAU * i as f64 / samples as f64))
            .collect();
        points.push(points[0]);
        points
    }

    /// Velocity in the orbital plane for eccentric anomaly `e_anomaly`
    pub fn in_plane_velocity(&self, e_anomaly: f64) -> Vector2<f64> {
        let a = self.semi_major_axis().to_meters();
        let b = self.semi_minor_axis().to_meters();
        let (sin, cos) = e_anomaly.sin_cos();

        // dE/dt from differentiating M = E − e·sin E
        let e_rate = self.mean_motion() / (1.0 - self.eccentricity() * cos);
        Vector2::new(-a * sin * e_rate, b * cos * e_rate)
    }

    pub fn spatial_velocity_for(&self, e_anomaly: f64) -> Vector3<f64> {
        self.orient(self.in_plane_velocity(e_anomaly))
    }

    /// Relative 3D velocity at the current phase
    pub fn current_spatial_velocity(&self) -> Vector3<f64> {
        self.spatial_velocity_for(self.eccentric_anomaly)
    }

    /// Relative position and velocity at `epoch`
    pub fn state_vector_at(&self, epoch: Time) -> (Vector3<f64>, Vector3<f64>) {
        let mean_anomaly = self.mean_anomaly_at(epoch);
        let e_anomaly = self.solver.eccentric_anomaly(mean_anomaly, self.eccentricity());
        (
            self.spatial_position_for(e_anomaly),
            self.spatial_velocity_for(e_anomaly),
        )
    }
}
