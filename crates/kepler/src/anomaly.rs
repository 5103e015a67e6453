//! Anomaly conversions for Keplerian orbits
//!
//! Mean anomaly grows linearly with time; positions need the eccentric
//! anomaly E satisfying Kepler's equation `M = E − e·sin E`. Two ways of
//! getting there are provided:
//!
//! - Newton iteration seeded with `E₀ = M` ([`approximate_eccentric_anomaly`]
//!   and the tolerance-aware [`KeplerSolver`])
//! - a two-term series ([`series_anomaly`]), cheap enough for drawing orbit
//!   outlines every frame
//!
//! The series is the small-eccentricity expansion of the *true* anomaly, not
//! of E. The drawing path feeds it straight into the ellipse projection, so
//! it stands in for E there and the outline is only approximate.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Iteration cap used by the Newton solvers.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Tolerance used by [`KeplerSolver::new`].
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// One Newton step towards the root of `E − e·sin E − M`.
pub fn newton_step(mean_anomaly: f64, eccentricity: f64, prior: f64) -> f64 {
    prior
        - (prior - eccentricity * prior.sin() - mean_anomaly)
            / (1.0 - eccentricity * prior.cos())
}

/// Approximates the eccentric anomaly with Newton's method.
///
/// Seeds the iteration with the mean anomaly and stops early only when two
/// successive iterates are bit-identical; otherwise the whole iteration
/// budget is spent. For a tolerance-based stop use [`KeplerSolver`].
///
/// # Examples
///
/// ```
/// use kepler::anomaly::approximate_eccentric_anomaly;
///
/// let m = 1.0;
/// let e = 0.3;
/// let ecc = approximate_eccentric_anomaly(m, e, 20);
/// assert!((ecc - e * ecc.sin() - m).abs() < 1e-12);
/// ```
pub fn approximate_eccentric_anomaly(
    mean_anomaly: f64,
    eccentricity: f64,
    max_iterations: usize,
) -> f64 {
    let mut last = mean_anomaly;
    for _ in 0..max_iterations {
        let next = newton_step(mean_anomaly, eccentricity, last);
        if next == last {
            break;
        }
        last = next;
    }
    last
}

/// Two-term true-anomaly series `M + 2e·sin M + 1.25e²·sin 2M`.
///
/// Accurate only for small eccentricities. [`AnomalySolver::Series`] uses it
/// as the drawing angle in place of the eccentric anomaly.
pub fn series_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    mean_anomaly
        + 2.0 * eccentricity * mean_anomaly.sin()
        + 1.25 * eccentricity.powi(2) * (2.0 * mean_anomaly).sin()
}

/// True anomaly for an eccentric anomaly, wrapped into `[0, 2π)`.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    let nu = 2.0
        * ((1.0 + eccentricity).sqrt() * half.sin())
            .atan2((1.0 - eccentricity).sqrt() * half.cos());
    wrap_angle(nu)
}

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Outcome of a [`KeplerSolver`] run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    pub eccentric_anomaly: f64,
    /// Newton steps actually taken
    pub iterations: usize,
    /// Whether the tolerance was met before the iteration cap
    pub converged: bool,
}

/// Newton solver for Kepler's equation with an explicit stopping tolerance.
///
/// # Examples
///
/// ```
/// use kepler::anomaly::KeplerSolver;
///
/// let solver = KeplerSolver::new();
/// let solution = solver.solve_detailed(2.5, 0.6);
///
/// assert!(solution.converged);
/// assert!(solution.iterations <= 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeplerSolver {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl KeplerSolver {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::new()
        }
    }

    /// Eccentric anomaly for the given mean anomaly and eccentricity
    pub fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> f64 {
        self.solve_detailed(mean_anomaly, eccentricity)
            .eccentric_anomaly
    }

    pub fn solve_detailed(&self, mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
        let mut last = mean_anomaly;
        for iteration in 1..=self.max_iterations {
            let next = newton_step(mean_anomaly, eccentricity, last);
            if next == last || (next - last).abs() <= self.tolerance {
                return KeplerSolution {
                    eccentric_anomaly: next,
                    iterations: iteration,
                    converged: true,
                };
            }
            last = next;
        }

        KeplerSolution {
            eccentric_anomaly: last,
            iterations: self.max_iterations,
            converged: false,
        }
    }
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Strategy for turning a mean anomaly into the angle fed to the orbit
/// projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnomalySolver {
    /// Full Newton solve of Kepler's equation
    Newton(KeplerSolver),
    /// Two-term true-anomaly series, see [`series_anomaly`]
    Series,
}

impl AnomalySolver {
    /// Angle used by the ellipse projection.
    ///
    /// This is the eccentric anomaly for `Newton`. For `Series` it is the
    /// true-anomaly expansion, which only approximates E.
    pub fn eccentric_anomaly(&self, mean_anomaly: f64, eccentricity: f64) -> f64 {
        match self {
            AnomalySolver::Newton(solver) => solver.solve(mean_anomaly, eccentricity),
            AnomalySolver::Series => series_anomaly(mean_anomaly, eccentricity),
        }
    }
}

impl Default for AnomalySolver {
    fn default() -> Self {
        AnomalySolver::Newton(KeplerSolver::new())
    }
}
