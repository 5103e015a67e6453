//! Vector helpers on top of nalgebra
//!
//! nalgebra already provides the pure arithmetic (add, subtract, scale,
//! divide, dot, magnitude, normalize). These extension traits add the planar
//! operations the orbit code relies on and the finiteness guards used by the
//! integrator.

use nalgebra::{Vector2, Vector3};

/// Operations that only make sense for 2D vectors.
///
/// # Examples
///
/// ```
/// use kepler::vector::PlanarVector;
/// use nalgebra::Vector2;
///
/// let east = Vector2::new(1.0, 0.0);
/// let north = east.rotated_by(std::f64::consts::FRAC_PI_2);
///
/// assert!((north.y - 1.0).abs() < 1e-12);
/// assert!((east.cross_scalar(&north) - 1.0).abs() < 1e-12);
/// ```
pub trait PlanarVector {
    /// Rotates counter-clockwise about the origin, preserving magnitude.
    fn rotated_by(&self, radians: f64) -> Self;

    /// Polar angle from atan2, in (−π, π].
    fn polar_angle(&self) -> f64;

    /// z component of the 3D cross product of the two planar vectors.
    fn cross_scalar(&self, other: &Self) -> f64;

    /// Unit vector at `radians` from the +x axis.
    fn from_polar(radians: f64) -> Self;
}

impl PlanarVector for Vector2<f64> {
    fn rotated_by(&self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Vector2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    fn polar_angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    fn cross_scalar(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn from_polar(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Vector2::new(cos, sin)
    }
}

/// Guards shared by 2D and 3D vectors.
pub trait VectorExt: Sized {
    /// Normalized copy, or the zero vector when the magnitude is zero or the
    /// result would not be finite.
    fn unit_or_zero(&self) -> Self;

    /// True when every component is finite.
    fn is_all_finite(&self) -> bool;
}

impl VectorExt for Vector2<f64> {
    fn unit_or_zero(&self) -> Self {
        self.try_normalize(0.0)
            .filter(|unit| unit.is_all_finite())
            .unwrap_or_else(Vector2::zeros)
    }

    fn is_all_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl VectorExt for Vector3<f64> {
    fn unit_or_zero(&self) -> Self {
        self.try_normalize(0.0)
            .filter(|unit| unit.is_all_finite())
            .unwrap_or_else(Vector3::zeros)
    }

    fn is_all_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
