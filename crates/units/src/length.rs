use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6.371e6;
/// Solar radius in meters
pub const SOLAR_RADIUS_M: f64 = 6.957e8;
/// Mean Earth-Moon distance in meters
pub const LUNAR_DISTANCE_M: f64 = 3.844e8;
/// Astronomical unit in meters
pub const AU_M: f64 = 1.496e11;
pub const LIGHT_YEAR_M: f64 = 9.4607e15;
pub const PARSEC_M: f64 = 3.0857e16;

const GIGAMETER_M: f64 = 1e9;

/// A physical length quantity using f64 precision.
///
/// Meters are the base unit so that lengths feed directly into SI orbital
/// mechanics (µ in m³/s²). Astronomical conveniences are provided as
/// constructors and converters.
///
/// # Examples
///
/// ```rust
/// use units::Length;
///
/// let orbit = Length::from_au(1.0);
/// let radius = Length::from_earth_radii(1.0);
///
/// // One AU is a little over 23,000 Earth radii
/// assert!(orbit / radius > 23_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // Base unit: meters

impl Length {
    /// Creates a zero length value
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_meters(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Length` from a significand and a power-of-ten exponent
    /// in meters, the layout used by body-definition files.
    pub fn from_scientific(significand: f64, exponent: i32) -> Self {
        Self(significand * 10f64.powi(exponent))
    }

    pub fn from_km(value: f64) -> Self {
        Self(value * 1000.0)
    }

    pub fn from_gigameters(value: f64) -> Self {
        Self(value * GIGAMETER_M)
    }

    pub fn from_earth_radii(value: f64) -> Self {
        Self(value * EARTH_RADIUS_M)
    }

    pub fn from_solar_radii(value: f64) -> Self {
        Self(value * SOLAR_RADIUS_M)
    }

    pub fn from_lunar_distances(value: f64) -> Self {
        Self(value * LUNAR_DISTANCE_M)
    }

    /// Creates a new `Length` from a value in astronomical units.
    pub fn from_au(value: f64) -> Self {
        Self(value * AU_M)
    }

    pub fn from_light_years(value: f64) -> Self {
        Self(value * LIGHT_YEAR_M)
    }

    pub fn from_parsecs(value: f64) -> Self {
        Self(value * PARSEC_M)
    }

    pub fn to_meters(&self) -> f64 {
        self.0
    }

    pub fn to_km(&self) -> f64 {
        self.0 / 1000.0
    }

    pub fn to_gigameters(&self) -> f64 {
        self.0 / GIGAMETER_M
    }

    /// Converts the length to Earth radii.
    pub fn to_earth_radii(&self) -> f64 {
        self.0 / EARTH_RADIUS_M
    }

    /// Converts the length to solar radii.
    pub fn to_solar_radii(&self) -> f64 {
        self.0 / SOLAR_RADIUS_M
    }

    pub fn to_lunar_distances(&self) -> f64 {
        self.0 / LUNAR_DISTANCE_M
    }

    /// Returns the length in astronomical units.
    pub fn to_au(&self) -> f64 {
        self.0 / AU_M
    }

    pub fn to_light_years(&self) -> f64 {
        self.0 / LIGHT_YEAR_M
    }

    pub fn to_parsecs(&self) -> f64 {
        self.0 / PARSEC_M
    }

    /// Raise to integer power
    pub fn powi(&self, n: i32) -> f64 {
        self.0.powi(n)
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;

    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

/// Division of Length by Length returns a dimensionless ratio
impl Div for Length {
    type Output = f64;

    fn div(self, rhs: Length) -> f64 {
        self.0 / rhs.0
    }
}

impl Mul<Length> for f64 {
    type Output = Length;

    fn mul(self, rhs: Length) -> Length {
        rhs * self
    }
}
