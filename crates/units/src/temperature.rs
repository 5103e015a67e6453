use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Effective temperature of the Sun in Kelvin
pub const SOLAR_TEMPERATURE_K: f64 = 5778.0;

/// A physical temperature quantity using f64 precision.
///
/// Kelvin is the base unit; it is an absolute scale, which the radiative
/// balance formulas used for stellar irradiance require.
///
/// # Examples
///
/// ```rust
/// use units::Temperature;
///
/// let sun = Temperature::solar();
/// let freezing = Temperature::from_celsius(0.0);
///
/// assert_eq!(sun.to_kelvin(), 5778.0);
/// assert!((freezing.to_kelvin() - 273.15).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Temperature(f64); // Base unit: Kelvin

impl Temperature {
    pub fn from_kelvin(value: f64) -> Self {
        Self(value)
    }

    /// Converts Celsius to Kelvin: K = °C + 273.15
    pub fn from_celsius(value: f64) -> Self {
        Self(value + 273.15)
    }

    /// Effective photospheric temperature of the Sun
    pub fn solar() -> Self {
        Self(SOLAR_TEMPERATURE_K)
    }

    pub fn water_freezing() -> Self {
        Self(273.15)
    }

    pub fn water_boiling() -> Self {
        Self(373.15)
    }

    pub fn to_kelvin(&self) -> f64 {
        self.0
    }

    pub fn to_celsius(&self) -> f64 {
        self.0 - 273.15
    }

    /// Raise to integer power (radiative formulas use T⁴)
    pub fn powi(&self, n: i32) -> f64 {
        self.0.powi(n)
    }
}

impl Add for Temperature {
    type Output = Temperature;

    fn add(self, rhs: Temperature) -> Temperature {
        Temperature(self.0 + rhs.0)
    }
}

impl Sub for Temperature {
    type Output = Temperature;

    fn sub(self, rhs: Temperature) -> Temperature {
        Temperature(self.0 - rhs.0)
    }
}

impl Mul<f64> for Temperature {
    type Output = Temperature;

    fn mul(self, rhs: f64) -> Temperature {
        Temperature(self.0 * rhs)
    }
}
