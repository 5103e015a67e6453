use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Mass of the Earth in kilograms (5.972 × 10²⁴ kg)
pub const EARTH_MASS_KG: f64 = 5.972e24;

/// Mass of Jupiter in kilograms (1.898 × 10²⁷ kg)
pub const JUPITER_MASS_KG: f64 = 1.898e27;

/// Mass of the Sun in kilograms (1.98855 × 10³⁰ kg)
pub const SOLAR_MASS_KG: f64 = 1.98855e30;

/// A physical mass quantity using f64 precision.
///
/// The `Mass` struct stores kilograms, which keeps it interchangeable with the
/// SI gravitational constant used by the orbital solver. Body-definition files
/// give masses as `significand × 10^exponent` kilograms, so the
/// [`Mass::from_scientific`] constructor is the usual entry point.
///
/// # Examples
///
/// ```rust
/// use units::Mass;
///
/// let earth = Mass::from_earth_masses(1.0);
/// let sun = Mass::from_scientific(1.98855, 30);
///
/// let ratio = sun / earth; // ~333,000
/// assert!(ratio > 300_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: kilograms

impl Mass {
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in kilograms.
    pub fn from_kg(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Mass` from a significand and a power-of-ten exponent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use units::Mass;
    ///
    /// let mars = Mass::from_scientific(6.39, 23);
    /// assert!((mars.to_kg() - 6.39e23).abs() < 1e10);
    /// ```
    pub fn from_scientific(significand: f64, exponent: i32) -> Self {
        Self(significand * 10f64.powi(exponent))
    }

    /// Creates a new `Mass` from a value in Earth masses.
    pub fn from_earth_masses(value: f64) -> Self {
        Self(value * EARTH_MASS_KG)
    }

    /// Creates a new `Mass` from a value in Jupiter masses.
    pub fn from_jupiter_masses(value: f64) -> Self {
        Self(value * JUPITER_MASS_KG)
    }

    /// Creates a new `Mass` from a value in solar masses.
    pub fn from_solar_masses(value: f64) -> Self {
        Self(value * SOLAR_MASS_KG)
    }

    pub fn to_kg(&self) -> f64 {
        self.0
    }

    /// Converts the mass to Earth masses.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use units::Mass;
    ///
    /// let jupiter = Mass::from_jupiter_masses(1.0);
    /// assert!((jupiter.to_earth_masses() - 317.8).abs() < 0.1);
    /// ```
    pub fn to_earth_masses(&self) -> f64 {
        self.0 / EARTH_MASS_KG
    }

    pub fn to_jupiter_masses(&self) -> f64 {
        self.0 / JUPITER_MASS_KG
    }

    pub fn to_solar_masses(&self) -> f64 {
        self.0 / SOLAR_MASS_KG
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}

impl Div<f64> for Mass {
    type Output = Mass;

    fn div(self, rhs: f64) -> Mass {
        Mass(self.0 / rhs)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Mass) -> f64 {
        self.0 / rhs.0
    }
}

impl Mul<Mass> for f64 {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        rhs * self
    }
}
