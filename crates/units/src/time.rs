use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

pub(crate) const SECONDS_PER_MINUTE: f64 = 60.0;
pub(crate) const SECONDS_PER_HOUR: f64 = 3_600.0;
pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0; // 365.25 days per year

/// A physical time quantity using f64 precision.
///
/// Seconds are the base unit, matching the SI gravitational parameter so an
/// orbital period computed as `2π√(a³/µ)` comes out directly as a `Time`.
///
/// # Examples
///
/// ```rust
/// use units::Time;
///
/// let period = Time::from_days(365.25);
/// assert!((period.to_years() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(f64); // Base unit: seconds

impl Time {
    /// Creates a zero time value
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_seconds(value: f64) -> Self {
        Self(value)
    }

    pub fn from_millis(value: f64) -> Self {
        Self(value / 1000.0)
    }

    pub fn from_minutes(value: f64) -> Self {
        Self(value * SECONDS_PER_MINUTE)
    }

    pub fn from_hours(value: f64) -> Self {
        Self(value * SECONDS_PER_HOUR)
    }

    /// Creates a new `Time` from a value in days.
    pub fn from_days(value: f64) -> Self {
        Self(value * SECONDS_PER_DAY)
    }

    /// Creates a new `Time` from a value in Julian years.
    pub fn from_years(value: f64) -> Self {
        Self(value * SECONDS_PER_YEAR)
    }

    pub fn to_seconds(&self) -> f64 {
        self.0
    }

    pub fn to_millis(&self) -> f64 {
        self.0 * 1000.0
    }

    pub fn to_hours(&self) -> f64 {
        self.0 / SECONDS_PER_HOUR
    }

    pub fn to_days(&self) -> f64 {
        self.0 / SECONDS_PER_DAY
    }

    pub fn to_years(&self) -> f64 {
        self.0 / SECONDS_PER_YEAR
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Mul<f64> for Time {
    type Output = Time;

    fn mul(self, rhs: f64) -> Time {
        Time(self.0 * rhs)
    }
}

impl Div<f64> for Time {
    type Output = Time;

    fn div(self, rhs: f64) -> Time {
        Time(self.0 / rhs)
    }
}

/// Division of Time by Time returns a dimensionless ratio
impl Div for Time {
    type Output = f64;

    fn div(self, rhs: Time) -> f64 {
        self.0 / rhs.0
    }
}
