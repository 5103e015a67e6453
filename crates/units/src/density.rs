use serde::{Deserialize, Serialize};

/// Volume density, stored in g/cm³.
///
/// Planetary material constants (water 1.0, rock 3.5, iron 7.8) are quoted in
/// g/cm³, so that is the base unit; [`Density::to_kg_per_m3`] converts for
/// SI volume calculations.
///
/// # Examples
///
/// ```rust
/// use units::Density;
///
/// let water = Density::from_grams_per_cm3(1.0);
/// assert_eq!(water.to_kg_per_m3(), 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(f64); // Base unit: g/cm³

impl Density {
    pub const fn from_grams_per_cm3(value: f64) -> Self {
        Self(value)
    }

    pub fn from_kg_per_m3(value: f64) -> Self {
        Self(value / 1000.0)
    }

    pub fn to_grams_per_cm3(&self) -> f64 {
        self.0
    }

    pub fn to_kg_per_m3(&self) -> f64 {
        self.0 * 1000.0
    }
}
