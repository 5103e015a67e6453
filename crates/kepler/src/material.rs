//! Planetary building materials and bulk composition
//!
//! Three classes of material are tracked, each with an uncompressed density:
//! volatiles (water ices, 1.0 g/cm³), lithics (silicate rock, 3.5 g/cm³) and
//! metals (iron/nickel, 7.8 g/cm³).

use serde::{Deserialize, Serialize};
use units::{Density, Mass};

/// Broad class a material belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialClass {
    Volatile,
    Lithic,
    Metallic,
}

/// A named substance with a fixed uncompressed density
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    pub name: &'static str,
    pub class: MaterialClass,
    pub density: Density,
}

pub const WATER: Material = Material {
    name: "Water",
    class: MaterialClass::Volatile,
    density: Density::from_grams_per_cm3(1.0),
};

pub const LITHIC: Material = Material {
    name: "Lithic",
    class: MaterialClass::Lithic,
    density: Density::from_grams_per_cm3(3.5),
};

pub const METALLIC: Material = Material {
    name: "Metallic",
    class: MaterialClass::Metallic,
    density: Density::from_grams_per_cm3(7.8),
};

impl Material {
    /// A discrete quantity of this material
    ///
    /// # Examples
    ///
    /// ```
    /// use kepler::material::WATER;
    /// use units::Mass;
    ///
    /// let ocean = WATER.with_mass(Mass::from_kg(1.4e21));
    /// assert_eq!(ocean.material.name, "Water");
    /// ```
    pub fn with_mass(&self, mass: Mass) -> QuantifiedMaterial {
        QuantifiedMaterial {
            material: *self,
            mass,
        }
    }
}

/// A material together with the mass it contributes to a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantifiedMaterial {
    pub material: Material,
    pub mass: Mass,
}

/// Which empirical mass–radius fit applies to a composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompressionRegime {
    /// Uncompressed density below that of rock: ice/rock bodies
    WaterRock,
    /// Rock/iron bodies
    RockMetal,
}

/// Bulk composition as mass fractions
///
/// Fractions always sum to 1.0 after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Water and other volatile ices
    pub volatiles: f64,
    /// Silicon and other lithophile material
    pub lithics: f64,
    /// Iron and other metallic material
    pub metals: f64,
}

impl Composition {
    /// Create a new composition, normalizing fractions to sum to 1.0
    ///
    /// A non-positive total falls back to [`Composition::earth_like`].
    pub fn new(volatiles: f64, lithics: f64, metals: f64) -> Self {
        let total = volatiles + lithics + metals;
        if !(total > 0.0) {
            return Self::earth_like();
        }
        Self {
            volatiles: volatiles / total,
            lithics: lithics / total,
            metals: metals / total,
        }
    }

    /// Earth-like composition (rocky, iron core, trace water)
    pub fn earth_like() -> Self {
        Self::new(0.0003, 0.68, 0.32)
    }

    /// Composition from absolute masses of the three material classes
    pub fn from_masses(volatiles: Mass, lithics: Mass, metals: Mass) -> Self {
        Self::new(volatiles.to_kg(), lithics.to_kg(), metals.to_kg())
    }

    /// Composition and total mass from a list of quantified materials
    pub fn from_quantities(quantities: &[QuantifiedMaterial]) -> (Self, Mass) {
        let mass_of = |class: MaterialClass| {
            quantities
                .iter()
                .filter(|q| q.material.class == class)
                .map(|q| q.mass.to_kg())
                .sum::<f64>()
        };

        let volatiles = mass_of(MaterialClass::Volatile);
        let lithics = mass_of(MaterialClass::Lithic);
        let metals = mass_of(MaterialClass::Metallic);

        (
            Self::new(volatiles, lithics, metals),
            Mass::from_kg(volatiles + lithics + metals),
        )
    }

    /// Weighted harmonic mean of the material densities
    pub fn uncompressed_density(&self) -> Density {
        let specific_volume = self.volatiles / WATER.density.to_grams_per_cm3()
            + self.lithics / LITHIC.density.to_grams_per_cm3()
            + self.metals / METALLIC.density.to_grams_per_cm3();
        Density::from_grams_per_cm3(1.0 / specific_volume)
    }

    pub fn regime(&self) -> CompressionRegime {
        if self.uncompressed_density() < LITHIC.density {
            CompressionRegime::WaterRock
        } else {
            CompressionRegime::RockMetal
        }
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::earth_like()
    }
}
