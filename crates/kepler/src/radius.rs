//! Mass–radius relations for sub-stellar bodies
//!
//! Small bodies are treated as uncompressed spheres of their bulk material.
//! Above 0.01 Earth masses self-compression matters and one of two empirical
//! fits, quadratic in `log10(M / M⊕)`, is used depending on whether the body
//! is lighter than rock (water–rock) or denser (rock–metal).
//!
//! The coefficients are a regression, not a derivation; they are kept exact
//! so radii agree with previously generated systems.

use std::f64::consts::PI;

use units::{Density, Length, Mass};

use crate::constants::COMPRESSION_THRESHOLD_EARTH_MASSES;
use crate::material::{Composition, CompressionRegime};

/// Radius of a body from its total mass and (unnormalized) material fractions.
///
/// # Examples
///
/// ```
/// use kepler::radius::radius_from_mass_and_fractions;
/// use units::Mass;
///
/// let earth = radius_from_mass_and_fractions(Mass::from_earth_masses(1.0), 0.0003, 0.68, 0.32);
/// assert!((earth.to_earth_radii() - 1.0).abs() < 0.02);
/// ```
pub fn radius_from_mass_and_fractions(
    total: Mass,
    volatiles: f64,
    lithics: f64,
    metals: f64,
) -> Length {
    radius_from_composition(total, &Composition::new(volatiles, lithics, metals))
}

/// Radius of a body from the absolute masses of its three material classes
pub fn radius_from_partial_masses(volatiles: Mass, lithics: Mass, metals: Mass) -> Length {
    let total = volatiles + lithics + metals;
    radius_from_composition(total, &Composition::from_masses(volatiles, lithics, metals))
}

pub fn radius_from_composition(total: Mass, composition: &Composition) -> Length {
    let density = composition.uncompressed_density();

    if total.to_earth_masses() < COMPRESSION_THRESHOLD_EARTH_MASSES {
        return radius_uncompressed(total, density);
    }

    let rho = density.to_grams_per_cm3();
    match composition.regime() {
        CompressionRegime::WaterRock => radius_compressed_water_rock(total, 1.4 / rho - 0.4),
        CompressionRegime::RockMetal => radius_compressed_rock_metal(total, 6.369 / rho - 0.8140),
    }
}

/// Radius of a homogeneous sphere with no gravitational compression
pub fn radius_uncompressed(mass: Mass, density: Density) -> Length {
    let volume = mass.to_kg() / density.to_kg_per_m3();
    Length::from_meters((volume * 0.75 / PI).cbrt())
}

/// Water–rock fit; `volatile_fraction` is the effective ice fraction
pub fn radius_compressed_water_rock(mass: Mass, volatile_fraction: f64) -> Length {
    let lm = mass.to_earth_masses().log10();
    let f = volatile_fraction;
    Length::from_earth_radii(
        (0.0912 * f + 0.1603) * lm * lm + (0.3330 * f + 0.7387) * lm + 0.4639 * f + 1.1193,
    )
}

/// Rock–metal fit; `lithic_fraction` is the effective silicate fraction
pub fn radius_compressed_rock_metal(mass: Mass, lithic_fraction: f64) -> Length {
    let lm = mass.to_earth_masses().log10();
    let f = lithic_fraction;
    Length::from_earth_radii(
        (0.0592 * f + 0.0975) * lm * lm + (0.2337 * f + 0.4938) * lm + 0.3102 * f + 0.7932,
    )
}

/// Mean density of a sphere
pub fn bulk_density(mass: Mass, radius: Length) -> Density {
    let volume = 4.0 / 3.0 * PI * radius.to_meters().powi(3);
    Density::from_kg_per_m3(mass.to_kg() / volume)
}
