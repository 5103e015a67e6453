//! Radiative properties of main-sequence stars
//!
//! A star is described by its luminosity (in solar units) and effective
//! temperature. Radius follows from the Stefan–Boltzmann law scaled to the
//! Sun, and the equilibrium temperature of an orbiting body from the energy
//! balance of a rapidly rotating grey sphere.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use units::{Density, Length, Mass, Temperature};

use crate::constants::SOLAR_LUMINOSITY_W;
use crate::radius::bulk_density;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarProperties {
    /// Luminosity in solar units
    pub luminosity: f64,
    /// Effective photospheric temperature
    pub temperature: Temperature,
}

impl StarProperties {
    pub fn new(luminosity: f64, temperature: Temperature) -> Self {
        Self {
            luminosity,
            temperature,
        }
    }

    pub fn sun_like() -> Self {
        Self::new(1.0, Temperature::solar())
    }

    /// Photospheric radius: R = R☉ · √L · (T☉/T)²
    ///
    /// # Examples
    ///
    /// ```
    /// use kepler::StarProperties;
    ///
    /// let sun = StarProperties::sun_like();
    /// assert!((sun.radius().to_solar_radii() - 1.0).abs() < 1e-12);
    /// ```
    pub fn radius(&self) -> Length {
        let ratio = Temperature::solar().to_kelvin() / self.temperature.to_kelvin();
        Length::from_solar_radii(self.luminosity.sqrt() * ratio * ratio)
    }

    pub fn luminosity_watts(&self) -> f64 {
        self.luminosity * SOLAR_LUMINOSITY_W
    }

    /// Mean density for a star of the given mass
    pub fn density(&self, mass: Mass) -> Density {
        bulk_density(mass, self.radius())
    }

    /// Radiant flux at a distance, in W/m²
    pub fn irradiance_at(&self, distance: Length) -> f64 {
        self.luminosity_watts() / (4.0 * PI * distance.to_meters().powi(2))
    }

    /// Equilibrium temperature of a body at `distance` with Bond albedo `albedo`
    ///
    /// T_eq = T · √(R / 2d) · (1 − A)^¼
    pub fn equilibrium_temperature_at(&self, distance: Length, albedo: f64) -> Temperature {
        let dilution = (self.radius().to_meters() / (2.0 * distance.to_meters())).sqrt();
        Temperature::from_kelvin(
            self.temperature.to_kelvin() * dilution * (1.0 - albedo).powf(0.25),
        )
    }

    /// Inverse of [`StarProperties::equilibrium_temperature_at`]
    pub fn distance_for_temperature(&self, target: Temperature, albedo: f64) -> Length {
        let ratio = self.temperature.to_kelvin() / target.to_kelvin();
        Length::from_meters(self.radius().to_meters() * ratio * ratio * (1.0 - albedo).sqrt() / 2.0)
    }
}

impl Default for StarProperties {
    fn default() -> Self {
        Self::sun_like()
    }
}
