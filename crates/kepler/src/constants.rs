//! Physical constants in SI units

/// Newtonian gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.67428e-11;

/// Stefan–Boltzmann constant (W m⁻² K⁻⁴)
pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8;

/// Nominal solar luminosity (W)
pub const SOLAR_LUMINOSITY_W: f64 = 3.828e26;

/// Mass below which planetary material is treated as uncompressed (Earth masses)
pub const COMPRESSION_THRESHOLD_EARTH_MASSES: f64 = 0.01;
