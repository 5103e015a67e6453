pub mod density;
pub mod length;
pub mod mass;
pub mod temperature;
pub mod time;


pub use density::Density;
pub use length::Length;
pub use mass::{Mass, EARTH_MASS_KG, JUPITER_MASS_KG, SOLAR_MASS_KG};
pub use temperature::Temperature;
pub use time::{Time, SECONDS_PER_YEAR};
