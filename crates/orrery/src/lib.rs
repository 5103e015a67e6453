//! Star-system simulation engine
//!
//! Bodies live in a [`SystemState`](system::SystemState) arena and form a
//! primary/satellite forest. A [`Simulation`](simulation::Simulation) moves
//! them either analytically along their Keplerian orbits or in free flight,
//! where an [`InteractionModel`](forces::InteractionModel) supplies gravity
//! kicks and the capture rule reassigns primaries as bodies cross spheres
//! of influence.

pub mod analytic;
pub mod body;
pub mod capture;
pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod loader;
pub mod ship;
pub mod simulation;
pub mod system;

pub use body::{Body, BodyClass, BodyId, BodyKind};
pub use config::SimulationConfig;
pub use error::{OrreryError, Result};
pub use simulation::{BodySnapshot, Simulation, SimulationMode, TickReport};
pub use system::SystemState;

#[cfg(test)]
mod body_test;
#[cfg(test)]
mod capture_test;
#[cfg(test)]
mod ship_test;
#[cfg(test)]
mod simulation_test;
