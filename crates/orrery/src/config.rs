//! Simulation configuration
//!
//! Every section carries `#[serde(default)]`, so a TOML document only needs
//! the keys it wants to change:
//!
//! ```toml
//! mode = "freeFlight"
//! speed = 3600.0
//!
//! [interaction]
//! kind = "direct"
//! ```

use kepler::anomaly::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use kepler::constants::G;
use kepler::{AnomalySolver, KeplerSolver};
use serde::{Deserialize, Serialize};

use crate::capture::CapturePolicy;
use crate::error::{OrreryError, Result};
use crate::forces::tensor_grid::DEFAULT_NEAR_RADIUS;
use crate::forces::{DirectInteraction, InteractionKind, InteractionModel, TensorGridInteraction};
use crate::simulation::SimulationMode;

/// How mean anomalies are turned into eccentric anomalies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnomalyMethod {
    #[default]
    Newton,
    Series,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub kind: InteractionKind,
    /// Side length of the grid domain (m)
    pub grid_size: f64,
    /// Cells per axis
    pub grid_count: usize,
    /// Neighbourhood half-width in cells
    pub near_radius: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            kind: InteractionKind::default(),
            grid_size: 1.0e13,
            grid_count: 32,
            near_radius: DEFAULT_NEAR_RADIUS,
        }
    }
}

/// Zoom behaviour of the renderer's view scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub zoom_sensitivity: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_scale: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_sensitivity: 0.001,
            min_scale: 0.005,
            max_scale: 1000.0,
            initial_scale: 1.0,
        }
    }
}

/// Defaults for ships added at runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// kg
    pub mass: f64,
    pub engine_power: f64,
    pub rcs_power: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            mass: 1.0e-4,
            engine_power: 1.0e-9,
            rcs_power: 1.0e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub mode: SimulationMode,
    /// m³ kg⁻¹ s⁻²
    pub gravitational_constant: f64,
    /// Simulated seconds per wall-clock second
    pub speed: f64,
    pub anomaly: AnomalyMethod,
    pub solver_max_iterations: usize,
    pub solver_tolerance: f64,
    pub interaction: InteractionConfig,
    pub capture: CapturePolicy,
    pub view: ViewConfig,
    pub ship: ShipConfig,
    /// Points per orbit polyline
    pub path_samples: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::default(),
            gravitational_constant: G,
            speed: 1.0,
            anomaly: AnomalyMethod::default(),
            solver_max_iterations: DEFAULT_MAX_ITERATIONS,
            solver_tolerance: DEFAULT_TOLERANCE,
            interaction: InteractionConfig::default(),
            capture: CapturePolicy::default(),
            view: ViewConfig::default(),
            ship: ShipConfig::default(),
            path_samples: 128,
        }
    }
}

fn invalid(message: String) -> OrreryError {
    OrreryError::InvalidConfig(message)
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive and finite, got {value}")))
    }
}

impl SimulationConfig {
    /// Parses and validates a (possibly partial) TOML document
    ///
    /// # Examples
    ///
    /// ```
    /// use orrery::config::SimulationConfig;
    /// use orrery::simulation::SimulationMode;
    ///
    /// let config = SimulationConfig::from_toml_str("mode = \"freeFlight\"").unwrap();
    ///
    /// assert_eq!(config.mode, SimulationMode::FreeFlight);
    /// assert_eq!(config.speed, 1.0);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("gravitational_constant", self.gravitational_constant)?;
        if !self.speed.is_finite() {
            return Err(invalid(format!("speed must be finite, got {}", self.speed)));
        }
        if self.solver_max_iterations == 0 {
            return Err(invalid("solver_max_iterations must be at least 1".to_string()));
        }
        if !(self.solver_tolerance >= 0.0 && self.solver_tolerance.is_finite()) {
            return Err(invalid(format!(
                "solver_tolerance must be non-negative, got {}",
                self.solver_tolerance
            )));
        }

        require_positive("interaction.grid_size", self.interaction.grid_size)?;
        if self.interaction.grid_count == 0 {
            return Err(invalid("interaction.grid_count must be at least 1".to_string()));
        }

        let view = &self.view;
        require_positive("view.min_scale", view.min_scale)?;
        require_positive("view.max_scale", view.max_scale)?;
        if view.min_scale > view.max_scale {
            return Err(invalid(format!(
                "view.min_scale ({}) exceeds view.max_scale ({})",
                view.min_scale, view.max_scale
            )));
        }
        if !view.zoom_sensitivity.is_finite() {
            return Err(invalid("view.zoom_sensitivity must be finite".to_string()));
        }
        require_positive("view.initial_scale", view.initial_scale)?;

        require_positive("ship.mass", self.ship.mass)?;
        Ok(())
    }

    pub fn anomaly_solver(&self) -> AnomalySolver {
        match self.anomaly {
            AnomalyMethod::Newton => AnomalySolver::Newton(KeplerSolver {
                max_iterations: self.solver_max_iterations,
                tolerance: self.solver_tolerance,
            }),
            AnomalyMethod::Series => AnomalySolver::Series,
        }
    }

    /// Builds the configured interaction model
    pub fn interaction_model(&self) -> Result<Box<dyn InteractionModel>> {
        let settings = &self.interaction;
        Ok(match settings.kind {
            InteractionKind::Direct => Box::new(DirectInteraction::new()),
            InteractionKind::TensorGrid => Box::new(TensorGridInteraction::new(
                settings.grid_size,
                settings.grid_count,
                settings.near_radius,
            )?),
        })
    }

    /// `scale · (1 − delta · sensitivity)`, clamped to the view limits
    pub fn zoomed_scale(&self, scale: f64, delta: f64) -> f64 {
        let view = &self.view;
        (scale * (1.0 - delta * view.zoom_sensitivity)).clamp(view.min_scale, view.max_scale)
    }
}
