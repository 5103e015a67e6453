//! The simulation context: `create → advance* → dispose`
//!
//! A [`Simulation`] owns the system state, the configured interaction model
//! and the view scale. Nothing is global; a host may run several side by
//! side.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use nalgebra::{Point2, Point3, Vector2};
use serde::{Deserialize, Serialize};
use units::{Mass, Time};

use crate::analytic;
use crate::body::{Body, BodyClass, BodyId, ShipState};
use crate::capture::{resolve_captures, PrimaryChange};
use crate::config::SimulationConfig;
use crate::error::{OrreryError, Result};
use crate::forces::InteractionModel;
use crate::integrator::{Integrator, SymplecticEuler};
use crate::loader::{parse_system, SystemDefinition};
use crate::ship;
use crate::system::SystemState;

/// How bodies move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimulationMode {
    /// Every body follows its Keplerian orbit
    #[default]
    Analytic,
    /// Bodies move under mutual gravity and change primaries on capture
    FreeFlight,
}

/// Per-body state handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyClass,
    /// kg
    pub mass: f64,
    /// m
    pub radius: f64,
    pub position: [f64; 2],
    pub spatial_position: [f64; 3],
    pub velocity: [f64; 2],
    /// `None` for roots, whose sphere is unbounded
    pub sphere_of_influence: Option<f64>,
    pub primary: Option<BodyId>,
    /// Ships only
    pub rotation: Option<f64>,
    pub target: Option<BodyId>,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        let ship = body.ship_state();
        Self {
            id: body.id,
            name: body.name.clone(),
            kind: body.class(),
            mass: body.mass,
            radius: body.radius,
            position: [body.position.x, body.position.y],
            spatial_position: [
                body.spatial_position.x,
                body.spatial_position.y,
                body.spatial_position.z,
            ],
            velocity: [body.velocity.x, body.velocity.y],
            sphere_of_influence: Some(body.sphere_of_influence()).filter(|soi| soi.is_finite()),
            primary: body.primary(),
            rotation: ship.map(|s| s.rotation),
            target: ship.and_then(|s| s.target),
        }
    }
}

/// What happened during one [`Simulation::advance`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    /// Simulated seconds covered by the tick
    pub dt: f64,
    /// Simulation time after the tick
    pub time: f64,
    /// Bodies removed for leaving the interaction domain
    pub evicted: Vec<BodyId>,
    /// Bodies whose velocity or position had to be reset
    pub reset: Vec<BodyId>,
    pub captures: Vec<PrimaryChange>,
}

pub struct Simulation {
    config: SimulationConfig,
    state: SystemState,
    interaction: Box<dyn InteractionModel>,
    integrator: SymplecticEuler,
    scale: f64,
}

impl Simulation {
    /// Wraps an existing system state.
    ///
    /// # Examples
    ///
    /// ```
    /// use kepler::constants::G;
    /// use orrery::config::SimulationConfig;
    /// use orrery::simulation::Simulation;
    /// use orrery::system::SystemState;
    ///
    /// let mut simulation = Simulation::new(SimulationConfig::default(), SystemState::new(G)).unwrap();
    /// let report = simulation.advance(2.0).unwrap();
    ///
    /// assert_eq!(report.time, 2.0);
    /// assert!(simulation.snapshots().is_empty());
    /// ```
    pub fn new(config: SimulationConfig, state: SystemState) -> Result<Self> {
        config.validate()?;
        let interaction = config.interaction_model()?;

        debug!(
            "Created {:?} simulation with {} bodies",
            config.mode,
            state.body_count()
        );
        Ok(Self {
            scale: config.view.initial_scale,
            config,
            state,
            interaction,
            integrator: SymplecticEuler,
        })
    }

    /// Instantiates a parsed body file under `config`
    pub fn from_definition(definition: &SystemDefinition, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let state = definition.instantiate(config.gravitational_constant, config.anomaly_solver())?;
        Self::new(config, state)
    }

    /// Parses and instantiates a body file
    pub fn load(source: &str, config: SimulationConfig) -> Result<Self> {
        Self::from_definition(&parse_system(source)?, config)
    }

    /// Consumes the simulation, handing back its final state
    pub fn dispose(self) -> SystemState {
        debug!("Disposed simulation at t = {} s", self.state.time);
        self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn mode(&self) -> SimulationMode {
        self.config.mode
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SystemState {
        &mut self.state
    }

    /// Current view scale
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    pub fn current_date(&self) -> Option<DateTime<Utc>> {
        self.state.current_date()
    }

    fn simulated(&self, wall_dt: f64) -> Result<f64> {
        let dt = wall_dt * self.config.speed;
        if !dt.is_finite() {
            return Err(OrreryError::InvalidTimeStep(wall_dt));
        }
        Ok(dt)
    }

    /// Advances by `wall_dt` wall-clock seconds times the speed multiplier
    pub fn advance(&mut self, wall_dt: f64) -> Result<TickReport> {
        let dt = self.simulated(wall_dt)?;
        match self.config.mode {
            SimulationMode::Analytic => {
                analytic::advance(&mut self.state, Time::from_seconds(dt));
                Ok(TickReport {
                    dt,
                    time: self.state.time,
                    ..TickReport::default()
                })
            }
            SimulationMode::FreeFlight => self.free_flight_tick(dt),
        }
    }

    fn free_flight_tick(&mut self, dt: f64) -> Result<TickReport> {
        let evicted = self.evict_outside_domain();

        let interactions = self.interaction.interactions(&self.state, dt);
        let mut reset = self.integrator.kick(&mut self.state, &interactions.kicks);
        ship::update_targets(&mut self.state, &interactions.encounters);
        let captures = resolve_captures(&mut self.state, &interactions.encounters, self.config.capture)?;
        reset.extend(self.integrator.drift(&mut self.state, dt));

        for body in self.state.bodies.iter_mut() {
            body.spatial_position = Point3::new(body.position.x, body.position.y, 0.0);
        }
        self.state.time += dt;

        Ok(TickReport {
            dt,
            time: self.state.time,
            evicted,
            reset,
            captures,
        })
    }

    fn evict_outside_domain(&mut self) -> Vec<BodyId> {
        let outside = self.interaction.prepare(&self.state);
        if outside.is_empty() {
            return outside;
        }

        for id in &outside {
            if let Some(body) = self.state.remove_body(*id) {
                warn!(
                    "Evicted {} ({:?}) at ({:.3e}, {:.3e}): outside the interaction domain",
                    body.name, id, body.position.x, body.position.y
                );
            }
        }
        // Indices shifted; the grid must be rebuilt before use
        self.interaction.prepare(&self.state);
        outside
    }

    /// Adds a configured ship as a new root
    pub fn add_ship(
        &mut self,
        name: &str,
        position: Point2<f64>,
        velocity: Vector2<f64>,
    ) -> BodyId {
        let settings = &self.config.ship;
        let mut body = Body::ship(
            name,
            Mass::from_kg(settings.mass),
            ShipState::new(settings.engine_power, settings.rcs_power),
        );
        body.position = position;
        body.velocity = velocity;
        body.spatial_position = Point3::new(position.x, position.y, 0.0);
        self.state.add_body(body)
    }

    pub fn thrust(&mut self, ship: BodyId, throttle: f64, wall_dt: f64) -> Result<()> {
        let dt = self.simulated(wall_dt)?;
        ship::thrust(&mut self.state, ship, throttle, dt)
    }

    pub fn turn(&mut self, ship: BodyId, input: f64, wall_dt: f64) -> Result<()> {
        let dt = self.simulated(wall_dt)?;
        ship::turn(&mut self.state, ship, input, dt)
    }

    /// Applies a scroll delta to the view scale and returns the new scale
    pub fn zoom(&mut self, scroll_delta: f64) -> f64 {
        let zoomed = self.config.zoomed_scale(self.scale, scroll_delta);
        if zoomed.is_finite() {
            self.scale = zoomed;
        }
        self.scale
    }

    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.state.bodies.iter().map(BodySnapshot::from).collect()
    }

    /// Absolute polyline of a body's orbit, anchored at its primary's
    /// current position
    pub fn orbit_path(&self, id: BodyId) -> Result<Vec<Point3<f64>>> {
        let body = self.state.body(id)?;
        let orbit = body.orbit.as_ref().ok_or(OrreryError::NoOrbit(id))?;
        let origin = body
            .primary()
            .and_then(|p| self.state.get_body(p))
            .map(|p| p.spatial_position)
            .unwrap_or_else(Point3::origin);

        Ok(orbit
            .path(self.config.path_samples)
            .into_iter()
            .map(|offset| origin + offset)
            .collect())
    }
}
