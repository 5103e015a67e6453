//! WASM bindings for the orrery simulation engine.
//!
//! Simulations live in thread-local storage (WASM is single-threaded) and
//! are referenced from JavaScript by opaque ids. Reads return serializable
//! snapshots; the renderer owns everything visual.
//!
//! # Example Usage (JavaScript)
//!
//! ```javascript
//! const text = await (await fetch("systems/sol.txt")).text();
//! const simId = simulation_load(text, { speed: 86400 });
//!
//! function frame(wallDt) {
//!   simulation_advance(simId, wallDt);
//!   for (const body of simulation_get_bodies(simId)) {
//!     draw(body.position, body.radius);
//!   }
//! }
//!
//! canvas.onwheel = (e) => simulation_zoom(simId, e.deltaY);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use nalgebra::{Point2, Vector2};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use orrery::body::BodyId;
use orrery::config::SimulationConfig;
use orrery::simulation::{BodySnapshot, Simulation};
use orrery::system::SystemState;

// =============================================================================
// Serialization helpers
// =============================================================================

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn config_from_js(value: JsValue) -> Result<SimulationConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(SimulationConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))
}

// =============================================================================
// Thread-local storage for simulations
// =============================================================================

thread_local! {
    static SIMULATIONS: RefCell<HashMap<u32, Simulation>> = RefCell::new(HashMap::new());
    static NEXT_SIM_ID: RefCell<u32> = const { RefCell::new(0) };
}

fn register(simulation: Simulation) -> u32 {
    let id = NEXT_SIM_ID.with(|next_id| {
        let mut id = next_id.borrow_mut();
        let current = *id;
        *id += 1;
        current
    });

    SIMULATIONS.with(|sims| {
        sims.borrow_mut().insert(id, simulation);
    });
    id
}

fn not_found(sim_id: u32) -> JsError {
    JsError::new(&format!("Simulation {} not found", sim_id))
}

fn with_simulation<R>(
    sim_id: u32,
    f: impl FnOnce(&mut Simulation) -> Result<R, JsError>,
) -> Result<R, JsError> {
    SIMULATIONS.with(|sims| {
        let mut sims = sims.borrow_mut();
        let sim = sims.get_mut(&sim_id).ok_or_else(|| not_found(sim_id))?;
        f(sim)
    })
}

// =============================================================================
// Simulation lifecycle
// =============================================================================

/// Create a simulation from the text of a body-definition file.
///
/// `config` may be `undefined` or a partial configuration object; missing
/// keys keep their defaults.
///
/// Returns a simulation ID for use with other functions.
#[wasm_bindgen]
pub fn simulation_load(source: &str, config: JsValue) -> Result<u32, JsError> {
    let config = config_from_js(config)?;
    let simulation = Simulation::load(source, config)?;
    Ok(register(simulation))
}

/// Create an empty simulation, typically populated with ships.
#[wasm_bindgen]
pub fn simulation_create(config: JsValue) -> Result<u32, JsError> {
    let config = config_from_js(config)?;
    let state = SystemState::new(config.gravitational_constant);
    let simulation = Simulation::new(config, state)?;
    Ok(register(simulation))
}

/// Dispose of a simulation to free memory.
///
/// Returns true if the simulation existed.
#[wasm_bindgen]
pub fn simulation_dispose(sim_id: u32) -> bool {
    SIMULATIONS.with(|sims| sims.borrow_mut().remove(&sim_id).map(Simulation::dispose).is_some())
}

// =============================================================================
// Stepping and input
// =============================================================================

/// Advance by `wall_dt` wall-clock seconds.
///
/// # Returns
/// Tick report: simulated dt, new time, evicted bodies, resets and captures
#[wasm_bindgen]
pub fn simulation_advance(sim_id: u32, wall_dt: f64) -> Result<JsValue, JsError> {
    with_simulation(sim_id, |sim| to_js(&sim.advance(wall_dt)?))
}

/// Add a ship at `(x, y)` metres with velocity `(vx, vy)` m/s.
///
/// # Returns
/// The new ship's body ID
#[wasm_bindgen]
pub fn simulation_add_ship(
    sim_id: u32,
    name: &str,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
) -> Result<u32, JsError> {
    with_simulation(sim_id, |sim| {
        Ok(sim
            .add_ship(name, Point2::new(x, y), Vector2::new(vx, vy))
            .0)
    })
}

/// Fire a ship's engine; `throttle` is usually in [0, 1].
#[wasm_bindgen]
pub fn simulation_thrust(
    sim_id: u32,
    ship_id: u32,
    throttle: f64,
    wall_dt: f64,
) -> Result<(), JsError> {
    with_simulation(sim_id, |sim| Ok(sim.thrust(BodyId(ship_id), throttle, wall_dt)?))
}

/// Turn a ship; positive input turns counter-clockwise.
#[wasm_bindgen]
pub fn simulation_turn(sim_id: u32, ship_id: u32, input: f64, wall_dt: f64) -> Result<(), JsError> {
    with_simulation(sim_id, |sim| Ok(sim.turn(BodyId(ship_id), input, wall_dt)?))
}

/// Apply a scroll-wheel delta to the view scale.
///
/// # Returns
/// The new scale
#[wasm_bindgen]
pub fn simulation_zoom(sim_id: u32, scroll_delta: f64) -> Result<f64, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.zoom(scroll_delta)))
}

// =============================================================================
// State queries
// =============================================================================

/// Get every body's render state.
#[wasm_bindgen]
pub fn simulation_get_bodies(sim_id: u32) -> Result<JsValue, JsError> {
    with_simulation(sim_id, |sim| {
        let bodies: Vec<BodySnapshot> = sim.snapshots();
        to_js(&bodies)
    })
}

/// Get a body's orbit as a closed polyline of `[x, y, z]` points in metres.
#[wasm_bindgen]
pub fn simulation_orbit_path(sim_id: u32, body_id: u32) -> Result<JsValue, JsError> {
    with_simulation(sim_id, |sim| {
        let points: Vec<[f64; 3]> = sim
            .orbit_path(BodyId(body_id))?
            .into_iter()
            .map(|p| [p.x, p.y, p.z])
            .collect();
        to_js(&points)
    })
}

/// Get current simulation time in seconds since the epoch.
#[wasm_bindgen]
pub fn simulation_get_time(sim_id: u32) -> Result<f64, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.time()))
}

/// Get the current calendar date as an RFC 3339 string, if representable.
#[wasm_bindgen]
pub fn simulation_get_date(sim_id: u32) -> Result<Option<String>, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.current_date().map(|d| d.to_rfc3339())))
}

/// Get the current view scale.
#[wasm_bindgen]
pub fn simulation_get_scale(sim_id: u32) -> Result<f64, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.scale()))
}

/// Get body count.
#[wasm_bindgen]
pub fn simulation_body_count(sim_id: u32) -> Result<usize, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.state().body_count()))
}
