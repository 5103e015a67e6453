//! Pilot commands for ships in free flight

use std::collections::HashMap;

use crate::body::BodyId;
use crate::error::{OrreryError, Result};
use crate::forces::Encounter;
use crate::system::SystemState;

/// Fires the main engine along the ship's heading for `dt` seconds.
///
/// `Δv = heading · throttle · dt · engine_power / mass`
pub fn thrust(state: &mut SystemState, ship: BodyId, throttle: f64, dt: f64) -> Result<()> {
    let body = state.body_mut(ship)?;
    let mass = body.mass;
    let ship_state = body.ship_state().ok_or(OrreryError::NotAShip(ship))?;

    let delta = ship_state.heading() * (throttle * dt * ship_state.engine_power / mass);
    body.velocity += delta;
    Ok(())
}

/// Rotates the ship with its reaction-control thrusters.
///
/// `rotation += dt · rcs_power · input / mass`; positive input turns
/// counter-clockwise.
pub fn turn(state: &mut SystemState, ship: BodyId, input: f64, dt: f64) -> Result<()> {
    let body = state.body_mut(ship)?;
    let mass = body.mass;
    let ship_state = body.ship_state_mut().ok_or(OrreryError::NotAShip(ship))?;

    ship_state.rotation += dt * ship_state.rcs_power * input / mass;
    Ok(())
}

/// Points every ship at the nearest body it encountered this tick.
///
/// Ships that encountered nothing lose their target.
pub fn update_targets(state: &mut SystemState, encounters: &[Encounter]) {
    let mut nearest: HashMap<BodyId, (f64, BodyId)> = HashMap::new();

    for encounter in encounters {
        let (Some(ship), Some(other)) = (
            state.get_body(encounter.body).filter(|b| b.is_ship()),
            state.get_body(encounter.other),
        ) else {
            continue;
        };

        let distance = ship.distance_to(other);
        nearest
            .entry(ship.id)
            .and_modify(|best| {
                if distance < best.0 {
                    *best = (distance, other.id);
                }
            })
            .or_insert((distance, other.id));
    }

    for body in state.bodies.iter_mut() {
        let id = body.id;
        if let Some(ship_state) = body.ship_state_mut() {
            ship_state.target = nearest.get(&id).map(|(_, target)| *target);
        }
    }
}
