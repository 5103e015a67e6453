//! Primary reassignment during free flight
//!
//! After each interaction pass the encounters are checked against the
//! capture rule: a heavier body takes over as primary when the body has
//! left its current primary's sphere of influence and entered the captor's,
//! or when the captor's sphere is both around the body and tighter than the
//! current primary's.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::body::BodyId;
use crate::error::Result;
use crate::forces::Encounter;
use crate::system::SystemState;

/// How competing captors are resolved within one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapturePolicy {
    /// Apply each capture as soon as it is found; the last one wins
    Greedy,
    /// Judge every encounter against the start-of-tick state and keep, per
    /// body, the captor with the smallest sphere of influence
    #[default]
    TightestSphere,
}

/// A primary reassignment applied during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryChange {
    pub body: BodyId,
    pub from: Option<BodyId>,
    pub to: BodyId,
}

/// Whether `captor` should become the primary of `body` given current state
pub fn captures(state: &SystemState, body: BodyId, captor: BodyId) -> bool {
    if body == captor {
        return false;
    }
    let (Some(a), Some(b)) = (state.get_body(body), state.get_body(captor)) else {
        return false;
    };
    if a.primary() == Some(captor) || b.mass <= a.mass || state.is_descendant(captor, body) {
        return false;
    }

    let inside_captor = a.distance_to(b) < b.sphere_of_influence();
    match a.primary().and_then(|p| state.get_body(p)) {
        None => true,
        Some(primary) => {
            let outside_primary = a.distance_to(primary) > primary.sphere_of_influence();
            inside_captor
                && (outside_primary || b.sphere_of_influence() < primary.sphere_of_influence())
        }
    }
}

/// Applies the captures implied by `encounters` under `policy`.
///
/// Returns the changes in the order they were applied. If no encounter
/// satisfies the capture rule nothing changes.
pub fn resolve_captures(
    state: &mut SystemState,
    encounters: &[Encounter],
    policy: CapturePolicy,
) -> Result<Vec<PrimaryChange>> {
    match policy {
        CapturePolicy::Greedy => resolve_greedy(state, encounters),
        CapturePolicy::TightestSphere => resolve_tightest(state, encounters),
    }
}

fn resolve_greedy(state: &mut SystemState, encounters: &[Encounter]) -> Result<Vec<PrimaryChange>> {
    let mut changes = Vec::new();
    for encounter in encounters {
        if captures(state, encounter.body, encounter.other) {
            changes.push(apply(state, encounter.body, encounter.other)?);
        }
    }
    Ok(changes)
}

fn resolve_tightest(state: &mut SystemState, encounters: &[Encounter]) -> Result<Vec<PrimaryChange>> {
    let mut best: BTreeMap<BodyId, (f64, BodyId)> = BTreeMap::new();

    for encounter in encounters {
        if !captures(state, encounter.body, encounter.other) {
            continue;
        }
        let Some(captor) = state.get_body(encounter.other) else {
            continue;
        };
        let candidate = (captor.sphere_of_influence(), captor.id);
        best.entry(encounter.body)
            .and_modify(|current| {
                if candidate.0 < current.0 || (candidate.0 == current.0 && candidate.1 < current.1) {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    let mut changes = Vec::with_capacity(best.len());
    for (body, (_, captor)) in best {
        // An earlier change this tick may have moved the captor under `body`
        if state.is_descendant(captor, body) {
            debug!("Skipping capture of {body:?} by {captor:?}: would form a cycle");
            continue;
        }
        changes.push(apply(state, body, captor)?);
    }
    Ok(changes)
}

fn apply(state: &mut SystemState, body: BodyId, captor: BodyId) -> Result<PrimaryChange> {
    let from = state.body(body)?.primary();
    state.change_primary(body, captor)?;
    Ok(PrimaryChange {
        body,
        from,
        to: captor,
    })
}
