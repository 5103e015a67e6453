//! Brute-force pairwise gravity (O(N²))

use crate::forces::{Encounter, InteractionModel, Interactions};
use crate::system::SystemState;

/// Evaluates every unordered pair once and applies equal and opposite
/// momentum changes to both members.
///
/// Every pair with a non-zero separation is reported as an encounter in
/// both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectInteraction;

impl DirectInteraction {
    pub fn new() -> Self {
        Self
    }
}

impl InteractionModel for DirectInteraction {
    fn interactions(&self, state: &SystemState, dt: f64) -> Interactions {
        let bodies = &state.bodies;
        let mut result = Interactions::new(bodies.len());

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (a, b) = (&bodies[i], &bodies[j]);

                let separation = a.position - b.position;
                let distance_squared = separation.magnitude_squared();
                if distance_squared == 0.0 {
                    continue;
                }

                let direction = separation / distance_squared.sqrt();
                let pull = state.g * dt / distance_squared;
                result.kicks[i] -= direction * (pull * b.mass);
                result.kicks[j] += direction * (pull * a.mass);

                result.encounters.push(Encounter {
                    body: a.id,
                    other: b.id,
                });
                result.encounters.push(Encounter {
                    body: b.id,
                    other: a.id,
                });
            }
        }

        result
    }
}
