use chrono::{DateTime, TimeDelta, Utc};
use kepler::{AnomalySolver, Orbit, OrbitalElements};
use log::{debug, info};
use nalgebra::Vector2;

use crate::body::{Body, BodyId};
use crate::error::{OrreryError, Result};

/// Complete state of a star system: the body arena and its primary tree.
///
/// Bodies reference each other by [`BodyId`]. Every hierarchy edit goes
/// through [`SystemState::change_primary`], [`SystemState::detach`] or
/// [`SystemState::remove_body`], which update both ends of the link so a
/// body's `primary` and its primary's `satellites` always agree. The primary
/// graph is a forest: no body orbits itself or one of its own satellites.
#[derive(Debug, Clone)]
pub struct SystemState {
    /// Simulation time in seconds since `epoch`
    pub time: f64,
    /// Calendar instant at which `time` is zero
    pub epoch: DateTime<Utc>,
    /// Gravitational constant (m³ kg⁻¹ s⁻²)
    pub g: f64,
    pub bodies: Vec<Body>,
    next_id: u32,
}

impl SystemState {
    /// Creates an empty system
    ///
    /// # Examples
    ///
    /// ```
    /// use kepler::constants::G;
    /// use orrery::system::SystemState;
    ///
    /// let system = SystemState::new(G);
    ///
    /// assert_eq!(system.body_count(), 0);
    /// assert_eq!(system.time, 0.0);
    /// ```
    pub fn new(g: f64) -> Self {
        Self {
            time: 0.0,
            epoch: DateTime::UNIX_EPOCH,
            g,
            bodies: Vec::new(),
            next_id: 0,
        }
    }

    pub fn with_epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = epoch;
        self
    }

    /// Calendar date at the current simulation time, if representable
    pub fn current_date(&self) -> Option<DateTime<Utc>> {
        let millis = (self.time * 1000.0).round();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }
        TimeDelta::try_milliseconds(millis as i64).and_then(|delta| self.epoch.checked_add_signed(delta))
    }

    /// Adds a body as a new root and returns its assigned id
    ///
    /// # Examples
    ///
    /// ```
    /// use kepler::{constants::G, StarProperties};
    /// use orrery::body::Body;
    /// use orrery::system::SystemState;
    /// use units::Mass;
    ///
    /// let mut system = SystemState::new(G);
    /// let sun = system.add_body(Body::star("Sun", Mass::from_solar_masses(1.0), StarProperties::sun_like()));
    ///
    /// assert_eq!(system.get_body(sun).unwrap().name, "Sun");
    /// ```
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        body.id = id;
        body.primary = None;
        body.satellites.clear();
        body.sphere_of_influence = f64::INFINITY;
        body.mu = 0.0;

        debug!("Added {} as {:?}", body.name, id);
        self.bodies.push(body);
        id
    }

    /// Adds a body on a Keplerian orbit about `primary`.
    ///
    /// The orbit is validated against the primary's mass before anything is
    /// inserted, so a failure leaves the system unchanged.
    pub fn add_orbiting_body(
        &mut self,
        body: Body,
        primary: BodyId,
        elements: OrbitalElements,
        solver: AnomalySolver,
    ) -> Result<BodyId> {
        let primary_mass = self.body(primary)?.mass;
        let orbit = Orbit::from_mu(elements, self.g * primary_mass)?.with_solver(solver);

        let id = self.add_body(body);
        if let Some(added) = self.get_body_mut(id) {
            added.orbit = Some(orbit);
        }
        self.change_primary(id, primary)?;
        Ok(id)
    }

    /// Removes a body, unlinking it from its primary and detaching its satellites
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let idx = self.index_of(id)?;
        let body = self.bodies.remove(idx);

        if let Some(primary) = body.primary.and_then(|p| self.get_body_mut(p)) {
            primary.satellites.retain(|s| *s != id);
        }
        for satellite in &body.satellites {
            if let Some(sat) = self.get_body_mut(*satellite) {
                sat.primary = None;
                sat.sphere_of_influence = f64::INFINITY;
                sat.mu = 0.0;
            }
        }

        Some(body)
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    pub fn get_body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Like [`SystemState::get_body`], but an unknown id is an error
    pub fn body(&self, id: BodyId) -> Result<&Body> {
        self.get_body(id).ok_or(OrreryError::UnknownBody(id))
    }

    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        self.get_body_mut(id).ok_or(OrreryError::UnknownBody(id))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().find(|b| b.name == name).map(|b| b.id)
    }

    /// Makes `body` orbit `new_primary`.
    ///
    /// Sphere of influence becomes `separation · (m / M)^(2/5)` where the
    /// separation is the semi-major axis for orbiting bodies and the current
    /// distance otherwise. The body's µ, and its orbit's period, follow the
    /// new primary's mass. Both satellite lists are updated.
    pub fn change_primary(&mut self, body: BodyId, new_primary: BodyId) -> Result<()> {
        let idx = self.index_of(body).ok_or(OrreryError::UnknownBody(body))?;
        let primary_idx = self
            .index_of(new_primary)
            .ok_or(OrreryError::UnknownBody(new_primary))?;

        if body == new_primary || self.is_descendant(new_primary, body) {
            return Err(OrreryError::CyclicPrimary {
                body,
                primary: new_primary,
            });
        }

        let primary = &self.bodies[primary_idx];
        let target = &self.bodies[idx];
        let mu = self.g * primary.mass;

        let separation = match &target.orbit {
            Some(orbit) => orbit.semi_major_axis().to_meters(),
            None => (target.position - primary.position).magnitude(),
        };
        let sphere_of_influence = separation * (target.mass / primary.mass).powf(0.4);

        let mut orbit = target.orbit.clone();
        if let Some(orbit) = orbit.as_mut() {
            orbit.set_mu(mu)?;
        }

        info!(
            "{} under the influence of {} has an SOI of {:.3e} m{}",
            target.name,
            primary.name,
            sphere_of_influence,
            orbit
                .as_ref()
                .map(|o| format!(" and a period of {:.2} days", o.period().to_days()))
                .unwrap_or_default()
        );

        let old_primary = target.primary;
        if let Some(old) = old_primary.and_then(|p| self.get_body_mut(p)) {
            old.satellites.retain(|s| *s != body);
        }

        let primary = &mut self.bodies[primary_idx];
        if !primary.satellites.contains(&body) {
            primary.satellites.push(body);
        }

        let target = &mut self.bodies[idx];
        target.primary = Some(new_primary);
        target.sphere_of_influence = sphere_of_influence;
        target.mu = mu;
        target.orbit = orbit;

        Ok(())
    }

    /// Turns `body` into a root: no primary, infinite sphere of influence
    pub fn detach(&mut self, body: BodyId) -> Result<()> {
        let target = self.body_mut(body)?;
        let old_primary = target.primary.take();
        target.sphere_of_influence = f64::INFINITY;
        target.mu = 0.0;

        if let Some(old) = old_primary.and_then(|p| self.get_body_mut(p)) {
            old.satellites.retain(|s| *s != body);
        }
        Ok(())
    }

    /// Primary chain from the immediate primary up to the root
    pub fn ancestors(&self, id: BodyId) -> Vec<BodyId> {
        let mut chain = Vec::new();
        let mut current = self.get_body(id).and_then(|b| b.primary);

        while let Some(primary) = current {
            if chain.len() > self.bodies.len() {
                break;
            }
            chain.push(primary);
            current = self.get_body(primary).and_then(|b| b.primary);
        }
        chain
    }

    /// True if `candidate` is (transitively) a satellite of `ancestor`
    pub fn is_descendant(&self, candidate: BodyId, ancestor: BodyId) -> bool {
        self.ancestors(candidate).contains(&ancestor)
    }

    pub fn roots(&self) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|b| b.primary.is_none())
            .map(|b| b.id)
            .collect()
    }

    /// Every body, each appearing after its primary
    pub fn hierarchy_order(&self) -> Vec<BodyId> {
        let mut order = self.roots();
        let mut cursor = 0;

        while cursor < order.len() {
            if let Some(body) = self.get_body(order[cursor]) {
                order.extend(body.satellites.iter().copied());
            }
            cursor += 1;
        }
        order
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }

    /// Total momentum; conserved by pairwise interaction
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.bodies
            .iter()
            .map(|b| b.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(|b| b.kinetic_energy()).sum()
    }
}
