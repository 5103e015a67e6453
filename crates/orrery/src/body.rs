use kepler::radius::{bulk_density, radius_from_composition};
use kepler::{Composition, Orbit, StarProperties};
use nalgebra::{Point2, Point3, Vector2};
use serde::{Deserialize, Serialize};
use units::{Density, Length, Mass};

/// Nominal hull radius of a ship (m)
pub const SHIP_RADIUS_M: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetProperties {
    pub composition: Composition,
}

/// Pilot-controlled state of a ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipState {
    /// Heading in radians; 0 points along +y
    pub rotation: f64,
    pub engine_power: f64,
    /// Reaction-control authority used for turning
    pub rcs_power: f64,
    /// Nearest body seen during the last free-flight tick
    pub target: Option<BodyId>,
}

impl ShipState {
    pub fn new(engine_power: f64, rcs_power: f64) -> Self {
        Self {
            rotation: 0.0,
            engine_power,
            rcs_power,
            target: None,
        }
    }

    /// Unit thrust direction for the current heading
    pub fn heading(&self) -> Vector2<f64> {
        let (sin, cos) = self.rotation.sin_cos();
        Vector2::new(-sin, cos)
    }
}

/// What a body is, with the properties specific to that kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Star(StarProperties),
    Planet(PlanetProperties),
    Ship(ShipState),
}

impl BodyKind {
    pub fn class(&self) -> BodyClass {
        match self {
            BodyKind::Star(_) => BodyClass::Star,
            BodyKind::Planet(_) => BodyClass::Planet,
            BodyKind::Ship(_) => BodyClass::Ship,
        }
    }
}

/// Tag-only view of [`BodyKind`] for snapshots and file records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyClass {
    Star,
    Planet,
    Ship,
}

/// A body in the system arena.
///
/// Hierarchy links (`primary`, `satellites`) and the quantities derived from
/// them (`sphere_of_influence`, `mu`) are owned by
/// [`SystemState`](crate::system::SystemState), which keeps them consistent;
/// they are read-only from outside the crate.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub mass: f64,                       // kg
    pub radius: f64,                     // m
    pub position: Point2<f64>,           // m, absolute
    pub velocity: Vector2<f64>,          // m/s, absolute
    pub spatial_position: Point3<f64>,   // m, absolute (analytic mode)
    pub orbit: Option<Orbit>,
    pub(crate) primary: Option<BodyId>,
    pub(crate) satellites: Vec<BodyId>,
    pub(crate) sphere_of_influence: f64, // m
    pub(crate) mu: f64,                  // m³/s², of the primary
}

impl Body {
    /// Creates a detached body at the origin, at rest.
    ///
    /// The id is a placeholder until the body is added to a
    /// [`SystemState`](crate::system::SystemState).
    pub fn new(name: impl Into<String>, kind: BodyKind, mass: Mass, radius: f64) -> Self {
        Body {
            id: BodyId(0),
            name: name.into(),
            kind,
            mass: mass.to_kg(),
            radius,
            position: Point2::origin(),
            velocity: Vector2::zeros(),
            spatial_position: Point3::origin(),
            orbit: None,
            primary: None,
            satellites: Vec::new(),
            sphere_of_influence: f64::INFINITY,
            mu: 0.0,
        }
    }

    /// Star whose radius follows from its luminosity and temperature
    pub fn star(name: impl Into<String>, mass: Mass, properties: StarProperties) -> Self {
        let radius = properties.radius().to_meters();
        Self::new(name, BodyKind::Star(properties), mass, radius)
    }

    /// Planet whose radius follows from the mass–radius regression
    pub fn planet(name: impl Into<String>, mass: Mass, composition: Composition) -> Self {
        let radius = radius_from_composition(mass, &composition).to_meters();
        Self::new(
            name,
            BodyKind::Planet(PlanetProperties { composition }),
            mass,
            radius,
        )
    }

    pub fn ship(name: impl Into<String>, mass: Mass, state: ShipState) -> Self {
        Self::new(name, BodyKind::Ship(state), mass, SHIP_RADIUS_M)
    }

    pub fn primary(&self) -> Option<BodyId> {
        self.primary
    }

    pub fn satellites(&self) -> &[BodyId] {
        &self.satellites
    }

    /// Radius within which this body dominates its satellites; infinite for roots
    pub fn sphere_of_influence(&self) -> f64 {
        self.sphere_of_influence
    }

    /// Gravitational parameter of the current primary, 0 for roots
    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn class(&self) -> BodyClass {
        self.kind.class()
    }

    pub fn is_ship(&self) -> bool {
        matches!(self.kind, BodyKind::Ship(_))
    }

    pub fn ship_state(&self) -> Option<&ShipState> {
        match &self.kind {
            BodyKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn ship_state_mut(&mut self) -> Option<&mut ShipState> {
        match &mut self.kind {
            BodyKind::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn density(&self) -> Density {
        bulk_density(Mass::from_kg(self.mass), Length::from_meters(self.radius))
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }
}
