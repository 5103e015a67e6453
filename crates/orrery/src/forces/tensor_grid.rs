//! Uniform-grid partitioned gravity
//!
//! The domain `[-size/2, size/2)²`, centred on the origin, is cut into
//! `count × count` square cells. Each tick bodies are binned by direct index
//! computation. A body feels every real body within `near_radius` cells of
//! its own (a 5×5 block by default) and, for every other non-empty cell, a
//! single pseudo-body at the cell centre carrying the cell's total mass.
//!
//! Bodies whose position maps to no cell (outside the domain, or non-finite)
//! are reported by [`TensorGrid::rebuild`] for eviction.

use nalgebra::Point2;

use crate::body::BodyId;
use crate::error::{OrreryError, Result};
use crate::forces::{gravity_kick, Encounter, InteractionModel, Interactions};
use crate::system::SystemState;

/// Neighbourhood half-width used when none is configured
pub const DEFAULT_NEAR_RADIUS: usize = 2;

/// One square of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct TensorCell {
    pub center: Point2<f64>,
    /// Summed mass of the members (kg)
    pub mass: f64,
    /// Indices into `SystemState::bodies`
    pub members: Vec<usize>,
}

/// A gravity source offered to bodies of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    /// Real body, by index into `SystemState::bodies`
    Body(usize),
    /// Far cell collapsed to its centre and total mass
    Cell { center: Point2<f64>, mass: f64 },
}

/// Spatial index of body positions on a fixed square lattice
///
/// # Examples
///
/// ```
/// use nalgebra::Point2;
/// use orrery::forces::TensorGrid;
///
/// let grid = TensorGrid::new(100.0, 10).unwrap();
///
/// assert_eq!(grid.find_index(&Point2::new(-50.0, -50.0)), Some((0, 0)));
/// assert_eq!(grid.find_index(&Point2::new(0.0, 0.0)), Some((5, 5)));
/// assert_eq!(grid.find_index(&Point2::new(50.0, 0.0)), None);
/// ```
#[derive(Debug, Clone)]
pub struct TensorGrid {
    size: f64,
    count: usize,
    cells: Vec<TensorCell>,
    assignments: Vec<Option<(usize, usize)>>,
}

impl TensorGrid {
    pub fn new(size: f64, count: usize) -> Result<Self> {
        if !(size > 0.0 && size.is_finite()) {
            return Err(OrreryError::InvalidConfig(format!(
                "grid size must be positive and finite, got {size}"
            )));
        }
        if count == 0 {
            return Err(OrreryError::InvalidConfig(
                "grid cell count must be at least 1".to_string(),
            ));
        }

        let mut grid = Self {
            size,
            count,
            cells: Vec::with_capacity(count * count),
            assignments: Vec::new(),
        };
        for y in 0..count {
            for x in 0..count {
                grid.cells.push(TensorCell {
                    center: grid.cell_center(x, y),
                    mass: 0.0,
                    members: Vec::new(),
                });
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Side length of one cell
    pub fn cell_size(&self) -> f64 {
        self.size / self.count as f64
    }

    pub fn cell_center(&self, x: usize, y: usize) -> Point2<f64> {
        let n = self.count as f64;
        Point2::new(
            ((x as f64 + 0.5) / n - 0.5) * self.size,
            ((y as f64 + 0.5) / n - 0.5) * self.size,
        )
    }

    fn axis_index(&self, coordinate: f64) -> Option<usize> {
        let scaled = (coordinate / self.size + 0.5) * self.count as f64;
        if !scaled.is_finite() || scaled < 0.0 {
            return None;
        }
        let index = scaled.floor() as usize;
        (index < self.count).then_some(index)
    }

    /// Cell coordinates `(x, y)` containing `position`, if inside the domain
    pub fn find_index(&self, position: &Point2<f64>) -> Option<(usize, usize)> {
        Some((self.axis_index(position.x)?, self.axis_index(position.y)?))
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&TensorCell> {
        if x >= self.count || y >= self.count {
            return None;
        }
        self.cells.get(y * self.count + x)
    }

    pub fn cells(&self) -> &[TensorCell] {
        &self.cells
    }

    /// Cell assigned to the body at `index` by the last rebuild
    pub fn assignment(&self, index: usize) -> Option<(usize, usize)> {
        self.assignments.get(index).copied().flatten()
    }

    /// Re-bins every body; returns the ids of bodies outside the domain
    pub fn rebuild(&mut self, state: &SystemState) -> Vec<BodyId> {
        for cell in &mut self.cells {
            cell.mass = 0.0;
            cell.members.clear();
        }
        self.assignments.clear();

        let mut outside = Vec::new();
        for (index, body) in state.bodies.iter().enumerate() {
            let slot = self.find_index(&body.position);
            match slot {
                Some((x, y)) => {
                    let cell = &mut self.cells[y * self.count + x];
                    cell.mass += body.mass;
                    cell.members.push(index);
                }
                None => outside.push(body.id),
            }
            self.assignments.push(slot);
        }
        outside
    }

    /// Cells within `radius` of `(x, y)` in both axes, clipped to the grid
    pub fn neighborhood(
        &self,
        (x, y): (usize, usize),
        radius: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        let last = self.count - 1;
        let xs = x.saturating_sub(radius)..=(x + radius).min(last);
        let ys = y.saturating_sub(radius)..=(y + radius).min(last);
        ys.flat_map(move |cy| xs.clone().map(move |cx| (cx, cy)))
    }

    /// Gravity sources for bodies in cell `home`.
    ///
    /// Every member of the cells within `radius` comes first, in cell order,
    /// including the members of `home` itself. Each non-empty cell outside
    /// that block follows as one pseudo-body.
    pub fn candidates(&self, home: (usize, usize), radius: usize) -> Vec<Candidate> {
        let mut result: Vec<Candidate> = self
            .neighborhood(home, radius)
            .filter_map(|(x, y)| self.cell(x, y))
            .flat_map(|cell| cell.members.iter().map(|&member| Candidate::Body(member)))
            .collect();

        for (slot, cell) in self.cells.iter().enumerate() {
            let here = (slot % self.count, slot / self.count);
            if cell.mass > 0.0 && !is_near(home, here, radius) {
                result.push(Candidate::Cell {
                    center: cell.center,
                    mass: cell.mass,
                });
            }
        }
        result
    }
}

fn is_near(a: (usize, usize), b: (usize, usize), radius: usize) -> bool {
    a.0.abs_diff(b.0) <= radius && a.1.abs_diff(b.1) <= radius
}

/// Grid-partitioned interaction model
#[derive(Debug, Clone)]
pub struct TensorGridInteraction {
    pub grid: TensorGrid,
    pub near_radius: usize,
}

impl TensorGridInteraction {
    pub fn new(size: f64, count: usize, near_radius: usize) -> Result<Self> {
        Ok(Self {
            grid: TensorGrid::new(size, count)?,
            near_radius,
        })
    }
}

impl InteractionModel for TensorGridInteraction {
    fn prepare(&mut self, state: &SystemState) -> Vec<BodyId> {
        self.grid.rebuild(state)
    }

    fn interactions(&self, state: &SystemState, dt: f64) -> Interactions {
        let bodies = &state.bodies;
        let count = self.grid.count();
        let mut result = Interactions::new(bodies.len());
        // Candidate lists are shared by every body of a cell
        let mut per_cell: Vec<Option<Vec<Candidate>>> = vec![None; count * count];

        for (index, body) in bodies.iter().enumerate() {
            let Some(home) = self.grid.assignment(index) else {
                continue;
            };
            let candidates = per_cell[home.1 * count + home.0]
                .get_or_insert_with(|| self.grid.candidates(home, self.near_radius));

            for candidate in candidates.iter() {
                match *candidate {
                    Candidate::Body(member) => {
                        let Some(other) = bodies.get(member).filter(|_| member != index) else {
                            continue;
                        };
                        if let Some(kick) =
                            gravity_kick(state.g, dt, &body.position, &other.position, other.mass)
                        {
                            result.kicks[index] += kick;
                            result.encounters.push(Encounter {
                                body: body.id,
                                other: other.id,
                            });
                        }
                    }
                    Candidate::Cell { center, mass } => {
                        if let Some(kick) =
                            gravity_kick(state.g, dt, &body.position, &center, mass)
                        {
                            result.kicks[index] += kick;
                        }
                    }
                }
            }
        }

        result
    }
}
