//! Fluid grid — a fixed-resolution Eulerian grid co-located with the
//! particle domain.
//!
//! Cells are stored flattened with x varying fastest, then y, then z,
//! matching the wire iteration order.

use granum_types::{GranumError, GranumResult};
use serde::{Deserialize, Serialize};

/// Per-cell fluid fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidGrid {
    /// Cells along each axis; must equal the world grid cell counts.
    pub cells: [u32; 3],
    /// Cell fluid velocity (m/s).
    pub velocity: Vec<[f64; 3]>,
    /// Cell hydraulic pressure (Pa).
    pub pressure: Vec<f64>,
    /// Cell porosity (dimensionless).
    pub porosity: Vec<f64>,
    /// Cell porosity time derivative (1/s).
    pub porosity_rate: Vec<f64>,
}

impl FluidGrid {
    /// Allocates an all-zero grid of the given shape.
    pub fn zeroed(cells: [u32; 3]) -> Self {
        let n = Self::count(cells);
        Self {
            cells,
            velocity: vec![[0.0; 3]; n],
            pressure: vec![0.0; n],
            porosity: vec![0.0; n],
            porosity_rate: vec![0.0; n],
        }
    }

    /// Allocates a grid at rest: uniform pressure, zero velocity,
    /// porosity 1, zero porosity rate.
    pub fn uniform(cells: [u32; 3], pressure: f64) -> Self {
        let n = Self::count(cells);
        Self {
            cells,
            velocity: vec![[0.0; 3]; n],
            pressure: vec![pressure; n],
            porosity: vec![1.0; n],
            porosity_rate: vec![0.0; n],
        }
    }

    fn count(cells: [u32; 3]) -> usize {
        cells[0] as usize * cells[1] as usize * cells[2] as usize
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        Self::count(self.cells)
    }

    /// Flat index of cell (x, y, z).
    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.cells[1] as usize + y) * self.cells[0] as usize + x
    }

    /// Checks the grid shape against the world cell counts and the
    /// per-field allocation against the shape.
    pub fn validate(&self, world_cells: [u32; 3]) -> GranumResult<()> {
        if self.cells != world_cells {
            return Err(GranumError::InvalidState(format!(
                "fluid grid shape {:?} does not match world cells {:?}",
                self.cells, world_cells
            )));
        }
        let n = self.cell_count();
        let lengths = [
            ("velocity", self.velocity.len()),
            ("pressure", self.pressure.len()),
            ("porosity", self.porosity.len()),
            ("porosity_rate", self.porosity_rate.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(GranumError::InvalidState(format!(
                    "fluid array '{name}' has length {len}, expected {n}"
                )));
            }
        }
        Ok(())
    }
}
