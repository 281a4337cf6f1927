//! World geometry — origin, extent, and the neighbor-search grid.

use granum_types::{GranumError, GranumResult};
use serde::{Deserialize, Serialize};

/// Boundary behavior at the first and second world edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    /// Fixed boundaries on all axes.
    None,
    /// Periodic boundaries along both horizontal axes (x and y).
    Horizontal,
    /// Periodic boundary along x only.
    XOnly,
}

impl Periodicity {
    /// Wire representation (int32).
    pub fn to_wire(self) -> i32 {
        match self {
            Periodicity::None => 0,
            Periodicity::Horizontal => 1,
            Periodicity::XOnly => 2,
        }
    }

    /// Parses the wire representation.
    pub fn from_wire(val: i32) -> GranumResult<Self> {
        match val {
            0 => Ok(Periodicity::None),
            1 => Ok(Periodicity::Horizontal),
            2 => Ok(Periodicity::XOnly),
            other => Err(GranumError::Decoding(format!(
                "unknown periodicity mode {other}"
            ))),
        }
    }
}

/// World dimensions and neighbor-search grid.
///
/// The grid cell counts also fix the shape of the fluid grid when the
/// fluid solver is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldGrid {
    /// Coordinate of the lower corner of the world (m).
    pub origin: [f64; 3],
    /// World edge lengths measured from the origin (m).
    pub extent: [f64; 3],
    /// Neighbor-search cells along each axis.
    pub cells: [u32; 3],
    /// Boundary behavior at the world edges.
    pub periodic: Periodicity,
}

impl WorldGrid {
    /// A zero-extent world with no cells and fixed boundaries.
    pub fn zeroed() -> Self {
        Self {
            origin: [0.0; 3],
            extent: [0.0; 3],
            cells: [0; 3],
            periodic: Periodicity::None,
        }
    }

    /// Edge length of one grid cell along x.
    ///
    /// The grid is built from cubic cells, so this is the cell size
    /// used when deriving wall masses and fixed particle bands.
    pub fn cell_size(&self) -> f64 {
        if self.cells[0] == 0 {
            0.0
        } else {
            self.extent[0] / self.cells[0] as f64
        }
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.cells[0] as usize * self.cells[1] as usize * self.cells[2] as usize
    }
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self::zeroed()
    }
}
