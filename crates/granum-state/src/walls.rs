//! Planar simulation boundaries ("walls").
//!
//! Walls are indexed 0..W-1 with fixed semantics when present:
//! wall 0 is the top wall (normal (0,0,−1)), walls 1/2 bound the domain
//! laterally along x, walls 3/4 along y.

use granum_types::constants::MAX_WALLS;
use granum_types::{GranumError, GranumResult, WallId};
use serde::{Deserialize, Serialize};

/// Wall boundary-condition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallMode {
    /// The wall does not move.
    Fixed,
    /// The wall moves to maintain a deviatoric-stress target.
    StressControlled,
    /// The wall moves at its prescribed velocity.
    VelocityControlled,
}

impl WallMode {
    /// Wire representation (int32).
    pub fn to_wire(self) -> i32 {
        match self {
            WallMode::Fixed => 0,
            WallMode::StressControlled => 1,
            WallMode::VelocityControlled => 2,
        }
    }

    /// Parses the wire representation.
    pub fn from_wire(val: i32) -> GranumResult<Self> {
        match val {
            0 => Ok(WallMode::Fixed),
            1 => Ok(WallMode::StressControlled),
            2 => Ok(WallMode::VelocityControlled),
            other => Err(GranumError::Decoding(format!("unknown wall mode {other}"))),
        }
    }
}

/// Per-wall arrays plus the two global stress-oscillation parameters.
///
/// Each wall moves along its normal axis only; `pos`, `vel`, and `force`
/// are scalars along that axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Walls {
    /// Boundary-condition mode per wall.
    pub mode: Vec<WallMode>,
    /// Wall normal, pointing into the domain.
    pub normal: Vec<[f64; 3]>,
    /// Wall position along its normal axis (m).
    pub pos: Vec<f64>,
    /// Wall mass (kg).
    pub mass: Vec<f64>,
    /// Wall velocity along its normal axis (m/s).
    pub vel: Vec<f64>,
    /// Sum of particle forces on the wall (N).
    pub force: Vec<f64>,
    /// Deviatoric-stress target for stress-controlled walls (Pa).
    pub stress_target: Vec<f64>,
    /// Amplitude of sinusoidal modulation of the stress target (Pa).
    pub osc_amplitude: f64,
    /// Frequency of the stress modulation (Hz).
    pub osc_frequency: f64,
}

impl Walls {
    /// No walls, no oscillation.
    pub fn empty() -> Self {
        Self {
            mode: Vec::new(),
            normal: Vec::new(),
            pos: Vec::new(),
            mass: Vec::new(),
            vel: Vec::new(),
            force: Vec::new(),
            stress_target: Vec::new(),
            osc_amplitude: 0.0,
            osc_frequency: 0.0,
        }
    }

    /// Allocates `n` fixed walls with default geometry.
    ///
    /// Wall 0, when present, gets the conventional top-wall normal
    /// (0,0,−1) and position 1.0.
    pub fn with_count(n: usize) -> GranumResult<Self> {
        if n > MAX_WALLS {
            return Err(GranumError::InvalidState(format!(
                "wall count {n} exceeds maximum {MAX_WALLS}"
            )));
        }
        let mut walls = Self {
            mode: vec![WallMode::Fixed; n],
            normal: vec![[0.0; 3]; n],
            pos: vec![1.0; n],
            mass: vec![0.0; n],
            vel: vec![0.0; n],
            force: vec![0.0; n],
            stress_target: vec![0.0; n],
            osc_amplitude: 0.0,
            osc_frequency: 0.0,
        };
        if n > 0 {
            walls.normal[0] = [0.0, 0.0, -1.0];
        }
        Ok(walls)
    }

    /// Number of walls.
    pub fn len(&self) -> usize {
        self.mode.len()
    }

    /// True when no walls are present.
    pub fn is_empty(&self) -> bool {
        self.mode.is_empty()
    }

    /// Appends a wall. Fails when the wall limit is reached.
    pub fn push(
        &mut self,
        mode: WallMode,
        normal: [f64; 3],
        pos: f64,
        mass: f64,
        vel: f64,
        stress_target: f64,
    ) -> GranumResult<WallId> {
        if self.len() >= MAX_WALLS {
            return Err(GranumError::InvalidState(format!(
                "cannot add wall: maximum of {MAX_WALLS} reached"
            )));
        }
        self.mode.push(mode);
        self.normal.push(normal);
        self.pos.push(pos);
        self.mass.push(mass);
        self.vel.push(vel);
        self.force.push(0.0);
        self.stress_target.push(stress_target);
        Ok(WallId(self.len() as u32 - 1))
    }

    /// Checks the wall-count bound and lockstep array lengths.
    pub fn validate(&self) -> GranumResult<()> {
        let w = self.len();
        if w > MAX_WALLS {
            return Err(GranumError::InvalidState(format!(
                "wall count {w} exceeds maximum {MAX_WALLS}"
            )));
        }
        let lengths = [
            ("normal", self.normal.len()),
            ("pos", self.pos.len()),
            ("mass", self.mass.len()),
            ("vel", self.vel.len()),
            ("force", self.force.len()),
            ("stress_target", self.stress_target.len()),
        ];
        for (name, len) in lengths {
            if len != w {
                return Err(GranumError::InvalidState(format!(
                    "wall array '{name}' has length {len}, expected {w}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::empty()
    }
}
