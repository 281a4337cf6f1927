//! Persistent cohesive bonds between particle pairs.
//!
//! A bond carries accumulated relative-displacement and relative-rotation
//! state, independent of ordinary contact forces. Bonds are kept in
//! insertion order; the serializer writes them verbatim, which makes the
//! round trip exact.

use granum_types::{BondId, GranumError, GranumResult, ParticleId};
use serde::{Deserialize, Serialize};

/// The bond graph plus its global strength parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondGraph {
    /// Radius multiplier applied to parallel-bond radii.
    pub radius_multiplier: f64,
    /// Tensile strength threshold (Pa).
    pub strength_normal: f64,
    /// Shear strength threshold (Pa).
    pub strength_shear: f64,
    /// Bonded particle pairs (i, j), unordered but stored as given.
    pub pairs: Vec<[u32; 2]>,
    /// Accumulated normal relative displacement per bond (m).
    pub normal_disp: Vec<f64>,
    /// Accumulated tangential relative displacement per bond (m).
    pub tangential_disp: Vec<[f64; 3]>,
    /// Accumulated normal relative rotation per bond (rad).
    pub normal_rot: Vec<f64>,
    /// Accumulated tangential relative rotation per bond (rad).
    pub tangential_rot: Vec<[f64; 3]>,
}

impl BondGraph {
    /// An empty bond graph with unit radius multiplier.
    pub fn new() -> Self {
        Self {
            radius_multiplier: 1.0,
            strength_normal: 0.0,
            strength_shear: 0.0,
            pairs: Vec::new(),
            normal_disp: Vec::new(),
            tangential_disp: Vec::new(),
            normal_rot: Vec::new(),
            tangential_rot: Vec::new(),
        }
    }

    /// Number of bonds.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no bonds exist.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Bonds particles `i` and `j` with zeroed accumulators.
    ///
    /// Endpoints must be distinct; range validity against the particle
    /// count is checked by [`BondGraph::validate`].
    pub fn add_bond(&mut self, i: ParticleId, j: ParticleId) -> GranumResult<BondId> {
        if i == j {
            return Err(GranumError::InvalidState(format!(
                "bond endpoints must differ, got ({}, {})",
                i.0, j.0
            )));
        }
        self.pairs.push([i.0, j.0]);
        self.normal_disp.push(0.0);
        self.tangential_disp.push([0.0; 3]);
        self.normal_rot.push(0.0);
        self.tangential_rot.push([0.0; 3]);
        Ok(BondId(self.len() as u32 - 1))
    }

    /// Checks lockstep lengths and endpoint validity against the
    /// particle count.
    pub fn validate(&self, particle_count: usize) -> GranumResult<()> {
        let b = self.len();
        let lengths = [
            ("normal_disp", self.normal_disp.len()),
            ("tangential_disp", self.tangential_disp.len()),
            ("normal_rot", self.normal_rot.len()),
            ("tangential_rot", self.tangential_rot.len()),
        ];
        for (name, len) in lengths {
            if len != b {
                return Err(GranumError::InvalidState(format!(
                    "bond array '{name}' has length {len}, expected {b}"
                )));
            }
        }
        for (idx, pair) in self.pairs.iter().enumerate() {
            let [i, j] = *pair;
            if i == j {
                return Err(GranumError::InvalidState(format!(
                    "bond {idx} joins particle {i} to itself"
                )));
            }
            if i as usize >= particle_count || j as usize >= particle_count {
                return Err(GranumError::InvalidState(format!(
                    "bond {idx} endpoint ({i}, {j}) out of range for {particle_count} particles"
                )));
            }
        }
        Ok(())
    }
}

impl Default for BondGraph {
    fn default() -> Self {
        Self::new()
    }
}
