//! Per-particle state — SoA arrays for all particle data.
//!
//! Every array has length N at all times. N changes only through
//! [`Particles::push`] and [`Particles::remove`], which resize every
//! array in lockstep; the arrays are order-significant and index-aligned.

use granum_types::{GranumError, GranumResult, ParticleId};
use serde::{Deserialize, Serialize};

/// SoA particle buffers.
///
/// Arrays are indexed by particle id `0..N-1`. The serialization layer
/// relies on this ordering being stable: the i-th element of every array
/// describes the same particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particles {
    /// Position (m).
    pub pos: Vec<[f64; 3]>,
    /// Radius (m).
    pub radius: Vec<f64>,
    /// Accumulated lateral (xy) displacement, e.g. across periodic
    /// boundaries (m).
    pub lateral_disp: Vec<[f64; 2]>,
    /// Translational velocity (m/s).
    pub vel: Vec<[f64; 3]>,
    /// Fixed-velocity flag. Nonzero pins the horizontal velocity of the
    /// particle; stored as f64 to match the wire format.
    pub fixed_vel: Vec<f64>,
    /// Sum of forces (N).
    pub force: Vec<[f64; 3]>,
    /// Angular position (rad).
    pub ang_pos: Vec<[f64; 3]>,
    /// Angular velocity (rad/s).
    pub ang_vel: Vec<[f64; 3]>,
    /// Sum of torques (N·m).
    pub torque: Vec<[f64; 3]>,
    /// Frictional (shear) dissipation rate (W).
    pub shear_diss_rate: Vec<f64>,
    /// Accumulated frictional dissipation (J).
    pub shear_diss: Vec<f64>,
    /// Viscous dissipation rate (W).
    pub visc_diss_rate: Vec<f64>,
    /// Accumulated viscous dissipation (J).
    pub visc_diss: Vec<f64>,
    /// Pressure on the particle (Pa).
    pub pressure: Vec<f64>,
}

impl Particles {
    /// Allocates buffers for `n` particles.
    ///
    /// Radii default to 1.0 (matching default construction of a fresh
    /// state); every other field is zero.
    pub fn with_count(n: usize) -> Self {
        Self {
            pos: vec![[0.0; 3]; n],
            radius: vec![1.0; n],
            lateral_disp: vec![[0.0; 2]; n],
            vel: vec![[0.0; 3]; n],
            fixed_vel: vec![0.0; n],
            force: vec![[0.0; 3]; n],
            ang_pos: vec![[0.0; 3]; n],
            ang_vel: vec![[0.0; 3]; n],
            torque: vec![[0.0; 3]; n],
            shear_diss_rate: vec![0.0; n],
            shear_diss: vec![0.0; n],
            visc_diss_rate: vec![0.0; n],
            visc_diss: vec![0.0; n],
            pressure: vec![0.0; n],
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    /// True when no particles are present.
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Appends one particle at `pos` with the given radius.
    ///
    /// All remaining fields start zeroed. Returns the new particle's
    /// id.
    pub fn push(&mut self, pos: [f64; 3], radius: f64) -> ParticleId {
        self.pos.push(pos);
        self.radius.push(radius);
        self.lateral_disp.push([0.0; 2]);
        self.vel.push([0.0; 3]);
        self.fixed_vel.push(0.0);
        self.force.push([0.0; 3]);
        self.ang_pos.push([0.0; 3]);
        self.ang_vel.push([0.0; 3]);
        self.torque.push([0.0; 3]);
        self.shear_diss_rate.push(0.0);
        self.shear_diss.push(0.0);
        self.visc_diss_rate.push(0.0);
        self.visc_diss.push(0.0);
        self.pressure.push(0.0);
        ParticleId(self.len() as u32 - 1)
    }

    /// Removes the particle with the given id, shifting later particles
    /// down by one.
    ///
    /// Every array is resized in lockstep. Fails if the id is out of
    /// range.
    pub fn remove(&mut self, id: ParticleId) -> GranumResult<()> {
        let i = id.index();
        if i >= self.len() {
            return Err(GranumError::InvalidState(format!(
                "cannot remove particle {i}: only {} present",
                self.len()
            )));
        }
        self.pos.remove(i);
        self.radius.remove(i);
        self.lateral_disp.remove(i);
        self.vel.remove(i);
        self.fixed_vel.remove(i);
        self.force.remove(i);
        self.ang_pos.remove(i);
        self.ang_vel.remove(i);
        self.torque.remove(i);
        self.shear_diss_rate.remove(i);
        self.shear_diss.remove(i);
        self.visc_diss_rate.remove(i);
        self.visc_diss.remove(i);
        self.pressure.remove(i);
        Ok(())
    }

    /// Checks that every array has the same length.
    pub fn validate(&self) -> GranumResult<()> {
        let n = self.len();
        let lengths = [
            ("radius", self.radius.len()),
            ("lateral_disp", self.lateral_disp.len()),
            ("vel", self.vel.len()),
            ("fixed_vel", self.fixed_vel.len()),
            ("force", self.force.len()),
            ("ang_pos", self.ang_pos.len()),
            ("ang_vel", self.ang_vel.len()),
            ("torque", self.torque.len()),
            ("shear_diss_rate", self.shear_diss_rate.len()),
            ("shear_diss", self.shear_diss.len()),
            ("visc_diss_rate", self.visc_diss_rate.len()),
            ("visc_diss", self.visc_diss.len()),
            ("pressure", self.pressure.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(GranumError::InvalidState(format!(
                    "particle array '{name}' has length {len}, expected {n}"
                )));
            }
        }
        Ok(())
    }

    /// Lowest z coordinate of any particle surface (`z - r`).
    pub fn z_min(&self) -> Option<f64> {
        self.pos
            .iter()
            .zip(&self.radius)
            .map(|(p, r)| p[2] - r)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
    }

    /// Highest z coordinate of any particle surface (`z + r`).
    pub fn z_max(&self) -> Option<f64> {
        self.pos
            .iter()
            .zip(&self.radius)
            .map(|(p, r)| p[2] + r)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }

    /// Zeroes velocities, angular velocities, and angular positions.
    ///
    /// Used by the experiment setup operations before handing the state
    /// to the simulator.
    pub fn zero_kinematics(&mut self) {
        for v in &mut self.vel {
            *v = [0.0; 3];
        }
        for w in &mut self.ang_vel {
            *w = [0.0; 3];
        }
        for a in &mut self.ang_pos {
            *a = [0.0; 3];
        }
    }
}
