//! Bulk metrics over a state: energy accounting and packing measures.

use granum_types::{GranumError, GranumResult};
use std::f64::consts::PI;

use crate::state::SimState;

/// Energy components summed over all particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyTerm {
    /// Gravitational potential energy.
    Potential,
    /// Translational kinetic energy.
    Kinetic,
    /// Rotational kinetic energy.
    Rotational,
    /// Accumulated frictional (shear) dissipation.
    ShearDissipation,
    /// Current frictional dissipation rate.
    ShearDissipationRate,
    /// Accumulated viscous dissipation.
    ViscousDissipation,
    /// Current viscous dissipation rate.
    ViscousDissipationRate,
}

impl SimState {
    /// Mass of particle `i` from its radius and the material density.
    pub fn particle_mass(&self, i: usize) -> f64 {
        4.0 / 3.0 * PI * self.particles.radius[i].powi(3) * self.params.rho
    }

    /// Sum of the given energy component over all particles (J or W).
    pub fn energy(&self, term: EnergyTerm) -> f64 {
        let p = &self.particles;
        match term {
            EnergyTerm::Potential => {
                let g = self.params.g;
                let g_mag = (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt();
                (0..p.len())
                    .map(|i| self.particle_mass(i) * g_mag * p.pos[i][2])
                    .sum()
            }
            EnergyTerm::Kinetic => (0..p.len())
                .map(|i| {
                    let v = p.vel[i];
                    0.5 * self.particle_mass(i) * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2])
                })
                .sum(),
            EnergyTerm::Rotational => (0..p.len())
                .map(|i| {
                    let w = p.ang_vel[i];
                    let r = p.radius[i];
                    // Moment of inertia of a solid sphere: 2/5 m r².
                    0.5 * (2.0 / 5.0)
                        * self.particle_mass(i)
                        * r
                        * r
                        * (w[0] * w[0] + w[1] * w[1] + w[2] * w[2])
                })
                .sum(),
            EnergyTerm::ShearDissipation => p.shear_diss.iter().sum(),
            EnergyTerm::ShearDissipationRate => p.shear_diss_rate.iter().sum(),
            EnergyTerm::ViscousDissipation => p.visc_diss.iter().sum(),
            EnergyTerm::ViscousDissipationRate => p.visc_diss_rate.iter().sum(),
        }
    }

    /// Void ratio of the packing under the top wall:
    /// (bulk volume − solid volume) / solid volume.
    ///
    /// Requires a top wall to bound the bulk volume.
    pub fn void_ratio(&self) -> GranumResult<f64> {
        if self.walls.is_empty() {
            return Err(GranumError::InvalidState(
                "void ratio needs the top wall to bound the bulk volume".into(),
            ));
        }
        let o = self.world.origin;
        let l = self.world.extent;
        let bulk = (l[0] - o[0]) * (l[1] - o[1]) * (self.walls.pos[0] - o[2]);

        let solid: f64 = self
            .particles
            .radius
            .iter()
            .map(|r| 4.0 / 3.0 * PI * r.powi(3))
            .sum();
        if solid <= 0.0 {
            return Err(GranumError::InvalidState(
                "void ratio needs a nonzero solid volume".into(),
            ));
        }
        Ok((bulk - solid) / solid)
    }
}
