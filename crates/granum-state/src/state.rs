//! The complete simulation state record.
//!
//! A `SimState` describes one simulation instant. It is constructed
//! fresh (zeroed) or by decoding a snapshot, mutated by the setup
//! operations, encoded once as the simulator's input, and thereafter
//! only decoded from the simulator's numbered output snapshots.

use granum_types::GranumResult;
use serde::{Deserialize, Serialize};

use crate::bonds::BondGraph;
use crate::fluid::FluidGrid;
use crate::params::MaterialParams;
use crate::particles::Particles;
use crate::walls::Walls;
use crate::world::WorldGrid;

/// Temporal parameters. Invariant to the particle count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Temporal {
    /// Computational timestep length (s).
    pub dt: f64,
    /// Current simulation time (s).
    pub current: f64,
    /// Total target time (s).
    pub total: f64,
    /// Time between output files (s).
    pub file_interval: f64,
    /// Number of output files written so far.
    pub step_count: u32,
}

/// The complete description of one simulation instant.
///
/// Exact structural equality (`==`) is derived field-by-field through
/// every component type; it is the round-trip correctness contract.
/// For states produced by a different floating-point code path, use
/// [`SimState::approx_eq`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    /// World dimensions and neighbor-search grid.
    pub world: WorldGrid,
    /// Temporal parameters.
    pub time: Temporal,
    /// Per-particle arrays.
    pub particles: Particles,
    /// Global material parameters.
    pub params: MaterialParams,
    /// Per-wall arrays and stress-oscillation parameters.
    pub walls: Walls,
    /// Bond graph; `None` when bonds are disabled.
    pub bonds: Option<BondGraph>,
    /// Fluid grid; `None` when the fluid solver is disabled.
    pub fluid: Option<FluidGrid>,
}

impl SimState {
    /// Creates a zeroed, internally-consistent state with `np` particles
    /// and `nw` walls.
    ///
    /// Radii default to 1.0; material parameters to their standard
    /// values; wall 0 (when present) gets the conventional top-wall
    /// normal (0,0,−1). Bonds and fluid start disabled.
    pub fn new(np: usize, nw: usize) -> GranumResult<Self> {
        Ok(Self {
            world: WorldGrid::zeroed(),
            time: Temporal::default(),
            particles: Particles::with_count(np),
            params: MaterialParams::default(),
            walls: Walls::with_count(nw)?,
            bonds: None,
            fluid: None,
        })
    }

    /// Number of particles.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Number of walls.
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Number of bonds (zero when bonds are disabled).
    pub fn bond_count(&self) -> usize {
        self.bonds.as_ref().map_or(0, BondGraph::len)
    }

    /// True when the fluid grid is present.
    pub fn fluid_enabled(&self) -> bool {
        self.fluid.is_some()
    }

    /// Checks every structural invariant:
    /// lockstep per-particle array lengths, wall-count bound and lockstep
    /// wall arrays, bond endpoint validity, and fluid grid shape against
    /// the world cell counts.
    pub fn validate(&self) -> GranumResult<()> {
        self.particles.validate()?;
        self.walls.validate()?;
        if let Some(ref bonds) = self.bonds {
            bonds.validate(self.particle_count())?;
        }
        if let Some(ref fluid) = self.fluid {
            fluid.validate(self.world.cells)?;
        }
        Ok(())
    }

    /// Element-wise comparison with an absolute tolerance on every
    /// floating-point field. Integer fields, enums, counts, and section
    /// presence must match exactly.
    ///
    /// Intended for comparing a locally-produced state against one
    /// produced by the external simulator's own I/O path; never use it
    /// to test this crate's round trip, which must be exact.
    pub fn approx_eq(&self, other: &SimState, tol: f64) -> bool {
        if self.particle_count() != other.particle_count()
            || self.wall_count() != other.wall_count()
            || self.bond_count() != other.bond_count()
            || self.fluid_enabled() != other.fluid_enabled()
        {
            return false;
        }

        let close = |a: f64, b: f64| (a - b).abs() <= tol;
        let close3 = |a: &[f64; 3], b: &[f64; 3]| {
            close(a[0], b[0]) && close(a[1], b[1]) && close(a[2], b[2])
        };
        let close_slice = |a: &[f64], b: &[f64]| a.iter().zip(b).all(|(x, y)| close(*x, *y));
        let close_slice3 =
            |a: &[[f64; 3]], b: &[[f64; 3]]| a.iter().zip(b).all(|(x, y)| close3(x, y));

        // World
        if !close3(&self.world.origin, &other.world.origin)
            || !close3(&self.world.extent, &other.world.extent)
            || self.world.cells != other.world.cells
            || self.world.periodic != other.world.periodic
        {
            return false;
        }

        // Time
        if !close(self.time.dt, other.time.dt)
            || !close(self.time.current, other.time.current)
            || !close(self.time.total, other.time.total)
            || !close(self.time.file_interval, other.time.file_interval)
            || self.time.step_count != other.time.step_count
        {
            return false;
        }

        // Particles
        let p = &self.particles;
        let q = &other.particles;
        if !close_slice3(&p.pos, &q.pos)
            || !close_slice(&p.radius, &q.radius)
            || !p
                .lateral_disp
                .iter()
                .zip(&q.lateral_disp)
                .all(|(a, b)| close(a[0], b[0]) && close(a[1], b[1]))
            || !close_slice3(&p.vel, &q.vel)
            || !close_slice(&p.fixed_vel, &q.fixed_vel)
            || !close_slice3(&p.force, &q.force)
            || !close_slice3(&p.ang_pos, &q.ang_pos)
            || !close_slice3(&p.ang_vel, &q.ang_vel)
            || !close_slice3(&p.torque, &q.torque)
            || !close_slice(&p.shear_diss_rate, &q.shear_diss_rate)
            || !close_slice(&p.shear_diss, &q.shear_diss)
            || !close_slice(&p.visc_diss_rate, &q.visc_diss_rate)
            || !close_slice(&p.visc_diss, &q.visc_diss)
            || !close_slice(&p.pressure, &q.pressure)
        {
            return false;
        }

        // Material parameters
        let a = &self.params;
        let b = &other.params;
        if !close3(&a.g, &b.g)
            || !close(a.k_n, b.k_n)
            || !close(a.k_t, b.k_t)
            || !close(a.k_r, b.k_r)
            || !close(a.gamma_n, b.gamma_n)
            || !close(a.gamma_t, b.gamma_t)
            || !close(a.gamma_r, b.gamma_r)
            || !close(a.mu_s, b.mu_s)
            || !close(a.mu_d, b.mu_d)
            || !close(a.mu_r, b.mu_r)
            || !close(a.gamma_wn, b.gamma_wn)
            || !close(a.gamma_wt, b.gamma_wt)
            || !close(a.mu_ws, b.mu_ws)
            || !close(a.mu_wd, b.mu_wd)
            || !close(a.rho, b.rho)
            || a.contact_model != b.contact_model
            || !close(a.kappa, b.kappa)
            || !close(a.debond_dist, b.debond_dist)
            || !close(a.v_b, b.v_b)
            || !close(a.nu, b.nu)
        {
            return false;
        }

        // Walls
        let v = &self.walls;
        let w = &other.walls;
        if v.mode != w.mode
            || !close_slice3(&v.normal, &w.normal)
            || !close_slice(&v.pos, &w.pos)
            || !close_slice(&v.mass, &w.mass)
            || !close_slice(&v.vel, &w.vel)
            || !close_slice(&v.force, &w.force)
            || !close_slice(&v.stress_target, &w.stress_target)
            || !close(v.osc_amplitude, w.osc_amplitude)
            || !close(v.osc_frequency, w.osc_frequency)
        {
            return false;
        }

        // Bonds
        match (&self.bonds, &other.bonds) {
            (Some(x), Some(y)) => {
                if x.pairs != y.pairs
                    || !close(x.radius_multiplier, y.radius_multiplier)
                    || !close(x.strength_normal, y.strength_normal)
                    || !close(x.strength_shear, y.strength_shear)
                    || !close_slice(&x.normal_disp, &y.normal_disp)
                    || !close_slice3(&x.tangential_disp, &y.tangential_disp)
                    || !close_slice(&x.normal_rot, &y.normal_rot)
                    || !close_slice3(&x.tangential_rot, &y.tangential_rot)
                {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }

        // Fluid
        match (&self.fluid, &other.fluid) {
            (Some(x), Some(y)) => {
                if x.cells != y.cells
                    || !close_slice3(&x.velocity, &y.velocity)
                    || !close_slice(&x.pressure, &y.pressure)
                    || !close_slice(&x.porosity, &y.porosity)
                    || !close_slice(&x.porosity_rate, &y.porosity_rate)
                {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }

        true
    }

    /// Enables bonding with an empty bond graph, if not already enabled.
    pub fn enable_bonds(&mut self) -> &mut BondGraph {
        self.bonds.get_or_insert_with(BondGraph::new)
    }
}
