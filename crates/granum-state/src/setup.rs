//! Experiment setup operations.
//!
//! These mutate a populated state in place before the initial encode:
//! they rescale the grid to the particle extent, install boundary walls,
//! pin particle bands, and derive the stable timestep. Particle
//! positions and radii must be set before any of them run.

use granum_types::constants::TIMESTEP_SAFETY;
use granum_types::{GranumError, GranumResult};
use std::f64::consts::PI;

use crate::fluid::FluidGrid;
use crate::state::SimState;
use crate::walls::{WallMode, Walls};

/// Grid overheight factor for consolidation-type experiments.
const CONSOLIDATION_OVERHEIGHT: f64 = 1.1;

/// Grid overheight factor for shear experiments, which need headroom
/// for dilation.
const SHEAR_OVERHEIGHT: f64 = 1.3;

impl SimState {
    /// Sets the temporal block and derives the computational timestep
    /// from the smallest particle mass and the stiffest contact
    /// (O'Sullivan et al., 2003).
    ///
    /// Radii and material parameters must be set first.
    pub fn init_temporal(
        &mut self,
        total: f64,
        current: f64,
        file_interval: f64,
    ) -> GranumResult<()> {
        let r_min = self
            .particles
            .radius
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if !r_min.is_finite() || r_min <= 0.0 {
            return Err(GranumError::InvalidState(
                "timestep derivation needs at least one particle with a positive radius".into(),
            ));
        }
        let k_max = self.params.k_n.max(self.params.k_t);
        if k_max <= 0.0 {
            return Err(GranumError::InvalidState(
                "timestep derivation needs a positive contact stiffness".into(),
            ));
        }

        let m_min = 4.0 / 3.0 * PI * r_min.powi(3) * self.params.rho;
        self.time.dt = TIMESTEP_SAFETY * (m_min / k_max).sqrt();
        self.time.current = current;
        self.time.total = total;
        self.time.file_interval = file_interval;
        self.time.step_count = 0;
        Ok(())
    }

    /// Rescales the grid height to the vertical particle extent times
    /// `overheight`, returning (z_min, z_max, cell size).
    fn fit_grid_to_particles(&mut self, overheight: f64) -> GranumResult<(f64, f64, f64)> {
        let (Some(z_min), Some(z_max)) = (self.particles.z_min(), self.particles.z_max()) else {
            return Err(GranumError::InvalidState(
                "grid rescale needs at least one particle".into(),
            ));
        };
        let cell_size = self.world.cell_size();
        if cell_size <= 0.0 {
            return Err(GranumError::InvalidState(
                "grid rescale needs a positive horizontal cell size".into(),
            ));
        }
        let height = (z_max - z_min) * overheight;
        self.world.cells[2] = (height / cell_size).ceil() as u32;
        self.world.extent[2] = height;
        Ok((z_min, z_max, cell_size))
    }

    /// Wall mass heuristic: the mass of the particle ensemble as if each
    /// particle filled half a grid cell.
    fn derived_wall_mass(&self, cell_size: f64) -> f64 {
        self.params.rho * self.particle_count() as f64 * PI * (cell_size / 2.0).powi(3)
    }

    /// Configures a consolidation experiment: grid fitted to the
    /// particle extent, kinematics zeroed, and a single stress-controlled
    /// top wall pushing down with the given deviatoric stress (Pa).
    pub fn setup_consolidation(&mut self, stress: f64) -> GranumResult<()> {
        let (_, _, cell_size) = self.fit_grid_to_particles(CONSOLIDATION_OVERHEIGHT)?;
        self.particles.zero_kinematics();

        let mass = self.derived_wall_mass(cell_size);
        let mut walls = Walls::empty();
        walls.push(
            WallMode::StressControlled,
            [0.0, 0.0, -1.0],
            self.world.extent[2],
            mass,
            0.0,
            stress,
        )?;
        self.walls = walls;
        Ok(())
    }

    /// Configures uniaxial compression under a constant strain rate:
    /// like consolidation, but the top wall moves at `wall_velocity`
    /// (m/s, negative = downward) instead of tracking a stress target.
    pub fn setup_uniaxial_strain_rate(&mut self, wall_velocity: f64) -> GranumResult<()> {
        let (_, _, cell_size) = self.fit_grid_to_particles(CONSOLIDATION_OVERHEIGHT)?;
        self.particles.zero_kinematics();

        let mass = self.derived_wall_mass(cell_size);
        let mut walls = Walls::empty();
        walls.push(
            WallMode::VelocityControlled,
            [0.0, 0.0, -1.0],
            self.world.extent[2],
            mass,
            wall_velocity,
            0.0,
        )?;
        self.walls = walls;
        Ok(())
    }

    /// Configures a shear experiment on a consolidated state.
    ///
    /// Requires the top wall from a prior consolidation. Fixes the
    /// horizontal velocity of the bottom particle band to zero and of
    /// the top band to the shear velocity implied by `strain_rate`
    /// (shear length over initial height, per second). Wall contact
    /// viscosities are zeroed and the lateral-displacement accumulators
    /// reset.
    pub fn setup_shear(&mut self, stress: f64, strain_rate: f64) -> GranumResult<()> {
        if self.walls.is_empty() {
            return Err(GranumError::InvalidState(
                "shear setup requires the top wall from a prior consolidation".into(),
            ));
        }
        let (z_min, z_max, cell_size) = self.fit_grid_to_particles(SHEAR_OVERHEIGHT)?;
        self.walls.stress_target[0] = stress;
        self.particles.zero_kinematics();

        // Two cell layers of particles are pinned at top and bottom.
        let band = 2.0 * cell_size;
        let shear_vel = (z_max - z_min) * strain_rate;
        for i in 0..self.particles.len() {
            let z = self.particles.pos[i][2];
            if z < z_min + band {
                self.particles.fixed_vel[i] = 1.0;
                self.particles.vel[i][0] = 0.0;
                self.particles.vel[i][1] = 0.0;
                self.particles.ang_vel[i] = [0.0; 3];
            } else if z > z_max - band {
                self.particles.fixed_vel[i] = 1.0;
                self.particles.vel[i][0] = shear_vel;
                self.particles.vel[i][1] = 0.0;
                self.particles.ang_vel[i] = [0.0; 3];
            }
        }

        for d in &mut self.particles.lateral_disp {
            *d = [0.0; 2];
        }
        self.params.gamma_wn = 0.0;
        self.params.gamma_wt = 0.0;
        Ok(())
    }

    /// Configures a triaxial experiment: a velocity-controlled top wall
    /// plus four stress-controlled lateral walls holding the given
    /// confining stress (Pa).
    ///
    /// Wall order and normals are fixed: 0 = top (0,0,−1),
    /// 1 = x− (1,0,0), 2 = x+ (−1,0,0), 3 = y− (0,1,0), 4 = y+ (0,−1,0).
    pub fn setup_triaxial(&mut self, stress: f64, wall_velocity: f64) -> GranumResult<()> {
        let (_, _, cell_size) = self.fit_grid_to_particles(CONSOLIDATION_OVERHEIGHT)?;
        self.particles.zero_kinematics();

        let mass = self.derived_wall_mass(cell_size);
        let o = self.world.origin;
        let l = self.world.extent;

        let mut walls = Walls::empty();
        walls.push(
            WallMode::VelocityControlled,
            [0.0, 0.0, -1.0],
            l[2],
            mass,
            wall_velocity,
            0.0,
        )?;
        let lateral: [([f64; 3], f64); 4] = [
            ([1.0, 0.0, 0.0], o[0]),
            ([-1.0, 0.0, 0.0], o[0] + l[0]),
            ([0.0, 1.0, 0.0], o[1]),
            ([0.0, -1.0, 0.0], o[1] + l[1]),
        ];
        for (normal, pos) in lateral {
            walls.push(WallMode::StressControlled, normal, pos, mass, 0.0, stress)?;
        }
        self.walls = walls;
        Ok(())
    }

    /// Enables the coupled fluid solver: allocates the fluid grid to the
    /// world cell counts with uniform pressure, fluid at rest, porosity
    /// 1, and sets the global kinematic viscosity.
    pub fn init_fluid(&mut self, pressure: f64, viscosity: f64) -> GranumResult<()> {
        if self.world.cell_count() == 0 {
            return Err(GranumError::InvalidState(
                "fluid init requires a nonempty world grid".into(),
            ));
        }
        self.fluid = Some(FluidGrid::uniform(self.world.cells, pressure));
        self.params.nu = viscosity;
        Ok(())
    }
}
