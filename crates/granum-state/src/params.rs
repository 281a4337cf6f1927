//! Global material parameters.
//!
//! Scalars shared by all particles: contact stiffnesses and viscosities,
//! friction coefficients, wall contact parameters, density, the contact
//! model selector, capillary-bond parameters, and the fluid viscosity.

use granum_types::constants;
use granum_types::{GranumError, GranumResult};
use serde::{Deserialize, Serialize};

/// Inter-particle contact model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactModel {
    /// Visco-frictional normal contact, no tangential elasticity.
    ViscoFrictional,
    /// Elastic-visco-frictional contact with tangential and rolling
    /// stiffness.
    ElasticViscoFrictional,
}

impl ContactModel {
    /// Wire representation (uint32).
    pub fn to_wire(self) -> u32 {
        match self {
            ContactModel::ViscoFrictional => 1,
            ContactModel::ElasticViscoFrictional => 2,
        }
    }

    /// Parses the wire representation.
    pub fn from_wire(val: u32) -> GranumResult<Self> {
        match val {
            1 => Ok(ContactModel::ViscoFrictional),
            2 => Ok(ContactModel::ElasticViscoFrictional),
            other => Err(GranumError::Decoding(format!(
                "unknown contact model {other}"
            ))),
        }
    }
}

/// Constant, global physical parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialParams {
    /// Gravitational acceleration (m/s²).
    pub g: [f64; 3],
    /// Contact normal stiffness (N/m).
    pub k_n: f64,
    /// Contact tangential stiffness (N/m).
    pub k_t: f64,
    /// Contact rolling stiffness (N/m).
    pub k_r: f64,
    /// Contact normal viscosity (Ns/m). Zero gives a purely elastic
    /// normal force.
    pub gamma_n: f64,
    /// Contact tangential viscosity (Ns/m).
    pub gamma_t: f64,
    /// Contact rolling viscosity (Ns/m).
    pub gamma_r: f64,
    /// Static friction coefficient.
    pub mu_s: f64,
    /// Dynamic friction coefficient.
    pub mu_d: f64,
    /// Rolling friction coefficient.
    pub mu_r: f64,
    /// Wall normal viscosity (Ns/m).
    pub gamma_wn: f64,
    /// Wall tangential viscosity (Ns/m).
    pub gamma_wt: f64,
    /// Wall static friction coefficient.
    pub mu_ws: f64,
    /// Wall dynamic friction coefficient.
    pub mu_wd: f64,
    /// Particle material density (kg/m³).
    pub rho: f64,
    /// Inter-particle contact model.
    pub contact_model: ContactModel,
    /// Capillary-cohesion force prefactor (N/m).
    pub kappa: f64,
    /// Capillary debonding distance (m).
    pub debond_dist: f64,
    /// Liquid volume in a capillary bond (m³).
    pub v_b: f64,
    /// Fluid kinematic viscosity (m²/s). Always carried on the wire,
    /// even when the fluid grid is absent.
    pub nu: f64,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            g: [0.0; 3],
            k_n: constants::DEFAULT_K_N,
            k_t: constants::DEFAULT_K_T,
            k_r: 0.0,
            gamma_n: 0.0,
            gamma_t: 0.0,
            gamma_r: 0.0,
            mu_s: 1.0,
            mu_d: 1.0,
            mu_r: 0.0,
            gamma_wn: constants::DEFAULT_WALL_DAMPING,
            gamma_wt: constants::DEFAULT_WALL_DAMPING,
            mu_ws: 1.0,
            mu_wd: 1.0,
            rho: constants::DEFAULT_DENSITY,
            contact_model: ContactModel::ElasticViscoFrictional,
            kappa: 0.0,
            debond_dist: 0.0,
            v_b: 0.0,
            nu: 0.0,
        }
    }
}

impl MaterialParams {
    /// Builds parameters from friction angles given in degrees.
    ///
    /// The friction coefficients are the tangents of the respective
    /// angles; everything else keeps its default.
    pub fn from_friction_angles(ang_s_deg: f64, ang_d_deg: f64, ang_r_deg: f64) -> Self {
        Self {
            mu_s: ang_s_deg.to_radians().tan(),
            mu_d: ang_d_deg.to_radians().tan(),
            mu_r: ang_r_deg.to_radians().tan(),
            ..Default::default()
        }
    }

    /// Enables capillary cohesion for a perfectly wetting liquid.
    ///
    /// Sets the force prefactor from the surface tension (N/m), a fixed
    /// bond liquid volume, and the debonding distance derived from it.
    pub fn with_capillary_cohesion(mut self, surface_tension: f64) -> Self {
        let theta = 0.0_f64; // wettability angle, 0 = perfect
        self.kappa = 2.0 * std::f64::consts::PI * surface_tension * theta.cos();
        self.v_b = 1.0e-12;
        self.debond_dist = (1.0 + theta / 2.0) * self.v_b.cbrt();
        self
    }
}
