//! Physical constants and simulation defaults.

/// Spatial dimensionality. The wire format and all vector fields are 3D.
pub const DIM: usize = 3;

/// Maximum number of walls a state may carry.
pub const MAX_WALLS: usize = 5;

/// Standard gravitational acceleration (m/s²), applied along −z.
pub const GRAVITY: f64 = 9.80665;

/// Default contact normal stiffness (N/m).
pub const DEFAULT_K_N: f64 = 1.16e9;

/// Default contact tangential stiffness (N/m).
pub const DEFAULT_K_T: f64 = 1.16e9;

/// Default wall normal and tangential viscosities (Ns/m).
pub const DEFAULT_WALL_DAMPING: f64 = 1.0e3;

/// Default particle material density (kg/m³).
pub const DEFAULT_DENSITY: f64 = 2600.0;

/// Safety factor applied to the critical timestep estimate
/// (O'Sullivan et al., 2003).
pub const TIMESTEP_SAFETY: f64 = 0.12;

/// Zero-padded digit count in snapshot file names
/// (`<sid>.output00042.bin`).
pub const SNAPSHOT_INDEX_DIGITS: usize = 5;
