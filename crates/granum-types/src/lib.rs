//! # granum-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the Granum DEM control layer.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Granum crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{GranumError, GranumResult};
pub use ids::{BondId, ParticleId, WallId};
