//! # granum-state
//!
//! The `SimState` data model: the complete description of one simulation
//! instant for the external DEM/fluid simulator.
//!
//! The state is a strongly-typed record whose constructors and
//! `validate()` enforce the structural invariants (lockstep per-particle
//! array lengths, wall count bounds, bond endpoint validity, fluid grid
//! shape) up front, so the serialization layer never has to guess.

pub mod bonds;
pub mod fluid;
pub mod metrics;
pub mod params;
pub mod particles;
pub mod setup;
pub mod state;
pub mod walls;
pub mod world;

pub use bonds::BondGraph;
pub use fluid::FluidGrid;
pub use metrics::EnergyTerm;
pub use params::{ContactModel, MaterialParams};
pub use particles::Particles;
pub use state::{SimState, Temporal};
pub use walls::{WallMode, Walls};
pub use world::{Periodicity, WorldGrid};
