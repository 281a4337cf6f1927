//! Strongly-typed identifiers for simulation entities.
//!
//! Newtype wrappers prevent accidental mixing of particle indices
//! with wall indices or bond indices.

use serde::{Deserialize, Serialize};

/// Index into the per-particle arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

/// Index into the per-wall arrays. At most five walls exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallId(pub u32);

/// Index into the bond arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BondId(pub u32);

impl ParticleId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl WallId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl BondId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ParticleId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for WallId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for BondId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
