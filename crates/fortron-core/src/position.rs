//! World positions used to anchor beam effects.
//!
//! Nodes sit on an integer block grid. Beams are drawn between block
//! centres, so every endpoint is the block position shifted by half a block
//! on each axis.

use std::ops::{Add, Sub};

/// Identifier of the world (dimension) a node lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldId(pub u32);

/// An integer block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Origin of the block grid.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new block position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Centre of this block in continuous space.
    pub fn center(&self) -> Vec3 {
        Vec3::from(*self).translate(0.5)
    }

    /// Euclidean distance between two block centres.
    pub fn distance(&self, other: &Self) -> f64 {
        let d = Vec3::from(*self - *other);
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }
}

impl Add for BlockPos {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for BlockPos {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// A point in continuous world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Shift by the same offset on every axis.
    pub fn translate(self, offset: f64) -> Self {
        Self::new(self.x + offset, self.y + offset, self.z + offset)
    }
}

impl From<BlockPos> for Vec3 {
    fn from(pos: BlockPos) -> Self {
        Self::new(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z))
    }
}
