//! Fortron Frequency Grid
//!
//! The registry of every fortron node a host has placed, and the place
//! groups are resolved from.
//!
//! # Ownership
//!
//! The grid holds only weak handles. The host (a world, a simulation) owns
//! the nodes; when it drops one, the grid entry goes dead on its own and is
//! skipped by every query until [`FrequencyGrid::clean_up`] removes it.
//! There is no global instance: hosts create a grid and pass it around.
//!
//! # Frequencies
//!
//! A node's frequency is read live at query time, so retuning a node moves
//! it to its new group without touching the registry.

mod frequency;
mod grid;

pub use frequency::{Frequency, FrequencyNode};
pub use grid::FrequencyGrid;
