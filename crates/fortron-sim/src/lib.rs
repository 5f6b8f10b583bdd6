//! Fortron Grid Simulation
//!
//! A headless, tick-driven host for fortron capacitors. It places
//! capacitors on a [`fortron_grid::FrequencyGrid`], lets each of them
//! balance its linked group once per tick, and records everything that
//! happens as a timeline of [`GridEvent`]s.
//!
//! # Usage
//!
//! ```ignore
//! let config = SimulationConfig::from_json_file("grid.json")?;
//! let mut sim = Simulation::new(config)?;
//! sim.run()?;
//!
//! println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
//! ```

mod capacitor;
mod config;
mod error;
mod events;
mod recorder;
mod simulation;

pub use capacitor::{Capacitor, CapacitorId, CapacitorState};
pub use config::{CapacitorSpec, ChurnAction, ChurnEvent, SimulationConfig, TICKS_ENV};
pub use error::{Error, Result};
pub use events::{GridEvent, GridSnapshot};
pub use recorder::BeamRecorder;
pub use simulation::Simulation;
