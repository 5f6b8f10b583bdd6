//! Simulation configuration.
//!
//! Configs are plain JSON. Every field has a default, so a config only
//! needs to list what it changes:
//!
//! ```json
//! {
//!   "ticks": 200,
//!   "capacitors": [
//!     { "position": { "x": 0, "y": 64, "z": 0 }, "energy": 1000, "mode": "drain" },
//!     { "position": { "x": 4, "y": 64, "z": 0 } }
//!   ],
//!   "churn": [
//!     { "tick": 50, "action": { "kind": "break", "id": 1 } }
//!   ]
//! }
//! ```

use std::path::Path;

use fortron_core::{BlockPos, TransferMode, WorldId};
use fortron_grid::Frequency;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::capacitor::CapacitorId;
use crate::error::{Error, Result};

/// Environment variable overriding the number of ticks to run.
pub const TICKS_ENV: &str = "FORTRON_SIM_TICKS";

/// Placement parameters for one capacitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitorSpec {
    pub world: WorldId,
    pub position: BlockPos,
    pub frequency: Frequency,
    /// Energy stored at placement
    pub energy: i64,
    pub capacity: i64,
    pub mode: TransferMode,
    /// Cap on every single transfer this capacitor issues
    pub transfer_limit: i64,
    /// Linking radius in blocks
    pub range: f64,
    pub camouflaged: bool,
}

impl Default for CapacitorSpec {
    fn default() -> Self {
        Self {
            world: WorldId::default(),
            position: BlockPos::ORIGIN,
            frequency: Frequency::default(),
            energy: 0,
            capacity: 1000,
            mode: TransferMode::Equalize,
            transfer_limit: 100,
            range: 16.0,
            camouflaged: false,
        }
    }
}

impl CapacitorSpec {
    /// A default capacitor at `position` holding `energy`.
    pub fn at(position: BlockPos, energy: i64) -> Self {
        Self {
            position,
            energy,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Check the described capacitor can exist.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 0 {
            return Err(invalid(format!("capacity {} is negative", self.capacity)));
        }
        if !(0..=self.capacity).contains(&self.energy) {
            return Err(invalid(format!(
                "energy {} outside 0..={}",
                self.energy, self.capacity
            )));
        }
        if self.transfer_limit < 0 {
            return Err(invalid(format!(
                "transfer limit {} is negative",
                self.transfer_limit
            )));
        }
        if !self.range.is_finite() || self.range < 0.0 {
            return Err(invalid(format!("range {} is not a distance", self.range)));
        }
        Ok(())
    }
}

/// A scripted change to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChurnAction {
    /// Place a new capacitor
    Place { capacitor: CapacitorSpec },
    /// Break a placed capacitor
    Break { id: CapacitorId },
    /// Tune a capacitor to another frequency
    Retune { id: CapacitorId, frequency: Frequency },
    /// Switch a capacitor's balancing mode
    SetMode { id: CapacitorId, mode: TransferMode },
}

/// A churn action applied at the start of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnEvent {
    pub tick: u64,
    pub action: ChurnAction,
}

/// Configuration for the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks to run
    pub ticks: u64,
    /// Capacitors placed before the first tick, in id order
    pub capacitors: Vec<CapacitorSpec>,
    /// Scripted placement, breakage and reconfiguration
    pub churn: Vec<ChurnEvent>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 100,
            capacitors: Vec::new(),
            churn: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Default config with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply overrides from the environment.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(ticks) = std::env::var(TICKS_ENV) {
            let ticks = ticks
                .trim()
                .parse()
                .map_err(|_| invalid(format!("{TICKS_ENV}={ticks:?} is not a tick count")))?;
            self = self.with_ticks(ticks);
        }
        Ok(self)
    }

    /// Run for `ticks` instead. Churn scheduled past the new end is dropped.
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        let before = self.churn.len();
        self.churn.retain(|event| event.tick < ticks);
        let dropped = before - self.churn.len();
        if dropped > 0 {
            warn!(dropped, ticks, "dropped churn scheduled past the last tick");
        }
        self.ticks = ticks;
        self
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// A small mixed network: one frequency per mode plus a camouflaged
    /// pair, with energy concentrated in one node of each group.
    pub fn demo() -> Self {
        let mut capacitors = Vec::new();

        for (row, mode) in TransferMode::ALL.into_iter().enumerate() {
            let frequency = Frequency(100 + row as u32);
            let z = row as i32 * 32;
            capacitors.push(
                CapacitorSpec::at(BlockPos::new(0, 64, z), 900)
                    .with_mode(mode)
                    .with_frequency(frequency),
            );
            for i in 1..4 {
                capacitors.push(
                    CapacitorSpec::at(BlockPos::new(i * 3, 64, z), 0)
                        .with_mode(mode)
                        .with_frequency(frequency),
                );
            }
        }

        let hidden = Frequency(200);
        capacitors.push(CapacitorSpec {
            camouflaged: true,
            ..CapacitorSpec::at(BlockPos::new(0, 64, 160), 500).with_frequency(hidden)
        });
        capacitors.push(CapacitorSpec::at(BlockPos::new(4, 64, 160), 0).with_frequency(hidden));

        Self {
            ticks: 100,
            capacitors,
            churn: vec![ChurnEvent {
                tick: 50,
                action: ChurnAction::Break { id: CapacitorId(2) },
            }],
        }
    }

    /// Check every capacitor spec and that churn falls inside the run.
    pub fn validate(&self) -> Result<()> {
        for (index, spec) in self.capacitors.iter().enumerate() {
            spec.validate()
                .map_err(|e| invalid(format!("capacitor {index}: {e}")))?;
        }

        for event in &self.churn {
            if event.tick >= self.ticks {
                return Err(invalid(format!(
                    "churn at tick {} is past the last tick {}",
                    event.tick,
                    self.ticks.saturating_sub(1)
                )));
            }
            if let ChurnAction::Place { capacitor } = &event.action {
                capacitor
                    .validate()
                    .map_err(|e| invalid(format!("churn at tick {}: {e}", event.tick)))?;
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig(message)
}
