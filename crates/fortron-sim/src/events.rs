//! Grid events for the simulation timeline.

use fortron_core::{BeamEffect, BlockPos, TransferMode};
use fortron_grid::Frequency;
use serde::{Deserialize, Serialize};

use crate::capacitor::{CapacitorId, CapacitorState};

/// Events that occur while the grid runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GridEvent {
    /// A capacitor was placed and registered
    CapacitorPlaced {
        id: CapacitorId,
        position: BlockPos,
        frequency: Frequency,
        tick: u64,
    },

    /// A capacitor was broken and left the grid
    CapacitorBroken {
        id: CapacitorId,
        /// Energy lost with it
        energy: i64,
        tick: u64,
    },

    /// A capacitor moved to another frequency
    Retuned {
        id: CapacitorId,
        frequency: Frequency,
        tick: u64,
    },

    /// A capacitor switched balancing mode
    ModeChanged {
        id: CapacitorId,
        mode: TransferMode,
        tick: u64,
    },

    /// A beam was drawn while `source` balanced its group
    Beam {
        source: CapacitorId,
        beam: BeamEffect,
        tick: u64,
    },

    /// Every capacitor has balanced once
    TickCompleted { total_energy: i64, tick: u64 },
}

impl GridEvent {
    /// Get the tick this event happened in.
    pub fn tick(&self) -> u64 {
        match self {
            GridEvent::CapacitorPlaced { tick, .. } => *tick,
            GridEvent::CapacitorBroken { tick, .. } => *tick,
            GridEvent::Retuned { tick, .. } => *tick,
            GridEvent::ModeChanged { tick, .. } => *tick,
            GridEvent::Beam { tick, .. } => *tick,
            GridEvent::TickCompleted { tick, .. } => *tick,
        }
    }
}

/// A snapshot of the grid at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub tick: u64,
    pub capacitors: Vec<CapacitorState>,
    pub total_energy: i64,
    pub total_capacity: i64,
}

impl GridSnapshot {
    /// Total energy held on one frequency.
    pub fn energy_on(&self, frequency: Frequency) -> i64 {
        self.capacitors
            .iter()
            .filter(|c| c.frequency == frequency)
            .map(|c| c.energy)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortron_core::{Vec3, WorldId};

    #[test]
    fn events_serialize_with_type_tag() {
        let event = GridEvent::CapacitorBroken {
            id: CapacitorId(3),
            energy: 12,
            tick: 7,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CapacitorBroken");
        assert_eq!(json["id"], 3);
        assert_eq!(event.tick(), 7);
    }

    #[test]
    fn beam_events_roundtrip() {
        let event = GridEvent::Beam {
            source: CapacitorId(1),
            beam: BeamEffect::segment(WorldId(0), Vec3::default(), Vec3::new(1.0, 2.0, 3.0)),
            tick: 4,
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: GridEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn snapshot_energy_per_frequency() {
        let state = |id, frequency, energy| CapacitorState {
            id: CapacitorId(id),
            world: WorldId(0),
            position: BlockPos::ORIGIN,
            frequency: Frequency(frequency),
            energy,
            capacity: 100,
            mode: TransferMode::Equalize,
        };
        let snapshot = GridSnapshot {
            capacitors: vec![state(0, 1, 10), state(1, 2, 20), state(2, 1, 30)],
            ..GridSnapshot::default()
        };

        assert_eq!(snapshot.energy_on(Frequency(1)), 40);
        assert_eq!(snapshot.energy_on(Frequency(2)), 20);
    }
}
