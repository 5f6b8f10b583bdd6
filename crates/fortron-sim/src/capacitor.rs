//! Fortron capacitors: the storage nodes the simulation places.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicU8, Ordering};

use fortron_core::{BlockPos, FortronStorage, Locatable, TransferMode, WorldId};
use fortron_grid::{Frequency, FrequencyNode};
use serde::{Deserialize, Serialize};

use crate::config::CapacitorSpec;

/// A unique capacitor identifier, assigned in placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CapacitorId(pub u64);

impl fmt::Display for CapacitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A placed capacitor.
///
/// Everything that changes while the simulation runs (energy, frequency,
/// mode, validity) is atomic, so capacitors can be shared as `Arc`s between
/// the simulation and its grid without locks.
#[derive(Debug)]
pub struct Capacitor {
    id: CapacitorId,
    world: WorldId,
    position: BlockPos,
    frequency: AtomicU32,
    energy: AtomicI64,
    capacity: i64,
    mode: AtomicU8,
    transfer_limit: i64,
    range: f64,
    camouflaged: bool,
    valid: AtomicBool,
}

impl Capacitor {
    /// Build a capacitor from a validated spec.
    pub fn new(id: CapacitorId, spec: &CapacitorSpec) -> Self {
        Self {
            id,
            world: spec.world,
            position: spec.position,
            frequency: AtomicU32::new(spec.frequency.value()),
            energy: AtomicI64::new(spec.energy),
            capacity: spec.capacity,
            mode: AtomicU8::new(spec.mode.index()),
            transfer_limit: spec.transfer_limit,
            range: spec.range,
            camouflaged: spec.camouflaged,
            valid: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> CapacitorId {
        self.id
    }

    /// Current balancing mode.
    pub fn mode(&self) -> TransferMode {
        TransferMode::from_index(self.mode.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_mode(&self, mode: TransferMode) {
        self.mode.store(mode.index(), Ordering::Relaxed);
    }

    pub fn set_frequency(&self, frequency: Frequency) {
        self.frequency.store(frequency.value(), Ordering::Relaxed);
    }

    /// Per-transfer cap while balancing.
    pub fn transfer_limit(&self) -> i64 {
        self.transfer_limit
    }

    /// How far away linked nodes may be.
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Mark as torn down. Groups resolved afterwards skip it.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }

    /// Serializable view of the current state.
    pub fn state(&self) -> CapacitorState {
        CapacitorState {
            id: self.id,
            world: self.world,
            position: self.position,
            frequency: self.frequency(),
            energy: self.fortron_energy(),
            capacity: self.capacity,
            mode: self.mode(),
        }
    }
}

impl FortronStorage for Capacitor {
    fn fortron_energy(&self) -> i64 {
        self.energy.load(Ordering::Acquire)
    }

    fn fortron_capacity(&self) -> i64 {
        self.capacity
    }

    fn withdraw(&self, amount: i64, simulate: bool) -> i64 {
        if simulate {
            return amount.min(self.fortron_energy()).max(0);
        }

        let previous = self
            .energy
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |energy| {
                Some(energy - amount.min(energy).max(0))
            })
            .unwrap_or_else(|energy| energy);
        amount.min(previous).max(0)
    }

    fn deposit(&self, amount: i64, simulate: bool) -> i64 {
        let capacity = self.capacity;
        if simulate {
            return amount.min(capacity - self.fortron_energy()).max(0);
        }

        let previous = self
            .energy
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |energy| {
                Some(energy + amount.min(capacity - energy).max(0))
            })
            .unwrap_or_else(|energy| energy);
        amount.min(capacity - previous).max(0)
    }

    fn is_camouflaged(&self) -> bool {
        self.camouflaged
    }

    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }
}

impl Locatable for Capacitor {
    fn world(&self) -> WorldId {
        self.world
    }

    fn position(&self) -> BlockPos {
        self.position
    }
}

impl FrequencyNode for Capacitor {
    fn frequency(&self) -> Frequency {
        Frequency(self.frequency.load(Ordering::Relaxed))
    }
}

/// State of a capacitor at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitorState {
    pub id: CapacitorId,
    pub world: WorldId,
    pub position: BlockPos,
    pub frequency: Frequency,
    pub energy: i64,
    pub capacity: i64,
    pub mode: TransferMode,
}
