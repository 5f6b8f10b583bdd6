//! In-memory node used by the unit tests.

use std::cell::Cell;
use std::sync::mpsc;

use crate::beam::BeamEffect;
use crate::node::{FortronStorage, Locatable};
use crate::position::{BlockPos, WorldId};

pub(crate) struct TestNode {
    energy: Cell<i64>,
    capacity: i64,
    position: BlockPos,
    camouflaged: bool,
    valid: Cell<bool>,
}

impl TestNode {
    pub(crate) fn new(energy: i64, capacity: i64) -> Self {
        Self {
            energy: Cell::new(energy),
            capacity,
            position: BlockPos::ORIGIN,
            camouflaged: false,
            valid: Cell::new(true),
        }
    }

    pub(crate) fn at(mut self, x: i32, y: i32, z: i32) -> Self {
        self.position = BlockPos::new(x, y, z);
        self
    }

    pub(crate) fn camouflaged(mut self) -> Self {
        self.camouflaged = true;
        self
    }

    pub(crate) fn invalidate(&self) {
        self.valid.set(false);
    }

    pub(crate) fn energy(&self) -> i64 {
        self.energy.get()
    }
}

impl FortronStorage for TestNode {
    fn fortron_energy(&self) -> i64 {
        self.energy.get()
    }

    fn fortron_capacity(&self) -> i64 {
        self.capacity
    }

    fn withdraw(&self, amount: i64, simulate: bool) -> i64 {
        let taken = amount.clamp(0, self.energy.get());
        if !simulate {
            self.energy.set(self.energy.get() - taken);
        }
        taken
    }

    fn deposit(&self, amount: i64, simulate: bool) -> i64 {
        let room = (self.capacity - self.energy.get()).max(0);
        let accepted = amount.clamp(0, room);
        if !simulate {
            self.energy.set(self.energy.get() + accepted);
        }
        accepted
    }

    fn is_camouflaged(&self) -> bool {
        self.camouflaged
    }

    fn is_valid(&self) -> bool {
        self.valid.get()
    }
}

impl Locatable for TestNode {
    fn world(&self) -> WorldId {
        WorldId(0)
    }

    fn position(&self) -> BlockPos {
        self.position
    }
}

/// Beams received so far on a test channel.
pub(crate) fn drain_beams(rx: &mpsc::Receiver<BeamEffect>) -> Vec<BeamEffect> {
    rx.try_iter().collect()
}
