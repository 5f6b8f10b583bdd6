//! Collecting beams for the timeline.

use std::sync::Mutex;

use fortron_core::{BeamEffect, BeamSink};

/// Beam sink that buffers beams until the simulation collects them.
#[derive(Debug, Default)]
pub struct BeamRecorder {
    beams: Mutex<Vec<BeamEffect>>,
}

impl BeamRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every beam recorded since the last call.
    pub fn take(&self) -> Vec<BeamEffect> {
        match self.beams.lock() {
            Ok(mut beams) => std::mem::take(&mut *beams),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl BeamSink for BeamRecorder {
    fn notify_beam(&self, beam: BeamEffect) {
        // Dropping a beam is fine; blocking or panicking a transfer is not.
        if let Ok(mut beams) = self.beams.lock() {
            beams.push(beam);
        }
    }
}
