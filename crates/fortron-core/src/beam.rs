//! Visual feedback for energy transfers.
//!
//! Whenever energy actually moves, the engine tells a renderer to draw a
//! beam between the two nodes. Notifications are fire-and-forget: a sink
//! returns nothing, and a sink that fails (closed channel, no renderer
//! attached) has no effect on the transfer itself.

use std::sync::mpsc;

use crate::position::{Vec3, WorldId};

/// Beam thickness at both ends.
pub const BEAM_SIZE: f32 = 0.6;

/// Beams drawn per segment.
pub const BEAM_COUNT: u32 = 1;

/// How long a beam stays visible.
pub const BEAM_DURATION_TICKS: u32 = 20;

/// One beam segment to render.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeamEffect {
    pub world: WorldId,
    pub from: Vec3,
    pub to: Vec3,
    pub size_a: f32,
    pub size_b: f32,
    pub count: u32,
    pub duration_ticks: u32,
}

impl BeamEffect {
    /// A segment with the standard transfer beam styling.
    pub fn segment(world: WorldId, from: Vec3, to: Vec3) -> Self {
        Self {
            world,
            from,
            to,
            size_a: BEAM_SIZE,
            size_b: BEAM_SIZE,
            count: BEAM_COUNT,
            duration_ticks: BEAM_DURATION_TICKS,
        }
    }
}

/// Receiver of beam notifications.
pub trait BeamSink {
    fn notify_beam(&self, beam: BeamEffect);
}

/// A sink that drops every beam, for headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBeams;

impl BeamSink for NoBeams {
    fn notify_beam(&self, _beam: BeamEffect) {}
}

impl<T: BeamSink + ?Sized> BeamSink for &T {
    fn notify_beam(&self, beam: BeamEffect) {
        (**self).notify_beam(beam)
    }
}

impl BeamSink for mpsc::Sender<BeamEffect> {
    fn notify_beam(&self, beam: BeamEffect) {
        // A disconnected renderer is not our problem.
        let _ = self.send(beam);
    }
}
