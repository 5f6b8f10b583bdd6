//! Pairwise transfer: the unit of work every balancing mode is built from.
//!
//! # Direction
//!
//! A positive amount moves energy from `a` to `b`, a negative amount from
//! `b` to `a`. Callers compute a signed delta ("how far is this member from
//! its target") and hand it over unchanged; the sign picks the direction.
//!
//! # Two-phase settlement
//!
//! 1. The sender releases up to `min(|amount|, limit)` for real, and the
//!    receiver takes what it can hold of that.
//! 2. Whatever the receiver refused goes back to the sender: a simulated
//!    deposit sizes the refund, a real deposit settles it.
//!
//! Energy is never created. A near-full receiver simply means less moves.
//! A refund the sender refuses (someone refilled it mid-transfer) is lost
//! and logged.

use std::fmt;

use tracing::{trace, warn};

use crate::beam::{BeamEffect, BeamSink};
use crate::node::{same_node, FortronStorage, Locatable};

/// Energy that actually moved in one transfer.
pub struct TransferRecord<'a, N: ?Sized> {
    pub sender: &'a N,
    pub receiver: &'a N,
    pub amount: i64,
}

impl<N: ?Sized> Clone for TransferRecord<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: ?Sized> Copy for TransferRecord<'_, N> {}

impl<N: ?Sized> fmt::Debug for TransferRecord<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRecord")
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

/// Stateless front end to the transfer primitive and the distribution
/// engine. Holds only the beam sink notifications go to.
#[derive(Debug, Clone, Copy, Default)]
pub struct Balancer<B> {
    beams: B,
}

impl<B: BeamSink> Balancer<B> {
    pub fn new(beams: B) -> Self {
        Self { beams }
    }

    /// The sink beams are sent to.
    pub fn beams(&self) -> &B {
        &self.beams
    }

    /// Move up to `limit` of `amount` between `a` and `b`.
    ///
    /// Same as [`Balancer::transfer_via`] without an intermediate.
    pub fn transfer<'a, N>(
        &self,
        a: &'a N,
        b: &'a N,
        amount: i64,
        limit: i64,
    ) -> Option<TransferRecord<'a, N>>
    where
        N: FortronStorage + Locatable + ?Sized,
    {
        self.transfer_via(a, b, amount, limit, None)
    }

    /// Move up to `limit` of `amount` between `a` and `b`, drawing the beam
    /// through `intermediate` when one is given.
    ///
    /// Returns `None` when nothing moved.
    pub fn transfer_via<'a, N>(
        &self,
        a: &'a N,
        b: &'a N,
        amount: i64,
        limit: i64,
        intermediate: Option<&N>,
    ) -> Option<TransferRecord<'a, N>>
    where
        N: FortronStorage + Locatable + ?Sized,
    {
        debug_assert!(amount != i64::MIN, "transfer amount has no magnitude");
        if amount == i64::MIN {
            return None;
        }

        let (sender, receiver) = if amount < 0 { (b, a) } else { (a, b) };
        let requested = amount.saturating_abs().min(limit.max(0));
        if requested == 0 || same_node(sender, receiver) {
            return None;
        }

        let withdrawn = sender.withdraw(requested, false).clamp(0, requested);
        if withdrawn == 0 {
            return None;
        }

        let accepted = receiver.deposit(withdrawn, false).clamp(0, withdrawn);
        let residue = withdrawn - accepted;
        if residue > 0 {
            settle(sender, residue);
        }

        if accepted == 0 {
            return None;
        }

        trace!(requested, withdrawn, accepted, "fortron transferred");

        if !sender.is_camouflaged() && !receiver.is_camouflaged() {
            self.draw(sender, receiver, intermediate);
        }

        Some(TransferRecord {
            sender,
            receiver,
            amount: accepted,
        })
    }

    fn draw<N>(&self, sender: &N, receiver: &N, intermediate: Option<&N>)
    where
        N: Locatable + ?Sized,
    {
        let world = sender.world();
        let from = sender.position().center();
        let to = receiver.position().center();

        match intermediate {
            None => self.beams.notify_beam(BeamEffect::segment(world, from, to)),
            Some(relay) => {
                let via = relay.position().center();
                self.beams.notify_beam(BeamEffect::segment(world, from, via));
                self.beams.notify_beam(BeamEffect::segment(world, via, to));
            }
        }
    }
}

/// Hand `residue` back to the sender it was withdrawn from.
fn settle<N: FortronStorage + ?Sized>(sender: &N, residue: i64) {
    let refundable = sender.deposit(residue, true).clamp(0, residue);
    let refunded = if refundable > 0 {
        sender.deposit(refundable, false).clamp(0, refundable)
    } else {
        0
    };

    if refunded < residue {
        // Only reachable if someone else filled the sender mid-transfer.
        warn!(
            residue,
            refunded,
            lost = residue - refunded,
            "sender could not take back unaccepted fortron"
        );
    }
}
