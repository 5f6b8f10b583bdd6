//! Group balancing: one source node against the rest of its frequency.
//!
//! Each call resolves the group, sums energy and capacity over the source
//! and every live member, and hands off to the selected mode. Modes only
//! ever issue pairwise transfers; nothing is retried and nothing is
//! remembered between calls. A group gets balanced by being called again
//! next tick.
//!
//! # Modes
//!
//! - **Distribute**: every member is driven toward `total / members`.
//! - **Fill**: members feed the source until it is full, then the members
//!   are ladder-equalized among themselves.
//! - **Drain**: the source pushes out while it holds more than
//!   [`DRAIN_THRESHOLD`] (or has fewer than two members), then the members
//!   are ladder-equalized.
//! - **Equalize**: every member is driven toward its capacity's share of
//!   the total.
//!
//! # Ladder pass
//!
//! Members are walked as a chain. For each adjacent pair `(i, i + 1)`:
//!
//! ```text
//! num    = cap[i+1] * e[i] - cap[i] * e[i+1]
//! den    = cap[i] + e[i+1]
//! amount = floor(num / den + 1/2)
//! ```
//!
//! and `amount` moves from `i` to `i + 1` (or back, if negative). The source
//! is only drawn as the relay point of the beam; its own energy is not
//! touched. One pass is O(n) and does not converge on its own.

use tracing::{debug, trace};

use crate::beam::BeamSink;
use crate::mode::TransferMode;
use crate::node::{FortronStorage, GroupMember, Locatable};
use crate::snapshot::{Aggregate, GroupSnapshot};
use crate::transfer::Balancer;

/// Above this much stored energy a draining source keeps pushing outward.
pub const DRAIN_THRESHOLD: i64 = 1000;

impl<B: BeamSink> Balancer<B> {
    /// Balance `source` against `group` for one tick.
    ///
    /// `limit` caps every single transfer issued during the call. Dead or
    /// invalid members are skipped. Returns early when the group holds no
    /// energy or has no capacity.
    pub fn distribute<N, M>(&self, source: &N, group: &[M], mode: TransferMode, limit: i64)
    where
        N: FortronStorage + Locatable + ?Sized,
        M: GroupMember<Node = N>,
    {
        let snapshot = GroupSnapshot::resolve(group);
        let total = Aggregate::of(source, &snapshot);
        let limit = limit.max(0);

        if snapshot.pruned() > 0 {
            debug!(pruned = snapshot.pruned(), "skipped dead group members");
        }
        trace!(
            %mode,
            members = snapshot.len(),
            pruned = snapshot.pruned(),
            energy = total.energy,
            capacity = total.capacity,
            limit,
            "distributing fortron"
        );

        if total.is_degenerate() {
            return;
        }

        let members: Vec<&N> = snapshot.iter().collect();
        match mode {
            TransferMode::Distribute => self.share_evenly(source, &members, total, limit),
            TransferMode::Fill => self.fill(source, &members, limit),
            TransferMode::Drain => self.drain(source, &members, limit),
            TransferMode::Equalize => self.share_by_capacity(source, &members, total, limit),
        }
    }

    fn share_evenly<N>(&self, source: &N, members: &[&N], total: Aggregate, limit: i64)
    where
        N: FortronStorage + Locatable + ?Sized,
    {
        let Ok(count) = i64::try_from(members.len()) else {
            return;
        };
        if count == 0 {
            return;
        }

        let share = total.energy / count;
        for &member in members {
            self.transfer(source, member, share - member.fortron_energy(), limit);
        }
    }

    fn share_by_capacity<N>(&self, source: &N, members: &[&N], total: Aggregate, limit: i64)
    where
        N: FortronStorage + Locatable + ?Sized,
    {
        for &member in members {
            let target = capacity_share(member.fortron_capacity(), total);
            self.transfer(source, member, target - member.fortron_energy(), limit);
        }
    }

    fn fill<N>(&self, source: &N, members: &[&N], limit: i64)
    where
        N: FortronStorage + Locatable + ?Sized,
    {
        if source.fortron_energy() < source.fortron_capacity() {
            // Ask for a full limit from everyone; saturation stops it.
            for &member in members {
                self.transfer(member, source, limit, limit);
            }
        } else {
            self.ladder(source, members, limit);
        }
    }

    fn drain<N>(&self, source: &N, members: &[&N], limit: i64)
    where
        N: FortronStorage + Locatable + ?Sized,
    {
        if source.fortron_energy() > DRAIN_THRESHOLD || members.len() < 2 {
            for &member in members {
                self.transfer(source, member, limit, limit);
            }
        } else {
            self.ladder(source, members, limit);
        }
    }

    fn ladder<N>(&self, source: &N, members: &[&N], limit: i64)
    where
        N: FortronStorage + Locatable + ?Sized,
    {
        for pair in members.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let amount = ladder_amount(
                current.fortron_energy(),
                current.fortron_capacity(),
                next.fortron_energy(),
                next.fortron_capacity(),
            );
            self.transfer_via(current, next, amount, limit, Some(source));
        }
    }
}

/// Signed amount the ladder pass moves from one member to the next.
///
/// `floor(num / den + 1/2)` with the formula from the module docs, computed
/// exactly. A pair with `den <= 0` (an empty-capacity node followed by an
/// empty node) moves nothing.
///
/// This is true half-up rounding of the exact quotient. Truncating `num / den`
/// before adding the half would bias every step toward zero.
pub fn ladder_amount(energy: i64, capacity: i64, next_energy: i64, next_capacity: i64) -> i64 {
    let num = i128::from(next_capacity) * i128::from(energy)
        - i128::from(capacity) * i128::from(next_energy);
    let den = i128::from(capacity) + i128::from(next_energy);
    if den <= 0 {
        return 0;
    }

    // floor(num/den + 1/2) == floor((2*num + den) / (2*den)) for den > 0
    saturate((2 * num + den).div_euclid(2 * den))
}

/// A member's share of the total energy, proportional to its capacity.
fn capacity_share(capacity: i64, total: Aggregate) -> i64 {
    let scaled = i128::from(capacity) * i128::from(total.energy);
    saturate(scaled.div_euclid(i128::from(total.capacity)))
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { -i64::MAX } else { i64::MAX })
}
