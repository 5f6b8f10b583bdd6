//! Fortron Distribution Engine
//!
//! Balances fortron energy across a group of storage nodes that share a
//! frequency. Groups change all the time (nodes are placed, broken,
//! retuned), so the engine works on whatever is alive at the moment of the
//! call and keeps no state of its own between calls.
//!
//! # Building blocks
//!
//! - [`FortronStorage`] / [`Locatable`]: what a node must offer
//! - [`Balancer::transfer`]: move a signed amount between two nodes, capped
//!   by a per-tick limit, without ever losing or creating energy
//! - [`Balancer::distribute`]: balance one source node against its group
//!   using one of four [`TransferMode`]s
//! - [`BeamSink`]: fire-and-forget visual feedback for every transfer
//!
//! # Usage
//!
//! ```ignore
//! let balancer = Balancer::new(NoBeams);
//! for capacitor in &capacitors {
//!     let group = grid.linked(capacitor, capacitor.range());
//!     balancer.distribute(&**capacitor, &group, capacitor.mode(), capacitor.limit());
//! }
//! ```
//!
//! # Concurrency
//!
//! Everything here is synchronous and lock-free. If a host mutates node
//! energy from other threads while a call runs, results are best-effort:
//! the group is resolved once, then each node is read live as it is used.

mod beam;
mod distribute;
mod mode;
mod node;
mod position;
mod snapshot;
mod transfer;

#[cfg(test)]
mod testing;

pub use beam::{BeamEffect, BeamSink, NoBeams, BEAM_COUNT, BEAM_DURATION_TICKS, BEAM_SIZE};
pub use distribute::{ladder_amount, DRAIN_THRESHOLD};
pub use mode::{ParseModeError, TransferMode};
pub use node::{same_node, FortronStorage, GroupMember, Locatable};
pub use position::{BlockPos, Vec3, WorldId};
pub use snapshot::{Aggregate, GroupSnapshot};
pub use transfer::{Balancer, TransferRecord};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestNode;

    #[test]
    fn drain_threshold_is_literal() {
        assert_eq!(DRAIN_THRESHOLD, 1000);
    }

    #[test]
    fn balancer_works_through_trait_objects() {
        trait Node: FortronStorage + Locatable {}
        impl Node for TestNode {}

        let source = TestNode::new(100, 100);
        let a = TestNode::new(0, 100);
        let b = TestNode::new(0, 100);
        let group: Vec<&dyn Node> = vec![&a, &b];

        Balancer::new(NoBeams).distribute(&source as &dyn Node, &group, TransferMode::Equalize, 1000);

        // total 100 over capacity 300
        assert_eq!(a.energy(), 33);
        assert_eq!(b.energy(), 33);
        assert_eq!(source.energy(), 34);
    }
}
