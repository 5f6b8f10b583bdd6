//! Resolving a group into the live nodes one call works on.
//!
//! Membership is owned by the host and may change between the moment a
//! group was handed over and the moment a member is read. Resolution happens
//! once, up front: every entry is resolved, dead or invalid ones are dropped,
//! and the rest is frozen into an ordered list. Nothing later in the call
//! sees a pruned entry, and the order is fixed for the whole call.

use std::ops::Deref;

use crate::node::{FortronStorage, GroupMember};

/// Live members of a group, in group order.
pub struct GroupSnapshot<H> {
    members: Vec<H>,
    pruned: usize,
}

impl<H> GroupSnapshot<H> {
    /// Resolve every member, dropping the ones that are gone.
    pub fn resolve<M>(group: &[M]) -> Self
    where
        M: GroupMember<Handle = H>,
        H: Deref<Target = M::Node>,
    {
        let members: Vec<H> = group
            .iter()
            .filter_map(<M as GroupMember>::resolve)
            .filter(|node| node.is_valid())
            .collect();
        let pruned = group.len() - members.len();

        Self { members, pruned }
    }

    /// Live members.
    pub fn members(&self) -> &[H] {
        &self.members
    }

    /// How many entries were dropped during resolution.
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate live members as node references.
    pub fn iter<'a, N>(&'a self) -> impl Iterator<Item = &'a N>
    where
        H: Deref<Target = N>,
        N: ?Sized + 'a,
    {
        self.members.iter().map(Deref::deref)
    }
}

/// Energy and capacity summed over a source and its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aggregate {
    pub energy: i64,
    pub capacity: i64,
}

impl Aggregate {
    /// Totals over `source` plus every live member.
    pub fn of<N, H>(source: &N, snapshot: &GroupSnapshot<H>) -> Self
    where
        N: FortronStorage + ?Sized,
        H: Deref<Target = N>,
    {
        snapshot.iter().fold(Self::single(source), |acc, node| acc.add(node))
    }

    fn single<N: FortronStorage + ?Sized>(node: &N) -> Self {
        Self {
            energy: node.fortron_energy(),
            capacity: node.fortron_capacity(),
        }
    }

    fn add<N: FortronStorage + ?Sized>(self, node: &N) -> Self {
        Self {
            energy: self.energy.saturating_add(node.fortron_energy()),
            capacity: self.capacity.saturating_add(node.fortron_capacity()),
        }
    }

    /// Nothing to balance: no energy, or nowhere to put it.
    pub fn is_degenerate(&self) -> bool {
        self.energy <= 0 || self.capacity <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestNode;
    use std::sync::Arc;

    #[test]
    fn dead_members_are_pruned() {
        let alive = Arc::new(TestNode::new(10, 100));
        let doomed = Arc::new(TestNode::new(20, 100));
        let group = vec![Arc::downgrade(&alive), Arc::downgrade(&doomed)];
        drop(doomed);

        let snapshot = GroupSnapshot::resolve(&group);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.pruned(), 1);
        assert_eq!(snapshot.iter().map(|n| n.energy()).collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn invalid_members_are_pruned() {
        let a = TestNode::new(1, 10);
        let b = TestNode::new(2, 10);
        b.invalidate();
        let group = vec![&a, &b];

        let snapshot = GroupSnapshot::resolve(&group);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.pruned(), 1);
    }

    #[test]
    fn empty_slots_are_pruned() {
        let a = TestNode::new(1, 10);
        let group = vec![None, Some(&a), None];

        let snapshot = GroupSnapshot::resolve(&group);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.pruned(), 2);
    }

    #[test]
    fn snapshot_keeps_group_order() {
        let nodes: Vec<_> = (0..5).map(|i| TestNode::new(i, 10)).collect();
        let group: Vec<&TestNode> = nodes.iter().rev().collect();

        let snapshot = GroupSnapshot::resolve(&group);

        let energies: Vec<_> = snapshot.iter().map(|n| n.energy()).collect();
        assert_eq!(energies, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn aggregate_includes_source() {
        let source = TestNode::new(50, 100);
        let a = TestNode::new(10, 20);
        let b = TestNode::new(5, 30);
        let group = vec![&a, &b];

        let total = Aggregate::of(&source, &GroupSnapshot::resolve(&group));

        assert_eq!(total, Aggregate { energy: 65, capacity: 150 });
        assert!(!total.is_degenerate());
    }

    #[test]
    fn degenerate_aggregates() {
        assert!(Aggregate { energy: 0, capacity: 10 }.is_degenerate());
        assert!(Aggregate { energy: 10, capacity: 0 }.is_degenerate());
        assert!(Aggregate::default().is_degenerate());
    }
}
