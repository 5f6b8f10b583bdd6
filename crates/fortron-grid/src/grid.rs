//! The frequency registry.

use std::sync::{Arc, Weak};

use fortron_core::{BlockPos, WorldId};
use tracing::debug;

use crate::frequency::{Frequency, FrequencyNode};

/// Registry of fortron nodes, held weakly.
pub struct FrequencyGrid<N: ?Sized> {
    nodes: Vec<Weak<N>>,
}

impl<N: ?Sized> Default for FrequencyGrid<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N: FrequencyNode + ?Sized> FrequencyGrid<N> {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Returns false if it was already registered.
    pub fn register(&mut self, node: &Arc<N>) -> bool {
        if self.contains(node) {
            return false;
        }
        self.nodes.push(Arc::downgrade(node));
        debug!(frequency = %node.frequency(), entries = self.nodes.len(), "node registered");
        true
    }

    /// Remove a node. Returns false if it was not registered.
    pub fn unregister(&mut self, node: &N) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|entry| !points_at(entry, node));
        let removed = self.nodes.len() < before;
        if removed {
            debug!(entries = self.nodes.len(), "node unregistered");
        }
        removed
    }

    /// Whether `node` is registered.
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.iter().any(|entry| points_at(entry, node))
    }

    /// Drop entries whose node is gone or invalid. Returns how many went.
    pub fn clean_up(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes
            .retain(|entry| entry.upgrade().is_some_and(|node| node.is_valid()));
        let removed = before - self.nodes.len();
        if removed > 0 {
            debug!(removed, entries = self.nodes.len(), "cleaned up dead nodes");
        }
        removed
    }

    /// Registered entries, dead ones included until the next clean-up.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every live, valid node.
    pub fn live(&self) -> impl Iterator<Item = Arc<N>> + '_ {
        self.nodes
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|node| node.is_valid())
    }

    /// Handles of every live node tuned to `frequency`, in registration order.
    pub fn group(&self, frequency: Frequency) -> Vec<Weak<N>> {
        self.select(|node| node.frequency() == frequency)
    }

    /// Like [`FrequencyGrid::group`], restricted to one world and to nodes
    /// within `radius` blocks of `center`.
    pub fn group_near(
        &self,
        world: WorldId,
        center: BlockPos,
        radius: f64,
        frequency: Frequency,
    ) -> Vec<Weak<N>> {
        self.select(|node| {
            node.frequency() == frequency
                && node.world() == world
                && node.position().distance(&center) <= radius
        })
    }

    /// The group `source` balances with: every node on its frequency, in its
    /// world, within `radius`, except `source` itself.
    pub fn linked(&self, source: &N, radius: f64) -> Vec<Weak<N>> {
        let frequency = source.frequency();
        let world = source.world();
        let center = source.position();

        self.select(|node| {
            !fortron_core::same_node(node, source)
                && node.frequency() == frequency
                && node.world() == world
                && node.position().distance(&center) <= radius
        })
    }

    /// Distinct frequencies in use by live nodes, ascending.
    pub fn frequencies(&self) -> Vec<Frequency> {
        let mut frequencies: Vec<Frequency> = self.live().map(|node| node.frequency()).collect();
        frequencies.sort_unstable();
        frequencies.dedup();
        frequencies
    }

    fn select<F>(&self, mut keep: F) -> Vec<Weak<N>>
    where
        F: FnMut(&N) -> bool,
    {
        self.nodes
            .iter()
            .filter(|entry| {
                entry
                    .upgrade()
                    .is_some_and(|node| node.is_valid() && keep(&*node))
            })
            .cloned()
            .collect()
    }
}

fn points_at<N: ?Sized>(entry: &Weak<N>, node: &N) -> bool {
    std::ptr::addr_eq(entry.as_ptr(), node as *const N)
}
