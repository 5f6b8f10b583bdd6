//! Node capabilities consumed by the engine.
//!
//! The engine never owns nodes. It borrows them through three small
//! capabilities:
//!
//! - [`FortronStorage`]: energy, capacity and the withdraw/deposit pair
//! - [`Locatable`]: where the node is, so beams can be anchored
//! - [`GroupMember`]: a handle in a group that may or may not still point at
//!   a live node
//!
//! All methods take `&self`. Implementations that mutate energy use interior
//! mutability, which lets a host share nodes between its registry, its world
//! and other threads.

use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::position::{BlockPos, WorldId};

/// A node that stores fortron.
///
/// `0 <= fortron_energy() <= fortron_capacity()` is the implementation's
/// invariant. The engine only ever asks for non-negative amounts.
pub trait FortronStorage {
    /// Energy currently held.
    fn fortron_energy(&self) -> i64;

    /// Maximum energy this node can hold.
    fn fortron_capacity(&self) -> i64;

    /// Remove up to `amount`; returns how much was (or would be) removed.
    ///
    /// With `simulate` set the node is left untouched.
    fn withdraw(&self, amount: i64, simulate: bool) -> i64;

    /// Accept up to `amount`; returns how much was (or would be) accepted.
    ///
    /// With `simulate` set the node is left untouched.
    fn deposit(&self, amount: i64, simulate: bool) -> i64;

    /// Camouflaged nodes move energy without visible beams.
    fn is_camouflaged(&self) -> bool {
        false
    }

    /// A node torn down by its host reports `false` and drops out of groups.
    fn is_valid(&self) -> bool {
        true
    }
}

/// A node with a place in some world.
pub trait Locatable {
    fn world(&self) -> WorldId;
    fn position(&self) -> BlockPos;
}

/// One entry of a group.
///
/// Resolving may fail: the node behind a `Weak` may already be gone, or the
/// host may hand over empty slots. Failed entries are skipped by the engine.
pub trait GroupMember {
    type Node: FortronStorage + ?Sized;
    type Handle: Deref<Target = Self::Node>;

    fn resolve(&self) -> Option<Self::Handle>;
}

impl<N: FortronStorage + ?Sized> GroupMember for Weak<N> {
    type Node = N;
    type Handle = Arc<N>;

    fn resolve(&self) -> Option<Arc<N>> {
        self.upgrade()
    }
}

impl<N: FortronStorage + ?Sized> GroupMember for Arc<N> {
    type Node = N;
    type Handle = Arc<N>;

    fn resolve(&self) -> Option<Arc<N>> {
        Some(Arc::clone(self))
    }
}

impl<N: FortronStorage + ?Sized> GroupMember for Option<Arc<N>> {
    type Node = N;
    type Handle = Arc<N>;

    fn resolve(&self) -> Option<Arc<N>> {
        self.clone()
    }
}

impl<'a, N: FortronStorage + ?Sized> GroupMember for &'a N {
    type Node = N;
    type Handle = &'a N;

    fn resolve(&self) -> Option<&'a N> {
        Some(*self)
    }
}

impl<'a, N: FortronStorage + ?Sized> GroupMember for Option<&'a N> {
    type Node = N;
    type Handle = &'a N;

    fn resolve(&self) -> Option<&'a N> {
        *self
    }
}

/// Whether two references point at the same node.
pub fn same_node<A: ?Sized, B: ?Sized>(a: &A, b: &B) -> bool {
    std::ptr::addr_eq(a as *const A, b as *const B)
}
