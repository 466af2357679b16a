//! `ResourceHandler` — the seize/release/limit primitive shared by docks and
//! the standby storage area.

use log::trace;
use rustc_hash::FxHashSet;

use dc_core::{ForkliftId, HandlerId, OrderId, PalletId};
use dc_storage::Storage;

use crate::{Forklift, ForkliftOwner};

/// A contention-controlled holder of pallets.
///
/// Holds floor storage, the pallets promised to it but not yet present,
/// the orders parked on it, and the set of forklifts currently working for
/// it.  Invariant: `size + reserved ≤ capacity`.
#[derive(Clone, Debug)]
pub struct ResourceHandler {
    pub id:         HandlerId,
    pub storage:    Storage,
    /// Orders whose pallets sit (or will sit) here, in arrival order.
    pub orders:     Vec<OrderId>,
    reserved:       FxHashSet<PalletId>,
    used_forklifts: FxHashSet<ForkliftId>,
}

impl ResourceHandler {
    pub fn new(id: HandlerId, capacity: u32) -> Self {
        Self {
            id,
            storage:        Storage::new(capacity),
            orders:         Vec::new(),
            reserved:       FxHashSet::default(),
            used_forklifts: FxHashSet::default(),
        }
    }

    // ── Forklift accounting ───────────────────────────────────────────────

    /// Try to take `unit` for `owner`.
    ///
    /// Succeeds while fewer than `limit` forklifts are in use here, or when
    /// `unit` is already held by this handler (re-seizing does not count
    /// twice).  Never blocks; `false` means "retry later".
    pub fn seize(&mut self, unit: &mut Forklift, owner: ForkliftOwner, limit: u32) -> bool {
        if (self.used_forklifts.len() as u32) < limit || self.used_forklifts.contains(&unit.id) {
            unit.set_owner(owner);
            self.used_forklifts.insert(unit.id);
            trace!("{}: seized {} for {:?}", self.id, unit.id, owner);
            return true;
        }
        false
    }

    /// Give `unit` back unconditionally.
    pub fn release(&mut self, unit: &mut Forklift) {
        unit.set_owner(ForkliftOwner::Unassigned);
        self.used_forklifts.remove(&unit.id);
        trace!("{}: released {}", self.id, unit.id);
    }

    /// Shrink toward a lowered `limit`.
    ///
    /// When more forklifts are in use than `limit` allows, releases `unit`
    /// if this handler holds it and returns `true`, telling the caller not to
    /// seize.  Returns `false` when usage is within the limit.
    pub fn release_unused(&mut self, unit: &mut Forklift, limit: u32) -> bool {
        if self.used_forklifts.len() as u32 > limit {
            if self.used_forklifts.contains(&unit.id) {
                self.release(unit);
            }
            return true;
        }
        false
    }

    #[inline]
    pub fn used_forklift_count(&self) -> usize {
        self.used_forklifts.len()
    }

    // ── Space accounting ──────────────────────────────────────────────────

    /// Free space after subtracting pallets already promised to this handler.
    pub fn space_available(&self) -> u32 {
        let taken = self.storage.size() + self.reserved.len() as u32;
        debug_assert!(taken <= self.storage.capacity(), "{} overcommitted", self.id);
        self.storage.capacity().saturating_sub(taken)
    }

    /// Promise space to `pallet` before it physically arrives.
    pub fn reserve(&mut self, pallet: PalletId) {
        debug_assert!(self.space_available() > 0, "{} reserve without space", self.id);
        self.reserved.insert(pallet);
    }

    /// Withdraw a promise made by [`reserve`][Self::reserve].
    pub fn unreserve(&mut self, pallet: PalletId) -> bool {
        self.reserved.remove(&pallet)
    }

    #[inline]
    pub fn is_reserved(&self, pallet: PalletId) -> bool {
        self.reserved.contains(&pallet)
    }

    #[inline]
    pub fn reserved_count(&self) -> u32 {
        self.reserved.len() as u32
    }

    /// A pallet physically arrives: its reservation (if any) turns into
    /// occupied space.  Returns `false` when there is no room.
    pub fn receive(&mut self, pallet: PalletId) -> bool {
        let was_reserved = self.reserved.remove(&pallet);
        if self.storage.put(pallet) {
            return true;
        }
        if was_reserved {
            self.reserved.insert(pallet);
        }
        false
    }

    /// A pallet leaves the floor storage.
    pub fn dispatch(&mut self, pallet: PalletId) -> bool {
        self.storage.take(pallet)
    }

    /// Pallets currently on the floor plus those promised.
    pub fn committed(&self) -> u32 {
        self.storage.size() + self.reserved_count()
    }
}
