//! Pallet records and the pallet table.

use rustc_hash::FxHashMap;

use dc_core::{ForkliftId, HandlerId, OrderId, PalletId, RackId, TruckId, TypeId};

/// Where a pallet physically is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PalletLocation {
    /// Stored in a rack cell.
    Rack(RackId),
    /// Carried by a forklift.
    Transit,
    /// Sitting in a dock's or the standby area's floor storage.
    Handler(HandlerId),
    /// On board an unloading truck that has not been emptied yet.
    Truck(TruckId),
}

/// A unit of goods of one [`TypeId`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pallet {
    pub id:              PalletId,
    pub type_id:         TypeId,
    /// Claimed for a specific order; never handed out twice.
    pub reserved:        bool,
    pub order:           Option<OrderId>,
    /// Dock or standby area the pallet is routed to or sits in.
    pub handler:         Option<HandlerId>,
    pub truck:           Option<TruckId>,
    /// The forklift currently owning this pallet's move, if any.
    pub seized_forklift: Option<ForkliftId>,
    pub location:        PalletLocation,
}

impl Pallet {
    pub fn new(id: PalletId, type_id: TypeId, location: PalletLocation) -> Self {
        Self {
            id,
            type_id,
            reserved:        false,
            order:           None,
            handler:         None,
            truck:           None,
            seized_forklift: None,
            location,
        }
    }
}

/// Every pallet currently inside the building (or on a truck at a dock).
///
/// Ids come from a monotonic counter and are never reused, so a stale
/// `PalletId` held by a finished task simply misses on lookup.
#[derive(Default)]
pub struct PalletStore {
    pallets: FxHashMap<PalletId, Pallet>,
    next_id: u32,
}

impl PalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pallet and return its id.
    pub fn spawn(&mut self, type_id: TypeId, location: PalletLocation) -> PalletId {
        let id = PalletId(self.next_id);
        self.next_id += 1;
        self.pallets.insert(id, Pallet::new(id, type_id, location));
        id
    }

    #[inline]
    pub fn get(&self, id: PalletId) -> Option<&Pallet> {
        self.pallets.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: PalletId) -> Option<&mut Pallet> {
        self.pallets.get_mut(&id)
    }

    /// Remove a pallet that leaves the system (shipped).
    pub fn remove(&mut self, id: PalletId) -> Option<Pallet> {
        self.pallets.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.pallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pallets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pallet> {
        self.pallets.values()
    }
}
