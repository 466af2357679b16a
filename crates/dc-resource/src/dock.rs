//! Docks: a resource handler with one exclusive dock-service forklift.

use dc_core::{DockId, ForkliftId, HandlerId, PalletId};

use crate::{ForkliftFleet, ResourceHandler};

/// Which side of the building a dock serves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DockKind {
    /// Outbound: orders are assembled here and loaded onto trucks.
    Load,
    /// Inbound: trucks are emptied here and pallets go to the racks.
    Unload,
}

/// A loading or unloading bay.
#[derive(Clone, Debug)]
pub struct Dock {
    pub id:          DockId,
    pub kind:        DockKind,
    pub handler:     ResourceHandler,
    /// A truck is parked at (or assigned to) this dock.
    pub is_occupied: bool,
    processing_forklift: Option<ForkliftId>,
}

impl Dock {
    pub fn new(id: DockId, kind: DockKind, capacity: u32) -> Self {
        Self {
            id,
            kind,
            handler: ResourceHandler::new(HandlerId::Dock(id), capacity),
            is_occupied: false,
            processing_forklift: None,
        }
    }

    /// The forklift assigned to serve this dock, if any.
    #[inline]
    pub fn processing_forklift(&self) -> Option<ForkliftId> {
        self.processing_forklift
    }

    #[inline]
    pub(crate) fn assign_forklift(&mut self, unit: ForkliftId) {
        debug_assert!(self.processing_forklift.is_none_or(|f| f == unit));
        self.processing_forklift = Some(unit);
    }

    /// Release `unit`, or the dock's own forklift when `unit` is `None`.
    ///
    /// Clears the dock assignment if the released unit is the assigned one.
    pub fn release_forklift(&mut self, unit: Option<ForkliftId>, fleet: &mut ForkliftFleet) {
        let Some(unit) = unit.or(self.processing_forklift) else {
            return;
        };
        if self.processing_forklift == Some(unit) {
            self.processing_forklift = None;
        }
        if let Some(forklift) = fleet.get_mut(unit) {
            self.handler.release(forklift);
        }
    }

    #[inline]
    pub fn space_available(&self) -> u32 {
        self.handler.space_available()
    }

    #[inline]
    pub fn reserve(&mut self, pallet: PalletId) {
        self.handler.reserve(pallet);
    }

    #[inline]
    pub fn unreserve(&mut self, pallet: PalletId) -> bool {
        self.handler.unreserve(pallet)
    }
}
