//! Wait gates: periodic re-evaluation of parked pallets and trucks, and the
//! movement lanes trucks use to reach and leave the docks.

use dc_core::{PalletId, TruckId};
use dc_schedule::WaitQueue;

use crate::truck::TruckTable;
use crate::WarehouseState;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LaneDirection {
    ToDock,
    FromDock,
}

/// One truck lane.  At most one truck manoeuvres at a time, in either
/// direction; the rest wait in arrival order.
#[derive(Clone, Debug, Default)]
pub struct MovementLane {
    pub waiting: WaitQueue<TruckId>,
    to_dock:     Option<TruckId>,
    from_dock:   Option<TruckId>,
}

impl MovementLane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is either start gate blocked by a truck mid-manoeuvre?
    pub fn any_moving(&self) -> bool {
        self.to_dock.is_some() || self.from_dock.is_some()
    }

    pub fn moving(&self, direction: LaneDirection) -> Option<TruckId> {
        match direction {
            LaneDirection::ToDock => self.to_dock,
            LaneDirection::FromDock => self.from_dock,
        }
    }

    /// A truck finished its manoeuvre; reopen its start gate.
    pub fn finish(&mut self, truck: TruckId) -> Option<LaneDirection> {
        if self.to_dock == Some(truck) {
            self.to_dock = None;
            Some(LaneDirection::ToDock)
        } else if self.from_dock == Some(truck) {
            self.from_dock = None;
            Some(LaneDirection::FromDock)
        } else {
            None
        }
    }

    /// Unblock the head truck if the lane is idle.
    ///
    /// A truck that already moved pallets leaves the dock; a fresh one drives
    /// to it.  Returns the truck and its direction when something moved.
    fn check_any_moving(&mut self, trucks: &TruckTable) -> Option<(TruckId, LaneDirection)> {
        if self.any_moving() {
            return None;
        }
        let head = self.waiting.front()?;
        let direction = if trucks.get(head).is_some_and(|t| t.processed_pallets > 0) {
            LaneDirection::FromDock
        } else {
            LaneDirection::ToDock
        };
        self.waiting.pop_front();
        match direction {
            LaneDirection::ToDock => self.to_dock = Some(head),
            LaneDirection::FromDock => self.from_dock = Some(head),
        }
        Some((head, direction))
    }
}

pub fn check_load_any_moving(state: &mut WarehouseState) -> Option<(TruckId, LaneDirection)> {
    state.load_lane.check_any_moving(&state.trucks)
}

pub fn check_unload_any_moving(state: &mut WarehouseState) -> Option<(TruckId, LaneDirection)> {
    state.unload_lane.check_any_moving(&state.trucks)
}

/// Release pallets waiting for a rack cell, in queue order.
///
/// A pallet qualifies while its type has more free cells than cells already
/// promised (`n_free_cells > reserved_cells`, strict).  Qualifying promises
/// a cell at once, so one freed cell releases exactly one pallet per pass.
/// With `>=` a type whose free cells are all promised would release one more
/// pallet than it can rack.
pub fn recalculate_wait_for_rack_system(state: &mut WarehouseState) -> Vec<PalletId> {
    let WarehouseState { types, pallets, wait_for_rack, .. } = state;
    wait_for_rack.release_where(|id| {
        let Some(ty) = pallets.get(id).and_then(|p| types.get_mut(p.type_id)) else {
            return false;
        };
        if ty.n_free_cells() > ty.reserved_cells {
            ty.reserved_cells += 1;
            return true;
        }
        false
    })
}

/// Release unloading trucks whose dock is free and can hold the whole cargo.
///
/// A released truck takes the dock and reserves floor space for every
/// pallet it carries.
pub fn recalculate_wait_for_dock_storage(state: &mut WarehouseState) -> Vec<TruckId> {
    let WarehouseState { docks, trucks, wait_for_dock_storage, .. } = state;
    wait_for_dock_storage.release_where(|id| {
        let Some(truck) = trucks.get(id) else {
            return false;
        };
        let Some(dock) = truck.dock.and_then(|d| docks.get_mut(d.index())) else {
            return false;
        };
        if dock.is_occupied || dock.space_available() < truck.pending.len() as u32 {
            return false;
        }
        dock.is_occupied = true;
        for &pallet in &truck.pending {
            dock.reserve(pallet);
        }
        true
    })
}
