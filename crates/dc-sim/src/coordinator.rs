//! Truck-to-dock matching.

use log::debug;

use dc_core::{DockId, TruckId};
use dc_resource::Dock;

use crate::order::OrderState;
use crate::truck::Truck;
use crate::WarehouseState;

/// Sum of the sizes of `dock`'s parked orders that individually fit in
/// `truck_capacity`.
pub fn loadable_total(state: &WarehouseState, dock: &Dock, truck_capacity: u32) -> u32 {
    dock.handler
        .orders
        .iter()
        .filter_map(|&o| state.orders.get(o))
        .map(|o| o.size)
        .filter(|&size| size <= truck_capacity)
        .sum()
}

/// The load dock worth sending `truck` to.
///
/// Candidates are unoccupied load docks with at least one parked order.
/// The dock with the largest loadable total wins (first one on a tie), and
/// only if that total is at least half the truck's capacity.
pub fn find_dock_to_load_truck(state: &WarehouseState, truck: &Truck) -> Option<DockId> {
    let mut best: Option<(u32, DockId)> = None;
    for dock in state.load_docks() {
        if dock.is_occupied || dock.handler.orders.is_empty() {
            continue;
        }
        let total = loadable_total(state, dock, truck.capacity);
        if best.is_none_or(|(b, _)| total > b) {
            best = Some((total, dock.id));
        }
    }
    let (total, dock) = best?;
    (2 * total >= truck.capacity).then_some(dock)
}

/// Assign `dock`'s parked orders to `truck` in arrival order, first fit.
///
/// Each assigned order leaves the dock's order list and its pallets are
/// queued for loading onto the truck.  Returns the number of orders assigned.
pub fn find_orders_for_loading(state: &mut WarehouseState, dock: DockId, truck: TruckId) -> usize {
    let WarehouseState { docks, orders, pallets, trucks, .. } = state;
    let (Some(dock), Some(truck)) = (docks.get_mut(dock.index()), trucks.get_mut(truck)) else {
        return 0;
    };

    let mut remaining = truck.remaining_capacity();
    let mut assigned = Vec::new();
    for &id in &dock.handler.orders {
        let Some(order) = orders.get_mut(id) else {
            continue;
        };
        if order.size > remaining {
            continue;
        }
        remaining -= order.size;
        order.state = OrderState::Loading;
        order.truck = Some(truck.id);
        truck.assign_order(id, order.size);
        for &p in &order.pallets {
            if let Some(pallet) = pallets.get_mut(p) {
                pallet.truck = Some(truck.id);
            }
            truck.pending.push_back(p);
        }
        assigned.push(id);
    }

    dock.handler.orders.retain(|o| !assigned.contains(o));
    debug!("{}: {} orders ({} pallets) for {}", dock.id, assigned.len(), truck.orders_capacity(), truck.id);
    assigned.len()
}

/// The unload dock with the most free space; the first one on a tie.
pub fn find_unload_dock(state: &WarehouseState) -> Option<DockId> {
    let mut best: Option<(u32, DockId)> = None;
    for dock in state.unload_docks() {
        let space = dock.space_available();
        if best.is_none_or(|(b, _)| space > b) {
            best = Some((space, dock.id));
        }
    }
    best.map(|(_, id)| id)
}
