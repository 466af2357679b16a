//! Order admission and storage reservation.
//!
//! An order waits in the queue until one destination (a load dock, or the
//! standby area as overflow) can hold the whole order and every type it
//! asks for has enough unreserved stock.  Admission then reserves the stock
//! and the destination space in one step so concurrent orders can never
//! promise the same pallet or the same floor cell twice.

use log::{debug, trace};

use dc_core::{HandlerId, OrderId, Tick, TypeId};
use dc_resource::{DockKind, ForkliftTask};

use crate::order::{Order, OrderState};
use crate::state::handler_in;
use crate::WarehouseState;

/// Create an order and claim its pallets from each type.
pub fn create_order(
    state:       &mut WarehouseState,
    capacities:  &[u32],
    add_to_head: bool,
    now:         Tick,
) -> OrderId {
    let id = state.orders.create(capacities, add_to_head, now);
    state.types.claim(capacities);
    state.stats.orders_created += 1;
    if let Some(order) = state.orders.get(id) {
        debug!("order #{} ({id}) created: {} pallets {:?}", order.number, order.size, capacities);
    }
    id
}

/// Does every type hold enough unreserved stock for `order`?
///
/// Compares against stored pallets not yet reserved (`n_free_pallets`), not
/// against free rack cells: an empty rack has every cell free but nothing to
/// assemble from.
pub fn enough_pallets_for_order(state: &WarehouseState, order: &Order) -> bool {
    order.capacities.iter().enumerate().all(|(i, &need)| {
        need == 0
            || state
                .types
                .get(TypeId(i as u16))
                .is_some_and(|t| t.n_free_pallets() >= need)
    })
}

/// Where `order` would be assembled.
///
/// The load dock with the most free space among those that fit the whole
/// order; on a tie the later dock wins.  Falls back to the standby area.
pub fn find_dock(state: &WarehouseState, order: &Order) -> Option<HandlerId> {
    let mut best: Option<(u32, HandlerId)> = None;
    for dock in state.load_docks() {
        let space = dock.space_available();
        if space >= order.size && best.is_none_or(|(b, _)| space >= b) {
            best = Some((space, dock.handler.id));
        }
    }
    if let Some((_, id)) = best {
        return Some(id);
    }
    (state.standby.space_available() >= order.size).then_some(HandlerId::Standby)
}

/// The first queued order that can be admitted now, and its destination.
///
/// Returns `None` while more than `ceiling` orders are already in flight.
pub fn next_order_for_assembling(
    state:   &WarehouseState,
    ceiling: usize,
) -> Option<(OrderId, HandlerId)> {
    if state.orders.in_flight() > ceiling {
        trace!("admission paused: {} orders in flight", state.orders.in_flight());
        return None;
    }
    state
        .orders
        .queue()
        .filter(|o| o.state == OrderState::WaitAtQueue)
        .find_map(|o| {
            let dest = find_dock(state, o)?;
            enough_pallets_for_order(state, o).then_some((o.id, dest))
        })
}

/// Admit `order` toward `dest`.
///
/// Converts the order's claim into fulfilment, reserves one stored pallet
/// per required unit, promises the destination space, and queues one move
/// per pallet.  Returns `false` if the order is not waiting in the queue.
pub fn begin_assembly(state: &mut WarehouseState, order: OrderId, dest: HandlerId) -> bool {
    let WarehouseState { types, pallets, orders, docks, standby, transport, stats, .. } = state;

    let Some(o) = orders.get_mut(order) else {
        return false;
    };
    if o.state != OrderState::WaitAtQueue {
        return false;
    }
    let Some(handler) = handler_in(docks, standby, dest) else {
        return false;
    };
    debug_assert!(handler.space_available() >= o.size, "{dest} cannot hold {order}");

    types.unclaim(&o.capacities);
    o.state = OrderState::WaitAssembling;
    o.handler = Some(dest);
    o.arrived = 0;

    for (i, &need) in o.capacities.iter().enumerate() {
        let Some(ty) = types.get_mut(TypeId(i as u16)) else {
            continue;
        };
        for _ in 0..need {
            let Some(pallet) = ty.get_pallet(order, pallets) else {
                debug_assert!(false, "{} ran out of stock while admitting {order}", ty.id);
                break;
            };
            if let Some(p) = pallets.get_mut(pallet) {
                p.handler = Some(dest);
            }
            handler.reserve(pallet);
            transport.request(ForkliftTask::PalletMove { pallet, target: dest });
            o.pallets.push(pallet);
        }
    }

    orders.dequeue(order);
    stats.orders_admitted += 1;
    debug!("{order} admitted toward {dest}");
    true
}

/// Move orders parked on the standby area to a load dock that can now hold
/// them.  Returns the number of orders moved.
pub fn move_from_storage_to_dock(state: &mut WarehouseState) -> usize {
    let parked: Vec<OrderId> = state.standby.orders.clone();
    let mut moved = 0;

    for order in parked {
        let Some(size) = state.orders.get(order).map(|o| o.size) else {
            continue;
        };
        let mut best: Option<(u32, usize)> = None;
        for (i, dock) in state.docks.iter().enumerate() {
            let space = dock.space_available();
            if dock.kind == DockKind::Load
                && space >= size
                && best.is_none_or(|(b, _)| space >= b)
            {
                best = Some((space, i));
            }
        }
        let Some((_, index)) = best else {
            continue;
        };

        let WarehouseState { pallets, orders, docks, standby, transport, .. } = &mut *state;
        let dock = &mut docks[index];
        let dest = dock.handler.id;
        let Some(o) = orders.get_mut(order) else {
            continue;
        };

        standby.orders.retain(|&x| x != order);
        o.state = OrderState::WaitAssembling;
        o.handler = Some(dest);
        o.arrived = 0;
        for &pallet in &o.pallets {
            if let Some(p) = pallets.get_mut(pallet) {
                p.handler = Some(dest);
            }
            dock.reserve(pallet);
            transport.request(ForkliftTask::PalletMove { pallet, target: dest });
        }
        debug!("{order} moves from standby to {dest}");
        moved += 1;
    }
    moved
}
