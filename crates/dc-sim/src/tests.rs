//! Unit and integration tests for dc-sim.

use dc_core::{
    DockId, ForkliftId, ForkliftLimits, HandlerId, OrderId, PalletId, SimRng, Tick, TruckId,
    TypeId, WarehouseConfig,
};
use dc_resource::{ForkliftOwner, ForkliftTask};
use dc_schedule::ScriptedOrder;
use dc_storage::PalletLocation;

use crate::coordinator::{find_dock_to_load_truck, find_orders_for_loading, find_unload_dock};
use crate::gates::{
    check_load_any_moving, recalculate_wait_for_dock_storage, recalculate_wait_for_rack_system,
};
use crate::matcher::{
    begin_assembly, create_order, enough_pallets_for_order, find_dock, move_from_storage_to_dock,
    next_order_for_assembling,
};
use crate::order::ORDER_NUMBER_WRAP;
use crate::transport::on_forklift_request;
use crate::{
    LaneDirection, NoopObserver, OrderBook, OrderGenerator, OrderState, OrderTemplate, SimBuilder,
    SimError, SimObserver, Truck, TruckKind, WarehouseState,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One pallet type, one 10-cell rack, two 20-pallet load docks, one unload
/// dock, a 20-pallet standby area, three forklifts.
fn layout() -> WarehouseConfig {
    WarehouseConfig {
        pallet_type_count: 1,
        rack_count:        1,
        rack_capacity:     10,
        load_docks:        2,
        unload_docks:      1,
        dock_capacity:     20,
        standby_capacity:  20,
        forklift_count:    3,
        ..Default::default()
    }
}

fn warehouse() -> WarehouseState {
    WarehouseState::new(&layout())
}

/// Put `n` fresh pallets of type `ty` into its racks.
fn stock(state: &mut WarehouseState, ty: u16, n: u32) {
    for _ in 0..n {
        let id = state.pallets.spawn(TypeId(ty), PalletLocation::Transit);
        let pallet = state.pallets.get_mut(id).unwrap();
        state.types.get_mut(TypeId(ty)).unwrap().store(pallet).unwrap();
    }
}

/// Park an order of `size` pallets (fake ids) on `dock` without a claim.
fn parked_order(state: &mut WarehouseState, dock: usize, size: u32) -> OrderId {
    let id = state.orders.create(&[size], false, Tick::ZERO);
    state.orders.dequeue(id);
    let order = state.orders.get_mut(id).unwrap();
    order.state = OrderState::WaitAtDock;
    order.pallets = (0..size).map(|i| PalletId(10_000 + id.0 * 100 + i)).collect();
    state.docks[dock].handler.orders.push(id);
    id
}

/// Two types with 10 pallets each, one load and one unload dock, every
/// random source disabled.
fn quiet_config() -> WarehouseConfig {
    WarehouseConfig {
        pallet_type_count:              2,
        rack_count:                     2,
        rack_capacity:                  20,
        initial_fill_level:             0.5,
        load_docks:                     1,
        unload_docks:                   1,
        dock_capacity:                  20,
        standby_capacity:               20,
        forklift_count:                 3,
        min_order_size:                 2,
        max_order_size:                 10,
        truck_capacity:                 20,
        order_interval_ticks:           0,
        loading_truck_interval_ticks:   0,
        unloading_truck_interval_ticks: 0,
        total_ticks:                    200,
        output_interval_ticks:          10,
        ..Default::default()
    }
}

fn scripted(tick: u64, capacities: Vec<u32>) -> ScriptedOrder {
    ScriptedOrder { tick: Tick(tick), capacities, priority: false }
}

// ── Orders ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod orders {
    use super::*;

    #[test]
    fn display_number_wraps_internal_id_does_not() {
        let mut book = OrderBook::new();
        let mut last = OrderId(0);
        for _ in 0..ORDER_NUMBER_WRAP {
            last = book.create(&[1], false, Tick::ZERO);
        }
        assert_eq!(book.get(last).unwrap().number, ORDER_NUMBER_WRAP - 1);
        let wrapped = book.create(&[1], false, Tick::ZERO);
        assert_eq!(book.get(wrapped).unwrap().number, 0);
        assert_eq!(wrapped, OrderId(ORDER_NUMBER_WRAP as u32));
        assert_eq!(book.len(), ORDER_NUMBER_WRAP as usize + 1);
    }

    #[test]
    fn head_insert_jumps_the_queue() {
        let mut book = OrderBook::new();
        let a = book.create(&[1, 2], false, Tick::ZERO);
        let b = book.create(&[3, 0], true, Tick::ZERO);
        let ids: Vec<OrderId> = book.queue().map(|o| o.id).collect();
        assert_eq!(ids, vec![b, a]);
        assert_eq!(book.get(a).unwrap().size, 3);
    }

    #[test]
    fn retire_drops_order_and_queue_entry() {
        let mut book = OrderBook::new();
        let a = book.create(&[1], false, Tick::ZERO);
        assert!(book.retire(a).is_some());
        assert!(book.is_empty());
        assert_eq!(book.queue_len(), 0);
        assert_eq!(book.created(), 1);
    }

    #[test]
    fn generator_stays_within_size_bounds() {
        let generator = OrderGenerator::new(4, 12, 3);
        let mut rng = SimRng::new(7);
        for _ in 0..500 {
            let caps = generator.draw(&mut rng);
            assert_eq!(caps.len(), 3);
            let total: u32 = caps.iter().sum();
            assert!((4..=12).contains(&total), "total {total}");
        }
    }

    #[test]
    fn template_respects_min_and_max() {
        let mut t = OrderTemplate::new(2, 2, 3);
        assert!(t.increase(0));
        assert!(t.increase(1));
        assert!(!t.decrease(0), "already at minimum");
        assert!(t.increase(1));
        assert!(!t.increase(0), "already at maximum");
        assert_eq!(t.capacities(), &[1, 2]);
        assert!(t.decrease(1));
        assert!(!t.decrease(5));
        assert_eq!(t.sum(), 2);
    }

    #[test]
    fn randomized_template_is_max_size() {
        let mut rng = SimRng::new(3);
        let t = OrderTemplate::randomized(4, 2, 9, &mut rng);
        assert_eq!(t.sum(), 9);
        assert_eq!(t.capacities().len(), 4);
    }
}

// ── Trucks ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trucks {
    use super::*;

    #[test]
    fn load_pallet_signals_completion_exactly_once() {
        let mut t = Truck::new(TruckId(0), TruckKind::Loading, 20, Tick::ZERO);
        t.assign_order(OrderId(0), 2);
        t.assign_order(OrderId(1), 1);
        assert_eq!(t.orders_capacity(), 3);
        assert_eq!(t.remaining_capacity(), 17);
        assert!(!t.load_pallet());
        assert!(!t.load_pallet());
        assert_eq!(t.progress_text(), "2 / 3");
        assert!(t.load_pallet());
        assert!(t.is_done());
    }

    #[test]
    fn unloading_truck_counts_processed_pallets() {
        let mut t = Truck::new(TruckId(1), TruckKind::Unloading, 2, Tick::ZERO);
        t.pending.extend([PalletId(5), PalletId(6)]);
        assert_eq!(t.unload_pallet(), Some(PalletId(5)));
        assert_eq!(t.progress_text(), "1 / 2");
        assert_eq!(t.unload_pallet(), Some(PalletId(6)));
        assert_eq!(t.unload_pallet(), None);
        assert!(t.is_done());
        assert_eq!(t.processed_pallets, 2);
    }
}

// ── OrderMatcher ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod matcher {
    use super::*;

    #[test]
    fn create_order_claims_per_type() {
        let mut s = WarehouseState::new(&quiet_config());
        create_order(&mut s, &[3, 1], false, Tick::ZERO);
        create_order(&mut s, &[0, 2], false, Tick::ZERO);
        assert_eq!(s.types.get(TypeId(0)).unwrap().claimed, 3);
        assert_eq!(s.types.get(TypeId(1)).unwrap().claimed, 3);
        assert_eq!(s.stats.orders_created, 2);
    }

    #[test]
    fn admission_waits_for_enough_stock() {
        let mut s = warehouse();
        stock(&mut s, 0, 5);
        let id = create_order(&mut s, &[10], false, Tick::ZERO);
        assert!(!enough_pallets_for_order(&s, s.orders.get(id).unwrap()));
        assert_eq!(next_order_for_assembling(&s, 60), None);

        stock(&mut s, 0, 5);
        let (order, _) = next_order_for_assembling(&s, 60).unwrap();
        assert_eq!(order, id);
    }

    #[test]
    fn admission_skips_orders_that_cannot_start() {
        let mut s = warehouse();
        stock(&mut s, 0, 6);
        let big = create_order(&mut s, &[8], false, Tick::ZERO);
        let small = create_order(&mut s, &[4], false, Tick::ZERO);
        let (order, _) = next_order_for_assembling(&s, 60).unwrap();
        assert_eq!(order, small);
        assert_ne!(order, big);
    }

    #[test]
    fn admitted_orders_always_have_stock() {
        let mut rng = SimRng::new(11);
        let generator = OrderGenerator::new(1, 10, 1);
        for round in 0..50 {
            let mut s = warehouse();
            stock(&mut s, 0, round % 11);
            for _ in 0..5 {
                let caps = generator.draw(&mut rng);
                create_order(&mut s, &caps, false, Tick::ZERO);
            }
            while let Some((order, dest)) = next_order_for_assembling(&s, 60) {
                assert!(enough_pallets_for_order(&s, s.orders.get(order).unwrap()));
                assert!(begin_assembly(&mut s, order, dest));
            }
            assert!(s.invariant_violations().is_empty());
        }
    }

    #[test]
    fn in_flight_ceiling_pauses_admission() {
        let mut s = warehouse();
        stock(&mut s, 0, 10);
        for _ in 0..3 {
            create_order(&mut s, &[1], false, Tick::ZERO);
        }
        let mut admitted = 0;
        while let Some((order, dest)) = next_order_for_assembling(&s, 1) {
            begin_assembly(&mut s, order, dest);
            admitted += 1;
        }
        assert_eq!(admitted, 2, "admits while in-flight count is at most the ceiling");
        assert_eq!(s.orders.in_flight(), 2);
    }

    #[test]
    fn find_dock_prefers_most_space() {
        let mut s = warehouse();
        for i in 0..5 {
            s.docks[1].reserve(PalletId(900 + i));
        }
        let id = s.orders.create(&[12], false, Tick::ZERO);
        let order = s.orders.get(id).unwrap();
        assert_eq!(find_dock(&s, order), Some(HandlerId::Dock(DockId(0))));
    }

    #[test]
    fn find_dock_tie_goes_to_later_dock() {
        let mut s = warehouse();
        let id = s.orders.create(&[5], false, Tick::ZERO);
        let order = s.orders.get(id).unwrap();
        assert_eq!(find_dock(&s, order), Some(HandlerId::Dock(DockId(1))));
    }

    #[test]
    fn find_dock_falls_back_to_standby_then_nothing() {
        let mut s = warehouse();
        for dock in 0..2 {
            for i in 0..5 {
                s.docks[dock].reserve(PalletId(900 + dock as u32 * 10 + i));
            }
        }
        let fits_standby = s.orders.create(&[18], false, Tick::ZERO);
        let too_big = s.orders.create(&[21], false, Tick::ZERO);
        assert_eq!(find_dock(&s, s.orders.get(fits_standby).unwrap()), Some(HandlerId::Standby));
        assert_eq!(find_dock(&s, s.orders.get(too_big).unwrap()), None);
    }

    #[test]
    fn unload_docks_never_host_orders() {
        let mut s = warehouse();
        for dock in 0..2 {
            for i in 0..20 {
                s.docks[dock].reserve(PalletId(900 + dock as u32 * 100 + i));
            }
        }
        let id = s.orders.create(&[3], false, Tick::ZERO);
        assert_eq!(find_dock(&s, s.orders.get(id).unwrap()), Some(HandlerId::Standby));
    }

    #[test]
    fn begin_assembly_reserves_stock_and_space() {
        let mut s = warehouse();
        stock(&mut s, 0, 10);
        let id = create_order(&mut s, &[4], false, Tick::ZERO);
        let (order, dest) = next_order_for_assembling(&s, 60).unwrap();
        assert!(begin_assembly(&mut s, order, dest));

        let ty = s.types.get(TypeId(0)).unwrap();
        assert_eq!(ty.claimed, 0);
        assert_eq!(ty.n_free_pallets(), 6);
        assert_eq!(ty.storage.size(), 10, "pallets stay racked until picked up");

        let o = s.orders.get(id).unwrap();
        assert_eq!(o.state, OrderState::WaitAssembling);
        assert_eq!(o.handler, Some(dest));
        assert_eq!(o.pallets.len(), 4);
        for &p in &o.pallets {
            let pallet = s.pallets.get(p).unwrap();
            assert!(pallet.reserved);
            assert_eq!(pallet.order, Some(id));
            assert_eq!(pallet.handler, Some(dest));
        }
        assert_eq!(s.handler(dest).unwrap().space_available(), 16);
        assert_eq!(s.transport.len(), 4);
        assert_eq!(s.orders.queue_len(), 0);
        assert!(!begin_assembly(&mut s, order, dest), "already admitted");
        assert!(s.invariant_violations().is_empty());
    }

    #[test]
    fn standby_order_moves_to_dock_once_space_frees() {
        let mut s = warehouse();
        stock(&mut s, 0, 10);
        for dock in 0..2 {
            for i in 0..15 {
                s.docks[dock].reserve(PalletId(900 + dock as u32 * 100 + i));
            }
        }
        let id = create_order(&mut s, &[8], false, Tick::ZERO);
        let (order, dest) = next_order_for_assembling(&s, 60).unwrap();
        assert_eq!(dest, HandlerId::Standby);
        begin_assembly(&mut s, order, dest);

        // Deliver the pallets by hand and park the order.
        let pallets = s.orders.get(id).unwrap().pallets.clone();
        for &p in &pallets {
            let pallet = s.pallets.get_mut(p).unwrap();
            s.types.get_mut(TypeId(0)).unwrap().take(pallet);
            assert!(s.standby.receive(p));
            s.pallets.get_mut(p).unwrap().location = PalletLocation::Handler(HandlerId::Standby);
        }
        s.standby.orders.push(id);
        s.orders.get_mut(id).unwrap().state = OrderState::WaitAtStandby;
        s.transport = Default::default();

        assert_eq!(move_from_storage_to_dock(&mut s), 0, "no dock has 8 free cells");

        for i in 0..10 {
            s.docks[0].unreserve(PalletId(900 + i));
        }
        assert_eq!(move_from_storage_to_dock(&mut s), 1);
        let o = s.orders.get(id).unwrap();
        assert_eq!(o.handler, Some(HandlerId::Dock(DockId(0))));
        assert_eq!(o.state, OrderState::WaitAssembling);
        assert!(s.standby.orders.is_empty());
        assert_eq!(s.docks[0].space_available(), 15 - 8);
        assert_eq!(s.transport.len(), 8);
        assert!(pallets.iter().all(|&p| s.docks[0].handler.is_reserved(p)));
    }
}

// ── TruckCoordinator ──────────────────────────────────────────────────────────

#[cfg(test)]
mod coordinator {
    use super::*;

    fn truck(capacity: u32) -> Truck {
        Truck::new(TruckId(0), TruckKind::Loading, capacity, Tick::ZERO)
    }

    #[test]
    fn picks_dock_with_larger_loadable_total() {
        let mut s = warehouse();
        parked_order(&mut s, 0, 12);
        parked_order(&mut s, 1, 15);
        assert_eq!(find_dock_to_load_truck(&s, &truck(20)), Some(DockId(1)));
    }

    #[test]
    fn half_capacity_threshold_is_inclusive() {
        let mut s = warehouse();
        parked_order(&mut s, 0, 10);
        assert_eq!(find_dock_to_load_truck(&s, &truck(20)), Some(DockId(0)));

        let mut s = warehouse();
        parked_order(&mut s, 0, 9);
        assert_eq!(find_dock_to_load_truck(&s, &truck(20)), None);
    }

    #[test]
    fn oversized_orders_do_not_count() {
        let mut s = warehouse();
        parked_order(&mut s, 0, 25);
        parked_order(&mut s, 0, 4);
        assert_eq!(find_dock_to_load_truck(&s, &truck(20)), None);
    }

    #[test]
    fn occupied_and_empty_docks_are_skipped() {
        let mut s = warehouse();
        parked_order(&mut s, 0, 15);
        s.docks[0].is_occupied = true;
        assert_eq!(find_dock_to_load_truck(&s, &truck(20)), None);
    }

    #[test]
    fn tie_goes_to_first_dock() {
        let mut s = warehouse();
        parked_order(&mut s, 0, 11);
        parked_order(&mut s, 1, 11);
        assert_eq!(find_dock_to_load_truck(&s, &truck(20)), Some(DockId(0)));
    }

    #[test]
    fn orders_assigned_first_fit_in_arrival_order() {
        let mut s = warehouse();
        let a = parked_order(&mut s, 0, 8);
        let b = parked_order(&mut s, 0, 15);
        let c = parked_order(&mut s, 0, 6);
        let t = s.trucks.arrive(TruckKind::Loading, 20, Tick::ZERO);

        assert_eq!(find_orders_for_loading(&mut s, DockId(0), t), 2);

        let truck = s.trucks.get(t).unwrap();
        assert_eq!(truck.orders, vec![a, c]);
        assert_eq!(truck.orders_capacity(), 14);
        assert_eq!(truck.pending.len(), 14);
        assert_eq!(s.docks[0].handler.orders, vec![b]);
        assert_eq!(s.orders.get(a).unwrap().state, OrderState::Loading);
        assert_eq!(s.orders.get(a).unwrap().truck, Some(t));
        assert_eq!(s.orders.get(b).unwrap().state, OrderState::WaitAtDock);
    }

    #[test]
    fn unload_dock_with_most_space() {
        let cfg = WarehouseConfig { unload_docks: 2, ..layout() };
        let mut s = WarehouseState::new(&cfg);
        assert_eq!(find_unload_dock(&s), Some(DockId(2)), "tie goes to the first");
        s.docks[2].reserve(PalletId(1));
        assert_eq!(find_unload_dock(&s), Some(DockId(3)));
    }
}

// ── WaitGateManager ───────────────────────────────────────────────────────────

#[cfg(test)]
mod gates {
    use super::*;

    fn inbound(s: &mut WarehouseState) -> PalletId {
        let id = s.pallets.spawn(TypeId(0), PalletLocation::Handler(HandlerId::Dock(DockId(2))));
        s.wait_for_rack.enter(id);
        id
    }

    #[test]
    fn rack_wait_releases_one_pallet_per_freed_cell() {
        let mut s = warehouse();
        stock(&mut s, 0, 9);
        let p1 = inbound(&mut s);
        let p2 = inbound(&mut s);
        let p3 = inbound(&mut s);

        assert_eq!(recalculate_wait_for_rack_system(&mut s), vec![p1]);
        assert_eq!(s.types.get(TypeId(0)).unwrap().reserved_cells, 1);
        assert!(recalculate_wait_for_rack_system(&mut s).is_empty());

        // P1 lands in its cell, then an order pallet leaves the rack.
        let ty = s.types.get_mut(TypeId(0)).unwrap();
        ty.reserved_cells -= 1;
        ty.store(s.pallets.get_mut(p1).unwrap()).unwrap();
        let out = ty.storage.pallets().next().unwrap();
        ty.take(s.pallets.get_mut(out).unwrap());

        assert_eq!(recalculate_wait_for_rack_system(&mut s), vec![p2]);
        assert_eq!(s.wait_for_rack.iter().collect::<Vec<_>>(), vec![p3]);
    }

    #[test]
    fn dock_storage_wait_needs_room_for_whole_cargo() {
        let mut s = warehouse();
        let arrive = |s: &mut WarehouseState| {
            let t = s.trucks.arrive(TruckKind::Unloading, 20, Tick::ZERO);
            let truck = s.trucks.get_mut(t).unwrap();
            truck.pending.extend((0..20).map(|i| PalletId(500 + t.0 * 100 + i)));
            truck.dock = Some(DockId(2));
            s.wait_for_dock_storage.enter(t);
            t
        };
        let a = arrive(&mut s);
        let b = arrive(&mut s);

        s.docks[2].reserve(PalletId(1));
        assert!(recalculate_wait_for_dock_storage(&mut s).is_empty());
        s.docks[2].unreserve(PalletId(1));

        assert_eq!(recalculate_wait_for_dock_storage(&mut s), vec![a]);
        assert!(s.docks[2].is_occupied);
        assert_eq!(s.docks[2].space_available(), 0);
        assert!(recalculate_wait_for_dock_storage(&mut s).is_empty());
        assert!(s.wait_for_dock_storage.contains(b));
    }

    #[test]
    fn lane_lets_one_truck_move_at_a_time() {
        let mut s = warehouse();
        let t1 = s.trucks.arrive(TruckKind::Loading, 20, Tick::ZERO);
        let t2 = s.trucks.arrive(TruckKind::Loading, 20, Tick::ZERO);
        s.load_lane.waiting.enter(t1);
        s.load_lane.waiting.enter(t2);

        assert_eq!(check_load_any_moving(&mut s), Some((t1, LaneDirection::ToDock)));
        assert_eq!(check_load_any_moving(&mut s), None, "lane busy");
        assert_eq!(s.load_lane.moving(LaneDirection::ToDock), Some(t1));

        assert_eq!(s.load_lane.finish(t1), Some(LaneDirection::ToDock));
        s.trucks.get_mut(t2).unwrap().processed_pallets = 3;
        assert_eq!(check_load_any_moving(&mut s), Some((t2, LaneDirection::FromDock)));
        assert!(s.load_lane.any_moving());
        assert!(s.load_lane.waiting.is_empty());
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod transport {
    use super::*;

    #[test]
    fn identical_requests_are_queued_once() {
        let mut s = warehouse();
        assert!(s.transport.request(ForkliftTask::DockService(DockId(0))));
        assert!(!s.transport.request(ForkliftTask::DockService(DockId(0))));
        assert_eq!(s.transport.len(), 1);
    }

    #[test]
    fn requests_route_to_the_right_decision() {
        let mut s = warehouse();
        stock(&mut s, 0, 1);
        let limits = ForkliftLimits::default();
        let pallet = s.types.get(TypeId(0)).unwrap().storage.pallets().next().unwrap();

        assert!(on_forklift_request(&mut s, ForkliftTask::DockService(DockId(0)), ForkliftId(0), limits));
        assert_eq!(s.docks[0].processing_forklift(), Some(ForkliftId(0)));

        let mv = ForkliftTask::PalletMove { pallet, target: HandlerId::Dock(DockId(0)) };
        assert!(!on_forklift_request(&mut s, mv, ForkliftId(0), limits), "unit busy with the dock");
        assert!(on_forklift_request(&mut s, mv, ForkliftId(1), limits));
        assert_eq!(s.pallets.get(pallet).unwrap().seized_forklift, Some(ForkliftId(1)));
        assert_eq!(
            s.forklifts.get(ForkliftId(1)).unwrap().owner(),
            ForkliftOwner::Pallet(pallet)
        );

        let ghost = ForkliftTask::PalletMove { pallet: PalletId(999), target: HandlerId::Standby };
        assert!(!on_forklift_request(&mut s, ghost, ForkliftId(2), limits));
        assert!(!on_forklift_request(&mut s, ForkliftTask::DockService(DockId(9)), ForkliftId(2), limits));
        assert!(s.invariant_violations().is_empty());
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use super::*;

    #[test]
    fn handler_lookup_covers_docks_and_standby() {
        let mut s = warehouse();
        assert!(s.handler_mut(HandlerId::Dock(DockId(2))).is_some());
        assert!(s.handler_mut(HandlerId::Dock(DockId(3))).is_none());

        s.handler_mut(HandlerId::Standby).unwrap().reserve(PalletId(1));
        assert_eq!(s.standby.reserved_count(), 1);
        assert_eq!(s.handler(HandlerId::Standby).unwrap().space_available(), 19);
    }

    #[test]
    fn restock_headroom_counts_inbound_pallets() {
        let mut s = warehouse();
        stock(&mut s, 0, 7);
        assert_eq!(s.restock_headroom(), vec![3]);

        s.pallets.spawn(TypeId(0), PalletLocation::Truck(TruckId(0)));
        assert_eq!(s.restock_headroom(), vec![2]);

        let on_dock = s.pallets.spawn(TypeId(0), PalletLocation::Handler(HandlerId::Dock(DockId(2))));
        s.wait_for_rack.enter(on_dock);
        assert_eq!(s.restock_headroom(), vec![1]);

        s.types.get_mut(TypeId(0)).unwrap().reserved_cells = 1;
        assert_eq!(s.restock_headroom(), vec![0]);

        s.pallets.spawn(TypeId(0), PalletLocation::Truck(TruckId(0)));
        assert_eq!(s.restock_headroom(), vec![0], "never negative");
    }

    #[test]
    fn fresh_warehouse_is_consistent() {
        let s = warehouse();
        assert_eq!(s.load_docks().count(), 2);
        assert_eq!(s.unload_docks().count(), 1);
        assert!(s.invariant_violations().is_empty());
    }

    #[test]
    fn reports_stale_claim() {
        let mut s = warehouse();
        s.types.get_mut(TypeId(0)).unwrap().claimed = 3;
        let report = s.invariant_violations();
        assert_eq!(report.len(), 1);
        assert!(report[0].contains("claimed 3"), "{report:?}");
    }

    #[test]
    fn reports_forklift_owner_without_assignment() {
        let mut s = warehouse();
        let WarehouseState { docks, forklifts, .. } = &mut s;
        let unit = forklifts.get_mut(ForkliftId(0)).unwrap();
        assert!(docks[0].handler.seize(unit, ForkliftOwner::Dock(DockId(0)), 2));

        let report = s.invariant_violations();
        assert_eq!(report.len(), 1, "{report:?}");
    }

    #[test]
    fn in_flight_counts_both_assembly_states() {
        let mut book = OrderBook::new();
        let a = book.create(&[1], false, Tick::ZERO);
        let b = book.create(&[1], false, Tick::ZERO);
        book.create(&[1], false, Tick::ZERO);
        book.get_mut(a).unwrap().state = OrderState::WaitAssembling;
        book.get_mut(b).unwrap().state = OrderState::Assembling;
        assert_eq!(book.count_in(OrderState::WaitAtQueue), 1);
        assert_eq!(book.in_flight(), 2);
    }
}

#[cfg(test)]
mod sim {
    use super::*;

    #[derive(Default)]
    struct Counter {
        starts:    u64,
        ends:      u64,
        snapshots: u64,
        finished:  bool,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }
        fn on_tick_end(&mut self, _tick: Tick, _events: usize) {
            self.ends += 1;
        }
        fn on_snapshot(&mut self, _tick: Tick, state: &WarehouseState) {
            assert!(state.invariant_violations().is_empty());
            self.snapshots += 1;
        }
        fn on_sim_end(&mut self, _final_tick: Tick, _state: &WarehouseState) {
            self.finished = true;
        }
    }

    #[test]
    fn observer_hooks_fire_on_schedule() {
        let cfg = WarehouseConfig { total_ticks: 100, ..quiet_config() };
        let mut sim = SimBuilder::new(cfg).build().unwrap();
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 100);
        assert_eq!(obs.ends, 100);
        assert_eq!(obs.snapshots, 10);
        assert!(obs.finished);
        assert_eq!(sim.clock.current_tick, Tick(100));
    }

    #[test]
    fn builder_stocks_racks_unless_told_not_to() {
        let sim = SimBuilder::new(quiet_config()).build().unwrap();
        assert_eq!(sim.state.pallets_in_racks(), 20);
        let sim = SimBuilder::new(quiet_config()).empty_racks().build().unwrap();
        assert_eq!(sim.state.pallets_in_racks(), 0);
    }

    #[test]
    fn builder_rejects_bad_inputs() {
        let bad_script = SimBuilder::new(quiet_config()).script(vec![scripted(1, vec![1, 1, 1])]).build();
        assert!(matches!(bad_script, Err(SimError::TypeCountMismatch { expected: 2, got: 3, .. })));

        let cfg = WarehouseConfig { forklift_count: 0, ..quiet_config() };
        assert!(matches!(SimBuilder::new(cfg).build(), Err(SimError::Core(_))));

        let zero = ForkliftLimits { dock_service: 0, pallet_move: 1 };
        let built = SimBuilder::new(quiet_config()).forklift_limits(zero).build();
        assert!(matches!(built, Err(SimError::Config(_))));
    }

    #[test]
    fn forklift_limits_change_at_runtime() {
        let mut sim = SimBuilder::new(quiet_config()).build().unwrap();
        let lower = ForkliftLimits { dock_service: 1, pallet_move: 1 };
        sim.set_forklift_limits(lower).unwrap();
        assert_eq!(sim.forklift_limits(), lower);
        assert!(sim.set_forklift_limits(ForkliftLimits { dock_service: 1, pallet_move: 0 }).is_err());
        assert_eq!(sim.forklift_limits(), lower);
    }

    #[test]
    fn lowered_move_limit_serialises_assembly() {
        let script = vec![scripted(1, vec![2, 2])];
        let mut sim = SimBuilder::new(quiet_config()).script(script).build().unwrap();
        sim.set_forklift_limits(ForkliftLimits { dock_service: 2, pallet_move: 1 }).unwrap();
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        assert_eq!(sim.state.forklifts.in_use_count(), 1);
        assert_eq!(sim.state.transport.len(), 3);
    }

    #[test]
    fn submitted_order_goes_to_the_head() {
        let mut sim = SimBuilder::new(quiet_config()).build().unwrap();
        let mut template = OrderTemplate::new(2, 2, 10);
        template.increase(0);
        template.increase(1);
        let first = sim.submit_order(&template);
        let random = sim.order_template();
        let second = sim.submit_order(&random);
        let head: Vec<OrderId> = sim.state.orders.queue().map(|o| o.id).collect();
        assert_eq!(head, vec![second, first]);
    }

    #[test]
    fn scripted_order_is_assembled_at_the_dock() {
        let script = vec![scripted(2, vec![3, 2])];
        let mut sim = SimBuilder::new(quiet_config()).script(script).build().unwrap();
        sim.run_ticks(30, &mut NoopObserver).unwrap();

        let s = &sim.state;
        let order = s.orders.iter().next().unwrap();
        assert_eq!(order.state, OrderState::WaitAtDock);
        assert_eq!(order.arrived, 5);
        assert_eq!(s.docks[0].handler.storage.size(), 5);
        assert_eq!(s.docks[0].handler.reserved_count(), 0);
        assert_eq!(s.docks[0].handler.orders, vec![order.id]);
        assert_eq!(s.pallets_in_racks(), 15);
        assert_eq!(s.forklifts.in_use_count(), 0);
        assert!(s.transport.is_empty());
        assert!(s.invariant_violations().is_empty());
    }

    #[test]
    fn assembled_orders_leave_on_a_truck() {
        let cfg = WarehouseConfig { loading_truck_interval_ticks: 40, ..quiet_config() };
        let script = vec![scripted(1, vec![3, 3]), scripted(1, vec![3, 3])];
        let mut sim = SimBuilder::new(cfg).script(script).build().unwrap();
        sim.run_ticks(100, &mut NoopObserver).unwrap();

        let s = &sim.state;
        assert_eq!(s.stats.orders_shipped, 2);
        assert_eq!(s.stats.pallets_shipped, 12);
        assert_eq!(s.stats.loading_trucks_departed, 1);
        assert!(s.orders.is_empty());
        assert_eq!(s.pallets.len(), 8);
        assert_eq!(s.docks[0].handler.storage.size(), 0);
        assert!(!s.docks[0].is_occupied);
        assert_eq!(s.docks[0].processing_forklift(), None);
        assert!(s.invariant_violations().is_empty());
    }

    #[test]
    fn unloaded_pallets_reach_the_racks() {
        let cfg = WarehouseConfig { unloading_truck_interval_ticks: 60, ..quiet_config() };
        let mut sim = SimBuilder::new(cfg).build().unwrap();
        sim.run_ticks(115, &mut NoopObserver).unwrap();

        let s = &sim.state;
        assert_eq!(s.stats.pallets_received, 20);
        assert_eq!(s.stats.unloading_trucks_departed, 1);
        assert_eq!(s.pallets.len(), 40);
        assert!(s.stats.pallets_stored >= 10);
        assert_eq!(s.pallets_in_racks(), 20 + s.stats.pallets_stored);
        assert!(s.invariant_violations().is_empty());
    }

    #[test]
    fn live_orders_cap_generation() {
        let cfg = WarehouseConfig { orders_list_max_length: 2, ..quiet_config() };
        let mut sim = SimBuilder::new(cfg).build().unwrap();
        create_order(&mut sim.state, &[2, 1], false, Tick::ZERO);
        assert_eq!(sim.on_assembly_tick(Tick::ZERO), 1);
        assert_eq!(sim.state.orders.queue_len(), 0);
        assert_eq!(sim.state.orders.in_flight(), 1);

        assert!(sim.on_order_timer(Tick(1)).is_some());
        assert!(sim.on_order_timer(Tick(2)).is_none(), "the admitted order still counts");
        assert_eq!(sim.state.orders.len(), 2);
        assert_eq!(sim.state.orders.queue_len(), 1);
    }

    #[test]
    fn full_racks_turn_unloading_trucks_away() {
        let cfg = WarehouseConfig {
            initial_fill_level:             1.0,
            unloading_truck_interval_ticks: 10,
            ..quiet_config()
        };
        let mut sim = SimBuilder::new(cfg).build().unwrap();
        sim.run_ticks(50, &mut NoopObserver).unwrap();
        assert!(sim.state.trucks.is_empty());
        assert!(sim.state.wait_for_dock_storage.is_empty());
        assert_eq!(sim.state.stats.pallets_received, 0);
    }

    #[test]
    fn restock_cargo_never_exceeds_rack_room() {
        // 15 of 20 cells filled per type: room for 10 inbound pallets.
        let cfg = WarehouseConfig {
            initial_fill_level:             0.75,
            unloading_truck_interval_ticks: 10,
            ..quiet_config()
        };
        let mut sim = SimBuilder::new(cfg).build().unwrap();
        sim.run_ticks(150, &mut NoopObserver).unwrap();

        let s = &sim.state;
        assert_eq!(s.stats.pallets_received, 10);
        assert_eq!(s.stats.unloading_trucks_departed, 1);
        assert_eq!(s.pallets_in_racks(), 40);
        assert!(s.trucks.is_empty());
        assert!(s.wait_for_rack.is_empty());
        assert!(s.invariant_violations().is_empty());
    }

    #[test]
    fn default_layout_keeps_admitting_orders_for_days() {
        const DAY: u64 = 24 * 60;
        for seed in 1..=5 {
            let cfg = WarehouseConfig { seed, total_ticks: 10 * DAY, ..Default::default() };
            let mut sim = SimBuilder::new(cfg).build().unwrap();
            let mut admitted = 0;
            for day in 0..10 {
                for _ in 0..24 {
                    sim.run_ticks(60, &mut NoopObserver).unwrap();
                    let backlog = sim.state.wait_for_dock_storage.len();
                    assert!(backlog <= 12, "seed {seed} day {day}: {backlog} trucks wait for dock storage");
                }
                let so_far = sim.state.stats.orders_admitted;
                assert!(so_far > admitted, "seed {seed}: no order admitted on day {day}");
                admitted = so_far;
            }
            assert!(sim.state.invariant_violations().is_empty());
        }
    }

    #[test]
    fn default_run_keeps_invariants_every_tick() {
        let cfg = WarehouseConfig::default();
        let ticks = cfg.total_ticks;
        let mut sim = SimBuilder::new(cfg).build().unwrap();
        for _ in 0..ticks {
            sim.run_ticks(1, &mut NoopObserver).unwrap();
            let violations = sim.state.invariant_violations();
            assert!(violations.is_empty(), "{}: {violations:?}", sim.clock.current_tick);
            for dock in &sim.state.docks {
                assert!(dock.handler.committed() <= dock.handler.storage.capacity());
            }
        }
        let stats = &sim.state.stats;
        assert!(stats.orders_created > 0);
        assert!(stats.orders_shipped > 0);
        assert!(stats.pallets_received > 0);
    }

    #[test]
    fn same_seed_same_run() {
        let cfg = WarehouseConfig { total_ticks: 300, ..Default::default() };
        let mut a = SimBuilder::new(cfg.clone()).build().unwrap();
        let mut b = SimBuilder::new(cfg).build().unwrap();
        a.run(&mut NoopObserver).unwrap();
        b.run(&mut NoopObserver).unwrap();
        assert_eq!(a.state.stats, b.state.stats);
    }
}
