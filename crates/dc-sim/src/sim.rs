//! The `Sim` struct and its event loop.

use log::{debug, info, trace, warn};

use dc_core::{
    DockId, ForkliftId, ForkliftLimits, HandlerId, OrderId, PalletId, SimClock, SimRng, Tick,
    TruckId, TypeId, WarehouseConfig,
};
use dc_resource::{ForkliftTask, continue_moving};
use dc_schedule::{EventQueue, ScriptedOrder};
use dc_storage::PalletLocation;

use crate::coordinator::{find_dock_to_load_truck, find_orders_for_loading, find_unload_dock};
use crate::event::{Event, Lane};
use crate::gates::{self, LaneDirection};
use crate::matcher::{begin_assembly, create_order, move_from_storage_to_dock, next_order_for_assembling};
use crate::order::{OrderGenerator, OrderState, OrderTemplate};
use crate::state::handler_in;
use crate::transport;
use crate::truck::TruckKind;
use crate::{SimError, SimObserver, SimResult, WarehouseState};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick drains the events due now from the [`EventQueue`], handles them
/// in push order, then runs two passes over the whole warehouse:
///
/// 1. **Assembly**: admit queued orders while a destination and stock exist,
///    and move standby orders to docks that now have room.
/// 2. **Dispatch**: offer forklifts, in id order, to every pending
///    dock-service or pallet-move request, oldest request first.
///
/// Quiet ticks (no events) skip both passes; nothing they depend on can
/// change without an event.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: WarehouseConfig,

    pub clock: SimClock,

    pub state: WarehouseState,

    /// Timed events keyed by the tick they fire at.
    pub events: EventQueue<Event>,

    pub rng: SimRng,

    pub generator: OrderGenerator,

    /// Scripted orders; `Event::ScriptedOrder(i)` indexes into this.
    pub script: Vec<ScriptedOrder>,

    limits: ForkliftLimits,
}

impl Sim {
    pub(crate) fn new(
        config:    WarehouseConfig,
        state:     WarehouseState,
        events:    EventQueue<Event>,
        script:    Vec<ScriptedOrder>,
        limits:    ForkliftLimits,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            rng: SimRng::new(config.seed),
            generator: OrderGenerator::new(
                config.min_order_size,
                config.max_order_size,
                config.pallet_type_count as usize,
            ),
            config,
            state,
            events,
            script,
            limits,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step(now, observer);
        }
        observer.on_sim_end(self.clock.current_tick, &self.state);
        info!("{}: finished, {:?}", self.clock, self.state.stats);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step(now, observer);
        }
        Ok(())
    }

    pub fn forklift_limits(&self) -> ForkliftLimits {
        self.limits
    }

    /// Change the per-handler forklift limits.  Takes effect on the next
    /// forklift request; handlers above a lowered limit drain as their
    /// forklifts finish.
    pub fn set_forklift_limits(&mut self, limits: ForkliftLimits) -> SimResult<()> {
        if limits.dock_service == 0 || limits.pallet_move == 0 {
            return Err(SimError::Config(format!("forklift limits must be > 0, got {limits:?}")));
        }
        info!("{}: forklift limits {:?} -> {:?}", self.clock, self.limits, limits);
        self.limits = limits;
        Ok(())
    }

    /// A random maximum-size template to edit and submit.
    pub fn order_template(&mut self) -> OrderTemplate {
        OrderTemplate::randomized(
            self.config.pallet_type_count as usize,
            self.config.min_order_size,
            self.config.max_order_size,
            &mut self.rng,
        )
    }

    /// Submit a hand-built order at the head of the queue.
    pub fn submit_order(&mut self, template: &OrderTemplate) -> OrderId {
        create_order(&mut self.state, template.capacities(), true, self.clock.current_tick)
    }

    // ── Inbound callbacks ─────────────────────────────────────────────────

    /// Generate one random order unless the book already holds
    /// `orders_list_max_length` live orders.  Re-arms itself.
    pub fn on_order_timer(&mut self, now: Tick) -> Option<OrderId> {
        let interval = self.config.order_interval_ticks;
        if interval > 0 {
            self.schedule(now, interval, Event::OrderTimer);
        }
        if self.state.orders.len() >= self.config.orders_list_max_length {
            trace!("{now}: order book full, no new order");
            return None;
        }
        let capacities = self.generator.draw(&mut self.rng);
        Some(create_order(&mut self.state, &capacities, false, now))
    }

    /// Admit every order that can start now, then move standby orders to
    /// docks with room.  Returns the number of orders started or moved.
    pub fn on_assembly_tick(&mut self, _now: Tick) -> usize {
        let mut started = 0;
        while let Some((order, dest)) =
            next_order_for_assembling(&self.state, self.config.max_in_flight_orders)
        {
            if !begin_assembly(&mut self.state, order, dest) {
                break;
            }
            started += 1;
        }
        started + move_from_storage_to_dock(&mut self.state)
    }

    /// Offer `unit` for `task` under the current limits.
    pub fn on_forklift_request(&mut self, task: ForkliftTask, unit: ForkliftId) -> bool {
        transport::on_forklift_request(&mut self.state, task, unit, self.limits)
    }

    /// Re-evaluate the wait gates and start whatever they release.
    /// Re-arms itself.
    pub fn on_gate_tick(&mut self, now: Tick) {
        self.schedule(now, self.config.gate_interval_ticks, Event::GateTick);

        for pallet in gates::recalculate_wait_for_rack_system(&mut self.state) {
            match self.state.pallets.get(pallet).map(|p| p.location) {
                Some(PalletLocation::Handler(source)) => {
                    self.state.transport.request(ForkliftTask::PalletMove { pallet, target: source });
                }
                other => warn!("{pallet}: released for racking from {other:?}"),
            }
        }

        for truck in gates::recalculate_wait_for_dock_storage(&mut self.state) {
            debug!("{now}: {truck} may drive to its dock");
            self.state.unload_lane.waiting.enter(truck);
        }

        self.assign_loading_trucks(now);
    }

    // ── Tick processing ───────────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);
        let handled = self.process_tick(now);
        observer.on_tick_end(now, handled);
        if now.is_multiple_of(self.config.output_interval_ticks) {
            observer.on_snapshot(now, &self.state);
        }
        self.clock.advance();
    }

    fn process_tick(&mut self, now: Tick) -> usize {
        let Some(events) = self.events.drain_tick(now) else {
            return 0;
        };
        let handled = events.len();
        for event in events {
            self.handle(event, now);
        }
        self.on_assembly_tick(now);
        self.dispatch_forklifts(now);
        handled
    }

    fn handle(&mut self, event: Event, now: Tick) {
        match event {
            Event::OrderTimer => {
                self.on_order_timer(now);
            }
            Event::ScriptedOrder(i) => {
                if let Some(s) = self.script.get(i) {
                    let capacities = s.capacities.clone();
                    create_order(&mut self.state, &capacities, s.priority, now);
                }
            }
            Event::LoadingTruckArrives => self.on_loading_truck(now),
            Event::UnloadingTruckArrives => self.on_unloading_truck(now),
            Event::GateTick => self.on_gate_tick(now),
            Event::MoveFinished { pallet, unit, target } => self.finish_move(pallet, unit, target),
            Event::DockStepFinished { dock, unit } => self.finish_dock_step(dock, unit, now),
            Event::ManeuverFinished { truck, lane, direction } => {
                self.finish_maneuver(truck, lane, direction, now);
            }
        }
    }

    /// Push `event` at least one tick into the future.
    fn schedule(&mut self, now: Tick, delay: u64, event: Event) {
        self.events.push(now + delay.max(1), event);
    }

    // ── Forklifts ─────────────────────────────────────────────────────────

    fn dispatch_forklifts(&mut self, now: Tick) {
        let units = self.state.forklifts.len();
        let mut i = 0;
        while let Some(task) = self.state.transport.get(i) {
            if !self.task_is_live(task) {
                self.state.transport.remove(i);
                continue;
            }
            let granted = (0..units)
                .map(|u| ForkliftId(u as u16))
                .find(|&unit| self.on_forklift_request(task, unit));
            match granted {
                Some(unit) => {
                    self.state.transport.remove(i);
                    self.start_task(task, unit, now);
                }
                None => i += 1,
            }
        }
    }

    fn task_is_live(&self, task: ForkliftTask) -> bool {
        match task {
            ForkliftTask::DockService(dock) => self.dock_has_work(dock),
            ForkliftTask::PalletMove { pallet, .. } => self.state.pallets.get(pallet).is_some(),
        }
    }

    fn dock_has_work(&self, dock: DockId) -> bool {
        self.state
            .truck_at(dock)
            .and_then(|t| self.state.trucks.get(t))
            .is_some_and(|t| !t.pending.is_empty())
    }

    fn start_task(&mut self, task: ForkliftTask, unit: ForkliftId, now: Tick) {
        match task {
            ForkliftTask::DockService(dock) => {
                trace!("{now}: {unit} serves {dock}");
                self.schedule(now, self.config.dock_step_ticks, Event::DockStepFinished { dock, unit });
            }
            ForkliftTask::PalletMove { pallet, target } => {
                trace!("{now}: {unit} picks up {pallet} for {target}");
                self.pick_up(pallet);
                self.schedule(
                    now,
                    self.config.move_ticks,
                    Event::MoveFinished { pallet, unit, target },
                );
            }
        }
    }

    /// Lift `pallet` from wherever it sits.
    fn pick_up(&mut self, pallet: PalletId) {
        let WarehouseState { types, pallets, orders, docks, standby, .. } = &mut self.state;
        let Some(p) = pallets.get_mut(pallet) else {
            return;
        };
        match p.location {
            PalletLocation::Rack(_) => {
                if let Some(ty) = types.get_mut(p.type_id) {
                    ty.take(p);
                }
            }
            PalletLocation::Handler(h) => {
                if let Some(handler) = handler_in(docks, standby, h) {
                    handler.dispatch(pallet);
                }
                p.location = PalletLocation::Transit;
            }
            PalletLocation::Transit | PalletLocation::Truck(_) => {}
        }
        if let Some(order) = p.order.and_then(|o| orders.get_mut(o)) {
            if order.state == OrderState::WaitAssembling {
                order.state = OrderState::Assembling;
            }
        }
    }

    fn finish_move(&mut self, pallet: PalletId, unit: ForkliftId, target: HandlerId) {
        let legit = match (self.state.pallets.get(pallet), self.state.forklifts.get(unit)) {
            (Some(p), Some(u)) => continue_moving(p, u),
            _ => false,
        };
        if !legit {
            warn!("{pallet}: move finished but {unit} no longer owns it");
            return;
        }

        let WarehouseState { pallets, forklifts, docks, standby, .. } = &mut self.state;
        if let (Some(handler), Some(forklift)) = (handler_in(docks, standby, target), forklifts.get_mut(unit)) {
            handler.release(forklift);
        }
        let reserved = match pallets.get_mut(pallet) {
            Some(p) => {
                p.seized_forklift = None;
                p.reserved
            }
            None => return,
        };

        if reserved {
            self.deliver_to_handler(pallet);
        } else {
            self.deliver_to_rack(pallet);
        }
    }

    /// An order pallet reaches its dock or the standby area.
    fn deliver_to_handler(&mut self, pallet: PalletId) {
        let WarehouseState { pallets, orders, docks, standby, .. } = &mut self.state;
        let Some(p) = pallets.get_mut(pallet) else {
            return;
        };
        let Some(dest) = p.handler else {
            warn!("{pallet}: reserved pallet has no destination");
            return;
        };
        let Some(handler) = handler_in(docks, standby, dest) else {
            return;
        };
        if !handler.receive(pallet) {
            debug_assert!(false, "{dest} had no room for reserved {pallet}");
            warn!("{dest}: no room for {pallet}");
            return;
        }
        p.location = PalletLocation::Handler(dest);

        let Some(order) = p.order.and_then(|o| orders.get_mut(o)) else {
            return;
        };
        order.arrived += 1;
        if order.arrived == order.size {
            order.state = match dest {
                HandlerId::Dock(_) => OrderState::WaitAtDock,
                HandlerId::Standby => OrderState::WaitAtStandby,
            };
            handler.orders.push(order.id);
            debug!("order #{} ({}) assembled at {dest}", order.number, order.id);
        }
    }

    /// An unloaded pallet reaches the rack cell promised to it.
    fn deliver_to_rack(&mut self, pallet: PalletId) {
        let WarehouseState { pallets, types, stats, .. } = &mut self.state;
        let Some(p) = pallets.get_mut(pallet) else {
            return;
        };
        let Some(ty) = types.get_mut(p.type_id) else {
            return;
        };
        debug_assert!(ty.reserved_cells > 0, "{} stored {pallet} without a promised cell", ty.id);
        ty.reserved_cells = ty.reserved_cells.saturating_sub(1);
        match ty.store(p) {
            Some(rack) => {
                trace!("{pallet} stored in {rack}");
                stats.pallets_stored += 1;
            }
            None => warn!("{}: no free cell for {pallet}", ty.id),
        }
    }

    // ── Docks and trucks ──────────────────────────────────────────────────

    fn finish_dock_step(&mut self, dock: DockId, unit: ForkliftId, now: Tick) {
        let Some(truck) = self.state.truck_at(dock) else {
            warn!("{dock}: step finished with no truck at the dock");
            self.release_dock_forklift(dock);
            return;
        };
        if self.state.dock(dock).ok().and_then(|d| d.processing_forklift()) != Some(unit) {
            warn!("{dock}: step finished by {unit}, which no longer serves it");
            return;
        }
        let Some(kind) = self.state.trucks.get(truck).map(|t| t.kind) else {
            return;
        };
        match kind {
            TruckKind::Loading => self.load_one(dock, truck),
            TruckKind::Unloading => self.unload_one(dock, truck),
        }

        let done = self.state.trucks.get(truck).is_none_or(|t| t.pending.is_empty());
        if !done {
            self.state.transport.request(ForkliftTask::DockService(dock));
            return;
        }
        self.release_dock_forklift(dock);
        if let Some(t) = self.state.trucks.get(truck) {
            debug!("{now}: {t} done at {dock}");
        }
        match kind {
            TruckKind::Loading => self.state.load_lane.waiting.enter(truck),
            TruckKind::Unloading => self.state.unload_lane.waiting.enter(truck),
        };
        self.start_maneuvers(now);
    }

    fn release_dock_forklift(&mut self, dock: DockId) {
        let WarehouseState { docks, forklifts, .. } = &mut self.state;
        if let Some(d) = docks.get_mut(dock.index()) {
            d.release_forklift(None, forklifts);
        }
    }

    fn load_one(&mut self, dock: DockId, truck: TruckId) {
        let WarehouseState { docks, trucks, pallets, orders, stats, .. } = &mut self.state;
        let (Some(d), Some(t)) = (docks.get_mut(dock.index()), trucks.get_mut(truck)) else {
            return;
        };
        let Some(pallet) = t.pending.pop_front() else {
            return;
        };
        d.handler.dispatch(pallet);
        t.load_pallet();
        stats.pallets_shipped += 1;

        let Some(order_id) = pallets.remove(pallet).and_then(|p| p.order) else {
            return;
        };
        let Some(order) = orders.get_mut(order_id) else {
            return;
        };
        order.loaded += 1;
        if order.loaded == order.size {
            order.state = OrderState::Loaded;
            debug!("order #{} ({order_id}) loaded on {truck}", order.number);
            orders.retire(order_id);
            stats.orders_shipped += 1;
        }
    }

    fn unload_one(&mut self, dock: DockId, truck: TruckId) {
        let WarehouseState { docks, trucks, pallets, wait_for_rack, stats, .. } = &mut self.state;
        let (Some(d), Some(t)) = (docks.get_mut(dock.index()), trucks.get_mut(truck)) else {
            return;
        };
        let Some(pallet) = t.unload_pallet() else {
            return;
        };
        if !d.handler.receive(pallet) {
            warn!("{dock}: no room for unloaded {pallet}");
        }
        if let Some(p) = pallets.get_mut(pallet) {
            p.location = PalletLocation::Handler(d.handler.id);
            p.truck = None;
        }
        wait_for_rack.enter(pallet);
        stats.pallets_received += 1;
    }

    fn finish_maneuver(&mut self, truck: TruckId, lane: Lane, direction: LaneDirection, now: Tick) {
        let WarehouseState { load_lane, unload_lane, trucks, docks, transport, stats, .. } =
            &mut self.state;
        match lane {
            Lane::Load => load_lane.finish(truck),
            Lane::Unload => unload_lane.finish(truck),
        };

        match direction {
            LaneDirection::ToDock => {
                if let Some(t) = trucks.get_mut(truck) {
                    t.at_dock = true;
                    if let Some(dock) = t.dock {
                        debug!("{now}: {truck} at {dock}");
                        transport.request(ForkliftTask::DockService(dock));
                    }
                }
            }
            LaneDirection::FromDock => {
                if let Some(t) = trucks.depart(truck) {
                    if let Some(d) = t.dock.and_then(|d| docks.get_mut(d.index())) {
                        d.is_occupied = false;
                    }
                    match t.kind {
                        TruckKind::Loading => stats.loading_trucks_departed += 1,
                        TruckKind::Unloading => stats.unloading_trucks_departed += 1,
                    }
                    info!("{now}: {t} departs after {} ticks ({} orders)", now.since(t.arrived), t.orders.len());
                }
            }
        }
        self.start_maneuvers(now);
    }

    /// Start the next manoeuvre on each idle lane.
    fn start_maneuvers(&mut self, now: Tick) {
        let delay = self.config.maneuver_ticks;
        if let Some((truck, direction)) = gates::check_load_any_moving(&mut self.state) {
            self.schedule(now, delay, Event::ManeuverFinished { truck, lane: Lane::Load, direction });
        }
        if let Some((truck, direction)) = gates::check_unload_any_moving(&mut self.state) {
            self.schedule(now, delay, Event::ManeuverFinished { truck, lane: Lane::Unload, direction });
        }
    }

    fn on_loading_truck(&mut self, now: Tick) {
        let interval = self.config.loading_truck_interval_ticks;
        if interval > 0 {
            self.schedule(now, interval, Event::LoadingTruckArrives);
        }
        let id = self.state.trucks.arrive(TruckKind::Loading, self.config.truck_capacity, now);
        self.state.waiting_trucks.enter(id);
        debug!("{now}: loading {id} arrives");
        self.assign_loading_trucks(now);
    }

    /// Send waiting loading trucks to docks worth loading from.
    fn assign_loading_trucks(&mut self, now: Tick) {
        let waiting: Vec<TruckId> = self.state.waiting_trucks.iter().collect();
        for id in waiting {
            let Some(dock) = self
                .state
                .trucks
                .get(id)
                .and_then(|t| find_dock_to_load_truck(&self.state, t))
            else {
                continue;
            };
            self.state.waiting_trucks.free(id);
            if let Ok(d) = self.state.dock_mut(dock) {
                d.is_occupied = true;
            }
            if let Some(t) = self.state.trucks.get_mut(id) {
                t.dock = Some(dock);
            }
            find_orders_for_loading(&mut self.state, dock, id);
            self.state.load_lane.waiting.enter(id);
        }
        self.start_maneuvers(now);
    }

    fn on_unloading_truck(&mut self, now: Tick) {
        let interval = self.config.unloading_truck_interval_ticks;
        if interval > 0 {
            self.schedule(now, interval, Event::UnloadingTruckArrives);
        }
        // Cargo never exceeds what the racks can still take.
        let mut headroom = self.state.restock_headroom();
        let mut types = Vec::with_capacity(self.config.truck_capacity as usize);
        for _ in 0..self.config.truck_capacity {
            let weights = self.state.types.restock_weights(&headroom);
            let Some(ty) = self.rng.choose_weighted(&weights) else {
                break;
            };
            headroom[ty] -= 1;
            types.push(TypeId(ty as u16));
        }
        if types.is_empty() {
            debug!("{now}: racks full, unloading truck turned away");
            return;
        }

        let id = self.state.trucks.arrive(TruckKind::Unloading, self.config.truck_capacity, now);
        let mut cargo = Vec::with_capacity(types.len());
        for ty in types {
            let pallet = self.state.pallets.spawn(ty, PalletLocation::Truck(id));
            if let Some(p) = self.state.pallets.get_mut(pallet) {
                p.truck = Some(id);
            }
            cargo.push(pallet);
        }

        let dock = find_unload_dock(&self.state);
        if let Some(t) = self.state.trucks.get_mut(id) {
            t.pending.extend(cargo);
            t.dock = dock;
        }
        self.state.wait_for_dock_storage.enter(id);
        debug!("{now}: unloading {id} arrives for {dock:?}");
    }
}
