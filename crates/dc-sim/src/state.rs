//! `WarehouseState` — every mutable part of the building in one place.

use dc_core::{DcError, DcResult, DockId, HandlerId, PalletId, TruckId, WarehouseConfig};
use dc_resource::{Dock, DockKind, ForkliftFleet, ForkliftOwner, ResourceHandler};
use dc_schedule::WaitQueue;
use dc_storage::{PalletLocation, PalletStore, TypeRegistry};

use crate::gates::MovementLane;
use crate::order::OrderState;
use crate::transport::TransportQueue;
use crate::truck::TruckTable;
use crate::OrderBook;

/// Running totals for reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Throughput {
    pub orders_created:   u32,
    pub orders_admitted:  u32,
    pub orders_shipped:   u32,
    pub pallets_shipped:  u32,
    pub pallets_received: u32,
    pub pallets_stored:   u32,
    pub loading_trucks_departed:   u32,
    pub unloading_trucks_departed: u32,
}

/// The whole warehouse.
///
/// Every matcher, coordinator, and gate operation takes this by reference;
/// nothing is kept in globals.  Docks share one index space: load docks
/// first, then unload docks.
pub struct WarehouseState {
    pub types:     TypeRegistry,
    pub pallets:   PalletStore,
    pub orders:    OrderBook,
    pub docks:     Vec<Dock>,
    pub standby:   ResourceHandler,
    pub forklifts: ForkliftFleet,
    pub trucks:    TruckTable,
    /// Tasks waiting for a forklift, oldest first.
    pub transport: TransportQueue,

    /// Loading trucks on site without a dock.
    pub waiting_trucks:        WaitQueue<TruckId>,
    /// Unloading trucks waiting for their dock to have room for the cargo.
    pub wait_for_dock_storage: WaitQueue<TruckId>,
    /// Unloaded pallets waiting for a free rack cell of their type.
    pub wait_for_rack:         WaitQueue<PalletId>,
    pub load_lane:   MovementLane,
    pub unload_lane: MovementLane,

    pub stats: Throughput,
}

impl WarehouseState {
    /// Build an empty warehouse laid out per `config`.  Racks start empty.
    pub fn new(config: &WarehouseConfig) -> Self {
        let load = config.load_docks;
        let docks = (0..load + config.unload_docks)
            .map(|i| {
                let kind = if i < load { DockKind::Load } else { DockKind::Unload };
                Dock::new(DockId(i), kind, config.dock_capacity)
            })
            .collect();

        Self {
            types: TypeRegistry::with_racks(
                config.pallet_type_count,
                config.rack_count,
                config.rack_capacity,
            ),
            pallets:   PalletStore::new(),
            orders:    OrderBook::new(),
            docks,
            standby:   ResourceHandler::new(HandlerId::Standby, config.standby_capacity),
            forklifts: ForkliftFleet::new(config.forklift_count),
            trucks:    TruckTable::new(),
            transport: TransportQueue::new(),
            waiting_trucks:        WaitQueue::new(),
            wait_for_dock_storage: WaitQueue::new(),
            wait_for_rack:         WaitQueue::new(),
            load_lane:   MovementLane::new(),
            unload_lane: MovementLane::new(),
            stats: Throughput::default(),
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn dock(&self, id: DockId) -> DcResult<&Dock> {
        self.docks.get(id.index()).ok_or(DcError::DockNotFound(id))
    }

    pub fn dock_mut(&mut self, id: DockId) -> DcResult<&mut Dock> {
        self.docks.get_mut(id.index()).ok_or(DcError::DockNotFound(id))
    }

    pub fn load_docks(&self) -> impl Iterator<Item = &Dock> {
        self.docks.iter().filter(|d| d.kind == DockKind::Load)
    }

    pub fn unload_docks(&self) -> impl Iterator<Item = &Dock> {
        self.docks.iter().filter(|d| d.kind == DockKind::Unload)
    }

    pub fn handler(&self, id: HandlerId) -> Option<&ResourceHandler> {
        match id {
            HandlerId::Dock(d) => self.docks.get(d.index()).map(|dock| &dock.handler),
            HandlerId::Standby => Some(&self.standby),
        }
    }

    pub fn handler_mut(&mut self, id: HandlerId) -> Option<&mut ResourceHandler> {
        handler_in(&mut self.docks, &mut self.standby, id)
    }

    /// The truck currently parked at `dock`.
    pub fn truck_at(&self, dock: DockId) -> Option<TruckId> {
        self.trucks
            .iter()
            .find(|t| t.at_dock && t.dock == Some(dock))
            .map(|t| t.id)
    }

    /// Pallets currently stored in racks, all types.
    pub fn pallets_in_racks(&self) -> u32 {
        self.types.iter().map(|t| t.storage.size()).sum()
    }

    /// Rack cells per type not yet spoken for, in `TypeId` order.
    ///
    /// Free cells minus cells promised by the rack gate, minus pallets
    /// already inbound: still on an unloading truck or waiting on an unload
    /// dock for the gate.  Restocking never exceeds this, so every inbound
    /// pallet is guaranteed a cell.
    pub fn restock_headroom(&self) -> Vec<u32> {
        let mut room: Vec<u32> =
            self.types.iter().map(|t| t.n_free_cells().saturating_sub(t.reserved_cells)).collect();
        let on_trucks = self
            .pallets
            .iter()
            .filter(|p| matches!(p.location, PalletLocation::Truck(_)))
            .map(|p| p.type_id);
        let at_gate = self.wait_for_rack.iter().filter_map(|id| self.pallets.get(id)).map(|p| p.type_id);
        for ty in on_trucks.chain(at_gate) {
            if let Some(r) = room.get_mut(ty.index()) {
                *r = r.saturating_sub(1);
            }
        }
        room
    }

    // ── Consistency ───────────────────────────────────────────────────────

    /// Describe every broken structural invariant.  Empty when consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut out = Vec::new();

        for h in self.docks.iter().map(|d| &d.handler).chain(std::iter::once(&self.standby)) {
            if h.committed() > h.storage.capacity() {
                out.push(format!(
                    "{}: {} stored + {} reserved exceeds capacity {}",
                    h.id,
                    h.storage.size(),
                    h.reserved_count(),
                    h.storage.capacity()
                ));
            }
        }

        for dock in &self.docks {
            if let Some(unit) = dock.processing_forklift() {
                let owner = self.forklifts.get(unit).map(|f| f.owner());
                if owner != Some(ForkliftOwner::Dock(dock.id)) {
                    out.push(format!("{}: assigned {unit} is owned by {owner:?}", dock.id));
                }
            }
        }

        let mut seized_by: Vec<Option<PalletId>> = vec![None; self.forklifts.len()];
        for pallet in self.pallets.iter() {
            let Some(unit) = pallet.seized_forklift else { continue };
            match seized_by.get_mut(unit.index()) {
                Some(slot) => {
                    if let Some(other) = slot.replace(pallet.id) {
                        out.push(format!("{unit} seized by both {other} and {}", pallet.id));
                    }
                }
                None => out.push(format!("{}: unknown forklift {unit}", pallet.id)),
            }
            let owner = self.forklifts.get(unit).map(|f| f.owner());
            if owner != Some(ForkliftOwner::Pallet(pallet.id)) {
                out.push(format!("{}: seized {unit} is owned by {owner:?}", pallet.id));
            }
        }

        for unit in self.forklifts.iter() {
            match unit.owner() {
                ForkliftOwner::Unassigned => {}
                ForkliftOwner::Dock(d) => {
                    let assigned = self.docks.get(d.index()).and_then(Dock::processing_forklift);
                    if assigned != Some(unit.id) {
                        out.push(format!("{} claims {d} but the dock has {assigned:?}", unit.id));
                    }
                }
                ForkliftOwner::Pallet(p) => {
                    let seized = self.pallets.get(p).and_then(|p| p.seized_forklift);
                    if seized != Some(unit.id) {
                        out.push(format!("{} claims {p} but the pallet has {seized:?}", unit.id));
                    }
                }
            }
        }

        for t in self.types.iter() {
            let queued: u32 = self
                .orders
                .iter()
                .filter(|o| o.state == OrderState::WaitAtQueue)
                .map(|o| o.capacities.get(t.id.index()).copied().unwrap_or(0))
                .sum();
            if queued != t.claimed {
                out.push(format!("{}: claimed {} but queued orders want {queued}", t.id, t.claimed));
            }
        }

        out
    }
}

/// Resolve a handler from disjoint borrows of the docks and the standby area.
pub(crate) fn handler_in<'a>(
    docks:   &'a mut [Dock],
    standby: &'a mut ResourceHandler,
    id:      HandlerId,
) -> Option<&'a mut ResourceHandler> {
    match id {
        HandlerId::Dock(d) => docks.get_mut(d.index()).map(|dock| &mut dock.handler),
        HandlerId::Standby => Some(standby),
    }
}
