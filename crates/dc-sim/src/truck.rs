//! Trucks and the truck table.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;

use dc_core::{DockId, OrderId, PalletId, Tick, TruckId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TruckKind {
    /// Carries assembled orders away.
    Loading,
    /// Brings restock pallets in.
    Unloading,
}

/// A truck from arrival to departure.
#[derive(Clone, Debug)]
pub struct Truck {
    pub id:       TruckId,
    pub kind:     TruckKind,
    pub capacity: u32,
    pub dock:     Option<DockId>,
    /// Orders assigned for loading, in assignment order.
    pub orders:   Vec<OrderId>,
    /// Loading: pallets on the dock waiting to go on board.
    /// Unloading: pallets still on board.
    pub pending:  VecDeque<PalletId>,
    /// Pallets moved between the truck and the dock so far.
    pub processed_pallets: u32,
    pub at_dock:  bool,
    pub arrived:  Tick,
    orders_capacity: u32,
}

impl Truck {
    pub fn new(id: TruckId, kind: TruckKind, capacity: u32, arrived: Tick) -> Self {
        Self {
            id,
            kind,
            capacity,
            dock: None,
            orders: Vec::new(),
            pending: VecDeque::new(),
            processed_pallets: 0,
            at_dock: false,
            arrived,
            orders_capacity: 0,
        }
    }

    /// Assign an order of `size` pallets to this truck.
    pub fn assign_order(&mut self, order: OrderId, size: u32) {
        self.orders.push(order);
        self.orders_capacity += size;
    }

    /// Sum of the sizes of the assigned orders.
    #[inline]
    pub fn orders_capacity(&self) -> u32 {
        self.orders_capacity
    }

    /// Capacity not yet promised to an order.
    #[inline]
    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.orders_capacity)
    }

    /// Count one pallet put on board.  Returns `true` exactly when every
    /// ordered pallet is loaded.
    pub fn load_pallet(&mut self) -> bool {
        self.processed_pallets += 1;
        self.processed_pallets == self.orders_capacity
    }

    /// Take the next pallet off an unloading truck.
    pub fn unload_pallet(&mut self) -> Option<PalletId> {
        let pallet = self.pending.pop_front()?;
        self.processed_pallets += 1;
        Some(pallet)
    }

    /// Nothing left to move between this truck and its dock.
    pub fn is_done(&self) -> bool {
        match self.kind {
            TruckKind::Loading => {
                self.orders_capacity > 0 && self.processed_pallets >= self.orders_capacity
            }
            TruckKind::Unloading => self.pending.is_empty(),
        }
    }

    /// Pallets this truck moves in total.
    pub fn workload(&self) -> u32 {
        match self.kind {
            TruckKind::Loading => self.orders_capacity,
            TruckKind::Unloading => self.processed_pallets + self.pending.len() as u32,
        }
    }

    /// `processed / total`, e.g. `"7 / 18"`.
    pub fn progress_text(&self) -> String {
        format!("{} / {}", self.processed_pallets, self.workload())
    }
}

impl fmt::Display for Truck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.id, self.progress_text())
    }
}

/// Trucks currently on site.
#[derive(Default)]
pub struct TruckTable {
    trucks:  FxHashMap<TruckId, Truck>,
    next_id: u32,
}

impl TruckTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrive(&mut self, kind: TruckKind, capacity: u32, now: Tick) -> TruckId {
        let id = TruckId(self.next_id);
        self.next_id += 1;
        self.trucks.insert(id, Truck::new(id, kind, capacity, now));
        id
    }

    #[inline]
    pub fn get(&self, id: TruckId) -> Option<&Truck> {
        self.trucks.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: TruckId) -> Option<&mut Truck> {
        self.trucks.get_mut(&id)
    }

    pub fn depart(&mut self, id: TruckId) -> Option<Truck> {
        self.trucks.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.trucks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trucks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Truck> {
        self.trucks.values()
    }

    /// Total trucks ever arrived.
    pub fn arrived(&self) -> u32 {
        self.next_id
    }
}
