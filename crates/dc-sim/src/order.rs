//! Orders, the order book, and the order sources.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use dc_core::{HandlerId, OrderId, PalletId, SimRng, Tick, TruckId};

/// Order numbers cycle through `[0, ORDER_NUMBER_WRAP)`.
pub const ORDER_NUMBER_WRAP: u16 = 9_999;

/// Lifecycle of an order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrderState {
    /// In the order queue, not yet admitted.
    WaitAtQueue,
    /// Admitted; pallets reserved, no pallet picked up yet.
    WaitAssembling,
    /// Pallets are being carried to the destination handler.
    Assembling,
    /// All pallets on a load dock's floor.
    WaitAtDock,
    /// All pallets parked on the standby area.
    WaitAtStandby,
    /// Assigned to a truck, being loaded.
    Loading,
    /// On a truck.  The order is retired right after entering this state.
    Loaded,
}

/// A demand for a multiset of pallets.
#[derive(Clone, Debug)]
pub struct Order {
    pub id:         OrderId,
    /// Display number; cycles and may repeat over a long run.
    pub number:     u16,
    pub size:       u32,
    /// Pallets per type, indexed by `TypeId`.  Sums to `size`.
    pub capacities: Vec<u32>,
    pub pallets:    Vec<PalletId>,
    pub state:      OrderState,
    pub handler:    Option<HandlerId>,
    pub truck:      Option<TruckId>,
    /// Pallets already received at `handler` during the current leg.
    pub arrived:    u32,
    /// Pallets already put on the truck.
    pub loaded:     u32,
    pub created:    Tick,
}

// ── OrderBook ─────────────────────────────────────────────────────────────────

/// Every live order plus the arrival-ordered queue of orders not yet
/// admitted.
pub struct OrderBook {
    orders:      FxHashMap<OrderId, Order>,
    queue:       VecDeque<OrderId>,
    next_id:     OrderId,
    next_number: u16,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self {
            orders:      FxHashMap::default(),
            queue:       VecDeque::new(),
            next_id:     OrderId(0),
            next_number: 0,
        }
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an order and enqueue it at the head or the tail.
    pub fn create(&mut self, capacities: &[u32], add_to_head: bool, now: Tick) -> OrderId {
        if self.next_number >= ORDER_NUMBER_WRAP {
            self.next_number = 0;
        }
        let number = self.next_number;
        self.next_number += 1;

        let id = self.next_id;
        self.next_id = id.next();

        let order = Order {
            id,
            number,
            size:       capacities.iter().sum(),
            capacities: capacities.to_vec(),
            pallets:    Vec::new(),
            state:      OrderState::WaitAtQueue,
            handler:    None,
            truck:      None,
            arrived:    0,
            loaded:     0,
            created:    now,
        };
        self.orders.insert(id, order);
        if add_to_head {
            self.queue.push_front(id);
        } else {
            self.queue.push_back(id);
        }
        id
    }

    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(&id)
    }

    /// Queued orders in arrival order (head first).
    pub fn queue(&self) -> impl Iterator<Item = &Order> {
        self.queue.iter().filter_map(|id| self.orders.get(id))
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Take an order out of the queue once it is admitted.
    pub fn dequeue(&mut self, id: OrderId) -> bool {
        match self.queue.iter().position(|&o| o == id) {
            Some(i) => {
                self.queue.remove(i);
                true
            }
            None => false,
        }
    }

    /// Drop a loaded order.
    pub fn retire(&mut self, id: OrderId) -> Option<Order> {
        self.dequeue(id);
        self.orders.remove(&id)
    }

    pub fn count_in(&self, state: OrderState) -> usize {
        self.orders.values().filter(|o| o.state == state).count()
    }

    /// Orders admitted but not yet fully at their destination.
    pub fn in_flight(&self) -> usize {
        self.count_in(OrderState::WaitAssembling) + self.count_in(OrderState::Assembling)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Total orders ever created.
    pub fn created(&self) -> u32 {
        self.next_id.0
    }
}

// ── Order sources ─────────────────────────────────────────────────────────────

/// Random order source: a total size in `[min, max]` split across types.
#[derive(Clone, Debug)]
pub struct OrderGenerator {
    pub min_size:   u32,
    pub max_size:   u32,
    pub type_count: usize,
}

impl OrderGenerator {
    pub fn new(min_size: u32, max_size: u32, type_count: usize) -> Self {
        Self { min_size, max_size, type_count }
    }

    /// Draw a per-type capacity vector.
    ///
    /// The total is split by repeatedly giving a random slice of what is
    /// left to a random type, so orders are usually dominated by a few types.
    pub fn draw(&self, rng: &mut SimRng) -> Vec<u32> {
        let mut capacities = vec![0; self.type_count];
        if self.type_count == 0 {
            return capacities;
        }
        let mut remaining = rng.uniform_discr(self.min_size, self.max_size);
        split_into(&mut capacities, &mut remaining, rng);
        capacities
    }
}

fn split_into(capacities: &mut [u32], remaining: &mut u32, rng: &mut SimRng) {
    let last = capacities.len() as u32 - 1;
    while *remaining > 0 {
        let i = rng.uniform_discr(0, last) as usize;
        let c = rng.uniform_discr(0, *remaining);
        capacities[i] += c;
        *remaining -= c;
    }
}

/// A hand-built order, edited one pallet at a time within the configured
/// size bounds and submitted at the head of the queue.
#[derive(Clone, Debug)]
pub struct OrderTemplate {
    capacities: Vec<u32>,
    min_size:   u32,
    max_size:   u32,
}

impl OrderTemplate {
    pub fn new(type_count: usize, min_size: u32, max_size: u32) -> Self {
        Self { capacities: vec![0; type_count], min_size, max_size }
    }

    /// Start from a random split of a maximum-size order.
    pub fn randomized(type_count: usize, min_size: u32, max_size: u32, rng: &mut SimRng) -> Self {
        let mut template = Self::new(type_count, min_size, max_size);
        if type_count > 0 {
            let mut remaining = max_size;
            split_into(&mut template.capacities, &mut remaining, rng);
        }
        template
    }

    /// Add one pallet of type `index` unless the order is already at maximum.
    pub fn increase(&mut self, index: usize) -> bool {
        if self.sum() >= self.max_size || index >= self.capacities.len() {
            return false;
        }
        self.capacities[index] += 1;
        true
    }

    /// Remove one pallet of type `index` unless the order is at minimum.
    pub fn decrease(&mut self, index: usize) -> bool {
        if self.sum() <= self.min_size || self.capacities.get(index).is_none_or(|&c| c == 0) {
            return false;
        }
        self.capacities[index] -= 1;
        true
    }

    pub fn sum(&self) -> u32 {
        self.capacities.iter().sum()
    }

    pub fn capacities(&self) -> &[u32] {
        &self.capacities
    }
}
