//! Fluent builder for constructing a [`Sim`].

use log::info;

use dc_core::{ForkliftLimits, Tick, WarehouseConfig};
use dc_schedule::{EventQueue, ScriptedOrder};

use crate::event::Event;
use crate::{Sim, SimError, SimResult, WarehouseState};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                   |
/// |-------------------------|-------------------------------------------|
/// | `.script(v)`            | No scripted orders                        |
/// | `.forklift_limits(l)`   | `config.forklift_limits`                  |
/// | `.empty_racks()`        | Racks filled to `config.initial_fill_level` |
///
/// Setting `order_interval_ticks`, `loading_truck_interval_ticks`, or
/// `unloading_truck_interval_ticks` to 0 disables that source.
///
/// # Example
///
/// ```rust,ignore
/// let orders = load_orders_csv(Path::new("orders.csv"), 4)?;
/// let mut sim = SimBuilder::new(config).script(orders).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: WarehouseConfig,
    script: Vec<ScriptedOrder>,
    limits: Option<ForkliftLimits>,
    stock:  bool,
}

impl SimBuilder {
    pub fn new(config: WarehouseConfig) -> Self {
        Self { config, script: Vec::new(), limits: None, stock: true }
    }

    /// Orders to inject at fixed ticks, e.g. from
    /// [`load_orders_csv`][dc_schedule::load_orders_csv].
    pub fn script(mut self, orders: Vec<ScriptedOrder>) -> Self {
        self.script = orders;
        self
    }

    /// Override the initial forklift limits.
    pub fn forklift_limits(mut self, limits: ForkliftLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Start with every rack empty.
    pub fn empty_racks(mut self) -> Self {
        self.stock = false;
        self
    }

    /// Validate inputs, lay out the warehouse, stock the racks, and arm the
    /// recurring events.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let limits = self.limits.unwrap_or(self.config.forklift_limits);
        if limits.dock_service == 0 || limits.pallet_move == 0 {
            return Err(SimError::Config(format!("forklift limits must be > 0, got {limits:?}")));
        }

        let type_count = self.config.pallet_type_count as usize;
        if let Some(bad) = self.script.iter().find(|s| s.capacities.len() != type_count) {
            return Err(SimError::TypeCountMismatch {
                expected: type_count,
                got:      bad.capacities.len(),
                what:     "scripted order",
            });
        }

        // ── Layout and initial stock ──────────────────────────────────────
        let mut state = WarehouseState::new(&self.config);
        let stocked = if self.stock {
            let WarehouseState { types, pallets, .. } = &mut state;
            types.spawn_initial_pallets(self.config.initial_fill_level, pallets)
        } else {
            0
        };

        // ── Recurring events ──────────────────────────────────────────────
        let mut events = EventQueue::new();
        events.push(Tick::ZERO, Event::GateTick);
        if self.config.order_interval_ticks > 0 {
            events.push(Tick::ZERO, Event::OrderTimer);
        }
        if self.config.loading_truck_interval_ticks > 0 {
            events.push(Tick(self.config.loading_truck_interval_ticks), Event::LoadingTruckArrives);
        }
        if self.config.unloading_truck_interval_ticks > 0 {
            events.push(Tick(self.config.unloading_truck_interval_ticks), Event::UnloadingTruckArrives);
        }
        for (i, order) in self.script.iter().enumerate() {
            events.push(order.tick, Event::ScriptedOrder(i));
        }

        info!(
            "warehouse: {} types, {} docks, {} forklifts, {stocked} pallets in stock, {} scripted orders",
            self.config.pallet_type_count,
            state.docks.len(),
            state.forklifts.len(),
            self.script.len(),
        );

        Ok(Sim::new(self.config, state, events, self.script, limits))
    }
}
