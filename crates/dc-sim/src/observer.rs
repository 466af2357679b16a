//! Simulation observer trait for progress reporting and data collection.

use dc_core::Tick;

use crate::WarehouseState;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait SimObserver {
    /// Called at the very start of each tick, before any event is handled.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with the number of events handled.
    fn on_tick_end(&mut self, _tick: Tick, _events: usize) {}

    /// Called every `config.output_interval_ticks` ticks with read-only
    /// access to the whole warehouse.
    fn on_snapshot(&mut self, _tick: Tick, _state: &WarehouseState) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _state: &WarehouseState) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
