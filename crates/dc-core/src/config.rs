//! Warehouse configuration.
//!
//! `WarehouseConfig` carries the building layout (racks, docks, forklifts),
//! the order and truck policies, and the run parameters.  The application
//! crate typically starts from [`WarehouseConfig::default`] and overrides a
//! few fields, or deserializes a JSON file with the `serde` feature enabled.

use crate::{DcError, DcResult, SimClock, Tick};

/// Per-handler forklift concurrency limits.
///
/// These are policy knobs that may change while the simulation runs, so the
/// resource handlers never store them; every seize decision receives the
/// current value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForkliftLimits {
    /// Forklifts a dock may hold while serving a truck plus incoming moves.
    pub dock_service: u32,
    /// Forklifts that may concurrently move pallets toward one handler.
    pub pallet_move: u32,
}

impl Default for ForkliftLimits {
    fn default() -> Self {
        Self { dock_service: 2, pallet_move: 2 }
    }
}

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WarehouseConfig {
    // ── Run ───────────────────────────────────────────────────────────────
    /// Unix timestamp for tick 0.
    pub start_unix_secs: i64,
    /// Seconds per tick.  Default: 60.
    pub tick_duration_secs: u32,
    /// Total ticks to simulate.
    pub total_ticks: u64,
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
    /// Snapshot every N ticks.
    pub output_interval_ticks: u64,

    // ── Rack system ───────────────────────────────────────────────────────
    pub pallet_type_count: u16,
    /// Racks are dealt to types round-robin, so this should be a multiple
    /// of `pallet_type_count`.
    pub rack_count: u16,
    pub rack_capacity: u32,
    /// Fraction of each type's capacity filled at tick 0.
    pub initial_fill_level: f64,

    // ── Docks & forklifts ─────────────────────────────────────────────────
    pub load_docks: u16,
    pub unload_docks: u16,
    pub dock_capacity: u32,
    pub standby_capacity: u32,
    pub forklift_count: u16,
    pub forklift_limits: ForkliftLimits,

    // ── Orders ────────────────────────────────────────────────────────────
    pub min_order_size: u32,
    pub max_order_size: u32,
    /// No new order is generated while this many orders are live: queued,
    /// assembling, or parked awaiting a truck.
    pub orders_list_max_length: usize,
    /// Admission ceiling for orders waiting-to-assemble or assembling.
    pub max_in_flight_orders: usize,
    /// Random order cadence; 0 disables the generator.
    pub order_interval_ticks: u64,

    // ── Trucks ────────────────────────────────────────────────────────────
    pub truck_capacity: u32,
    /// Arrival cadence; 0 disables loading trucks.
    pub loading_truck_interval_ticks: u64,
    /// Arrival cadence; 0 disables unloading trucks.
    pub unloading_truck_interval_ticks: u64,

    // ── Durations ─────────────────────────────────────────────────────────
    /// Forklift trip between a rack and a handler.
    pub move_ticks: u64,
    /// Dock forklift moving one pallet between dock and truck.
    pub dock_step_ticks: u64,
    /// Truck driving onto or off a dock.
    pub maneuver_ticks: u64,
    /// Cadence of the wait-gate re-evaluation.
    pub gate_interval_ticks: u64,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:                1_700_000_000,
            tick_duration_secs:             60,
            total_ticks:                    24 * 60,
            seed:                           42,
            output_interval_ticks:          60,

            pallet_type_count:              4,
            rack_count:                     8,
            rack_capacity:                  40,
            initial_fill_level:             0.6,

            load_docks:                     3,
            unload_docks:                   2,
            dock_capacity:                  20,
            standby_capacity:               40,
            forklift_count:                 6,
            forklift_limits:                ForkliftLimits::default(),

            min_order_size:                 4,
            max_order_size:                 12,
            orders_list_max_length:         30,
            max_in_flight_orders:           60,
            order_interval_ticks:           15,

            truck_capacity:                 20,
            loading_truck_interval_ticks:   45,
            unloading_truck_interval_ticks: 40,

            move_ticks:                     3,
            dock_step_ticks:                1,
            maneuver_ticks:                 2,
            gate_interval_ticks:            5,
        }
    }
}

impl WarehouseConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }

    /// Reject configurations the simulation cannot run.
    pub fn validate(&self) -> DcResult<()> {
        if self.tick_duration_secs == 0 {
            return Err(DcError::Config("tick_duration_secs must be > 0".into()));
        }
        if self.pallet_type_count == 0 {
            return Err(DcError::Config("pallet_type_count must be > 0".into()));
        }
        if self.rack_count < self.pallet_type_count {
            return Err(DcError::Config(format!(
                "rack_count {} leaves some of the {} pallet types without storage",
                self.rack_count, self.pallet_type_count
            )));
        }
        if self.load_docks == 0 || self.unload_docks == 0 {
            return Err(DcError::Config("need at least one load and one unload dock".into()));
        }
        if self.forklift_count == 0 {
            return Err(DcError::Config("forklift_count must be > 0".into()));
        }
        if self.min_order_size == 0 {
            return Err(DcError::Config("min_order_size must be > 0".into()));
        }
        if self.min_order_size > self.max_order_size {
            return Err(DcError::Config(format!(
                "min_order_size {} exceeds max_order_size {}",
                self.min_order_size, self.max_order_size
            )));
        }
        if self.max_order_size > self.truck_capacity {
            return Err(DcError::Config(format!(
                "max_order_size {} can never fit a truck of capacity {}",
                self.max_order_size, self.truck_capacity
            )));
        }
        if self.truck_capacity > self.dock_capacity {
            return Err(DcError::Config(format!(
                "truck_capacity {} exceeds dock_capacity {}; unloading trucks would wait forever",
                self.truck_capacity, self.dock_capacity
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_fill_level) {
            return Err(DcError::Config("initial_fill_level must be within [0, 1]".into()));
        }
        if self.gate_interval_ticks == 0 {
            return Err(DcError::Config("gate_interval_ticks must be > 0".into()));
        }
        Ok(())
    }
}
