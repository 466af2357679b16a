//! Plain data row types written by output backends.

/// Warehouse-wide counters at one snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:             u64,
    pub unix_time_secs:   i64,
    /// Events handled since the previous snapshot.
    pub events:           u64,
    pub queued_orders:    u32,
    pub in_flight_orders: u32,
    pub orders_shipped:   u32,
    pub pallets_in_racks: u32,
    pub forklifts_in_use: u32,
    pub trucks_on_site:   u32,
}

/// One dock's occupancy at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockSnapshotRow {
    pub tick:             u64,
    pub dock_id:          u16,
    /// `"load"` or `"unload"`.
    pub kind:             &'static str,
    pub stored:           u32,
    pub reserved:         u32,
    pub space_available:  u32,
    pub parked_orders:    u32,
    pub forklifts_in_use: u32,
    pub occupied:         bool,
}
