//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use dc_core::{SimClock, Tick, WarehouseConfig};
use dc_resource::DockKind;
use dc_sim::{SimObserver, WarehouseState};

use crate::row::{DockSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes tick summaries and dock snapshots to any
/// [`OutputWriter`] backend.
///
/// Writer errors are stored internally because `SimObserver` methods have no
/// return value.  After `sim.run()` returns, check with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:         W,
    clock:          SimClock,
    /// Events handled since the last snapshot.
    pending_events: u64,
    last_error:     Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &WarehouseConfig) -> Self {
        Self {
            writer,
            clock:          config.make_clock(),
            pending_events: 0,
            last_error:     None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

fn summary_row(tick: Tick, unix_time_secs: i64, events: u64, state: &WarehouseState) -> TickSummaryRow {
    TickSummaryRow {
        tick: tick.0,
        unix_time_secs,
        events,
        queued_orders:    state.orders.queue_len() as u32,
        in_flight_orders: state.orders.in_flight() as u32,
        orders_shipped:   state.stats.orders_shipped,
        pallets_in_racks: state.pallets_in_racks(),
        forklifts_in_use: state.forklifts.in_use_count() as u32,
        trucks_on_site:   state.trucks.len() as u32,
    }
}

fn dock_rows(tick: Tick, state: &WarehouseState) -> Vec<DockSnapshotRow> {
    state
        .docks
        .iter()
        .map(|dock| DockSnapshotRow {
            tick:             tick.0,
            dock_id:          dock.id.0,
            kind:             match dock.kind {
                DockKind::Load => "load",
                DockKind::Unload => "unload",
            },
            stored:           dock.handler.storage.size(),
            reserved:         dock.handler.reserved_count(),
            space_available:  dock.space_available(),
            parked_orders:    dock.handler.orders.len() as u32,
            forklifts_in_use: dock.handler.used_forklift_count() as u32,
            occupied:         dock.is_occupied,
        })
        .collect()
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, events: usize) {
        self.pending_events += events as u64;
    }

    fn on_snapshot(&mut self, tick: Tick, state: &WarehouseState) {
        let row = summary_row(tick, self.clock.unix_secs_at(tick), self.pending_events, state);
        self.pending_events = 0;
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);

        let rows = dock_rows(tick, state);
        if !rows.is_empty() {
            let result = self.writer.write_dock_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _state: &WarehouseState) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
