//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `tick_summaries.csv`
//! - `dock_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DockSnapshotRow, OutputResult, TickSummaryRow};

pub const TICK_SUMMARY_HEADER: [&str; 9] = [
    "tick",
    "unix_time_secs",
    "events",
    "queued_orders",
    "in_flight_orders",
    "orders_shipped",
    "pallets_in_racks",
    "forklifts_in_use",
    "trucks_on_site",
];

pub const DOCK_SNAPSHOT_HEADER: [&str; 9] = [
    "tick",
    "dock_id",
    "kind",
    "stored",
    "reserved",
    "space_available",
    "parked_orders",
    "forklifts_in_use",
    "occupied",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    docks:     Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TICK_SUMMARY_HEADER)?;

        let mut docks = Writer::from_path(dir.join("dock_snapshots.csv"))?;
        docks.write_record(DOCK_SNAPSHOT_HEADER)?;

        Ok(Self { summaries, docks, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_dock_snapshots(&mut self, rows: &[DockSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.docks.write_record(&[
                row.tick.to_string(),
                row.dock_id.to_string(),
                row.kind.to_string(),
                row.stored.to_string(),
                row.reserved.to_string(),
                row.space_available.to_string(),
                row.parked_orders.to_string(),
                row.forklifts_in_use.to_string(),
                (row.occupied as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.events.to_string(),
            row.queued_orders.to_string(),
            row.in_flight_orders.to_string(),
            row.orders_shipped.to_string(),
            row.pallets_in_racks.to_string(),
            row.forklifts_in_use.to_string(),
            row.trucks_on_site.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.docks.flush()?;
        Ok(())
    }
}
