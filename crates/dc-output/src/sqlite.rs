//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `tick_summaries` and `dock_snapshots`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DockSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick             INTEGER PRIMARY KEY,
                 unix_time_secs   INTEGER NOT NULL,
                 events           INTEGER NOT NULL,
                 queued_orders    INTEGER NOT NULL,
                 in_flight_orders INTEGER NOT NULL,
                 orders_shipped   INTEGER NOT NULL,
                 pallets_in_racks INTEGER NOT NULL,
                 forklifts_in_use INTEGER NOT NULL,
                 trucks_on_site   INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS dock_snapshots (
                 tick             INTEGER NOT NULL,
                 dock_id          INTEGER NOT NULL,
                 kind             TEXT    NOT NULL,
                 stored           INTEGER NOT NULL,
                 reserved         INTEGER NOT NULL,
                 space_available  INTEGER NOT NULL,
                 parked_orders    INTEGER NOT NULL,
                 forklifts_in_use INTEGER NOT NULL,
                 occupied         INTEGER NOT NULL,
                 PRIMARY KEY (tick, dock_id)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_dock_snapshots(&mut self, rows: &[DockSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO dock_snapshots \
                 (tick, dock_id, kind, stored, reserved, space_available, \
                  parked_orders, forklifts_in_use, occupied) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.dock_id,
                    row.kind,
                    row.stored,
                    row.reserved,
                    row.space_available,
                    row.parked_orders,
                    row.forklifts_in_use,
                    row.occupied as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, unix_time_secs, events, queued_orders, in_flight_orders, \
              orders_shipped, pallets_in_racks, forklifts_in_use, trucks_on_site) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                row.tick,
                row.unix_time_secs,
                row.events,
                row.queued_orders,
                row.in_flight_orders,
                row.orders_shipped,
                row.pallets_in_racks,
                row.forklifts_in_use,
                row.trucks_on_site,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
