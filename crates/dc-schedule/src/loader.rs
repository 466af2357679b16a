//! CSV order-script loader.
//!
//! An order script injects hand-written orders at fixed ticks, on top of (or
//! instead of) the random order generator.  Useful for replaying a day's
//! demand or setting up a reproducible contention scenario.
//!
//! # CSV format
//!
//! One row per (order, pallet type).  All rows of one order must share the
//! same `tick`; `priority` is optional and defaults to `false`.
//!
//! ```csv
//! order,tick,type_id,count,priority
//! 0,10,0,3,false
//! 0,10,2,1,false
//! 1,25,1,4,true
//! ```
//!
//! Priority orders are inserted at the head of the order queue.  Orders are
//! returned sorted by tick, then by their `order` label.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use dc_core::Tick;

use crate::ScheduleError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OrderRecord {
    order:    u32,
    tick:     u64,
    type_id:  u16,
    count:    u32,
    #[serde(default)]
    priority: bool,
}

// ── Public types ──────────────────────────────────────────────────────────────

/// One scripted order, ready to be fed to the order matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedOrder {
    pub tick:       Tick,
    /// Pallets per type, indexed by `TypeId`.
    pub capacities: Vec<u32>,
    pub priority:   bool,
}

impl ScriptedOrder {
    pub fn size(&self) -> u32 {
        self.capacities.iter().sum()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an order script from a CSV file.
pub fn load_orders_csv(path: &Path, type_count: usize) -> Result<Vec<ScriptedOrder>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_orders_reader(file, type_count)
}

/// Like [`load_orders_csv`] but accepts any `Read` source.
pub fn load_orders_reader<R: Read>(
    reader:     R,
    type_count: usize,
) -> Result<Vec<ScriptedOrder>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_order: BTreeMap<u32, ScriptedOrder> = BTreeMap::new();

    for result in csv_reader.deserialize::<OrderRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let type_index = row.type_id as usize;
        if type_index >= type_count {
            return Err(ScheduleError::Parse(format!(
                "order {}: type_id {} out of range (have {type_count} types)",
                row.order, row.type_id
            )));
        }

        let entry = by_order.entry(row.order).or_insert_with(|| ScriptedOrder {
            tick:       Tick(row.tick),
            capacities: vec![0; type_count],
            priority:   row.priority,
        });
        if entry.tick != Tick(row.tick) {
            return Err(ScheduleError::Parse(format!(
                "order {}: rows disagree on tick ({} vs {})",
                row.order, entry.tick.0, row.tick
            )));
        }
        entry.capacities[type_index] += row.count;
        entry.priority |= row.priority;
    }

    let mut orders: Vec<ScriptedOrder> = by_order
        .into_values()
        .filter(|o| o.size() > 0)
        .collect();
    // Stable: equal ticks keep label order.
    orders.sort_by_key(|o| o.tick);
    Ok(orders)
}
