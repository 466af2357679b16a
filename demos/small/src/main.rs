//! small — one simulated day of a mid-sized distribution center.
//!
//! ```text
//! small [CONFIG.json] [ORDERS.csv]
//! ```
//!
//! Without arguments the built-in layout runs with random demand only.  A
//! JSON config overrides any subset of `WarehouseConfig` fields; an orders
//! CSV adds scripted orders on top of the generator.  Set `RUST_LOG=debug`
//! to trace every order and truck.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{LevelFilter, info};

use dc_core::{ForkliftLimits, Tick, WarehouseConfig};
use dc_output::{CsvWriter, SimOutputObserver};
use dc_schedule::load_orders_csv;
use dc_sim::{SimBuilder, SimObserver, WarehouseState};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:               u64 = 42;
const TICK_DURATION_SECS: u32 = 60; // 1 tick = 1 minute
const SIM_HOURS:          u64 = 24;
const OUTPUT_DIR:         &str = "output/small";

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Forwards to the CSV observer and counts rows and invariant breaks.
struct CountingObserver<W: dc_output::OutputWriter> {
    inner:          SimOutputObserver<W>,
    snapshots:      usize,
    violations:     usize,
}

impl<W: dc_output::OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, events: usize) {
        self.inner.on_tick_end(tick, events);
    }

    fn on_snapshot(&mut self, tick: Tick, state: &WarehouseState) {
        self.snapshots += 1;
        for v in state.invariant_violations() {
            log::warn!("{tick}: {v}");
            self.violations += 1;
        }
        self.inner.on_snapshot(tick, state);
    }

    fn on_sim_end(&mut self, final_tick: Tick, state: &WarehouseState) {
        self.inner.on_sim_end(final_tick, state);
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<WarehouseConfig> {
    let base = WarehouseConfig {
        seed:                  SEED,
        start_unix_secs:       1_700_000_000, // fixed reference Monday 00:00 UTC
        tick_duration_secs:    TICK_DURATION_SECS,
        total_ticks:           SIM_HOURS * 60,
        output_interval_ticks: 15,
        ..Default::default()
    };
    let Some(path) = path else {
        return Ok(base);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: WarehouseConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let config = load_config(args.first().map(PathBuf::as_path))?;

    let script = match args.get(1) {
        Some(path) => load_orders_csv(path, config.pallet_type_count as usize)
            .with_context(|| format!("loading orders {}", path.display()))?,
        None => Vec::new(),
    };

    println!("=== small — distribution center ===");
    println!(
        "Types: {}  |  Racks: {} x {}  |  Docks: {} load, {} unload  |  Forklifts: {}",
        config.pallet_type_count,
        config.rack_count,
        config.rack_capacity,
        config.load_docks,
        config.unload_docks,
        config.forklift_count,
    );
    println!("Scripted orders: {}  |  Ticks: {}", script.len(), config.total_ticks);
    println!();

    let mut sim = SimBuilder::new(config.clone()).script(script).build()?;

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver {
        inner:      SimOutputObserver::new(writer, &config),
        snapshots:  0,
        violations: 0,
    };

    let t0 = Instant::now();

    // Morning shift with the configured limits, then a rush order and one
    // more forklift per dock for the rest of the day.
    let half = config.total_ticks / 2;
    sim.run_ticks(half, &mut obs)?;

    let mut rush = sim.order_template();
    while rush.sum() > config.min_order_size {
        let Some(i) = rush.capacities().iter().position(|&c| c > 0) else { break };
        rush.decrease(i);
    }
    let id = sim.submit_order(&rush);
    info!("{}: rush order {id} of {} pallets", sim.clock, rush.sum());

    let limits = sim.forklift_limits();
    sim.set_forklift_limits(ForkliftLimits { dock_service: limits.dock_service + 1, ..limits })?;
    sim.run(&mut obs)?;

    let elapsed = t0.elapsed();
    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    let stats = &sim.state.stats;
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  snapshots            : {}", obs.snapshots);
    println!("  invariant violations : {}", obs.violations);
    println!();
    println!("{:<28} {:>8}", "Counter", "Value");
    println!("{}", "-".repeat(37));
    for (name, value) in [
        ("orders created", stats.orders_created),
        ("orders admitted", stats.orders_admitted),
        ("orders shipped", stats.orders_shipped),
        ("pallets shipped", stats.pallets_shipped),
        ("pallets received", stats.pallets_received),
        ("pallets stored", stats.pallets_stored),
        ("loading trucks departed", stats.loading_trucks_departed),
        ("unloading trucks departed", stats.unloading_trucks_departed),
    ] {
        println!("{name:<28} {value:>8}");
    }
    println!();
    println!("Orders still queued: {}", sim.state.orders.queue_len());
    println!("Pallets in racks:    {}", sim.state.pallets_in_racks());

    Ok(())
}
