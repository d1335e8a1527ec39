//! network_demo: end-to-end run of the netdesign planner.
//!
//! Builds a synthetic West Coast network, simulates it as-is, searches for
//! the cheapest subset of distribution centers and exports both results.
//!
//! ```text
//! network_demo [config.json] [output_dir]
//! ```
//!
//! `config.json` holds a (partial) `ModelConfig`; missing fields keep their
//! defaults.  Set `RUST_LOG=debug` for per-combination detail.  Ctrl-C
//! cancels the optimization cleanly.

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nd_core::{FacilityKind, ModelConfig, SnapshotBuilder, TransportCostTable};
use nd_eval::simulate;
use nd_io::{CsvResultWriter, ResultWriter, write_demands_csv, write_facilities_csv};
use nd_opt::{CancelToken, LogObserver, OptError, OptimizeRequest, Optimizer};

use network::build_network;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEMAND_COUNT:     u32   = 400;
const SEED:             u64   = 42;
const KEEP_DCS:         usize = 4;
const PROGRESS_STEP:    f64   = 10.0;
const DEFAULT_OUT_DIR:  &str  = "output/network_demo";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => ModelConfig::default(),
    };
    let out_dir = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUT_DIR), PathBuf::from);

    println!("=== network_demo — netdesign planner ===");
    println!("Demand points: {DEMAND_COUNT}  |  Seed: {SEED}  |  Keep DCs: {KEEP_DCS}");
    println!();

    // 1. Network snapshot.
    let (facilities, demands) = build_network(DEMAND_COUNT, SEED);
    let snapshot = SnapshotBuilder::new()
        .facilities(facilities)
        .demands(demands)
        .transport_costs(TransportCostTable::default())
        .config(config)
        .build()?;

    // 2. Simulate the network as-is.
    let report = simulate(&snapshot)?;
    println!("Baseline network");
    println!("  total cost      : ${:>14.2}", report.total_cost);
    println!("  inbound cost    : ${:>14.2}", report.breakdown.inbound);
    println!("  outbound cost   : ${:>14.2}", report.breakdown.outbound);
    println!("  avg inbound mi  : {:>15.1}", report.avg_inbound_miles);
    println!(
        "  service levels  : <24h {:.1}%  <48h {:.1}%  >=48h {:.1}%",
        report.service_levels.within_24h,
        report.service_levels.within_48h,
        report.service_levels.beyond_48h,
    );
    println!();
    println!("{:<24} {:>8}", "Busiest facility", "Units");
    println!("{}", "-".repeat(33));
    for (id, units) in report.top_utilized(5) {
        let name = snapshot.facility(id).map_or("?", |f| f.name.as_str());
        println!("{name:<24} {units:>8}");
    }
    println!();

    // 3. Optimize, with Ctrl-C wired to the cancel token.
    let cancel = CancelToken::new();
    ctrlc::set_handler({
        let cancel = cancel.clone();
        move || cancel.cancel()
    })
    .context("cannot set interruption handler")?;

    let request = OptimizeRequest::new(FacilityKind::DistributionCenter, KEEP_DCS);
    let optimizer = Optimizer::for_snapshot(&snapshot, request)?;
    let mut observer = LogObserver::new(PROGRESS_STEP);

    let t0 = Instant::now();
    let outcome =
        optimizer.run_parallel(snapshot.facilities(), snapshot.demands(), &mut observer, &cancel);
    let elapsed = t0.elapsed();

    let result = match outcome {
        Ok(result) => Some(result),
        Err(OptError::Cancelled { processed, total }) => {
            warn!(processed, total, "optimization cancelled, exporting baseline only");
            None
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(result) = &result {
        println!("Optimization complete in {:.3} s", elapsed.as_secs_f64());
        println!("  combinations    : {}", result.combinations_evaluated);
        println!("  best cost       : ${:>14.2}", result.best_cost);
        println!("  cost savings    : ${:>14.2}", result.cost_savings);
        println!("  selected sites  : {}", result.optimal_site_names.join(", "));
        println!();
    }

    // 4. Export.
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    write_facilities_csv(&out_dir.join("facilities.csv"), snapshot.facilities())?;
    write_demands_csv(&out_dir.join("demand.csv"), snapshot.demands())?;

    let mut writer = CsvResultWriter::new(&out_dir)?;
    writer.write_report(&report)?;
    if let Some(result) = &result {
        writer.write_optimization(result)?;
    }
    writer.finish()?;

    info!(dir = %out_dir.display(), "results exported");
    Ok(())
}

fn load_config(path: &Path) -> Result<ModelConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let config: ModelConfig = serde_json::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
