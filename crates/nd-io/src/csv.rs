//! CSV export backend.
//!
//! [`CsvResultWriter`] creates two files in the configured output directory:
//! - `simulation_results.csv`
//! - `optimization_results.csv`
//!
//! [`write_facilities_csv`] and [`write_demands_csv`] export network records
//! in the layout the loaders read back.

use std::fs::File;
use std::path::Path;

use csv::Writer;
use nd_core::{Demand, Facility};
use nd_eval::CostReport;
use nd_opt::OptimizationResult;

use crate::{DataError, DataResult};
use crate::records::{DemandRecord, FacilityRecord};
use crate::row::{optimization_rows, report_rows};
use crate::writer::ResultWriter;

pub const REPORT_HEADER: [&str; 11] = [
    "facility_id",
    "units_served",
    "total_cost",
    "avg_inbound_dist",
    "avg_outbound_dist",
    "total_demand_units",
    "inbound_cost",
    "outbound_cost",
    "service_level_lt_24h_pct",
    "service_level_lt_48h_pct",
    "service_level_gte_48h_pct",
];

pub const OPTIMIZATION_HEADER: [&str; 6] =
    ["rank", "facility_id", "site_name", "best_cost", "baseline_cost", "cost_savings"];

/// Writes simulation and optimization results to two CSV files.
pub struct CsvResultWriter {
    reports:       Writer<File>,
    optimizations: Writer<File>,
    finished:      bool,
}

impl CsvResultWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> DataResult<Self> {
        let mut reports = Writer::from_path(dir.join("simulation_results.csv"))?;
        reports.write_record(REPORT_HEADER)?;

        let mut optimizations = Writer::from_path(dir.join("optimization_results.csv"))?;
        optimizations.write_record(OPTIMIZATION_HEADER)?;

        Ok(Self {
            reports,
            optimizations,
            finished: false,
        })
    }
}

impl ResultWriter for CsvResultWriter {
    fn write_report(&mut self, report: &CostReport) -> DataResult<()> {
        if self.finished {
            return Err(DataError::WriterClosed("simulation_results.csv"));
        }
        for row in report_rows(report) {
            self.reports.write_record(&[
                opt_to_string(row.facility_id),
                opt_to_string(row.units_served),
                row.total_cost.to_string(),
                row.avg_inbound_dist.to_string(),
                row.avg_outbound_dist.to_string(),
                row.total_demand_units.to_string(),
                row.inbound_cost.to_string(),
                row.outbound_cost.to_string(),
                row.service_level_lt_24h_pct.to_string(),
                row.service_level_lt_48h_pct.to_string(),
                row.service_level_gte_48h_pct.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_optimization(&mut self, result: &OptimizationResult) -> DataResult<()> {
        if self.finished {
            return Err(DataError::WriterClosed("optimization_results.csv"));
        }
        for row in optimization_rows(result) {
            self.optimizations.write_record(&[
                row.rank.to_string(),
                row.facility_id.to_string(),
                row.site_name,
                row.best_cost.to_string(),
                row.baseline_cost.to_string(),
                row.cost_savings.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> DataResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.reports.flush()?;
        self.optimizations.flush()?;
        Ok(())
    }
}

/// Export facilities in the layout [`load_facilities_csv`][crate::load_facilities_csv] reads.
pub fn write_facilities_csv(path: &Path, facilities: &[Facility]) -> DataResult<()> {
    let mut writer = Writer::from_path(path)?;
    for facility in facilities {
        writer.serialize(FacilityRecord::from(facility))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export demand in the layout [`load_demands_csv`][crate::load_demands_csv] reads.
pub fn write_demands_csv(path: &Path, demands: &[Demand]) -> DataResult<()> {
    let mut writer = Writer::from_path(path)?;
    for demand in demands {
        writer.serialize(DemandRecord::from(demand))?;
    }
    writer.flush()?;
    Ok(())
}

fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
