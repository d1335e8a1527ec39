//! `nd-io`: file import and result export for the netdesign planner.
//!
//! Import reads the column layout the planning UI exports, so a facility or
//! demand file written by one tool loads in the other.
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`loader`]   | Facility / demand / transport-rate loaders, `NetworkLoader` |
//! | [`keys`]     | `KeyInterner`: string record keys to typed ids            |
//! | [`records`]  | Serde row types shared by loaders and record export       |
//! | [`row`]      | Flattened result rows (`ReportRow`, `OptimizationRow`)    |
//! | [`writer`]   | `ResultWriter` trait                                      |
//! | [`csv`]      | `CsvResultWriter`, facility/demand CSV export             |
//! | [`parquet`]  | `ParquetResultWriter`, facility Parquet import/export (feature `parquet`) |
//!
//! Two backends are provided for results:
//!
//! | Feature   | Backend     | Files created                                                |
//! |-----------|-------------|--------------------------------------------------------------|
//! | *(none)*  | CSV         | `simulation_results.csv`, `optimization_results.csv`         |
//! | `parquet` | Parquet     | `simulation_results.parquet`, `optimization_results.parquet` |
//!
//! # Usage
//!
//! ```rust,ignore
//! use nd_io::{CsvResultWriter, ResultWriter, load_snapshot};
//!
//! let snapshot = load_snapshot(&facilities_csv, &demand_csv, None, ModelConfig::default())?;
//! let report = nd_eval::simulate(&snapshot)?;
//! let mut writer = CsvResultWriter::new(Path::new("./out"))?;
//! writer.write_report(&report)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod keys;
pub mod loader;
pub mod records;
pub mod row;
pub mod writer;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use self::csv::{CsvResultWriter, write_demands_csv, write_facilities_csv};
pub use error::{DataError, DataResult};
pub use keys::KeyInterner;
pub use loader::{
    NetworkLoader, load_demands_csv, load_demands_reader, load_facilities_csv,
    load_facilities_reader, load_snapshot, load_transport_costs_csv, load_transport_costs_reader,
};
pub use row::{OptimizationRow, ReportRow, optimization_rows, report_rows};
pub use writer::ResultWriter;

#[cfg(feature = "parquet")]
pub use self::parquet::{ParquetResultWriter, write_facilities_parquet};
#[cfg(feature = "parquet")]
pub use loader::load_facilities_parquet;
