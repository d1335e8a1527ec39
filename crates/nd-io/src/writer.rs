//! The `ResultWriter` trait implemented by all export backends.

use nd_eval::CostReport;
use nd_opt::OptimizationResult;

use crate::DataResult;

/// Trait implemented by the CSV and Parquet result writers.
pub trait ResultWriter {
    /// Append the rows of one simulation report.
    fn write_report(&mut self, report: &CostReport) -> DataResult<()>;

    /// Append the rows of one optimization result.
    fn write_optimization(&mut self, result: &OptimizationResult) -> DataResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.  Any write after the first call fails with
    /// [`DataError::WriterClosed`][crate::DataError::WriterClosed].
    fn finish(&mut self) -> DataResult<()>;
}
