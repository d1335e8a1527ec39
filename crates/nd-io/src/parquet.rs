//! Parquet backend (feature `parquet`).
//!
//! [`ParquetResultWriter`] creates two files in the configured output
//! directory:
//! - `simulation_results.parquet`
//! - `optimization_results.parquet`
//!
//! Facility files can also be exchanged as Parquet, with the same columns
//! as the facility CSV layout (see [`records`][crate::records]).  On import
//! any column type Arrow can cast to the expected one is accepted, so
//! integer or UUID string `facility_id` columns both load.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanBuilder, Float64Builder, StringBuilder, UInt32Builder,
    UInt64Builder,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use nd_core::Facility;
use nd_eval::CostReport;
use nd_opt::OptimizationResult;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::{DataError, DataResult};
use crate::records::{FacilityRecord, parse_flag};
use crate::row::{optimization_rows, report_rows};
use crate::writer::ResultWriter;

fn report_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("facility_id",               DataType::UInt32,  true),
        Field::new("units_served",              DataType::UInt64,  true),
        Field::new("total_cost",                DataType::Float64, false),
        Field::new("avg_inbound_dist",          DataType::Float64, false),
        Field::new("avg_outbound_dist",         DataType::Float64, false),
        Field::new("total_demand_units",        DataType::UInt64,  false),
        Field::new("inbound_cost",              DataType::Float64, false),
        Field::new("outbound_cost",             DataType::Float64, false),
        Field::new("service_level_lt_24h_pct",  DataType::Float64, false),
        Field::new("service_level_lt_48h_pct",  DataType::Float64, false),
        Field::new("service_level_gte_48h_pct", DataType::Float64, false),
    ]))
}

fn optimization_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("rank",          DataType::UInt32,  false),
        Field::new("facility_id",   DataType::UInt32,  false),
        Field::new("site_name",     DataType::Utf8,    false),
        Field::new("best_cost",     DataType::Float64, false),
        Field::new("baseline_cost", DataType::Float64, false),
        Field::new("cost_savings",  DataType::Float64, false),
    ]))
}

fn facility_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("facility_id",   DataType::Utf8,    false),
        Field::new("site_name",     DataType::Utf8,    false),
        Field::new("latitude",      DataType::Float64, false),
        Field::new("longitude",     DataType::Float64, false),
        Field::new("facility_type", DataType::Utf8,    false),
        Field::new("is_active",     DataType::Boolean, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation and optimization results to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
/// Writes after `finish()` fail with [`DataError::WriterClosed`].
pub struct ParquetResultWriter {
    reports:       Option<ArrowWriter<File>>,
    optimizations: Option<ArrowWriter<File>>,
    report_schema: Arc<Schema>,
    opt_schema:    Arc<Schema>,
}

impl ParquetResultWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> DataResult<Self> {
        let report_schema = report_schema();
        let opt_schema = optimization_schema();

        let reports = ArrowWriter::try_new(
            File::create(dir.join("simulation_results.parquet"))?,
            Arc::clone(&report_schema),
            Some(snappy_props()),
        )?;
        let optimizations = ArrowWriter::try_new(
            File::create(dir.join("optimization_results.parquet"))?,
            Arc::clone(&opt_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            reports: Some(reports),
            optimizations: Some(optimizations),
            report_schema,
            opt_schema,
        })
    }
}

impl ResultWriter for ParquetResultWriter {
    fn write_report(&mut self, report: &CostReport) -> DataResult<()> {
        let Some(writer) = self.reports.as_mut() else {
            return Err(DataError::WriterClosed("simulation_results.parquet"));
        };

        let rows = report_rows(report);
        let mut facility_ids  = UInt32Builder::new();
        let mut units_served  = UInt64Builder::new();
        let mut total_costs   = Float64Builder::new();
        let mut avg_inbound   = Float64Builder::new();
        let mut avg_outbound  = Float64Builder::new();
        let mut total_units   = UInt64Builder::new();
        let mut inbound_cost  = Float64Builder::new();
        let mut outbound_cost = Float64Builder::new();
        let mut lt_24h        = Float64Builder::new();
        let mut lt_48h        = Float64Builder::new();
        let mut gte_48h       = Float64Builder::new();

        for row in &rows {
            facility_ids.append_option(row.facility_id);
            units_served.append_option(row.units_served);
            total_costs.append_value(row.total_cost);
            avg_inbound.append_value(row.avg_inbound_dist);
            avg_outbound.append_value(row.avg_outbound_dist);
            total_units.append_value(row.total_demand_units);
            inbound_cost.append_value(row.inbound_cost);
            outbound_cost.append_value(row.outbound_cost);
            lt_24h.append_value(row.service_level_lt_24h_pct);
            lt_48h.append_value(row.service_level_lt_48h_pct);
            gte_48h.append_value(row.service_level_gte_48h_pct);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.report_schema),
            vec![
                Arc::new(facility_ids.finish()),
                Arc::new(units_served.finish()),
                Arc::new(total_costs.finish()),
                Arc::new(avg_inbound.finish()),
                Arc::new(avg_outbound.finish()),
                Arc::new(total_units.finish()),
                Arc::new(inbound_cost.finish()),
                Arc::new(outbound_cost.finish()),
                Arc::new(lt_24h.finish()),
                Arc::new(lt_48h.finish()),
                Arc::new(gte_48h.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_optimization(&mut self, result: &OptimizationResult) -> DataResult<()> {
        let Some(writer) = self.optimizations.as_mut() else {
            return Err(DataError::WriterClosed("optimization_results.parquet"));
        };
        let rows = optimization_rows(result);
        if rows.is_empty() {
            return Ok(());
        }

        let mut ranks      = UInt32Builder::new();
        let mut ids        = UInt32Builder::new();
        let mut names      = StringBuilder::new();
        let mut best       = Float64Builder::new();
        let mut baseline   = Float64Builder::new();
        let mut savings    = Float64Builder::new();

        for row in &rows {
            ranks.append_value(row.rank);
            ids.append_value(row.facility_id);
            names.append_value(&row.site_name);
            best.append_value(row.best_cost);
            baseline.append_value(row.baseline_cost);
            savings.append_value(row.cost_savings);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.opt_schema),
            vec![
                Arc::new(ranks.finish()),
                Arc::new(ids.finish()),
                Arc::new(names.finish()),
                Arc::new(best.finish()),
                Arc::new(baseline.finish()),
                Arc::new(savings.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> DataResult<()> {
        if let Some(w) = self.reports.take() {
            w.close()?;
        }
        if let Some(w) = self.optimizations.take() {
            w.close()?;
        }
        Ok(())
    }
}

// ── Facility files ────────────────────────────────────────────────────────────

/// Write `facilities` to a single Parquet file at `path`.
pub fn write_facilities_parquet(path: &Path, facilities: &[Facility]) -> DataResult<()> {
    let schema = facility_schema();

    let mut ids    = StringBuilder::new();
    let mut names  = StringBuilder::new();
    let mut lats   = Float64Builder::new();
    let mut lons   = Float64Builder::new();
    let mut types  = StringBuilder::new();
    let mut active = BooleanBuilder::new();

    for record in facilities.iter().map(FacilityRecord::from) {
        ids.append_value(record.facility_id.unwrap_or_default());
        names.append_value(&record.site_name);
        lats.append_value(record.latitude);
        lons.append_value(record.longitude);
        types.append_value(&record.facility_type);
        active.append_value(record.is_active);
    }

    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        vec![
            Arc::new(ids.finish()),
            Arc::new(names.finish()),
            Arc::new(lats.finish()),
            Arc::new(lons.finish()),
            Arc::new(types.finish()),
            Arc::new(active.finish()),
        ],
    )?;

    let mut writer = ArrowWriter::try_new(File::create(path)?, schema, Some(snappy_props()))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read the rows of a facility Parquet file.
///
/// `facility_id` and `is_active` are optional columns; a null `is_active`
/// means active.  Ids are left as strings for the loader to intern.
pub(crate) fn read_facility_records(path: &Path) -> DataResult<Vec<FacilityRecord>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let first_row = records.len();

        let ids = optional_column(&batch, "facility_id", &DataType::Utf8)?;
        let names = required_column(&batch, "site_name", &DataType::Utf8)?;
        let lats = required_column(&batch, "latitude", &DataType::Float64)?;
        let lons = required_column(&batch, "longitude", &DataType::Float64)?;
        let types = required_column(&batch, "facility_type", &DataType::Utf8)?;
        let active = optional_column(&batch, "is_active", &DataType::Utf8)?;

        let ids = ids.as_ref().map(|a| a.as_string::<i32>());
        let names = names.as_string::<i32>();
        let lats = lats.as_primitive::<Float64Type>();
        let lons = lons.as_primitive::<Float64Type>();
        let types = types.as_string::<i32>();
        let active = active.as_ref().map(|a| a.as_string::<i32>());

        for i in 0..batch.num_rows() {
            let row = first_row + i + 1;
            if lats.is_null(i) || lons.is_null(i) {
                return Err(DataError::Parse(format!("row {row}: missing coordinate")));
            }
            let is_active = match active {
                Some(col) if col.is_valid(i) => {
                    parse_flag(col.value(i)).map_err(|e| DataError::Parse(format!("row {row}: {e}")))?
                }
                _ => true,
            };
            records.push(FacilityRecord {
                facility_id:   ids.filter(|col| col.is_valid(i)).map(|col| col.value(i).to_owned()),
                site_name:     names.is_valid(i).then(|| names.value(i).to_owned()).unwrap_or_default(),
                latitude:      lats.value(i),
                longitude:     lons.value(i),
                facility_type: types.is_valid(i).then(|| types.value(i).to_owned()).unwrap_or_default(),
                is_active,
            });
        }
    }
    Ok(records)
}

fn required_column(batch: &RecordBatch, name: &str, to: &DataType) -> DataResult<ArrayRef> {
    optional_column(batch, name, to)?
        .ok_or_else(|| DataError::Parse(format!("missing column {name:?}")))
}

fn optional_column(batch: &RecordBatch, name: &str, to: &DataType) -> DataResult<Option<ArrayRef>> {
    batch
        .column_by_name(name)
        .map(|column| cast(column.as_ref(), to))
        .transpose()
        .map_err(DataError::from)
}
