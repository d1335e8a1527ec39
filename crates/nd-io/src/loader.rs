//! Loaders for facilities, demand and transport rates.
//!
//! See [`records`][crate::records] for the column layouts.  Every loader
//! reports the 1-based data row of the first bad record.
//!
//! Record ids are strings in the source files.  A [`NetworkLoader`] owns
//! one [`KeyInterner`] per id space, so loading the facility file and the
//! demand file through the same loader resolves `assigned_facility_id`
//! against the facility keys.  The free `load_*` functions each use a fresh
//! loader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nd_core::{
    Demand, DemandId, Facility, FacilityId, ModelConfig, NetworkSnapshot, ProductId,
    SnapshotBuilder, TransportCost, TransportCostTable,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::keys::{KeyInterner, present_key};
use crate::records::{DemandRecord, FacilityRecord, TransportCostRecord};
use crate::{DataError, DataResult};

// ── NetworkLoader ─────────────────────────────────────────────────────────────

/// Loads the files of one network with shared id interners.
///
/// ```rust,ignore
/// let mut loader = NetworkLoader::new();
/// let facilities = loader.facilities_csv(&facilities_path)?;
/// let demands = loader.demands_csv(&demand_path)?;
/// ```
#[derive(Default)]
pub struct NetworkLoader {
    facility_keys: KeyInterner<FacilityId>,
    demand_keys:   KeyInterner<DemandId>,
    product_keys:  KeyInterner<ProductId>,
}

impl NetworkLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facility_keys(&self) -> &KeyInterner<FacilityId> {
        &self.facility_keys
    }

    pub fn demand_keys(&self) -> &KeyInterner<DemandId> {
        &self.demand_keys
    }

    pub fn product_keys(&self) -> &KeyInterner<ProductId> {
        &self.product_keys
    }

    pub fn facilities_csv(&mut self, path: &Path) -> DataResult<Vec<Facility>> {
        self.facilities_reader(File::open(path)?)
    }

    pub fn facilities_reader<R: Read>(&mut self, reader: R) -> DataResult<Vec<Facility>> {
        let records = read_rows(reader, |_, r: FacilityRecord| Ok(r))?;
        self.facilities_from_records(records)
    }

    /// Read a facility Parquet file with the same columns as the CSV
    /// layout.
    #[cfg(feature = "parquet")]
    pub fn facilities_parquet(&mut self, path: &Path) -> DataResult<Vec<Facility>> {
        let records = crate::parquet::read_facility_records(path)?;
        self.facilities_from_records(records)
    }

    pub fn demands_csv(&mut self, path: &Path) -> DataResult<Vec<Demand>> {
        self.demands_reader(File::open(path)?)
    }

    pub fn demands_reader<R: Read>(&mut self, reader: R) -> DataResult<Vec<Demand>> {
        let records = read_rows(reader, |_, r: DemandRecord| Ok(r))?;

        self.demand_keys.reserve(records.iter().filter_map(|r| present_key(r.demand_id.as_deref())));
        self.product_keys.reserve(records.iter().filter_map(|r| present_key(r.product_id.as_deref())));
        self.facility_keys
            .reserve(records.iter().filter_map(|r| present_key(r.assigned_facility_id.as_deref())));

        let demands = records
            .into_iter()
            .map(|r| {
                let id = match present_key(r.demand_id.as_deref()) {
                    Some(key) => self.demand_keys.intern(key),
                    None => self.demand_keys.mint(),
                };
                let assigned_facility = present_key(r.assigned_facility_id.as_deref()).map(|key| {
                    if self.facility_keys.get(key).is_none() {
                        debug!(demand = %id, facility = key, "assignment to a facility not loaded yet");
                    }
                    self.facility_keys.intern(key)
                });
                let product = present_key(r.product_id.as_deref()).map(|key| self.product_keys.intern(key));
                Demand {
                    id,
                    zip_code: r.zip_code,
                    quantity: r.units_demanded,
                    assigned_facility,
                    product,
                }
            })
            .collect();
        Ok(demands)
    }

    fn facilities_from_records(&mut self, records: Vec<FacilityRecord>) -> DataResult<Vec<Facility>> {
        self.facility_keys
            .reserve(records.iter().filter_map(|r| present_key(r.facility_id.as_deref())));

        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let id = match present_key(r.facility_id.as_deref()) {
                    Some(key) => self.facility_keys.intern(key),
                    None => self.facility_keys.mint(),
                };
                r.into_facility(id)
                    .map_err(|e| DataError::Parse(format!("facility row {}: {e}", i + 1)))
            })
            .collect()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load facilities from a CSV file.
pub fn load_facilities_csv(path: &Path) -> DataResult<Vec<Facility>> {
    NetworkLoader::new().facilities_csv(path)
}

/// Like [`load_facilities_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for uploads held in
/// memory.
pub fn load_facilities_reader<R: Read>(reader: R) -> DataResult<Vec<Facility>> {
    NetworkLoader::new().facilities_reader(reader)
}

/// Load facilities from a Parquet file.
#[cfg(feature = "parquet")]
pub fn load_facilities_parquet(path: &Path) -> DataResult<Vec<Facility>> {
    NetworkLoader::new().facilities_parquet(path)
}

/// Load demand records from a CSV file.
///
/// Assignments are resolved without facility keys, so only integer
/// `assigned_facility_id` values line up with a facility file.  Use a
/// [`NetworkLoader`] or [`load_snapshot`] for UUID-keyed files.
pub fn load_demands_csv(path: &Path) -> DataResult<Vec<Demand>> {
    NetworkLoader::new().demands_csv(path)
}

/// Like [`load_demands_csv`] but accepts any `Read` source.
pub fn load_demands_reader<R: Read>(reader: R) -> DataResult<Vec<Demand>> {
    NetworkLoader::new().demands_reader(reader)
}

/// Load a transport-rate table from a CSV file.
pub fn load_transport_costs_csv(path: &Path) -> DataResult<TransportCostTable> {
    load_transport_costs_reader(File::open(path)?)
}

/// Like [`load_transport_costs_csv`] but accepts any `Read` source.
pub fn load_transport_costs_reader<R: Read>(reader: R) -> DataResult<TransportCostTable> {
    let entries = read_rows(reader, |row, r: TransportCostRecord| {
        TransportCost::try_from(r).map_err(|e| DataError::Parse(format!("rate row {row}: {e}")))
    })?;
    Ok(TransportCostTable::from_entries(entries))
}

/// Load and validate a complete snapshot.
///
/// The facility file may be CSV or, with the `parquet` feature, Parquet
/// (chosen by the `.parquet` extension).  Without a rate file the default
/// table (Parcel 0.5, LTL 2.0, TL 3.0) is used.
pub fn load_snapshot(
    facilities_path: &Path,
    demands_path:    &Path,
    rates_path:      Option<&Path>,
    config:          ModelConfig,
) -> DataResult<NetworkSnapshot> {
    let mut loader = NetworkLoader::new();
    let facilities = load_facility_file(&mut loader, facilities_path)?;
    let demands = loader.demands_csv(demands_path)?;
    let rates = match rates_path {
        Some(p) => load_transport_costs_csv(p)?,
        None => TransportCostTable::default(),
    };

    info!(
        facilities = facilities.len(),
        demands = demands.len(),
        "network loaded"
    );

    Ok(SnapshotBuilder::new()
        .facilities(facilities)
        .demands(demands)
        .transport_costs(rates)
        .config(config)
        .build()?)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

#[cfg(feature = "parquet")]
fn load_facility_file(loader: &mut NetworkLoader, path: &Path) -> DataResult<Vec<Facility>> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("parquet")) {
        loader.facilities_parquet(path)
    } else {
        loader.facilities_csv(path)
    }
}

#[cfg(not(feature = "parquet"))]
fn load_facility_file(loader: &mut NetworkLoader, path: &Path) -> DataResult<Vec<Facility>> {
    loader.facilities_csv(path)
}

fn read_rows<R, T, U, F>(reader: R, mut convert: F) -> DataResult<Vec<U>>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(usize, T) -> DataResult<U>,
{
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut out = Vec::new();

    for (i, result) in csv_reader.deserialize::<T>().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| DataError::Parse(format!("row {row}: {e}")))?;
        out.push(convert(row, record)?);
    }

    Ok(out)
}
