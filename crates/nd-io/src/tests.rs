//! Tests for nd-io.

use std::io::Cursor;

use nd_core::{Demand, DemandId, Facility, FacilityId, FacilityKind, GeoPoint, TransportCostTable};
use nd_eval::{CostReport, evaluate};
use nd_opt::OptimizationResult;
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn sample_facilities() -> Vec<Facility> {
    vec![
        Facility::new(FacilityId(1), "DC A", GeoPoint::new(36.0, -119.0), FacilityKind::DistributionCenter),
        Facility::new(FacilityId(2), "Reno Hub", GeoPoint::new(39.5, -119.8), FacilityKind::DistributionCenter)
            .with_kind(FacilityKind::CrossDock)
            .inactive(),
    ]
}

fn sample_demands() -> Vec<Demand> {
    vec![
        Demand::new(DemandId(1), "90001", 100).assigned_to(FacilityId(1)),
        Demand::new(DemandId(2), "89501", 40).assigned_to(FacilityId(2)),
        Demand::new(DemandId(3), "10001", 5),
    ]
}

fn sample_report() -> CostReport {
    evaluate(&sample_facilities(), &sample_demands(), &TransportCostTable::default()).unwrap()
}

fn sample_optimization() -> OptimizationResult {
    let report = sample_report();
    OptimizationResult {
        optimal_facilities:     vec![FacilityId(1)],
        optimal_site_names:     vec!["DC A".into()],
        best_cost:              report.total_cost - 100.0,
        baseline_cost:          report.total_cost,
        cost_savings:           100.0,
        combinations_evaluated: 2,
        best_report:            report,
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use super::*;
    use crate::{
        DataError, NetworkLoader, load_demands_reader, load_facilities_reader,
        load_transport_costs_reader,
    };
    use nd_core::TransportMode;

    #[test]
    fn facilities_basic() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type,is_active\n\
                   1,DC A,36.0,-119.0,DC,true\n\
                   2,Reno Hub,39.5,-119.8,DC;Cross-dock,false\n";
        let facilities = load_facilities_reader(Cursor::new(csv)).unwrap();
        assert_eq!(facilities, sample_facilities());
    }

    #[test]
    fn facilities_accept_ui_export_layout() {
        let csv = "facility_id,facility_type,site_name,parent_company,street_address,city,state_province,zip5,zip9,country,latitude,longitude,is_active\n\
                   4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11,distribution-center, Ontario DC ,Acme,1 Main St,Ontario,CA,91761,917610000,US,34.06,-117.65,True\n\
                   c7e2d913-5b6f-4a08-8e1d-2a9f4b7c3e50,cross-dock,Fontana XD,Acme,2 Side St,Fontana,CA,92335,,US,34.09,-117.43,False\n";
        let facilities = load_facilities_reader(Cursor::new(csv)).unwrap();
        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].id, FacilityId(0));
        assert_eq!(facilities[1].id, FacilityId(1));
        assert_eq!(facilities[0].name, "Ontario DC");
        assert!(facilities[0].active);
        assert!(facilities[0].has_kind(FacilityKind::DistributionCenter));
        assert!(!facilities[1].active);
        assert!(facilities[1].has_kind(FacilityKind::CrossDock));
    }

    #[test]
    fn facility_ids_minted_when_column_absent() {
        let csv = "site_name,latitude,longitude,facility_type\n\
                   A,36.0,-119.0,DC\n\
                   B,39.5,-119.8,DC\n";
        let facilities = load_facilities_reader(Cursor::new(csv)).unwrap();
        assert_eq!(facilities[0].id, FacilityId(0));
        assert_eq!(facilities[1].id, FacilityId(1));
    }

    #[test]
    fn blank_and_na_facility_ids_are_minted() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type\n\
                   ,A,36.0,-119.0,DC\n\
                   <NA>,B,39.5,-119.8,DC\n\
                   0,C,34.0,-118.0,DC\n";
        let facilities = load_facilities_reader(Cursor::new(csv)).unwrap();
        let ids: Vec<_> = facilities.iter().map(|f| f.id).collect();
        assert_eq!(ids, [FacilityId(1), FacilityId(2), FacilityId(0)]);
    }

    #[test]
    fn integer_keys_keep_their_value_next_to_uuids() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type\n\
                   4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11,A,36.0,-119.0,DC\n\
                   0,B,39.5,-119.8,DC\n";
        let facilities = load_facilities_reader(Cursor::new(csv)).unwrap();
        assert_eq!(facilities[0].id, FacilityId(1));
        assert_eq!(facilities[1].id, FacilityId(0));
    }

    #[test]
    fn assignment_resolves_through_facility_keys() {
        let facilities = "facility_id,site_name,latitude,longitude,facility_type\n\
                          4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11,DC A,36.0,-119.0,DC\n\
                          c7e2d913-5b6f-4a08-8e1d-2a9f4b7c3e50,Reno Hub,39.5,-119.8,DC\n";
        let demands = "demand_id,zip_code,product_id,units_demanded,assigned_facility_id\n\
                       9d2c6a70-1e44-4c8b-b1a2-0f7d3e5c9b21,90001,p-1,100,c7e2d913-5b6f-4a08-8e1d-2a9f4b7c3e50\n\
                       1f8e7d6c-5b4a-4392-8170-6f5e4d3c2b1a,89501,p-1,40,00000000-0000-4000-8000-000000000000\n\
                       2a3b4c5d-6e7f-4809-9a1b-2c3d4e5f6a7b,10001,p-2,5,<NA>\n";

        let mut loader = NetworkLoader::new();
        let facilities = loader.facilities_reader(Cursor::new(facilities)).unwrap();
        let demands = loader.demands_reader(Cursor::new(demands)).unwrap();

        assert_eq!(demands[0].assigned_facility, Some(facilities[1].id));
        // Unknown key stays dangling.
        let dangling = demands[1].assigned_facility.unwrap();
        assert!(facilities.iter().all(|f| f.id != dangling));
        assert_eq!(demands[2].assigned_facility, None);

        assert_eq!(demands[0].product, demands[1].product);
        assert_ne!(demands[0].product, demands[2].product);
        let ids: Vec<_> = demands.iter().map(|d| d.id).collect();
        assert_eq!(ids, [DemandId(0), DemandId(1), DemandId(2)]);

        assert_eq!(loader.facility_keys().len(), 3);
        assert_eq!(loader.product_keys().len(), 2);
        assert_eq!(loader.facility_keys().get("4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11"), Some(FacilityId(0)));
    }

    #[test]
    fn demands_loaded_first_still_resolve() {
        let demands = "demand_id,zip_code,units_demanded,assigned_facility_id\n\
                       1,90001,100,c7e2d913-5b6f-4a08-8e1d-2a9f4b7c3e50\n";
        let facilities = "facility_id,site_name,latitude,longitude,facility_type\n\
                          c7e2d913-5b6f-4a08-8e1d-2a9f4b7c3e50,Reno Hub,39.5,-119.8,DC\n";

        let mut loader = NetworkLoader::new();
        let demands = loader.demands_reader(Cursor::new(demands)).unwrap();
        let facilities = loader.facilities_reader(Cursor::new(facilities)).unwrap();
        assert_eq!(demands[0].assigned_facility, Some(facilities[0].id));
    }

    #[test]
    fn facilities_active_column_optional() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type\n\
                   3,Port LA,33.73,-118.26,Port\n";
        let facilities = load_facilities_reader(Cursor::new(csv)).unwrap();
        assert!(facilities[0].active);
        assert!(facilities[0].has_kind(FacilityKind::Port));
    }

    #[test]
    fn facility_unknown_type_reports_row() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type\n\
                   1,A,36.0,-119.0,DC\n\
                   2,B,36.0,-119.0,Warehouse9\n";
        let err = load_facilities_reader(Cursor::new(csv)).unwrap_err();
        match err {
            DataError::Parse(msg) => assert!(msg.contains("row 2"), "message {msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn facility_empty_type_rejected() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type\n\
                   1,A,36.0,-119.0,\n";
        assert!(matches!(load_facilities_reader(Cursor::new(csv)), Err(DataError::Parse(_))));
    }

    #[test]
    fn facility_bad_latitude_reports_row() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type\n\
                   1,A,north,-119.0,DC\n";
        match load_facilities_reader(Cursor::new(csv)).unwrap_err() {
            DataError::Parse(msg) => assert!(msg.contains("row 1"), "message {msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn demands_optional_fields() {
        let csv = "demand_id,zip_code,units_demanded,assigned_facility_id,product_id\n\
                   1,90001,100,1,7\n\
                   2,10001,40,,\n";
        let demands = load_demands_reader(Cursor::new(csv)).unwrap();
        assert_eq!(demands[0].assigned_facility, Some(FacilityId(1)));
        assert_eq!(demands[0].product.map(|p| p.0), Some(7));
        assert_eq!(demands[1].assigned_facility, None);
        assert_eq!(demands[1].product, None);
        assert_eq!(demands[1].quantity, 40);
    }

    #[test]
    fn demands_without_assignment_column() {
        let csv = "demand_id,zip_code,units_demanded\n5,02134,12\n";
        let demands = load_demands_reader(Cursor::new(csv)).unwrap();
        assert_eq!(demands, vec![Demand::new(DemandId(5), "02134", 12)]);
    }

    #[test]
    fn negative_units_rejected() {
        let csv = "demand_id,zip_code,units_demanded\n1,90001,-3\n";
        assert!(matches!(load_demands_reader(Cursor::new(csv)), Err(DataError::Parse(_))));
    }

    #[test]
    fn transport_rates() {
        let csv = "mode,cost_per_mile\nParcel,0.75\nLTL,2.5\nTL,3.25\n";
        let table = load_transport_costs_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table.rate(TransportMode::Parcel), Some(0.75));
        assert_eq!(table.rate(TransportMode::Ltl), Some(2.5));
        assert_eq!(table.rate(TransportMode::Tl), Some(3.25));
    }

    #[test]
    fn transport_unknown_mode_rejected() {
        let csv = "mode,cost_per_mile\nRail,1.0\n";
        assert!(matches!(load_transport_costs_reader(Cursor::new(csv)), Err(DataError::Parse(_))));
    }

    #[test]
    fn empty_file_gives_empty_list() {
        let csv = "facility_id,site_name,latitude,longitude,facility_type\n";
        assert!(load_facilities_reader(Cursor::new(csv)).unwrap().is_empty());
    }
}

// ── Key interning ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod key_tests {
    use nd_core::FacilityId;

    use crate::KeyInterner;

    #[test]
    fn same_key_same_id() {
        let mut keys = KeyInterner::<FacilityId>::new();
        let a = keys.intern("4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11");
        let b = keys.intern(" 4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11 ");
        assert_eq!(a, b);
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn integer_key_keeps_value() {
        let mut keys = KeyInterner::<FacilityId>::new();
        assert_eq!(keys.intern("42"), FacilityId(42));
        assert_eq!(keys.intern("a"), FacilityId(0));
    }

    #[test]
    fn taken_integer_is_reminted() {
        let mut keys = KeyInterner::<FacilityId>::new();
        assert_eq!(keys.intern("a"), FacilityId(0));
        assert_eq!(keys.intern("0"), FacilityId(1));
        assert_eq!(keys.intern("b"), FacilityId(2));
    }

    #[test]
    fn reserve_claims_integers_first() {
        let mut keys = KeyInterner::<FacilityId>::new();
        keys.reserve(["0", "1", "x"]);
        assert_eq!(keys.intern("x"), FacilityId(2));
        assert_eq!(keys.intern("1"), FacilityId(1));
    }

    #[test]
    fn mint_binds_no_key() {
        let mut keys = KeyInterner::<FacilityId>::new();
        assert_eq!(keys.mint(), FacilityId(0));
        assert_eq!(keys.mint(), FacilityId(1));
        assert!(keys.is_empty());
        assert_eq!(keys.get("0"), None);
        assert_eq!(keys.intern("0"), FacilityId(2));
    }

    #[test]
    fn sentinel_value_is_never_kept() {
        let mut keys = KeyInterner::<FacilityId>::new();
        let id = keys.intern(&u32::MAX.to_string());
        assert!(id.is_valid());
    }
}

// ── Snapshot loading + record export ──────────────────────────────────────────

#[cfg(test)]
mod snapshot_tests {
    use super::*;
    use nd_core::ModelConfig;

    use crate::{
        DataError, load_demands_csv, load_facilities_csv, load_snapshot, write_demands_csv,
        write_facilities_csv,
    };

    #[test]
    fn exported_records_load_back() {
        let dir = tmp();
        let fpath = dir.path().join("facilities.csv");
        let dpath = dir.path().join("demand.csv");
        write_facilities_csv(&fpath, &sample_facilities()).unwrap();
        write_demands_csv(&dpath, &sample_demands()).unwrap();

        assert_eq!(load_facilities_csv(&fpath).unwrap(), sample_facilities());
        assert_eq!(load_demands_csv(&dpath).unwrap(), sample_demands());
    }

    #[test]
    fn load_snapshot_uses_default_rates() {
        let dir = tmp();
        let fpath = dir.path().join("facilities.csv");
        let dpath = dir.path().join("demand.csv");
        write_facilities_csv(&fpath, &sample_facilities()).unwrap();
        write_demands_csv(&dpath, &sample_demands()).unwrap();

        let snapshot = load_snapshot(&fpath, &dpath, None, ModelConfig::default()).unwrap();
        assert_eq!(snapshot.facilities().len(), 2);
        assert_eq!(snapshot.total_demand_units(), 145);
        assert_eq!(snapshot.transport_costs(), &TransportCostTable::default());
    }

    #[test]
    fn load_snapshot_reads_rate_file() {
        let dir = tmp();
        let fpath = dir.path().join("facilities.csv");
        let dpath = dir.path().join("demand.csv");
        let rpath = dir.path().join("rates.csv");
        write_facilities_csv(&fpath, &sample_facilities()).unwrap();
        write_demands_csv(&dpath, &sample_demands()).unwrap();
        std::fs::write(&rpath, "mode,cost_per_mile\nTL,4.0\n").unwrap();

        let snapshot = load_snapshot(&fpath, &dpath, Some(&rpath), ModelConfig::default()).unwrap();
        assert_eq!(snapshot.transport_costs().rate(nd_core::TransportMode::Tl), Some(4.0));
    }

    #[test]
    fn load_snapshot_rejects_duplicate_ids() {
        let dir = tmp();
        let fpath = dir.path().join("facilities.csv");
        let dpath = dir.path().join("demand.csv");
        let mut facilities = sample_facilities();
        facilities[1].id = FacilityId(1);
        write_facilities_csv(&fpath, &facilities).unwrap();
        write_demands_csv(&dpath, &sample_demands()).unwrap();

        let err = load_snapshot(&fpath, &dpath, None, ModelConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Network(_)));
    }

    const DC_A: &str = "4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11";
    const RENO: &str = "c7e2d913-5b6f-4a08-8e1d-2a9f4b7c3e50";

    #[test]
    fn uuid_keyed_network_is_priced() {
        let dir = tmp();
        let fpath = dir.path().join("facilities.csv");
        let dpath = dir.path().join("demand.csv");
        std::fs::write(
            &fpath,
            format!(
                "facility_id,facility_type,site_name,latitude,longitude,state_province,zip9,country,is_active\n\
                 {DC_A},DC,DC A,36.0,-119.0,CA,,US,True\n\
                 {RENO},DC,Reno Hub,39.5,-119.8,NV,,US,True\n"
            ),
        )
        .unwrap();
        std::fs::write(
            &dpath,
            format!(
                "demand_id,zip_code,product_id,units_demanded,assigned_facility_id\n\
                 9d2c6a70-1e44-4c8b-b1a2-0f7d3e5c9b21,90001,5e0c8b1d-3a2f-4e6d-9c7b-8a1f2e3d4c5b,100,{DC_A}\n\
                 1f8e7d6c-5b4a-4392-8170-6f5e4d3c2b1a,89501,5e0c8b1d-3a2f-4e6d-9c7b-8a1f2e3d4c5b,40,{RENO}\n\
                 2a3b4c5d-6e7f-4809-9a1b-2c3d4e5f6a7b,10001,5e0c8b1d-3a2f-4e6d-9c7b-8a1f2e3d4c5b,5,00000000-0000-4000-8000-000000000000\n"
            ),
        )
        .unwrap();

        let snapshot = load_snapshot(&fpath, &dpath, None, ModelConfig::default()).unwrap();
        let report = nd_eval::simulate(&snapshot).unwrap();

        let expected = evaluate(
            &[
                Facility::new(FacilityId(0), "DC A", GeoPoint::new(36.0, -119.0), FacilityKind::DistributionCenter),
                Facility::new(FacilityId(1), "Reno Hub", GeoPoint::new(39.5, -119.8), FacilityKind::DistributionCenter),
            ],
            &[
                Demand::new(DemandId(0), "90001", 100).assigned_to(FacilityId(0)),
                Demand::new(DemandId(1), "89501", 40).assigned_to(FacilityId(1)),
            ],
            &TransportCostTable::default(),
        )
        .unwrap();

        assert!(report.total_cost > 0.0);
        assert!((report.total_cost - expected.total_cost).abs() < 1e-6);
        assert_eq!(report.facility_utilization[&FacilityId(0)], 100);
        assert_eq!(report.facility_utilization[&FacilityId(1)], 40);
        assert_eq!(report.assigned_units, 140);
        assert_eq!(report.total_demand_units, 145);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tmp();
        let err = load_facilities_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}

// ── Result rows ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;
    use crate::{optimization_rows, report_rows};

    #[test]
    fn one_row_per_facility_with_repeated_totals() {
        let report = sample_report();
        let rows = report_rows(&report);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].facility_id, Some(1));
        assert_eq!(rows[0].units_served, Some(100));
        assert_eq!(rows[1].facility_id, Some(2));
        assert_eq!(rows[1].units_served, Some(40));
        for row in &rows {
            assert_eq!(row.total_cost, report.total_cost);
            assert_eq!(row.total_demand_units, 145);
            assert_eq!(row.inbound_cost, report.breakdown.inbound);
        }
    }

    #[test]
    fn report_without_facilities_gives_single_row() {
        let rows = report_rows(&CostReport::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].facility_id, None);
        assert_eq!(rows[0].units_served, None);
        assert_eq!(rows[0].total_cost, 0.0);
    }

    #[test]
    fn optimization_rows_are_ranked() {
        let mut result = sample_optimization();
        result.optimal_facilities.push(FacilityId(2));
        result.optimal_site_names.push("Reno Hub".into());
        let rows = optimization_rows(&result);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].rank, rows[0].facility_id), (1, 1));
        assert_eq!((rows[1].rank, rows[1].facility_id), (2, 2));
        assert_eq!(rows[1].site_name, "Reno Hub");
        assert_eq!(rows[1].cost_savings, 100.0);
    }
}

// ── CSV writer ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::{OPTIMIZATION_HEADER, REPORT_HEADER};
    use crate::{CsvResultWriter, DataError, ResultWriter};

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvResultWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("simulation_results.csv").exists());
        assert!(dir.path().join("optimization_results.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvResultWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("simulation_results.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, REPORT_HEADER);

        let mut rdr = csv::Reader::from_path(dir.path().join("optimization_results.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, OPTIMIZATION_HEADER);
    }

    #[test]
    fn csv_report_rows() {
        let dir = tmp();
        let report = sample_report();
        let mut w = CsvResultWriter::new(dir.path()).unwrap();
        w.write_report(&report).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("simulation_results.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");   // facility_id
        assert_eq!(&rows[0][1], "100"); // units_served
        assert_eq!(&rows[1][0], "2");
        assert_eq!(&rows[1][5], "145"); // total_demand_units
        let total: f64 = rows[0][2].parse().unwrap();
        assert_eq!(total, report.total_cost);
    }

    #[test]
    fn csv_empty_report_leaves_id_blank() {
        let dir = tmp();
        let mut w = CsvResultWriter::new(dir.path()).unwrap();
        w.write_report(&CostReport::default()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("simulation_results.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "");
        assert_eq!(&rows[0][1], "");
    }

    #[test]
    fn csv_optimization_rows() {
        let dir = tmp();
        let mut w = CsvResultWriter::new(dir.path()).unwrap();
        w.write_optimization(&sample_optimization()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("optimization_results.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "1");    // rank
        assert_eq!(&rows[0][1], "1");    // facility_id
        assert_eq!(&rows[0][2], "DC A"); // site_name
        assert_eq!(&rows[0][5], "100");  // cost_savings
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvResultWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_write_after_finish_is_error() {
        let dir = tmp();
        let mut w = CsvResultWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(matches!(w.write_report(&sample_report()), Err(DataError::WriterClosed(_))));
        assert!(matches!(
            w.write_optimization(&sample_optimization()),
            Err(DataError::WriterClosed(_))
        ));
    }
}

// ── Parquet ───────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use super::*;

    use std::path::Path;
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use arrow::datatypes::DataType;
    use arrow::record_batch::RecordBatch;
    use nd_core::ModelConfig;
    use parquet::arrow::ArrowWriter;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::{
        DataError, ParquetResultWriter, ResultWriter, load_facilities_parquet, load_snapshot,
        write_facilities_parquet,
    };

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetResultWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("simulation_results.parquet").exists());
        assert!(dir.path().join("optimization_results.parquet").exists());
    }

    #[test]
    fn parquet_report_round_trip() {
        let dir = tmp();
        let mut w = ParquetResultWriter::new(dir.path()).unwrap();
        w.write_report(&sample_report()).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("simulation_results.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let total_rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);
        assert_eq!(schema.fields().len(), 11);
        assert_eq!(*schema.field_with_name("total_cost").unwrap().data_type(), DataType::Float64);
        assert!(schema.field_with_name("facility_id").unwrap().is_nullable());
    }

    #[test]
    fn parquet_optimization_site_names_are_utf8() {
        let dir = tmp();
        let mut w = ParquetResultWriter::new(dir.path()).unwrap();
        w.write_optimization(&sample_optimization()).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("optimization_results.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        assert_eq!(*schema.field_with_name("site_name").unwrap().data_type(), DataType::Utf8);
        let total_rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 1);
    }

    #[test]
    fn parquet_write_after_finish_is_error() {
        let dir = tmp();
        let mut w = ParquetResultWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(matches!(w.write_report(&sample_report()), Err(DataError::WriterClosed(_))));
        assert!(matches!(
            w.write_optimization(&sample_optimization()),
            Err(DataError::WriterClosed(_))
        ));
        w.finish().unwrap();
    }

    #[test]
    fn facilities_parquet_load_back() {
        let dir = tmp();
        let path = dir.path().join("facilities.parquet");
        write_facilities_parquet(&path, &sample_facilities()).unwrap();
        assert_eq!(load_facilities_parquet(&path).unwrap(), sample_facilities());
    }

    fn write_batch(path: &Path, columns: Vec<(&str, ArrayRef)>) {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let mut w = ArrowWriter::try_new(std::fs::File::create(path).unwrap(), batch.schema(), None).unwrap();
        w.write(&batch).unwrap();
        w.close().unwrap();
    }

    #[test]
    fn uuid_keyed_parquet_facilities_are_priced() {
        let dir = tmp();
        let fpath = dir.path().join("facilities.parquet");
        let dpath = dir.path().join("demand.csv");
        let dc_a = "4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11";
        write_batch(
            &fpath,
            vec![
                ("facility_id", Arc::new(StringArray::from(vec![dc_a])) as ArrayRef),
                ("site_name", Arc::new(StringArray::from(vec!["DC A"])) as ArrayRef),
                ("latitude", Arc::new(Float64Array::from(vec![36.0])) as ArrayRef),
                ("longitude", Arc::new(Float64Array::from(vec![-119.0])) as ArrayRef),
                ("facility_type", Arc::new(StringArray::from(vec!["DC"])) as ArrayRef),
            ],
        );
        std::fs::write(
            &dpath,
            format!("demand_id,zip_code,units_demanded,assigned_facility_id\n1,90001,100,{dc_a}\n"),
        )
        .unwrap();

        let snapshot = load_snapshot(&fpath, &dpath, None, ModelConfig::default()).unwrap();
        let facility = &snapshot.facilities()[0];
        assert!(facility.active);
        assert_eq!(snapshot.demands()[0].assigned_facility, Some(facility.id));

        let report = nd_eval::simulate(&snapshot).unwrap();
        assert!(report.total_cost > 0.0);
        assert_eq!(report.facility_utilization[&facility.id], 100);
    }

    #[test]
    fn parquet_facilities_missing_column_is_parse_error() {
        let dir = tmp();
        let path = dir.path().join("facilities.parquet");
        write_batch(
            &path,
            vec![
                ("site_name", Arc::new(StringArray::from(vec!["DC A"])) as ArrayRef),
                ("longitude", Arc::new(Float64Array::from(vec![-119.0])) as ArrayRef),
                ("facility_type", Arc::new(StringArray::from(vec!["DC"])) as ArrayRef),
            ],
        );
        match load_facilities_parquet(&path).unwrap_err() {
            DataError::Parse(msg) => assert!(msg.contains("latitude"), "message {msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let mut w = ParquetResultWriter::new(dir.path()).unwrap();
            w.write_report(&sample_report()).unwrap();
        }

        let file = std::fs::File::open(dir.path().join("simulation_results.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
