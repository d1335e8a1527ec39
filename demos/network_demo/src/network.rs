//! Synthetic West Coast network.
//!
//! Two fixed sites (a cross-dock and a last-mile hub) plus eight
//! distribution-center candidates between San Diego and Seattle.  Demand is
//! generated from a seeded `SmallRng`, so every run prices the same network.

use nd_core::{Demand, DemandId, Facility, FacilityId, FacilityKind, GeoPoint};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SITES: [(u32, &str, f64, f64, FacilityKind); 10] = [
    (1,  "Carson Cross-dock",    33.831, -118.282, FacilityKind::CrossDock),
    (2,  "Oakland Last-mile",    37.804, -122.271, FacilityKind::LastMile),
    (10, "Ontario DC",           34.063, -117.651, FacilityKind::DistributionCenter),
    (11, "San Diego DC",         32.716, -117.161, FacilityKind::DistributionCenter),
    (12, "Fresno DC",            36.737, -119.787, FacilityKind::DistributionCenter),
    (13, "Stockton DC",          37.957, -121.291, FacilityKind::DistributionCenter),
    (14, "Sacramento DC",        38.582, -121.494, FacilityKind::DistributionCenter),
    (15, "Reno DC",              39.530, -119.814, FacilityKind::DistributionCenter),
    (16, "Portland DC",          45.515, -122.679, FacilityKind::DistributionCenter),
    (17, "Kent DC",              47.381, -122.235, FacilityKind::DistributionCenter),
];

const ZIP_CODES: [&str; 8] = ["90001", "92101", "93721", "94103", "95814", "89501", "97201", "98101"];

/// Build the facility list and `demand_count` random demand records.
///
/// Each demand is assigned to one facility at random; quantities fall in
/// `10..=250` units.
pub fn build_network(demand_count: u32, seed: u64) -> (Vec<Facility>, Vec<Demand>) {
    let facilities: Vec<Facility> = SITES
        .iter()
        .map(|&(id, name, lat, lon, kind)| {
            Facility::new(FacilityId(id), name, GeoPoint::new(lat, lon), kind)
        })
        .collect();

    let mut rng = SmallRng::seed_from_u64(seed);
    let demands = (0..demand_count)
        .map(|i| {
            let zip = ZIP_CODES.choose(&mut rng).copied().unwrap_or("90001");
            let facility = &facilities[rng.gen_range(0..facilities.len())];
            Demand::new(DemandId(i), zip, rng.gen_range(10..=250)).assigned_to(facility.id)
        })
        .collect();

    (facilities, demands)
}
