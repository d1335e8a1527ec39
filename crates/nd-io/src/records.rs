//! Row types for facility, demand and transport-rate files.
//!
//! # Facility CSV
//!
//! ```csv
//! facility_id,site_name,latitude,longitude,facility_type,is_active
//! 4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11,DC A,36.0,-119.0,DC,True
//! 2,Reno Hub,39.5,-119.8,DC;Cross-dock,false
//! ```
//!
//! Ids are strings: UUIDs as the planning UI writes them, or integers.
//! `facility_id` may be blank or absent, in which case the loader mints
//! one.  `facility_type` holds one or more `;`-separated tags, as short
//! labels (`DC`, `Cross-dock`, `Last-mile`, `Retail`, …) or canonical names
//! (`distribution-center`, …).  `is_active` is optional and defaults to
//! `true`.  Address columns (`parent_company`, `street_address`, `city`,
//! `state_province`, `zip5`, `zip9`, `country`) may be present and are
//! ignored.
//!
//! # Demand CSV
//!
//! ```csv
//! demand_id,zip_code,product_id,units_demanded,assigned_facility_id
//! 9d2c6a70-1e44-4c8b-b1a2-0f7d3e5c9b21,90001,7,100,4b1f0c9e-8f3a-4d52-9a57-1f5e2f0c6a11
//! 2,10001,,40,
//! ```
//!
//! `assigned_facility_id` is resolved against the facility keys of the
//! same [`NetworkLoader`][crate::NetworkLoader].
//!
//! # Transport-rate CSV
//!
//! ```csv
//! mode,cost_per_mile
//! Parcel,0.5
//! LTL,2.0
//! TL,3.0
//! ```

use nd_core::{Demand, Facility, FacilityId, GeoPoint, KindSet, NdError, TransportCost};
use serde::{Deserialize, Deserializer, Serialize};

// ── Facility ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(default)]
    pub facility_id:   Option<String>,
    pub site_name:     String,
    pub latitude:      f64,
    pub longitude:     f64,
    pub facility_type: String,
    #[serde(default = "active_by_default", deserialize_with = "flexible_bool")]
    pub is_active:     bool,
}

impl FacilityRecord {
    /// Build the facility under the already-resolved `id`.
    pub fn into_facility(self, id: FacilityId) -> Result<Facility, NdError> {
        let kinds = KindSet::parse_list(&self.facility_type)?;
        if kinds.is_empty() {
            return Err(NdError::UntaggedFacility(id));
        }
        Ok(Facility {
            id,
            name:     self.site_name,
            location: GeoPoint::new(self.latitude, self.longitude),
            kinds,
            active:   self.is_active,
        })
    }
}

impl From<&Facility> for FacilityRecord {
    fn from(f: &Facility) -> Self {
        FacilityRecord {
            facility_id:   Some(f.id.0.to_string()),
            site_name:     f.name.clone(),
            latitude:      f.location.lat,
            longitude:     f.location.lon,
            facility_type: f.kinds.iter().map(|k| k.label()).collect::<Vec<_>>().join(";"),
            is_active:     f.active,
        }
    }
}

// ── Demand ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecord {
    #[serde(default)]
    pub demand_id:            Option<String>,
    pub zip_code:             String,
    pub units_demanded:       u32,
    #[serde(default)]
    pub assigned_facility_id: Option<String>,
    #[serde(default)]
    pub product_id:           Option<String>,
}

impl From<&Demand> for DemandRecord {
    fn from(d: &Demand) -> Self {
        DemandRecord {
            demand_id:            Some(d.id.0.to_string()),
            zip_code:             d.zip_code.clone(),
            units_demanded:       d.quantity,
            assigned_facility_id: d.assigned_facility.map(|f| f.0.to_string()),
            product_id:           d.product.map(|p| p.0.to_string()),
        }
    }
}

// ── Transport rates ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransportCostRecord {
    pub mode:          String,
    pub cost_per_mile: f64,
}

impl TryFrom<TransportCostRecord> for TransportCost {
    type Error = NdError;

    fn try_from(r: TransportCostRecord) -> Result<Self, Self::Error> {
        Ok(TransportCost { mode: r.mode.parse()?, cost_per_mile: r.cost_per_mile })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn active_by_default() -> bool {
    true
}

/// Accepts `true/false`, `True/False`, `1/0`, `yes/no`; empty means `true`.
pub(crate) fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        other => Err(format!("invalid boolean {other:?}")),
    }
}

fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).map_err(serde::de::Error::custom)
}
