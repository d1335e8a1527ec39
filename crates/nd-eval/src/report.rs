//! Evaluation output types.

use std::collections::BTreeMap;
use std::fmt;

use nd_core::FacilityId;

/// Split of total cost by leg.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    pub inbound:  f64,
    pub outbound: f64,
}

/// Fulfilment-speed proxy band derived from outbound distance.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ServiceBand {
    Within24h,
    Within48h,
    Beyond48h,
}

impl ServiceBand {
    pub fn label(self) -> &'static str {
        match self {
            ServiceBand::Within24h => "<24h",
            ServiceBand::Within48h => "<48h",
            ServiceBand::Beyond48h => ">=48h",
        }
    }
}

impl fmt::Display for ServiceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage of demand units per service band, 0–100.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceLevels {
    pub within_24h: f64,
    pub within_48h: f64,
    pub beyond_48h: f64,
}

impl ServiceLevels {
    pub fn get(&self, band: ServiceBand) -> f64 {
        match band {
            ServiceBand::Within24h => self.within_24h,
            ServiceBand::Within48h => self.within_48h,
            ServiceBand::Beyond48h => self.beyond_48h,
        }
    }

    pub(crate) fn get_mut(&mut self, band: ServiceBand) -> &mut f64 {
        match band {
            ServiceBand::Within24h => &mut self.within_24h,
            ServiceBand::Within48h => &mut self.within_48h,
            ServiceBand::Beyond48h => &mut self.beyond_48h,
        }
    }
}

/// Network-wide cost and service metrics for one facility set.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostReport {
    pub total_cost:           f64,
    pub breakdown:            CostBreakdown,
    pub service_levels:       ServiceLevels,
    /// Units served per facility.  Every facility of the evaluated set is a
    /// key, with 0 when nothing is assigned to it.
    pub facility_utilization: BTreeMap<FacilityId, u64>,
    /// Unit-weighted, divided by `total_demand_units` (or 1).
    pub avg_inbound_miles:    f64,
    pub avg_outbound_miles:   f64,
    /// Quantity of all demand records, including ones that were not costed.
    pub total_demand_units:   u64,
    /// Quantity of the demand records that were costed.
    pub assigned_units:       u64,
}

impl CostReport {
    /// The `n` busiest facilities, most units first; ties by ascending id.
    pub fn top_utilized(&self, n: usize) -> Vec<(FacilityId, u64)> {
        let mut entries: Vec<(FacilityId, u64)> =
            self.facility_utilization.iter().map(|(&id, &units)| (id, units)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

    pub fn utilization(&self, id: FacilityId) -> Option<u64> {
        self.facility_utilization.get(&id).copied()
    }
}
