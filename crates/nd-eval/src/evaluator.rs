//! The `CostModel` trait and the reference `NetworkEvaluator`.

use std::collections::BTreeMap;

use nd_core::{
    Demand, Facility, FacilityId, ModelConfig, NetworkSnapshot, ServiceThresholds,
    TransportCostTable,
};
use tracing::{debug, info, trace, warn};

use crate::{CostBreakdown, CostReport, EvalError, EvalResult, ServiceBand, ServiceLevels};

#[cfg(not(feature = "fx-hash"))]
type FacilityIndex<'a> = std::collections::HashMap<FacilityId, &'a Facility>;
#[cfg(feature = "fx-hash")]
type FacilityIndex<'a> = rustc_hash::FxHashMap<FacilityId, &'a Facility>;

/// Anything that can price a facility set against a demand list.
///
/// The optimizer calls this once per candidate combination, possibly from
/// several Rayon workers at once, so implementations must be `Send + Sync`
/// and keep no per-call state.
pub trait CostModel: Send + Sync {
    fn evaluate(&self, facilities: &[Facility], demands: &[Demand]) -> EvalResult<CostReport>;
}

impl<M: CostModel + ?Sized> CostModel for &M {
    fn evaluate(&self, facilities: &[Facility], demands: &[Demand]) -> EvalResult<CostReport> {
        (**self).evaluate(facilities, demands)
    }
}

// ── NetworkEvaluator ──────────────────────────────────────────────────────────

/// The reference cost model: haversine inbound leg from a single origin,
/// constant-distance outbound leg, per-mode rates.
///
/// Rates are resolved once at construction; evaluation itself cannot fail.
#[derive(Clone, Debug)]
pub struct NetworkEvaluator {
    config:        ModelConfig,
    inbound_rate:  f64,
    outbound_rate: f64,
}

impl NetworkEvaluator {
    /// Validate `transport_costs` and `config` and resolve the leg rates.
    pub fn new(transport_costs: &TransportCostTable, config: ModelConfig) -> EvalResult<Self> {
        transport_costs.validate()?;
        config.validate()?;

        let inbound_rate = transport_costs.rate_or(config.inbound_mode, config.default_inbound_rate);
        let outbound_rate = transport_costs.rate_or(config.outbound_mode, config.default_outbound_rate);

        Ok(Self { config, inbound_rate, outbound_rate })
    }

    /// Evaluator for the rates and configuration carried by `snapshot`.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> EvalResult<Self> {
        Self::new(snapshot.transport_costs(), snapshot.config().clone())
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Resolved inbound rate in $/mi.
    pub fn inbound_rate(&self) -> f64 {
        self.inbound_rate
    }

    /// Resolved outbound rate in $/mi.
    pub fn outbound_rate(&self) -> f64 {
        self.outbound_rate
    }

    /// Price `demands` against the network formed by `facilities`.
    pub fn report(&self, facilities: &[Facility], demands: &[Demand]) -> CostReport {
        // First facility wins when the caller passes duplicate ids.
        let mut index = FacilityIndex::default();
        index.reserve(facilities.len());
        let mut utilization: BTreeMap<FacilityId, u64> = BTreeMap::new();
        for facility in facilities {
            index.entry(facility.id).or_insert(facility);
            utilization.insert(facility.id, 0);
        }

        let total_demand_units: u64 = demands.iter().map(|d| d.quantity as u64).sum();
        let denominator = if total_demand_units == 0 { 1.0 } else { total_demand_units as f64 };

        let origin = self.config.inbound_origin;
        let outbound_dist = self.config.outbound_distance_miles;
        let band = service_band(outbound_dist, self.config.service_thresholds);

        let mut total_cost = 0.0;
        let mut breakdown = CostBreakdown::default();
        let mut band_units = ServiceLevels::default();
        let mut inbound_dist_sum = 0.0;
        let mut outbound_dist_sum = 0.0;
        let mut assigned_units = 0u64;

        for demand in demands {
            let Some(assigned) = demand.assigned_facility else {
                trace!(demand = %demand.id, "unassigned demand skipped");
                continue;
            };
            let Some(facility) = index.get(&assigned) else {
                debug!(demand = %demand.id, facility = %assigned, "dangling assignment skipped");
                continue;
            };
            // Out-of-range but finite coordinates are still priced.
            if !facility.location.is_finite() {
                warn!(
                    demand = %demand.id,
                    facility = %facility.id,
                    location = %facility.location,
                    "facility location is not finite, demand skipped"
                );
                continue;
            }

            let units = demand.quantity as f64;

            let inbound_dist = origin.distance_miles(facility.location);
            let inbound_cost = inbound_dist * self.inbound_rate * units;
            total_cost += inbound_cost;
            breakdown.inbound += inbound_cost;
            inbound_dist_sum += inbound_dist * units;

            let outbound_cost = outbound_dist * self.outbound_rate * units;
            total_cost += outbound_cost;
            breakdown.outbound += outbound_cost;
            outbound_dist_sum += outbound_dist * units;

            *band_units.get_mut(band) += units;
            if let Some(served) = utilization.get_mut(&facility.id) {
                *served += demand.quantity as u64;
            }
            assigned_units += demand.quantity as u64;
        }

        let service_levels = ServiceLevels {
            within_24h: band_units.within_24h / denominator * 100.0,
            within_48h: band_units.within_48h / denominator * 100.0,
            beyond_48h: band_units.beyond_48h / denominator * 100.0,
        };

        CostReport {
            total_cost,
            breakdown,
            service_levels,
            facility_utilization: utilization,
            avg_inbound_miles: inbound_dist_sum / denominator,
            avg_outbound_miles: outbound_dist_sum / denominator,
            total_demand_units,
            assigned_units,
        }
    }
}

impl Default for NetworkEvaluator {
    /// Default rates (TL 3.0, Parcel 0.5 $/mi) and default configuration.
    fn default() -> Self {
        let config = ModelConfig::default();
        Self {
            inbound_rate:  config.default_inbound_rate,
            outbound_rate: config.default_outbound_rate,
            config,
        }
    }
}

impl CostModel for NetworkEvaluator {
    #[inline]
    fn evaluate(&self, facilities: &[Facility], demands: &[Demand]) -> EvalResult<CostReport> {
        Ok(self.report(facilities, demands))
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Evaluate with the default model configuration.
///
/// Total over every well-formed input: empty facility or demand lists yield
/// a zero-cost report.  Fails only on an invalid rate table.
pub fn evaluate(
    facilities:      &[Facility],
    demands:         &[Demand],
    transport_costs: &TransportCostTable,
) -> EvalResult<CostReport> {
    let evaluator = NetworkEvaluator::new(transport_costs, ModelConfig::default())?;
    Ok(evaluator.report(facilities, demands))
}

/// Evaluate the full snapshot as a one-off simulation request.
///
/// Unlike [`evaluate`], refuses to run when there is nothing to simulate.
pub fn simulate(snapshot: &NetworkSnapshot) -> EvalResult<CostReport> {
    if snapshot.is_empty() {
        return Err(EvalError::EmptyNetwork);
    }
    let evaluator = NetworkEvaluator::from_snapshot(snapshot)?;
    let report = evaluator.report(snapshot.facilities(), snapshot.demands());
    info!(
        facilities = snapshot.facilities().len(),
        demands = snapshot.demands().len(),
        total_cost = report.total_cost,
        "simulation complete"
    );
    Ok(report)
}

fn service_band(outbound_miles: f64, thresholds: ServiceThresholds) -> ServiceBand {
    if outbound_miles <= thresholds.within_24h_miles {
        ServiceBand::Within24h
    } else if outbound_miles <= thresholds.within_48h_miles {
        ServiceBand::Within48h
    } else {
        ServiceBand::Beyond48h
    }
}
