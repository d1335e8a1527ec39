//! Flattened result rows written by export backends.

use nd_eval::CostReport;
use nd_opt::OptimizationResult;

/// One facility's line of a simulation-result export.  Report-level
/// columns repeat on every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow {
    /// `None` only on the single row written for a report with no
    /// facilities.
    pub facility_id:               Option<u32>,
    pub units_served:              Option<u64>,
    pub total_cost:                f64,
    pub avg_inbound_dist:          f64,
    pub avg_outbound_dist:         f64,
    pub total_demand_units:        u64,
    pub inbound_cost:              f64,
    pub outbound_cost:             f64,
    pub service_level_lt_24h_pct:  f64,
    pub service_level_lt_48h_pct:  f64,
    pub service_level_gte_48h_pct: f64,
}

/// One selected facility of an optimization-result export.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRow {
    /// 1-based position within the selected subset.
    pub rank:          u32,
    pub facility_id:   u32,
    pub site_name:     String,
    pub best_cost:     f64,
    pub baseline_cost: f64,
    pub cost_savings:  f64,
}

/// Flatten `report` into one row per facility, ascending by id.
pub fn report_rows(report: &CostReport) -> Vec<ReportRow> {
    let base = ReportRow {
        facility_id:               None,
        units_served:              None,
        total_cost:                report.total_cost,
        avg_inbound_dist:          report.avg_inbound_miles,
        avg_outbound_dist:         report.avg_outbound_miles,
        total_demand_units:        report.total_demand_units,
        inbound_cost:              report.breakdown.inbound,
        outbound_cost:             report.breakdown.outbound,
        service_level_lt_24h_pct:  report.service_levels.within_24h,
        service_level_lt_48h_pct:  report.service_levels.within_48h,
        service_level_gte_48h_pct: report.service_levels.beyond_48h,
    };

    if report.facility_utilization.is_empty() {
        return vec![base];
    }

    report
        .facility_utilization
        .iter()
        .map(|(id, &units)| ReportRow {
            facility_id: Some(id.0),
            units_served: Some(units),
            ..base
        })
        .collect()
}

/// One row per selected facility.
pub fn optimization_rows(result: &OptimizationResult) -> Vec<OptimizationRow> {
    result
        .optimal_facilities
        .iter()
        .zip(&result.optimal_site_names)
        .enumerate()
        .map(|(i, (id, name))| OptimizationRow {
            rank:          i as u32 + 1,
            facility_id:   id.0,
            site_name:     name.clone(),
            best_cost:     result.best_cost,
            baseline_cost: result.baseline_cost,
            cost_savings:  result.cost_savings,
        })
        .collect()
}
