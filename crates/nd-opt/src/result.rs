//! Progress events and the terminal optimization result.

use nd_core::FacilityId;
use nd_eval::CostReport;

/// Emitted after each evaluated combination.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Progress {
    /// Combinations evaluated so far, including this one.
    pub processed: u64,
    pub total:     u64,
    /// Cost of the combination just evaluated.
    pub cost:      f64,
    /// Incumbent cost after this combination.
    pub best_cost: f64,
    /// `true` when this combination became the new incumbent.
    pub improved:  bool,
}

impl Progress {
    /// Completion in percent.  Exactly `100.0` once `processed == total`.
    #[inline]
    pub fn percent(&self) -> f64 {
        self.processed as f64 / self.total as f64 * 100.0
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.processed == self.total
    }
}

/// The best facility subset found by a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationResult {
    /// Selected candidates, in candidate order.
    pub optimal_facilities:     Vec<FacilityId>,
    /// Display names of `optimal_facilities`, index-aligned.
    pub optimal_site_names:     Vec<String>,
    pub best_cost:              f64,
    /// Cost of the unmodified network (every candidate included).
    pub baseline_cost:          f64,
    /// `baseline_cost - best_cost`.  Negative when dropping candidates makes
    /// the network more expensive.
    pub cost_savings:           f64,
    pub combinations_evaluated: u64,
    /// Full report for the winning network.
    pub best_report:            CostReport,
}
