//! `OptimizationRun`: one exhaustive search, stepped one combination at a
//! time.

use nd_core::{Demand, Facility, FacilityId};
use nd_eval::{CostModel, CostReport};
use tracing::debug;

use crate::{Combinations, OptError, OptResult, OptimizationResult, Progress};

/// Best combination seen so far.
struct Incumbent {
    cost:   f64,
    combo:  Vec<usize>,
    report: CostReport,
}

/// An in-progress search over `C(candidates, k)` facility subsets.
///
/// Each call to [`next`][Iterator::next] evaluates exactly one combination
/// and yields its [`Progress`].  The iterator ends after the last
/// combination or right after the first evaluation error; it never yields
/// past an error.  Create via [`Optimizer::start`][crate::Optimizer::start].
///
/// ```rust,ignore
/// let mut run = optimizer.start(&facilities, &demands)?;
/// for step in run.by_ref() {
///     let progress = step?;
///     println!("{:.1}%", progress.percent());
/// }
/// let result = run.into_result()?;
/// ```
pub struct OptimizationRun<'a, M: CostModel> {
    model:      &'a M,
    demands:    &'a [Demand],
    candidates: Vec<&'a Facility>,
    /// Fixed facilities followed by the current combination's candidates.
    network:    Vec<Facility>,
    fixed_len:  usize,
    combos:     Combinations,
    total:      u64,
    processed:  u64,
    baseline:   CostReport,
    incumbent:  Option<Incumbent>,
    failed:     bool,
}

impl<'a, M: CostModel> OptimizationRun<'a, M> {
    pub(crate) fn new(
        model:      &'a M,
        demands:    &'a [Demand],
        fixed:      Vec<&'a Facility>,
        candidates: Vec<&'a Facility>,
        select:     usize,
        total:      u64,
        baseline:   CostReport,
    ) -> Self {
        let mut network = Vec::with_capacity(fixed.len() + select);
        network.extend(fixed.into_iter().cloned());
        let fixed_len = network.len();
        let combos = Combinations::new(candidates.len(), select);

        Self {
            model,
            demands,
            candidates,
            network,
            fixed_len,
            combos,
            total,
            processed: 0,
            baseline,
            incumbent: None,
            failed: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Number of combinations the run will evaluate.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Report for the full, unmodified facility list.
    pub fn baseline(&self) -> &CostReport {
        &self.baseline
    }

    pub fn best_cost(&self) -> Option<f64> {
        self.incumbent.as_ref().map(|inc| inc.cost)
    }

    /// Ids of the incumbent subset, in candidate order.
    pub fn best_subset(&self) -> Vec<FacilityId> {
        self.incumbent
            .as_ref()
            .map(|inc| inc.combo.iter().map(|&i| self.candidates[i].id).collect())
            .unwrap_or_default()
    }

    /// `true` once every combination has been evaluated.
    pub fn is_complete(&self) -> bool {
        !self.failed && self.processed == self.total
    }

    /// Consume the run and build the terminal result.
    ///
    /// Fails with [`OptError::Incomplete`] unless every combination was
    /// evaluated: a run abandoned early, or stopped by an evaluation error,
    /// has no result.
    pub fn into_result(self) -> OptResult<OptimizationResult> {
        let incomplete = OptError::Incomplete { processed: self.processed, total: self.total };
        if !self.is_complete() {
            return Err(incomplete);
        }
        let Some(best) = self.incumbent else {
            return Err(incomplete);
        };

        let chosen: Vec<&Facility> = best.combo.iter().map(|&i| self.candidates[i]).collect();
        let baseline_cost = self.baseline.total_cost;

        Ok(OptimizationResult {
            optimal_facilities:     chosen.iter().map(|f| f.id).collect(),
            optimal_site_names:     chosen.iter().map(|f| f.name.clone()).collect(),
            best_cost:              best.cost,
            baseline_cost,
            cost_savings:           baseline_cost - best.cost,
            combinations_evaluated: self.processed,
            best_report:            best.report,
        })
    }

    // ── Stepping internals (shared with the parallel driver) ──────────────

    pub(crate) fn next_combination(&mut self) -> Option<Vec<usize>> {
        if self.failed {
            return None;
        }
        self.combos.next()
    }

    /// Build a fresh trial network for `combo`.
    #[cfg(feature = "parallel")]
    pub(crate) fn trial_network(&self, combo: &[usize]) -> Vec<Facility> {
        let mut network = Vec::with_capacity(self.fixed_len + combo.len());
        network.extend_from_slice(&self.network[..self.fixed_len]);
        network.extend(combo.iter().map(|&i| self.candidates[i].clone()));
        network
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn model(&self) -> &'a M {
        self.model
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn demands(&self) -> &'a [Demand] {
        self.demands
    }

    pub(crate) fn fail(&mut self) {
        self.failed = true;
    }

    /// Fold one evaluated combination into the incumbent and count it.
    pub(crate) fn record(&mut self, combo: Vec<usize>, report: CostReport) -> Progress {
        let cost = report.total_cost;
        let improved = self.incumbent.as_ref().is_none_or(|inc| cost < inc.cost);
        if improved {
            debug!(cost, combination = self.processed, "new incumbent");
            self.incumbent = Some(Incumbent { cost, combo, report });
        }
        self.processed += 1;

        Progress {
            processed: self.processed,
            total:     self.total,
            cost,
            best_cost: self.incumbent.as_ref().map_or(cost, |inc| inc.cost),
            improved,
        }
    }
}

impl<M: CostModel> Iterator for OptimizationRun<'_, M> {
    type Item = OptResult<Progress>;

    fn next(&mut self) -> Option<Self::Item> {
        let combo = self.next_combination()?;

        // Reuse the network buffer: fixed prefix stays, candidates swap out.
        self.network.truncate(self.fixed_len);
        self.network.extend(combo.iter().map(|&i| self.candidates[i].clone()));

        match self.model.evaluate(&self.network, self.demands) {
            Ok(report) => Some(Ok(self.record(combo, report))),
            Err(e) => {
                self.fail();
                Some(Err(OptError::Evaluation(e)))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = usize::try_from(self.total - self.processed).ok();
        (0, remaining)
    }
}
