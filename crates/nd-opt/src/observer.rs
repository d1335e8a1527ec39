//! Optimization observer trait for progress reporting.

use nd_core::FacilityId;
use nd_eval::CostReport;
use tracing::{info, warn};

use crate::{OptError, OptimizationResult, Progress};

/// Callbacks invoked by [`Optimizer::run`][crate::Optimizer::run] at key
/// points of a search.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress bar feed
///
/// ```rust,ignore
/// struct Bar(ProgressBar);
///
/// impl OptimizationObserver for Bar {
///     fn on_progress(&mut self, p: &Progress) {
///         self.0.set_position(p.percent() as u64);
///     }
/// }
/// ```
pub trait OptimizationObserver {
    /// Called once, after the baseline is evaluated and before the first
    /// combination.
    fn on_start(&mut self, _total: u64, _baseline: &CostReport) {}

    /// Called after every evaluated combination.  `percent()` never
    /// decreases within a run.
    fn on_progress(&mut self, _progress: &Progress) {}

    /// Called when a combination strictly beats the incumbent.
    fn on_improvement(&mut self, _cost: f64, _subset: &[FacilityId]) {}

    /// Called once with the terminal result of a completed run.
    fn on_finish(&mut self, _result: &OptimizationResult) {}

    /// Called when a started run ends without a result (cancellation or
    /// evaluation failure).
    fn on_abort(&mut self, _error: &OptError) {}
}

/// An [`OptimizationObserver`] that does nothing.
pub struct NoopObserver;

impl OptimizationObserver for NoopObserver {}

/// Logs progress through `tracing` every `step_percent` percent, plus every
/// improvement and the final outcome.
pub struct LogObserver {
    step_percent: f64,
    next_report:  f64,
}

impl LogObserver {
    pub fn new(step_percent: f64) -> Self {
        let step_percent = step_percent.max(0.01);
        Self { step_percent, next_report: step_percent }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl OptimizationObserver for LogObserver {
    fn on_start(&mut self, total: u64, baseline: &CostReport) {
        self.next_report = self.step_percent;
        info!(combinations = total, baseline_cost = baseline.total_cost, "optimization started");
    }

    fn on_progress(&mut self, progress: &Progress) {
        let pct = progress.percent();
        if pct >= self.next_report || progress.is_last() {
            info!(
                percent = format_args!("{pct:.1}"),
                processed = progress.processed,
                best_cost = progress.best_cost,
                "optimization progress"
            );
            self.next_report = ((pct / self.step_percent).floor() + 1.0) * self.step_percent;
        }
    }

    fn on_improvement(&mut self, cost: f64, subset: &[FacilityId]) {
        info!(cost, facilities = ?subset, "new best network");
    }

    fn on_finish(&mut self, result: &OptimizationResult) {
        info!(
            best_cost = result.best_cost,
            baseline_cost = result.baseline_cost,
            savings = result.cost_savings,
            "optimization finished"
        );
    }

    fn on_abort(&mut self, error: &OptError) {
        warn!(%error, "optimization aborted");
    }
}
