//! The `Optimizer` and its run drivers.

use nd_core::{Demand, Facility, NetworkSnapshot};
use nd_eval::{CostModel, NetworkEvaluator};
use tracing::debug;

use crate::{
    CancelToken, OptError, OptResult, OptimizationObserver, OptimizationResult, OptimizationRun,
    OptimizeRequest, Progress, binomial,
};

/// Exhaustive facility-subset search over a [`CostModel`].
///
/// An `Optimizer` holds no run state: each call to [`start`][Self::start] or
/// [`run`][Self::run] borrows the inputs for that run only, so one optimizer
/// can serve several runs, concurrently or not.
pub struct Optimizer<M: CostModel = NetworkEvaluator> {
    model:      M,
    request:    OptimizeRequest,
    #[cfg(feature = "parallel")]
    batch_size: usize,
}

impl Optimizer<NetworkEvaluator> {
    /// Optimizer priced with the rates and configuration of `snapshot`.
    pub fn for_snapshot(snapshot: &NetworkSnapshot, request: OptimizeRequest) -> OptResult<Self> {
        Ok(Self::new(NetworkEvaluator::from_snapshot(snapshot)?, request))
    }
}

impl<M: CostModel> Optimizer<M> {
    pub fn new(model: M, request: OptimizeRequest) -> Self {
        Self {
            model,
            request,
            #[cfg(feature = "parallel")]
            batch_size: 256,
        }
    }

    /// Combinations evaluated per Rayon batch.  Cancellation is checked
    /// between batches.
    #[cfg(feature = "parallel")]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn request(&self) -> &OptimizeRequest {
        &self.request
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Validate the request, evaluate the baseline and return a run ready to
    /// be stepped.
    ///
    /// Fails before any evaluation when there are fewer candidates than the
    /// request selects.
    pub fn start<'a>(
        &'a self,
        facilities: &'a [Facility],
        demands:    &'a [Demand],
    ) -> OptResult<OptimizationRun<'a, M>> {
        self.request.validate()?;
        let kind = self.request.candidate_kind;
        let select = self.request.select_count;

        let (candidates, fixed): (Vec<&Facility>, Vec<&Facility>) =
            facilities.iter().partition(|f| f.has_kind(kind));

        if candidates.len() < select {
            return Err(OptError::InsufficientCandidates {
                kind,
                available: candidates.len(),
                requested: select,
            });
        }

        let total = binomial(candidates.len(), select).ok_or(OptError::SearchSpaceTooLarge {
            candidates: candidates.len(),
            select,
        })?;

        let baseline = self.model.evaluate(facilities, demands)?;
        debug!(
            candidates = candidates.len(),
            fixed = fixed.len(),
            select,
            total,
            baseline_cost = baseline.total_cost,
            "search space prepared"
        );

        Ok(OptimizationRun::new(&self.model, demands, fixed, candidates, select, total, baseline))
    }

    /// Run the search to completion, reporting to `observer` and stopping
    /// at the first check after `cancel` is set.
    pub fn run<O: OptimizationObserver>(
        &self,
        facilities: &[Facility],
        demands:    &[Demand],
        observer:   &mut O,
        cancel:     &CancelToken,
    ) -> OptResult<OptimizationResult> {
        let mut run = self.start(facilities, demands)?;
        observer.on_start(run.total(), run.baseline());

        loop {
            if run.is_complete() {
                break;
            }
            if cancel.is_cancelled() {
                return Err(abort(observer, cancelled(&run)));
            }
            let Some(step) = run.next() else {
                break;
            };
            match step {
                Ok(progress) => notify(observer, &run, &progress),
                Err(e) => return Err(abort(observer, e)),
            }
        }

        finish(observer, run)
    }

    /// Like [`run`][Self::run], but evaluates each batch of combinations on
    /// Rayon's thread pool.
    ///
    /// Incumbent updates and observer calls still happen sequentially in
    /// enumeration order, so the result is identical to [`run`][Self::run].
    #[cfg(feature = "parallel")]
    pub fn run_parallel<O: OptimizationObserver>(
        &self,
        facilities: &[Facility],
        demands:    &[Demand],
        observer:   &mut O,
        cancel:     &CancelToken,
    ) -> OptResult<OptimizationResult> {
        use nd_eval::{CostReport, EvalResult};
        use rayon::prelude::*;

        let mut run = self.start(facilities, demands)?;
        observer.on_start(run.total(), run.baseline());

        loop {
            if run.is_complete() {
                break;
            }
            if cancel.is_cancelled() {
                return Err(abort(observer, cancelled(&run)));
            }

            let batch: Vec<Vec<usize>> =
                std::iter::from_fn(|| run.next_combination()).take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }

            let reports: Vec<EvalResult<CostReport>> = {
                let run = &run;
                batch
                    .par_iter()
                    .map(|combo| run.model().evaluate(&run.trial_network(combo), run.demands()))
                    .collect()
            };

            for (combo, report) in batch.into_iter().zip(reports) {
                match report {
                    Ok(report) => {
                        let progress = run.record(combo, report);
                        notify(observer, &run, &progress);
                    }
                    Err(e) => {
                        run.fail();
                        return Err(abort(observer, OptError::Evaluation(e)));
                    }
                }
            }
        }

        finish(observer, run)
    }
}

/// Optimize the network in `snapshot` with its own rates and configuration.
pub fn optimize<O: OptimizationObserver>(
    snapshot: &NetworkSnapshot,
    request:  OptimizeRequest,
    observer: &mut O,
    cancel:   &CancelToken,
) -> OptResult<OptimizationResult> {
    Optimizer::for_snapshot(snapshot, request)?.run(
        snapshot.facilities(),
        snapshot.demands(),
        observer,
        cancel,
    )
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn notify<M: CostModel, O: OptimizationObserver>(
    observer: &mut O,
    run:      &OptimizationRun<'_, M>,
    progress: &Progress,
) {
    if progress.improved {
        observer.on_improvement(progress.best_cost, &run.best_subset());
    }
    observer.on_progress(progress);
}

fn cancelled<M: CostModel>(run: &OptimizationRun<'_, M>) -> OptError {
    OptError::Cancelled { processed: run.processed(), total: run.total() }
}

fn abort<O: OptimizationObserver>(observer: &mut O, error: OptError) -> OptError {
    observer.on_abort(&error);
    error
}

fn finish<M: CostModel, O: OptimizationObserver>(
    observer: &mut O,
    run:      OptimizationRun<'_, M>,
) -> OptResult<OptimizationResult> {
    let result = run.into_result()?;
    observer.on_finish(&result);
    Ok(result)
}
