//! `nd-opt`: exhaustive facility-selection optimizer.
//!
//! # Search
//!
//! ```text
//! candidates = facilities tagged with request.candidate_kind
//! fixed      = every other facility (always in the network)
//! baseline   = cost(all facilities)
//! for combo in combinations(candidates, request.select_count):   // lexicographic
//!   ① cancellation check       : stop with OptError::Cancelled
//!   ② cost(fixed ∪ combo)      : CostModel::evaluate
//!   ③ strict improvement       : replace the incumbent (ties keep the earlier)
//!   ④ progress                 : processed / total × 100
//! result = incumbent, baseline, baseline − best
//! ```
//!
//! The search is exposed two ways:
//!
//! - [`OptimizationRun`]: an `Iterator` yielding one [`Progress`] per
//!   evaluated combination.  The caller owns the loop, so it decides when to
//!   stop; [`OptimizationRun::into_result`] returns the outcome once the
//!   iterator is exhausted.
//! - [`Optimizer::run`]: drives the iterator, feeding an
//!   [`OptimizationObserver`] and checking a [`CancelToken`] between
//!   combinations.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Adds `Optimizer::run_parallel` (Rayon, batched).       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nd_opt::{CancelToken, NoopObserver, OptimizeRequest, optimize};
//!
//! let request = OptimizeRequest::new(FacilityKind::DistributionCenter, 3);
//! let result = optimize(&snapshot, request, &mut NoopObserver, &CancelToken::new())?;
//! println!("saves {:.2}", result.cost_savings);
//! ```

pub mod cancel;
pub mod combinations;
pub mod error;
pub mod observer;
pub mod optimizer;
pub mod request;
pub mod result;
pub mod run;


pub use cancel::CancelToken;
pub use combinations::{Combinations, binomial};
pub use error::{OptError, OptResult};
pub use observer::{LogObserver, NoopObserver, OptimizationObserver};
pub use optimizer::{Optimizer, optimize};
pub use request::OptimizeRequest;
pub use result::{OptimizationResult, Progress};
pub use run::OptimizationRun;
