//! `nd-eval`: network cost and service-level evaluation.
//!
//! # Cost model
//!
//! ```text
//! for each demand d with an assigned facility f present in the network:
//!   inbound  = haversine(origin, f) × rate(TL)     × d.quantity
//!   outbound = outbound_distance    × rate(Parcel) × d.quantity
//!   band     = service band of outbound_distance (<24h / <48h / >=48h)
//! ```
//!
//! Percentages and averages divide by the quantity of *all* demand, costed
//! or not; the denominator is 1 when there is no demand at all.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`evaluator`] | `CostModel` trait, `NetworkEvaluator`, `evaluate`, `simulate` |
//! | [`report`]    | `CostReport`, `CostBreakdown`, `ServiceLevels`, `ServiceBand` |
//! | [`error`]     | `EvalError`, `EvalResult<T>`                            |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash facility index instead of SipHash.               |
//! | `serde`   | `Serialize`/`Deserialize` on report types.              |

pub mod error;
pub mod evaluator;
pub mod report;


pub use error::{EvalError, EvalResult};
pub use evaluator::{CostModel, NetworkEvaluator, evaluate, simulate};
pub use report::{CostBreakdown, CostReport, ServiceBand, ServiceLevels};
