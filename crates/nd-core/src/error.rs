//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `NdError` as one variant
//! via `#[from]`, so validation failures surface unchanged through every
//! layer.

use thiserror::Error;

use crate::{FacilityId, TransportMode};

/// The top-level error type for `nd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum NdError {
    #[error("duplicate facility {0}")]
    DuplicateFacility(FacilityId),

    #[error("facility {0} has no category tag")]
    UntaggedFacility(FacilityId),

    #[error("invalid {mode} rate {rate}: must be finite and non-negative")]
    InvalidRate { mode: TransportMode, rate: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `nd-*` crates.
pub type NdResult<T> = Result<T, NdError>;
