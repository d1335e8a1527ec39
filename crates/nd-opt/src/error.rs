use nd_core::FacilityKind;
use nd_eval::EvalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptError {
    #[error("not enough {kind} candidates: {available} available, {requested} requested")]
    InsufficientCandidates {
        kind:      FacilityKind,
        available: usize,
        requested: usize,
    },

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvalError),

    #[error("optimization cancelled after {processed} of {total} combinations")]
    Cancelled { processed: u64, total: u64 },

    #[error("invalid optimization request: {0}")]
    InvalidRequest(String),

    #[error("C({candidates}, {select}) combinations do not fit in a u64 counter")]
    SearchSpaceTooLarge { candidates: usize, select: usize },

    #[error("optimization stopped after {processed} of {total} combinations")]
    Incomplete { processed: u64, total: u64 },
}

pub type OptResult<T> = Result<T, OptError>;
