use nd_core::NdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// The rate table or model configuration cannot be evaluated.
    #[error("invalid cost model: {0}")]
    Model(#[from] NdError),

    /// A direct simulation request was made without facilities or demand.
    #[error("no facilities or demand points to simulate")]
    EmptyNetwork,
}

pub type EvalResult<T> = Result<T, EvalError>;
