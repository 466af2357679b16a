use dc_core::DcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} has {got} pallet types, warehouse has {expected}")]
    TypeCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] DcError),
}

pub type SimResult<T> = Result<T, SimError>;
