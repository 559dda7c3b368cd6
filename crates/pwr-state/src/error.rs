//! Errors surfaced by state-layer helpers (arena lookups, invariant checks).

use thiserror::Error;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("Unknown id: {what} ({id})")]
    UnknownId { what: &'static str, id: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

impl From<StateError> for pwr_core::CoreError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::UnknownId { what, .. } => pwr_core::CoreError::InvalidArg { what },
            StateError::InvalidArg { what } => pwr_core::CoreError::InvalidArg { what },
            StateError::Invariant { what } => pwr_core::CoreError::Invariant { what },
        }
    }
}
