//! Operator errors (spec §7's `InvalidInput` / `StageFailure` taxonomy).

use thiserror::Error;

pub type OpResult<T> = Result<T, OpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Referenced entity not found: {what}")]
    MissingEntity { what: &'static str },

    #[error("Stage failure: {what}")]
    StageFailure { what: &'static str },
}

impl From<pwr_water::WaterError> for OpError {
    fn from(e: pwr_water::WaterError) -> Self {
        OpError::NonPhysical {
            what: "water backend closure failed",
            value: match e {
                pwr_water::WaterError::NonPhysical { value, .. } => value,
                pwr_water::WaterError::OutOfRange { value, .. } => value,
                pwr_water::WaterError::ConvergenceFailed { u, .. } => u,
                _ => f64::NAN,
            },
        }
    }
}

impl From<pwr_core::CoreError> for OpError {
    fn from(e: pwr_core::CoreError) -> Self {
        match e {
            pwr_core::CoreError::NonFinite { what, value } => OpError::NonPhysical { what, value },
            pwr_core::CoreError::InvalidArg { what } => OpError::InvalidArg { what },
            pwr_core::CoreError::IndexOob { what, .. } => OpError::MissingEntity { what },
            pwr_core::CoreError::Invariant { what } => OpError::StageFailure { what },
        }
    }
}
