//! Water-backend errors.

use thiserror::Error;

pub type WaterResult<T> = Result<T, WaterError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaterError {
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Failed to parse static water-property data: {message}")]
    DataLoad { message: String },

    #[error("Two-phase quality search failed to converge for u={u}, v={v}")]
    ConvergenceFailed { u: f64, v: f64 },
}

impl From<WaterError> for pwr_core::CoreError {
    fn from(err: WaterError) -> Self {
        match err {
            WaterError::NonPhysical { what, value } => {
                pwr_core::CoreError::NonFinite { what, value }
            }
            WaterError::OutOfRange { what, .. } => pwr_core::CoreError::InvalidArg { what },
            WaterError::InvalidArg { what } => pwr_core::CoreError::InvalidArg { what },
            WaterError::DataLoad { .. } => pwr_core::CoreError::Invariant {
                what: "water property data failed to load",
            },
            WaterError::ConvergenceFailed { .. } => pwr_core::CoreError::Invariant {
                what: "two-phase quality search did not converge",
            },
        }
    }
}
