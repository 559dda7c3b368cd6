use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Error taxonomy shared by every layer of the engine.
///
/// `NonFinite` and `InvalidArg` correspond to spec §7's `InvalidInput`: a
/// pure function fed non-physical or non-finite data. Higher layers (the
/// solver) catch these and turn them into step rejections rather than
/// letting them escape to the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
