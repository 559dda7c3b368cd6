//! Solver error taxonomy (spec §4.5, §7).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Step rejected after reaching minimum dt: {what}")]
    StepFailedAtMinDt { what: &'static str },

    #[error("Operator stage failed: {0}")]
    Operator(#[from] pwr_operators::OpError),
}

pub type SolverResult<T> = Result<T, SolverError>;
