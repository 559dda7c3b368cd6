//! Facade-level errors (spec §7's propagation policy: everything the
//! solver can recover from stays a metric or an event; only an
//! irrecoverable rejection at `min_dt` escalates here).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("solver could not advance: {0}")]
    Solver(#[from] pwr_solver::SolverError),

    #[error("invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;
