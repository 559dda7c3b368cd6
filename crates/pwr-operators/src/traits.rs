//! The two operator interfaces (spec §2.3, §4.3, §4.4).

use pwr_state::{SimulationState, StateRates};

use crate::error::OpResult;

/// A pure function from state to a `StateRates` contribution. Rate
/// operators are summed; the registry may evaluate them in parallel
/// (spec §5) as long as each produces a self-contained bag that is added
/// to the others, never mutating shared state.
pub trait RateOperator: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates>;
}

/// A pure function from state to a new, algebraically-closed state.
/// Constraint operators run in registration order, each consuming the
/// previous one's output (spec §4.4 "applied between stages and after
/// each accepted step, in fixed order").
pub trait ConstraintOperator: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, state: &SimulationState) -> OpResult<SimulationState>;
}
