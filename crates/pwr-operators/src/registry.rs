//! Operators registered once, in dependency order (spec §2.3).

use rayon::prelude::*;
use tracing::debug;

use pwr_state::{SimulationState, StateRates};

use crate::error::OpResult;
use crate::traits::{ConstraintOperator, RateOperator};

#[derive(Default)]
pub struct OperatorRegistry {
    rate_ops: Vec<Box<dyn RateOperator>>,
    constraint_ops: Vec<Box<dyn ConstraintOperator>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_rate(&mut self, op: Box<dyn RateOperator>) -> &mut Self {
        self.rate_ops.push(op);
        self
    }

    pub fn register_constraint(&mut self, op: Box<dyn ConstraintOperator>) -> &mut Self {
        self.constraint_ops.push(op);
        self
    }

    /// Run every constraint operator in registration order, each consuming
    /// the previous one's output.
    pub fn apply_constraints(&self, state: &SimulationState) -> OpResult<SimulationState> {
        let mut current = state.clone();
        for op in &self.constraint_ops {
            current = op.apply(&current).map_err(|e| {
                debug!(operator = op.name(), error = %e, "constraint operator failed");
                e
            })?;
        }
        Ok(current)
    }

    /// Evaluate every rate operator and sum the results. Operators are
    /// pure and side-effect free on `state`, so evaluation order cannot
    /// change the sum (spec §5); independent domains run in parallel via
    /// rayon, and the reduction is the same elementwise `Add` the solver
    /// uses for stage-rate combination.
    pub fn evaluate_rates(&self, state: &SimulationState) -> OpResult<StateRates> {
        let zero = StateRates::zeros_like(state);
        self.rate_ops
            .par_iter()
            .map(|op| op.evaluate(state))
            .try_reduce(|| zero.clone(), |a, b| Ok(&a + &b))
    }

    pub fn rate_operator_names(&self) -> Vec<&str> {
        self.rate_ops.iter().map(|op| op.name()).collect()
    }

    pub fn constraint_operator_names(&self) -> Vec<&str> {
        self.constraint_ops.iter().map(|op| op.name()).collect()
    }
}
