//! The default operator set and registration order (spec §4.3, §4.4): the
//! concrete wiring a plant factory hands to [`crate::Simulation::new`].

use pwr_operators::constraint::{BurstCheck, FlowDynamicsConstraint, FluidStateConstraint};
use pwr_operators::rate::{
    ConductionOperator, ConvectionOperator, FlowMomentumOperator, FluidFlowOperator,
    HeatGenerationOperator, NeutronicsOperator, OxidationOperator, PumpSpeedOperator,
    TurbineCondenserOperator,
};
use pwr_operators::OperatorRegistry;

/// Builds the registry with every rate and constraint operator spec §4.3
/// and §4.4 name, in the order those sections enumerate them. Rate-
/// operator order has no effect on results (they are summed); constraint
/// order is load-bearing and matches §4.4 exactly: fluid state closure,
/// then quasi-static flow, then burst detection.
pub fn build_default_registry(pressure_model: pwr_core::PressureModel) -> OperatorRegistry {
    let mut registry = OperatorRegistry::new();

    registry
        .register_rate(Box::new(ConductionOperator))
        .register_rate(Box::new(ConvectionOperator))
        .register_rate(Box::new(HeatGenerationOperator))
        .register_rate(Box::new(NeutronicsOperator))
        .register_rate(Box::new(FluidFlowOperator))
        .register_rate(Box::new(FlowMomentumOperator))
        .register_rate(Box::new(PumpSpeedOperator))
        .register_rate(Box::new(TurbineCondenserOperator))
        .register_rate(Box::new(OxidationOperator));

    registry
        .register_constraint(Box::new(FluidStateConstraint::new(pressure_model)))
        .register_constraint(Box::new(FlowDynamicsConstraint))
        .register_constraint(Box::new(BurstCheck));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_registers_every_named_operator() {
        let registry = build_default_registry(pwr_core::PressureModel::Hybrid);
        assert_eq!(registry.rate_operator_names().len(), 9);
        assert_eq!(registry.constraint_operator_names().len(), 3);
        assert_eq!(registry.constraint_operator_names()[0], "fluid_state");
        assert_eq!(registry.constraint_operator_names()[2], "burst_check");
    }
}
