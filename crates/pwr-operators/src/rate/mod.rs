//! Rate operators: pure `state -> StateRates` contributions (spec §4.3).

pub mod conduction;
pub mod convection;
pub mod flow_momentum;
pub mod fluid_flow;
pub mod heat_generation;
pub mod neutronics;
pub mod oxidation;
pub mod pump_speed;
pub mod turbine_condenser;

pub use conduction::ConductionOperator;
pub use convection::ConvectionOperator;
pub use flow_momentum::FlowMomentumOperator;
pub use fluid_flow::FluidFlowOperator;
pub use heat_generation::HeatGenerationOperator;
pub use neutronics::NeutronicsOperator;
pub use oxidation::OxidationOperator;
pub use pump_speed::PumpSpeedOperator;
pub use turbine_condenser::TurbineCondenserOperator;
