//! The plant's value-type state model (spec §3, §4.2): thermal/fluid
//! nodes, static topology, neutronics, component setpoints, rate bags, and
//! the owning `SimulationState` aggregate.

pub mod components;
pub mod connections;
pub mod error;
pub mod events;
pub mod flow_node;
pub mod neutronics;
pub mod rates;
pub mod state;
pub mod thermal_node;

pub use components::{BurstState, CheckValveState, PumpState, ValveState};
pub use connections::{ConvectionConnection, FlowConnection, FlowConnectionFlags, ThermalConnection};
pub use error::{StateError, StateResult};
pub use events::{EventMailbox, SimEvent};
pub use flow_node::{FlowNode, FluidState, HeatSinkProperties, MASS_FLOOR_KG};
pub use neutronics::NeutronicsState;
pub use rates::StateRates;
pub use state::{apply_rates_to_state, clone_simulation_state, SimulationState};
pub use thermal_node::{OxidationRecord, ThermalNode};
