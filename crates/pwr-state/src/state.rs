//! `SimulationState`: the value-type aggregate describing the whole plant
//! at one instant (spec §3, §4.2).

use pwr_core::{CompId, ConnId, FlowNodeId, Id, ThermalNodeId};
use serde::{Deserialize, Serialize};

use crate::components::{BurstState, CheckValveState, PumpState, ValveState};
use crate::connections::{ConvectionConnection, FlowConnection, ThermalConnection};
use crate::events::EventMailbox;
use crate::flow_node::{FlowNode, MASS_FLOOR_KG};
use crate::neutronics::NeutronicsState;
use crate::rates::StateRates;
use crate::thermal_node::ThermalNode;

/// The simulation state exclusively owns all node, connection, and
/// component records (spec §3 "Ownership"). Operators receive read-only
/// views and return either derivatives or a new owned state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub time_s: f64,

    pub thermal_nodes: Vec<ThermalNode>,
    #[serde(skip)]
    pub flow_nodes: Vec<FlowNode>,
    pub thermal_connections: Vec<ThermalConnection>,
    pub convection_connections: Vec<ConvectionConnection>,
    pub flow_connections: Vec<FlowConnection>,

    pub neutronics: Option<NeutronicsState>,

    pub pumps: Vec<PumpState>,
    pub valves: Vec<ValveState>,
    pub check_valves: Vec<CheckValveState>,
    pub bursts: Vec<BurstState>,

    #[serde(skip)]
    pub events: EventMailbox,
}

impl SimulationState {
    pub fn new() -> Self {
        Self {
            time_s: 0.0,
            thermal_nodes: Vec::new(),
            flow_nodes: Vec::new(),
            thermal_connections: Vec::new(),
            convection_connections: Vec::new(),
            flow_connections: Vec::new(),
            neutronics: None,
            pumps: Vec::new(),
            valves: Vec::new(),
            check_valves: Vec::new(),
            bursts: Vec::new(),
            events: EventMailbox::default(),
        }
    }

    pub fn add_thermal_node(&mut self, mut node: ThermalNode) -> ThermalNodeId {
        let id = Id::from_index(self.thermal_nodes.len() as u32);
        node.id = id;
        self.thermal_nodes.push(node);
        id
    }

    pub fn add_flow_node(&mut self, mut node: FlowNode) -> FlowNodeId {
        let id = Id::from_index(self.flow_nodes.len() as u32);
        node.id = id;
        self.flow_nodes.push(node);
        id
    }

    pub fn add_flow_connection(&mut self, mut conn: FlowConnection) -> ConnId {
        let id = Id::from_index(self.flow_connections.len() as u32);
        conn.id = id;
        self.flow_connections.push(conn);
        id
    }

    pub fn add_pump(&mut self, mut pump: PumpState) -> CompId {
        let id = Id::from_index(self.pumps.len() as u32);
        pump.id = id;
        self.pumps.push(pump);
        id
    }

    pub fn thermal_node(&self, id: ThermalNodeId) -> Option<&ThermalNode> {
        self.thermal_nodes.get(id.idx())
    }

    pub fn flow_node(&self, id: FlowNodeId) -> Option<&FlowNode> {
        self.flow_nodes.get(id.idx())
    }

    pub fn flow_connection(&self, id: ConnId) -> Option<&FlowConnection> {
        self.flow_connections.get(id.idx())
    }

    pub fn total_fluid_mass_kg(&self) -> f64 {
        self.flow_nodes.iter().map(|n| n.fluid.mass_kg).sum()
    }

    pub fn total_fluid_energy_j(&self) -> f64 {
        self.flow_nodes
            .iter()
            .map(|n| n.fluid.internal_energy_j)
            .sum()
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

/// `cloneSimulationState` (spec §4.2): a deep, independent copy. `Clone` on
/// every field already gives us this; the function exists as the named
/// entry point the spec calls out explicitly.
pub fn clone_simulation_state(state: &SimulationState) -> SimulationState {
    state.clone()
}

/// `applyRatesToState` (spec §4.2): `y <- y + dt*y_dot`, clamping pump
/// `effectiveSpeed` to `[0, target speed]` and leaving derived fluid
/// fields (T, P, phase, x) untouched for the next constraint pass.
pub fn apply_rates_to_state(state: &SimulationState, rates: &StateRates, dt: f64) -> SimulationState {
    let mut next = state.clone();
    next.time_s += dt;

    for (i, node) in next.flow_nodes.iter_mut().enumerate() {
        node.fluid.mass_kg = (node.fluid.mass_kg + dt * rates.d_mass_dt[i]).max(MASS_FLOOR_KG);
        node.fluid.internal_energy_j =
            (node.fluid.internal_energy_j + dt * rates.d_energy_dt[i]).max(0.0);
    }

    for (i, conn) in next.flow_connections.iter_mut().enumerate() {
        if conn.has_inertance() {
            conn.mass_flow_rate_kgps += dt * rates.d_mdot_dt[i];
        }
    }

    for (i, node) in next.thermal_nodes.iter_mut().enumerate() {
        node.temperature_k += dt * rates.d_temperature_dt[i];
    }

    for (i, pump) in next.pumps.iter_mut().enumerate() {
        let updated = pump.effective_speed + dt * rates.d_effective_speed_dt[i];
        pump.effective_speed = updated.clamp(0.0, pump.target_speed.max(0.0));
    }

    if let Some(n) = next.neutronics.as_mut() {
        n.power_w = (n.power_w + dt * rates.d_power_dt).max(0.0);
        n.precursor_concentration =
            (n.precursor_concentration + dt * rates.d_precursor_dt).max(0.0);
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::FlowConnectionFlags;
    use crate::flow_node::FluidState;
    use pwr_water::Phase;

    fn toy_flow_node() -> FlowNode {
        FlowNode {
            id: Id::from_index(0),
            label: "toy".into(),
            fluid: FluidState {
                mass_kg: 10.0,
                internal_energy_j: 1000.0,
                temperature_k: 300.0,
                pressure_pa: 101_325.0,
                phase: Phase::Liquid,
                quality: 0.0,
                ncg: None,
            },
            volume_m3: 0.01,
            hydraulic_diameter_m: 0.05,
            flow_area_m2: 0.002,
            elevation_m: 0.0,
            height_m: None,
            heat_sink: None,
            container: None,
        }
    }

    #[test]
    fn add_flow_node_assigns_sequential_ids() {
        let mut state = SimulationState::new();
        let id0 = state.add_flow_node(toy_flow_node());
        let id1 = state.add_flow_node(toy_flow_node());
        assert_eq!(id0.index(), 0);
        assert_eq!(id1.index(), 1);
    }

    #[test]
    fn apply_rates_integrates_mass_and_energy() {
        let mut state = SimulationState::new();
        state.add_flow_node(toy_flow_node());
        let mut rates = StateRates::zeros_like(&state);
        rates.d_mass_dt[0] = 1.0;
        rates.d_energy_dt[0] = 100.0;
        let next = apply_rates_to_state(&state, &rates, 2.0);
        assert!((next.flow_nodes[0].fluid.mass_kg - 12.0).abs() < 1e-9);
        assert!((next.flow_nodes[0].fluid.internal_energy_j - 1200.0).abs() < 1e-9);
        assert!((next.time_s - 2.0).abs() < 1e-12);
    }

    #[test]
    fn apply_rates_enforces_mass_floor() {
        let mut state = SimulationState::new();
        state.add_flow_node(toy_flow_node());
        let mut rates = StateRates::zeros_like(&state);
        rates.d_mass_dt[0] = -1000.0;
        let next = apply_rates_to_state(&state, &rates, 1.0);
        assert!(next.flow_nodes[0].fluid.mass_kg >= MASS_FLOOR_KG);
    }

    #[test]
    fn clone_simulation_state_is_independent() {
        let mut state = SimulationState::new();
        state.add_flow_node(toy_flow_node());
        let cloned = clone_simulation_state(&state);
        let mut cloned = cloned;
        cloned.flow_nodes[0].fluid.mass_kg = 999.0;
        assert_ne!(state.flow_nodes[0].fluid.mass_kg, cloned.flow_nodes[0].fluid.mass_kg);
    }

    #[test]
    fn pump_effective_speed_clamped_to_target() {
        let mut state = SimulationState::new();
        state.add_pump(PumpState {
            id: Id::from_index(0),
            running: true,
            target_speed: 1.0,
            effective_speed: 0.9,
            rated_head_m: 50.0,
            rated_flow_kgps: 100.0,
            efficiency: 0.8,
            flow_path: Id::from_index(0),
            ramp_up_time_s: 5.0,
            coast_down_time_s: 10.0,
        });
        let mut rates = StateRates::zeros_like(&state);
        rates.d_effective_speed_dt[0] = 10.0;
        let next = apply_rates_to_state(&state, &rates, 1.0);
        assert_eq!(next.pumps[0].effective_speed, 1.0);
        let _ = FlowConnectionFlags::default();
    }
}
