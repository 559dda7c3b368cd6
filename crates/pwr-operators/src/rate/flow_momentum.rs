//! Momentum balance on inertance-carrying flow connections (spec §4.3).
//!
//! Connections without inertance are quasi-static and get their
//! steady-state flow written directly by
//! [`crate::constraint::flow_dynamics::FlowDynamicsConstraint`] instead of
//! being integrated here; `apply_rates_to_state` only consumes `d_mdot_dt`
//! for connections where `has_inertance()` is true, so this operator
//! leaves the rest at their zero default.

use pwr_core::units::constants::G0_MPS2;
use pwr_core::ConnId;
use pwr_state::{SimulationState, StateRates};

use crate::error::{OpError, OpResult};
use crate::hydraulics::{endpoint_pressure_pa, upstream_density_kg_per_m3};
use crate::traits::RateOperator;

const VALVE_CLOSED_POSITION: f64 = 0.01;
const VALVE_DECAY_TIME_CONSTANT_S: f64 = 0.1;

fn pump_on_connection(state: &SimulationState, conn_id: ConnId) -> Option<&pwr_state::PumpState> {
    state.pumps.iter().find(|p| p.flow_path == conn_id)
}

fn valve_on_connection(state: &SimulationState, conn_id: ConnId) -> Option<&pwr_state::ValveState> {
    state.valves.iter().find(|v| v.flow_path == conn_id)
}

fn check_valve_on_connection(
    state: &SimulationState,
    conn_id: ConnId,
) -> Option<&pwr_state::CheckValveState> {
    state.check_valves.iter().find(|c| c.flow_path == conn_id)
}

pub struct FlowMomentumOperator;

impl RateOperator for FlowMomentumOperator {
    fn name(&self) -> &str {
        "flow_momentum"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        for conn in &state.flow_connections {
            if !conn.has_inertance() {
                continue;
            }

            let mdot = conn.mass_flow_rate_kgps;

            if let Some(valve) = valve_on_connection(state, conn.id) {
                if valve.position < VALVE_CLOSED_POSITION {
                    rates.d_mdot_dt[conn.id.idx()] = -mdot / VALVE_DECAY_TIME_CONSTANT_S;
                    continue;
                }
            }

            let from = state
                .flow_node(conn.from)
                .ok_or(OpError::MissingEntity { what: "flow connection endpoint" })?;
            let to = state
                .flow_node(conn.to)
                .ok_or(OpError::MissingEntity { what: "flow connection endpoint" })?;

            let p_from = endpoint_pressure_pa(from, conn.from_elevation_m.unwrap_or(from.elevation_m));
            let p_to = endpoint_pressure_pa(to, conn.to_elevation_m.unwrap_or(to.elevation_m));
            let delta_p_driving = p_from - p_to;

            let upstream = if mdot >= 0.0 { from } else { to };
            let rho_upstream = upstream_density_kg_per_m3(upstream);

            if let Some(check_valve) = check_valve_on_connection(state, conn.id) {
                if delta_p_driving.abs() < check_valve.cracking_pressure_pa {
                    rates.d_mdot_dt[conn.id.idx()] = -mdot / VALVE_DECAY_TIME_CONSTANT_S;
                    continue;
                }
            }

            let delta_p_gravity = -rho_upstream * G0_MPS2 * conn.elevation_delta_m;

            let pump = pump_on_connection(state, conn.id);
            let delta_p_pump = pump
                .map(|p| rho_upstream * G0_MPS2 * p.rated_head_m * p.effective_speed)
                .unwrap_or(0.0);

            if let Some(p) = pump {
                if p.running && mdot <= 0.0 && (delta_p_driving + delta_p_gravity + delta_p_pump) < 0.0 {
                    rates.d_mdot_dt[conn.id.idx()] = 0.0;
                    continue;
                }
            }

            let area = conn.flow_area_m2.max(1e-9);
            let delta_p_friction =
                conn.resistance_k * mdot * mdot.abs() / (2.0 * rho_upstream * area * area);

            let net = delta_p_driving + delta_p_gravity + delta_p_pump - delta_p_friction;
            rates.d_mdot_dt[conn.id.idx()] = area * net / (rho_upstream * conn.length_m.max(1e-6));
        }

        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::{FlowConnection, FlowConnectionFlags, FluidState, FlowNode};
    use pwr_water::Phase;

    fn node(p: f64) -> FlowNode {
        FlowNode {
            id: Id::from_index(0),
            label: "n".into(),
            fluid: FluidState {
                mass_kg: 100.0,
                internal_energy_j: 1.0e8,
                temperature_k: 560.0,
                pressure_pa: p,
                phase: Phase::Liquid,
                quality: 0.0,
                ncg: None,
            },
            volume_m3: 0.5,
            hydraulic_diameter_m: 0.1,
            flow_area_m2: 0.01,
            elevation_m: 0.0,
            height_m: None,
            heat_sink: None,
            container: None,
        }
    }

    #[test]
    fn higher_pressure_drives_positive_acceleration() {
        let mut state = SimulationState::new();
        let a = state.add_flow_node(node(2.0e6));
        let b = state.add_flow_node(node(1.0e6));
        let conn = FlowConnection {
            id: Id::from_index(0),
            from: a,
            to: b,
            flow_area_m2: 0.01,
            hydraulic_diameter_m: 0.1,
            length_m: 1.0,
            elevation_delta_m: 0.0,
            from_elevation_m: None,
            to_elevation_m: None,
            resistance_k: 1.0,
            mass_flow_rate_kgps: 0.0,
            flags: FlowConnectionFlags::default(),
        };
        state.add_flow_connection(conn);
        let rates = FlowMomentumOperator.evaluate(&state).unwrap();
        assert!(rates.d_mdot_dt[0] > 0.0);
    }

    #[test]
    fn closed_valve_decays_flow() {
        let mut state = SimulationState::new();
        let a = state.add_flow_node(node(1.0e6));
        let b = state.add_flow_node(node(1.0e6));
        let conn_id = state.add_flow_connection(FlowConnection {
            id: Id::from_index(0),
            from: a,
            to: b,
            flow_area_m2: 0.01,
            hydraulic_diameter_m: 0.1,
            length_m: 1.0,
            elevation_delta_m: 0.0,
            from_elevation_m: None,
            to_elevation_m: None,
            resistance_k: 1.0,
            mass_flow_rate_kgps: 20.0,
            flags: FlowConnectionFlags::default(),
        });
        state.valves.push(pwr_state::ValveState {
            id: Id::from_index(0),
            position: 0.0,
            fail_position: 0.0,
            flow_path: conn_id,
        });
        let rates = FlowMomentumOperator.evaluate(&state).unwrap();
        assert!(rates.d_mdot_dt[0] < 0.0);
    }
}
