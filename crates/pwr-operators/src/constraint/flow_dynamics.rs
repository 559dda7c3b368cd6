//! Quasi-static flow closure and pump/check-valve backflow clamps (spec
//! §4.4).

use pwr_core::units::constants::G0_MPS2;
use pwr_state::SimulationState;

use crate::error::OpResult;
use crate::hydraulics::{endpoint_pressure_pa, upstream_density_kg_per_m3};
use crate::traits::ConstraintOperator;

const RUNNING_PUMP_SPEED_THRESHOLD: f64 = 0.01;

pub struct FlowDynamicsConstraint;

impl ConstraintOperator for FlowDynamicsConstraint {
    fn name(&self) -> &str {
        "flow_dynamics"
    }

    fn apply(&self, state: &SimulationState) -> OpResult<SimulationState> {
        let mut next = state.clone();

        for i in 0..next.flow_connections.len() {
            let conn = next.flow_connections[i];
            if !conn.has_inertance() {
                let from = state
                    .flow_node(conn.from)
                    .ok_or(crate::error::OpError::MissingEntity { what: "flow connection endpoint" })?;
                let to = state
                    .flow_node(conn.to)
                    .ok_or(crate::error::OpError::MissingEntity { what: "flow connection endpoint" })?;

                let p_from = endpoint_pressure_pa(from, conn.from_elevation_m.unwrap_or(from.elevation_m));
                let p_to = endpoint_pressure_pa(to, conn.to_elevation_m.unwrap_or(to.elevation_m));

                let pump = state.pumps.iter().find(|p| p.flow_path == conn.id);
                let rho_avg = 0.5 * (upstream_density_kg_per_m3(from) + upstream_density_kg_per_m3(to));
                let delta_p_pump = pump
                    .map(|p| rho_avg * G0_MPS2 * p.rated_head_m * p.effective_speed)
                    .unwrap_or(0.0);
                let delta_p_gravity = -rho_avg * G0_MPS2 * conn.elevation_delta_m;

                let delta_p = (p_from - p_to) + delta_p_gravity + delta_p_pump;
                let area = conn.flow_area_m2.max(1e-9);
                let k = conn.resistance_k.max(1e-9);
                let magnitude = area * (2.0 * delta_p.abs() / (rho_avg.max(1e-6) * k)).sqrt();
                next.flow_connections[i].mass_flow_rate_kgps = delta_p.signum() * magnitude;
            }

            let conn = &mut next.flow_connections[i];
            let pump_forces_forward = state
                .pumps
                .iter()
                .any(|p| p.flow_path == conn.id && p.effective_speed > RUNNING_PUMP_SPEED_THRESHOLD);
            let check_valve_guarded = conn.flags.check_valve;
            if pump_forces_forward || check_valve_guarded {
                conn.mass_flow_rate_kgps = conn.mass_flow_rate_kgps.max(0.0);
            }
        }

        Ok(next)
    }
}
