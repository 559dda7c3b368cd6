//! Mass and energy transport along flow connections (spec §4.3).

use pwr_core::FlowNodeId;
use pwr_state::{FlowNode, SimulationState, StateRates};
use pwr_water::{Phase, WaterBackend};

use crate::error::{OpError, OpResult};
use crate::traits::RateOperator;

/// Bulk specific enthalpy h = u + P*v for a single-phase (or averaged)
/// control volume.
fn bulk_specific_enthalpy(node: &FlowNode) -> f64 {
    let specific_volume = node.volume_m3 / node.fluid.mass_kg.max(pwr_state::MASS_FLOOR_KG);
    node.fluid.specific_internal_energy() + node.fluid.pressure_pa * specific_volume
}

/// Whether a connection at `local_elevation_m` draws from the node's liquid
/// or vapor fraction, given the node's estimated liquid surface.
fn draws_liquid(node: &FlowNode, local_elevation_m: f64) -> bool {
    match node.height_m {
        Some(height) if height > 0.0 => {
            let surface = node.elevation_m + node.liquid_level_fraction() * height;
            local_elevation_m <= surface
        }
        // No height geometry configured: fall back to whichever phase
        // dominates the node's quality.
        _ => node.fluid.quality < 0.5,
    }
}

/// Specific enthalpy of the fluid an upstream node delivers into a
/// connection at `local_elevation_m` (spec §4.3 "phase of flow").
fn upstream_specific_enthalpy(node: &FlowNode, local_elevation_m: f64) -> f64 {
    if node.fluid.phase != Phase::TwoPhase {
        return bulk_specific_enthalpy(node);
    }
    let backend = WaterBackend::global();
    if draws_liquid(node, local_elevation_m) {
        backend.saturated_liquid_enthalpy_j_per_kg(node.fluid.temperature_k)
    } else {
        backend.saturated_vapor_enthalpy_j_per_kg(node.fluid.temperature_k)
    }
}

pub struct FluidFlowOperator;

impl RateOperator for FluidFlowOperator {
    fn name(&self) -> &str {
        "fluid_flow"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        for conn in &state.flow_connections {
            let mdot = conn.mass_flow_rate_kgps;
            if mdot == 0.0 {
                continue;
            }

            let (upstream_id, downstream_id, upstream_local_elev): (FlowNodeId, FlowNodeId, f64) =
                if mdot > 0.0 {
                    (conn.from, conn.to, conn.from_elevation_m.unwrap_or(0.0))
                } else {
                    (conn.to, conn.from, conn.to_elevation_m.unwrap_or(0.0))
                };

            let upstream = state
                .flow_node(upstream_id)
                .ok_or(OpError::MissingEntity { what: "flow connection upstream node" })?;

            let h = upstream_specific_enthalpy(upstream, upstream_local_elev);
            let m_abs = mdot.abs();

            rates.d_mass_dt[upstream_id.idx()] -= m_abs;
            rates.d_energy_dt[upstream_id.idx()] -= m_abs * h;

            rates.d_mass_dt[downstream_id.idx()] += m_abs;
            rates.d_energy_dt[downstream_id.idx()] += m_abs * h;
        }

        Ok(rates)
    }
}
