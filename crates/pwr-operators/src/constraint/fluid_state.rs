//! Re-derive (T, P, phase, quality) from (mass, U, V) for every flow node
//! (spec §4.4).

use std::collections::VecDeque;

use tracing::warn;

use pwr_core::units::constants::G0_MPS2;
use pwr_core::PressureModel;
use pwr_state::{FlowNode, SimulationState};
use pwr_water::{Phase, WaterBackend};

use crate::error::OpResult;
use crate::traits::ConstraintOperator;

const P_MIN_PA: f64 = 1.0e3;

pub struct FluidStateConstraint {
    pub pressure_model: PressureModel,
}

impl FluidStateConstraint {
    pub fn new(pressure_model: PressureModel) -> Self {
        Self { pressure_model }
    }
}

/// Multi-source BFS over the flow-connection graph from every node the
/// water backend places in the two-phase or vapor region, recording the
/// nearest such anchor's pressure and elevation for every liquid node
/// (spec §4.4 "a base pressure propagated...from any adjacent two-phase
/// or vapor node").
fn propagate_base_pressure(
    nodes: &[FlowNode],
    connections: &[pwr_state::FlowConnection],
) -> Vec<Option<(f64, f64)>> {
    let mut base = vec![None; nodes.len()];
    let mut visited = vec![false; nodes.len()];
    let mut queue = VecDeque::new();

    for (i, n) in nodes.iter().enumerate() {
        if matches!(n.fluid.phase, Phase::TwoPhase | Phase::Vapor | Phase::Supercritical) {
            base[i] = Some((n.fluid.pressure_pa, n.elevation_m));
            visited[i] = true;
            queue.push_back(i);
        }
    }

    while let Some(i) = queue.pop_front() {
        let anchor = base[i].expect("queued nodes always carry a base pressure");
        for conn in connections {
            let neighbor = if conn.from.idx() == i {
                Some(conn.to.idx())
            } else if conn.to.idx() == i {
                Some(conn.from.idx())
            } else {
                None
            };
            if let Some(j) = neighbor {
                if !visited[j] {
                    visited[j] = true;
                    base[j] = Some(anchor);
                    queue.push_back(j);
                }
            }
        }
    }

    base
}

impl ConstraintOperator for FluidStateConstraint {
    fn name(&self) -> &str {
        "fluid_state"
    }

    fn apply(&self, state: &SimulationState) -> OpResult<SimulationState> {
        let backend = WaterBackend::global();
        let mut next = state.clone();

        for node in &mut next.flow_nodes {
            let result = backend.calculate_state(
                node.fluid.mass_kg,
                node.fluid.internal_energy_j,
                node.volume_m3,
            )?;
            node.fluid.temperature_k = result.temperature_k;
            node.fluid.pressure_pa = result.pressure_pa;
            node.fluid.phase = result.phase;
            node.fluid.quality = result.quality;
        }

        if self.pressure_model == PressureModel::Hybrid {
            let base_pressures = propagate_base_pressure(&next.flow_nodes, &next.flow_connections);
            for (i, node) in next.flow_nodes.iter_mut().enumerate() {
                if node.fluid.phase != Phase::Liquid {
                    continue;
                }
                let Some((base_p, base_elev)) = base_pressures[i] else { continue };
                let v_f = backend.saturated_liquid_specific_volume_m3_per_kg(node.fluid.temperature_k);
                let rho_base = 1.0 / v_f.max(1e-9);
                let rho_node = node.density_kg_per_m3();
                let k = backend.bulk_modulus_pa(node.fluid.temperature_k - 273.15, None);
                let hydrostatic = rho_node * G0_MPS2 * (base_elev - node.elevation_m);
                node.fluid.pressure_pa =
                    base_p + k * (rho_node - rho_base) / rho_base + hydrostatic;
            }
        }

        for node in &next.flow_nodes {
            if node.fluid.pressure_pa < P_MIN_PA
                || node.fluid.temperature_k < backend.t_triple_k()
                || !node.fluid.pressure_pa.is_finite()
                || !node.fluid.temperature_k.is_finite()
            {
                warn!(
                    node = %node.label,
                    pressure_pa = node.fluid.pressure_pa,
                    temperature_k = node.fluid.temperature_k,
                    "flow node left plausible ranges after fluid-state constraint"
                );
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::FluidState;

    fn liquid_node(label: &str, t: f64, elev: f64) -> FlowNode {
        FlowNode {
            id: Id::from_index(0),
            label: label.into(),
            fluid: FluidState {
                mass_kg: 1.0,
                internal_energy_j: 112_500.0,
                temperature_k: t,
                pressure_pa: 1.0e5,
                phase: Phase::Liquid,
                quality: 0.0,
                ncg: None,
            },
            volume_m3: 0.001003,
            hydraulic_diameter_m: 0.05,
            flow_area_m2: 0.002,
            elevation_m: elev,
            height_m: None,
            heat_sink: None,
            container: None,
        }
    }

    #[test]
    fn pure_triangulation_uses_backend_pressure_directly() {
        let mut state = SimulationState::new();
        state.add_flow_node(liquid_node("a", 300.0, 0.0));
        let constraint = FluidStateConstraint::new(PressureModel::PureTriangulation);
        let out = constraint.apply(&state).unwrap();
        assert_eq!(out.flow_nodes[0].fluid.phase, Phase::Liquid);
        assert!(out.flow_nodes[0].fluid.pressure_pa > 0.0);
    }

    #[test]
    fn hybrid_pressure_anchors_to_two_phase_neighbor() {
        let mut state = SimulationState::new();
        let liquid = state.add_flow_node(liquid_node("loop", 300.0, 0.0));
        let mut boiling = liquid_node("pressurizer", 373.15, 0.0);
        boiling.fluid.phase = Phase::TwoPhase;
        boiling.fluid.pressure_pa = 1.0e5;
        boiling.fluid.quality = 0.5;
        boiling.fluid.internal_energy_j = 1.5e6;
        let anchor = state.add_flow_node(boiling);
        state.add_flow_connection(pwr_state::FlowConnection {
            id: Id::from_index(0),
            from: liquid,
            to: anchor,
            flow_area_m2: 0.01,
            hydraulic_diameter_m: 0.1,
            length_m: 1.0,
            elevation_delta_m: 0.0,
            from_elevation_m: None,
            to_elevation_m: None,
            resistance_k: 1.0,
            mass_flow_rate_kgps: 0.0,
            flags: pwr_state::FlowConnectionFlags::default(),
        });

        let constraint = FluidStateConstraint::new(PressureModel::Hybrid);
        let out = constraint.apply(&state).unwrap();
        assert!(out.flow_nodes[0].fluid.pressure_pa.is_finite());
    }
}
