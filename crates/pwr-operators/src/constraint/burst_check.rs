//! Burst/LOCA detection and break-connection creation (spec §4.4).

use pwr_core::Id;
use pwr_state::components::BreakLocation;
use pwr_state::connections::FlowConnectionFlags;
use pwr_state::{FlowConnection, SimulationState};

use crate::error::OpResult;
use crate::traits::ConstraintOperator;

const ATMOSPHERIC_PRESSURE_PA: f64 = 101_325.0;
/// Orifice resistance coefficient assigned to a freshly-created break
/// connection; sharp-edged-orifice order of magnitude.
const BREAK_ORIFICE_RESISTANCE_K: f64 = 2.0;

/// splitmix64: a small, dependency-free deterministic hash used to turn a
/// burst record's id into reproducible "random" jitter and break-location
/// samples (spec "deterministic seeded jitter").
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn unit_interval(seed: u64) -> f64 {
    (splitmix64(seed) >> 11) as f64 / (1u64 << 53) as f64
}

fn gauge_pressure(state: &SimulationState, burst: &pwr_state::BurstState) -> Option<f64> {
    let node = state.flow_node(burst.node)?;
    let reference = if let Some(shell) = burst.shell_node {
        state.flow_node(shell)?.fluid.pressure_pa
    } else if let Some(container) = node.container {
        state.flow_node(container)?.fluid.pressure_pa
    } else {
        ATMOSPHERIC_PRESSURE_PA
    };
    Some(node.fluid.pressure_pa - reference)
}

pub struct BurstCheck;

impl ConstraintOperator for BurstCheck {
    fn name(&self) -> &str {
        "burst_check"
    }

    fn apply(&self, state: &SimulationState) -> OpResult<SimulationState> {
        let mut next = state.clone();

        for i in 0..next.bursts.len() {
            let burst_id = next.bursts[i].id;
            let Some(overpressure) = gauge_pressure(&next, &next.bursts[i]) else { continue };

            let threshold = next.bursts[i].burst_threshold_pa;
            let exceeds = overpressure >= threshold;
            if !exceeds && !next.bursts[i].is_burst {
                continue;
            }

            if exceeds && !next.bursts[i].is_burst {
                next.bursts[i].is_burst = true;
                let seed = burst_id.index() as u64;
                next.bursts[i].break_location = Some(BreakLocation {
                    x: unit_interval(seed * 2 + 1),
                    y: unit_interval(seed * 2 + 2),
                });

                let node_container = next
                    .flow_node(next.bursts[i].node)
                    .ok_or(crate::error::OpError::MissingEntity { what: "burst record node" })?
                    .container;
                if let Some(container) = node_container {
                    let conn = FlowConnection {
                        id: Id::from_index(next.flow_connections.len() as u32),
                        from: next.bursts[i].node,
                        to: container,
                        flow_area_m2: 1.0e-3,
                        hydraulic_diameter_m: 0.03,
                        length_m: 0.1,
                        elevation_delta_m: 0.0,
                        from_elevation_m: None,
                        to_elevation_m: None,
                        resistance_k: BREAK_ORIFICE_RESISTANCE_K,
                        mass_flow_rate_kgps: 0.0,
                        flags: FlowConnectionFlags { check_valve: false, is_break: true },
                    };
                    let conn_id = next.add_flow_connection(conn);
                    next.bursts[i].break_connection = Some(conn_id);
                }
            }

            let ratio = ((overpressure - threshold) / threshold.max(1.0)).max(0.0);
            let jitter = 0.9 + 0.2 * unit_interval(burst_id.index() as u64 * 7 + 3);
            let candidate_fraction = (ratio * ratio * jitter).clamp(0.0, 1.0);
            next.bursts[i].break_fraction = next.bursts[i].break_fraction.max(candidate_fraction);
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_state::{BurstState, FluidState, FlowNode};
    use pwr_water::Phase;

    fn node(p: f64, container: Option<pwr_core::FlowNodeId>) -> FlowNode {
        FlowNode {
            id: Id::from_index(0),
            label: "n".into(),
            fluid: FluidState {
                mass_kg: 10.0,
                internal_energy_j: 1.0e7,
                temperature_k: 560.0,
                pressure_pa: p,
                phase: Phase::Liquid,
                quality: 0.0,
                ncg: None,
            },
            volume_m3: 0.1,
            hydraulic_diameter_m: 0.05,
            flow_area_m2: 0.002,
            elevation_m: 0.0,
            height_m: None,
            heat_sink: None,
            container,
        }
    }

    #[test]
    fn exceeding_threshold_marks_burst_and_adds_connection() {
        let mut state = SimulationState::new();
        let container = state.add_flow_node(node(1.0e5, None));
        let pipe = state.add_flow_node(node(2.0e7, Some(container)));
        state.bursts.push(BurstState {
            id: Id::from_index(0),
            node: pipe,
            component_label: "pipe".into(),
            is_burst: false,
            burst_threshold_pa: 1.0e7,
            break_fraction: 0.0,
            break_location: None,
            shell_node: None,
            break_connection: None,
        });

        let out = BurstCheck.apply(&state).unwrap();
        assert!(out.bursts[0].is_burst);
        assert!(out.bursts[0].break_connection.is_some());
        assert!(out.bursts[0].break_fraction > 0.0);
    }

    #[test]
    fn break_fraction_never_shrinks() {
        let mut state = SimulationState::new();
        let container = state.add_flow_node(node(1.0e5, None));
        let pipe = state.add_flow_node(node(5.0e7, Some(container)));
        state.bursts.push(BurstState {
            id: Id::from_index(0),
            node: pipe,
            component_label: "pipe".into(),
            is_burst: true,
            burst_threshold_pa: 1.0e7,
            break_fraction: 0.9,
            break_location: None,
            shell_node: None,
            break_connection: None,
        });
        let out = BurstCheck.apply(&state).unwrap();
        assert!(out.bursts[0].break_fraction >= 0.9);
    }
}
