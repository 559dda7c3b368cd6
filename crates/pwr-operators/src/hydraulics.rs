//! Shared hydrostatic-pressure and driving-pressure helpers used by the
//! flow-momentum rate operator and the flow-dynamics constraint (spec
//! §4.3, §4.4).

use pwr_core::units::constants::G0_MPS2;
use pwr_state::FlowNode;
use pwr_water::{Phase, WaterBackend};

/// Pressure at `local_elev_m` inside `node`, including the node's internal
/// hydrostatic head. Two-phase nodes only carry a liquid column below
/// their estimated liquid surface; single-phase liquid nodes carry the
/// full column; vapor/supercritical nodes carry none (spec §4.3 "Flow
/// momentum").
pub fn endpoint_pressure_pa(node: &FlowNode, local_elev_m: f64) -> f64 {
    match node.fluid.phase {
        Phase::Liquid => {
            let rho = node.density_kg_per_m3();
            node.fluid.pressure_pa + rho * G0_MPS2 * (node.elevation_m - local_elev_m)
        }
        Phase::TwoPhase => {
            let height = node.height_m.unwrap_or(0.0);
            let surface = node.elevation_m + node.liquid_level_fraction() * height;
            if local_elev_m <= surface {
                let v_f = WaterBackend::global()
                    .saturated_liquid_specific_volume_m3_per_kg(node.fluid.temperature_k);
                let rho_liquid = 1.0 / v_f.max(1e-9);
                node.fluid.pressure_pa + rho_liquid * G0_MPS2 * (surface - local_elev_m)
            } else {
                node.fluid.pressure_pa
            }
        }
        Phase::Vapor | Phase::Supercritical => node.fluid.pressure_pa,
    }
}

/// Density used to scale a connection's inertial/friction terms: the
/// upstream node's bulk density, or its saturated-liquid density while
/// two-phase (the relevant phase for momentum in practice is the liquid).
pub fn upstream_density_kg_per_m3(node: &FlowNode) -> f64 {
    match node.fluid.phase {
        Phase::TwoPhase => {
            let v_f = WaterBackend::global()
                .saturated_liquid_specific_volume_m3_per_kg(node.fluid.temperature_k);
            1.0 / v_f.max(1e-9)
        }
        _ => node.density_kg_per_m3().max(1e-6),
    }
}
