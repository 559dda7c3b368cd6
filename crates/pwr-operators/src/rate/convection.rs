//! Convective coupling between a solid thermal node and a fluid control
//! volume (spec §4.3).

use pwr_state::{SimulationState, StateRates};
use pwr_water::Phase;

use crate::error::{OpError, OpResult};
use crate::traits::RateOperator;

/// Crude bulk fluid properties by phase, used only to pick a Nusselt-
/// correlation Reynolds/Prandtl scale; the water backend does not model
/// transport properties directly.
struct PhaseProps {
    thermal_conductivity_w_per_mk: f64,
    dynamic_viscosity_pa_s: f64,
    prandtl: f64,
    natural_h_w_per_m2k: f64,
}

fn phase_props(phase: Phase) -> PhaseProps {
    match phase {
        Phase::Liquid | Phase::TwoPhase => PhaseProps {
            thermal_conductivity_w_per_mk: 0.6,
            dynamic_viscosity_pa_s: 2.8e-4,
            prandtl: 4.0,
            natural_h_w_per_m2k: 250.0,
        },
        Phase::Vapor | Phase::Supercritical => PhaseProps {
            thermal_conductivity_w_per_mk: 0.025,
            dynamic_viscosity_pa_s: 1.2e-5,
            prandtl: 1.0,
            natural_h_w_per_m2k: 8.0,
        },
    }
}

/// Total mass flow incident on `node_id`, summed over both endpoints of
/// every flow connection touching it; stands in for the "local ṁ" the
/// correlation needs.
fn local_mass_flow(state: &SimulationState, node_id: pwr_core::FlowNodeId) -> f64 {
    state
        .flow_connections
        .iter()
        .filter(|c| c.from == node_id || c.to == node_id)
        .map(|c| c.mass_flow_rate_kgps.abs())
        .sum()
}

pub struct ConvectionOperator;

impl RateOperator for ConvectionOperator {
    fn name(&self) -> &str {
        "convection"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        for conn in &state.convection_connections {
            let solid = state
                .thermal_node(conn.solid)
                .ok_or(OpError::MissingEntity { what: "convection solid node" })?;
            let fluid = state
                .flow_node(conn.fluid)
                .ok_or(OpError::MissingEntity { what: "convection fluid node" })?;

            let props = phase_props(fluid.fluid.phase);
            let d_h = fluid.hydraulic_diameter_m.max(1e-6);
            let area = fluid.flow_area_m2.max(1e-9);
            let mdot = local_mass_flow(state, conn.fluid);
            let mass_flux = mdot / area;
            let re = mass_flux * d_h / props.dynamic_viscosity_pa_s;
            let nu = 0.023 * re.max(0.0).powf(0.8) * props.prandtl.powf(0.4);
            let h_dittus_boelter = nu * props.thermal_conductivity_w_per_mk / d_h;
            let h = props.natural_h_w_per_m2k.max(h_dittus_boelter);

            let q = h * conn.surface_area_m2 * (solid.temperature_k - fluid.fluid.temperature_k);

            let solid_capacity = solid.thermal_capacity_j_per_k().max(f64::MIN_POSITIVE);
            rates.d_temperature_dt[conn.solid.idx()] -= q / solid_capacity;
            rates.d_energy_dt[conn.fluid.idx()] += q;
        }

        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::{ConvectionConnection, FluidState, FlowNode, ThermalNode};

    fn solid(t: f64) -> ThermalNode {
        ThermalNode {
            id: Id::from_index(0),
            label: "clad".into(),
            temperature_k: t,
            mass_kg: 5.0,
            specific_heat_j_per_kgk: 400.0,
            conductivity_w_per_mk: 15.0,
            characteristic_length_m: 0.01,
            surface_area_m2: 0.5,
            heat_generation_w: 0.0,
            max_temperature_k: 2000.0,
            is_fuel: false,
            oxidation: None,
        }
    }

    fn fluid(t: f64) -> FlowNode {
        FlowNode {
            id: Id::from_index(0),
            label: "coolant".into(),
            fluid: FluidState {
                mass_kg: 100.0,
                internal_energy_j: 1.0e8,
                temperature_k: t,
                pressure_pa: 15.5e6,
                phase: Phase::Liquid,
                quality: 0.0,
                ncg: None,
            },
            volume_m3: 0.1,
            hydraulic_diameter_m: 0.01,
            flow_area_m2: 0.001,
            elevation_m: 0.0,
            height_m: None,
            heat_sink: None,
            container: None,
        }
    }

    #[test]
    fn hot_solid_heats_cooler_fluid() {
        let mut state = SimulationState::new();
        let solid_id = state.add_thermal_node(solid(600.0));
        let fluid_id = state.add_flow_node(fluid(550.0));
        state.convection_connections.push(ConvectionConnection {
            id: Id::from_index(0),
            solid: solid_id,
            fluid: fluid_id,
            surface_area_m2: 0.5,
        });

        let rates = ConvectionOperator.evaluate(&state).unwrap();
        assert!(rates.d_temperature_dt[solid_id.idx()] < 0.0);
        assert!(rates.d_energy_dt[fluid_id.idx()] > 0.0);
    }
}
