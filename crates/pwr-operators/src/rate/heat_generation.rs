//! Volumetric heat sources on thermal nodes (spec §4.3).

use pwr_state::{SimulationState, StateRates};

use crate::error::OpResult;
use crate::traits::RateOperator;

pub struct HeatGenerationOperator;

impl RateOperator for HeatGenerationOperator {
    fn name(&self) -> &str {
        "heat_generation"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);
        let reactor_power_w = state.neutronics.as_ref().map(|n| n.power_w).unwrap_or(0.0);

        let fuel_capacity_j_per_k: f64 = state
            .thermal_nodes
            .iter()
            .filter(|n| n.is_fuel)
            .map(|n| n.thermal_capacity_j_per_k())
            .sum();

        for node in &state.thermal_nodes {
            let capacity = node.thermal_capacity_j_per_k().max(f64::MIN_POSITIVE);
            if node.is_fuel && fuel_capacity_j_per_k > 0.0 {
                // Distribute reactor power across fuel nodes in proportion
                // to their thermal mass, so a single lumped fuel node just
                // gets all of it.
                let share = node.thermal_capacity_j_per_k() / fuel_capacity_j_per_k;
                rates.d_temperature_dt[node.id.idx()] += share * reactor_power_w / capacity;
            } else {
                rates.d_temperature_dt[node.id.idx()] += node.heat_generation_w / capacity;
            }
        }

        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::neutronics::{FeedbackCoefficients, ScramState};
    use pwr_state::{NeutronicsState, ThermalNode};

    fn fuel_node(mass: f64) -> ThermalNode {
        ThermalNode {
            id: Id::from_index(0),
            label: "fuel".into(),
            temperature_k: 900.0,
            mass_kg: mass,
            specific_heat_j_per_kgk: 300.0,
            conductivity_w_per_mk: 3.0,
            characteristic_length_m: 0.005,
            surface_area_m2: 0.1,
            heat_generation_w: 0.0,
            max_temperature_k: 2800.0,
            is_fuel: true,
            oxidation: None,
        }
    }

    #[test]
    fn fuel_node_tracks_reactor_power() {
        let mut state = SimulationState::new();
        state.add_thermal_node(fuel_node(10.0));
        state.neutronics = Some(NeutronicsState {
            core_id: Id::from_index(0),
            fuel_node_id: None,
            coolant_node_id: None,
            control_rod_comp_id: None,
            power_w: 3000.0,
            nominal_power_w: 3000.0,
            reactivity: 0.0,
            lambda_gen_s: 2.0e-5,
            beta: 0.0065,
            decay_lambda_per_s: 0.1,
            precursor_concentration: 1.0,
            feedback: FeedbackCoefficients {
                fuel_temp_coeff_per_k: -3e-5,
                coolant_temp_coeff_per_k: -2e-4,
                coolant_density_coeff_per_kgm3: 1e-4,
                reference_fuel_temp_k: 900.0,
                reference_coolant_temp_k: 560.0,
                reference_coolant_density_kgm3: 700.0,
            },
            control_rod_position: 1.0,
            control_rod_worth: -0.02,
            decay_heat_fraction: 0.0,
            scram: ScramState::default(),
        });

        let rates = HeatGenerationOperator.evaluate(&state).unwrap();
        assert!((rates.d_temperature_dt[0] - 3000.0 / (10.0 * 300.0)).abs() < 1e-9);
    }

    #[test]
    fn non_fuel_node_uses_static_heat() {
        let mut state = SimulationState::new();
        let mut node = fuel_node(5.0);
        node.is_fuel = false;
        node.heat_generation_w = 50.0;
        state.add_thermal_node(node);
        let rates = HeatGenerationOperator.evaluate(&state).unwrap();
        assert!((rates.d_temperature_dt[0] - 50.0 / (5.0 * 300.0)).abs() < 1e-9);
    }
}
