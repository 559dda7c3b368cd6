//! Point-kinetics neutronics, one delayed-neutron group (spec §4.3).

use pwr_state::neutronics::{MIN_RELATIVE_POWER, STANDBY_POWER_FRACTION, STANDBY_PRECURSOR_FLOOR};
use pwr_state::{SimulationState, StateRates, ThermalNode};

use crate::error::OpResult;
use crate::traits::RateOperator;

/// ANS-style decay-heat fraction curve: 0.07*t^-0.2 for t >= 1s, clamped
/// below at 1% of the power at scram.
fn decay_heat_fraction(time_since_scram_s: f64) -> f64 {
    let t = time_since_scram_s.max(1.0);
    (0.07 * t.powf(-0.2)).max(0.01)
}

fn find_node_by_label<'a>(state: &'a SimulationState, label: &str) -> Option<&'a ThermalNode> {
    state.thermal_nodes.iter().find(|n| n.label == label)
}

pub struct NeutronicsOperator;

impl RateOperator for NeutronicsOperator {
    fn name(&self) -> &str {
        "neutronics"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        let Some(n) = state.neutronics.as_ref() else {
            return Ok(rates);
        };

        let fuel = n
            .fuel_node_id
            .and_then(|id| state.thermal_node(id))
            .or_else(|| find_node_by_label(state, "fuel"));
        let coolant = n
            .coolant_node_id
            .and_then(|id| state.thermal_node(id))
            .or_else(|| find_node_by_label(state, "coolant"));

        let rho_doppler = fuel
            .map(|f| n.feedback.fuel_temp_coeff_per_k * (f.temperature_k - n.feedback.reference_fuel_temp_k))
            .unwrap_or(0.0);
        let rho_coolant_t = coolant
            .map(|c| {
                n.feedback.coolant_temp_coeff_per_k * (c.temperature_k - n.feedback.reference_coolant_temp_k)
            })
            .unwrap_or(0.0);

        // Coolant density reactivity needs a fluid node, not the thermal
        // node; searched by the same fallback rule (linked id, else label).
        let coolant_density = state
            .flow_nodes
            .iter()
            .find(|fl| fl.label == "coolant")
            .map(|fl| fl.density_kg_per_m3());
        let rho_coolant_rho = coolant_density
            .map(|rho| {
                n.feedback.coolant_density_coeff_per_kgm3
                    * (rho - n.feedback.reference_coolant_density_kgm3)
            })
            .unwrap_or(0.0);

        let rho_rod = n.control_rod_worth * (1.0 - n.control_rod_position.clamp(0.0, 1.0));

        let reactivity = rho_rod + rho_doppler + rho_coolant_t + rho_coolant_rho;

        let relative_power = n.relative_power().max(MIN_RELATIVE_POWER);
        let standby = n.scram.scrammed && relative_power < STANDBY_POWER_FRACTION && reactivity < 0.0;

        if standby {
            let time_since_scram = n
                .scram
                .scram_time_s
                .map(|t0| (state.time_s - t0).max(0.0))
                .unwrap_or(0.0);
            let target_relative_power = decay_heat_fraction(time_since_scram);
            let target_power_w = target_relative_power * n.nominal_power_w;
            // First-order relaxation toward the decay-heat curve rather than
            // the stiff prompt-jump kinetics, which would force an
            // unreasonably small dt in standby.
            const STANDBY_TIME_CONSTANT_S: f64 = 1.0;
            rates.d_power_dt = (target_power_w - n.power_w) / STANDBY_TIME_CONSTANT_S;
            rates.d_precursor_dt =
                (STANDBY_PRECURSOR_FLOOR - n.precursor_concentration) * n.decay_lambda_per_s;
        } else {
            let big_n = relative_power;
            let c = n.precursor_concentration;
            let d_n_dt =
                (reactivity - n.beta) / n.lambda_gen_s.max(f64::MIN_POSITIVE) * big_n + n.decay_lambda_per_s * c;
            let d_c_dt = n.beta / n.lambda_gen_s.max(f64::MIN_POSITIVE) * big_n - n.decay_lambda_per_s * c;

            rates.d_power_dt = d_n_dt * n.nominal_power_w;
            rates.d_precursor_dt = d_c_dt;
        }

        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_heat_floor_is_one_percent() {
        assert!((decay_heat_fraction(1.0e9) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn decay_heat_at_one_second_matches_ans_curve() {
        assert!((decay_heat_fraction(1.0) - 0.07).abs() < 1e-9);
    }

    #[test]
    fn zero_reactivity_steady_state_holds_power() {
        use pwr_core::Id;
        use pwr_state::neutronics::{FeedbackCoefficients, NeutronicsState, ScramState};

        let mut state = SimulationState::new();
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
            // Steady state: C* = (beta/lambda_gen)/decay_lambda * N.
            precursor_concentration: (0.0065 / 2.0e-5) / 0.1,
            feedback: FeedbackCoefficients {
                fuel_temp_coeff_per_k: 0.0,
                coolant_temp_coeff_per_k: 0.0,
                coolant_density_coeff_per_kgm3: 0.0,
                reference_fuel_temp_k: 900.0,
                reference_coolant_temp_k: 560.0,
                reference_coolant_density_kgm3: 700.0,
            },
            control_rod_position: 1.0,
            control_rod_worth: 0.0,
            decay_heat_fraction: 0.0,
            scram: ScramState::default(),
        });

        let rates = NeutronicsOperator.evaluate(&state).unwrap();
        assert!(rates.d_power_dt.abs() < 1e-6);
        assert!(rates.d_precursor_dt.abs() < 1e-9);
    }
}
