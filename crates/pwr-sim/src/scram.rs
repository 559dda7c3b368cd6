//! `triggerScram`/`checkScramConditions` (spec §4.6, §6).
//!
//! The source leaves the automatic trip setpoints unspecified; this
//! expansion resolves them to the two conditions a PWR reactor protection
//! system is conventionally built around: an overpower trip on relative
//! power and a high-temperature trip using each thermal node's own
//! `max_temperature_k` limit (already a per-node field spec §3 defines,
//! rather than a new global constant).

use pwr_state::{SimEvent, SimulationState};

/// Relative-power trip setpoint (110% of nominal is a conventional PWR
/// high-flux reactor-trip margin).
pub const OVERPOWER_TRIP_RELATIVE: f64 = 1.15;

#[derive(Debug, Clone, PartialEq)]
pub struct ScramCheck {
    pub should_scram: bool,
    pub reason: Option<String>,
}

/// Evaluate whether automatic trip conditions are met. Does not mutate
/// state; the host or [`crate::Simulation`] decides whether to act on it.
pub fn check_scram_conditions(state: &SimulationState) -> ScramCheck {
    if let Some(n) = &state.neutronics {
        if !n.scram.scrammed && n.relative_power() > OVERPOWER_TRIP_RELATIVE {
            return ScramCheck {
                should_scram: true,
                reason: Some(format!(
                    "overpower trip: relative power {:.3} exceeds {:.2}",
                    n.relative_power(),
                    OVERPOWER_TRIP_RELATIVE
                )),
            };
        }
    }

    for node in &state.thermal_nodes {
        if node.temperature_k > node.max_temperature_k {
            return ScramCheck {
                should_scram: true,
                reason: Some(format!(
                    "high temperature trip: {} at {:.1} K exceeds limit {:.1} K",
                    node.label, node.temperature_k, node.max_temperature_k
                )),
            };
        }
    }

    ScramCheck { should_scram: false, reason: None }
}

/// Insert control rods fully, latch the scram flag, and record the event
/// (spec "rapid insertion of control rods for emergency shutdown").
pub fn trigger_scram(state: &SimulationState, reason: impl Into<String>) -> SimulationState {
    let mut next = state.clone();
    let reason = reason.into();

    if let Some(n) = next.neutronics.as_mut() {
        if !n.scram.scrammed {
            n.scram.scrammed = true;
            n.scram.scram_time_s = Some(next.time_s);
            n.control_rod_position = 0.0;
            next.events.push(SimEvent::Scram { reason, time_s: next.time_s });
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::neutronics::{FeedbackCoefficients, ScramState};
    use pwr_state::NeutronicsState;

    fn toy_neutronics() -> NeutronicsState {
        NeutronicsState {
            core_id: Id::from_index(0),
            fuel_node_id: None,
            coolant_node_id: None,
            control_rod_comp_id: None,
            power_w: 3000.0e6,
            nominal_power_w: 3000.0e6,
            reactivity: 0.0,
            lambda_gen_s: 2.0e-5,
            beta: 0.0065,
            decay_lambda_per_s: 0.1,
            precursor_concentration: 1.0,
            feedback: FeedbackCoefficients {
                fuel_temp_coeff_per_k: -3.0e-5,
                coolant_temp_coeff_per_k: -2.0e-4,
                coolant_density_coeff_per_kgm3: 1.0e-4,
                reference_fuel_temp_k: 900.0,
                reference_coolant_temp_k: 560.0,
                reference_coolant_density_kgm3: 700.0,
            },
            control_rod_position: 1.0,
            control_rod_worth: -0.05,
            decay_heat_fraction: 0.0,
            scram: ScramState::default(),
        }
    }

    #[test]
    fn overpower_trips_scram_check() {
        let mut state = SimulationState::new();
        let mut n = toy_neutronics();
        n.power_w = 4.0e9;
        state.neutronics = Some(n);
        let check = check_scram_conditions(&state);
        assert!(check.should_scram);
    }

    #[test]
    fn nominal_power_does_not_trip() {
        let mut state = SimulationState::new();
        state.neutronics = Some(toy_neutronics());
        let check = check_scram_conditions(&state);
        assert!(!check.should_scram);
    }

    #[test]
    fn trigger_scram_inserts_rods_and_latches_once() {
        let mut state = SimulationState::new();
        state.neutronics = Some(toy_neutronics());
        let scrammed = trigger_scram(&state, "manual");
        let n = scrammed.neutronics.as_ref().unwrap();
        assert!(n.scram.scrammed);
        assert_eq!(n.control_rod_position, 0.0);
        assert_eq!(n.scram.scram_time_s, Some(0.0));

        let again = trigger_scram(&scrammed, "manual");
        assert_eq!(again.neutronics.as_ref().unwrap().scram.scram_time_s, Some(0.0));
    }
}
