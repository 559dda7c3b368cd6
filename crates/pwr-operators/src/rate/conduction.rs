//! Conductive coupling between thermal nodes (spec §4.3).

use pwr_state::{SimulationState, StateRates};

use crate::error::OpResult;
use crate::traits::RateOperator;

pub struct ConductionOperator;

impl RateOperator for ConductionOperator {
    fn name(&self) -> &str {
        "conduction"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        for conn in &state.thermal_connections {
            let from = state
                .thermal_node(conn.from)
                .ok_or(crate::error::OpError::MissingEntity {
                    what: "thermal connection endpoint",
                })?;
            let to = state
                .thermal_node(conn.to)
                .ok_or(crate::error::OpError::MissingEntity {
                    what: "thermal connection endpoint",
                })?;

            let q = conn.conductance_w_per_k * (from.temperature_k - to.temperature_k);

            let from_capacity = from.thermal_capacity_j_per_k().max(f64::MIN_POSITIVE);
            let to_capacity = to.thermal_capacity_j_per_k().max(f64::MIN_POSITIVE);

            rates.d_temperature_dt[conn.from.idx()] -= q / from_capacity;
            rates.d_temperature_dt[conn.to.idx()] += q / to_capacity;
        }

        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::{ThermalConnection, ThermalNode};

    fn node(id: u32, t: f64) -> ThermalNode {
        ThermalNode {
            id: Id::from_index(id),
            label: "n".into(),
            temperature_k: t,
            mass_kg: 10.0,
            specific_heat_j_per_kgk: 500.0,
            conductivity_w_per_mk: 15.0,
            characteristic_length_m: 0.1,
            surface_area_m2: 1.0,
            heat_generation_w: 0.0,
            max_temperature_k: 2000.0,
            is_fuel: false,
            oxidation: None,
        }
    }

    #[test]
    fn heat_flows_from_hot_to_cold() {
        let mut state = SimulationState::new();
        let hot = state.add_thermal_node(node(0, 500.0));
        let cold = state.add_thermal_node(node(0, 300.0));
        state.thermal_connections.push(ThermalConnection {
            id: Id::from_index(0),
            from: hot,
            to: cold,
            conductance_w_per_k: 10.0,
        });

        let rates = ConductionOperator.evaluate(&state).unwrap();
        assert!(rates.d_temperature_dt[hot.idx()] < 0.0);
        assert!(rates.d_temperature_dt[cold.idx()] > 0.0);
    }

    #[test]
    fn equal_temperatures_produce_no_flow() {
        let mut state = SimulationState::new();
        let a = state.add_thermal_node(node(0, 400.0));
        let b = state.add_thermal_node(node(0, 400.0));
        state.thermal_connections.push(ThermalConnection {
            id: Id::from_index(0),
            from: a,
            to: b,
            conductance_w_per_k: 5.0,
        });
        let rates = ConductionOperator.evaluate(&state).unwrap();
        assert_eq!(rates.d_temperature_dt[a.idx()], 0.0);
        assert_eq!(rates.d_temperature_dt[b.idx()], 0.0);
    }
}
