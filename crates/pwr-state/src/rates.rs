//! `StateRates`: the time-derivative bag every rate operator contributes to
//! and the RK45 engine combines (spec §4.2).

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::state::SimulationState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRates {
    pub d_mass_dt: Vec<f64>,
    pub d_energy_dt: Vec<f64>,
    pub d_mdot_dt: Vec<f64>,
    pub d_temperature_dt: Vec<f64>,
    pub d_effective_speed_dt: Vec<f64>,
    pub d_power_dt: f64,
    pub d_precursor_dt: f64,
}

impl StateRates {
    /// A zero rate bag shaped to match `state`'s arenas, so every operator
    /// can write into a fixed-size, index-aligned buffer.
    pub fn zeros_like(state: &SimulationState) -> Self {
        Self {
            d_mass_dt: vec![0.0; state.flow_nodes.len()],
            d_energy_dt: vec![0.0; state.flow_nodes.len()],
            d_mdot_dt: vec![0.0; state.flow_connections.len()],
            d_temperature_dt: vec![0.0; state.thermal_nodes.len()],
            d_effective_speed_dt: vec![0.0; state.pumps.len()],
            d_power_dt: 0.0,
            d_precursor_dt: 0.0,
        }
    }

    fn zip_map(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        debug_assert_eq!(a.len(), b.len());
        a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect()
    }
}

impl Add for &StateRates {
    type Output = StateRates;

    fn add(self, rhs: &StateRates) -> StateRates {
        StateRates {
            d_mass_dt: StateRates::zip_map(&self.d_mass_dt, &rhs.d_mass_dt, |a, b| a + b),
            d_energy_dt: StateRates::zip_map(&self.d_energy_dt, &rhs.d_energy_dt, |a, b| a + b),
            d_mdot_dt: StateRates::zip_map(&self.d_mdot_dt, &rhs.d_mdot_dt, |a, b| a + b),
            d_temperature_dt: StateRates::zip_map(
                &self.d_temperature_dt,
                &rhs.d_temperature_dt,
                |a, b| a + b,
            ),
            d_effective_speed_dt: StateRates::zip_map(
                &self.d_effective_speed_dt,
                &rhs.d_effective_speed_dt,
                |a, b| a + b,
            ),
            d_power_dt: self.d_power_dt + rhs.d_power_dt,
            d_precursor_dt: self.d_precursor_dt + rhs.d_precursor_dt,
        }
    }
}

impl Mul<f64> for &StateRates {
    type Output = StateRates;

    fn mul(self, scale: f64) -> StateRates {
        StateRates {
            d_mass_dt: self.d_mass_dt.iter().map(|v| v * scale).collect(),
            d_energy_dt: self.d_energy_dt.iter().map(|v| v * scale).collect(),
            d_mdot_dt: self.d_mdot_dt.iter().map(|v| v * scale).collect(),
            d_temperature_dt: self.d_temperature_dt.iter().map(|v| v * scale).collect(),
            d_effective_speed_dt: self
                .d_effective_speed_dt
                .iter()
                .map(|v| v * scale)
                .collect(),
            d_power_dt: self.d_power_dt * scale,
            d_precursor_dt: self.d_precursor_dt * scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> StateRates {
        StateRates {
            d_mass_dt: vec![1.0, 2.0],
            d_energy_dt: vec![3.0, 4.0],
            d_mdot_dt: vec![5.0],
            d_temperature_dt: vec![6.0],
            d_effective_speed_dt: vec![7.0],
            d_power_dt: 8.0,
            d_precursor_dt: 9.0,
        }
    }

    #[test]
    fn addition_is_elementwise() {
        let a = toy();
        let b = toy();
        let sum = &a + &b;
        assert_eq!(sum.d_mass_dt, vec![2.0, 4.0]);
        assert_eq!(sum.d_power_dt, 16.0);
    }

    #[test]
    fn scalar_multiply_is_elementwise() {
        let a = toy();
        let scaled = &a * 2.0;
        assert_eq!(scaled.d_energy_dt, vec![6.0, 8.0]);
        assert_eq!(scaled.d_precursor_dt, 18.0);
    }

    #[test]
    fn vector_space_laws_hold() {
        let a = toy();
        let b = toy();
        let lhs = &(&a + &b) * 0.5;
        let rhs = &(&a * 0.5) + &(&b * 0.5);
        assert_eq!(lhs.d_mass_dt, rhs.d_mass_dt);
        assert_eq!(lhs.d_power_dt, rhs.d_power_dt);
    }
}
