//! Baker-Just cladding oxidation kinetics (spec §4.3). Only nodes carrying
//! an [`pwr_state::OxidationRecord`] participate.
//!
//! The reaction's rate constant feeds the cladding node's `dT/dt`
//! directly; `fraction_reacted`/`h2_produced_mol` are cumulative
//! diagnostics with no slot in `StateRates` (spec §4.2 only integrates
//! per-thermal-node temperature), so they are advanced once per accepted
//! step by the simulation facade, which has `dt` in hand.

use pwr_state::{SimulationState, StateRates};

use crate::error::OpResult;
use crate::traits::RateOperator;

/// Threshold below which the reaction is negligible (spec "1100 K
/// threshold").
const BAKER_JUST_THRESHOLD_K: f64 = 1100.0;
/// Baker-Just parabolic rate constant, (m^2/s) pre-exponential factor.
const BAKER_JUST_A_M2_PER_S: f64 = 2.874e-5;
/// Baker-Just activation energy over the gas constant, K.
const BAKER_JUST_EA_OVER_R_K: f64 = 22_898.0;
/// Reaction enthalpy for Zr + 2H2O -> ZrO2 + 2H2, J per kg Zr reacted.
const REACTION_ENTHALPY_J_PER_KG_ZR: f64 = 6.45e6;
/// Molar mass of zirconium, kg/mol.
const ZR_MOLAR_MASS_KG_PER_MOL: f64 = 0.09122;

/// Baker-Just reaction rate returned as the instantaneous rate of change
/// of the oxidized fraction, 1/s.
fn reacted_fraction_rate_per_s(temperature_k: f64, fraction_reacted: f64, thickness_m: f64) -> f64 {
    if temperature_k < BAKER_JUST_THRESHOLD_K || thickness_m <= 0.0 {
        return 0.0;
    }
    let k = BAKER_JUST_A_M2_PER_S * (-BAKER_JUST_EA_OVER_R_K / temperature_k).exp();
    // Parabolic growth law d(x^2)/dt = k/L^2 rewritten as dx/dt, with a
    // small floor on x to avoid a singular rate at the very start of
    // reaction.
    let x = fraction_reacted.max(1.0e-4);
    k / (thickness_m * thickness_m) / (2.0 * x)
}

pub struct OxidationOperator;

impl RateOperator for OxidationOperator {
    fn name(&self) -> &str {
        "oxidation"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        for node in &state.thermal_nodes {
            let Some(ox) = &node.oxidation else { continue };
            let dx_dt = reacted_fraction_rate_per_s(
                node.temperature_k,
                ox.fraction_reacted,
                node.characteristic_length_m,
            );
            if dx_dt <= 0.0 {
                continue;
            }
            let d_zr_mass_dt = dx_dt * ox.zr_mass_kg;
            let heat_w = d_zr_mass_dt * REACTION_ENTHALPY_J_PER_KG_ZR;
            let capacity = node.thermal_capacity_j_per_k().max(f64::MIN_POSITIVE);
            rates.d_temperature_dt[node.id.idx()] += heat_w / capacity;
        }

        Ok(rates)
    }
}

/// Molar hydrogen production rate for a given Zr mass reaction rate, 2 mol
/// H2 per mol Zr (spec "H2 produced at 2 mol per mol Zr"). Exposed for the
/// simulation facade's post-step oxidation bookkeeping.
pub fn h2_production_rate_mol_per_s(d_zr_mass_dt_kg_per_s: f64) -> f64 {
    2.0 * d_zr_mass_dt_kg_per_s / ZR_MOLAR_MASS_KG_PER_MOL
}

/// Public wrapper so the simulation facade can advance `fraction_reacted`
/// and `h2_produced_mol` with the same kinetics this operator uses for the
/// heat term.
pub fn reacted_fraction_rate(temperature_k: f64, fraction_reacted: f64, thickness_m: f64) -> f64 {
    reacted_fraction_rate_per_s(temperature_k, fraction_reacted, thickness_m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_no_reaction() {
        assert_eq!(reacted_fraction_rate_per_s(900.0, 0.0, 6.0e-4), 0.0);
    }

    #[test]
    fn above_threshold_reacts() {
        let rate = reacted_fraction_rate_per_s(1400.0, 0.01, 6.0e-4);
        assert!(rate > 0.0);
    }

    #[test]
    fn hotter_cladding_reacts_faster() {
        let slow = reacted_fraction_rate_per_s(1200.0, 0.01, 6.0e-4);
        let fast = reacted_fraction_rate_per_s(1800.0, 0.01, 6.0e-4);
        assert!(fast > slow);
    }
}
