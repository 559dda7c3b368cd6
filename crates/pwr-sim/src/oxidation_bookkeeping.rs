//! Post-step cladding oxidation bookkeeping (spec §4.3 "H2 produced...
//! steam limited by coolant saturation conditions").
//!
//! `pwr_operators::rate::OxidationOperator` only contributes the reaction
//! heat into `StateRates::d_temperature_dt`, since `fraction_reacted` and
//! `h2_produced_mol` have no slot in the rate bag (spec §4.2). This Euler-
//! advances those two cumulative fields once per accepted step, the way
//! the facade is the only layer with a single well-defined `dt` in hand.

use pwr_operators::rate::oxidation::{h2_production_rate_mol_per_s, reacted_fraction_rate};
use pwr_state::SimulationState;

pub fn advance_oxidation_records(mut state: SimulationState, dt: f64) -> SimulationState {
    for node in &mut state.thermal_nodes {
        let Some(ox) = node.oxidation.as_mut() else { continue };

        let dx_dt = reacted_fraction_rate(node.temperature_k, ox.fraction_reacted, node.characteristic_length_m);
        if dx_dt <= 0.0 {
            continue;
        }
        let d_zr_mass_dt = dx_dt * ox.zr_mass_kg;
        let dh2_dt = h2_production_rate_mol_per_s(d_zr_mass_dt);

        ox.fraction_reacted = (ox.fraction_reacted + dx_dt * dt).clamp(0.0, 1.0);
        ox.h2_produced_mol += dh2_dt * dt;
    }
    state
}
