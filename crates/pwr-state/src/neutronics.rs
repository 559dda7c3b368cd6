//! Point-kinetics reactor state (spec §3, §4.3).

use pwr_core::{CompId, CoreId, ThermalNodeId};
use serde::{Deserialize, Serialize};

/// Feedback coefficients and reference conditions for the reactivity sum
/// ρ = ρ_rod + ρ_Doppler + ρ_coolant_T + ρ_coolant_density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCoefficients {
    /// Doppler coefficient, Δk/k per K (typically negative).
    pub fuel_temp_coeff_per_k: f64,
    /// Moderator/coolant temperature coefficient, Δk/k per K.
    pub coolant_temp_coeff_per_k: f64,
    /// Moderator/coolant density coefficient, Δk/k per (kg/m^3).
    pub coolant_density_coeff_per_kgm3: f64,
    pub reference_fuel_temp_k: f64,
    pub reference_coolant_temp_k: f64,
    pub reference_coolant_density_kgm3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScramState {
    pub scrammed: bool,
    pub scram_time_s: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutronicsState {
    pub core_id: CoreId,
    pub fuel_node_id: Option<ThermalNodeId>,
    pub coolant_node_id: Option<ThermalNodeId>,
    /// Optional component this neutronics record is wired to a control-rod
    /// drive for (searched by label if unset, per spec §4.3).
    pub control_rod_comp_id: Option<CompId>,

    pub power_w: f64,
    pub nominal_power_w: f64,
    pub reactivity: f64,
    /// Prompt neutron generation time, s.
    pub lambda_gen_s: f64,
    /// Delayed-neutron fraction (1 group).
    pub beta: f64,
    /// Delayed-neutron decay constant, 1/s.
    pub decay_lambda_per_s: f64,
    /// Precursor concentration, normalized to N = P/P_nom units.
    pub precursor_concentration: f64,

    pub feedback: FeedbackCoefficients,

    /// Control rod position, 0 = fully inserted, 1 = fully withdrawn.
    pub control_rod_position: f64,
    /// Full-insertion worth, Δk/k (negative).
    pub control_rod_worth: f64,

    pub decay_heat_fraction: f64,
    pub scram: ScramState,
}

/// Relative power N = P/P_nom below which the post-scram standby branch may
/// activate (spec §4.3).
pub const STANDBY_POWER_FRACTION: f64 = 0.01;
pub const STANDBY_PRECURSOR_FLOOR: f64 = 1.0e-10;
pub const MIN_RELATIVE_POWER: f64 = 1.0e-10;

impl NeutronicsState {
    pub fn relative_power(&self) -> f64 {
        self.power_w / self.nominal_power_w.max(f64::MIN_POSITIVE)
    }
}
