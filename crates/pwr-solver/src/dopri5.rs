//! Single DOPRI5 step attempt: stage evaluation, pre-sanity screening, and
//! the normalized error/sanity scores the engine uses to accept or reject
//! a candidate step (spec §4.5 steps 1-6).

use pwr_core::units::constants::T_TRIPLE_K;
use pwr_operators::OperatorRegistry;
use pwr_state::{apply_rates_to_state, SimulationState, StateRates, MASS_FLOOR_KG};

use crate::butcher::{A, B4, B5};
use crate::error::SolverResult;

/// Volume/mass above which a stage state is considered to have blown up
/// (spec §4.5 step 5's "specific volume > 10^7 mL/kg" = 10 m^3/kg).
const PRE_SANITY_MAX_SPECIFIC_VOLUME_M3_PER_KG: f64 = 10.0;
const PRE_SANITY_MIN_MASS_KG: f64 = 0.1;
/// Sentinel error returned for a pre-sanity failure, large enough that any
/// realistic tolerance rejects it (spec §4.5 step 5).
pub const PRE_SANITY_SENTINEL_ERROR: f64 = 1.0e10;

const REFERENCE_FLOW_KGPS: f64 = 100.0;
const THERMAL_SCALE_K: f64 = 1000.0;
const THROUGHPUT_WEIGHT: f64 = 0.3;

const SANITY_PRESSURE_REL_THRESHOLD: f64 = 0.20;
const SANITY_MASS_REL_THRESHOLD: f64 = 0.20;
const SANITY_TEMP_MIN_K: f64 = 250.0;
const SANITY_TEMP_MAX_K: f64 = 2500.0;

/// Outcome of one DOPRI5 attempt at a fixed `dt`. `candidate` is the
/// post-constraint 5th-order solution; undefined/unused if
/// `pre_sanity_failed` is set.
pub struct StepAttempt {
    pub candidate: SimulationState,
    pub rk_error: f64,
    pub sanity_score: f64,
    pub pre_sanity_failed: bool,
}

fn pre_sanity_pass(state: &SimulationState) -> bool {
    for node in &state.flow_nodes {
        let mass = node.fluid.mass_kg;
        if !mass.is_finite() || mass < PRE_SANITY_MIN_MASS_KG {
            return false;
        }
        if !node.fluid.internal_energy_j.is_finite() || node.fluid.internal_energy_j < 0.0 {
            return false;
        }
        let v = node.volume_m3 / mass;
        if !v.is_finite() || v > PRE_SANITY_MAX_SPECIFIC_VOLUME_M3_PER_KG {
            return false;
        }
    }
    for node in &state.thermal_nodes {
        if !node.temperature_k.is_finite() {
            return false;
        }
    }
    for conn in &state.flow_connections {
        if !conn.mass_flow_rate_kgps.is_finite() {
            return false;
        }
    }
    if let Some(n) = &state.neutronics {
        if !n.power_w.is_finite() || !n.precursor_concentration.is_finite() {
            return false;
        }
    }
    true
}

/// Total |mdot| of connections touching `node_id`, used for the
/// throughput term in the mass-component error scale.
fn node_throughput_kgps(state: &SimulationState, node_id: pwr_core::FlowNodeId) -> f64 {
    state
        .flow_connections
        .iter()
        .filter(|c| c.from == node_id || c.to == node_id)
        .map(|c| c.mass_flow_rate_kgps.abs())
        .sum()
}

fn combine(stage_rates: &[StateRates], weights: &[f64]) -> StateRates {
    let mut iter = stage_rates.iter().zip(weights.iter());
    let (first_rate, first_w) = iter.next().expect("at least one stage");
    let mut acc = first_rate * *first_w;
    for (rate, w) in iter {
        if *w == 0.0 {
            continue;
        }
        acc = &acc + &(rate * *w);
    }
    acc
}

/// Normalized L2 error between the 5th- and 4th-order solutions (spec
/// §4.5 step 4).
fn rk_error_norm(y: &SimulationState, error_rates: &StateRates, dt: f64) -> f64 {
    let mut sum_sq = 0.0;
    let mut count = 0usize;

    for (i, node) in y.flow_nodes.iter().enumerate() {
        let throughput_term = THROUGHPUT_WEIGHT * node_throughput_kgps(y, node.id) / node.fluid.mass_kg.max(MASS_FLOOR_KG);
        let mass_scale = node.fluid.mass_kg.max(MASS_FLOOR_KG) * (1.0 + throughput_term);
        let energy_scale = node.fluid.internal_energy_j.abs().max(1.0);
        sum_sq += (error_rates.d_mass_dt[i] / mass_scale).powi(2);
        sum_sq += (error_rates.d_energy_dt[i] / energy_scale).powi(2);
        count += 2;
    }

    for (i, conn) in y.flow_connections.iter().enumerate() {
        let flow_scale = REFERENCE_FLOW_KGPS.max(conn.mass_flow_rate_kgps.abs());
        sum_sq += (error_rates.d_mdot_dt[i] / flow_scale).powi(2);
        count += 1;
    }

    for i in 0..y.thermal_nodes.len() {
        sum_sq += (error_rates.d_temperature_dt[i] / THERMAL_SCALE_K).powi(2);
        count += 1;
    }

    if let Some(n) = &y.neutronics {
        let power_scale = n.power_w.abs().max(1.0);
        let precursor_scale = n.precursor_concentration.abs().max(1.0e-12);
        sum_sq += (error_rates.d_power_dt / power_scale).powi(2);
        sum_sq += (error_rates.d_precursor_dt / precursor_scale).powi(2);
        count += 2;
    }

    if count == 0 {
        return 0.0;
    }
    dt * (sum_sq / count as f64).sqrt()
}

/// Post-constraint plausibility score (spec §4.5 step 6). A score `<= 1.0`
/// means the step looks physically reasonable; values above 1 scale the
/// effective error up so the step is more likely to be rejected.
fn sanity_score(y: &SimulationState, candidate: &SimulationState, dt: f64) -> f64 {
    let mut worst: f64 = 0.0;

    for (before, after) in y.flow_nodes.iter().zip(&candidate.flow_nodes) {
        let p_rel = (after.fluid.pressure_pa - before.fluid.pressure_pa).abs()
            / before.fluid.pressure_pa.abs().max(1.0);
        worst = worst.max(p_rel / SANITY_PRESSURE_REL_THRESHOLD);

        let throughput = node_throughput_kgps(y, before.id);
        let mass_budget = (throughput * dt / before.fluid.mass_kg.max(MASS_FLOOR_KG)).max(1.0e-6);
        let m_rel = (after.fluid.mass_kg - before.fluid.mass_kg).abs() / before.fluid.mass_kg.max(MASS_FLOOR_KG);
        worst = worst.max(m_rel / (mass_budget * SANITY_MASS_REL_THRESHOLD));

        if !after.fluid.temperature_k.is_finite()
            || after.fluid.temperature_k < T_TRIPLE_K - 10.0
        {
            worst = worst.max(10.0);
        }
    }

    for node in &candidate.thermal_nodes {
        if node.temperature_k < SANITY_TEMP_MIN_K || node.temperature_k > SANITY_TEMP_MAX_K {
            worst = worst.max(2.0);
        }
    }

    for (before, after) in y.flow_connections.iter().zip(&candidate.flow_connections) {
        let flow_scale = REFERENCE_FLOW_KGPS.max(before.mass_flow_rate_kgps.abs());
        let f_rel = (after.mass_flow_rate_kgps - before.mass_flow_rate_kgps).abs() / flow_scale;
        worst = worst.max(f_rel);
    }

    worst
}

/// Attempt one DOPRI5 step of size `dt` from `y`. Performs the full
/// 7-stage evaluation with a constraint pass before every stage's rate
/// evaluation; short-circuits with `pre_sanity_failed` the first time a
/// stage state is caught catastrophically unphysical.
pub fn attempt_step(
    registry: &OperatorRegistry,
    y: &SimulationState,
    dt: f64,
) -> SolverResult<StepAttempt> {
    let y0 = registry.apply_constraints(y)?;
    let mut stage_rates: Vec<StateRates> = Vec::with_capacity(7);
    stage_rates.push(registry.evaluate_rates(&y0)?);

    for i in 0..6 {
        let weights = &A[i][..=i];
        let combined = combine(&stage_rates[..=i], weights);
        let raw_stage = apply_rates_to_state(y, &combined, dt);

        if !pre_sanity_pass(&raw_stage) {
            return Ok(StepAttempt {
                candidate: raw_stage,
                rk_error: PRE_SANITY_SENTINEL_ERROR,
                sanity_score: PRE_SANITY_SENTINEL_ERROR,
                pre_sanity_failed: true,
            });
        }

        let constrained_stage = registry.apply_constraints(&raw_stage)?;
        stage_rates.push(registry.evaluate_rates(&constrained_stage)?);
    }

    let solution_rate = combine(&stage_rates, &B5);
    let candidate_raw = apply_rates_to_state(y, &solution_rate, dt);

    if !pre_sanity_pass(&candidate_raw) {
        return Ok(StepAttempt {
            candidate: candidate_raw,
            rk_error: PRE_SANITY_SENTINEL_ERROR,
            sanity_score: PRE_SANITY_SENTINEL_ERROR,
            pre_sanity_failed: true,
        });
    }

    let candidate = registry.apply_constraints(&candidate_raw)?;

    let error_weights: Vec<f64> = B5.iter().zip(B4.iter()).map(|(b5, b4)| b5 - b4).collect();
    let error_rate = combine(&stage_rates, &error_weights);
    let rk_error = rk_error_norm(y, &error_rate, dt);
    let sanity = sanity_score(&y0, &candidate, dt);

    Ok(StepAttempt {
        candidate,
        rk_error,
        sanity_score: sanity,
        pre_sanity_failed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::{FluidState, FlowNode};
    use pwr_water::Phase;

    fn registry() -> OperatorRegistry {
        OperatorRegistry::default()
    }

    fn toy_state() -> SimulationState {
        let mut state = SimulationState::new();
        state.add_flow_node(FlowNode {
            id: Id::from_index(0),
            label: "toy".into(),
            fluid: FluidState {
                mass_kg: 10.0,
                internal_energy_j: 6.0e6,
                temperature_k: 560.0,
                pressure_pa: 1.5e7,
                phase: Phase::Liquid,
                quality: 0.0,
                ncg: None,
            },
            volume_m3: 0.01,
            hydraulic_diameter_m: 0.05,
            flow_area_m2: 0.002,
            elevation_m: 0.0,
            height_m: None,
            heat_sink: None,
            container: None,
        });
        state
    }

    #[test]
    fn attempt_step_on_quiescent_state_is_sane() {
        let state = toy_state();
        let reg = registry();
        let attempt = attempt_step(&reg, &state, 1.0e-3).unwrap();
        assert!(!attempt.pre_sanity_failed);
        assert!(attempt.rk_error.is_finite());
    }

    #[test]
    fn pre_sanity_rejects_negative_mass() {
        let mut state = toy_state();
        state.flow_nodes[0].fluid.mass_kg = -5.0;
        assert!(!pre_sanity_pass(&state));
    }

    #[test]
    fn pre_sanity_rejects_huge_specific_volume() {
        let mut state = toy_state();
        state.flow_nodes[0].fluid.mass_kg = 1.0e-6;
        state.flow_nodes[0].volume_m3 = 1.0;
        assert!(!pre_sanity_pass(&state));
    }
}
