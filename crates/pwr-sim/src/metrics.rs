//! Host-facing metrics shaped after spec §6's `advance` return contract
//! (`currentDt, minDtUsed, subcycleCount, totalSteps, retriesThisFrame,
//! realTimeRatio, isFallingBehind`).

use pwr_solver::AdvanceMetrics;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationMetrics {
    pub current_dt: f64,
    pub min_dt_used: f64,
    pub subcycle_count: usize,
    pub total_steps: usize,
    pub retries_this_frame: usize,
    pub real_time_ratio: f64,
    pub is_falling_behind: bool,
}

impl From<AdvanceMetrics> for SimulationMetrics {
    fn from(m: AdvanceMetrics) -> Self {
        Self {
            current_dt: m.last_dt_used,
            min_dt_used: if m.min_dt_used.is_finite() { m.min_dt_used } else { 0.0 },
            subcycle_count: m.steps_taken,
            total_steps: m.steps_taken,
            retries_this_frame: m.steps_rejected,
            real_time_ratio: m.real_time_ratio(),
            is_falling_behind: m.hit_step_limit || m.hit_wall_time_limit,
        }
    }
}
