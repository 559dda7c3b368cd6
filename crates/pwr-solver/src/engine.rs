//! The adaptive DOPRI5 engine: the step-size controller around
//! [`crate::dopri5::attempt_step`] and the `advance`/`single_step` runtime
//! contract (spec §4.5, §4.6).

use std::time::Instant;

use pwr_core::config::SolverConfig;
use pwr_operators::OperatorRegistry;
use pwr_state::SimulationState;
use tracing::{trace, warn};

use crate::dopri5::attempt_step;
use crate::error::SolverResult;
use crate::metrics::{AdvanceMetrics, StepMetrics};

/// Extra shrink applied on top of the PI-controller factor when a step is
/// rejected because the post-constraint sanity score (not just raw RK
/// error) was the limiting quantity (spec §4.5 step 7).
const SANITY_REJECT_EXTRA_SHRINK: f64 = 0.25;

pub struct Dopri5Engine {
    registry: OperatorRegistry,
    config: SolverConfig,
}

impl Dopri5Engine {
    pub fn new(registry: OperatorRegistry, config: SolverConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    fn pi_factor(&self, effective_error: f64) -> f64 {
        let tol = self.config.relative_tolerance;
        let raw = self.config.safety_factor * (tol / effective_error.max(1.0e-300)).powf(0.2);
        raw.clamp(self.config.min_shrink, self.config.max_growth)
    }

    /// Attempt a single accepted step starting from `dt_guess`, shrinking
    /// and retrying internally on rejection until either the step is
    /// accepted or `dt` bottoms out at `min_dt` (in which case it is
    /// force-accepted per spec §4.5 step 7).
    pub fn single_step(
        &self,
        state: &SimulationState,
        dt_guess: f64,
    ) -> SolverResult<(SimulationState, StepMetrics)> {
        let mut dt = dt_guess.clamp(self.config.min_dt, self.config.max_dt);
        let mut rejected_attempts = 0usize;

        loop {
            let attempt = attempt_step(&self.registry, state, dt)?;
            let tol = self.config.relative_tolerance;
            let effective_error = attempt.rk_error.max(attempt.sanity_score * tol);
            let at_min_dt = dt <= self.config.min_dt;
            let accept = effective_error <= tol || at_min_dt;

            let mut factor = self.pi_factor(effective_error);
            let sanity_was_limiting = attempt.pre_sanity_failed || attempt.sanity_score * tol > attempt.rk_error;
            if !accept && sanity_was_limiting {
                factor *= SANITY_REJECT_EXTRA_SHRINK;
            }
            let next_dt = (dt * factor).clamp(self.config.min_dt, self.config.max_dt);

            if accept {
                if effective_error > tol {
                    warn!(dt, effective_error, tol, "step force-accepted at minimum dt");
                }
                trace!(dt, effective_error, rejected_attempts, "step accepted");
                return Ok((
                    attempt.candidate,
                    StepMetrics {
                        dt_used: dt,
                        suggested_next_dt: next_dt,
                        error: effective_error,
                        sanity_score: attempt.sanity_score,
                        rejected_attempts,
                        forced_by_min_dt: effective_error > tol,
                    },
                ));
            }

            trace!(dt, effective_error, tol, "step rejected, shrinking dt");
            rejected_attempts += 1;
            dt = next_dt;
        }
    }

    /// `advance(state, requestedDt)` (spec §4.6): repeatedly steps until
    /// `requestedDt` is consumed or a frame limit fires, carrying the
    /// adapted `dt` across calls via the returned metrics' suggested next
    /// step is not persisted here — callers that want continuity across
    /// frames should track it themselves and pass it back as `dt_guess`.
    pub fn advance(
        &self,
        state: &SimulationState,
        requested_dt: f64,
        mut dt_guess: f64,
    ) -> SolverResult<(SimulationState, AdvanceMetrics)> {
        const MIN_REMAINING_S: f64 = 1.0e-10;

        let started = Instant::now();
        let mut current = state.clone();
        let mut remaining = requested_dt;
        let mut metrics = AdvanceMetrics::new();

        while remaining > MIN_REMAINING_S {
            if metrics.steps_taken >= self.config.max_steps_per_frame {
                metrics.hit_step_limit = true;
                break;
            }
            let wall_ms = started.elapsed().as_secs_f64() * 1000.0;
            if wall_ms >= self.config.max_wall_time_ms {
                metrics.hit_wall_time_limit = true;
                break;
            }

            let step_dt = dt_guess.min(remaining).clamp(self.config.min_dt, self.config.max_dt);
            let (next_state, step_metrics) = self.single_step(&current, step_dt)?;

            current = next_state;
            remaining -= step_metrics.dt_used;
            metrics.record_accepted(step_metrics.dt_used);
            metrics.steps_rejected += step_metrics.rejected_attempts;
            dt_guess = step_metrics.suggested_next_dt;
        }

        metrics.wall_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        Ok((current, metrics))
    }
}
