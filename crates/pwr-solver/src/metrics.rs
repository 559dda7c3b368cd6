//! Per-step and per-advance diagnostics (spec §4.5, §4.6).

/// Outcome of a single attempted RK45 step (may be a reject).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    pub dt_used: f64,
    pub suggested_next_dt: f64,
    pub error: f64,
    pub sanity_score: f64,
    pub rejected_attempts: usize,
    pub forced_by_min_dt: bool,
}

/// Aggregate metrics exported by one `advance(...)` call, per spec §4.6
/// ("core only reports metrics").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceMetrics {
    pub steps_taken: usize,
    pub steps_rejected: usize,
    pub min_dt_used: f64,
    pub max_dt_used: f64,
    pub last_dt_used: f64,
    pub sum_dt_used: f64,
    pub sim_time_advanced_s: f64,
    pub wall_time_ms: f64,
    pub hit_step_limit: bool,
    pub hit_wall_time_limit: bool,
}

impl AdvanceMetrics {
    pub fn new() -> Self {
        Self {
            steps_taken: 0,
            steps_rejected: 0,
            min_dt_used: f64::INFINITY,
            max_dt_used: 0.0,
            last_dt_used: 0.0,
            sum_dt_used: 0.0,
            sim_time_advanced_s: 0.0,
            wall_time_ms: 0.0,
            hit_step_limit: false,
            hit_wall_time_limit: false,
        }
    }

    pub fn avg_dt_used(&self) -> f64 {
        if self.steps_taken == 0 {
            0.0
        } else {
            self.sum_dt_used / self.steps_taken as f64
        }
    }

    /// Ratio of simulated time to wall time spent producing it; > 1 means
    /// the engine is running faster than real time.
    pub fn real_time_ratio(&self) -> f64 {
        if self.wall_time_ms <= 0.0 {
            f64::INFINITY
        } else {
            self.sim_time_advanced_s / (self.wall_time_ms / 1000.0)
        }
    }

    pub fn record_accepted(&mut self, dt_used: f64) {
        self.steps_taken += 1;
        self.sim_time_advanced_s += dt_used;
        self.sum_dt_used += dt_used;
        self.min_dt_used = self.min_dt_used.min(dt_used);
        self.max_dt_used = self.max_dt_used.max(dt_used);
        self.last_dt_used = dt_used;
    }

    pub fn record_reject(&mut self) {
        self.steps_rejected += 1;
    }
}

impl Default for AdvanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metrics_have_zero_ratio_fields() {
        let m = AdvanceMetrics::new();
        assert_eq!(m.steps_taken, 0);
        assert_eq!(m.avg_dt_used(), 0.0);
    }

    #[test]
    fn record_accepted_tracks_min_max_avg() {
        let mut m = AdvanceMetrics::new();
        m.record_accepted(0.1);
        m.record_accepted(0.3);
        assert_eq!(m.steps_taken, 2);
        assert!((m.min_dt_used - 0.1).abs() < 1e-12);
        assert!((m.max_dt_used - 0.3).abs() < 1e-12);
        assert!((m.avg_dt_used() - 0.2).abs() < 1e-12);
    }
}
