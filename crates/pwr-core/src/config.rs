//! Simulation-wide configuration: solver tuning knobs and the liquid-pressure
//! model switch referenced by spec §9's Open Questions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which closure the `FluidStateConstraint` uses for liquid-node pressure.
///
/// §9 leaves the default ambiguous in the source; this expansion resolves it
/// (see DESIGN.md) by defaulting to `Hybrid`, which is what the constraint
/// description in §4.4 presents as the primary path ("choose either
/// pure-grid pressure or a hybrid pressure...").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PressureModel {
    /// P = P_base(propagated via BFS from the nearest two-phase/vapor node)
    /// + K(T)*(rho - rho_base)/rho_base + hydrostatic terms.
    #[default]
    Hybrid,
    /// Pure-grid / triangulated pressure: no base-pressure propagation, the
    /// (u,v) grid and saturation-anchored inversion alone determine P.
    PureTriangulation,
}

/// Tuning knobs for the Dormand-Prince adaptive engine (spec §4.5).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    pub min_dt: f64,
    pub max_dt: f64,
    pub initial_dt: f64,
    pub relative_tolerance: f64,
    pub safety_factor: f64,
    pub min_shrink: f64,
    pub max_growth: f64,
    pub max_steps_per_frame: usize,
    pub max_wall_time_ms: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_dt: 1e-6,
            max_dt: 0.5,
            initial_dt: 1e-3,
            relative_tolerance: 1e-4,
            safety_factor: 0.9,
            min_shrink: 0.1,
            max_growth: 5.0,
            max_steps_per_frame: 10_000,
            max_wall_time_ms: 50.0,
        }
    }
}

/// The full process-level configuration surface an embedder may set before
/// or between `advance` calls.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    pub solver: SolverConfig,
    pub pressure_model: PressureModel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pressure_model_is_hybrid() {
        assert_eq!(SimulationConfig::default().pressure_model, PressureModel::Hybrid);
    }

    #[test]
    fn solver_config_defaults_sane() {
        let c = SolverConfig::default();
        assert!(c.min_dt > 0.0 && c.min_dt < c.max_dt);
        assert!(c.initial_dt >= c.min_dt && c.initial_dt <= c.max_dt);
        assert!(c.safety_factor > 0.0 && c.safety_factor < 1.0);
        assert!(c.min_shrink > 0.0 && c.min_shrink < 1.0);
        assert!(c.max_growth > 1.0);
    }
}
