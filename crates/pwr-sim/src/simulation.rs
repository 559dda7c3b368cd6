//! `Simulation`: the facade a game loop or CLI host drives (spec §4.6,
//! §6). Owns the plant state and the configured DOPRI5 engine; wraps each
//! accepted step with the bookkeeping the rate-operator layer couldn't
//! fit into `StateRates` (cladding oxidation's cumulative fields).

use pwr_core::SimulationConfig;
use pwr_operators::OperatorRegistry;
use pwr_solver::{AdvanceMetrics, Dopri5Engine};
use pwr_state::{SimEvent, SimulationState};
use tracing::info;

use crate::default_registry::build_default_registry;
use crate::error::SimResult;
use crate::metrics::SimulationMetrics;
use crate::oxidation_bookkeeping::advance_oxidation_records;
use crate::scram::{check_scram_conditions, trigger_scram, ScramCheck};

pub struct Simulation {
    state: SimulationState,
    engine: Dopri5Engine,
    dt_guess: f64,
}

impl Simulation {
    /// Build a simulation with the default spec §4.3/§4.4 operator set,
    /// in the order [`build_default_registry`] wires it.
    pub fn new(state: SimulationState, config: SimulationConfig) -> Self {
        let registry = build_default_registry(config.pressure_model);
        Self::with_registry(state, registry, config)
    }

    /// Build with a caller-supplied registry, e.g. for tests that isolate
    /// a single operator (spec §8's invariant tests).
    pub fn with_registry(state: SimulationState, registry: OperatorRegistry, config: SimulationConfig) -> Self {
        let dt_guess = config.solver.initial_dt;
        Self {
            state,
            engine: Dopri5Engine::new(registry, config.solver),
            dt_guess,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access for the host mutations spec §6 explicitly permits
    /// between advances: pump running/target speed, valve position,
    /// `neutronics.controlRodPosition`, and pushing into `pendingEvents`.
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// `advance(state, requestedDt)` (spec §4.6): runs accepted DOPRI5
    /// steps until `requestedDt` is consumed or a frame limit fires,
    /// running the oxidation post-step hook after every accepted step.
    pub fn advance(&mut self, requested_dt: f64) -> SimResult<SimulationMetrics> {
        const MIN_REMAINING_S: f64 = 1.0e-10;

        let mut remaining = requested_dt;
        let mut metrics = AdvanceMetrics::new();
        let started = std::time::Instant::now();

        while remaining > MIN_REMAINING_S {
            if metrics.steps_taken >= self.engine.config().max_steps_per_frame {
                self.state.events.push(SimEvent::FrameBudgetExceeded { time_s: self.state.time_s });
                break;
            }
            let wall_ms = started.elapsed().as_secs_f64() * 1000.0;
            if wall_ms >= self.engine.config().max_wall_time_ms {
                self.state.events.push(SimEvent::FrameBudgetExceeded { time_s: self.state.time_s });
                break;
            }

            let step_dt = self
                .dt_guess
                .min(remaining)
                .clamp(self.engine.config().min_dt, self.engine.config().max_dt);
            let (next_state, step_metrics) = self.engine.single_step(&self.state, step_dt)?;

            if step_metrics.rejected_attempts > 0 {
                self.state.events.push(SimEvent::StepRejected {
                    reason: format!("shrunk dt {} times before acceptance", step_metrics.rejected_attempts),
                    time_s: self.state.time_s,
                });
            }

            self.state = advance_oxidation_records(next_state, step_metrics.dt_used);

            remaining -= step_metrics.dt_used;
            metrics.record_accepted(step_metrics.dt_used);
            metrics.steps_rejected += step_metrics.rejected_attempts;
            self.dt_guess = step_metrics.suggested_next_dt;
        }

        metrics.wall_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        if metrics.hit_step_limit || metrics.wall_time_ms >= self.engine.config().max_wall_time_ms {
            info!(steps = metrics.steps_taken, "advance falling behind frame budget");
        }

        Ok(metrics.into())
    }

    /// `singleStep(state) -> {state, dt, error, metrics}` (spec §6), for
    /// debugging: exactly one accepted step, starting from the engine's
    /// current best-guess `dt`.
    pub fn single_step(&mut self) -> SimResult<f64> {
        let (next_state, step_metrics) = self.engine.single_step(&self.state, self.dt_guess)?;
        self.state = advance_oxidation_records(next_state, step_metrics.dt_used);
        self.dt_guess = step_metrics.suggested_next_dt;
        Ok(step_metrics.error)
    }

    pub fn check_scram_conditions(&self) -> ScramCheck {
        check_scram_conditions(&self.state)
    }

    pub fn trigger_scram(&mut self, reason: impl Into<String>) {
        self.state = trigger_scram(&self.state, reason);
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.state.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwr_core::Id;
    use pwr_state::{FluidState, FlowNode};
    use pwr_water::Phase;

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
    fn advance_moves_time_forward_and_reports_metrics() {
        let mut sim = Simulation::new(toy_state(), SimulationConfig::default());
        let metrics = sim.advance(0.01).unwrap();
        assert!((sim.state().time_s - 0.01).abs() < 1e-6);
        assert!(metrics.total_steps > 0);
    }

    #[test]
    fn single_step_advances_by_a_positive_amount() {
        let mut sim = Simulation::new(toy_state(), SimulationConfig::default());
        let before = sim.state().time_s;
        sim.single_step().unwrap();
        assert!(sim.state().time_s > before);
    }

    #[test]
    fn drain_events_empties_the_mailbox() {
        let mut sim = Simulation::new(toy_state(), SimulationConfig::default());
        sim.state_mut().events.push(SimEvent::Scram { reason: "test".into(), time_s: 0.0 });
        let drained = sim.drain_events();
        assert_eq!(drained.len(), 1);
        assert!(sim.drain_events().is_empty());
    }
}
