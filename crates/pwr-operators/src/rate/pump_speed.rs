//! Pump ramp-up/coast-down dynamics (spec §4.3).

use pwr_state::{SimulationState, StateRates};

use crate::error::OpResult;
use crate::traits::RateOperator;

pub struct PumpSpeedOperator;

impl RateOperator for PumpSpeedOperator {
    fn name(&self) -> &str {
        "pump_speed"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        for pump in &state.pumps {
            let rate = if pump.running && pump.effective_speed < pump.target_speed {
                pump.target_speed / pump.ramp_up_time_s.max(1e-6)
            } else if !pump.running && pump.effective_speed > 0.0 {
                -1.0 / pump.coast_down_time_s.max(1e-6)
            } else {
                0.0
            };
            rates.d_effective_speed_dt[pump.id.idx()] = rate;
        }

        Ok(rates)
    }
}
