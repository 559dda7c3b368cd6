//! Turbine work extraction and condenser heat rejection (spec §4.3).
//!
//! The data model has no dedicated turbine/condenser component, so the
//! turbine inlet/outlet flow path is found the same way neutronics finds
//! its fuel/coolant nodes when no explicit id is wired up: by label. A
//! condenser is any flow node configured with `heat_sink` properties.

use pwr_state::{FlowNode, SimulationState, StateRates};
use pwr_water::Phase;

use crate::error::OpResult;
use crate::traits::RateOperator;

const TURBINE_INLET_LABEL: &str = "turbine_inlet";
const TURBINE_OUTLET_LABEL: &str = "turbine_outlet";
/// Isentropic efficiency assumed for the turbine stage; the data model
/// carries no turbine component to source this from.
const TURBINE_EFFICIENCY: f64 = 0.85;
const PRESSURE_RATIO_EXPONENT: f64 = 0.3;

const CONDENSER_MAX_POWER_W: f64 = 800.0e6;
/// Quality below which condenser heat rejection is scaled down linearly,
/// so a nearly-saturated-liquid node doesn't keep "condensing" forever.
const CONDENSER_QUALITY_SCALE_FLOOR: f64 = 0.1;

fn bulk_specific_enthalpy(node: &FlowNode) -> f64 {
    let specific_volume = node.volume_m3 / node.fluid.mass_kg.max(pwr_state::MASS_FLOOR_KG);
    node.fluid.specific_internal_energy() + node.fluid.pressure_pa * specific_volume
}

pub struct TurbineCondenserOperator;

impl RateOperator for TurbineCondenserOperator {
    fn name(&self) -> &str {
        "turbine_condenser"
    }

    fn evaluate(&self, state: &SimulationState) -> OpResult<StateRates> {
        let mut rates = StateRates::zeros_like(state);

        if let (Some(inlet), Some(outlet)) = (
            state.flow_nodes.iter().find(|n| n.label == TURBINE_INLET_LABEL),
            state.flow_nodes.iter().find(|n| n.label == TURBINE_OUTLET_LABEL),
        ) {
            let conn = state
                .flow_connections
                .iter()
                .find(|c| (c.from == inlet.id && c.to == outlet.id) || (c.from == outlet.id && c.to == inlet.id));

            if let Some(conn) = conn {
                let mdot = conn.mass_flow_rate_kgps.abs();
                let h_in = bulk_specific_enthalpy(inlet);
                let pressure_ratio = (outlet.fluid.pressure_pa / inlet.fluid.pressure_pa.max(1.0))
                    .clamp(0.0, 1.0);
                let work_per_kg = h_in * (1.0 - pressure_ratio.powf(PRESSURE_RATIO_EXPONENT));
                let shaft_power_w = mdot * TURBINE_EFFICIENCY * work_per_kg;
                rates.d_energy_dt[outlet.id.idx()] -= shaft_power_w;
            }
        }

        for node in &state.flow_nodes {
            let Some(sink) = &node.heat_sink else { continue };
            let raw_q = sink.ua_w_per_k * (node.fluid.temperature_k - sink.sink_temperature_k).max(0.0);
            let quality_scale = match node.fluid.phase {
                Phase::TwoPhase => (node.fluid.quality / CONDENSER_QUALITY_SCALE_FLOOR).min(1.0),
                _ => 1.0,
            };
            let q = (raw_q * quality_scale).min(CONDENSER_MAX_POWER_W);
            rates.d_energy_dt[node.id.idx()] -= q;
        }

        Ok(rates)
    }
}
