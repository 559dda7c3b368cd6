//! Pumps, valves, check valves, and burst/LOCA records (spec §3).

use pwr_core::{CompId, ConnId, FlowNodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpState {
    pub id: CompId,
    pub running: bool,
    pub target_speed: f64,
    pub effective_speed: f64,
    pub rated_head_m: f64,
    pub rated_flow_kgps: f64,
    pub efficiency: f64,
    pub flow_path: ConnId,
    pub ramp_up_time_s: f64,
    pub coast_down_time_s: f64,
}

impl PumpState {
    pub fn head_fraction(&self) -> f64 {
        if self.target_speed > 0.0 {
            (self.effective_speed / self.target_speed).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValveState {
    pub id: CompId,
    /// 0 = closed, 1 = fully open.
    pub position: f64,
    pub fail_position: f64,
    pub flow_path: ConnId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckValveState {
    pub id: CompId,
    pub flow_path: ConnId,
    pub cracking_pressure_pa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakLocation {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstState {
    pub id: CompId,
    pub node: FlowNodeId,
    pub component_label: String,
    pub is_burst: bool,
    /// Burst threshold pressure, Pa, sampled once at sim start (seeded).
    pub burst_threshold_pa: f64,
    pub break_fraction: f64,
    pub break_location: Option<BreakLocation>,
    /// Shell-side node for heat-exchanger-tube burst records; bursts
    /// compare against the shell rather than the node's container.
    pub shell_node: Option<FlowNodeId>,
    /// The break connection created on first exceedance, if any.
    pub break_connection: Option<ConnId>,
}
