//! Fluid control volumes.

use pwr_core::FlowNodeId;
use pwr_water::{NcgComposition, Phase};
use serde::{Deserialize, Serialize};

/// Floor below which a flow node's mass is not allowed to fall; protects the
/// water backend's closure from dividing by (near) zero (spec §3 invariant
/// "no flow node has mass < mass_floor after a successful step").
pub const MASS_FLOOR_KG: f64 = 1.0e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    pub mass_kg: f64,
    pub internal_energy_j: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub phase: Phase,
    pub quality: f64,
    pub ncg: Option<NcgComposition>,
}

impl FluidState {
    pub fn specific_internal_energy(&self) -> f64 {
        self.internal_energy_j / self.mass_kg.max(MASS_FLOOR_KG)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HeatSinkProperties {
    pub ua_w_per_k: f64,
    pub sink_temperature_k: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub id: FlowNodeId,
    pub label: String,
    pub fluid: FluidState,
    pub volume_m3: f64,
    pub hydraulic_diameter_m: f64,
    pub flow_area_m2: f64,
    pub elevation_m: f64,
    pub height_m: Option<f64>,
    pub heat_sink: Option<HeatSinkProperties>,
    pub container: Option<FlowNodeId>,
}

impl FlowNode {
    pub fn density_kg_per_m3(&self) -> f64 {
        self.fluid.mass_kg / self.volume_m3
    }

    /// Liquid level within the node, from 0 (empty) to 1 (full), estimated
    /// from quality and the node's configured height. Used by the
    /// fluid-flow rate operator to decide whether a connection at a given
    /// elevation draws liquid or vapor from a two-phase node (spec §4.3).
    pub fn liquid_level_fraction(&self) -> f64 {
        match self.fluid.phase {
            Phase::Liquid => 1.0,
            Phase::Vapor | Phase::Supercritical => 0.0,
            Phase::TwoPhase => (1.0 - self.fluid.quality).clamp(0.0, 1.0),
        }
    }
}
