//! Static topology linking thermal nodes and flow nodes.

use pwr_core::{ConnId, FlowNodeId, ThermalNodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalConnection {
    pub id: ConnId,
    pub from: ThermalNodeId,
    pub to: ThermalNodeId,
    /// Conductance, W/K.
    pub conductance_w_per_k: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvectionConnection {
    pub id: ConnId,
    pub solid: ThermalNodeId,
    pub fluid: FlowNodeId,
    pub surface_area_m2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlowConnectionFlags {
    pub check_valve: bool,
    pub is_break: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowConnection {
    pub id: ConnId,
    pub from: FlowNodeId,
    pub to: FlowNodeId,
    pub flow_area_m2: f64,
    pub hydraulic_diameter_m: f64,
    pub length_m: f64,
    pub elevation_delta_m: f64,
    pub from_elevation_m: Option<f64>,
    pub to_elevation_m: Option<f64>,
    /// Lumped minor + friction resistance coefficient (dimensionless, used
    /// in the K in the quasi-static orifice equation).
    pub resistance_k: f64,
    pub mass_flow_rate_kgps: f64,
    pub flags: FlowConnectionFlags,
}

impl FlowConnection {
    /// Inertance I = L/A, used to decide whether ṁ is integrated (I > 0)
    /// or computed quasi-statically each step (spec §3, §4.3).
    pub fn inertance(&self) -> f64 {
        if self.flow_area_m2 > 0.0 {
            self.length_m / self.flow_area_m2
        } else {
            0.0
        }
    }

    pub fn has_inertance(&self) -> bool {
        self.inertance() > 0.0
    }
}
