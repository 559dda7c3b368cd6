//! Solid thermal masses (fuel pellets, cladding, structure, heat-sink walls).

use pwr_core::ThermalNodeId;
use serde::{Deserialize, Serialize};

/// Cladding oxidation bookkeeping, present only on nodes configured for
/// Baker-Just kinetics (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OxidationRecord {
    /// Fraction of original cladding thickness consumed, in [0,1].
    pub fraction_reacted: f64,
    /// Cumulative hydrogen produced, in mol.
    pub h2_produced_mol: f64,
    /// Cladding mass available for the Baker-Just reaction, in kg.
    pub zr_mass_kg: f64,
}

impl OxidationRecord {
    pub fn new(zr_mass_kg: f64) -> Self {
        Self {
            fraction_reacted: 0.0,
            h2_produced_mol: 0.0,
            zr_mass_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalNode {
    pub id: ThermalNodeId,
    pub label: String,
    pub temperature_k: f64,
    pub mass_kg: f64,
    pub specific_heat_j_per_kgk: f64,
    pub conductivity_w_per_mk: f64,
    pub characteristic_length_m: f64,
    pub surface_area_m2: f64,
    /// Static heat generation, W. Superseded by point-kinetics power on
    /// fuel-flagged nodes (spec §4.3 "Heat generation").
    pub heat_generation_w: f64,
    pub max_temperature_k: f64,
    pub is_fuel: bool,
    pub oxidation: Option<OxidationRecord>,
}

impl ThermalNode {
    pub fn thermal_capacity_j_per_k(&self) -> f64 {
        self.mass_kg * self.specific_heat_j_per_kgk
    }
}
