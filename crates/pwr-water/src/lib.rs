//! The water-property backend (spec §4.1): a process-wide, read-only
//! service that closes (mass, internal energy, volume) into
//! (temperature, pressure, phase, quality) from IAPWS-derived tables.

pub mod backend;
pub mod bulk_modulus;
pub mod data;
pub mod dome;
pub mod error;
pub mod grid;
pub mod ncg;
pub mod state;

pub use backend::WaterBackend;
pub use error::{WaterError, WaterResult};
pub use ncg::NcgComposition;
pub use state::{Phase, ThermoResult};
