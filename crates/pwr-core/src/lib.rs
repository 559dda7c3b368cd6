//! pwr-core: stable foundation for the reactor plant numerical engine.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for nodes/connections/components)
//! - error (shared error type)
//! - config (solver + simulation configuration)

pub mod config;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use config::{PressureModel, SimulationConfig, SolverConfig};
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
