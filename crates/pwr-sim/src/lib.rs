//! The plant simulation facade: wires `pwr-operators`'s physics set into
//! `pwr-solver`'s DOPRI5 engine and exposes the `advance`/`singleStep`/
//! `triggerScram` runtime contract a host drives (spec §4.6, §6).

pub mod default_registry;
pub mod error;
pub mod metrics;
pub mod oxidation_bookkeeping;
pub mod scram;
pub mod simulation;

pub use default_registry::build_default_registry;
pub use error::{SimError, SimResult};
pub use metrics::SimulationMetrics;
pub use scram::{check_scram_conditions, trigger_scram, ScramCheck};
pub use simulation::Simulation;
