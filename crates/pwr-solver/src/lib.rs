//! Adaptive Dormand-Prince (DOPRI5) engine driving the operator set built
//! in `pwr-operators` across each simulated step (spec §4.5, §4.6).

pub mod butcher;
pub mod dopri5;
pub mod engine;
pub mod error;
pub mod metrics;

pub use engine::Dopri5Engine;
pub use error::{SolverError, SolverResult};
pub use metrics::{AdvanceMetrics, StepMetrics};
