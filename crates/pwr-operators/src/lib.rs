//! The operator framework (spec §4.3, §4.4): `RateOperator` and
//! `ConstraintOperator` traits, an ordered [`OperatorRegistry`], and the
//! physics operator set the RK45 engine drives each step.

mod hydraulics;

pub mod error;
pub mod rate;
pub mod constraint;
pub mod registry;
pub mod traits;

pub use error::{OpError, OpResult};
pub use registry::OperatorRegistry;
pub use traits::{ConstraintOperator, RateOperator};
