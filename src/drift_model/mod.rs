//! drift_model - engine-agnostic arcade car forces (pure types + solver)

pub mod types;
pub mod longitudinal;
pub mod steering;
pub mod lateral;
pub mod solve;

pub use types::*;
pub use steering::YawCommand;
pub use solve::{solve_step, Diagnostics, ForcePlan};
