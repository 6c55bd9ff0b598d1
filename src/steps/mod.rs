//! Ordered, idempotent installation steps.

pub mod executor;
pub mod patch;

pub use executor::{Executor, StepOutcome, StepStatus};
pub use patch::append_once;
