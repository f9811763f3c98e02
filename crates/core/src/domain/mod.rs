// Domain Layer - Deploy plan, step commands and process results

pub mod plan;
pub mod process;

// Re-exports
pub use plan::{DeployOutcome, DeployPlan};
pub use process::{ProcessResult, StepCommand};
