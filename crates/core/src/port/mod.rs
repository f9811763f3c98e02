// Port Layer - Interfaces for external dependencies

pub mod command_executor;
pub mod reporter;
pub mod time_provider; // For deterministic durations

// Re-exports
pub use command_executor::{CommandExecutor, ExecutionError};
pub use reporter::Reporter;
pub use time_provider::TimeProvider;
