// Central Error Type for the Deploy Runner

use std::path::PathBuf;
use thiserror::Error;

/// Runner-level error type
///
/// A non-zero exit from the migrate step is NOT an error: it is reported
/// through `DeployOutcome::Failed`.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Environment error: working directory '{}' is unusable: {reason}", .path.display())]
    Environment { path: PathBuf, reason: String },

    #[error("Execution error: {0}")]
    Execution(#[from] crate::port::ExecutionError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using DeployError
pub type Result<T> = std::result::Result<T, DeployError>;
