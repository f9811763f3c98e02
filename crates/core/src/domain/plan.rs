// Deploy Plan & Outcome

use super::process::StepCommand;
use crate::application::constants::FAILURE_EXIT_CODE;
use crate::error::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The two dependent steps and the directory they run in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployPlan {
    pub working_dir: PathBuf,
    /// Step A: install the migration tool
    pub install: StepCommand,
    /// Step B: run the migration `deploy` command
    pub migrate: StepCommand,
}

impl DeployPlan {
    pub fn new(working_dir: impl Into<PathBuf>, install: StepCommand, migrate: StepCommand) -> Self {
        Self {
            working_dir: working_dir.into(),
            install,
            migrate,
        }
    }

    /// Reject plans that could never spawn anything
    pub fn validate(&self) -> Result<()> {
        if self.working_dir.as_os_str().is_empty() {
            return Err(DeployError::Config(
                "working_dir cannot be empty".to_string(),
            ));
        }
        for (name, step) in [("install", &self.install), ("migrate", &self.migrate)] {
            if step.program.trim().is_empty() {
                return Err(DeployError::Config(format!(
                    "{}.program cannot be empty",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Final verdict of a deploy run (decided by step B only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    Succeeded,
    Failed { exit_code: i32 },
}

impl DeployOutcome {
    pub fn from_migrate_exit(exit_code: i32) -> Self {
        if exit_code == 0 {
            DeployOutcome::Succeeded
        } else {
            DeployOutcome::Failed { exit_code }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeployOutcome::Succeeded)
    }

    /// Status the process should exit with. Always 1 on failure, whatever
    /// the migrate step actually returned.
    pub fn process_exit_code(&self) -> u8 {
        match self {
            DeployOutcome::Succeeded => 0,
            DeployOutcome::Failed { .. } => FAILURE_EXIT_CODE,
        }
    }
}
