// Command Executor Port
// Abstraction for running one external step to completion

use crate::domain::{ProcessResult, StepCommand};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Execution errors
///
/// A child that runs and exits non-zero is NOT an error; it comes back as a
/// `ProcessResult` with that exit code.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed for '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Command Executor trait
///
/// Implementations:
/// - SubprocessExecutor (infra-system): spawns a real child process
/// - mocks::MockCommandExecutor: scripted results for tests
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` with `working_dir` as the child's cwd and wait for it to exit
    ///
    /// The caller's own current directory is never changed.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the executable is missing or cannot start
    /// - ExecutionError::IoError if collecting the child's output fails
    async fn run(
        &self,
        command: &StepCommand,
        working_dir: &Path,
    ) -> Result<ProcessResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Scripted behavior for one invocation
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Child exits with the given code and output
        Exit {
            code: i32,
            stdout: String,
            stderr: String,
        },
        /// Executable cannot be spawned
        SpawnFail(String),
    }

    impl MockBehavior {
        pub fn exit(code: i32) -> Self {
            MockBehavior::Exit {
                code,
                stdout: String::new(),
                stderr: String::new(),
            }
        }

        pub fn output(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
            MockBehavior::Exit {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            }
        }
    }

    /// One recorded call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Invocation {
        pub command: StepCommand,
        pub working_dir: PathBuf,
    }

    /// Mock Command Executor for testing
    ///
    /// Behaviors are consumed in call order; once exhausted every call exits 0.
    pub struct MockCommandExecutor {
        script: Arc<Mutex<VecDeque<MockBehavior>>>,
        calls: Arc<Mutex<Vec<Invocation>>>,
    }

    impl MockCommandExecutor {
        pub fn new(script: impl IntoIterator<Item = MockBehavior>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into_iter().collect())),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Step A exits `install`, step B exits `migrate`
        pub fn with_exit_codes(install: i32, migrate: i32) -> Self {
            Self::new([MockBehavior::exit(install), MockBehavior::exit(migrate)])
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Programs in the order they were invoked
        pub fn call_order(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .map(|c| c.command.program)
                .collect()
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn run(
            &self,
            command: &StepCommand,
            working_dir: &Path,
        ) -> Result<ProcessResult, ExecutionError> {
            self.calls.lock().unwrap().push(Invocation {
                command: command.clone(),
                working_dir: working_dir.to_path_buf(),
            });

            let behavior = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| MockBehavior::exit(0));

            match behavior {
                MockBehavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(ProcessResult::new(code, stdout, stderr)),
                MockBehavior::SpawnFail(reason) => Err(ExecutionError::SpawnFailed {
                    program: command.program.clone(),
                    reason,
                }),
            }
        }
    }
}
