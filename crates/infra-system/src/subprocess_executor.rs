// Subprocess executor
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::process::Command;
use tracing::info;

use migrate_runner_core::domain::{ProcessResult, StepCommand};
use migrate_runner_core::port::{CommandExecutor, ExecutionError, TimeProvider};

/// Exit code reported when a child has neither a code nor a signal
const UNKNOWN_EXIT_CODE: i32 = -1;

/// Subprocess executor
/// Spawns one child per step with an explicit cwd and captured text output
pub struct SubprocessExecutor {
    time_provider: Arc<dyn TimeProvider>,
    env_allowlist: Option<Vec<String>>,
}

impl SubprocessExecutor {
    /// Create a new subprocess executor
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    /// * `env_allowlist` - Variables passed through to children. `None` inherits
    ///   the full environment.
    ///
    /// # Example
    /// ```ignore
    /// let executor = SubprocessExecutor::new(
    ///     Arc::new(SystemTimeProvider),
    ///     Some(vec!["PATH".to_string(), "HOME".to_string(), "DATABASE_URL".to_string()]),
    /// );
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, env_allowlist: Option<Vec<String>>) -> Self {
        Self {
            time_provider,
            env_allowlist,
        }
    }

    /// Filter environment variables to allowlist only
    fn filter_env<I>(&self, env: I) -> Vec<(String, String)>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        match &self.env_allowlist {
            Some(allowlist) => env
                .into_iter()
                .filter(|(k, _)| allowlist.contains(k))
                .collect(),
            None => env.into_iter().collect(),
        }
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        command: &StepCommand,
        working_dir: &Path,
    ) -> Result<std::process::Output, ExecutionError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if self.env_allowlist.is_some() {
            // Non-UTF-8 variables are dropped; vars() would panic on them
            let inherited = std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
            cmd.env_clear().envs(self.filter_env(inherited));
        }

        let child = cmd.spawn().map_err(|e| ExecutionError::SpawnFailed {
            program: command.program.clone(),
            reason: e.to_string(),
        })?;

        child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::IoError(e.to_string()))
    }

    /// Build execution result from process output
    fn build_result(&self, output: std::process::Output, duration_ms: i64) -> ProcessResult {
        ProcessResult {
            exit_code: exit_code_of(&output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms,
        }
    }
}

/// Exit code, or the negated signal number for signal-terminated children
fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    UNKNOWN_EXIT_CODE
}

#[async_trait]
impl CommandExecutor for SubprocessExecutor {
    async fn run(
        &self,
        command: &StepCommand,
        working_dir: &Path,
    ) -> Result<ProcessResult, ExecutionError> {
        let start_time = self.time_provider.now_millis();

        info!(
            command = %command.program,
            args = ?command.args,
            working_dir = %working_dir.display(),
            "Starting subprocess execution"
        );

        let output = self.spawn_and_wait(command, working_dir).await?;

        let end_time = self.time_provider.now_millis();
        let duration_ms = end_time - start_time;

        let result = self.build_result(output, duration_ms);

        info!(
            command = %command.program,
            duration_ms = %duration_ms,
            exit_code = result.exit_code,
            "Subprocess execution completed"
        );

        Ok(result)
    }
}
