// Deploy use case: install step, then migrate step
use crate::application::constants::{
    MSG_FAILURE, MSG_INSTALL_RESULT, MSG_MIGRATE_RESULT, MSG_MIGRATE_STDERR, MSG_MIGRATE_STDOUT,
    MSG_START, MSG_SUCCESS,
};
use crate::domain::{DeployOutcome, DeployPlan};
use crate::error::{DeployError, Result};
use crate::port::{CommandExecutor, Reporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Deploy runner
///
/// Runs the install step and then the migrate step, strictly one after the
/// other, in the plan's working directory. Only the migrate step decides the
/// outcome.
pub struct DeployRunner {
    executor: Arc<dyn CommandExecutor>,
    reporter: Arc<dyn Reporter>,
    tag: String,
}

impl DeployRunner {
    /// Create a new deploy runner
    ///
    /// # Arguments
    /// * `executor` - Runs each step to completion
    /// * `reporter` - Receives the tagged console lines
    /// * `tag` - Prefix for every console line (e.g. `[v0]`)
    ///
    /// # Example
    /// ```ignore
    /// let runner = DeployRunner::new(executor, reporter, "[v0]");
    /// let outcome = runner.run(&plan).await?;
    /// std::process::exit(outcome.process_exit_code().into());
    /// ```
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        reporter: Arc<dyn Reporter>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            reporter,
            tag: tag.into(),
        }
    }

    /// Run the deploy sequence
    ///
    /// Algorithm:
    /// 1. Check the working directory; fail before spawning anything if unusable
    /// 2. Run install, report its exit code, carry on whatever it was
    /// 3. Run migrate, report stdout, stderr and exit code
    /// 4. Map migrate's exit code to the outcome
    ///
    /// # Errors
    /// - DeployError::Environment if the working directory is missing, not a directory or unreadable
    /// - DeployError::Execution if either step cannot be spawned
    pub async fn run(&self, plan: &DeployPlan) -> Result<DeployOutcome> {
        let working_dir = ensure_working_dir(&plan.working_dir).await?;

        self.say(MSG_START);

        let install = self.executor.run(&plan.install, &working_dir).await?;
        self.say(&format!("{} {}", MSG_INSTALL_RESULT, install.exit_code));

        if !install.success() {
            // Install failures never stop the migrate step
            warn!(
                command = %plan.install,
                exit_code = install.exit_code,
                stderr = %install.stderr.trim_end(),
                "Install step failed, continuing with migrate step"
            );
        }

        let migrate = self.executor.run(&plan.migrate, &working_dir).await?;
        self.say(&format!(
            "{} {}",
            MSG_MIGRATE_STDOUT,
            migrate.stdout.trim_end_matches('\n')
        ));
        self.say(&format!(
            "{} {}",
            MSG_MIGRATE_STDERR,
            migrate.stderr.trim_end_matches('\n')
        ));
        self.say(&format!("{} {}", MSG_MIGRATE_RESULT, migrate.exit_code));

        let outcome = DeployOutcome::from_migrate_exit(migrate.exit_code);
        match outcome {
            DeployOutcome::Succeeded => {
                info!(command = %plan.migrate, duration_ms = migrate.duration_ms, "Migration deployed");
                self.say(MSG_SUCCESS);
            }
            DeployOutcome::Failed { exit_code } => {
                error!(command = %plan.migrate, exit_code, "Migration failed");
                self.say(&format!("{} {}", MSG_FAILURE, exit_code));
            }
        }

        Ok(outcome)
    }

    fn say(&self, message: &str) {
        self.reporter.line(&format!("{} {}", self.tag, message));
    }
}

/// Resolve the working directory without touching the process cwd
async fn ensure_working_dir(path: &Path) -> Result<PathBuf> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| DeployError::Environment {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !metadata.is_dir() {
        return Err(DeployError::Environment {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    // Existing but unreadable/unsearchable directories are just as fatal
    tokio::fs::read_dir(path)
        .await
        .map_err(|e| DeployError::Environment {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(path.to_path_buf())
}
