// Process Domain Model

use serde::{Deserialize, Serialize};

/// A single external command invocation (one deploy step)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl StepCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for StepCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of one finished child process
///
/// `exit_code` is the negated signal number when the child was killed by a
/// signal, and `-1` when neither a code nor a signal is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: i64,
}

impl ProcessResult {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration_ms: 0,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_command_display() {
        let cmd = StepCommand::new("npx", ["prisma", "migrate", "deploy"]);
        assert_eq!(cmd.to_string(), "npx prisma migrate deploy");

        let bare = StepCommand::new("true", Vec::<String>::new());
        assert_eq!(bare.to_string(), "true");
    }

    #[test]
    fn test_process_result_success() {
        assert!(ProcessResult::new(0, "ok", "").success());
        assert!(!ProcessResult::new(1, "", "boom").success());
        assert!(!ProcessResult::new(-9, "", "").success());
    }
}
