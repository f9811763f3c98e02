//! Layered configuration
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `migrate-runner.toml` in the cwd if present)
//! 3. `MIGRATE_RUNNER_*` environment variables (`__` separates nested keys)
//! 4. CLI flag overrides

use config::{Config, ConfigError, Environment, File};
use migrate_runner_core::application::constants::{
    DEFAULT_INSTALL_ARGS, DEFAULT_INSTALL_PROGRAM, DEFAULT_MIGRATE_ARGS, DEFAULT_MIGRATE_PROGRAM,
    DEFAULT_TAG, DEFAULT_WORKING_DIR,
};
use migrate_runner_core::domain::{DeployPlan, StepCommand};
use migrate_runner_core::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the current directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "migrate-runner.toml";

const ENV_PREFIX: &str = "MIGRATE_RUNNER";

/// Keys whose environment values are space-separated lists
const LIST_KEYS: &[&str] = &["install.args", "migrate.args", "env_allowlist"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub working_dir: String,
    pub tag: String,
    /// Variables passed to children; absent means the full environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_allowlist: Option<Vec<String>>,
    pub install: StepCommand,
    pub migrate: StepCommand,
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub working_dir: Option<String>,
    pub tag: Option<String>,
}

impl Settings {
    /// Load settings from all sources
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::build(config_path, overrides, true).map_err(config_error)
    }

    fn build(
        config_path: Option<&Path>,
        overrides: &Overrides,
        with_env: bool,
    ) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("working_dir", DEFAULT_WORKING_DIR)?
            .set_default("tag", DEFAULT_TAG)?
            .set_default("install.program", DEFAULT_INSTALL_PROGRAM)?
            .set_default("install.args", DEFAULT_INSTALL_ARGS.to_vec())?
            .set_default("migrate.program", DEFAULT_MIGRATE_PROGRAM)?
            .set_default("migrate.args", DEFAULT_MIGRATE_ARGS.to_vec())?;

        builder = match config_path {
            Some(path) => builder.add_source(File::from(path.to_path_buf()).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        if with_env {
            let mut env = Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ");
            for key in LIST_KEYS {
                env = env.with_list_parse_key(key);
            }
            builder = builder.add_source(env);
        }

        builder
            .set_override_option("working_dir", overrides.working_dir.clone())?
            .set_override_option("tag", overrides.tag.clone())?
            .build()?
            .try_deserialize()
    }

    /// Turn settings into a validated deploy plan (`~` is expanded)
    pub fn to_plan(&self) -> Result<DeployPlan> {
        if self.tag.trim().is_empty() {
            return Err(DeployError::Config("tag cannot be empty".to_string()));
        }

        let working_dir = PathBuf::from(shellexpand::tilde(&self.working_dir).into_owned());
        let plan = DeployPlan::new(working_dir, self.install.clone(), self.migrate.clone());
        plan.validate()?;

        Ok(plan)
    }

    /// Render the resolved settings as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DeployError::Config(e.to_string()))
    }
}

fn config_error(e: ConfigError) -> DeployError {
    DeployError::Config(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_file(contents: &str, overrides: &Overrides) -> Result<Settings> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Settings::build(Some(file.path()), overrides, false).map_err(config_error)
    }

    #[test]
    fn test_defaults() {
        let settings = load_file("", &Overrides::default()).unwrap();

        assert_eq!(settings.working_dir, "/vercel/share/v0-project");
        assert_eq!(settings.tag, "[v0]");
        assert_eq!(
            settings.install,
            StepCommand::new("python3", ["-m", "pip", "install", "prisma"])
        );
        assert_eq!(
            settings.migrate,
            StepCommand::new("npx", ["prisma", "migrate", "deploy"])
        );
        assert!(settings.env_allowlist.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = load_file(
            r#"
working_dir = "/srv/shop"
env_allowlist = ["PATH", "DATABASE_URL"]

[migrate]
program = "pnpm"
args = ["exec", "prisma", "migrate", "deploy"]
"#,
            &Overrides::default(),
        )
        .unwrap();

        assert_eq!(settings.working_dir, "/srv/shop");
        assert_eq!(settings.migrate.program, "pnpm");
        assert_eq!(settings.migrate.args.len(), 4);
        // untouched table keeps its defaults
        assert_eq!(settings.install.program, "python3");
        assert_eq!(
            settings.env_allowlist,
            Some(vec!["PATH".to_string(), "DATABASE_URL".to_string()])
        );
    }

    #[test]
    fn test_cli_overrides_win() {
        let overrides = Overrides {
            working_dir: Some("/tmp/project".to_string()),
            tag: Some("[deploy]".to_string()),
        };

        let settings = load_file("working_dir = \"/srv/shop\"\n", &overrides).unwrap();

        assert_eq!(settings.working_dir, "/tmp/project");
        assert_eq!(settings.tag, "[deploy]");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Settings::build(
            Some(Path::new("/nonexistent/migrate-runner.toml")),
            &Overrides::default(),
            false,
        )
        .map_err(config_error)
        .unwrap_err();

        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn test_to_plan_expands_tilde() {
        let mut settings = load_file("", &Overrides::default()).unwrap();
        settings.working_dir = "~/project".to_string();

        let plan = settings.to_plan().unwrap();

        assert!(!plan.working_dir.starts_with("~"));
        assert!(plan.working_dir.ends_with("project"));
    }

    #[test]
    fn test_to_plan_rejects_empty_tag() {
        let mut settings = load_file("", &Overrides::default()).unwrap();
        settings.tag = String::new();

        assert!(settings.to_plan().unwrap_err().to_string().contains("tag"));
    }

    #[test]
    fn test_to_plan_rejects_empty_program() {
        let settings = load_file("[install]\nprogram = \"\"\n", &Overrides::default()).unwrap();

        assert!(settings
            .to_plan()
            .unwrap_err()
            .to_string()
            .contains("install.program"));
    }

    #[test]
    fn test_to_toml_round_trips_through_loader() {
        let settings = load_file("tag = \"[ci]\"\n", &Overrides::default()).unwrap();

        let rendered = settings.to_toml().unwrap();
        let reloaded = load_file(&rendered, &Overrides::default()).unwrap();

        assert_eq!(reloaded, settings);
    }

    // The only test in this crate that sets MIGRATE_RUNNER_* variables, so the
    // process-global environment is never shared with another test.
    #[test]
    fn test_env_layer_between_file_and_cli() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"tag = \"[file]\"\n\n[migrate]\nprogram = \"bunx\"\nargs = [\"prisma\"]\n")
            .unwrap();

        let vars = [
            ("MIGRATE_RUNNER_MIGRATE__PROGRAM", "pnpm"),
            ("MIGRATE_RUNNER_MIGRATE__ARGS", "exec prisma migrate deploy"),
            ("MIGRATE_RUNNER_ENV_ALLOWLIST", "PATH DATABASE_URL"),
            ("MIGRATE_RUNNER_TAG", "[env]"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let from_env = Settings::build(Some(file.path()), &Overrides::default(), true);
        let overrides = Overrides {
            working_dir: None,
            tag: Some("[cli]".to_string()),
        };
        let from_cli = Settings::build(Some(file.path()), &overrides, true);

        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let from_env = from_env.unwrap();
        assert_eq!(
            from_env.migrate,
            StepCommand::new("pnpm", ["exec", "prisma", "migrate", "deploy"])
        );
        assert_eq!(
            from_env.env_allowlist,
            Some(vec!["PATH".to_string(), "DATABASE_URL".to_string()])
        );
        assert_eq!(from_env.tag, "[env]");
        // keys absent from both file and env keep their defaults
        assert_eq!(from_env.install.program, "python3");

        let from_cli = from_cli.unwrap();
        assert_eq!(from_cli.tag, "[cli]");
        assert_eq!(from_cli.migrate.program, "pnpm");
    }
}
