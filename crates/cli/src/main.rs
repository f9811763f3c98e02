//! Migrate Runner CLI
//! Installs the migration tool, then runs `migrate deploy` in the project directory

mod logging;
mod reporter;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use migrate_runner_core::application::DeployRunner;
use migrate_runner_core::port::time_provider::SystemTimeProvider;
use migrate_runner_infra_system::SubprocessExecutor;

use crate::logging::{init_logging, LogFormat};
use crate::reporter::StdoutReporter;
use crate::settings::{Overrides, Settings};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "migrate-runner")]
#[command(about = "Install the migration tool and deploy pending migrations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ./migrate-runner.toml if present)
    #[arg(short, long, env = "MIGRATE_RUNNER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Project directory both steps run in
    #[arg(long, global = true)]
    working_dir: Option<String>,

    /// Prefix for console lines
    #[arg(long, global = true)]
    tag: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run install, then deploy migrations (default)
    Deploy,

    /// Print the resolved configuration as TOML
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(LogFormat::from_env())?;

    let overrides = Overrides {
        working_dir: cli.working_dir,
        tag: cli.tag,
    };
    let settings =
        Settings::load(cli.config.as_deref(), &overrides).context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Deploy) {
        Commands::Deploy => deploy(settings).await,
        Commands::ShowConfig => {
            println!("{}", "Resolved configuration".cyan().bold());
            println!();
            println!("{}", settings.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn deploy(settings: Settings) -> Result<ExitCode> {
    info!("Migrate Runner v{} starting...", VERSION);

    let plan = settings.to_plan().context("Invalid deploy configuration")?;

    // DI wiring
    let executor = Arc::new(SubprocessExecutor::new(
        Arc::new(SystemTimeProvider),
        settings.env_allowlist.clone(),
    ));
    let runner = DeployRunner::new(executor, Arc::new(StdoutReporter), settings.tag.clone());

    info!(
        working_dir = %plan.working_dir.display(),
        install = %plan.install,
        migrate = %plan.migrate,
        "Deploy plan resolved"
    );

    let outcome = runner.run(&plan).await.context("Deploy run aborted")?;

    Ok(ExitCode::from(outcome.process_exit_code()))
}
