//! Process exit status of the `migrate-runner` binary
//!
//! Steps are `sh -c` scripts, so these tests are unix-only.
#![cfg(unix)]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

fn config_with_migrate(script: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        "[install]\nprogram = \"sh\"\nargs = [\"-c\", \"exit 0\"]\n\n\
         [migrate]\nprogram = \"sh\"\nargs = [\"-c\", \"{}\"]\n",
        script
    )
    .unwrap();
    file
}

fn run_binary(config: &Path, working_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_migrate-runner"))
        .arg("--config")
        .arg(config)
        .arg("--working-dir")
        .arg(working_dir)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_successful_migrate_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_migrate("exit 0");

    let output = run_binary(config.path(), dir.path());

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[v0] Migration completed successfully!"));
}

#[test]
fn test_failed_migrate_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_migrate("exit 7");

    let output = run_binary(config.path(), dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[v0] Migration result code: 7"));
    assert!(stdout.contains("[v0] Migration failed with return code: 7"));
}

#[test]
fn test_missing_working_dir_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_migrate("exit 0");

    let output = run_binary(config.path(), &dir.path().join("v0-project"));

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Environment error"), "stderr: {}", stderr);
}
