//! Console reporter

use migrate_runner_core::port::Reporter;

/// Writes each tagged line to stdout
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn line(&self, message: &str) {
        println!("{}", message);
    }
}
