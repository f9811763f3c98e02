// Reporter Port
// Destination for the tagged console lines of a deploy run

/// Console line sink
///
/// Kept apart from `tracing` so the human-facing lines stay stable no matter
/// how the subscriber is configured.
pub trait Reporter: Send + Sync {
    fn line(&self, message: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Collects every reported line in order
    #[derive(Default)]
    pub struct RecordingReporter {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        pub fn output(&self) -> String {
            self.lines().join("\n")
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.lines().iter().any(|l| l.contains(needle))
        }
    }

    impl Reporter for RecordingReporter {
        fn line(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }
}
