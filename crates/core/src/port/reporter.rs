// Reporter Port - where the operator-facing probe dump goes

/// Presentation hint for a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section headers and banners
    Heading,
    /// Plain dump content (bodies, status lines)
    Plain,
    Success,
    Warning,
    Error,
}

/// Sink for the human-readable run transcript
///
/// The console implementation lives in the CLI crate; the runner only
/// decides what to say and with which tone.
pub trait Reporter: Send + Sync {
    fn line(&self, tone: Tone, text: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Reporter that keeps every line in memory
    #[derive(Default)]
    pub struct RecordingReporter {
        lines: Mutex<Vec<(Tone, String)>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<(Tone, String)> {
            self.lines.lock().unwrap().clone()
        }

        /// Whole transcript joined with newlines
        pub fn transcript(&self) -> String {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .map(|(_, text)| text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.transcript().contains(needle)
        }
    }

    impl Reporter for RecordingReporter {
        fn line(&self, tone: Tone, text: &str) {
            self.lines.lock().unwrap().push((tone, text.to_string()));
        }
    }
}
