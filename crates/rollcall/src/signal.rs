//! Completion signal observed by external orchestration.

use std::io::Write;
use tracing::warn;

/// Receives the one-shot "all peers ready" notification.
pub trait CompletionSignal: Send + Sync {
    fn signal(&self);
}

/// Writes a fixed line to stderr, which orchestration scripts grep for.
#[derive(Debug, Clone)]
pub struct StatusLine {
    line: String,
}

impl StatusLine {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new("READY")
    }
}

impl CompletionSignal for StatusLine {
    fn signal(&self) {
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = writeln!(stderr, "{}", self.line).and_then(|()| stderr.flush()) {
            warn!(error = %e, "failed to write completion line");
        }
    }
}

impl<F> CompletionSignal for F
where
    F: Fn() + Send + Sync,
{
    fn signal(&self) {
        self();
    }
}
