//! Log sinks - where listener output goes
//!
//! Listeners receive their sink at construction instead of reaching for a
//! global logger.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Destination for listener log lines.
pub trait LogSink: Send + Sync {
    /// An informational line (epoch summaries, timing reports).
    fn info(&self, message: &str);

    /// A rendered progress bar line.
    fn progress(&self, line: &str) {
        self.info(line);
    }
}

/// Forwards lines to `tracing` events.
///
/// Info lines use target `trueno_metrics::training`, progress lines
/// `trueno_metrics::progress`, so a subscriber can filter bars out with
/// `RUST_LOG=trueno_metrics::progress=off`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "trueno_metrics::training", "{message}");
    }

    fn progress(&self, line: &str) {
        tracing::info!(target: "trueno_metrics::progress", "{line}");
    }
}

/// Kind of a captured line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// From [`LogSink::info`]
    Info,
    /// From [`LogSink::progress`]
    Progress,
}

/// Captures lines in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(LineKind, String)>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every captured line with its kind.
    #[must_use]
    pub fn lines(&self) -> Vec<(LineKind, String)> {
        self.guard().clone()
    }

    /// Captured info lines.
    #[must_use]
    pub fn info_lines(&self) -> Vec<String> {
        self.of_kind(LineKind::Info)
    }

    /// Captured progress lines.
    #[must_use]
    pub fn progress_lines(&self) -> Vec<String> {
        self.of_kind(LineKind::Progress)
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        self.guard().clear();
    }

    fn of_kind(&self, kind: LineKind) -> Vec<String> {
        self.guard()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, line)| line.clone())
            .collect()
    }

    // A panicking writer cannot leave a half-pushed line behind.
    fn guard(&self) -> MutexGuard<'_, Vec<(LineKind, String)>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str) {
        self.guard().push((LineKind::Info, message.to_string()));
    }

    fn progress(&self, line: &str) {
        self.guard().push((LineKind::Progress, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order_and_kind() {
        let sink = MemorySink::new();
        sink.info("Epoch 0 finished.");
        sink.progress("Training: 100% |==| ");
        sink.info("Train: accuracy: 0.50");

        assert_eq!(sink.lines().len(), 3);
        assert_eq!(
            sink.info_lines(),
            vec!["Epoch 0 finished.", "Train: accuracy: 0.50"]
        );
        assert_eq!(sink.progress_lines().len(), 1);

        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_default_progress_forwards_to_info() {
        struct InfoOnly(MemorySink);
        impl LogSink for InfoOnly {
            fn info(&self, message: &str) {
                self.0.info(message);
            }
        }

        let sink = InfoOnly(MemorySink::new());
        sink.progress("bar");
        assert_eq!(sink.0.info_lines(), vec!["bar"]);
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        TracingSink.info("no subscriber installed");
        TracingSink.progress("still fine");
    }
}
