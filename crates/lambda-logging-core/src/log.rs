//! Logging system for lambda-logging.
//!
//! Operator-facing lines go through a [`DiagnosticSink`]. In production that
//! is [`TracingSink`], which forwards to `tracing`; tests capture lines with
//! [`MemorySink`].

use lambda_logging_types::{Diagnostic, DiagnosticLevel, DiagnosticSink, LoggingError, Result};
use parking_lot::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "lambda_logging=info";

/// Initialize the logging system with default configuration.
pub fn init_default() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    init_with_filter(filter)
}

/// Initialize logging with an explicit filter.
pub fn init_with_filter(filter: EnvFilter) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| LoggingError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Sink forwarding diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        let function = diagnostic.function.as_deref().unwrap_or("-");
        match diagnostic.level {
            DiagnosticLevel::Debug => tracing::debug!(function, "{}", diagnostic.message),
            DiagnosticLevel::Info => tracing::info!(function, "{}", diagnostic.message),
            DiagnosticLevel::Warn => tracing::warn!(function, "{}", diagnostic.message),
            DiagnosticLevel::Error => tracing::error!(function, "{}", diagnostic.message),
        }
    }
}

/// Sink capturing diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Diagnostics at exactly `level`.
    pub fn at_level(&self, level: DiagnosticLevel) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .iter()
            .filter(|d| d.level == level)
            .cloned()
            .collect()
    }

    /// Whether any diagnostic at `level` contains `needle`.
    pub fn contains(&self, level: DiagnosticLevel, needle: &str) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|d| d.level == level && d.message.contains(needle))
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_filters_by_level() {
        let sink = MemorySink::new();
        sink.record(Diagnostic::info("resolved format").for_function("hello"));
        sink.record(Diagnostic::warn("invalid level 'LOUD'").for_function("hello"));

        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.at_level(DiagnosticLevel::Warn).len(), 1);
        assert!(sink.contains(DiagnosticLevel::Warn, "LOUD"));
        assert!(!sink.contains(DiagnosticLevel::Info, "LOUD"));

        sink.clear();
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        TracingSink.record(Diagnostic::error("no subscriber installed"));
    }
}
