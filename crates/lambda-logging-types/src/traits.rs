//! Core trait definitions for lambda-logging abstractions.

use async_trait::async_trait;
use std::fmt;
use crate::config::LoggingConfigPayload;
use crate::errors::Result;

/// Trait for the remote function management API.
///
/// Implementers apply a logging payload to an already deployed function.
#[async_trait]
pub trait FunctionConfigUpdater: Send + Sync {
    /// Update the logging configuration of the function deployed as
    /// `function_name`.
    async fn update_logging_config(
        &self,
        function_name: &str,
        payload: &LoggingConfigPayload,
    ) -> Result<()>;
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Internal detail
    Debug,
    /// Progress information
    Info,
    /// Something was corrected or skipped
    Warn,
    /// An operation could not be carried out
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Debug => write!(f, "debug"),
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warn => write!(f, "warn"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// One operator-facing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity
    pub level: DiagnosticLevel,
    /// Function the line is about, if any
    pub function: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic not tied to a function.
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            function: None,
            message: message.into(),
        }
    }

    /// Attach the function this diagnostic concerns.
    pub fn for_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Shorthand for an info line.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, message)
    }

    /// Shorthand for a warning line.
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, message)
    }

    /// Shorthand for an error line.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            Some(function) => write!(f, "[{}] {}: {}", self.level, function, self.message),
            None => write!(f, "[{}] {}", self.level, self.message),
        }
    }
}

/// Receiver for operator-facing diagnostics.
///
/// Recording must never fail; sinks swallow their own transport errors.
pub trait DiagnosticSink: Send + Sync {
    /// Record one diagnostic.
    fn record(&self, diagnostic: Diagnostic);
}
