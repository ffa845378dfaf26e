//! Three-tier resolution of per-function logging configuration.
//!
//! Each field is taken from the first tier that sets it, in this order:
//! 1. The function's own `logging` block
//! 2. The global `custom.logging` block
//! 3. The built-in defaults tier
//!
//! and then normalized by the validator, which supplies the final fallback.
//! `log_group` has no built-in default and stays `None` unless the function or
//! global tier sets it.

use crate::config::{FunctionEntry, ServiceManifest};
use crate::validator::{validate_application_level, validate_format, validate_system_level};
use lambda_logging_types::{Diagnostic, DiagnosticSink, LoggingConfig, LoggingOverrides};
use serde_json::Value;

/// Merge three tiers into a validated configuration.
///
/// Pure apart from the warnings the validator records on `sink`.
pub fn merge(
    function: &LoggingOverrides,
    global: &LoggingOverrides,
    builtin: &LoggingOverrides,
    sink: &dyn DiagnosticSink,
) -> LoggingConfig {
    let configured = function.over(global);
    let merged = configured.over(builtin);

    LoggingConfig {
        format: validate_format(merged.format.as_deref(), sink),
        application_level: validate_application_level(merged.application_level.as_deref(), sink),
        system_level: validate_system_level(merged.system_level.as_deref(), sink),
        log_group: configured.log_group,
    }
}

/// Resolves logging configuration for the functions of a manifest.
pub struct ConfigResolver<'a> {
    builtin: LoggingOverrides,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ConfigResolver<'a> {
    /// Create a resolver with an empty built-in tier.
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            builtin: LoggingOverrides::default(),
            sink,
        }
    }

    /// Replace the built-in defaults tier.
    pub fn with_builtin(mut self, builtin: LoggingOverrides) -> Self {
        self.builtin = builtin;
        self
    }

    /// Resolve one function, attach the result to its entry, and expose it
    /// through the function's environment.
    pub fn resolve(
        &self,
        function_id: &str,
        entry: &mut FunctionEntry,
        global: &LoggingOverrides,
    ) -> LoggingConfig {
        let scoped = FunctionScoped {
            inner: self.sink,
            function: function_id,
        };

        let empty = LoggingOverrides::default();
        let tier = entry.logging.as_ref().unwrap_or(&empty);
        let config = merge(tier, global, &self.builtin, &scoped);

        for (key, value) in config.environment() {
            entry.environment.insert(key.to_string(), Value::String(value));
        }

        scoped.record(Diagnostic::info(format!("format: {}", config.format)));
        scoped.record(Diagnostic::info(format!("applicationLevel: {}", config.application_level)));
        scoped.record(Diagnostic::info(format!("systemLevel: {}", config.system_level)));
        scoped.record(Diagnostic::info(format!(
            "logGroup: {}",
            config.log_group.as_deref().unwrap_or("(default)")
        )));

        entry.resolved = Some(config.clone());
        config
    }

    /// Resolve every declared function. Returns how many were resolved.
    pub fn resolve_all(&self, manifest: &mut ServiceManifest) -> usize {
        let global = manifest.global_tier().clone();
        for (function_id, entry) in manifest.functions.iter_mut() {
            self.resolve(function_id, entry, &global);
        }
        manifest.functions.len()
    }

    /// Resolve a single named function.
    ///
    /// An unknown name is reported and otherwise ignored.
    pub fn resolve_function(
        &self,
        manifest: &mut ServiceManifest,
        function_id: &str,
    ) -> Option<LoggingConfig> {
        let global = manifest.global_tier().clone();
        let service = manifest.service.clone();
        match manifest.function_mut(function_id) {
            Some(entry) => Some(self.resolve(function_id, entry, &global)),
            None => {
                self.sink.record(
                    Diagnostic::error(format!(
                        "function '{}' is not declared in service '{}'",
                        function_id, service
                    ))
                    .for_function(function_id),
                );
                None
            }
        }
    }
}

// Tags untagged diagnostics with the function being resolved.
struct FunctionScoped<'s> {
    inner: &'s dyn DiagnosticSink,
    function: &'s str,
}

impl DiagnosticSink for FunctionScoped<'_> {
    fn record(&self, diagnostic: Diagnostic) {
        let diagnostic = match diagnostic.function {
            Some(_) => diagnostic,
            None => diagnostic.for_function(self.function),
        };
        self.inner.record(diagnostic);
    }
}
