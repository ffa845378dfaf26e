//! Normalization of raw format and level values.
//!
//! Each validator takes whatever the manifest said, matches it
//! case-insensitively against the valid set, and falls back to the field's
//! default with a warning when nothing matches. They never fail.

use lambda_logging_types::{
    ApplicationLogLevel, Diagnostic, DiagnosticSink, LogFormat, SystemLogLevel,
};
use std::fmt::Display;
use std::str::FromStr;

/// Validate a log format, falling back to [`LogFormat::Text`].
pub fn validate_format(raw: Option<&str>, sink: &dyn DiagnosticSink) -> LogFormat {
    validate("format", raw, &LogFormat::ALL, sink)
}

/// Validate an application log level, falling back to [`ApplicationLogLevel::Error`].
pub fn validate_application_level(
    raw: Option<&str>,
    sink: &dyn DiagnosticSink,
) -> ApplicationLogLevel {
    validate("applicationLevel", raw, &ApplicationLogLevel::ALL, sink)
}

/// Validate a system log level, falling back to [`SystemLogLevel::Warn`].
pub fn validate_system_level(raw: Option<&str>, sink: &dyn DiagnosticSink) -> SystemLogLevel {
    validate("systemLevel", raw, &SystemLogLevel::ALL, sink)
}

fn validate<T>(field: &str, raw: Option<&str>, valid: &[T], sink: &dyn DiagnosticSink) -> T
where
    T: FromStr + Default + Display + Copy,
{
    let fallback = T::default();
    match raw {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                let options: Vec<String> = valid.iter().map(|v| v.to_string()).collect();
                sink.record(Diagnostic::warn(format!(
                    "invalid {} '{}' (expected one of {}), using {}",
                    field,
                    value,
                    options.join(", "),
                    fallback
                )));
                fallback
            }
        },
        None => {
            sink.record(Diagnostic::warn(format!("{} not set, using {}", field, fallback)));
            fallback
        }
    }
}
