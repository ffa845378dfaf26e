//! Configuration tiers, the resolved configuration, and the logging payload.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::enums::{ApplicationLogLevel, LogFormat, SystemLogLevel};

/// Environment variable carrying the resolved log format to function code.
pub const ENV_LOG_FORMAT: &str = "AWS_LAMBDA_HANDLER_LOG_FORMAT";

/// Environment variable carrying the resolved application log level.
pub const ENV_APPLICATION_LOG_LEVEL: &str = "LOG_LEVEL";

/// Environment variable carrying the resolved system log level.
pub const ENV_SYSTEM_LOG_LEVEL: &str = "AWS_LAMBDA_LOG_LEVEL";

/// One tier of raw, unvalidated logging settings.
///
/// Used for the function block, the global `custom.logging` block, and the
/// built-in defaults. Values are kept as strings so that garbage survives
/// parsing and reaches the validator, which substitutes defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingOverrides {
    /// Log format (`json` or `text`, any case)
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Application log level
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub application_level: Option<String>,

    /// System log level
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub system_level: Option<String>,

    /// Custom CloudWatch log group
    #[serde(default, deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub log_group: Option<String>,
}

impl LoggingOverrides {
    /// Layer this tier over a lower-priority one, field by field.
    ///
    /// Blank values do not override.
    pub fn over(&self, lower: &LoggingOverrides) -> LoggingOverrides {
        LoggingOverrides {
            format: pick(&self.format, &lower.format),
            application_level: pick(&self.application_level, &lower.application_level),
            system_level: pick(&self.system_level, &lower.system_level),
            log_group: pick(&self.log_group, &lower.log_group),
        }
    }
}

fn pick(high: &Option<String>, low: &Option<String>) -> Option<String> {
    high.as_ref()
        .filter(|v| !v.trim().is_empty())
        .or(low.as_ref().filter(|v| !v.trim().is_empty()))
        .cloned()
}

// Accept any YAML scalar so `format: 1` still reaches validation.
fn scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Validated logging configuration for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log output format
    pub format: LogFormat,
    /// Application log level
    pub application_level: ApplicationLogLevel,
    /// System log level
    pub system_level: SystemLogLevel,
    /// Custom log group, `None` unless configured
    pub log_group: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            application_level: ApplicationLogLevel::default(),
            system_level: SystemLogLevel::default(),
            log_group: None,
        }
    }
}

impl LoggingConfig {
    /// Environment variables exposing this configuration to function code.
    pub fn environment(&self) -> [(&'static str, String); 3] {
        [
            (ENV_LOG_FORMAT, self.format.as_str().to_string()),
            (ENV_APPLICATION_LOG_LEVEL, self.application_level.as_str().to_string()),
            (ENV_SYSTEM_LOG_LEVEL, self.system_level.as_str().to_string()),
        ]
    }

    /// Build the payload for a function deployed as `function_name`.
    ///
    /// Levels are only carried for JSON output. Without a configured log group
    /// the platform default `/aws/lambda/<function_name>` is used.
    pub fn payload(&self, function_name: &str) -> LoggingConfigPayload {
        let levels = self.format.supports_levels();
        LoggingConfigPayload {
            log_format: self.format,
            log_group: self
                .log_group
                .clone()
                .unwrap_or_else(|| default_log_group(function_name)),
            application_log_level: levels.then_some(self.application_level),
            system_log_level: levels.then_some(self.system_level),
        }
    }
}

/// Log group Lambda writes to when none is configured.
pub fn default_log_group(function_name: &str) -> String {
    format!("/aws/lambda/{}", function_name)
}

/// The `LoggingConfig` block written to templates and sent to the Lambda API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfigPayload {
    /// `JSON` or `Text`
    #[serde(serialize_with = "format_out", deserialize_with = "format_in")]
    pub log_format: LogFormat,

    /// Destination log group
    pub log_group: String,

    /// Present only for JSON output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_log_level: Option<ApplicationLogLevel>,

    /// Present only for JSON output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_log_level: Option<SystemLogLevel>,
}

fn format_out<S: Serializer>(
    format: &LogFormat,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(format.payload_value())
}

fn format_in<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<LogFormat, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
