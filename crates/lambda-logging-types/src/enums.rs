//! Common enumerations used throughout lambda-logging.
//!
//! Parsing is case-insensitive and strict: anything outside the valid set is
//! an error. Falling back to a default is the validator's job, not the enum's.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LoggingError, Result};

/// Log output format of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON output
    Json,
    /// Plain text output.
    ///
    /// This is the fallback for a missing or invalid format, even though
    /// service manifests conventionally document `json` as the global default.
    #[default]
    Text,
}

impl LogFormat {
    /// All valid formats.
    pub const ALL: [LogFormat; 2] = [LogFormat::Json, LogFormat::Text];

    /// Lowercase name, as exposed to function code through the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Text => "text",
        }
    }

    /// Value accepted by the Lambda `LoggingConfig.LogFormat` property.
    pub fn payload_value(&self) -> &'static str {
        match self {
            LogFormat::Json => "JSON",
            LogFormat::Text => "Text",
        }
    }

    /// Whether log levels apply. Lambda only honours levels for JSON output.
    pub fn supports_levels(&self) -> bool {
        matches!(self, LogFormat::Json)
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            _ => Err(LoggingError::Validation(format!("Invalid log format: {}", s))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application log level, filtering what function code emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationLogLevel {
    /// Detailed trace messages
    Trace,
    /// Debug messages
    Debug,
    /// Informational messages
    Info,
    /// Warnings and above
    Warn,
    /// Errors and above
    #[default]
    Error,
    /// Fatal errors only
    Fatal,
}

impl ApplicationLogLevel {
    /// All valid application levels.
    pub const ALL: [ApplicationLogLevel; 6] = [
        ApplicationLogLevel::Trace,
        ApplicationLogLevel::Debug,
        ApplicationLogLevel::Info,
        ApplicationLogLevel::Warn,
        ApplicationLogLevel::Error,
        ApplicationLogLevel::Fatal,
    ];

    /// Uppercase name used by the Lambda API and the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationLogLevel::Trace => "TRACE",
            ApplicationLogLevel::Debug => "DEBUG",
            ApplicationLogLevel::Info => "INFO",
            ApplicationLogLevel::Warn => "WARN",
            ApplicationLogLevel::Error => "ERROR",
            ApplicationLogLevel::Fatal => "FATAL",
        }
    }
}

impl FromStr for ApplicationLogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(ApplicationLogLevel::Trace),
            "DEBUG" => Ok(ApplicationLogLevel::Debug),
            "INFO" => Ok(ApplicationLogLevel::Info),
            "WARN" => Ok(ApplicationLogLevel::Warn),
            "ERROR" => Ok(ApplicationLogLevel::Error),
            "FATAL" => Ok(ApplicationLogLevel::Fatal),
            _ => Err(LoggingError::Validation(format!("Invalid application log level: {}", s))),
        }
    }
}

impl fmt::Display for ApplicationLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System log level, filtering what the Lambda runtime itself emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemLogLevel {
    /// Debug messages
    Debug,
    /// Informational messages
    Info,
    /// Warnings only
    #[default]
    Warn,
}

impl SystemLogLevel {
    /// All valid system levels.
    pub const ALL: [SystemLogLevel; 3] = [
        SystemLogLevel::Debug,
        SystemLogLevel::Info,
        SystemLogLevel::Warn,
    ];

    /// Uppercase name used by the Lambda API and the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemLogLevel::Debug => "DEBUG",
            SystemLogLevel::Info => "INFO",
            SystemLogLevel::Warn => "WARN",
        }
    }
}

impl FromStr for SystemLogLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(SystemLogLevel::Debug),
            "INFO" => Ok(SystemLogLevel::Info),
            "WARN" => Ok(SystemLogLevel::Warn),
            _ => Err(LoggingError::Validation(format!("Invalid system log level: {}", s))),
        }
    }
}

impl fmt::Display for SystemLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment lifecycle phases the host invokes us at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleHook {
    /// Before the whole service is packaged
    PrePackage,
    /// Before a single function is packaged for a function-only deploy
    PreFunctionPackage,
    /// Before the packaged service is deployed
    PreDeploy,
    /// After the template has been compiled
    PostPackage,
    /// After the whole service has been deployed
    PostDeploy,
    /// After a single function has been deployed
    PostFunctionDeploy,
}

impl LifecycleHook {
    /// All hooks, in the order the host runs them for a full deployment.
    pub const ALL: [LifecycleHook; 6] = [
        LifecycleHook::PrePackage,
        LifecycleHook::PreFunctionPackage,
        LifecycleHook::PostPackage,
        LifecycleHook::PreDeploy,
        LifecycleHook::PostDeploy,
        LifecycleHook::PostFunctionDeploy,
    ];
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleHook::PrePackage => write!(f, "pre-package"),
            LifecycleHook::PreFunctionPackage => write!(f, "pre-function-package"),
            LifecycleHook::PreDeploy => write!(f, "pre-deploy"),
            LifecycleHook::PostPackage => write!(f, "post-package"),
            LifecycleHook::PostDeploy => write!(f, "post-deploy"),
            LifecycleHook::PostFunctionDeploy => write!(f, "post-function-deploy"),
        }
    }
}

impl FromStr for LifecycleHook {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self> {
        LifecycleHook::ALL
            .into_iter()
            .find(|hook| hook.to_string() == s)
            .ok_or_else(|| LoggingError::Validation(format!("Unknown lifecycle hook: {}", s)))
    }
}
