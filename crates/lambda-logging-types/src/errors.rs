//! Error types for lambda-logging operations.

use thiserror::Error;

/// The main error type for lambda-logging operations.
///
/// None of these errors reach the deployment host: lifecycle hooks turn them
/// into diagnostics. They exist so library callers (and the CLI) can tell
/// the failure categories apart.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service manifest could not be loaded or is malformed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Compiled template could not be read or written
    #[error("Template error: {0}")]
    Template(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote function configuration update failed
    #[error("Update failed for {function}: {message}")]
    Update {
        /// Function identifier the update was issued for
        function: String,
        /// Underlying failure message
        message: String,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl LoggingError {
    /// Build an update failure for a function.
    pub fn update(function: impl Into<String>, message: impl Into<String>) -> Self {
        LoggingError::Update {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for lambda-logging operations.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Helper macro to bail out with a LoggingError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Manifest, "missing service name in {}", path.display());
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LoggingError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LoggingError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::LoggingError::Other($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LoggingError::Other(format!($fmt, $($arg)*)))
    };
}
