//! # Lambda Logging Types
//!
//! Core types, traits, and enums shared across all lambda-logging crates.
//!
//! This crate provides the fundamental building blocks for configuring
//! CloudWatch logging on serverless function deployments, including:
//!
//! - The log format and log level enums accepted by the Lambda API
//! - Raw configuration tiers and the resolved per-function configuration
//! - The logging payload written to templates and sent to the live API
//! - Function naming conventions (display names, logical ids)
//! - Core traits for the management API and diagnostic sinks
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use lambda_logging_types::{LogFormat, ServiceTarget};
//!
//! let target = ServiceTarget::new("shop", "dev");
//! assert_eq!(target.display_name("checkout", None), "shop-dev-checkout");
//!
//! let format: LogFormat = "json".parse().unwrap();
//! assert_eq!(format.payload_value(), "JSON");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{LoggingError, Result};
pub use identifiers::ServiceTarget;
pub use enums::{ApplicationLogLevel, LifecycleHook, LogFormat, SystemLogLevel};
pub use config::{LoggingConfig, LoggingConfigPayload, LoggingOverrides};
pub use traits::{Diagnostic, DiagnosticLevel, DiagnosticSink, FunctionConfigUpdater};
