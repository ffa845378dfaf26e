//! # Lambda Logging Core
//!
//! Configuration resolution and the ambient plumbing shared by every other
//! lambda-logging crate.
//!
//! This crate provides:
//!
//! - **Validation**: normalization of format and level values with fallbacks
//! - **Resolution**: the function → global → built-in merge that produces one
//!   [`LoggingConfig`] per function and exposes it through the environment
//! - **Configuration**: service manifest loading and layered deployment settings
//! - **Logging**: `tracing` initialization and diagnostic sinks
//! - **Data utilities**: YAML/JSON file helpers
//!
//! ## Example
//!
//! ```
//! use lambda_logging_core::{ConfigResolver, MemorySink, ServiceManifest};
//!
//! let mut manifest = ServiceManifest::from_yaml_str(r#"
//! service: shop
//! custom:
//!   logging:
//!     format: json
//! functions:
//!   checkout:
//!     logging:
//!       applicationLevel: debug
//! "#).unwrap();
//!
//! let sink = MemorySink::new();
//! let resolver = ConfigResolver::new(&sink);
//! resolver.resolve_all(&mut manifest);
//!
//! let config = manifest.function("checkout").unwrap().resolved.clone().unwrap();
//! assert_eq!(config.format.as_str(), "json");
//! assert_eq!(config.application_level.as_str(), "DEBUG");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod resolver;
pub mod util;
pub mod validator;

// Re-export commonly used items
pub use config::{
    ConfigLayer, DeployContext, FunctionEntry, LayeredSettings, ServiceManifest, Settings,
};
pub use log::{MemorySink, TracingSink};
pub use resolver::{merge, ConfigResolver};
pub use lambda_logging_types::{LoggingConfig, LoggingError, Result};
