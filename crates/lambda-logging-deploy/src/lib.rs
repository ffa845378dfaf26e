//! # Lambda Logging Deploy
//!
//! Deployment lifecycle integration:
//! - Lifecycle hook dispatch onto resolution, patching and reconciliation
//! - Post-deploy reconciliation through the function management API
//!
//! ## Example
//!
//! ```rust,no_run
//! use lambda_logging_core::{DeployContext, ServiceManifest, TracingSink};
//! use lambda_logging_deploy::LoggingPlugin;
//! use lambda_logging_types::{FunctionConfigUpdater, LifecycleHook, ServiceTarget};
//! use std::sync::Arc;
//!
//! # async fn run(updater: Arc<dyn FunctionConfigUpdater>) -> lambda_logging_types::Result<()> {
//! let manifest = ServiceManifest::load("serverless.yml")?;
//! let ctx = DeployContext::new(ServiceTarget::new(manifest.service.clone(), "prod"));
//! let mut plugin = LoggingPlugin::new(manifest, ctx, Arc::new(TracingSink), updater);
//!
//! plugin.run_hook(LifecycleHook::PrePackage, None).await;
//! // ... package and deploy ...
//! let report = plugin.run_hook(LifecycleHook::PostDeploy, None).await;
//! println!("{:?}", report.outcome);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod plugin;
pub mod reconciler;

// Re-export main types
pub use plugin::{HookOutcome, HookReport, LoggingPlugin};
pub use reconciler::{ReconcileReport, Reconciler, UpdateOutcome};
