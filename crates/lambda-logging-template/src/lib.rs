//! # Lambda Logging Template
//!
//! Compiled template handling for lambda-logging:
//! - Template and resource views over the compiled `Resources` graph
//! - Function resource location, including the nested stack heuristic
//! - Idempotent `LoggingConfig` patching
//! - The nested stack payload store consumed by reconciliation
//!
//! ## Example
//!
//! ```rust,no_run
//! use lambda_logging_core::{ConfigResolver, ServiceManifest, TracingSink};
//! use lambda_logging_template::{NestedStackConfigStore, Template, TemplatePatcher};
//! use lambda_logging_types::ServiceTarget;
//!
//! # fn main() -> lambda_logging_types::Result<()> {
//! let sink = TracingSink;
//! let mut manifest = ServiceManifest::load("serverless.yml")?;
//! ConfigResolver::new(&sink).resolve_all(&mut manifest);
//!
//! let target = ServiceTarget::new(manifest.service.clone(), "dev");
//! let mut template = Template::load(".serverless/cloudformation-template-update-stack.json")?;
//! let mut store = NestedStackConfigStore::new();
//! TemplatePatcher::new(&target, &sink)
//!     .attach_logging_config(&manifest, &mut template, &mut store);
//! template.save(".serverless/cloudformation-template-update-stack.json")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod locator;
pub mod patcher;
pub mod store;
pub mod types;
pub mod variations;

pub use locator::{LocatedResource, ResourceLocator};
pub use patcher::{PatchReport, TemplatePatcher};
pub use store::NestedStackConfigStore;
pub use types::{
    ResourceRef, Template, FUNCTION_NAME_PROPERTY, FUNCTION_RESOURCE_TYPE, LOGGING_CONFIG_PROPERTY,
    NESTED_STACK_RESOURCE_TYPE,
};
pub use variations::{matches_nested_stack, NameVariations};
