//! Attaching logging configuration to the compiled template.

use super::locator::{LocatedResource, ResourceLocator};
use super::store::NestedStackConfigStore;
use super::types::{set_property, Template, LOGGING_CONFIG_PROPERTY};
use lambda_logging_core::ServiceManifest;
use lambda_logging_types::{
    Diagnostic, DiagnosticSink, LoggingConfigPayload, LoggingError, Result, ServiceTarget,
};
use serde::Serialize;

/// What happened to each function during one patch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    /// Functions whose resource was patched in place
    pub patched: Vec<String>,
    /// Functions deferred to reconciliation through the nested stack store
    pub deferred: Vec<String>,
    /// Functions with no matching resource
    pub missing: Vec<String>,
    /// Functions whose resource could not be modified
    pub failed: Vec<String>,
}

// Locator result without the borrow on the template.
enum Placement {
    Direct(String),
    Nested(String),
}

/// Writes resolved logging configuration into a compiled template.
pub struct TemplatePatcher<'a> {
    target: &'a ServiceTarget,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> TemplatePatcher<'a> {
    /// Create a patcher for a deployment under `target`.
    pub fn new(target: &'a ServiceTarget, sink: &'a dyn DiagnosticSink) -> Self {
        Self { target, sink }
    }

    /// Attach the payload of every resolved function in `manifest`.
    ///
    /// Top-level function resources get `Properties.LoggingConfig` set; no
    /// other property is touched, and running this again yields the same
    /// template. Functions matched to a nested stack are recorded in `store`
    /// instead. Functions without a resolved configuration are skipped.
    pub fn attach_logging_config(
        &self,
        manifest: &ServiceManifest,
        template: &mut Template,
        store: &mut NestedStackConfigStore,
    ) -> PatchReport {
        let mut report = PatchReport::default();

        for (function_id, entry) in &manifest.functions {
            let Some(config) = entry.resolved.as_ref() else {
                continue;
            };

            let function_name = entry.display_name(function_id, self.target);
            let payload = config.payload(&function_name);

            let placement = {
                let locator = ResourceLocator::new(template, self.target);
                match locator.find_function_resource(function_id, entry.name.as_deref()) {
                    Some(LocatedResource::Direct { id, .. }) => {
                        Some(Placement::Direct(id.to_string()))
                    }
                    Some(LocatedResource::Nested { stack_id, .. }) => {
                        Some(Placement::Nested(stack_id.to_string()))
                    }
                    None => None,
                }
            };

            match placement {
                None => {
                    self.sink.record(
                        Diagnostic::warn("no function resource found in the template, skipping")
                            .for_function(function_id.as_str()),
                    );
                    report.missing.push(function_id.clone());
                }
                Some(Placement::Nested(stack_id)) => {
                    store.insert(function_id.as_str(), payload);
                    self.sink.record(
                        Diagnostic::info(format!(
                            "resource is inside nested stack {}, deferring to post-deploy update",
                            stack_id
                        ))
                        .for_function(function_id.as_str()),
                    );
                    report.deferred.push(function_id.clone());
                }
                Some(Placement::Direct(resource_id)) => {
                    match apply_payload(template, &resource_id, &payload) {
                        Ok(()) => {
                            self.sink.record(
                                Diagnostic::info(format!(
                                    "logging config attached to {}",
                                    resource_id
                                ))
                                .for_function(function_id.as_str()),
                            );
                            report.patched.push(function_id.clone());
                        }
                        Err(e) => {
                            self.sink.record(
                                Diagnostic::warn(format!("could not patch {}: {}", resource_id, e))
                                    .for_function(function_id.as_str()),
                            );
                            report.failed.push(function_id.clone());
                        }
                    }
                }
            }
        }

        report
    }
}

fn apply_payload(
    template: &mut Template,
    resource_id: &str,
    payload: &LoggingConfigPayload,
) -> Result<()> {
    let value = serde_json::to_value(payload)?;
    match template.resource_mut(resource_id) {
        Some(resource) => set_property(resource, LOGGING_CONFIG_PROPERTY, value),
        None => Err(LoggingError::Template(format!("Resource {} not found", resource_id))),
    }
}
