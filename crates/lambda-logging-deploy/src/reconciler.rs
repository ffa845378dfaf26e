//! Post-deploy reconciliation of function logging configuration.
//!
//! The template patch cannot reach functions inside nested stacks, and a
//! patched template only applies on the next stack update. After a deploy
//! every function's configuration is pushed again through the management
//! API, one function at a time. A failing function never stops the batch.

use lambda_logging_core::{DeployContext, FunctionEntry, ServiceManifest};
use lambda_logging_template::NestedStackConfigStore;
use lambda_logging_types::{
    Diagnostic, DiagnosticSink, FunctionConfigUpdater, LoggingConfigPayload, ServiceTarget,
};
use serde::Serialize;
use tracing::debug;

/// Result of one function update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update call succeeded
    Updated,
    /// The update call failed with the given message
    Failed(String),
    /// Nothing to send: the function has no resolved configuration
    Skipped,
}

/// Per-function outcomes of a reconciliation run, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Functions updated
    pub updated: Vec<String>,
    /// Functions whose update failed
    pub failed: Vec<String>,
    /// Functions with nothing to send
    pub skipped: Vec<String>,
}

impl ReconcileReport {
    fn record(&mut self, function_id: &str, outcome: UpdateOutcome) {
        let bucket = match outcome {
            UpdateOutcome::Updated => &mut self.updated,
            UpdateOutcome::Failed(_) => &mut self.failed,
            UpdateOutcome::Skipped => &mut self.skipped,
        };
        bucket.push(function_id.to_string());
    }

    /// Number of functions attempted.
    pub fn attempted(&self) -> usize {
        self.updated.len() + self.failed.len()
    }

    /// Whether nothing was attempted or skipped.
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Pushes logging configuration to deployed functions.
pub struct Reconciler<'a> {
    updater: &'a dyn FunctionConfigUpdater,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler issuing updates through `updater`.
    pub fn new(updater: &'a dyn FunctionConfigUpdater, sink: &'a dyn DiagnosticSink) -> Self {
        Self { updater, sink }
    }

    /// Update one function.
    ///
    /// A payload stored during patching is sent as is; otherwise it is built
    /// from the resolved configuration. The call is addressed by the
    /// function's deployed name.
    pub async fn update_function_logging(
        &self,
        function_id: &str,
        entry: &FunctionEntry,
        target: &ServiceTarget,
        stored: Option<&LoggingConfigPayload>,
    ) -> UpdateOutcome {
        let function_name = entry.display_name(function_id, target);

        let payload = match (stored, entry.resolved.as_ref()) {
            (Some(stored), _) => stored.clone(),
            (None, Some(config)) => config.payload(&function_name),
            (None, None) => {
                self.sink.record(
                    Diagnostic::warn("logging config was not resolved, skipping update")
                        .for_function(function_id),
                );
                return UpdateOutcome::Skipped;
            }
        };

        debug!(
            function = function_id,
            name = %function_name,
            stored = stored.is_some(),
            "sending logging config"
        );

        match self.updater.update_logging_config(&function_name, &payload).await {
            Ok(()) => {
                self.sink.record(
                    Diagnostic::info(format!("logging config updated on {}", function_name))
                        .for_function(function_id),
                );
                UpdateOutcome::Updated
            }
            Err(e) => {
                let message = e.to_string();
                self.sink.record(
                    Diagnostic::warn(format!(
                        "failed to update logging config for {}: {}",
                        function_id, message
                    ))
                    .for_function(function_id),
                );
                UpdateOutcome::Failed(message)
            }
        }
    }

    /// Update every declared function, in declaration order.
    ///
    /// Does nothing while a single-function deployment is in progress; that
    /// case is served by [`Reconciler::reconcile_function`].
    pub async fn reconcile_service(
        &self,
        manifest: &ServiceManifest,
        ctx: &DeployContext,
        store: &NestedStackConfigStore,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        if ctx.is_single_function() {
            debug!("single-function deployment in progress, skipping service reconciliation");
            return report;
        }

        for (function_id, entry) in &manifest.functions {
            let outcome = self
                .update_function_logging(function_id, entry, &ctx.target, store.get(function_id))
                .await;
            report.record(function_id, outcome);
        }

        report
    }

    /// Update only the function selected by the invocation.
    pub async fn reconcile_function(
        &self,
        manifest: &ServiceManifest,
        ctx: &DeployContext,
        store: &NestedStackConfigStore,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let Some(function_id) = ctx.function.as_deref() else {
            debug!("no function selected, nothing to reconcile");
            return report;
        };

        match manifest.function(function_id) {
            Some(entry) => {
                let stored = store.get(function_id);
                let outcome = self
                    .update_function_logging(function_id, entry, &ctx.target, stored)
                    .await;
                report.record(function_id, outcome);
            }
            None => self.sink.record(
                Diagnostic::error(format!(
                    "function '{}' is not declared in service '{}'",
                    function_id, manifest.service
                ))
                .for_function(function_id),
            ),
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_logging_core::{ConfigResolver, MemorySink};
    use lambda_logging_types::{DiagnosticLevel, LogFormat, LoggingError, Result};
    use mockall::{mock, Sequence};

    mock! {
        Updater {}

        #[async_trait]
        impl FunctionConfigUpdater for Updater {
            async fn update_logging_config(
                &self,
                function_name: &str,
                payload: &LoggingConfigPayload,
            ) -> Result<()>;
        }
    }

    const MANIFEST: &str = r#"
service: service
custom:
  logging:
    format: json
functions:
  hello:
  world:
    name: world-explicit
  foo:
"#;

    fn resolved() -> ServiceManifest {
        let sink = MemorySink::new();
        let mut manifest = ServiceManifest::from_yaml_str(MANIFEST).unwrap();
        ConfigResolver::new(&sink).resolve_all(&mut manifest);
        manifest
    }

    fn ctx() -> DeployContext {
        DeployContext::new(ServiceTarget::new("service", "dev"))
    }

    #[tokio::test]
    async fn test_reconciles_every_function_in_order() {
        let manifest = resolved();
        let sink = MemorySink::new();
        let mut updater = MockUpdater::new();
        let mut seq = Sequence::new();
        for name in ["service-dev-hello", "world-explicit", "service-dev-foo"] {
            updater
                .expect_update_logging_config()
                .withf(move |function_name, _| function_name == name)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }

        let report = Reconciler::new(&updater, &sink)
            .reconcile_service(&manifest, &ctx(), &NestedStackConfigStore::new())
            .await;

        assert_eq!(report.updated, vec!["hello", "world", "foo"]);
        assert!(report.failed.is_empty());
        assert_eq!(report.attempted(), 3);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_batch() {
        let manifest = resolved();
        let sink = MemorySink::new();
        let mut updater = MockUpdater::new();
        updater
            .expect_update_logging_config()
            .times(3)
            .returning(|name, _| {
                if name == "world-explicit" {
                    Err(LoggingError::update("world", "ResourceNotFoundException"))
                } else {
                    Ok(())
                }
            });

        let report = Reconciler::new(&updater, &sink)
            .reconcile_service(&manifest, &ctx(), &NestedStackConfigStore::new())
            .await;

        assert_eq!(report.updated, vec!["hello", "foo"]);
        assert_eq!(report.failed, vec!["world"]);
        assert!(sink.contains(DiagnosticLevel::Warn, "failed to update logging config for world"));
        assert!(sink.contains(DiagnosticLevel::Warn, "ResourceNotFoundException"));
    }

    #[tokio::test]
    async fn test_stored_payload_is_sent_verbatim() {
        let manifest = resolved();
        let sink = MemorySink::new();
        let stored = LoggingConfigPayload {
            log_format: LogFormat::Text,
            log_group: "/stored/group".to_string(),
            application_log_level: None,
            system_log_level: None,
        };
        let mut store = NestedStackConfigStore::new();
        store.insert("foo", stored.clone());

        let mut updater = MockUpdater::new();
        updater
            .expect_update_logging_config()
            .withf(move |name, payload| name == "service-dev-foo" && *payload == stored)
            .times(1)
            .returning(|_, _| Ok(()));
        updater
            .expect_update_logging_config()
            .withf(|name, payload| {
                name != "service-dev-foo" && payload.log_format == LogFormat::Json
            })
            .times(2)
            .returning(|_, _| Ok(()));

        let report = Reconciler::new(&updater, &sink)
            .reconcile_service(&manifest, &ctx(), &store)
            .await;
        assert_eq!(report.updated.len(), 3);
    }

    #[tokio::test]
    async fn test_service_reconciliation_skipped_for_single_function() {
        let manifest = resolved();
        let sink = MemorySink::new();
        let mut updater = MockUpdater::new();
        updater.expect_update_logging_config().never();

        let report = Reconciler::new(&updater, &sink)
            .reconcile_service(
                &manifest,
                &ctx().with_function("hello"),
                &NestedStackConfigStore::new(),
            )
            .await;
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_function_reconciliation() {
        let manifest = resolved();
        let sink = MemorySink::new();
        let mut updater = MockUpdater::new();
        updater
            .expect_update_logging_config()
            .withf(|function_name, _| function_name == "service-dev-hello")
            .times(1)
            .returning(|_, _| Ok(()));
        let reconciler = Reconciler::new(&updater, &sink);
        let store = NestedStackConfigStore::new();

        let report = reconciler
            .reconcile_function(&manifest, &ctx().with_function("hello"), &store)
            .await;
        assert_eq!(report.updated, vec!["hello"]);

        assert!(reconciler.reconcile_function(&manifest, &ctx(), &store).await.is_empty());

        let report = reconciler
            .reconcile_function(&manifest, &ctx().with_function("ghost"), &store)
            .await;
        assert!(report.is_empty());
        assert!(sink.contains(DiagnosticLevel::Error, "'ghost' is not declared"));
    }

    #[tokio::test]
    async fn test_unresolved_function_is_skipped() {
        let manifest = ServiceManifest::from_yaml_str(MANIFEST).unwrap();
        let sink = MemorySink::new();
        let mut updater = MockUpdater::new();
        updater.expect_update_logging_config().never();

        let report = Reconciler::new(&updater, &sink)
            .reconcile_service(&manifest, &ctx(), &NestedStackConfigStore::new())
            .await;
        assert_eq!(report.skipped, vec!["hello", "world", "foo"]);
    }
}
