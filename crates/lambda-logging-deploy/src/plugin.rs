//! Lifecycle hook dispatch.

use super::reconciler::{ReconcileReport, Reconciler};
use lambda_logging_core::{ConfigResolver, DeployContext, ServiceManifest};
use lambda_logging_template::{NestedStackConfigStore, PatchReport, Template, TemplatePatcher};
use lambda_logging_types::{
    DiagnosticSink, FunctionConfigUpdater, LifecycleHook, LoggingOverrides,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// What a hook did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum HookOutcome {
    /// Functions were resolved
    Resolved {
        /// Number of functions resolved
        count: usize,
    },
    /// The compiled template was patched
    Patched(PatchReport),
    /// Deployed functions were updated
    Reconciled(ReconcileReport),
    /// The hook had nothing to do
    Skipped {
        /// Why
        reason: String,
    },
}

/// Report returned to the host for one hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookReport {
    /// Hook that ran
    pub hook: LifecycleHook,
    /// What it did
    #[serde(flatten)]
    pub outcome: HookOutcome,
}

impl HookReport {
    fn new(hook: LifecycleHook, outcome: HookOutcome) -> Self {
        Self { hook, outcome }
    }

    fn skipped(hook: LifecycleHook, reason: impl Into<String>) -> Self {
        Self::new(hook, HookOutcome::Skipped { reason: reason.into() })
    }
}

/// Plugin state for one deployment operation.
///
/// Owns the manifest being deployed, the invocation context, and the nested
/// stack store shared between the patch and reconciliation phases. No hook
/// returns an error: failures surface as diagnostics.
pub struct LoggingPlugin {
    manifest: ServiceManifest,
    ctx: DeployContext,
    store: NestedStackConfigStore,
    builtin: LoggingOverrides,
    sink: Arc<dyn DiagnosticSink>,
    updater: Arc<dyn FunctionConfigUpdater>,
}

impl LoggingPlugin {
    /// Create a plugin for `manifest` deployed under `ctx`.
    pub fn new(
        manifest: ServiceManifest,
        ctx: DeployContext,
        sink: Arc<dyn DiagnosticSink>,
        updater: Arc<dyn FunctionConfigUpdater>,
    ) -> Self {
        Self {
            manifest,
            ctx,
            store: NestedStackConfigStore::new(),
            builtin: LoggingOverrides::default(),
            sink,
            updater,
        }
    }

    /// Set the built-in default tier.
    pub fn with_builtin(mut self, builtin: LoggingOverrides) -> Self {
        self.builtin = builtin;
        self
    }

    /// Start from a store persisted by an earlier process.
    pub fn with_store(mut self, store: NestedStackConfigStore) -> Self {
        self.store = store;
        self
    }

    /// The manifest, including resolved configuration.
    pub fn manifest(&self) -> &ServiceManifest {
        &self.manifest
    }

    /// The invocation context.
    pub fn context(&self) -> &DeployContext {
        &self.ctx
    }

    /// The nested stack store.
    pub fn store(&self) -> &NestedStackConfigStore {
        &self.store
    }

    /// Run the action bound to `hook`.
    ///
    /// The patch hooks need the compiled template; without one they are
    /// skipped.
    pub async fn run_hook(
        &mut self,
        hook: LifecycleHook,
        template: Option<&mut Template>,
    ) -> HookReport {
        debug!(hook = %hook, "running lifecycle hook");

        let report = match hook {
            LifecycleHook::PrePackage => self.resolve_all(hook),
            LifecycleHook::PreFunctionPackage => self.resolve_selected(hook),
            LifecycleHook::PostPackage | LifecycleHook::PreDeploy => match template {
                Some(template) => self.attach(hook, template),
                None => HookReport::skipped(hook, "no compiled template available"),
            },
            LifecycleHook::PostDeploy => {
                let report = self
                    .reconciler()
                    .reconcile_service(&self.manifest, &self.ctx, &self.store)
                    .await;
                HookReport::new(hook, HookOutcome::Reconciled(report))
            }
            LifecycleHook::PostFunctionDeploy => {
                let report = self
                    .reconciler()
                    .reconcile_function(&self.manifest, &self.ctx, &self.store)
                    .await;
                HookReport::new(hook, HookOutcome::Reconciled(report))
            }
        };

        info!(hook = %hook, outcome = ?report.outcome, "lifecycle hook finished");
        report
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.updater.as_ref(), self.sink.as_ref())
    }

    fn resolve_all(&mut self, hook: LifecycleHook) -> HookReport {
        let resolver = ConfigResolver::new(self.sink.as_ref()).with_builtin(self.builtin.clone());
        let count = resolver.resolve_all(&mut self.manifest);
        HookReport::new(hook, HookOutcome::Resolved { count })
    }

    fn resolve_selected(&mut self, hook: LifecycleHook) -> HookReport {
        let Some(function_id) = self.ctx.function.clone() else {
            return HookReport::skipped(hook, "no function selected");
        };
        let resolver = ConfigResolver::new(self.sink.as_ref()).with_builtin(self.builtin.clone());
        let count = resolver
            .resolve_function(&mut self.manifest, &function_id)
            .map_or(0, |_| 1);
        HookReport::new(hook, HookOutcome::Resolved { count })
    }

    fn attach(&mut self, hook: LifecycleHook, template: &mut Template) -> HookReport {
        let patcher = TemplatePatcher::new(&self.ctx.target, self.sink.as_ref());
        let report = patcher.attach_logging_config(&self.manifest, template, &mut self.store);
        HookReport::new(hook, HookOutcome::Patched(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_logging_core::MemorySink;
    use lambda_logging_types::{
        ApplicationLogLevel, DiagnosticLevel, LogFormat, LoggingConfigPayload, Result,
        ServiceTarget, SystemLogLevel,
    };
    use mockall::mock;
    use serde_json::json;

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

    fn plugin(ctx: DeployContext, updater: MockUpdater) -> (LoggingPlugin, Arc<MemorySink>) {
        let manifest = ServiceManifest::from_yaml_str(
            "service: service\nfunctions:\n  hello:\n    logging:\n      format: json\n  world:\n",
        )
        .unwrap();
        let sink = Arc::new(MemorySink::new());
        let plugin = LoggingPlugin::new(manifest, ctx, sink.clone(), Arc::new(updater));
        (plugin, sink)
    }

    fn ctx() -> DeployContext {
        DeployContext::new(ServiceTarget::new("service", "dev"))
    }

    fn plugin_without_builtin() -> (LoggingPlugin, Arc<MemorySink>) {
        plugin(ctx(), MockUpdater::new())
    }

    #[tokio::test]
    async fn test_pre_package_resolves_every_function() {
        let (mut plugin, _) = plugin(ctx(), MockUpdater::new());
        let report = plugin.run_hook(LifecycleHook::PrePackage, None).await;

        assert_eq!(report.outcome, HookOutcome::Resolved { count: 2 });
        assert!(plugin.manifest().functions.values().all(|entry| entry.resolved.is_some()));
    }

    #[tokio::test]
    async fn test_builtin_tier_applies_to_unconfigured_functions() {
        let (plugin, _) = plugin(ctx(), MockUpdater::new());
        let mut plugin = plugin.with_builtin(LoggingOverrides {
            format: Some("json".to_string()),
            application_level: Some("INFO".to_string()),
            system_level: Some("INFO".to_string()),
            log_group: None,
        });
        plugin.run_hook(LifecycleHook::PrePackage, None).await;

        let world = plugin.manifest().function("world").unwrap();
        let config = world.resolved.as_ref().unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.application_level, ApplicationLogLevel::Info);
        assert_eq!(config.system_level, SystemLogLevel::Info);
        assert_eq!(world.environment["AWS_LAMBDA_HANDLER_LOG_FORMAT"], "json");

        let (mut bare, _) = plugin_without_builtin();
        bare.run_hook(LifecycleHook::PrePackage, None).await;
        let config = bare.manifest().function("world").unwrap().resolved.clone().unwrap();
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.application_level, ApplicationLogLevel::Error);
        assert_eq!(config.system_level, SystemLogLevel::Warn);
    }

    #[tokio::test]
    async fn test_pre_function_package_resolves_selection_only() {
        let (mut plugin, _) = plugin(ctx().with_function("world"), MockUpdater::new());
        let report = plugin.run_hook(LifecycleHook::PreFunctionPackage, None).await;

        assert_eq!(report.outcome, HookOutcome::Resolved { count: 1 });
        assert!(plugin.manifest().function("world").unwrap().resolved.is_some());
        assert!(plugin.manifest().function("hello").unwrap().resolved.is_none());
    }

    #[tokio::test]
    async fn test_pre_function_package_unknown_function() {
        let (mut plugin, sink) = plugin(ctx().with_function("ghost"), MockUpdater::new());
        let report = plugin.run_hook(LifecycleHook::PreFunctionPackage, None).await;

        assert_eq!(report.outcome, HookOutcome::Resolved { count: 0 });
        assert!(sink.contains(DiagnosticLevel::Error, "'ghost' is not declared"));
    }

    #[tokio::test]
    async fn test_patch_hooks_need_a_template() {
        let (mut plugin, _) = plugin(ctx(), MockUpdater::new());
        let report = plugin.run_hook(LifecycleHook::PostPackage, None).await;
        assert!(matches!(report.outcome, HookOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_post_deploy_skipped_during_function_deploy() {
        let mut updater = MockUpdater::new();
        updater.expect_update_logging_config().never();
        let (mut plugin, _) = plugin(ctx().with_function("hello"), updater);

        plugin.run_hook(LifecycleHook::PreFunctionPackage, None).await;
        let report = plugin.run_hook(LifecycleHook::PostDeploy, None).await;
        assert_eq!(report.outcome, HookOutcome::Reconciled(ReconcileReport::default()));
    }

    #[test]
    fn test_report_serialization() {
        let report = HookReport::new(LifecycleHook::PrePackage, HookOutcome::Resolved { count: 2 });
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "hook": "pre-package", "action": "resolved", "count": 2 })
        );
    }
}
