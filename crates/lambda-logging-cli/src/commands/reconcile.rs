//! Push logging configuration to deployed functions.

use super::Invocation;
use crate::ui::progress;
use anyhow::{Context, Result};
use colored::Colorize;
use lambda_logging_core::TracingSink;
use lambda_logging_deploy::{HookOutcome, LoggingPlugin};
use lambda_logging_services::{LambdaClient, LambdaConfig};
use lambda_logging_template::NestedStackConfigStore;
use lambda_logging_types::LifecycleHook;
use std::path::Path;
use std::sync::Arc;

pub async fn execute(
    invocation: &Invocation,
    nested_store: Option<&Path>,
    profile: Option<String>,
    endpoint_url: Option<String>,
) -> Result<()> {
    let (manifest, ctx) = invocation.load()?;

    let store = load_store(nested_store)?;

    let client = LambdaClient::new(LambdaConfig {
        region: ctx.region.clone(),
        profile,
        endpoint_url,
    })
    .await
    .context("Failed to create Lambda client")?;

    let single = ctx.is_single_function();
    let (resolve_hook, deploy_hook) = if single {
        (LifecycleHook::PreFunctionPackage, LifecycleHook::PostFunctionDeploy)
    } else {
        (LifecycleHook::PrePackage, LifecycleHook::PostDeploy)
    };

    let mut plugin = LoggingPlugin::new(manifest, ctx, Arc::new(TracingSink), Arc::new(client))
        .with_store(store);

    plugin.run_hook(resolve_hook, None).await;

    let spinner = progress::spinner(
        format!("Updating functions of {}...", plugin.context().target),
        invocation.quiet,
    );
    let report = plugin.run_hook(deploy_hook, None).await;
    spinner.finish_and_clear();

    let HookOutcome::Reconciled(report) = report.outcome else {
        return Ok(());
    };

    if !invocation.quiet {
        for id in &report.updated {
            println!("{} {}", "✓".green().bold(), id);
        }
        for id in &report.failed {
            println!("{} {}", "✗".red().bold(), id);
        }
        for id in &report.skipped {
            println!("{} {} (not resolved)", "-".dimmed(), id);
        }
        println!(
            "{} of {} function(s) updated",
            report.updated.len(),
            report.attempted()
        );
    }

    Ok(())
}

fn load_store(path: Option<&Path>) -> Result<NestedStackConfigStore> {
    match path {
        Some(path) => NestedStackConfigStore::load(path)
            .with_context(|| format!("Failed to read nested stack store {}", path.display())),
        None => Ok(NestedStackConfigStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_logging_types::{LogFormat, LoggingConfigPayload};

    #[test]
    fn test_load_store_without_path() {
        assert!(load_store(None).unwrap().is_empty());
    }

    #[test]
    fn test_load_store_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested-typo.json");

        let err = load_store(Some(path.as_path())).unwrap_err();
        assert!(format!("{:#}", err).contains("nested-typo.json"));
    }

    #[test]
    fn test_load_store_reads_saved_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested.json");
        let mut store = NestedStackConfigStore::new();
        store.insert(
            "foo",
            LoggingConfigPayload {
                log_format: LogFormat::Text,
                log_group: "/aws/lambda/service-dev-foo".to_string(),
                application_log_level: None,
                system_log_level: None,
            },
        );
        store.save(&path).unwrap();

        assert!(load_store(Some(path.as_path())).unwrap().contains("foo"));
    }
}
