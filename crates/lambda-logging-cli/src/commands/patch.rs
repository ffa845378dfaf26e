//! Attach logging configuration to a compiled template.

use super::Invocation;
use anyhow::{Context, Result};
use colored::Colorize;
use lambda_logging_core::{ConfigResolver, TracingSink};
use lambda_logging_template::{NestedStackConfigStore, PatchReport, Template, TemplatePatcher};
use std::path::Path;

pub fn execute(
    invocation: &Invocation,
    template_path: &Path,
    out: Option<&Path>,
    nested_store: Option<&Path>,
) -> Result<()> {
    let report = run(invocation, template_path, out, nested_store)?;

    if invocation.quiet {
        return Ok(());
    }

    println!(
        "{} {} function(s) patched",
        "✓".green().bold(),
        report.patched.len()
    );
    if !report.deferred.is_empty() {
        println!(
            "  {} deferred to reconcile (nested stacks): {}",
            "→".yellow(),
            report.deferred.join(", ").cyan()
        );
    }
    if !report.missing.is_empty() {
        println!(
            "  {} no resource found: {}",
            "!".yellow().bold(),
            report.missing.join(", ")
        );
    }
    if !report.failed.is_empty() {
        println!("  {} not patched: {}", "✗".red().bold(), report.failed.join(", "));
    }

    Ok(())
}

fn run(
    invocation: &Invocation,
    template_path: &Path,
    out: Option<&Path>,
    nested_store: Option<&Path>,
) -> Result<PatchReport> {
    let (mut manifest, ctx) = invocation.load()?;
    let sink = TracingSink;

    ConfigResolver::new(&sink).resolve_all(&mut manifest);

    let mut template =
        Template::load(template_path).context("Failed to load compiled template")?;
    let mut store = NestedStackConfigStore::new();

    let report = TemplatePatcher::new(&ctx.target, &sink)
        .attach_logging_config(&manifest, &mut template, &mut store);

    let out = out.unwrap_or(template_path);
    template
        .save(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    if let Some(path) = nested_store {
        store
            .save(path)
            .with_context(|| format!("Failed to write nested stack store {}", path.display()))?;
    }

    Ok(report)
}
