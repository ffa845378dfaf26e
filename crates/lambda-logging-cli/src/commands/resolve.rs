//! Resolve and print function logging configuration.

use super::Invocation;
use anyhow::{bail, Result};
use colored::Colorize;
use lambda_logging_core::{ConfigResolver, TracingSink};
use lambda_logging_types::LoggingConfig;

pub fn execute(invocation: &Invocation, json: bool) -> Result<()> {
    let (mut manifest, ctx) = invocation.load()?;
    let resolver = ConfigResolver::new(&TracingSink);

    match ctx.function.as_deref() {
        Some(function_id) => {
            if resolver.resolve_function(&mut manifest, function_id).is_none() {
                bail!("Function '{}' is not declared in {}", function_id, manifest.service);
            }
        }
        None => {
            resolver.resolve_all(&mut manifest);
        }
    }

    let resolved: Vec<(&str, String, &LoggingConfig)> = manifest
        .functions
        .iter()
        .filter_map(|(id, entry)| {
            entry
                .resolved
                .as_ref()
                .map(|config| (id.as_str(), entry.display_name(id, &ctx.target), config))
        })
        .collect();

    if json {
        let mut payloads = serde_json::Map::new();
        for (id, name, config) in &resolved {
            payloads.insert(id.to_string(), serde_json::to_value(config.payload(name))?);
        }
        println!("{}", serde_json::to_string_pretty(&payloads)?);
        return Ok(());
    }

    println!("{} {} ({})", "Service:".bold(), manifest.service.cyan(), ctx.target.stage);
    for (id, name, config) in resolved {
        println!();
        println!("  {} {}", id.green().bold(), format!("({})", name).dimmed());
        println!("    format:           {}", config.format);
        if config.format.supports_levels() {
            println!("    applicationLevel: {}", config.application_level);
            println!("    systemLevel:      {}", config.system_level);
        }
        let payload = config.payload(&name);
        println!("    logGroup:         {}", payload.log_group);
        for (key, value) in config.environment() {
            println!("    {} {}={}", "env".dimmed(), key, value);
        }
    }

    Ok(())
}
