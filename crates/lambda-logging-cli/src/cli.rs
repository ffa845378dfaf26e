//! CLI structure and command definitions.

use crate::commands::{self, Invocation};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lambda-logging")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lambda logging configuration for serverless deployments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Service manifest
    #[arg(short, long, global = true, default_value = "serverless.yml")]
    pub manifest: PathBuf,

    /// Deployment stage (overrides the manifest and LAMBDA_LOGGING_STAGE)
    #[arg(short, long, global = true)]
    pub stage: Option<String>,

    /// AWS region (overrides the manifest and LAMBDA_LOGGING_REGION)
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and print the logging configuration of each function
    Resolve {
        /// Resolve a single function
        #[arg(short, long)]
        function: Option<String>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Attach logging configuration to a compiled template
    Patch {
        /// Compiled template (JSON)
        #[arg(short, long)]
        template: PathBuf,

        /// Where to write the patched template (defaults to in place)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Persist payloads for nested stack functions here
        #[arg(long)]
        nested_store: Option<PathBuf>,
    },

    /// Push logging configuration to deployed functions
    Reconcile {
        /// Reconcile a single function
        #[arg(short, long)]
        function: Option<String>,

        /// Nested stack payloads written by `patch`
        #[arg(long)]
        nested_store: Option<PathBuf>,

        /// AWS credentials profile
        #[arg(long)]
        profile: Option<String>,

        /// Custom Lambda endpoint
        #[arg(long)]
        endpoint_url: Option<String>,
    },
}

impl Cli {
    fn invocation(&self, function: Option<String>) -> Invocation {
        Invocation {
            manifest: self.manifest.clone(),
            stage: self.stage.clone(),
            region: self.region.clone(),
            function,
            quiet: self.quiet,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        use commands::*;

        match &self.command {
            Commands::Resolve { function, json } => {
                resolve::execute(&self.invocation(function.clone()), *json)
            }
            Commands::Patch { template, out, nested_store } => patch::execute(
                &self.invocation(None),
                template,
                out.as_deref(),
                nested_store.as_deref(),
            ),
            Commands::Reconcile { function, nested_store, profile, endpoint_url } => {
                reconcile::execute(
                    &self.invocation(function.clone()),
                    nested_store.as_deref(),
                    profile.clone(),
                    endpoint_url.clone(),
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patch() {
        let cli = Cli::try_parse_from([
            "lambda-logging",
            "patch",
            "--template",
            ".serverless/cloudformation-template-update-stack.json",
            "--nested-store",
            ".serverless/nested-logging.json",
            "--stage",
            "prod",
        ])
        .unwrap();

        assert_eq!(cli.stage.as_deref(), Some("prod"));
        assert_eq!(cli.manifest, PathBuf::from("serverless.yml"));
        match cli.command {
            Commands::Patch { template, out, nested_store } => {
                assert!(template.ends_with("cloudformation-template-update-stack.json"));
                assert!(out.is_none());
                assert!(nested_store.is_some());
            }
            _ => panic!("expected patch"),
        }
    }

    #[test]
    fn test_parse_reconcile_function() {
        let cli = Cli::try_parse_from([
            "lambda-logging",
            "reconcile",
            "-f",
            "hello",
            "--profile",
            "ops",
        ])
        .unwrap();
        let invocation = match &cli.command {
            Commands::Reconcile { function, profile, .. } => {
                assert_eq!(profile.as_deref(), Some("ops"));
                cli.invocation(function.clone())
            }
            _ => panic!("expected reconcile"),
        };
        assert_eq!(invocation.function.as_deref(), Some("hello"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["lambda-logging", "-v", "-q", "resolve"]).is_err());
    }
}
