//! CLI command implementations.

pub mod patch;
pub mod reconcile;
pub mod resolve;

use anyhow::{Context, Result};
use lambda_logging_core::{DeployContext, LayeredSettings, ServiceManifest, Settings};
use std::path::PathBuf;

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub manifest: PathBuf,
    pub stage: Option<String>,
    pub region: Option<String>,
    pub function: Option<String>,
    pub quiet: bool,
}

impl Invocation {
    /// Load the manifest and settle the deployment context.
    pub fn load(&self) -> Result<(ServiceManifest, DeployContext)> {
        let manifest = ServiceManifest::load(&self.manifest)
            .with_context(|| format!("Failed to load manifest {}", self.manifest.display()))?;

        let ctx = LayeredSettings::new()
            .with_manifest(&manifest)
            .with_env()
            .with_explicit(Settings {
                stage: self.stage.clone(),
                region: self.region.clone(),
                function: self.function.clone(),
            })
            .context(&manifest);

        Ok((manifest, ctx))
    }
}
