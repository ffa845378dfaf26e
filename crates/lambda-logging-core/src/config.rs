//! Service manifest and deployment settings.
//!
//! The manifest is the declarative service definition: service name, provider
//! block, the global `custom.logging` tier, and the declared functions.
//!
//! ## Settings Layers
//!
//! Deployment settings (stage, region, function selector) are resolved in this
//! priority order:
//! 1. Explicit settings (command-line flags, host invocation)
//! 2. Environment variables
//! 3. Values from the manifest's provider block
//! 4. Default values

use crate::util::data;
use indexmap::IndexMap;
use lambda_logging_types::{LoggingConfig, LoggingError, LoggingOverrides, Result, ServiceTarget};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Stage used when nothing else names one.
pub const DEFAULT_STAGE: &str = "dev";

/// Environment variable overriding the stage.
pub const ENV_STAGE: &str = "LAMBDA_LOGGING_STAGE";

/// Environment variable overriding the region.
pub const ENV_REGION: &str = "LAMBDA_LOGGING_REGION";

/// Declarative service manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceManifest {
    /// Service name
    pub service: String,

    /// Provider block
    #[serde(default, deserialize_with = "null_default")]
    pub provider: ProviderSection,

    /// Plugin-specific settings
    #[serde(default, deserialize_with = "null_default")]
    pub custom: CustomSection,

    /// Declared functions, in declaration order
    #[serde(default, deserialize_with = "function_map")]
    pub functions: IndexMap<String, FunctionEntry>,
}

/// Provider block of the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    /// Default stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Default region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Everything else the provider block declares
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// `custom` block of the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomSection {
    /// Global logging tier
    #[serde(default, deserialize_with = "null_default")]
    pub logging: LoggingOverrides,

    /// Settings belonging to other plugins
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One declared function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionEntry {
    /// Explicit deployed name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Function-level logging tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingOverrides>,

    /// Environment variables passed to the function
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "IndexMap::is_empty")]
    pub environment: IndexMap<String, Value>,

    /// Configuration produced by the resolver
    #[serde(skip)]
    pub resolved: Option<LoggingConfig>,

    /// Everything else the function declares (handler, events, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl FunctionEntry {
    /// Deployed name of this function under `target`.
    pub fn display_name(&self, function_id: &str, target: &ServiceTarget) -> String {
        target.display_name(function_id, self.name.as_deref())
    }
}

impl ServiceManifest {
    /// Load a manifest from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let value = data::load_yaml_file(path).map_err(|e| {
            LoggingError::Manifest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_value(value)
    }

    /// Parse a manifest from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::from_value(data::load_yaml(content)?)
    }

    fn from_value(value: Value) -> Result<Self> {
        let manifest: ServiceManifest = serde_json::from_value(value)
            .map_err(|e| LoggingError::Manifest(format!("Invalid service manifest: {}", e)))?;

        if manifest.service.trim().is_empty() {
            lambda_logging_types::bail!(Manifest, "Service name must not be empty");
        }

        Ok(manifest)
    }

    /// Global logging tier.
    pub fn global_tier(&self) -> &LoggingOverrides {
        &self.custom.logging
    }

    /// Look up a declared function.
    pub fn function(&self, id: &str) -> Option<&FunctionEntry> {
        self.functions.get(id)
    }

    /// Look up a declared function for mutation.
    pub fn function_mut(&mut self, id: &str) -> Option<&mut FunctionEntry> {
        self.functions.get_mut(id)
    }

    /// Declared function identifiers, in declaration order.
    pub fn function_ids(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// `hello:` with no body is a valid declaration.
fn function_map<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, FunctionEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IndexMap<String, Option<FunctionEntry>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(id, entry)| (id, entry.unwrap_or_default()))
        .collect())
}

/// Settings layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values from the manifest
    Manifest = 1,
    /// Values from environment variables
    Environment = 2,
    /// Values set explicitly by the caller
    Explicit = 3,
}

/// Deployment settings within one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Stage name
    pub stage: Option<String>,
    /// AWS region
    pub region: Option<String>,
    /// Single-function selector
    pub function: Option<String>,
}

/// Deployment settings resolved across layers.
#[derive(Debug, Clone)]
pub struct LayeredSettings {
    layers: BTreeMap<ConfigLayer, Settings>,
}

impl LayeredSettings {
    /// Start from the default layer.
    pub fn new() -> Self {
        let mut layers = BTreeMap::new();
        layers.insert(
            ConfigLayer::Default,
            Settings {
                stage: Some(DEFAULT_STAGE.to_string()),
                ..Default::default()
            },
        );
        Self { layers }
    }

    /// Set the values of one layer.
    pub fn with_layer(mut self, layer: ConfigLayer, settings: Settings) -> Self {
        self.layers.insert(layer, settings);
        self
    }

    /// Add the manifest's provider block.
    pub fn with_manifest(self, manifest: &ServiceManifest) -> Self {
        self.with_layer(
            ConfigLayer::Manifest,
            Settings {
                stage: manifest.provider.stage.clone(),
                region: manifest.provider.region.clone(),
                function: None,
            },
        )
    }

    /// Add the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Add an environment layer read through `lookup`.
    pub fn with_env_from(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.with_layer(
            ConfigLayer::Environment,
            Settings {
                stage: lookup(ENV_STAGE),
                region: lookup(ENV_REGION),
                function: None,
            },
        )
    }

    /// Add explicitly provided settings.
    pub fn with_explicit(self, settings: Settings) -> Self {
        self.with_layer(ConfigLayer::Explicit, settings)
    }

    fn get(&self, field: impl Fn(&Settings) -> Option<&String>) -> Option<String> {
        self.layers
            .values()
            .rev()
            .find_map(|settings| field(settings).filter(|v| !v.trim().is_empty()))
            .cloned()
    }

    /// Resolved stage.
    pub fn stage(&self) -> String {
        self.get(|s| s.stage.as_ref())
            .unwrap_or_else(|| DEFAULT_STAGE.to_string())
    }

    /// Resolved region, if any layer names one.
    pub fn region(&self) -> Option<String> {
        self.get(|s| s.region.as_ref())
    }

    /// Resolved single-function selector.
    pub fn function(&self) -> Option<String> {
        self.get(|s| s.function.as_ref())
    }

    /// Build the invocation context for `manifest`.
    pub fn context(&self, manifest: &ServiceManifest) -> DeployContext {
        DeployContext {
            target: ServiceTarget::new(manifest.service.clone(), self.stage()),
            region: self.region(),
            function: self.function(),
        }
    }
}

impl Default for LayeredSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// The deployment invocation being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployContext {
    /// Service and stage
    pub target: ServiceTarget,
    /// AWS region
    pub region: Option<String>,
    /// Function selected for a single-function deployment
    pub function: Option<String>,
}

impl DeployContext {
    /// Context for a whole-service deployment.
    pub fn new(target: ServiceTarget) -> Self {
        Self {
            target,
            region: None,
            function: None,
        }
    }

    /// Select a single function.
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Whether a single-function deployment is in progress.
    pub fn is_single_function(&self) -> bool {
        self.function.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MANIFEST: &str = r#"
service: shop
provider:
  name: aws
  stage: staging
  runtime: nodejs20.x
custom:
  logging:
    format: json
    applicationLevel: INFO
  otherPlugin:
    enabled: true
functions:
  hello:
    handler: handler.hello
    logging:
      applicationLevel: DEBUG
  world:
    name: world-explicit
  bare:
"#;

    #[test]
    fn test_manifest_parse() {
        let manifest = ServiceManifest::from_yaml_str(MANIFEST).unwrap();

        assert_eq!(manifest.service, "shop");
        assert_eq!(manifest.provider.stage.as_deref(), Some("staging"));
        assert_eq!(manifest.global_tier().format.as_deref(), Some("json"));
        assert!(manifest.custom.extra.contains_key("otherPlugin"));

        let ids: Vec<&str> = manifest.function_ids().collect();
        assert_eq!(ids, vec!["hello", "world", "bare"]);

        let hello = manifest.function("hello").unwrap();
        assert_eq!(hello.extra["handler"], "handler.hello");
        assert_eq!(
            hello.logging.as_ref().unwrap().application_level.as_deref(),
            Some("DEBUG")
        );
        assert!(manifest.function("bare").unwrap().logging.is_none());
    }

    #[test]
    fn test_manifest_with_short_form_tags() {
        let mut manifest = ServiceManifest::from_yaml_str(
            r#"
service: svc
functions:
  hello:
    environment:
      TABLE: !Ref OrdersTable
    logging:
      format: json
"#,
        )
        .unwrap();

        let sink = crate::MemorySink::new();
        crate::ConfigResolver::new(&sink).resolve_all(&mut manifest);

        let hello = manifest.function("hello").unwrap();
        assert_eq!(hello.environment["TABLE"], serde_json::json!({ "Ref": "OrdersTable" }));
        assert_eq!(hello.environment["AWS_LAMBDA_HANDLER_LOG_FORMAT"], "json");
    }

    #[test]
    fn test_manifest_requires_service() {
        assert!(ServiceManifest::from_yaml_str("functions: {}\n").is_err());
        assert!(ServiceManifest::from_yaml_str("service: ''\n").is_err());
    }

    #[test]
    fn test_manifest_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = ServiceManifest::load(file.path()).unwrap();
        assert_eq!(manifest.functions.len(), 3);
    }

    #[test]
    fn test_display_name() {
        let manifest = ServiceManifest::from_yaml_str(MANIFEST).unwrap();
        let target = ServiceTarget::new("shop", "staging");

        let hello = manifest.function("hello").unwrap();
        assert_eq!(hello.display_name("hello", &target), "shop-staging-hello");

        let world = manifest.function("world").unwrap();
        assert_eq!(world.display_name("world", &target), "world-explicit");
    }

    #[test]
    fn test_settings_layers() {
        let manifest = ServiceManifest::from_yaml_str(MANIFEST).unwrap();

        let settings = LayeredSettings::new().with_manifest(&manifest);
        assert_eq!(settings.stage(), "staging");

        let settings = settings.with_env_from(|key| match key {
            ENV_STAGE => Some("qa".to_string()),
            ENV_REGION => Some("eu-west-1".to_string()),
            _ => None,
        });
        assert_eq!(settings.stage(), "qa");
        assert_eq!(settings.region().as_deref(), Some("eu-west-1"));

        let settings = settings.with_explicit(Settings {
            stage: Some("prod".to_string()),
            function: Some("hello".to_string()),
            ..Default::default()
        });

        let context = settings.context(&manifest);
        assert_eq!(context.target, ServiceTarget::new("shop", "prod"));
        assert_eq!(context.region.as_deref(), Some("eu-west-1"));
        assert!(context.is_single_function());
    }

    #[test]
    fn test_settings_default_stage() {
        let settings = LayeredSettings::default();
        assert_eq!(settings.stage(), DEFAULT_STAGE);
        assert_eq!(settings.region(), None);
        assert_eq!(settings.function(), None);
    }
}
