//! Payloads deferred for functions living in nested stacks.

use indexmap::IndexMap;
use lambda_logging_core::util::data;
use lambda_logging_types::{LoggingConfigPayload, LoggingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Logging payloads for functions the template patch could not reach.
///
/// One store belongs to one deployment operation: it is filled while the
/// template is patched and read when the deployed functions are reconciled.
/// Each function id is written at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedStackConfigStore {
    configs: IndexMap<String, LoggingConfigPayload>,
}

impl NestedStackConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the payload for `function_id`.
    ///
    /// Returns `false`, leaving the existing payload in place, if the
    /// function already has one.
    pub fn insert(
        &mut self,
        function_id: impl Into<String>,
        payload: LoggingConfigPayload,
    ) -> bool {
        let function_id = function_id.into();
        if self.configs.contains_key(&function_id) {
            debug!(function = %function_id, "nested stack payload already stored");
            return false;
        }
        debug!(function = %function_id, "storing nested stack payload");
        self.configs.insert(function_id, payload);
        true
    }

    /// Payload stored for `function_id`.
    pub fn get(&self, function_id: &str) -> Option<&LoggingConfigPayload> {
        self.configs.get(function_id)
    }

    /// Whether `function_id` has a stored payload.
    pub fn contains(&self, function_id: &str) -> bool {
        self.configs.contains_key(function_id)
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Stored function ids and payloads, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoggingConfigPayload)> {
        self.configs.iter().map(|(id, payload)| (id.as_str(), payload))
    }

    /// Load a store persisted by [`NestedStackConfigStore::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let value = data::load_json_file(path)?;
        serde_json::from_value(value)
            .map_err(|e| LoggingError::Config(format!("Invalid nested stack store: {}", e)))
    }

    /// Persist the store so a later process can reconcile from it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        data::save_json_file(path, self)
    }
}
