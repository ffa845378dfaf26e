//! Locating a function's resource in the compiled template.

use super::types::{ResourceRef, Template, FUNCTION_NAME_PROPERTY};
use super::variations::{matches_nested_stack, NameVariations};
use lambda_logging_types::ServiceTarget;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Where a function's resource was found.
#[derive(Debug, Clone, PartialEq)]
pub enum LocatedResource<'t> {
    /// The resource is in the top-level graph and can be patched in place.
    Direct {
        /// Logical id
        id: &'t str,
        /// Resource body
        resource: &'t JsonValue,
    },
    /// The function appears to live inside a nested stack. Its resource is
    /// not visible, so only the deployed name is known.
    Nested {
        /// Logical id of the nested stack that matched
        stack_id: &'t str,
        /// Deployed function name
        function_name: String,
    },
}

impl LocatedResource<'_> {
    /// Whether the resource lives in a nested stack.
    pub fn is_nested(&self) -> bool {
        matches!(self, LocatedResource::Nested { .. })
    }
}

/// Resource locator over one compiled template.
pub struct ResourceLocator<'t> {
    template: &'t Template,
    target: &'t ServiceTarget,
}

impl<'t> ResourceLocator<'t> {
    /// Create a locator for `template`, deployed under `target`.
    pub fn new(template: &'t Template, target: &'t ServiceTarget) -> Self {
        Self { template, target }
    }

    /// Find the resource of `function_id`, whose explicit deployed name (if
    /// any) is `explicit_name`.
    ///
    /// Function resources in the top-level graph are matched by logical id
    /// or by `FunctionName`. Failing that, nested stacks are matched by the
    /// name-variation heuristic.
    pub fn find_function_resource(
        &self,
        function_id: &str,
        explicit_name: Option<&str>,
    ) -> Option<LocatedResource<'t>> {
        let function_name = self.target.display_name(function_id, explicit_name);

        if let Some(found) = self.find_direct(function_id, &function_name) {
            debug!(function = function_id, resource = found.id, "located function resource");
            return Some(LocatedResource::Direct {
                id: found.id,
                resource: found.value,
            });
        }

        let stack = self.find_nested_stack(function_id)?;
        debug!(function = function_id, stack = stack.id, "function matched a nested stack");
        Some(LocatedResource::Nested {
            stack_id: stack.id,
            function_name,
        })
    }

    fn find_direct(&self, function_id: &str, function_name: &str) -> Option<ResourceRef<'t>> {
        let logical_id = ServiceTarget::logical_function_id(function_id);
        let short_id = ServiceTarget::short_function_id(function_id);

        self.template.resources().find(|resource| {
            resource.is_function()
                && (resource.id == logical_id
                    || resource.id == short_id
                    || resource.property_str(FUNCTION_NAME_PROPERTY) == Some(function_name))
        })
    }

    fn find_nested_stack(&self, function_id: &str) -> Option<ResourceRef<'t>> {
        let variations = NameVariations::new(function_id, self.target);
        self.template
            .resources()
            .filter(|resource| resource.is_nested_stack())
            .find(|stack| matches_nested_stack(stack.id, variations.as_slice()))
    }
}
