//! The compiled template and views over its resources.

use lambda_logging_core::util::data;
use lambda_logging_types::{LoggingError, Result};
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

/// Resource type of a function.
pub const FUNCTION_RESOURCE_TYPE: &str = "AWS::Lambda::Function";

/// Resource type of a nested stack.
pub const NESTED_STACK_RESOURCE_TYPE: &str = "AWS::CloudFormation::Stack";

/// Function property carrying the logging payload.
pub const LOGGING_CONFIG_PROPERTY: &str = "LoggingConfig";

/// Function property carrying the deployed name.
pub const FUNCTION_NAME_PROPERTY: &str = "FunctionName";

const RESOURCES: &str = "Resources";
const PROPERTIES: &str = "Properties";

/// A compiled infrastructure template.
///
/// Only the `Resources` section is interpreted; everything else is carried
/// through untouched, in its original key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    document: JsonValue,
}

impl Template {
    /// Wrap a template document. The document must be a JSON object.
    pub fn new(document: JsonValue) -> Result<Self> {
        if !document.is_object() {
            return Err(LoggingError::Template("Template root is not an object".to_string()));
        }
        if let Some(resources) = document.get(RESOURCES) {
            if !resources.is_object() {
                return Err(LoggingError::Template(
                    "Resources section is not an object".to_string(),
                ));
            }
        }
        Ok(Self { document })
    }

    /// Load a template from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = data::load_json_file(path).map_err(|e| {
            LoggingError::Template(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::new(document)
    }

    /// Write the template to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        data::save_json_file(path, &self.document)
    }

    /// Iterate over all resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = ResourceRef<'_>> {
        self.document
            .get(RESOURCES)
            .and_then(JsonValue::as_object)
            .into_iter()
            .flat_map(|resources| resources.iter())
            .map(|(id, value)| ResourceRef { id, value })
    }

    /// Look up a resource by logical id.
    pub fn resource(&self, id: &str) -> Option<ResourceRef<'_>> {
        self.document
            .get(RESOURCES)?
            .as_object()?
            .iter()
            .find(|(key, _)| key.as_str() == id)
            .map(|(id, value)| ResourceRef { id, value })
    }

    /// Look up a resource by logical id for mutation.
    pub fn resource_mut(&mut self, id: &str) -> Option<&mut JsonValue> {
        self.document.get_mut(RESOURCES)?.get_mut(id)
    }

    /// The whole document.
    pub fn as_value(&self) -> &JsonValue {
        &self.document
    }
}

/// Borrowed view of one resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceRef<'t> {
    /// Logical id
    pub id: &'t str,
    /// Resource body (`Type`, `Properties`, ...)
    pub value: &'t JsonValue,
}

impl<'t> ResourceRef<'t> {
    /// Resource type tag.
    pub fn resource_type(&self) -> Option<&'t str> {
        self.value.get("Type").and_then(JsonValue::as_str)
    }

    /// Whether this is a function resource.
    pub fn is_function(&self) -> bool {
        self.resource_type() == Some(FUNCTION_RESOURCE_TYPE)
    }

    /// Whether this is a nested stack resource.
    pub fn is_nested_stack(&self) -> bool {
        self.resource_type() == Some(NESTED_STACK_RESOURCE_TYPE)
    }

    /// A string-valued property.
    ///
    /// Intrinsic functions (`Fn::Join`, `Ref`, ...) are not evaluated and
    /// yield `None`.
    pub fn property_str(&self, name: &str) -> Option<&'t str> {
        self.value
            .get(PROPERTIES)
            .and_then(|props| props.get(name))
            .and_then(JsonValue::as_str)
    }
}

/// Set one property on a resource body, creating `Properties` if absent.
pub(crate) fn set_property(resource: &mut JsonValue, name: &str, value: JsonValue) -> Result<()> {
    let body = resource
        .as_object_mut()
        .ok_or_else(|| LoggingError::Template("Resource is not an object".to_string()))?;

    let properties = body
        .entry(PROPERTIES)
        .or_insert_with(|| JsonValue::Object(Map::new()));

    match properties.as_object_mut() {
        Some(props) => {
            props.insert(name.to_string(), value);
            Ok(())
        }
        None => Err(LoggingError::Template("Properties is not an object".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> Template {
        Template::new(json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Resources": {
                "HelloLambdaFunction": {
                    "Type": "AWS::Lambda::Function",
                    "Properties": { "FunctionName": "svc-dev-hello", "MemorySize": 1024 }
                },
                "ApiNestedStack": {
                    "Type": "AWS::CloudFormation::Stack",
                    "Properties": { "TemplateURL": "https://example.com/api.json" }
                },
                "Bucket": { "Type": "AWS::S3::Bucket" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_rejects_non_object_documents() {
        assert!(Template::new(json!([1, 2])).is_err());
        assert!(Template::new(json!({"Resources": []})).is_err());
        assert!(Template::new(json!({})).is_ok());
    }

    #[test]
    fn test_resource_views() {
        let template = template();
        let ids: Vec<&str> = template.resources().map(|r| r.id).collect();
        assert_eq!(ids, vec!["HelloLambdaFunction", "ApiNestedStack", "Bucket"]);

        let hello = template.resource("HelloLambdaFunction").unwrap();
        assert!(hello.is_function());
        assert_eq!(hello.property_str(FUNCTION_NAME_PROPERTY), Some("svc-dev-hello"));
        assert!(template.resource("ApiNestedStack").unwrap().is_nested_stack());
        assert_eq!(template.resource("Bucket").unwrap().property_str("Anything"), None);
    }

    #[test]
    fn test_set_property_creates_properties() {
        let mut template = template();
        let bucket = template.resource_mut("Bucket").unwrap();
        set_property(bucket, "Tags", json!([])).unwrap();
        assert_eq!(template.as_value()["Resources"]["Bucket"]["Properties"]["Tags"], json!([]));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cloudformation-template-update-stack.json");

        let template = template();
        template.save(&path).unwrap();
        assert_eq!(Template::load(&path).unwrap(), template);
    }
}
