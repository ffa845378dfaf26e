//! YAML and JSON data handling utilities.

use lambda_logging_types::{LoggingError, Result};
use serde::Serialize;
use serde_json::Value;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value as YamlValue};
use std::fs;
use std::path::Path;

/// Load YAML from string.
///
/// CloudFormation short-form tags are expanded to their long form, so
/// `!Ref Table` loads as `{"Ref": "Table"}` and `!GetAtt Role.Arn` as
/// `{"Fn::GetAtt": "Role.Arn"}`.
pub fn load_yaml(content: &str) -> Result<Value> {
    let yaml: YamlValue = serde_yaml::from_str(content).map_err(LoggingError::Yaml)?;
    serde_json::to_value(expand_tags(yaml)).map_err(LoggingError::Json)
}

fn expand_tags(value: YamlValue) -> YamlValue {
    match value {
        YamlValue::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let name = tag.to_string();
            let name = name.trim_start_matches('!');
            let key = match name {
                "Ref" | "Condition" => name.to_string(),
                _ => format!("Fn::{}", name),
            };
            let mut mapping = Mapping::new();
            mapping.insert(YamlValue::String(key), expand_tags(value));
            YamlValue::Mapping(mapping)
        }
        YamlValue::Sequence(items) => {
            YamlValue::Sequence(items.into_iter().map(expand_tags).collect())
        }
        YamlValue::Mapping(mapping) => YamlValue::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (expand_tags(key), expand_tags(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Load YAML from file.
pub fn load_yaml_file(path: impl AsRef<Path>) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    load_yaml(&content)
}

/// Load JSON from file.
pub fn load_json_file(path: impl AsRef<Path>) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(LoggingError::Json)
}

/// Save pretty-printed JSON to file.
pub fn save_json_file(path: impl AsRef<Path>, data: &impl Serialize) -> Result<()> {
    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_round_trip_keeps_key_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("template.json");

        let value: Value =
            serde_json::from_str(r#"{"Zeta": 1, "Alpha": {"B": 2, "A": 3}}"#).unwrap();
        save_json_file(&path, &value).unwrap();

        let loaded = load_json_file(&path).unwrap();
        let keys: Vec<&String> = loaded.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_load_yaml_expands_short_form_tags() {
        let value = load_yaml(
            r#"
table: !Ref OrdersTable
arn: !GetAtt Role.Arn
name: !Sub
  - '${Stage}-api'
  - Stage: dev
"#,
        )
        .unwrap();

        assert_eq!(value["table"], serde_json::json!({ "Ref": "OrdersTable" }));
        assert_eq!(value["arn"], serde_json::json!({ "Fn::GetAtt": "Role.Arn" }));
        assert_eq!(value["name"]["Fn::Sub"][1]["Stage"], "dev");
    }

    #[test]
    fn test_load_yaml_error() {
        assert!(matches!(load_yaml("key: [unclosed"), Err(LoggingError::Yaml(_))));
    }
}
