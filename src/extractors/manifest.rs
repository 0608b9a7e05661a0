//! Declarative manifest (YAML) contract extraction
//!
//! Only `metadata.{name,namespace,labels,annotations}`, `spec.forProvider` and
//! `spec.compositeTypeRef` are read. `status`, `patches` and everything else is
//! never inspected, so runtime state cannot leak into the contract.

use super::ContractExtractor;
use crate::contract::{ContractBoundary, FileType, Parameter};
use crate::error::ExtractionError;
use serde_json::Value as JsonValue;
use serde_yaml::{Mapping, Value as YamlValue};
use std::path::Path;
use tracing::debug;

const METADATA_KEYS: [&str; 4] = ["name", "namespace", "labels", "annotations"];

/// Extracts `spec.forProvider` parameters from a mapping-rooted YAML manifest
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestExtractor;

impl ManifestExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ContractExtractor for ManifestExtractor {
    fn file_type(&self) -> FileType {
        FileType::Yaml
    }

    fn extract_content(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<ContractBoundary, ExtractionError> {
        let document: YamlValue = serde_yaml::from_str(content)?;
        let root = match untag(&document) {
            YamlValue::Mapping(root) => root,
            other => {
                return Err(ExtractionError::MalformedManifest(format!(
                    "YAML file must contain a mapping at the root, found {}",
                    yaml_kind(other)
                )))
            }
        };

        let mut boundary = ContractBoundary::new(path, FileType::Yaml);

        if let Some(YamlValue::Mapping(metadata)) = root.get("metadata").map(untag) {
            for key in METADATA_KEYS {
                if let Some(value) = metadata.get(key) {
                    boundary
                        .metadata
                        .insert(key.to_string(), yaml_to_json(value));
                }
            }
        }

        if let Some(YamlValue::Mapping(spec)) = root.get("spec").map(untag) {
            if let Some(YamlValue::Mapping(for_provider)) = spec.get("forProvider").map(untag) {
                flatten_for_provider(for_provider, "", &mut boundary.parameters);
            }

            if let Some(type_ref) = spec.get("compositeTypeRef") {
                boundary
                    .metadata
                    .insert("compositeTypeRef".to_string(), yaml_to_json(type_ref));
            }
        }

        debug!(
            path = %path.display(),
            parameters = boundary.parameters.len(),
            "Extracted manifest contract"
        );

        Ok(boundary)
    }
}

/// Emits one parameter per key, then recurses into nested mappings
fn flatten_for_provider(mapping: &Mapping, prefix: &str, parameters: &mut Vec<Parameter>) {
    for (key, value) in mapping {
        let name = format!("{}{}", prefix, key_text(key));
        let value = untag(value);

        let mut param = Parameter::new(name.clone()).with_type(infer_type(value));
        if !matches!(
            value,
            YamlValue::Mapping(_) | YamlValue::Sequence(_) | YamlValue::Null
        ) {
            param = param.with_default(yaml_to_json(value));
        }
        parameters.push(param);

        if let YamlValue::Mapping(nested) = value {
            flatten_for_provider(nested, &format!("{}.", name), parameters);
        }
    }
}

fn infer_type(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Bool(_) => "boolean",
        YamlValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        YamlValue::Number(_) => "number",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "array",
        YamlValue::Mapping(_) => "object",
        YamlValue::Null | YamlValue::Tagged(_) => "unknown",
    }
}

fn yaml_kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "an empty document",
        YamlValue::Sequence(_) => "a list",
        YamlValue::Mapping(_) => "a mapping",
        _ => "a scalar",
    }
}

fn untag(value: &YamlValue) -> &YamlValue {
    match value {
        YamlValue::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Mapping keys are rendered as their scalar text; complex keys fall back to YAML
fn key_text(key: &YamlValue) -> String {
    match untag(key) {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Total conversion; non-finite floats become `null`
pub(crate) fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        YamlValue::String(s) => JsonValue::String(s.clone()),
        YamlValue::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (key_text(k), yaml_to_json(v)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
