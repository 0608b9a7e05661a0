//! Conventions enforced by the documentation validator
//!
//! Defaults match the house style; a YAML document can override any field:
//!
//! ```yaml
//! required_extension: .mdx
//! max_filename_words: 3
//! required_fields: [title, category, description]
//! allowed_categories: [spec, runbook, adr]
//! components:
//!   - name: ParamField
//!     required_attributes: [path, type]
//!   - name: Steps
//! ```

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A whitelisted component and the attributes it must carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    #[serde(default)]
    pub required_attributes: Vec<String>,
}

impl ComponentSpec {
    pub fn new(name: &str, required_attributes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            required_attributes: required_attributes.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub required_extension: String,
    pub max_filename_words: usize,
    pub required_fields: Vec<String>,
    pub allowed_categories: Vec<String>,
    /// Order is preserved in "Allowed: ..." messages
    pub components: Vec<ComponentSpec>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            required_extension: ".mdx".to_string(),
            max_filename_words: 3,
            required_fields: vec![
                "title".to_string(),
                "category".to_string(),
                "description".to_string(),
            ],
            allowed_categories: vec![
                "spec".to_string(),
                "runbook".to_string(),
                "adr".to_string(),
            ],
            components: vec![
                ComponentSpec::new("ParamField", &["path", "type"]),
                ComponentSpec::new("Step", &["title"]),
                ComponentSpec::new("Steps", &[]),
                ComponentSpec::new("CodeBlock", &[]),
                ComponentSpec::new("Callout", &[]),
            ],
        }
    }
}

impl ValidatorConfig {
    /// Parses a YAML override; missing fields keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            field: "validator config".to_string(),
            error: e.to_string(),
        })
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.required_extension.starts_with('.') || self.required_extension.len() < 2 {
            return Err(ConfigError::ValidationFailed(format!(
                "Required extension must look like '.mdx', got '{}'",
                self.required_extension
            )));
        }

        if self.max_filename_words == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max filename words must be at least 1".to_string(),
            ));
        }

        if self.components.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Component whitelist cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if component.name.is_empty()
                || !component.name.chars().all(|c| c.is_alphanumeric() || c == '_')
            {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid component name: '{}'",
                    component.name
                )));
            }
            if !seen.insert(component.name.as_str()) {
                return Err(ConfigError::ValidationFailed(format!(
                    "Duplicate component: {}",
                    component.name
                )));
            }
        }

        Ok(())
    }
}
