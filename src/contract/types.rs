//! Value types shared by every format extractor

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Extractor-specific auxiliary facts (manifest name, policy package, document title, ...)
pub type Metadata = serde_json::Map<String, Value>;

/// Artifact kind, derived purely from the filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Declarative manifest (`.yaml`, `.yml`)
    Yaml,
    /// Source module (`.py`)
    Python,
    /// Policy rules (`.rego`)
    Rego,
    /// Heading-structured document (`.md`, `.markdown`)
    Markdown,
    Unknown,
}

impl FileType {
    /// Detect the file type from the path's extension, ignoring case
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => FileType::Yaml,
            Some("py") => FileType::Python,
            Some("rego") => FileType::Rego,
            Some("md") | Some("markdown") => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Yaml => "yaml",
            FileType::Python => "python",
            FileType::Rego => "rego",
            FileType::Markdown => "markdown",
            FileType::Unknown => "unknown",
        }
    }

    pub fn is_supported(&self) -> bool {
        *self != FileType::Unknown
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One externally observable input of an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Dotted path, e.g. `tags.environment` or `process_data.input_file`
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: None,
            required: false,
            default: None,
            description: None,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = Some(param_type.into());
        self
    }

    pub fn with_optional_type(mut self, param_type: Option<String>) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.param_type.as_deref()
    }
}

/// Normalized contract extracted from a single file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractBoundary {
    pub file_path: String,
    pub file_type: FileType,
    /// In extraction order, never sorted
    pub parameters: Vec<Parameter>,
    pub metadata: Metadata,
}

impl ContractBoundary {
    pub fn new(file_path: &Path, file_type: FileType) -> Self {
        Self {
            file_path: file_path.to_string_lossy().to_string(),
            file_type,
            parameters: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// First parameter with the given name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Names of all parameters with the given type, in extraction order
    pub fn names_of_type(&self, param_type: &str) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.type_name() == Some(param_type))
            .map(|p| p.name.clone())
            .collect()
    }
}
