//! Python module contract extraction
//!
//! Public function signatures and annotated class members form the contract.
//! Function bodies, module-level assignments and every other statement are
//! discarded.

mod declarations;
mod scanner;

use self::declarations::{parse_module, ClassDef, Declaration, FunctionDef};
use super::ContractExtractor;
use crate::contract::{ContractBoundary, FileType, Parameter};
use crate::error::ExtractionError;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

const RECEIVERS: [&str; 2] = ["self", "cls"];

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceExtractor;

impl SourceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ContractExtractor for SourceExtractor {
    fn file_type(&self) -> FileType {
        FileType::Python
    }

    fn extract_content(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<ContractBoundary, ExtractionError> {
        let module = parse_module(content)?;

        let mut boundary = ContractBoundary::new(path, FileType::Python);
        let mut classes = Vec::new();
        collect(&module, &mut boundary.parameters, &mut classes);

        if !classes.is_empty() {
            boundary.metadata.insert(
                "classes".to_string(),
                Value::Array(classes.into_iter().map(Value::String).collect()),
            );
        }

        debug!(
            path = %path.display(),
            parameters = boundary.parameters.len(),
            "Extracted source contract"
        );

        Ok(boundary)
    }
}

/// Depth-first walk in declaration order
fn collect(declarations: &[Declaration], parameters: &mut Vec<Parameter>, classes: &mut Vec<String>) {
    for declaration in declarations {
        match declaration {
            Declaration::Function(function) => {
                if !function.name.starts_with('_') {
                    emit_function(function, parameters);
                }
                collect(&function.body, parameters, classes);
            }
            Declaration::Class(class) => {
                classes.push(class.name.clone());
                emit_class(class, parameters);
                collect(&class.body, parameters, classes);
            }
            Declaration::Block(body) => collect(body, parameters, classes),
            Declaration::Field(_) => {}
        }
    }
}

fn emit_function(function: &FunctionDef, parameters: &mut Vec<Parameter>) {
    for (index, param) in function.params.iter().enumerate() {
        if !param.kind.is_positional() {
            continue;
        }
        if index == 0 && RECEIVERS.contains(&param.name.as_str()) {
            continue;
        }

        parameters.push(
            Parameter::new(format!("{}.{}", function.name, param.name))
                .with_optional_type(param.annotation.clone())
                .required(true),
        );
    }

    if let Some(returns) = &function.returns {
        parameters.push(
            Parameter::new(format!("{}.return", function.name)).with_type(returns.clone()),
        );
    }
}

/// Direct annotated members only; fields inside nested blocks are not members
fn emit_class(class: &ClassDef, parameters: &mut Vec<Parameter>) {
    for member in &class.body {
        if let Declaration::Field(field) = member {
            parameters.push(
                Parameter::new(format!("{}.{}", class.name, field.name))
                    .with_type(field.annotation.clone())
                    .required(true),
            );
        }
    }
}
