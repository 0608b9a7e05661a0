use crate::fs::{FileSystem, RealFileSystem};
use crate::validation::config::ValidatorConfig;
use crate::validation::rules::{
    ComponentWhitelistRule, DocRule, Document, FilenameRule, FrontmatterRule, TagBalanceRule,
};
use crate::validation::types::{ValidationError, ValidationResult};
use std::path::Path;
use tracing::{debug, info};

/// Runs documentation rules, in order, against files read through `F`
pub struct DocValidator<F: FileSystem> {
    fs: F,
    config: ValidatorConfig,
    rules: Vec<Box<dyn DocRule>>,
}

impl<F: FileSystem> DocValidator<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            config: ValidatorConfig::default(),
            rules: default_rules(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rules(mut self, rules: Vec<Box<dyn DocRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Never fails; a missing or unreadable file yields an invalid result
    pub fn validate(&self, path: &Path) -> ValidationResult {
        if !self.fs.exists(path) {
            return ValidationResult::failure(format!("File not found: {}", path.display()));
        }
        if !self.fs.is_file(path) {
            return ValidationResult::failure("Failed to read file: Not a file");
        }

        let content = match self.fs.read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return ValidationResult::failure(format!(
                    "Failed to read file: {}",
                    e.root_cause()
                ))
            }
        };

        self.validate_content(path, &content)
    }

    /// Checks already-loaded content; `path` supplies the filename under test
    pub fn validate_content(&self, path: &Path, content: &str) -> ValidationResult {
        let doc = Document::new(path, content);
        let mut errors: Vec<ValidationError> = Vec::new();

        for rule in &self.rules {
            let before = errors.len();
            rule.check(&doc, &self.config, &mut errors);
            debug!(
                rule = rule.name(),
                errors = errors.len() - before,
                "Documentation rule checked"
            );
        }

        let result = ValidationResult::from_findings(errors, Vec::new());
        info!(
            path = %path.display(),
            valid = result.valid,
            errors = result.errors.len(),
            "Validated documentation file"
        );
        result
    }
}

fn default_rules() -> Vec<Box<dyn DocRule>> {
    vec![
        Box::new(FilenameRule),
        Box::new(FrontmatterRule),
        Box::new(ComponentWhitelistRule),
        Box::new(TagBalanceRule),
    ]
}

/// Validates a file on the local file system with the default conventions
pub fn validate_docs(path: impl AsRef<Path>) -> ValidationResult {
    DocValidator::new(RealFileSystem).validate(path.as_ref())
}
