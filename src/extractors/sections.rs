//! Markdown runbook contract extraction
//!
//! Every level-2 heading becomes one parameter whose description is the start
//! of the section body.

use super::ContractExtractor;
use crate::config::DEFAULT_DESCRIPTION_LIMIT;
use crate::contract::{ContractBoundary, FileType, Parameter};
use crate::error::ExtractionError;
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#[ \t]+(.+)$").expect("valid regex"))
}

fn section_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^##[ \t]+(.+?)$").expect("valid regex"))
}

#[derive(Debug, Clone, Copy)]
pub struct SectionExtractor {
    description_limit: usize,
}

impl SectionExtractor {
    /// `description_limit` counts characters, not bytes
    pub fn new(description_limit: usize) -> Self {
        Self { description_limit }
    }

    fn describe(&self, body: &str) -> Option<String> {
        let body = body.trim();
        if body.is_empty() {
            None
        } else {
            Some(body.chars().take(self.description_limit).collect())
        }
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_DESCRIPTION_LIMIT)
    }
}

impl ContractExtractor for SectionExtractor {
    fn file_type(&self) -> FileType {
        FileType::Markdown
    }

    fn extract_content(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<ContractBoundary, ExtractionError> {
        let mut boundary = ContractBoundary::new(path, FileType::Markdown);

        if let Some(caps) = title_regex().captures(content) {
            boundary.metadata.insert(
                "title".to_string(),
                Value::String(caps[1].trim().to_string()),
            );
        }

        let headings: Vec<_> = section_regex().captures_iter(content).collect();
        for (index, caps) in headings.iter().enumerate() {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let end = headings
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map_or(content.len(), |m| m.start());

            boundary.parameters.push(
                Parameter::new(name.as_str().trim())
                    .with_type("section")
                    .with_description(self.describe(&content[whole.end()..end])),
            );
        }

        let sections = boundary
            .parameter_names()
            .into_iter()
            .map(|name| Value::String(name.to_string()))
            .collect();
        boundary
            .metadata
            .insert("sections".to_string(), Value::Array(sections));

        debug!(
            path = %path.display(),
            sections = boundary.parameters.len(),
            "Extracted section contract"
        );

        Ok(boundary)
    }
}
