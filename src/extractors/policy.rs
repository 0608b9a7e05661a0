//! Rego policy contract extraction
//!
//! Best-effort pattern matching: rule heads and `input.*` references are found
//! with regexes, so matches inside strings or comments are accepted.

use super::ContractExtractor;
use crate::contract::{ContractBoundary, FileType, Parameter};
use crate::error::ExtractionError;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Words that can start a line without naming a rule
const NON_RULE_WORDS: [&str; 12] = [
    "package", "import", "default", "if", "else", "some", "every", "not", "with", "as", "in",
    "contains",
];

fn package_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*package[ \t]+([\w.]+)").expect("valid regex"))
}

fn rule_head_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[ \t]*(?:default[ \t]+)?(\w+)(?:\[([^\]]+)\])?[ \t]*(?:contains[ \t]+\w+[ \t]*)?(:=|==|=|\{|if\b)",
        )
        .expect("valid regex")
    })
}

fn input_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\binput\.(\w+(?:\.\w+)*)").expect("valid regex"))
}

/// Net change in brace nesting, ignoring strings and `#` comments
fn brace_delta(line: &str) -> isize {
    let mut delta = 0;
    let mut quote = None;
    let mut escaped = false;

    for c in line.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '`' => quote = Some(c),
                '#' => break,
                '{' => delta += 1,
                '}' => delta -= 1,
                _ => {}
            },
        }
    }

    delta
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyExtractor;

impl PolicyExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Rule heads are only recognized outside rule bodies, at any indentation
    fn extract_rules(content: &str, parameters: &mut Vec<Parameter>) {
        let mut depth = 0usize;

        for line in content.lines() {
            let at_top_level = depth == 0;
            depth = depth.saturating_add_signed(brace_delta(line));
            if !at_top_level {
                continue;
            }

            let Some(caps) = rule_head_regex().captures(line) else {
                continue;
            };
            let rule = &caps[1];
            if &caps[3] == "==" || NON_RULE_WORDS.contains(&rule) {
                continue;
            }

            parameters.push(Parameter::new(rule).with_type("rule"));

            if let Some(params) = caps.get(2) {
                for param in params.as_str().split(',').map(str::trim) {
                    if param.is_empty() {
                        continue;
                    }
                    parameters.push(
                        Parameter::new(format!("{}.{}", rule, param))
                            .with_type("input")
                            .required(true),
                    );
                }
            }
        }
    }

    fn extract_inputs(content: &str, parameters: &mut Vec<Parameter>) {
        let mut seen = HashSet::new();
        for caps in input_ref_regex().captures_iter(content) {
            let name = format!("input.{}", &caps[1]);
            if seen.insert(name.clone()) {
                parameters.push(Parameter::new(name).with_type("input"));
            }
        }
    }
}

impl ContractExtractor for PolicyExtractor {
    fn file_type(&self) -> FileType {
        FileType::Rego
    }

    fn extract_content(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<ContractBoundary, ExtractionError> {
        let mut boundary = ContractBoundary::new(path, FileType::Rego);

        if let Some(caps) = package_regex().captures(content) {
            boundary
                .metadata
                .insert("package".to_string(), Value::String(caps[1].to_string()));
        }

        Self::extract_rules(content, &mut boundary.parameters);
        Self::extract_inputs(content, &mut boundary.parameters);

        let rules = boundary
            .names_of_type("rule")
            .into_iter()
            .map(Value::String)
            .collect();
        boundary
            .metadata
            .insert("rules".to_string(), Value::Array(rules));

        debug!(
            path = %path.display(),
            parameters = boundary.parameters.len(),
            "Extracted policy contract"
        );

        Ok(boundary)
    }
}
