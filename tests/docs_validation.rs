//! Documentation validator integration tests
//!
//! Fixture documents live under `tests/fixtures/docs`; filename rules are
//! exercised against temporary files so the names can vary freely.

mod support;

use contract_boundary::validation::{FilenameRule, TagBalanceRule};
use contract_boundary::{
    validate_docs, DocValidator, MockFileSystem, RealFileSystem, Severity, ValidationResult,
    ValidatorConfig,
};
use std::fs;
use std::path::Path;
use support::fixture_path;
use tempfile::TempDir;
use yare::parameterized;

const VALID_BODY: &str = r#"---
title: Test
category: spec
description: Test spec
---

<ParamField path="config.host" type="string">
  Test parameter
</ParamField>
"#;

fn validate_fixture(name: &str) -> ValidationResult {
    validate_docs(fixture_path("docs", name))
}

fn validate_named(file_name: &str, content: &str) -> ValidationResult {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    fs::write(&path, content).unwrap();
    validate_docs(&path)
}

fn lines_and_messages(result: &ValidationResult) -> Vec<(Option<usize>, &str)> {
    result
        .errors
        .iter()
        .map(|e| (e.line, e.message.as_str()))
        .collect()
}

#[test]
fn test_valid_spec_fixture() {
    let result = validate_fixture("api-spec.mdx");

    assert!(result.valid, "{:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_step_without_title_inside_unclosed_steps() {
    let result = validate_fixture("db-failover.mdx");

    assert!(!result.valid);
    assert_eq!(
        lines_and_messages(&result),
        vec![
            (Some(11), "Step requires 'title' attribute"),
            (Some(7), "Unclosed tag: <Steps>"),
        ]
    );
}

#[test]
fn test_broken_spec_fixture_reports_every_rule() {
    let result = validate_fixture("broken-spec.mdx");
    let allowed = "Allowed: ParamField, Step, Steps, CodeBlock, Callout";

    assert_eq!(
        lines_and_messages(&result),
        vec![
            (None, "Missing required frontmatter field: description"),
            (
                Some(3),
                "Invalid category 'tutorial', must be one of: spec, runbook, adr"
            ),
            (Some(6), "ParamField requires 'path' attribute"),
            (Some(6), "ParamField requires 'type' attribute"),
            (Some(10), format!("Unknown component: Tabs. {}", allowed).as_str()),
            (Some(11), format!("Unknown component: Tab. {}", allowed).as_str()),
            (Some(12), "Closing tag </Tabs> without matching opening tag"),
            (Some(10), "Unclosed tag: <Tabs>"),
        ]
    );
    assert!(result.errors.iter().all(|e| e.severity == Severity::Error));
}

#[test]
fn test_missing_frontmatter_fixture() {
    let result = validate_fixture("no-frontmatter.mdx");

    assert_eq!(
        lines_and_messages(&result),
        vec![(Some(1), "Missing frontmatter section (must start with ---)")]
    );
}

#[parameterized(
    one_word = { "overview.mdx" },
    two_words = { "test-spec.mdx" },
    three_words = { "api-gateway-spec.mdx" },
)]
fn test_valid_filenames(file_name: &str) {
    let result = validate_named(file_name, VALID_BODY);
    assert!(result.valid, "{:?}", result.errors);
}

#[parameterized(
    four_words = { "one-two-three-four.mdx", "Filename must have max 3 words, got 4: one-two-three-four" },
    iso_date = { "2024-01-15.mdx", "Filename must not contain timestamps: 2024-01-15" },
    unix_time = { "log-1700000000.mdx", "Filename must not contain timestamps: log-1700000000" },
    camel_case = { "ApiSpec.mdx", "Filename must be kebab-case: ApiSpec" },
    markdown = { "api-spec.md", "File must have .mdx extension, got: .md" },
)]
fn test_invalid_filenames(file_name: &str, expected: &str) {
    let result = validate_named(file_name, VALID_BODY);

    assert!(!result.valid);
    assert!(
        result.has_error_containing(expected),
        "{:?} missing {}",
        result.errors,
        expected
    );
}

#[test]
fn test_attribute_order_does_not_matter() {
    let content = VALID_BODY.replace(
        r#"<ParamField path="config.host" type="string">"#,
        r#"<ParamField type="string" path="config.host">"#,
    );
    assert!(validate_named("test-spec.mdx", &content).valid);
}

#[test]
fn test_self_closing_tags_valid() {
    let content = "---\ntitle: Test\ncategory: spec\ndescription: Test spec\n---\n\n<ParamField path=\"config.host\" type=\"string\" />\n";
    assert!(validate_named("test-spec.mdx", content).valid);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Not_Here.txt");

    let result = validate_docs(&path);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.starts_with("File not found: "));
}

#[test]
fn test_non_utf8_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("binary.mdx");
    fs::write(&path, [0xc3, 0x28, 0xa0]).unwrap();

    let result = validate_docs(&path);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.starts_with("Failed to read file: "));
}

#[test]
fn test_result_serializes() {
    let result = validate_fixture("db-failover.mdx");
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["valid"], false);
    assert_eq!(value["errors"][0]["line"], 11);
    assert_eq!(value["errors"][0]["severity"], "error");
    assert_eq!(value["warnings"], serde_json::json!([]));
}

#[test]
fn test_custom_rules_and_config_on_real_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("release-notes.md");
    fs::write(&path, "<Tabs>\n").unwrap();

    let config = ValidatorConfig::from_yaml_str("required_extension: .md\n").unwrap();
    let validator = DocValidator::new(RealFileSystem)
        .with_config(config)
        .with_rules(vec![Box::new(FilenameRule), Box::new(TagBalanceRule)]);

    let result = validator.validate(&path);
    assert_eq!(result.error_messages(), vec!["Unclosed tag: <Tabs>"]);
}

#[test]
fn test_mock_and_real_file_systems_agree() {
    let content = fs::read_to_string(fixture_path("docs", "broken-spec.mdx")).unwrap();
    let mock = MockFileSystem::new();
    mock.add_file("broken-spec.mdx", &content);

    let from_mock = DocValidator::new(mock).validate(Path::new("/mock/broken-spec.mdx"));
    let from_disk = validate_fixture("broken-spec.mdx");

    assert_eq!(from_mock.errors, from_disk.errors);
}
