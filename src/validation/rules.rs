use crate::validation::config::ValidatorConfig;
use crate::validation::tags::{scan_tags, Tag, TagKind};
use crate::validation::types::ValidationError;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn kebab_case_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"))
}

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}|\d{8}|\d{10}").expect("valid regex"))
}

fn frontmatter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A---\n(.*?)\n---").expect("valid regex"))
}

/// A documentation file prepared for the rules
///
/// Content has any byte order mark removed and `\r\n` folded to `\n`; line
/// numbers are unaffected.
pub struct Document<'a> {
    pub path: &'a Path,
    pub content: String,
    pub tags: Vec<Tag>,
}

impl<'a> Document<'a> {
    pub fn new(path: &'a Path, raw: &str) -> Self {
        let content = raw
            .strip_prefix('\u{feff}')
            .unwrap_or(raw)
            .replace("\r\n", "\n");
        let tags = scan_tags(&content);

        Self {
            path,
            content,
            tags,
        }
    }

    fn line_at(&self, offset: usize) -> usize {
        self.content[..offset].matches('\n').count() + 1
    }
}

pub trait DocRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, doc: &Document<'_>, config: &ValidatorConfig, errors: &mut Vec<ValidationError>);
}

/// Extension, kebab-case stem, word limit and no embedded dates
pub struct FilenameRule;

impl DocRule for FilenameRule {
    fn name(&self) -> &'static str {
        "Filename"
    }

    fn check(&self, doc: &Document<'_>, config: &ValidatorConfig, errors: &mut Vec<ValidationError>) {
        let stem = doc
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = doc
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        if suffix != config.required_extension {
            errors.push(ValidationError::file_level(format!(
                "File must have {} extension, got: {}",
                config.required_extension, suffix
            )));
        }

        if !kebab_case_regex().is_match(&stem) {
            errors.push(ValidationError::file_level(format!(
                "Filename must be kebab-case: {}",
                stem
            )));
        }

        let words = stem.split('-').count();
        if words > config.max_filename_words {
            errors.push(ValidationError::file_level(format!(
                "Filename must have max {} words, got {}: {}",
                config.max_filename_words, words, stem
            )));
        }

        if timestamp_regex().is_match(&stem) {
            errors.push(ValidationError::file_level(format!(
                "Filename must not contain timestamps: {}",
                stem
            )));
        }
    }
}

/// `---` delimited block with the required keys and a known category
pub struct FrontmatterRule;

impl DocRule for FrontmatterRule {
    fn name(&self) -> &'static str {
        "Frontmatter"
    }

    fn check(&self, doc: &Document<'_>, config: &ValidatorConfig, errors: &mut Vec<ValidationError>) {
        let Some(block) = frontmatter_regex()
            .captures(&doc.content)
            .and_then(|caps| caps.get(1))
        else {
            errors.push(ValidationError::at_line(
                1,
                "Missing frontmatter section (must start with ---)",
            ));
            return;
        };

        let frontmatter = block.as_str();
        for field in &config.required_fields {
            let key = format!("{}:", field);
            if !frontmatter.lines().any(|line| line.starts_with(&key)) {
                errors.push(ValidationError::file_level(format!(
                    "Missing required frontmatter field: {}",
                    field
                )));
            }
        }

        let mut offset = block.start();
        for line in frontmatter.split('\n') {
            if let Some(value) = line.strip_prefix("category:") {
                let category = value.trim();
                if !config.allowed_categories.iter().any(|c| c == category) {
                    errors.push(ValidationError::at_line(
                        doc.line_at(offset),
                        format!(
                            "Invalid category '{}', must be one of: {}",
                            category,
                            config.allowed_categories.join(", ")
                        ),
                    ));
                }
                break;
            }
            offset += line.len() + 1;
        }
    }
}

/// Whitelisted tag names and their required attributes
pub struct ComponentWhitelistRule;

impl DocRule for ComponentWhitelistRule {
    fn name(&self) -> &'static str {
        "ComponentWhitelist"
    }

    fn check(&self, doc: &Document<'_>, config: &ValidatorConfig, errors: &mut Vec<ValidationError>) {
        for tag in doc.tags.iter().filter(|t| t.kind != TagKind::Closing) {
            let Some(spec) = config.component(&tag.name) else {
                errors.push(ValidationError::at_line(
                    tag.line,
                    format!(
                        "Unknown component: {}. Allowed: {}",
                        tag.name,
                        config.component_names().join(", ")
                    ),
                ));
                continue;
            };

            for attribute in &spec.required_attributes {
                if !tag.has_attribute(attribute) {
                    errors.push(ValidationError::at_line(
                        tag.line,
                        format!("{} requires '{}' attribute", tag.name, attribute),
                    ));
                }
            }
        }
    }
}

/// Every opening tag is closed, innermost first
pub struct TagBalanceRule;

impl DocRule for TagBalanceRule {
    fn name(&self) -> &'static str {
        "TagBalance"
    }

    fn check(&self, doc: &Document<'_>, _config: &ValidatorConfig, errors: &mut Vec<ValidationError>) {
        let mut open: Vec<(&str, usize)> = Vec::new();

        for tag in &doc.tags {
            match tag.kind {
                TagKind::Opening => open.push((tag.name.as_str(), tag.line)),
                TagKind::Closing => {
                    if open.last().map(|(name, _)| *name) == Some(tag.name.as_str()) {
                        open.pop();
                    } else {
                        errors.push(ValidationError::at_line(
                            tag.line,
                            format!("Closing tag </{}> without matching opening tag", tag.name),
                        ));
                    }
                }
                TagKind::SelfClosing => {}
            }
        }

        for (name, line) in open {
            errors.push(ValidationError::at_line(
                line,
                format!("Unclosed tag: <{}>", name),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    const FRONTMATTER: &str = "---\ntitle: Test\ncategory: spec\ndescription: Test spec\n---\n";

    fn run(rule: &dyn DocRule, path: &str, content: &str) -> Vec<ValidationError> {
        let path = Path::new(path);
        let doc = Document::new(path, content);
        let mut errors = Vec::new();
        rule.check(&doc, &ValidatorConfig::default(), &mut errors);
        errors
    }

    fn messages(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(|e| e.message.clone()).collect()
    }

    #[parameterized(
        one_word = { "overview.mdx" },
        three_words = { "api-gateway-spec.mdx" },
        digits = { "v2-rollout.mdx" },
        nested = { "docs/runbooks/db-failover.mdx" },
    )]
    fn test_filename_valid(path: &str) {
        assert!(run(&FilenameRule, path, "").is_empty());
    }

    #[parameterized(
        wrong_extension = { "guide.md", "File must have .mdx extension, got: .md" },
        no_extension = { "guide", "File must have .mdx extension, got: " },
        upper_case = { "ApiSpec.mdx", "Filename must be kebab-case: ApiSpec" },
        underscore = { "api_spec.mdx", "Filename must be kebab-case: api_spec" },
        double_hyphen = { "api--spec.mdx", "Filename must be kebab-case: api--spec" },
        four_words = { "one-two-three-four.mdx", "Filename must have max 3 words, got 4: one-two-three-four" },
        iso_date = { "2024-01-15.mdx", "Filename must not contain timestamps: 2024-01-15" },
        compact_date = { "notes-20240115.mdx", "Filename must not contain timestamps: notes-20240115" },
    )]
    fn test_filename_invalid(path: &str, expected: &str) {
        let errors = run(&FilenameRule, path, "");
        assert!(
            messages(&errors).iter().any(|m| m == expected),
            "{:?} missing {}",
            errors,
            expected
        );
        assert!(errors.iter().all(|e| e.line.is_none()));
    }

    #[test]
    fn test_iso_date_also_too_many_words() {
        let errors = run(&FilenameRule, "release-2024-01-15.mdx", "");
        assert_eq!(
            messages(&errors),
            vec![
                "Filename must have max 3 words, got 4: release-2024-01-15",
                "Filename must not contain timestamps: release-2024-01-15"
            ]
        );
    }

    #[test]
    fn test_frontmatter_valid() {
        assert!(run(&FrontmatterRule, "a.mdx", FRONTMATTER).is_empty());
    }

    #[test]
    fn test_frontmatter_missing() {
        let errors = run(&FrontmatterRule, "a.mdx", "# Test Document\n\nSome content here.\n");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, Some(1));
        assert_eq!(
            errors[0].message,
            "Missing frontmatter section (must start with ---)"
        );
    }

    #[test]
    fn test_frontmatter_not_at_start() {
        let errors = run(&FrontmatterRule, "a.mdx", "\n---\ntitle: x\n---\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = run(&FrontmatterRule, "a.mdx", "---\ntitle: Test\n---\n\nContent here.\n");
        assert_eq!(
            messages(&errors),
            vec![
                "Missing required frontmatter field: category",
                "Missing required frontmatter field: description"
            ]
        );
    }

    #[test]
    fn test_indented_keys_do_not_count() {
        let errors = run(
            &FrontmatterRule,
            "a.mdx",
            "---\ntitle: T\n  category: spec\ndescription: D\n---\n",
        );
        assert_eq!(
            messages(&errors),
            vec!["Missing required frontmatter field: category"]
        );
    }

    #[test]
    fn test_invalid_category_reports_line() {
        let errors = run(
            &FrontmatterRule,
            "a.mdx",
            "---\ntitle: T\ndescription: D\ncategory: tutorial\n---\n",
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, Some(4));
        assert_eq!(
            errors[0].message,
            "Invalid category 'tutorial', must be one of: spec, runbook, adr"
        );
    }

    #[test]
    fn test_frontmatter_with_bom_and_crlf() {
        let content = "\u{feff}---\r\ntitle: T\r\ncategory: adr\r\ndescription: D\r\n---\r\n";
        assert!(run(&FrontmatterRule, "a.mdx", content).is_empty());
    }

    #[test]
    fn test_unknown_component() {
        let errors = run(&ComponentWhitelistRule, "a.mdx", "text\n<Tabs>\n</Tabs>\n");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, Some(2));
        assert_eq!(
            errors[0].message,
            "Unknown component: Tabs. Allowed: ParamField, Step, Steps, CodeBlock, Callout"
        );
    }

    #[test]
    fn test_param_field_attributes_independent() {
        let errors = run(&ComponentWhitelistRule, "a.mdx", "<ParamField>\n</ParamField>");
        assert_eq!(
            messages(&errors),
            vec![
                "ParamField requires 'path' attribute",
                "ParamField requires 'type' attribute"
            ]
        );

        let errors = run(
            &ComponentWhitelistRule,
            "a.mdx",
            "<ParamField type=\"string\" path=\"config.host\" />",
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_step_requires_title() {
        let errors = run(&ComponentWhitelistRule, "a.mdx", "<Steps>\n  <Step>\n  </Step>\n</Steps>");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, Some(2));
        assert_eq!(errors[0].message, "Step requires 'title' attribute");
    }

    #[test]
    fn test_balanced_tags() {
        let errors = run(
            &TagBalanceRule,
            "a.mdx",
            "<Steps>\n<Step title=\"a\">\n</Step>\n<Callout />\n</Steps>",
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unclosed_tags_reported_at_opening_line() {
        let errors = run(
            &TagBalanceRule,
            "a.mdx",
            "<Steps>\n  <Step title=\"First\">\n    Content\n  </Step>\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, Some(1));
        assert_eq!(errors[0].message, "Unclosed tag: <Steps>");
    }

    #[test]
    fn test_mismatched_closing_does_not_pop() {
        let errors = run(&TagBalanceRule, "a.mdx", "<Steps>\n<Step title=\"x\">\n</Steps>\n");

        assert_eq!(
            messages(&errors),
            vec![
                "Closing tag </Steps> without matching opening tag",
                "Unclosed tag: <Steps>",
                "Unclosed tag: <Step>"
            ]
        );
        assert_eq!(errors[0].line, Some(3));
        assert_eq!(errors[1].line, Some(1));
        assert_eq!(errors[2].line, Some(2));
    }

    #[test]
    fn test_unknown_tags_take_part_in_balance() {
        let errors = run(&TagBalanceRule, "a.mdx", "<div>\n");
        assert_eq!(messages(&errors), vec!["Unclosed tag: <div>"]);
    }

    #[test]
    fn test_stray_closing_tag() {
        let errors = run(&TagBalanceRule, "a.mdx", "</Callout>");
        assert_eq!(
            messages(&errors),
            vec!["Closing tag </Callout> without matching opening tag"]
        );
    }
}
