//! Component tag tokenizer for MDX bodies

use regex::Regex;
use std::sync::OnceLock;

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(/?)(\w+)([^>]*)>").expect("valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Opening,
    Closing,
    SelfClosing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// 1-based line of the `<`
    pub line: usize,
    pub kind: TagKind,
    /// Attribute names in source order
    pub attributes: Vec<String>,
}

impl Tag {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// Every `<Name ...>`, `</Name>` and `<Name ... />` in document order
pub fn scan_tags(content: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut line = 1;
    let mut counted_to = 0;

    for caps in tag_regex().captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        line += content[counted_to..whole.start()].matches('\n').count();
        counted_to = whole.start();

        let raw_attributes = caps.get(3).map_or("", |m| m.as_str());
        let kind = if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            TagKind::Closing
        } else if raw_attributes.trim_end().ends_with('/') {
            TagKind::SelfClosing
        } else {
            TagKind::Opening
        };

        tags.push(Tag {
            name: name.as_str().to_string(),
            line,
            kind,
            attributes: attribute_names(raw_attributes),
        });
    }

    tags
}

/// Names of `name="v"`, `name='v'`, `name={expr}`, `name=bare` and boolean attributes
fn attribute_names(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut names = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || c == '/' {
            i += 1;
            continue;
        }
        if c == '{' {
            i = skip_braces(&chars, i);
            continue;
        }

        let start = i;
        while i < chars.len() && is_attribute_char(chars[i]) {
            i += 1;
        }
        if i == start {
            i += 1;
            continue;
        }
        names.push(chars[start..i].iter().collect());

        let mut j = i;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
        if chars.get(j) != Some(&'=') {
            continue;
        }
        j += 1;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }

        i = match chars.get(j) {
            Some(&quote @ ('"' | '\'')) => chars[j + 1..]
                .iter()
                .position(|&c| c == quote)
                .map_or(chars.len(), |p| j + 1 + p + 1),
            Some('{') => skip_braces(&chars, j),
            Some(_) => {
                let mut k = j;
                while k < chars.len() && !chars[k].is_whitespace() {
                    k += 1;
                }
                k
            }
            None => j,
        };
    }

    names
}

fn is_attribute_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
}

/// Index just past the brace group starting at `start`
fn skip_braces(chars: &[char], start: usize) -> usize {
    let mut depth = 0usize;
    for (offset, &c) in chars[start..].iter().enumerate() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return start + offset + 1;
                }
            }
            _ => {}
        }
    }
    chars.len()
}
