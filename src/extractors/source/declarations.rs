//! Declaration tree for Python modules
//!
//! Only `def`, `class` and annotated assignments are understood. Every other
//! statement is kept as an opaque block so nested declarations are still
//! reachable, but expressions are never parsed.

use super::scanner::{scan, syntax_error, LogicalLine};
use crate::error::ExtractionError;

const KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

const BLOCK_KEYWORDS: [&str; 12] = [
    "def", "class", "if", "elif", "else", "while", "for", "try", "except", "finally", "with",
    "async",
];

const AUGMENTED_ASSIGNMENTS: [&str; 13] = [
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", "**=", "//=", ">>=", "<<=",
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Declaration {
    Function(FunctionDef),
    Class(ClassDef),
    Field(FieldDecl),
    /// Any other compound statement (`if`, `for`, `with`, ...)
    Block(Vec<Declaration>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FunctionDef {
    pub name: String,
    pub line: usize,
    pub params: Vec<ParamDecl>,
    pub returns: Option<String>,
    pub body: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClassDef {
    pub name: String,
    pub line: usize,
    pub body: Vec<Declaration>,
}

/// `name: annotation [= value]`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldDecl {
    pub name: String,
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParamDecl {
    pub name: String,
    pub annotation: Option<String>,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl ParamKind {
    pub fn is_positional(self) -> bool {
        matches!(self, ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword)
    }
}

pub(crate) fn parse_module(source: &str) -> Result<Vec<Declaration>, ExtractionError> {
    let mut builder = TreeBuilder {
        lines: scan(source)?,
        pos: 0,
        levels: vec![0],
    };
    builder.parse_block(0)
}

struct TreeBuilder {
    lines: Vec<LogicalLine>,
    pos: usize,
    /// Indentation of every open block, outermost first
    levels: Vec<usize>,
}

impl TreeBuilder {
    fn parse_block(&mut self, indent: usize) -> Result<Vec<Declaration>, ExtractionError> {
        let mut body = Vec::new();

        while let Some(line) = self.lines.get(self.pos) {
            if line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(syntax_error(line.line, "unexpected indent"));
            }

            let line = line.clone();
            self.pos += 1;
            self.parse_line(&line, &mut body)?;
        }

        Ok(body)
    }

    fn parse_line(
        &mut self,
        line: &LogicalLine,
        body: &mut Vec<Declaration>,
    ) -> Result<(), ExtractionError> {
        let Some((keyword, rest)) = split_block_keyword(&line.text) else {
            body.extend(parse_simple_statements(&line.text, line.line)?);
            return Ok(());
        };

        let colon = header_colon(rest)
            .ok_or_else(|| syntax_error(line.line, format!("expected ':' after '{}'", keyword)))?;
        let head = rest[..colon].trim();
        let inline = rest[colon + 1..].trim();

        let children = if inline.is_empty() {
            self.parse_suite(line)?
        } else {
            parse_simple_statements(inline, line.line)?
        };

        let declaration = match keyword {
            "def" => Declaration::Function(parse_function(head, line.line, children)?),
            "class" => Declaration::Class(parse_class(head, line.line, children)?),
            "async" => match strip_keyword(head, "def") {
                Some(signature) => {
                    Declaration::Function(parse_function(signature, line.line, children)?)
                }
                None => Declaration::Block(children),
            },
            _ => Declaration::Block(children),
        };
        body.push(declaration);

        Ok(())
    }

    /// Parses the indented block following a header that ended with `:`
    fn parse_suite(&mut self, header: &LogicalLine) -> Result<Vec<Declaration>, ExtractionError> {
        let child_indent = match self.lines.get(self.pos) {
            Some(next) if next.indent > header.indent => next.indent,
            Some(next) => {
                return Err(syntax_error(
                    next.line,
                    format!("expected an indented block after line {}", header.line),
                ))
            }
            None => {
                return Err(syntax_error(
                    header.line,
                    "expected an indented block before end of file",
                ))
            }
        };

        self.levels.push(child_indent);
        let body = self.parse_block(child_indent)?;
        self.levels.pop();

        if let Some(next) = self.lines.get(self.pos) {
            if !self.levels.contains(&next.indent) {
                return Err(syntax_error(
                    next.line,
                    "unindent does not match any outer indentation level",
                ));
            }
        }

        Ok(body)
    }
}

/// Recognizes a compound statement and returns its keyword and the text after it
fn split_block_keyword(text: &str) -> Option<(&str, &str)> {
    let word = leading_word(text);
    let rest = &text[word.len()..];

    if BLOCK_KEYWORDS.contains(&word) {
        return Some((word, rest));
    }

    if (word == "match" || word == "case") && is_soft_keyword_header(word, rest) {
        return Some((word, rest));
    }

    None
}

/// `match` and `case` open a block only when followed by a subject and a
/// top-level `:`; `match = 1`, `case: int` and `match(x)` are plain statements
fn is_soft_keyword_header(word: &str, rest: &str) -> bool {
    if assignment_position(rest).is_some()
        || AUGMENTED_ASSIGNMENTS
            .iter()
            .any(|op| rest.trim_start().starts_with(op))
    {
        return false;
    }

    let Some(colon) = header_colon(rest) else {
        return false;
    };
    if rest[..colon].trim().is_empty() {
        return false;
    }

    // a match subject is always followed by an indented block
    word == "case" || rest[colon + 1..].trim().is_empty()
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    text.strip_prefix(keyword)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
}

fn parse_simple_statements(
    text: &str,
    line: usize,
) -> Result<Vec<Declaration>, ExtractionError> {
    let mut declarations = Vec::new();
    for statement in split_top_level(text, ';') {
        if let Some(field) = parse_field(statement.trim(), line)? {
            declarations.push(Declaration::Field(field));
        }
    }
    Ok(declarations)
}

fn parse_field(statement: &str, line: usize) -> Result<Option<FieldDecl>, ExtractionError> {
    let Some(colon) = header_colon(statement) else {
        return Ok(None);
    };

    let target = statement[..colon].trim();
    if !is_name(target) {
        return Ok(None);
    }

    let rest = &statement[colon + 1..];
    let annotation = match assignment_position(rest) {
        Some(eq) => &rest[..eq],
        None => rest,
    };
    let annotation = collapse_whitespace(annotation);
    if annotation.is_empty() {
        return Err(syntax_error(
            line,
            format!("missing annotation for '{}'", target),
        ));
    }

    Ok(Some(FieldDecl {
        name: target.to_string(),
        annotation,
    }))
}

fn parse_function(
    signature: &str,
    line: usize,
    body: Vec<Declaration>,
) -> Result<FunctionDef, ExtractionError> {
    let signature = signature.trim();
    let name = leading_word(signature);
    if !is_name(name) {
        return Err(syntax_error(line, "invalid function name"));
    }

    let rest = skip_type_params(signature[name.len()..].trim_start(), line)?;
    if !rest.starts_with('(') {
        return Err(syntax_error(
            line,
            format!("expected '(' after function name '{}'", name),
        ));
    }

    let close = matching_bracket(rest)
        .ok_or_else(|| syntax_error(line, "unbalanced parameter list"))?;
    let params = parse_params(&rest[1..close], line)?;

    let tail = rest[close + 1..].trim();
    let returns = if tail.is_empty() {
        None
    } else if let Some(annotation) = tail.strip_prefix("->") {
        let annotation = collapse_whitespace(annotation);
        if annotation.is_empty() {
            return Err(syntax_error(line, "missing return annotation after '->'"));
        }
        Some(annotation)
    } else {
        return Err(syntax_error(
            line,
            format!("invalid syntax after parameters of '{}'", name),
        ));
    };

    Ok(FunctionDef {
        name: name.to_string(),
        line,
        params,
        returns,
        body,
    })
}

fn parse_class(
    head: &str,
    line: usize,
    body: Vec<Declaration>,
) -> Result<ClassDef, ExtractionError> {
    let name = leading_word(head);
    if !is_name(name) {
        return Err(syntax_error(line, "invalid class name"));
    }

    let rest = skip_type_params(head[name.len()..].trim_start(), line)?;
    let well_formed = rest.is_empty()
        || (rest.starts_with('(') && matching_bracket(rest) == Some(rest.len() - 1));
    if !well_formed {
        return Err(syntax_error(
            line,
            format!("invalid syntax in class '{}'", name),
        ));
    }

    Ok(ClassDef {
        name: name.to_string(),
        line,
        body,
    })
}

/// Skips a `[T, U]` type parameter list
fn skip_type_params(text: &str, line: usize) -> Result<&str, ExtractionError> {
    if !text.starts_with('[') {
        return Ok(text);
    }
    let close =
        matching_bracket(text).ok_or_else(|| syntax_error(line, "unbalanced type parameters"))?;
    Ok(text[close + 1..].trim_start())
}

fn parse_params(text: &str, line: usize) -> Result<Vec<ParamDecl>, ExtractionError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let pieces = split_top_level(text, ',');
    let last = pieces.len() - 1;
    let mut params: Vec<ParamDecl> = Vec::new();
    let mut kind = ParamKind::PositionalOrKeyword;

    for (index, piece) in pieces.into_iter().enumerate() {
        let piece = piece.trim();

        if piece.is_empty() {
            if index == last && index > 0 {
                continue;
            }
            return Err(syntax_error(line, "invalid syntax in parameter list"));
        }

        if piece == "/" {
            for param in params.iter_mut() {
                param.kind = ParamKind::PositionalOnly;
            }
            continue;
        }

        if piece == "*" {
            kind = ParamKind::KeywordOnly;
            continue;
        }

        let param = if let Some(rest) = piece.strip_prefix("**") {
            parse_param(rest, ParamKind::VarKeyword, line)?
        } else if let Some(rest) = piece.strip_prefix('*') {
            kind = ParamKind::KeywordOnly;
            parse_param(rest, ParamKind::VarPositional, line)?
        } else {
            parse_param(piece, kind, line)?
        };
        params.push(param);
    }

    Ok(params)
}

fn parse_param(text: &str, kind: ParamKind, line: usize) -> Result<ParamDecl, ExtractionError> {
    let head = match assignment_position(text) {
        Some(eq) => &text[..eq],
        None => text,
    };

    let (name, annotation) = match first_top_level(head, ':') {
        Some(colon) => (
            head[..colon].trim(),
            Some(collapse_whitespace(&head[colon + 1..])),
        ),
        None => (head.trim(), None),
    };

    if !is_name(name) {
        return Err(syntax_error(line, format!("invalid parameter '{}'", text.trim())));
    }
    if annotation.as_deref() == Some("") {
        return Err(syntax_error(line, format!("missing annotation for '{}'", name)));
    }

    Ok(ParamDecl {
        name: name.to_string(),
        annotation,
        kind,
    })
}

fn leading_word(text: &str) -> &str {
    let end = text
        .find(|c: char| !(c == '_' || c.is_alphanumeric()))
        .unwrap_or(text.len());
    &text[..end]
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

fn is_name(text: &str) -> bool {
    is_identifier(text) && !KEYWORDS.contains(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset, character and bracket depth of every character outside string literals
fn code_chars(text: &str) -> Vec<(usize, char, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            '"' | '\'' => {
                i = skip_string(&chars, i);
                continue;
            }
            '(' | '[' | '{' => {
                out.push((offset, c, depth));
                depth += 1;
            }
            ')' | ']' | '}' => {
                out.push((offset, c, depth));
                depth = depth.saturating_sub(1);
            }
            _ => out.push((offset, c, depth)),
        }
        i += 1;
    }

    out
}

/// Index just past the string literal starting at `start`
fn skip_string(chars: &[(usize, char)], start: usize) -> usize {
    let quote = chars[start].1;
    let is_quote = |i: usize| chars.get(i).map(|(_, c)| *c) == Some(quote);
    let triple = is_quote(start + 1) && is_quote(start + 2);
    let mut i = start + if triple { 3 } else { 1 };

    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 2,
            c if c == quote => {
                if !triple {
                    return i + 1;
                }
                if is_quote(i + 1) && is_quote(i + 2) {
                    return i + 3;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    chars.len()
}

fn first_top_level(text: &str, target: char) -> Option<usize> {
    code_chars(text)
        .into_iter()
        .find(|&(_, c, depth)| depth == 0 && c == target)
        .map(|(offset, _, _)| offset)
}

/// First top-level `:` that is not part of a walrus `:=`
fn header_colon(text: &str) -> Option<usize> {
    let chars = code_chars(text);
    chars
        .iter()
        .enumerate()
        .find(|&(i, &(_, c, depth))| {
            depth == 0 && c == ':' && chars.get(i + 1).map(|&(_, next, _)| next) != Some('=')
        })
        .map(|(_, &(offset, _, _))| offset)
}

/// First top-level `=` that is not part of `==`, `!=`, `<=`, `>=` or `:=`
fn assignment_position(text: &str) -> Option<usize> {
    let chars = code_chars(text);
    chars
        .iter()
        .enumerate()
        .find(|&(i, &(_, c, depth))| {
            let prev = i.checked_sub(1).and_then(|p| chars.get(p)).map(|&(_, c, _)| c);
            let next = chars.get(i + 1).map(|&(_, c, _)| c);
            depth == 0
                && c == '='
                && next != Some('=')
                && !matches!(prev, Some('=' | '!' | '<' | '>' | ':'))
        })
        .map(|(_, &(offset, _, _))| offset)
}

/// Byte offset of the bracket closing the one `text` starts with
fn matching_bracket(text: &str) -> Option<usize> {
    code_chars(text)
        .into_iter()
        .skip(1)
        .find(|&(_, c, depth)| depth == 1 && matches!(c, ')' | ']' | '}'))
        .map(|(offset, _, _)| offset)
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (offset, c, depth) in code_chars(text) {
        if depth == 0 && c == separator {
            pieces.push(&text[start..offset]);
            start = offset + c.len_utf8();
        }
    }
    pieces.push(&text[start..]);

    pieces
}
