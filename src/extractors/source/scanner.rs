//! Logical-line scanner for Python source
//!
//! Joins physical lines that continue inside brackets, triple-quoted strings or
//! after a trailing backslash, strips comments, and measures indentation.

use crate::error::ExtractionError;

const TAB_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    /// 1-based line of the first physical line
    pub line: usize,
    /// Indentation column with tabs expanded
    pub indent: usize,
    pub text: String,
}

pub(crate) fn scan(source: &str) -> Result<Vec<LogicalLine>, ExtractionError> {
    let normalized = source
        .strip_prefix('\u{feff}')
        .unwrap_or(source)
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    Scanner::new(&normalized).run()
}

pub(crate) fn syntax_error(line: usize, message: impl Into<String>) -> ExtractionError {
    ExtractionError::Syntax {
        line,
        message: message.into(),
    }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    lines: Vec<LogicalLine>,
    current: String,
    start_line: usize,
    indent: usize,
    brackets: Vec<(char, usize)>,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            lines: Vec::new(),
            current: String::new(),
            start_line: 1,
            indent: 0,
            brackets: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn run(mut self) -> Result<Vec<LogicalLine>, ExtractionError> {
        let mut at_line_start = true;

        while self.pos < self.chars.len() {
            if at_line_start {
                if !self.begin_line() {
                    continue;
                }
                at_line_start = false;
            }

            let c = self.chars[self.pos];
            match c {
                '#' => self.skip_comment(),
                '\\' => self.line_continuation()?,
                '\n' => {
                    self.pos += 1;
                    self.line += 1;
                    if self.brackets.is_empty() {
                        self.finish_line();
                        at_line_start = true;
                    } else {
                        self.current.push(' ');
                    }
                }
                '"' | '\'' => self.read_string(c)?,
                '(' | '[' | '{' => {
                    self.brackets.push((c, self.line));
                    self.current.push(c);
                    self.pos += 1;
                }
                ')' | ']' | '}' => {
                    self.close_bracket(c)?;
                    self.current.push(c);
                    self.pos += 1;
                }
                _ => {
                    self.current.push(c);
                    self.pos += 1;
                }
            }
        }

        if let Some((open, line)) = self.brackets.first() {
            return Err(syntax_error(*line, format!("'{}' was never closed", open)));
        }
        self.finish_line();

        Ok(self.lines)
    }

    /// Measures indentation; returns false when the physical line is blank or comment-only
    fn begin_line(&mut self) -> bool {
        let mut column = 0;
        while let Some(c) = self.peek(0) {
            match c {
                ' ' => column += 1,
                '\t' => column = (column / TAB_SIZE + 1) * TAB_SIZE,
                '\x0c' => column = 0,
                _ => break,
            }
            self.pos += 1;
        }

        match self.peek(0) {
            None => false,
            Some('\n') => {
                self.pos += 1;
                self.line += 1;
                false
            }
            Some('#') => {
                self.skip_comment();
                false
            }
            Some(_) => {
                self.indent = column;
                self.start_line = self.line;
                true
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn line_continuation(&mut self) -> Result<(), ExtractionError> {
        match self.peek(1) {
            Some('\n') => {
                self.pos += 2;
                self.line += 1;
                self.current.push(' ');
                Ok(())
            }
            None => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(syntax_error(
                self.line,
                "unexpected character after line continuation character",
            )),
        }
    }

    fn close_bracket(&mut self, close: char) -> Result<(), ExtractionError> {
        let expected = match close {
            ')' => '(',
            ']' => '[',
            _ => '{',
        };

        match self.brackets.pop() {
            Some((open, _)) if open == expected => Ok(()),
            Some((open, _)) => Err(syntax_error(
                self.line,
                format!(
                    "closing parenthesis '{}' does not match opening parenthesis '{}'",
                    close, open
                ),
            )),
            None => Err(syntax_error(self.line, format!("unmatched '{}'", close))),
        }
    }

    /// Copies a string literal verbatim; any prefix letters were already copied
    fn read_string(&mut self, quote: char) -> Result<(), ExtractionError> {
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        let width = if triple { 3 } else { 1 };
        let start_line = self.line;

        for _ in 0..width {
            self.current.push(quote);
        }
        self.pos += width;

        loop {
            let Some(c) = self.peek(0) else {
                let message = if triple {
                    "unterminated triple-quoted string literal"
                } else {
                    "unterminated string literal"
                };
                return Err(syntax_error(start_line, message));
            };

            match c {
                '\\' => {
                    self.current.push(c);
                    self.pos += 1;
                    if let Some(escaped) = self.peek(0) {
                        if escaped == '\n' {
                            self.line += 1;
                        }
                        self.current.push(escaped);
                        self.pos += 1;
                    }
                }
                '\n' if !triple => {
                    return Err(syntax_error(start_line, "unterminated string literal"));
                }
                '\n' => {
                    self.current.push(c);
                    self.line += 1;
                    self.pos += 1;
                }
                c if c == quote => {
                    if !triple {
                        self.current.push(c);
                        self.pos += 1;
                        return Ok(());
                    }
                    if self.peek(1) == Some(quote) && self.peek(2) == Some(quote) {
                        for _ in 0..3 {
                            self.current.push(quote);
                        }
                        self.pos += 3;
                        return Ok(());
                    }
                    self.current.push(c);
                    self.pos += 1;
                }
                _ => {
                    self.current.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn finish_line(&mut self) {
        let text = self.current.trim();
        if !text.is_empty() {
            self.lines.push(LogicalLine {
                line: self.start_line,
                indent: self.indent,
                text: text.to_string(),
            });
        }
        self.current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        scan(source).unwrap().into_iter().map(|l| l.text).collect()
    }

    fn error_line(source: &str) -> usize {
        match scan(source).unwrap_err() {
            ExtractionError::Syntax { line, .. } => line,
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let lines = scan("# header\n\nx = 1  # trailing\n\n    # indented comment\ny = 2\n").unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "x = 1");
        assert_eq!(lines[0].line, 3);
        assert_eq!(lines[1].text, "y = 2");
        assert_eq!(lines[1].line, 6);
    }

    #[test]
    fn test_bracket_continuation_joins_lines() {
        let lines = scan("def f(\n    a: int,  # first\n    b: str,\n):\n    pass\n").unwrap();

        assert_eq!(lines[0].line, 1);
        assert!(lines[0].text.starts_with("def f("));
        assert!(lines[0].text.contains("a: int,"));
        assert!(!lines[0].text.contains("first"));
        assert_eq!(lines[1].line, 5);
        assert_eq!(lines[1].indent, 4);
    }

    #[test]
    fn test_backslash_continuation() {
        assert_eq!(texts("x = 1 + \\\n    2\n"), vec!["x = 1 +      2"]);
    }

    #[test]
    fn test_strings_keep_hash_and_brackets() {
        assert_eq!(texts("s = \"# not a comment (\"\n"), vec!["s = \"# not a comment (\""]);
        assert_eq!(texts("s = r'\\'('\n"), vec!["s = r'\\'('"]);
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let lines = scan("def f():\n    \"\"\"Doc\n    more ) text\n    \"\"\"\n    return 1\n").unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].line, 2);
        assert_eq!(lines[2].line, 5);
        assert_eq!(lines[2].text, "return 1");
    }

    #[test]
    fn test_tab_indentation_expands_to_eight() {
        let lines = scan("if x:\n\ty = 1\n").unwrap();
        assert_eq!(lines[1].indent, 8);
    }

    #[test]
    fn test_byte_order_mark_and_crlf() {
        let lines = scan("\u{feff}x = 1\r\ny = 2\r\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(error_line("x = 1\ns = 'open\n"), 2);
        assert_eq!(error_line("s = \"\"\"never\nclosed\n"), 1);
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert_eq!(error_line("x = (1,\n     2\n"), 1);
        assert_eq!(error_line("x = 1)\n"), 1);
        assert_eq!(error_line("x = [1,\n  2)\n"), 2);
    }

    #[test]
    fn test_stray_backslash() {
        assert_eq!(error_line("x = 1 \\ y\n"), 1);
    }
}
