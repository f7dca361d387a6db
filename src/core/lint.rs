// src/core/lint.rs

//! Advisory structural checks for shell scripts.
//!
//! This is not a parser. It tracks quotes, brackets and block keywords well
//! enough to point at the usual typos before a script is run. The
//! interpreter's own parse-only mode remains the authority on validity.
//! Here-documents are not understood, so their bodies are scanned as code.

use crate::models::SyntaxIssue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Double,
}

/// A position in the script: 1-based line, 0-based character column.
type Pos = (usize, usize);

struct BlockPair {
    open: &'static str,
    close: &'static str,
    pending: Vec<Pos>,
}

impl BlockPair {
    fn new(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            pending: Vec::new(),
        }
    }
}

struct Scanner {
    issues: Vec<SyntaxIssue>,
    quote: Option<(Quote, Pos)>,
    brackets: Vec<(char, Pos)>,
    blocks: Vec<BlockPair>,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `#` only starts a comment at the beginning of a word.
fn starts_comment(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(p) => p.is_whitespace() || matches!(p, ';' | '&' | '|' | '(' | ')'),
    }
}

fn bracket_name(c: char) -> &'static str {
    match c {
        '{' | '}' => "brace",
        '(' | ')' => "parenthesis",
        _ => "bracket",
    }
}

fn opener_for(c: char) -> char {
    match c {
        '}' => '{',
        ')' => '(',
        _ => '[',
    }
}

impl Scanner {
    fn new() -> Self {
        Self {
            issues: Vec::new(),
            quote: None,
            brackets: Vec::new(),
            blocks: vec![
                BlockPair::new("if", "fi"),
                BlockPair::new("case", "esac"),
                BlockPair::new("do", "done"),
            ],
        }
    }

    fn report(&mut self, (line, column): Pos, message: String) {
        self.issues.push(SyntaxIssue {
            line,
            column,
            message,
        });
    }

    fn in_case(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| b.open == "case" && !b.pending.is_empty())
    }

    fn word(&mut self, word: &str, pos: Pos, before: Option<char>, after: Option<char>) {
        // `$done`, `--if`, `path/fi` and `done=1` are not keywords.
        if matches!(before, Some('$' | '-' | '.' | '/')) || matches!(after, Some('=' | '/' | '.')) {
            return;
        }
        let mut surplus = None;
        for block in self.blocks.iter_mut() {
            if word == block.open {
                block.pending.push(pos);
            } else if word == block.close && block.pending.pop().is_none() {
                surplus = Some(format!("'{}' without matching '{}'", block.close, block.open));
            }
        }
        if let Some(message) = surplus {
            self.report(pos, message);
        }
    }

    fn close_bracket(&mut self, c: char, pos: Pos) {
        let expected = opener_for(c);
        match self.brackets.last() {
            Some((open, _)) if *open == expected => {
                self.brackets.pop();
            }
            // Case patterns such as `start)` have no opening parenthesis.
            _ if c == ')' && self.in_case() => {}
            _ => self.report(pos, format!("Unmatched closing {}", bracket_name(c))),
        }
    }

    fn scan_line(&mut self, line_no: usize, line: &str) {
        let mut escaped = false;
        let mut prev: Option<char> = None;
        let mut word = String::new();
        let mut word_start: Pos = (line_no, 0);
        let mut word_before: Option<char> = None;

        for (col, c) in line.chars().enumerate() {
            if escaped {
                escaped = false;
                prev = Some(c);
                continue;
            }
            match self.quote {
                Some((Quote::Single, _)) => {
                    if c == '\'' {
                        self.quote = None;
                    }
                }
                Some((Quote::Double, _)) => match c {
                    '\\' => escaped = true,
                    '"' => self.quote = None,
                    _ => {}
                },
                None => {
                    if is_word_char(c) {
                        if word.is_empty() {
                            word_start = (line_no, col);
                            word_before = prev;
                        }
                        word.push(c);
                        prev = Some(c);
                        continue;
                    }
                    if !word.is_empty() {
                        self.word(&word, word_start, word_before, Some(c));
                        word.clear();
                    }
                    match c {
                        '\\' => escaped = true,
                        '\'' => self.quote = Some((Quote::Single, (line_no, col))),
                        '"' => self.quote = Some((Quote::Double, (line_no, col))),
                        '#' if starts_comment(prev) => break,
                        '{' | '(' | '[' => self.brackets.push((c, (line_no, col))),
                        '}' | ')' | ']' => self.close_bracket(c, (line_no, col)),
                        _ => {}
                    }
                }
            }
            prev = Some(c);
        }

        if !word.is_empty() {
            self.word(&word, word_start, word_before, None);
        }
    }

    fn finish(mut self, content: &str) -> Vec<SyntaxIssue> {
        if let Some((kind, pos)) = self.quote.take() {
            let name = match kind {
                Quote::Single => "single",
                Quote::Double => "double",
            };
            self.report(pos, format!("Unclosed {} quote", name));
        }

        for (c, pos) in std::mem::take(&mut self.brackets) {
            self.report(pos, format!("Unmatched opening {}", bracket_name(c)));
        }

        let mut unclosed = Vec::new();
        for block in &self.blocks {
            for pos in &block.pending {
                unclosed.push((*pos, format!("'{}' without matching '{}'", block.open, block.close)));
            }
        }
        for (pos, message) in unclosed {
            self.report(pos, message);
        }

        if let Some(pos) = trailing_continuation(content) {
            self.report(pos, "Line continuation at end of script".to_string());
        }

        self.issues.sort_by_key(|issue| (issue.line, issue.column));
        self.issues
    }
}

/// Position of a `\` ending the last non-blank line, if any.
fn trailing_continuation(content: &str) -> Option<Pos> {
    let (idx, line) = content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .last()?;
    let trimmed = line.trim_end();
    let backslashes = trimmed.chars().rev().take_while(|c| *c == '\\').count();
    if backslashes % 2 == 1 {
        Some((idx + 1, trimmed.chars().count() - 1))
    } else {
        None
    }
}

/// Lists structural problems in `content`, ordered by position. An empty list
/// means nothing suspicious was found, not that the script is valid.
pub fn check_structure(content: &str) -> Vec<SyntaxIssue> {
    let mut scanner = Scanner::new();
    for (idx, line) in content.split('\n').enumerate() {
        scanner.scan_line(idx + 1, line);
    }
    scanner.finish(content)
}

/// `Line L, Column C: message`
pub fn format_issue(issue: &SyntaxIssue) -> String {
    format!(
        "Line {}, Column {}: {}",
        issue.line, issue.column, issue.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(content: &str) -> Vec<String> {
        check_structure(content)
            .into_iter()
            .map(|i| format_issue(&i))
            .collect()
    }

    #[test]
    fn test_clean_script_has_no_issues() {
        let script = r#"#!/bin/bash
# greet everyone
for name in "$@"; do
  if [ -n "${name}" ]; then
    echo "Hello, $name (#1)"
  fi
done
case "$1" in
  start) echo go ;;
  stop) echo halt ;;
esac
echo $# args
"#;
        assert!(check_structure(script).is_empty(), "{:?}", messages(script));
    }

    #[test]
    fn test_multi_line_strings_are_legal() {
        let script = "echo \"first\nsecond\"\necho 'a\nb'";
        assert!(check_structure(script).is_empty());
    }

    #[test]
    fn test_unclosed_quote_reported_at_opening() {
        assert_eq!(
            messages("echo ok\necho \"oops\necho more"),
            vec!["Line 2, Column 5: Unclosed double quote"]
        );
        assert_eq!(messages("echo 'x"), vec!["Line 1, Column 5: Unclosed single quote"]);
    }

    #[test]
    fn test_escaped_quotes_do_not_open_strings() {
        assert!(check_structure(r#"echo \"hi\" it\'s "a \" b""#).is_empty());
    }

    #[test]
    fn test_bracket_mismatches() {
        assert_eq!(
            messages("f() {\n  echo (\n}"),
            vec![
                "Line 1, Column 4: Unmatched opening brace",
                "Line 2, Column 7: Unmatched opening parenthesis",
                "Line 3, Column 0: Unmatched closing brace",
            ]
        );
        assert_eq!(messages("echo ]"), vec!["Line 1, Column 5: Unmatched closing bracket"]);
    }

    #[test]
    fn test_block_keyword_balance() {
        assert_eq!(
            messages("if true; then\n  echo x\n"),
            vec!["Line 1, Column 0: 'if' without matching 'fi'"]
        );
        assert_eq!(
            messages("echo x\ndone"),
            vec!["Line 2, Column 0: 'done' without matching 'do'"]
        );
        assert_eq!(
            messages("case $x in\n  a) echo a ;;\n"),
            vec!["Line 1, Column 0: 'case' without matching 'esac'"]
        );
    }

    #[test]
    fn test_keywords_inside_quotes_and_comments_are_ignored() {
        assert!(check_structure("echo \"if\" 'do' # fi\nx=$done").is_empty());
    }

    #[test]
    fn test_trailing_continuation_flagged() {
        assert_eq!(
            messages("ls \\\n  -la \\\n\n"),
            vec!["Line 2, Column 6: Line continuation at end of script"]
        );
        assert!(check_structure("echo a \\\\").is_empty());
    }
}
