// src/core/highlight.rs

//! Terminal syntax coloring for shell scripts.
//!
//! Tokens come from an ordered table of regexes. Earlier entries win: once a
//! span is colored, later patterns that overlap it are dropped.

use colored::{ColoredString, Colorize};
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Shebang,
    Comment,
    DoubleQuoted,
    SingleQuoted,
    Variable,
    Keyword,
    Builtin,
    Operator,
    Number,
    Option,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range within the line.
    pub range: Range<usize>,
}

struct Rule {
    kind: TokenKind,
    regex: Regex,
    /// Capture group holding the token; 0 means the whole match.
    group: usize,
}

fn rule(kind: TokenKind, pattern: &str, group: usize) -> Rule {
    Rule {
        kind,
        regex: Regex::new(pattern).expect("highlight pattern is valid"),
        group,
    }
}

lazy_static! {
    static ref RULES: Vec<Rule> = vec![
        rule(TokenKind::Shebang, r"^#!.*$", 0),
        rule(TokenKind::Comment, r"(?:^|\s)(#.*)$", 1),
        rule(TokenKind::DoubleQuoted, r#""(?:[^"\\]|\\.)*""#, 0),
        rule(TokenKind::SingleQuoted, r"'[^']*'", 0),
        rule(TokenKind::Variable, r"\$\{[^}]+\}|\$[A-Za-z_]\w*|\$[0-9#?@*$!-]", 0),
        rule(
            TokenKind::Keyword,
            r"\b(?:if|then|else|elif|fi|for|while|until|do|done|case|esac|in|function|return|exit|break|continue|local|export|readonly|declare|set|unset)\b",
            0
        ),
        rule(
            TokenKind::Builtin,
            r"\b(?:echo|printf|read|cd|pwd|ls|cp|mv|rm|mkdir|rmdir|chmod|chown|grep|sed|awk|sort|uniq|head|tail|cat|less|more|find|xargs|test|trap|source)\b",
            0
        ),
        rule(TokenKind::Operator, r"\|\||&&|==|!=|<=|>=|=~|[&|;()<>]", 0),
        rule(TokenKind::Number, r"\b\d+\b", 0),
        rule(TokenKind::Option, r"(?:^|\s)(--?[A-Za-z0-9][A-Za-z0-9-]*)", 1),
    ];
}

/// Splits a line into colored spans, sorted by start and never overlapping.
pub fn tokenize_line(line: &str) -> Vec<Token> {
    let mut taken = vec![false; line.len()];
    let mut tokens = Vec::new();

    for rule in RULES.iter() {
        for caps in rule.regex.captures_iter(line) {
            let Some(m) = caps.get(rule.group) else {
                continue;
            };
            let range = m.range();
            if range.is_empty() {
                continue;
            }
            let overlaps = taken
                .get(range.clone())
                .is_none_or(|slots| slots.iter().any(|t| *t));
            if overlaps {
                continue;
            }
            for slot in taken.get_mut(range.clone()).into_iter().flatten() {
                *slot = true;
            }
            tokens.push(Token {
                kind: rule.kind,
                range,
            });
        }
    }

    tokens.sort_by_key(|t| t.range.start);
    tokens
}

fn paint(text: &str, kind: TokenKind) -> ColoredString {
    match kind {
        TokenKind::Shebang => text.bright_blue(),
        TokenKind::Comment => text.green().dimmed(),
        TokenKind::DoubleQuoted | TokenKind::SingleQuoted => text.yellow(),
        TokenKind::Variable | TokenKind::Number => text.cyan(),
        TokenKind::Keyword => text.magenta(),
        TokenKind::Builtin => text.blue(),
        TokenKind::Operator => text.red(),
        TokenKind::Option => text.green(),
    }
}

/// Renders one line with ANSI colors. Uncolored text is copied as-is.
pub fn highlight_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    let mut pos = 0;
    for token in tokenize_line(line) {
        if let Some(plain) = line.get(pos..token.range.start) {
            out.push_str(plain);
        }
        if let Some(text) = line.get(token.range.clone()) {
            out.push_str(&paint(text, token.kind).to_string());
        }
        pos = token.range.end;
    }
    if let Some(rest) = line.get(pos..) {
        out.push_str(rest);
    }
    out
}

/// Renders a whole script, optionally with a right-aligned line-number gutter.
pub fn render(code: &str, line_numbers: bool) -> String {
    let lines: Vec<&str> = code.split('\n').collect();
    let width = lines.len().to_string().len();

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if line_numbers {
                let gutter = format!("{:>width$} │ ", i + 1, width = width);
                format!("{}{}", gutter.dimmed(), highlight_line(line))
            } else {
                highlight_line(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
