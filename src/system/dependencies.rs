// src/system/dependencies.rs

//! Best-effort discovery of the external commands a script calls.
//!
//! This is a hint for users, not an analysis. It has no shell grammar behind
//! it, so it both misses commands and occasionally reports words that are not
//! commands at all. Nothing should be gated on its answer.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

lazy_static! {
    /// Words in command position: start of a line or after a separator, past
    /// any leading keywords and `VAR=value` assignments.
    static ref COMMAND_POSITION_RE: Regex = Regex::new(
        r"(?m)(?:^|[;&|(){}])[ \t]*(?:(?:if|then|do|else|elif|while|until|time|!)[ \t]+|[A-Za-z_]\w*=\S*[ \t]+)*([A-Za-z_][\w.+-]*)"
    )
    .expect("command position pattern is valid");

    /// Lookups such as `which jq` and `command -v docker`.
    static ref LOOKUP_RES: Vec<Regex> = vec![
        Regex::new(r"\bwhich[ \t]+([A-Za-z_][\w.+-]*)").expect("which pattern is valid"),
        Regex::new(r"\bcommand[ \t]+-v[ \t]+([A-Za-z_][\w.+-]*)").expect("command -v pattern is valid"),
    ];

    /// Heads of `$(...)` and backtick substitutions.
    static ref SUBSTITUTION_RES: Vec<Regex> = vec![
        Regex::new(r"\$\([ \t]*([A-Za-z_][\w.+-]*)").expect("substitution pattern is valid"),
        Regex::new(r"`[ \t]*([A-Za-z_][\w.+-]*)[^`]*`").expect("backtick pattern is valid"),
    ];

    /// `name() {` and `function name` definitions; calls to these are not dependencies.
    static ref FUNCTION_DEF_RE: Regex = Regex::new(
        r"(?m)^[ \t]*(?:function[ \t]+([A-Za-z_][\w.+-]*)|([A-Za-z_][\w.+-]*)[ \t]*\(\))"
    )
    .expect("function pattern is valid");

    static ref ARITHMETIC_RE: Regex = Regex::new(r"\$?\(\([^)]*\)\)").expect("arithmetic pattern is valid");

    static ref TRAILING_COMMENT_RE: Regex = Regex::new(r"(?m)(?:^|[ \t])#.*$").expect("comment pattern is valid");
}

const SHELL_KEYWORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "function", "in", "select", "time", "coproc",
];

const SHELL_BUILTINS: &[&str] = &[
    "echo", "printf", "read", "cd", "pwd", "export", "local", "return", "exit", "set", "unset",
    "shift", "source", "alias", "unalias", "eval", "exec", "test", "true", "false", "declare",
    "typeset", "readonly", "trap", "wait", "let", "break", "continue", "type", "hash", "ulimit",
    "umask", "command", "builtin", "getopts", "shopt", "mapfile", "readarray", "pushd", "popd",
];

/// Collects plausible external command names from `content`, sorted and deduplicated.
pub fn scan(content: &str) -> BTreeSet<String> {
    let raw = strip_comment_lines(content);
    let masked = TRAILING_COMMENT_RE
        .replace_all(&ARITHMETIC_RE.replace_all(&mask_literals(&raw), ""), "")
        .into_owned();

    let defined: HashSet<String> = FUNCTION_DEF_RE
        .captures_iter(&raw)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect();

    let mut found = BTreeSet::new();

    for caps in COMMAND_POSITION_RE.captures_iter(&masked) {
        let Some(word) = caps.get(1) else { continue };
        // `NAME=value`, `label)` in a case arm and `name()` are not calls.
        let next = masked.get(word.end()..).and_then(|rest| rest.chars().next());
        if matches!(next, Some('=') | Some(')') | Some('(')) {
            continue;
        }
        found.insert(word.as_str().to_string());
    }

    for re in LOOKUP_RES.iter().chain(SUBSTITUTION_RES.iter()) {
        for caps in re.captures_iter(&raw) {
            if let Some(word) = caps.get(1) {
                found.insert(word.as_str().to_string());
            }
        }
    }

    found
        .into_iter()
        .filter(|word| !SHELL_KEYWORDS.contains(&word.as_str()))
        .filter(|word| !SHELL_BUILTINS.contains(&word.as_str()))
        .filter(|word| !defined.contains(word))
        .collect()
}

/// Drops whole-line comments, including the interpreter directive.
fn strip_comment_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Blanks out quoted strings and `${...}` expansions so their contents are not
/// mistaken for commands. Line breaks are kept so `(?m)` anchors still work.
fn mask_literals(content: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        Single,
        Double,
        Brace(usize),
    }

    let mut out = String::with_capacity(content.len());
    let mut state = State::Code;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        let blank = |c: char| if c == '\n' { '\n' } else { ' ' };
        match state {
            State::Code => match c {
                '\\' => {
                    out.push(' ');
                    if let Some(escaped) = chars.next() {
                        out.push(blank(escaped));
                    }
                }
                '\'' => {
                    state = State::Single;
                    out.push(' ');
                }
                '"' => {
                    state = State::Double;
                    out.push(' ');
                }
                '$' if chars.peek() == Some(&'{') => {
                    chars.next();
                    state = State::Brace(1);
                    out.push_str("  ");
                }
                _ => out.push(c),
            },
            State::Single => {
                if c == '\'' {
                    state = State::Code;
                }
                out.push(blank(c));
            }
            State::Double => {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            out.push(' ');
                            out.push(blank(escaped));
                            continue;
                        }
                    }
                    '"' => state = State::Code,
                    _ => {}
                }
                out.push(blank(c));
            }
            State::Brace(depth) => {
                match c {
                    '{' => state = State::Brace(depth + 1),
                    '}' if depth == 1 => state = State::Code,
                    '}' => state = State::Brace(depth - 1),
                    _ => {}
                }
                out.push(blank(c));
            }
        }
    }
    out
}
