// src/cli/editor.rs

//! The line-by-line script editor used by `new` and `edit`.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{BasicHistory, Input, theme::ColorfulTheme};

use crate::cli::handlers::commons;

/// What the editor loop should do after a line was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// The line was appended.
    Appended,
    /// `:done`: commit the lines.
    Done,
    /// `:cancel`: throw the edit away.
    Cancel,
    /// `:show`: print what has been typed so far.
    Show,
    /// `:clear`: all lines removed.
    Cleared,
    /// `:undo`: the last line was removed, if there was one.
    Undone(Option<String>),
}

/// Lines being edited. Nothing touches the session until `:done`.
#[derive(Debug, Default)]
pub struct EditorBuffer {
    lines: Vec<String>,
}

impl EditorBuffer {
    pub fn new(initial: &[String]) -> Self {
        Self {
            lines: initial.to_vec(),
        }
    }

    pub fn apply(&mut self, input: &str) -> EditorAction {
        let line = input.trim_end();
        match line {
            ":done" => EditorAction::Done,
            ":cancel" => EditorAction::Cancel,
            ":show" => EditorAction::Show,
            ":clear" => {
                self.lines.clear();
                EditorAction::Cleared
            }
            ":undo" => EditorAction::Undone(self.lines.pop()),
            _ => {
                self.lines.push(line.to_string());
                EditorAction::Appended
            }
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The number shown in the `[NN] ` prompt.
    pub fn next_line_number(&self) -> usize {
        self.lines.len() + 1
    }
}

/// Runs the interactive editor over `initial`. Returns the new lines, or
/// `None` when the edit was cancelled.
pub fn edit_lines(initial: &[String], highlight: bool) -> Result<Option<Vec<String>>> {
    println!("{}", commons::format_info(t!("editor.info.instructions")));
    if !initial.is_empty() {
        println!("\n{}", t!("editor.info.current_content").bold());
        commons::print_script(&initial.join("\n"), highlight);
        println!();
    }

    let mut buffer = EditorBuffer::new(initial);
    let mut history = BasicHistory::new().max_entries(200).no_duplicates(true);
    let theme = ColorfulTheme::default();

    loop {
        let prompt = format!("[{:>2}]", buffer.next_line_number());
        let entered = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .history_with(&mut history)
            .interact_text();

        let line = match entered {
            Ok(line) => line,
            Err(e) if commons::is_interrupted(&e) => {
                if commons::confirm(t!("editor.prompt.cancel_editing"), false)? {
                    println!("{}", commons::format_info(t!("editor.info.cancelled")));
                    return Ok(None);
                }
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match buffer.apply(&line) {
            EditorAction::Appended => {}
            EditorAction::Done => {
                println!("{}", commons::format_success(t!("editor.success.done")));
                return Ok(Some(buffer.into_lines()));
            }
            EditorAction::Cancel => {
                println!("{}", commons::format_info(t!("editor.info.cancelled")));
                return Ok(None);
            }
            EditorAction::Show => {
                if buffer.lines().is_empty() {
                    println!("{}", commons::format_info(t!("common.info.script_empty")));
                } else {
                    commons::print_script(&buffer.lines().join("\n"), highlight);
                }
            }
            EditorAction::Cleared => {
                println!("{}", commons::format_info(t!("editor.info.cleared")));
            }
            EditorAction::Undone(Some(removed)) => {
                println!(
                    "{}",
                    commons::format_info(&format!(t!("editor.info.undone"), line = removed))
                );
            }
            EditorAction::Undone(None) => {
                println!("{}", commons::format_warning(t!("editor.warning.nothing_to_undo")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_appends_plain_lines() {
        // --- Setup ---
        let mut buffer = EditorBuffer::default();

        // --- Execute ---
        assert_eq!(buffer.apply("echo one   "), EditorAction::Appended);
        assert_eq!(buffer.apply(""), EditorAction::Appended);

        // --- Assert ---
        assert_eq!(buffer.lines(), ["echo one", ""]);
        assert_eq!(buffer.next_line_number(), 3);
    }

    #[test]
    fn test_apply_editor_commands() {
        let mut buffer = EditorBuffer::new(&["a".to_string(), "b".to_string()]);
        assert_eq!(buffer.apply(":show"), EditorAction::Show);
        assert_eq!(buffer.apply(":undo"), EditorAction::Undone(Some("b".to_string())));
        assert_eq!(buffer.lines(), ["a"]);
        assert_eq!(buffer.apply(":clear"), EditorAction::Cleared);
        assert_eq!(buffer.apply(":undo"), EditorAction::Undone(None));
        assert_eq!(buffer.apply(":cancel"), EditorAction::Cancel);
        assert_eq!(buffer.apply(":done"), EditorAction::Done);
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_commands_must_match_exactly() {
        let mut buffer = EditorBuffer::default();
        assert_eq!(buffer.apply("  :done"), EditorAction::Appended);
        assert_eq!(buffer.apply(":DONE"), EditorAction::Appended);
        assert_eq!(buffer.lines(), ["  :done", ":DONE"]);
    }
}
