// src/cli/repl.rs

use anyhow::Result;
use colored::*;
use dialoguer::{BasicHistory, Completion, Input, theme::ColorfulTheme};

use crate::cli::{dispatcher, handlers::commons, session::Session};

/// Tab-completes the command word.
struct CommandCompletion;

impl Completion for CommandCompletion {
    fn get(&self, input: &str) -> Option<String> {
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }
        let mut matches = dispatcher::command_words().filter(|word| word.starts_with(input));
        let first = matches.next()?;
        // Only complete when the prefix is unambiguous.
        match matches.next() {
            None => Some(first.to_string()),
            Some(_) => None,
        }
    }
}

/// Splits a command line the way a shell would.
pub fn split_line(line: &str) -> Option<Vec<String>> {
    shlex::split(line)
}

/// The interactive loop. Returns when the user exits or input ends.
pub fn run(session: &mut Session) -> Result<()> {
    println!("{}", t!("repl.welcome").blue().bold());
    println!("{}\n", t!("repl.hint").dimmed());

    let mut history = BasicHistory::new().max_entries(500).no_duplicates(true);
    let completion = CommandCompletion;
    let theme = ColorfulTheme::default();

    loop {
        let status = session.status();
        let prompt = if status.is_empty() {
            "scriptdeck".green().to_string()
        } else {
            format!("{} {}", "scriptdeck".green(), status.yellow())
        };

        let entered = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .history_with(&mut history)
            .completion_with(&completion)
            .interact_text();

        let line = match entered {
            Ok(line) => line,
            Err(e) if commons::is_interrupted(&e) => {
                if commons::confirm(t!("repl.prompt.exit"), false)? {
                    break;
                }
                continue;
            }
            Err(e) => {
                // End of input (closed stdin, no terminal) ends the session.
                log::debug!("Prompt ended: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(args) = split_line(line) else {
            println!("{}", commons::format_error(t!("repl.error.unbalanced_quotes")));
            continue;
        };

        if let Err(e) = dispatcher::dispatch(args, session) {
            report_error(&e);
        }
        if session.exit_requested() {
            break;
        }
    }

    println!("\n{}", t!("repl.goodbye").yellow());
    Ok(())
}

/// Errors end the command, not the session.
fn report_error(error: &anyhow::Error) {
    if let Some(clap_error) = error.downcast_ref::<clap::Error>() {
        // Usage errors and `--help` output are already formatted by clap.
        if let Err(e) = clap_error.print() {
            log::debug!("Could not print usage error: {}", e);
        }
        return;
    }
    log::debug!("Command failed: {:?}", error);
    println!("{}", commons::format_error(&error.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_honors_quotes() {
        assert_eq!(
            split_line(r#"save "my script""#).unwrap(),
            vec!["save", "my script"]
        );
        assert_eq!(split_line("  list  ").unwrap(), vec!["list"]);
        assert!(split_line(r#"save "open"#).is_none());
    }

    #[test]
    fn test_completion_needs_unambiguous_prefix() {
        let completion = CommandCompletion;
        assert_eq!(completion.get("ba"), Some("backup".to_string()));
        assert_eq!(completion.get("inf"), Some("info".to_string()));
        // `exit`, `exec` and `execute` share a prefix.
        assert_eq!(completion.get("ex"), None);
        assert_eq!(completion.get("load x"), None);
        assert_eq!(completion.get(""), None);
    }
}
