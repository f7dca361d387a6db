// src/cli/handlers/commons.rs

// Shared helpers for the command handlers: status lines, prompts and the
// execute-and-report flow used by `run` and `execute`.

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::io::ErrorKind;
use std::time::Duration;

use crate::{
    cli::session::Session,
    core::{format, highlight},
    models::ExecutionResult,
    system::executor::ExecutionError,
};

const BANNER_WIDTH: usize = 60;

/// Exit code of a script that died from SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

// --- Status Lines ---

pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message.green())
}

pub fn format_error(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message.red())
}

pub fn format_info(message: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), message)
}

pub fn format_warning(message: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), message.yellow())
}

// --- Prompts ---

/// Whether a prompt failed because the user pressed Ctrl+C.
pub fn is_interrupted(error: &dialoguer::Error) -> bool {
    matches!(error, dialoguer::Error::IO(e) if e.kind() == ErrorKind::Interrupted)
}

/// Asks a yes/no question. Ctrl+C counts as "no".
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    match Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
    {
        Ok(answer) => Ok(answer),
        Err(e) if is_interrupted(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Like [`confirm`], but answered with yes right away under `--yes`.
pub fn confirm_unless_assumed(session: &Session, prompt: &str, default: bool) -> Result<bool> {
    if session.assume_yes {
        return Ok(true);
    }
    confirm(prompt, default)
}

/// Asks for a script name. Returns `None` when the answer is empty or the
/// prompt was interrupted.
pub fn prompt_script_name() -> Result<Option<String>> {
    match Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("common.prompt.script_name"))
        .allow_empty(true)
        .interact_text()
    {
        Ok(name) if name.trim().is_empty() => {
            println!("{}", format_error(t!("common.error.empty_name")));
            Ok(None)
        }
        Ok(name) => Ok(Some(name.trim().to_string())),
        Err(e) if is_interrupted(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Returns `true` when it is fine to replace the buffer: either nothing would
/// be lost or the user agreed to lose it.
pub fn check_unsaved_changes(session: &Session) -> Result<bool> {
    if !session.has_unsaved_changes() {
        return Ok(true);
    }
    confirm_unless_assumed(session, t!("common.prompt.unsaved_changes"), false)
}

// --- Script Display ---

/// Prints a script with line numbers, colored unless `highlight` is off.
pub fn print_script(content: &str, highlight: bool) {
    if highlight {
        println!("{}", highlight::render(content, true));
        return;
    }
    let lines: Vec<&str> = content.split('\n').collect();
    let width = lines.len().to_string().len();
    for (i, line) in lines.iter().enumerate() {
        println!("{:>width$} │ {}", i + 1, line, width = width);
    }
}

/// Prints a titled script block.
pub fn show_script(title: &str, content: &str, highlight: bool) {
    println!("\n{}", format!(t!("common.info.script_title"), name = title).blue().bold());
    println!("{}", "─".repeat(BANNER_WIDTH).blue());
    print_script(content, highlight);
    println!("{}", "─".repeat(BANNER_WIDTH).blue());
}

// --- Execution ---

/// Resolves the timeout for a run: the command's own flag, else the session default.
pub fn resolve_timeout(session: &Session, timeout_secs: Option<u64>) -> Result<Duration> {
    match timeout_secs {
        Some(0) => Err(ExecutionError::InvalidTimeout.into()),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(session.executor.default_timeout()),
    }
}

/// The shared tail of `run` and `execute`: show, confirm, execute, report.
///
/// Returns `None` when nothing ran (empty script or a declined confirmation).
pub fn execute_and_report(
    session: &Session,
    label: &str,
    content: &str,
    timeout_secs: Option<u64>,
    yes: bool,
) -> Result<Option<ExecutionResult>> {
    if content.trim().is_empty() {
        println!("{}", format_error(t!("run.error.empty_script")));
        return Ok(None);
    }
    let timeout = resolve_timeout(session, timeout_secs)?;

    println!(
        "{}",
        format_info(&format!(t!("run.info.executing"), name = label))
    );
    show_script(label, content, session.config.highlight);

    if !session.skip_run_confirmation(yes) && !confirm(t!("run.prompt.execute"), false)? {
        println!("{}", format_info(t!("run.info.cancelled")));
        return Ok(None);
    }

    log::info!("Executing '{}' with a {:?} timeout", label, timeout);
    let result = session.executor.execute(content, Some(timeout))?;
    print_result(&result);
    Ok(Some(result))
}

/// Prints the result banner.
pub fn print_result(result: &ExecutionResult) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{}", rule);

    if result.is_timed_out() {
        println!("{}", format_warning(t!("run.warning.timed_out")));
    } else if result.is_success() {
        println!("{}", format_success(t!("run.success.completed")));
    } else if result.exit_code() == INTERRUPTED_EXIT_CODE {
        println!("{}", format_warning(t!("run.warning.interrupted")));
    } else {
        println!("{}", format_error(t!("run.error.failed")));
    }

    if !result.stdout().is_empty() {
        println!("\n{}", t!("run.label.output").green().bold());
        println!("{}", result.stdout().trim_end());
    }
    if !result.stderr().is_empty() {
        println!("\n{}", t!("run.label.errors").red().bold());
        println!("{}", result.stderr().trim_end());
    }

    let code = result.exit_code().to_string();
    let code = if result.exit_code() == 0 {
        code.green()
    } else {
        code.red()
    };
    println!("\n{} {}", t!("run.label.exit_code").bold(), code);
    println!(
        "{} {}",
        t!("run.label.duration").bold(),
        format::format_duration(result.duration())
    );
    println!("{}", rule);
}
