// src/cli/handlers/check.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::{handlers::commons, session::Session},
    core::lint,
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Checks a script's syntax without running it.")]
struct CheckArgs {
    /// A saved script to check instead of the buffer.
    name: Option<String>,
}

pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;

    let content = match &check_args.name {
        Some(name) => session.store.load_script(name.trim())?,
        None => session.content(),
    };

    let check = session.executor.validate_syntax(&content);
    if check.valid {
        println!("{}", commons::format_success(&check.message));
    } else {
        println!("{}", commons::format_error(&check.message));
    }

    let issues = lint::check_structure(&content);
    if !issues.is_empty() {
        println!("\n{}", t!("check.label.warnings").yellow().bold());
        for issue in &issues {
            println!("  {}", commons::format_warning(&lint::format_issue(issue)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::tests::test_session;

    #[test]
    fn test_check_accepts_buffer_and_saved_scripts() {
        let (mut session, _dir) = test_session();
        session.set_lines(vec!["if true; then".to_string(), "  echo x".to_string()]);
        session.store.save_script("good", "echo ok").unwrap();

        handle(vec![], &mut session).unwrap();
        handle(vec!["good".to_string()], &mut session).unwrap();
    }

    #[test]
    fn test_check_missing_script_fails() {
        let (mut session, _dir) = test_session();
        assert!(handle(vec!["ghost".to_string()], &mut session).is_err());
    }
}
